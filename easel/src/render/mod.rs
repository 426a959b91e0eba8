pub mod color;
pub mod raster;
pub mod surface;
pub mod transform;
