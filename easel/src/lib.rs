pub mod bridge;
#[path = "core/logging.rs"]
pub mod logging;
pub mod prelude;
pub mod render;
#[path = "sketches/registration_macros.rs"]
mod registration_macros;
pub mod runtime;
#[path = "sketches/sketch.rs"]
pub mod sketch;
#[path = "framework/util.rs"]
pub mod util;

pub use runtime::host::{run_registry, run_registry_with_channels};
