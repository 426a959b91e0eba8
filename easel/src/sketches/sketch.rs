use serde::Serialize;

pub const DEFAULT_FPS: f32 = 60.0;

/// Size used whenever a sketch declares an unusable surface size.
pub const DEFAULT_SURFACE_SIZE: SurfaceSize = SurfaceSize { w: 400, h: 400 };

pub type SketchResult = anyhow::Result<()>;

/// Static registration record for a sketch. Usually declared as a
/// `pub static SKETCH_CONFIG` next to the sketch's `init` function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SketchConfig {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub fps: f32,
    pub w: Option<i32>,
    pub h: Option<i32>,
}

impl SketchConfig {
    pub const fn new(name: &'static str, display_name: &'static str) -> Self {
        Self {
            name,
            display_name,
            description: "",
            fps: DEFAULT_FPS,
            w: None,
            h: None,
        }
    }

    pub const fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub const fn fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    pub const fn size(mut self, w: i32, h: i32) -> Self {
        self.w = Some(w);
        self.h = Some(h);
        self
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct SurfaceSize {
    pub w: u32,
    pub h: u32,
}

impl SurfaceSize {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

/// The callbacks the runtime invokes on an active sketch.
///
/// A fresh instance is created for every activation, so all mutable state
/// belongs to exactly one activation of one sketch. Drawing happens through
/// the ambient primitives in [`crate::bridge`], which always point at the
/// surface of the currently active sketch.
///
/// Input handlers that are not overridden ignore their event kind.
pub trait Sketch {
    /// Runs once per activation before any frame or input callback.
    fn init(&mut self) -> SketchResult;

    /// Runs once per tick. Ticks may be dropped, so this must not rely on
    /// being called for every elapsed interval.
    fn frame(&mut self) -> SketchResult;

    fn pointer_moved(&mut self) -> SketchResult {
        Ok(())
    }

    fn pointer_pressed(&mut self) -> SketchResult {
        Ok(())
    }

    fn pointer_released(&mut self) -> SketchResult {
        Ok(())
    }

    fn key_pressed(&mut self) -> SketchResult {
        Ok(())
    }

    fn key_released(&mut self) -> SketchResult {
        Ok(())
    }

    fn resized(&mut self) -> SketchResult {
        Ok(())
    }

    /// Releases anything acquired outside the surface (worker threads,
    /// devices, timers). Runs before the next sketch's `init`.
    fn teardown(&mut self) -> SketchResult {
        Ok(())
    }
}
