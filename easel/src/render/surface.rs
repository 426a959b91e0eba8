use std::cell::RefCell;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::color::{Color, ColorArg, ColorMode};
use super::raster::Raster;
use super::transform::Affine;
use crate::runtime::input::{InputEvent, Key};
use crate::sketch::SurfaceSize;
use crate::util::safe_range;

/// Shared handle to the live surface. The controller owns the only long-lived
/// strong reference; the bridge holds a second one while bound.
pub type SurfaceHandle = Rc<RefCell<Surface>>;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no sketch is active")]
    NoActiveSketch,

    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode '{path}': {source}")]
    Encode {
        path: PathBuf,
        source: png::EncodingError,
    },
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Background,
    Rect { x: f32, y: f32, w: f32, h: f32 },
    Ellipse { x: f32, y: f32, w: f32, h: f32 },
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
    Point { x: f32, y: f32 },
    Triangle { points: [[f32; 2]; 3] },
    Text {
        content: String,
        x: f32,
        y: f32,
        size: f32,
        align: TextAlign,
    },
}

/// One recorded draw call, in the sketch's own (untransformed) coordinates,
/// together with the style that was in effect.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub shape: Shape,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_weight: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Style {
    fill: Option<Color>,
    stroke: Option<Color>,
    stroke_weight: f32,
    text_size: f32,
    text_align: TextAlign,
    color_mode: ColorMode,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Some(Color::WHITE),
            stroke: Some(Color::BLACK),
            stroke_weight: 1.0,
            text_size: 12.0,
            text_align: TextAlign::Left,
            color_mode: ColorMode::Rgb,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct InputState {
    pointer: [f32; 2],
    prev_pointer: [f32; 2],
    pointer_pressed: bool,
    key: Option<Key>,
    key_pressed: bool,
}

/// The drawable area of one activation plus the state the ambient primitives
/// read: pointer, keys, frame count, loop flag and RNG.
///
/// A surface is created when a sketch activates and dropped when it is
/// switched away from; nothing carries over between activations.
pub struct Surface {
    raster: Raster,
    window_size: [u32; 2],
    style: Style,
    transform: Affine,
    stack: Vec<(Style, Affine)>,
    input: InputState,
    frame_count: u64,
    looping: bool,
    rng: StdRng,
    commands: Vec<DrawCommand>,
    created_at: Instant,
}

impl Surface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            raster: Raster::new(size.w, size.h),
            window_size: [size.w, size.h],
            style: Style::default(),
            transform: Affine::IDENTITY,
            stack: Vec::new(),
            input: InputState::default(),
            frame_count: 0,
            looping: true,
            rng: StdRng::from_os_rng(),
            commands: Vec::new(),
            created_at: Instant::now(),
        }
    }

    pub fn into_handle(self) -> SurfaceHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.raster.width(), self.raster.height())
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn window_size(&self) -> [u32; 2] {
        self.window_size
    }

    /// Reallocates the pixel buffer; existing pixels are discarded.
    pub fn resize(&mut self, w: u32, h: u32) {
        if w == 0 || h == 0 {
            warn!("ignoring resize to {}x{}", w, h);
            return;
        }
        debug!("resizing surface to {}x{}", w, h);
        self.raster = Raster::new(w, h);
    }

    /// Called by the controller right before the sketch's frame callback.
    pub fn begin_frame(&mut self) {
        self.frame_count += 1;
        self.commands.clear();
        self.transform = Affine::IDENTITY;
        self.stack.clear();
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn millis(&self) -> u64 {
        self.created_at.elapsed().as_millis() as u64
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn apply_input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerMoved { x, y } => self.move_pointer(x, y),
            InputEvent::PointerPressed { x, y } => {
                self.move_pointer(x, y);
                self.input.pointer_pressed = true;
            }
            InputEvent::PointerReleased { x, y } => {
                self.move_pointer(x, y);
                self.input.pointer_pressed = false;
            }
            InputEvent::KeyPressed(key) => {
                self.input.key = Some(key);
                self.input.key_pressed = true;
            }
            InputEvent::KeyReleased(key) => {
                self.input.key = Some(key);
                self.input.key_pressed = false;
            }
            InputEvent::Resized { w, h } => {
                self.window_size = [w, h];
            }
        }
    }

    fn move_pointer(&mut self, x: f32, y: f32) {
        self.input.prev_pointer = self.input.pointer;
        self.input.pointer = [x, y];
    }

    pub fn pointer(&self) -> [f32; 2] {
        self.input.pointer
    }

    pub fn prev_pointer(&self) -> [f32; 2] {
        self.input.prev_pointer
    }

    pub fn pointer_is_pressed(&self) -> bool {
        self.input.pointer_pressed
    }

    pub fn key(&self) -> Option<Key> {
        self.input.key
    }

    pub fn key_is_pressed(&self) -> bool {
        self.input.key_pressed
    }

    pub fn random(&mut self, lo: f32, hi: f32) -> f32 {
        let (lo, hi) = safe_range(lo, hi);
        self.rng.random_range(lo..hi)
    }

    pub fn random_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn pixels(&self) -> &[u8] {
        self.raster.pixels()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.raster.pixel(x, y)
    }

    // Style ------------------------------------------------------------------

    pub fn fill(&mut self, color: ColorArg) {
        self.style.fill = Some(color.resolve(self.style.color_mode));
    }

    pub fn no_fill(&mut self) {
        self.style.fill = None;
    }

    pub fn stroke(&mut self, color: ColorArg) {
        self.style.stroke = Some(color.resolve(self.style.color_mode));
    }

    pub fn no_stroke(&mut self) {
        self.style.stroke = None;
    }

    pub fn stroke_weight(&mut self, weight: f32) {
        self.style.stroke_weight = weight.max(0.0);
    }

    pub fn text_size(&mut self, size: f32) {
        self.style.text_size = size.max(0.0);
    }

    pub fn text_align(&mut self, align: TextAlign) {
        self.style.text_align = align;
    }

    /// Resolves `color` the way `fill` and `stroke` would right now.
    pub fn resolve_color(&self, color: ColorArg) -> Color {
        color.resolve(self.style.color_mode)
    }

    pub fn color_mode(&mut self, mode: ColorMode) {
        self.style.color_mode = mode;
    }

    pub fn push(&mut self) {
        self.stack.push((self.style, self.transform));
    }

    pub fn pop(&mut self) {
        match self.stack.pop() {
            Some((style, transform)) => {
                self.style = style;
                self.transform = transform;
            }
            None => warn!("pop() without a matching push(); ignoring"),
        }
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.transform = self.transform.translate(x, y);
    }

    pub fn rotate(&mut self, radians: f32) {
        self.transform = self.transform.rotate(radians);
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.transform = self.transform.scale(sx, sy);
    }

    // Drawing ----------------------------------------------------------------

    pub fn background(&mut self, color: ColorArg) {
        let color = color.resolve(self.style.color_mode);
        self.raster.clear(color);
        self.commands.push(DrawCommand {
            shape: Shape::Background,
            fill: Some(color),
            stroke: None,
            stroke_weight: 0.0,
        });
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let outline = [[x, y], [x + w, y], [x + w, y + h], [x, y + h]];
        self.draw_closed(&outline);
        self.record(Shape::Rect { x, y, w, h });
    }

    /// `x`/`y` is the center, `w`/`h` the diameters.
    pub fn ellipse(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let (rx, ry) = (w.abs() / 2.0, h.abs() / 2.0);
        let screen_radius = rx.max(ry) * self.transform.mean_scale();
        let segments = (screen_radius as usize).clamp(16, 96);

        let outline: Vec<[f32; 2]> = (0..segments)
            .map(|i| {
                let t = i as f32 / segments as f32 * std::f32::consts::TAU;
                [x + rx * t.cos(), y + ry * t.sin()]
            })
            .collect();

        self.draw_closed(&outline);
        self.record(Shape::Ellipse { x, y, w, h });
    }

    pub fn triangle(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
    ) {
        let points = [[x1, y1], [x2, y2], [x3, y3]];
        self.draw_closed(&points);
        self.record(Shape::Triangle { points });
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        if let Some(stroke) = self.style.stroke {
            let from = self.transform.apply(x1, y1);
            let to = self.transform.apply(x2, y2);
            let width = self.screen_stroke_weight();
            self.raster.stroke_segment(from, to, width, stroke);
        }
        self.record(Shape::Line { x1, y1, x2, y2 });
    }

    pub fn point(&mut self, x: f32, y: f32) {
        if let Some(stroke) = self.style.stroke {
            let at = self.transform.apply(x, y);
            let width = self.screen_stroke_weight();
            self.raster.stroke_segment(at, at, width, stroke);
        }
        self.record(Shape::Point { x, y });
    }

    /// Text is recorded in the display list but not rasterized.
    pub fn text(&mut self, content: String, x: f32, y: f32) {
        self.record(Shape::Text {
            content,
            x,
            y,
            size: self.style.text_size,
            align: self.style.text_align,
        });
    }

    fn draw_closed(&mut self, outline: &[[f32; 2]]) {
        let screen: Vec<[f32; 2]> = outline
            .iter()
            .map(|p| self.transform.apply(p[0], p[1]))
            .collect();

        if let Some(fill) = self.style.fill {
            self.raster.fill_polygon(&screen, fill);
        }

        if let Some(stroke) = self.style.stroke {
            let width = self.screen_stroke_weight();
            if width > 0.0 {
                self.raster.stroke_polygon(&screen, width, stroke);
            }
        }
    }

    fn screen_stroke_weight(&self) -> f32 {
        self.style.stroke_weight * self.transform.mean_scale()
    }

    fn record(&mut self, shape: Shape) {
        self.commands.push(DrawCommand {
            shape,
            fill: self.style.fill,
            stroke: self.style.stroke,
            stroke_weight: self.style.stroke_weight,
        });
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), CaptureError> {
        let path = path.as_ref();
        let io_err = |source| CaptureError::Io {
            path: path.to_path_buf(),
            source,
        };
        let encode_err = |source| CaptureError::Encode {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let file = fs::File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        let mut encoder =
            png::Encoder::new(&mut writer, self.width(), self.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut png_writer = encoder.write_header().map_err(encode_err)?;
        png_writer
            .write_image_data(self.raster.pixels())
            .map_err(encode_err)?;
        png_writer.finish().map_err(encode_err)?;
        writer.flush().map_err(io_err)?;

        debug!("saved surface capture to '{}'", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(w: u32, h: u32) -> Surface {
        Surface::new(SurfaceSize::new(w, h))
    }

    #[test]
    fn new_surface_matches_requested_size() {
        let s = surface(100, 50);
        assert_eq!(s.size(), SurfaceSize::new(100, 50));
        assert_eq!(s.window_size(), [100, 50]);
        assert_eq!(s.pixels().len(), 100 * 50 * 4);
        assert_eq!(s.frame_count(), 0);
        assert!(s.is_looping());
    }

    #[test]
    fn background_then_rect_paints_pixels() {
        let mut s = surface(20, 20);
        s.background(ColorArg::from(220.0));
        s.no_stroke();
        s.fill(ColorArg::from((255.0, 0.0, 0.0)));
        s.rect(5.0, 5.0, 5.0, 5.0);

        assert_eq!(s.pixel(0, 0), Some([220, 220, 220, 255]));
        assert_eq!(s.pixel(7, 7), Some([255, 0, 0, 255]));
        assert_eq!(s.commands().len(), 2);
        assert_eq!(s.commands()[1].shape, Shape::Rect {
            x: 5.0,
            y: 5.0,
            w: 5.0,
            h: 5.0
        });
        assert_eq!(s.commands()[1].stroke, None);
    }

    #[test]
    fn push_pop_restores_style_and_transform() {
        let mut s = surface(20, 20);
        s.no_stroke();
        s.push();
        s.translate(10.0, 10.0);
        s.fill(ColorArg::from(0.0));
        s.pop();
        s.rect(0.0, 0.0, 2.0, 2.0);

        assert_eq!(s.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(s.pixel(10, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn unmatched_pop_is_ignored() {
        let mut s = surface(4, 4);
        s.translate(1.0, 1.0);
        s.pop();
        s.no_stroke();
        s.rect(0.0, 0.0, 1.0, 1.0);
        assert_eq!(s.pixel(1, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn begin_frame_resets_transform_and_display_list() {
        let mut s = surface(10, 10);
        s.translate(5.0, 5.0);
        s.point(0.0, 0.0);
        s.begin_frame();

        assert_eq!(s.frame_count(), 1);
        assert!(s.commands().is_empty());

        s.no_stroke();
        s.rect(0.0, 0.0, 1.0, 1.0);
        assert_eq!(s.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn input_updates_pointer_and_keys() {
        let mut s = surface(10, 10);
        s.apply_input(&InputEvent::PointerMoved { x: 1.0, y: 2.0 });
        s.apply_input(&InputEvent::PointerPressed { x: 3.0, y: 4.0 });

        assert_eq!(s.pointer(), [3.0, 4.0]);
        assert_eq!(s.prev_pointer(), [1.0, 2.0]);
        assert!(s.pointer_is_pressed());

        s.apply_input(&InputEvent::KeyPressed(Key::Char('r')));
        assert_eq!(s.key(), Some(Key::Char('r')));
        assert!(s.key_is_pressed());

        s.apply_input(&InputEvent::KeyReleased(Key::Char('r')));
        assert!(!s.key_is_pressed());

        s.apply_input(&InputEvent::Resized { w: 800, h: 600 });
        assert_eq!(s.window_size(), [800, 600]);
        assert_eq!(s.size(), SurfaceSize::new(10, 10));
    }

    #[test]
    fn seeded_random_is_reproducible_and_in_range() {
        let mut a = surface(1, 1);
        let mut b = surface(1, 1);
        a.random_seed(7);
        b.random_seed(7);

        for _ in 0..32 {
            let value = a.random(50.0, 200.0);
            assert_eq!(value, b.random(50.0, 200.0));
            assert!((50.0..200.0).contains(&value));
        }

        let reversed = a.random(10.0, 0.0);
        assert!((0.0..10.0).contains(&reversed));
        let degenerate = a.random(3.0, 3.0);
        assert!((3.0..=3.0001).contains(&degenerate));
    }

    #[test]
    fn resize_reallocates_and_rejects_zero() {
        let mut s = surface(10, 10);
        s.resize(30, 20);
        assert_eq!(s.size(), SurfaceSize::new(30, 20));
        s.resize(0, 20);
        assert_eq!(s.size(), SurfaceSize::new(30, 20));
    }

    #[test]
    fn save_png_writes_a_file() {
        let mut s = surface(8, 8);
        s.background(ColorArg::from((10.0, 20.0, 30.0)));

        let path = std::env::temp_dir()
            .join(format!("easel-surface-{}.png", std::process::id()));
        s.save_png(&path).expect("save png");

        let bytes = fs::read(&path).expect("read png");
        assert_eq!(&bytes[1..4], b"PNG");
        let _ = fs::remove_file(&path);
    }
}
