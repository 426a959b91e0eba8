//! Drawing, input, random and math primitives that sketches call by plain
//! name (`background(0.0)`, `circle(x, y, d)`, `pointer_x()`).
//!
//! Surface primitives act on whichever surface the controller bound to the
//! current thread at activation. Ambient reads such as [`width`] or
//! [`pointer_x`] are computed from the live surface at call time, never
//! cached. With nothing bound every primitive is a no-op that returns a
//! neutral value.

use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::rc::Rc;

use log::{trace, warn};

use crate::render::color::{Color, ColorArg, ColorMode};
use crate::render::surface::{Surface, SurfaceHandle, TextAlign};
use crate::runtime::input::Key;
use crate::runtime::readiness::ActivationToken;

pub use crate::util::{
    HALF_PI, PI, TWO_PI, constrain, degrees, dist, lerp, map_range, radians,
};

/// Bumped whenever a primitive is added, removed or changes meaning.
pub const PRIMITIVES_VERSION: u32 = 2;

struct Binding {
    surface: SurfaceHandle,
    token: ActivationToken,
}

thread_local! {
    static BINDING: RefCell<Option<Binding>> = const { RefCell::new(None) };
    static STRAY_WARNED: Cell<bool> = const { Cell::new(false) };
}

pub(crate) fn rebind(surface: &SurfaceHandle, token: ActivationToken) {
    BINDING.with_borrow_mut(|binding| {
        if let Some(current) = binding.as_mut() {
            if Rc::ptr_eq(&current.surface, surface) {
                current.token = token;
                return;
            }
        }
        *binding = Some(Binding {
            surface: Rc::clone(surface),
            token,
        });
    });
    STRAY_WARNED.set(false);
}

/// Releases the binding only if it still points at `surface`.
pub(crate) fn unbind_surface(surface: &SurfaceHandle) {
    let released = BINDING.with_borrow_mut(|binding| {
        let matches = binding
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(&current.surface, surface));
        if matches {
            *binding = None;
        }
        matches
    });
    if released {
        STRAY_WARNED.set(false);
    }
}

/// Drops whatever binding this thread holds.
pub fn unbind() {
    BINDING.set(None);
    STRAY_WARNED.set(false);
}

pub fn is_bound() -> bool {
    BINDING.with_borrow(|binding| binding.is_some())
}

fn with_surface<R>(
    primitive: &'static str,
    unbound: R,
    f: impl FnOnce(&mut Surface) -> R,
) -> R {
    let handle = BINDING.with_borrow(|binding| {
        binding.as_ref().map(|binding| Rc::clone(&binding.surface))
    });

    let Some(handle) = handle else {
        if STRAY_WARNED.replace(true) {
            trace!("ignoring '{}': no sketch is active", primitive);
        } else {
            warn!("ignoring '{}': no sketch is active", primitive);
        }
        return unbound;
    };

    let Ok(mut surface) = handle.try_borrow_mut() else {
        warn!("ignoring '{}': surface is busy", primitive);
        return unbound;
    };

    f(&mut surface)
}

// Ambient reads

pub fn width() -> f32 {
    with_surface("width", 0.0, |s| s.width() as f32)
}

pub fn height() -> f32 {
    with_surface("height", 0.0, |s| s.height() as f32)
}

pub fn window_width() -> f32 {
    with_surface("window_width", 0.0, |s| s.window_size()[0] as f32)
}

pub fn window_height() -> f32 {
    with_surface("window_height", 0.0, |s| s.window_size()[1] as f32)
}

pub fn pointer_x() -> f32 {
    with_surface("pointer_x", 0.0, |s| s.pointer()[0])
}

pub fn pointer_y() -> f32 {
    with_surface("pointer_y", 0.0, |s| s.pointer()[1])
}

pub fn prev_pointer_x() -> f32 {
    with_surface("prev_pointer_x", 0.0, |s| s.prev_pointer()[0])
}

pub fn prev_pointer_y() -> f32 {
    with_surface("prev_pointer_y", 0.0, |s| s.prev_pointer()[1])
}

pub fn pointer_is_pressed() -> bool {
    with_surface("pointer_is_pressed", false, |s| s.pointer_is_pressed())
}

/// The most recently pressed or released key.
pub fn key() -> Option<Key> {
    with_surface("key", None, |s| s.key())
}

pub fn key_is_pressed() -> bool {
    with_surface("key_is_pressed", false, |s| s.key_is_pressed())
}

/// Frames rendered since activation. `0` inside `init`.
pub fn frame_count() -> u64 {
    with_surface("frame_count", 0, |s| s.frame_count())
}

/// Milliseconds since activation.
pub fn millis() -> u64 {
    with_surface("millis", 0, |s| s.millis())
}

/// Token for the current activation, for handing to background work.
pub fn activation_token() -> Option<ActivationToken> {
    BINDING.with_borrow(|binding| {
        binding.as_ref().map(|binding| binding.token.clone())
    })
}

// Style

pub fn background(color: impl Into<ColorArg>) {
    let color = color.into();
    with_surface("background", (), |s| s.background(color));
}

pub fn fill(color: impl Into<ColorArg>) {
    let color = color.into();
    with_surface("fill", (), |s| s.fill(color));
}

pub fn no_fill() {
    with_surface("no_fill", (), |s| s.no_fill());
}

pub fn stroke(color: impl Into<ColorArg>) {
    let color = color.into();
    with_surface("stroke", (), |s| s.stroke(color));
}

pub fn no_stroke() {
    with_surface("no_stroke", (), |s| s.no_stroke());
}

pub fn stroke_weight(weight: f32) {
    with_surface("stroke_weight", (), |s| s.stroke_weight(weight));
}

pub fn text_size(size: f32) {
    with_surface("text_size", (), |s| s.text_size(size));
}

pub fn text_align(align: TextAlign) {
    with_surface("text_align", (), |s| s.text_align(align));
}

pub fn color_mode(mode: ColorMode) {
    with_surface("color_mode", (), |s| s.color_mode(mode));
}

// Color values

/// Resolves a color argument in the current color mode. Unbound, channels
/// are read as RGB.
pub fn color(color: impl Into<ColorArg>) -> Color {
    let color = color.into();
    with_surface("color", color.resolve(ColorMode::Rgb), |s| {
        s.resolve_color(color)
    })
}

pub fn lerp_color(
    from: impl Into<ColorArg>,
    to: impl Into<ColorArg>,
    t: f32,
) -> Color {
    color(from).lerp(color(to), t)
}

pub fn red(c: impl Into<ColorArg>) -> f32 {
    color(c).r
}

pub fn green(c: impl Into<ColorArg>) -> f32 {
    color(c).g
}

pub fn blue(c: impl Into<ColorArg>) -> f32 {
    color(c).b
}

pub fn alpha(c: impl Into<ColorArg>) -> f32 {
    color(c).a
}

pub fn hue(c: impl Into<ColorArg>) -> f32 {
    color(c).to_hsb().0
}

pub fn saturation(c: impl Into<ColorArg>) -> f32 {
    color(c).to_hsb().1
}

pub fn brightness(c: impl Into<ColorArg>) -> f32 {
    color(c).to_hsb().2
}

// Shapes

pub fn rect(x: f32, y: f32, w: f32, h: f32) {
    with_surface("rect", (), |s| s.rect(x, y, w, h));
}

pub fn square(x: f32, y: f32, size: f32) {
    with_surface("square", (), |s| s.rect(x, y, size, size));
}

/// Centered at `x, y`.
pub fn ellipse(x: f32, y: f32, w: f32, h: f32) {
    with_surface("ellipse", (), |s| s.ellipse(x, y, w, h));
}

pub fn circle(x: f32, y: f32, diameter: f32) {
    with_surface("circle", (), |s| s.ellipse(x, y, diameter, diameter));
}

pub fn line(x1: f32, y1: f32, x2: f32, y2: f32) {
    with_surface("line", (), |s| s.line(x1, y1, x2, y2));
}

pub fn point(x: f32, y: f32) {
    with_surface("point", (), |s| s.point(x, y));
}

pub fn triangle(x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
    with_surface("triangle", (), |s| s.triangle(x1, y1, x2, y2, x3, y3));
}

pub fn text(content: impl Display, x: f32, y: f32) {
    let content = content.to_string();
    with_surface("text", (), |s| s.text(content, x, y));
}

// Transforms

pub fn push() {
    with_surface("push", (), |s| s.push());
}

pub fn pop() {
    with_surface("pop", (), |s| s.pop());
}

pub fn translate(x: f32, y: f32) {
    with_surface("translate", (), |s| s.translate(x, y));
}

pub fn rotate(radians: f32) {
    with_surface("rotate", (), |s| s.rotate(radians));
}

pub fn scale(factor: f32) {
    with_surface("scale", (), |s| s.scale(factor, factor));
}

pub fn scale_xy(sx: f32, sy: f32) {
    with_surface("scale_xy", (), |s| s.scale(sx, sy));
}

// Canvas and loop

pub fn resize_canvas(w: u32, h: u32) {
    with_surface("resize_canvas", (), |s| s.resize(w, h));
}

pub fn no_loop() {
    with_surface("no_loop", (), |s| s.set_looping(false));
}

pub fn start_loop() {
    with_surface("start_loop", (), |s| s.set_looping(true));
}

pub fn is_looping() -> bool {
    with_surface("is_looping", false, |s| s.is_looping())
}

// Random

/// Uniform in `[lo, hi)`; bounds may come in either order. Returns the
/// smaller bound when nothing is active.
pub fn random(lo: f32, hi: f32) -> f32 {
    with_surface("random", lo.min(hi), |s| s.random(lo, hi))
}

pub fn random_seed(seed: u64) {
    with_surface("random_seed", (), |s| s.random_seed(seed));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::Shape;
    use crate::runtime::input::InputEvent;
    use crate::runtime::readiness::Generation;
    use crate::sketch::SurfaceSize;

    fn bound_surface(w: u32, h: u32) -> (SurfaceHandle, Generation) {
        let generation = Generation::new();
        let surface = Surface::new(SurfaceSize::new(w, h)).into_handle();
        rebind(&surface, generation.advance());
        (surface, generation)
    }

    #[test]
    fn unbound_primitives_are_noops() {
        unbind();
        assert!(!is_bound());
        assert_eq!(width(), 0.0);
        assert_eq!(pointer_x(), 0.0);
        assert_eq!(key(), None);
        assert!(!is_looping());
        assert_eq!(random(5.0, 2.0), 2.0);
        assert!(activation_token().is_none());
        background(0.0);
        circle(1.0, 1.0, 1.0);
        text("ignored", 0.0, 0.0);
    }

    #[test]
    fn reads_track_the_live_surface() {
        let (surface, _generation) = bound_surface(40, 30);
        assert_eq!(width(), 40.0);
        assert_eq!(height(), 30.0);

        surface
            .borrow_mut()
            .apply_input(&InputEvent::PointerMoved { x: 3.0, y: 4.0 });
        surface
            .borrow_mut()
            .apply_input(&InputEvent::PointerPressed { x: 5.0, y: 6.0 });
        assert_eq!((pointer_x(), pointer_y()), (5.0, 6.0));
        assert_eq!((prev_pointer_x(), prev_pointer_y()), (3.0, 4.0));
        assert!(pointer_is_pressed());

        resize_canvas(10, 12);
        assert_eq!(width(), 10.0);
        assert_eq!(surface.borrow().height(), 12);
        unbind();
    }

    #[test]
    fn drawing_records_commands() {
        let (surface, _generation) = bound_surface(20, 20);
        fill((255.0, 0.0, 0.0));
        square(1.0, 2.0, 3.0);
        text_size(18.0);
        text_align(TextAlign::Center);
        text(42, 5.0, 5.0);

        let surface = surface.borrow();
        let commands = surface.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[0].shape,
            Shape::Rect {
                x: 1.0,
                y: 2.0,
                w: 3.0,
                h: 3.0
            }
        );
        assert!(matches!(
            &commands[1].shape,
            Shape::Text { content, size, align, .. }
                if content == "42"
                    && *size == 18.0
                    && *align == TextAlign::Center
        ));
        drop(surface);
        unbind();
    }

    #[test]
    fn color_values_follow_the_color_mode() {
        let (_surface, _generation) = bound_surface(4, 4);
        assert_eq!(red((10.0, 20.0, 30.0)), 10.0);
        assert_eq!(alpha((10.0, 20.0, 30.0, 40.0)), 40.0);

        color_mode(ColorMode::Hsb);
        assert_eq!(color((120.0, 100.0, 100.0)).to_rgba8(), [0, 255, 0, 255]);
        assert!((hue((200.0, 50.0, 80.0)) - 200.0).abs() < 0.1);
        assert!((saturation((200.0, 50.0, 80.0)) - 50.0).abs() < 0.1);
        assert!((brightness((200.0, 50.0, 80.0)) - 80.0).abs() < 0.1);

        color_mode(ColorMode::Rgb);
        let mid = lerp_color(0.0, (200.0, 100.0, 50.0), 0.5);
        assert_eq!(mid, Color::rgb(100.0, 50.0, 25.0));
        assert_eq!((green(mid), blue(mid)), (50.0, 25.0));
        unbind();
    }

    #[test]
    fn scale_xy_stretches_each_axis() {
        let (surface, _generation) = bound_surface(20, 20);
        no_stroke();
        fill(255.0);
        scale_xy(4.0, 1.0);
        rect(0.0, 0.0, 2.0, 2.0);

        let surface = surface.borrow();
        assert_eq!(surface.pixel(6, 1), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(1, 6), Some([0, 0, 0, 0]));
        drop(surface);
        unbind();
    }

    #[test]
    fn seeded_random_is_repeatable() {
        let (_surface, _generation) = bound_surface(4, 4);
        random_seed(7);
        let first: Vec<f32> = (0..4).map(|_| random(0.0, 10.0)).collect();
        random_seed(7);
        let second: Vec<f32> = (0..4).map(|_| random(0.0, 10.0)).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|v| (0.0..10.0).contains(v)));
        unbind();
    }

    #[test]
    fn unbinding_another_surface_keeps_binding() {
        let (surface, _generation) = bound_surface(4, 4);
        let other = Surface::new(SurfaceSize::new(2, 2)).into_handle();

        unbind_surface(&other);
        assert!(is_bound());

        unbind_surface(&surface);
        assert!(!is_bound());
        assert_eq!(Rc::strong_count(&surface), 1);
    }

    #[test]
    fn rebinding_same_surface_refreshes_token() {
        let (surface, generation) = bound_surface(4, 4);
        let token = generation.advance();
        rebind(&surface, token.clone());

        assert_eq!(activation_token(), Some(token));
        assert_eq!(Rc::strong_count(&surface), 2);
        unbind();
    }

    #[test]
    fn loop_flag() {
        let (_surface, _generation) = bound_surface(4, 4);
        assert!(is_looping());
        no_loop();
        assert!(!is_looping());
        start_loop();
        assert!(is_looping());
        unbind();
    }
}
