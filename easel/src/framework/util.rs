use ahash::RandomState;
use std::any::Any;
use std::collections::HashMap as StdHashMap;

pub const PI: f32 = std::f32::consts::PI;
pub const TWO_PI: f32 = PI * 2.0;
pub const HALF_PI: f32 = PI / 2.0;

pub type HashMap<K, V> = StdHashMap<K, V, RandomState>;

/// Re-maps `value` from `[in_min, in_max]` onto `[out_min, out_max]` without
/// clamping. A zero-width input range maps everything to `out_min`.
pub fn map_range(
    value: f32,
    in_min: f32,
    in_max: f32,
    out_min: f32,
    out_max: f32,
) -> f32 {
    if in_max == in_min {
        return out_min;
    }
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}

/// Clamps `value` into `[min, max]`, accepting the bounds in either order.
pub fn constrain(value: f32, min: f32, max: f32) -> f32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    value.max(lo).min(hi)
}

pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

pub fn dist(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    (x2 - x1).hypot(y2 - y1)
}

pub fn radians(degrees: f32) -> f32 {
    degrees.to_radians()
}

pub fn degrees(radians: f32) -> f32 {
    radians.to_degrees()
}

/// Orders a range so that `min < max`, nudging equal bounds apart by an
/// epsilon so the result is always a valid half-open range.
pub fn safe_range(min: f32, max: f32) -> (f32, f32) {
    let a = min.min(max);
    let mut b = min.max(max);
    if a == b {
        b = a + f32::EPSILON.max(a.abs() * f32::EPSILON);
    }
    (a, b)
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
