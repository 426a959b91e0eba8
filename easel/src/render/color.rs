/// An RGBA color with channels in `0.0..=255.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(255.0, 255.0, 255.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 255.0)
    }

    pub const fn gray(v: f32) -> Self {
        Self::rgb(v, v, v)
    }

    /// Hue in degrees `0..360`, saturation and brightness in `0..=100`,
    /// alpha in `0..=255`.
    pub fn from_hsb(h: f32, s: f32, v: f32, a: f32) -> Self {
        let h = h.rem_euclid(360.0) / 60.0;
        let s = (s / 100.0).clamp(0.0, 1.0);
        let v = (v / 100.0).clamp(0.0, 1.0);

        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self::rgba((r + m) * 255.0, (g + m) * 255.0, (b + m) * 255.0, a)
    }

    /// Hue in degrees, saturation and brightness in `0..=100`.
    pub fn to_hsb(self) -> (f32, f32, f32) {
        let (r, g, b) = (self.r / 255.0, self.g / 255.0, self.b / 255.0);
        let max = r.max(g).max(b);
        let delta = max - r.min(g).min(b);

        let h = if delta <= 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let s = if max <= 0.0 { 0.0 } else { delta / max * 100.0 };

        (h, s, max * 100.0)
    }

    /// Channel-wise blend in RGB space, `t` clamped to `0..=1`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let channel = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ColorMode {
    #[default]
    Rgb,
    Hsb,
}

/// Color arguments as sketches write them: a gray level, a gray level with
/// alpha, three or four channels, or an already resolved [`Color`]. Channels
/// are interpreted according to the surface's current [`ColorMode`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorArg {
    Gray(f32, f32),
    Channels(f32, f32, f32, f32),
    Resolved(Color),
}

impl ColorArg {
    pub fn resolve(self, mode: ColorMode) -> Color {
        match (self, mode) {
            (Self::Resolved(color), _) => color,
            (Self::Gray(v, a), ColorMode::Rgb) => Color::gray(v).with_alpha(a),
            (Self::Gray(v, a), ColorMode::Hsb) => {
                Color::from_hsb(0.0, 0.0, v, a)
            }
            (Self::Channels(r, g, b, a), ColorMode::Rgb) => {
                Color::rgba(r, g, b, a)
            }
            (Self::Channels(h, s, v, a), ColorMode::Hsb) => {
                Color::from_hsb(h, s, v, a)
            }
        }
    }
}

impl From<f32> for ColorArg {
    fn from(v: f32) -> Self {
        Self::Gray(v, 255.0)
    }
}

impl From<(f32, f32)> for ColorArg {
    fn from((v, a): (f32, f32)) -> Self {
        Self::Gray(v, a)
    }
}

impl From<(f32, f32, f32)> for ColorArg {
    fn from((r, g, b): (f32, f32, f32)) -> Self {
        Self::Channels(r, g, b, 255.0)
    }
}

impl From<(f32, f32, f32, f32)> for ColorArg {
    fn from((r, g, b, a): (f32, f32, f32, f32)) -> Self {
        Self::Channels(r, g, b, a)
    }
}

impl From<Color> for ColorArg {
    fn from(color: Color) -> Self {
        Self::Resolved(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsb_primaries() {
        assert_eq!(
            Color::from_hsb(0.0, 100.0, 100.0, 255.0).to_rgba8(),
            [255, 0, 0, 255]
        );
        assert_eq!(
            Color::from_hsb(120.0, 100.0, 100.0, 255.0).to_rgba8(),
            [0, 255, 0, 255]
        );
        assert_eq!(
            Color::from_hsb(240.0, 100.0, 100.0, 128.0).to_rgba8(),
            [0, 0, 255, 128]
        );
        assert_eq!(
            Color::from_hsb(360.0, 0.0, 50.0, 255.0).to_rgba8(),
            [128, 128, 128, 255]
        );
    }

    #[test]
    fn color_args_follow_mode() {
        let arg = ColorArg::from((0.0, 100.0, 100.0));
        assert_eq!(arg.resolve(ColorMode::Rgb), Color::rgb(0.0, 100.0, 100.0));
        assert_eq!(arg.resolve(ColorMode::Hsb).to_rgba8(), [255, 0, 0, 255]);

        let gray = ColorArg::from((220.0, 10.0));
        assert_eq!(
            gray.resolve(ColorMode::Rgb),
            Color::rgba(220.0, 220.0, 220.0, 10.0)
        );
    }

    #[test]
    fn hsb_round_trips_through_rgb() {
        let (h, s, v) = Color::rgb(255.0, 128.0, 0.0).to_hsb();
        assert!((h - 30.1).abs() < 0.2);
        assert!((s - 100.0).abs() < 0.01);
        assert!((v - 100.0).abs() < 0.01);

        let back = Color::from_hsb(h, s, v, 255.0).to_rgba8();
        assert_eq!(back, [255, 128, 0, 255]);
        assert_eq!(Color::gray(128.0).to_hsb().1, 0.0);
    }

    #[test]
    fn lerp_blends_channels_and_clamps() {
        let a = Color::rgba(0.0, 100.0, 200.0, 0.0);
        let b = Color::rgba(100.0, 100.0, 0.0, 255.0);
        assert_eq!(a.lerp(b, 0.5), Color::rgba(50.0, 100.0, 100.0, 127.5));
        assert_eq!(a.lerp(b, -1.0), a);
        assert_eq!(a.lerp(b, 3.0), b);
    }

    #[test]
    fn to_rgba8_clamps() {
        assert_eq!(Color::rgba(-4.0, 300.0, 10.4, 10.6).to_rgba8(), [
            0, 255, 10, 11
        ]);
    }
}
