/// 2D affine transform `[a c e; b d f; 0 0 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// `self * other`: `other` applies first, matching how successive
    /// `translate`/`rotate`/`scale` calls compose.
    fn then(self, other: Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn translate(self, x: f32, y: f32) -> Self {
        self.then(Self {
            e: x,
            f: y,
            ..Self::IDENTITY
        })
    }

    pub fn rotate(self, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        self.then(Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        })
    }

    pub fn scale(self, sx: f32, sy: f32) -> Self {
        self.then(Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        })
    }

    pub fn apply(&self, x: f32, y: f32) -> [f32; 2] {
        [
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        ]
    }

    /// Uniform scale factor used for stroke widths.
    pub fn mean_scale(&self) -> f32 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;
    use crate::util::HALF_PI;

    #[test]
    fn transforms_compose_in_call_order() {
        let t = Affine::IDENTITY.translate(10.0, 0.0).rotate(HALF_PI);
        let [x, y] = t.apply(5.0, 0.0);
        assert_approx_eq!(x, 10.0);
        assert_approx_eq!(y, 5.0);

        let t = Affine::IDENTITY.scale(2.0, 3.0).translate(1.0, 1.0);
        assert_eq!(t.apply(0.0, 0.0), [2.0, 3.0]);
    }

    #[test]
    fn mean_scale_ignores_rotation() {
        let t = Affine::IDENTITY.rotate(1.0).scale(2.0, 2.0);
        assert_approx_eq!(t.mean_scale(), 2.0);
    }
}
