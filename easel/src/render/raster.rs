use super::color::Color;

/// CPU RGBA8 pixel buffer with polygon fill and alpha blending.
///
/// Every shape is reduced to polygons before it gets here; coverage is
/// sampled once per pixel at the pixel center, so edges are aliased.
#[derive(Clone, Debug)]
pub struct Raster {
    w: u32,
    h: u32,
    pixels: Vec<u8>,
}

impl Raster {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            pixels: vec![0; w as usize * h as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.w || y >= self.h {
            return None;
        }
        let i = self.index(x as usize, y as usize);
        let px = &self.pixels[i..i + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn clear(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Even-odd scanline fill.
    pub fn fill_polygon(&mut self, points: &[[f32; 2]], color: Color) {
        if points.len() < 3 || color.a <= 0.0 {
            return;
        }

        let (min_y, max_y) = points.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), p| (lo.min(p[1]), hi.max(p[1])),
        );
        if !min_y.is_finite() || !max_y.is_finite() {
            return;
        }

        let y_start = min_y.floor().max(0.0) as u32;
        let y_end = max_y.ceil().min(self.h as f32).max(0.0) as u32;
        let mut crossings = Vec::with_capacity(points.len());

        for y in y_start..y_end {
            let sample_y = y as f32 + 0.5;
            crossings.clear();

            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                let spans = (a[1] <= sample_y && b[1] > sample_y)
                    || (b[1] <= sample_y && a[1] > sample_y);
                if spans {
                    let t = (sample_y - a[1]) / (b[1] - a[1]);
                    crossings.push(a[0] + t * (b[0] - a[0]));
                }
            }

            crossings.sort_by(f32::total_cmp);

            for span in crossings.chunks_exact(2) {
                let x_start = (span[0] - 0.5).ceil().max(0.0) as u32;
                let x_end = (span[1] - 0.5).ceil().min(self.w as f32).max(0.0)
                    as u32;
                for x in x_start..x_end {
                    self.blend(x, y, color);
                }
            }
        }
    }

    /// Strokes a segment as a quad `width` pixels thick.
    pub fn stroke_segment(
        &mut self,
        from: [f32; 2],
        to: [f32; 2],
        width: f32,
        color: Color,
    ) {
        let dx = to[0] - from[0];
        let dy = to[1] - from[1];
        let len = dx.hypot(dy);
        let half = (width / 2.0).max(0.5);

        if len <= f32::EPSILON {
            self.fill_polygon(&square_around(from, half), color);
            return;
        }

        let nx = -dy / len * half;
        let ny = dx / len * half;
        self.fill_polygon(
            &[
                [from[0] + nx, from[1] + ny],
                [to[0] + nx, to[1] + ny],
                [to[0] - nx, to[1] - ny],
                [from[0] - nx, from[1] - ny],
            ],
            color,
        );
    }

    pub fn stroke_polygon(
        &mut self,
        points: &[[f32; 2]],
        width: f32,
        color: Color,
    ) {
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            self.stroke_segment(*a, b, width, color);
        }
    }

    fn blend(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x as usize, y as usize);
        let src = color.to_rgba8();
        let alpha = src[3] as f32 / 255.0;

        if src[3] == 255 {
            self.pixels[i..i + 4].copy_from_slice(&src);
            return;
        }

        let dst = &mut self.pixels[i..i + 4];
        for c in 0..3 {
            dst[c] = (src[c] as f32 * alpha + dst[c] as f32 * (1.0 - alpha))
                .round() as u8;
        }
        let dst_alpha = dst[3] as f32 / 255.0;
        dst[3] = ((alpha + dst_alpha * (1.0 - alpha)) * 255.0).round() as u8;
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (y * self.w as usize + x) * 4
    }
}

fn square_around(center: [f32; 2], half: f32) -> [[f32; 2]; 4] {
    [
        [center[0] - half, center[1] - half],
        [center[0] + half, center[1] - half],
        [center[0] + half, center[1] + half],
        [center[0] - half, center[1] + half],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> [[f32; 2]; 4] {
        [[x, y], [x + w, y], [x + w, y + h], [x, y + h]]
    }

    #[test]
    fn fill_polygon_covers_pixel_centers_inside() {
        let mut raster = Raster::new(10, 10);
        raster.fill_polygon(&rect(2.0, 2.0, 3.0, 3.0), Color::WHITE);

        assert_eq!(raster.pixel(2, 2), Some([255, 255, 255, 255]));
        assert_eq!(raster.pixel(4, 4), Some([255, 255, 255, 255]));
        assert_eq!(raster.pixel(5, 5), Some([0, 0, 0, 0]));
        assert_eq!(raster.pixel(1, 2), Some([0, 0, 0, 0]));

        let filled = raster
            .pixels()
            .chunks_exact(4)
            .filter(|px| px[3] == 255)
            .count();
        assert_eq!(filled, 9);
    }

    #[test]
    fn fill_polygon_clips_to_bounds() {
        let mut raster = Raster::new(4, 4);
        raster.fill_polygon(&rect(-10.0, -10.0, 100.0, 100.0), Color::BLACK);

        assert!(raster.pixels().chunks_exact(4).all(|px| px[3] == 255));
        assert_eq!(raster.pixel(4, 0), None);
    }

    #[test]
    fn blend_mixes_translucent_colors() {
        let mut raster = Raster::new(1, 1);
        raster.clear(Color::WHITE);
        raster.fill_polygon(
            &rect(0.0, 0.0, 1.0, 1.0),
            Color::rgba(0.0, 0.0, 0.0, 127.5),
        );

        assert_eq!(raster.pixel(0, 0), Some([127, 127, 127, 255]));
    }

    #[test]
    fn stroke_segment_draws_horizontal_line() {
        let mut raster = Raster::new(10, 5);
        raster.stroke_segment([0.0, 2.5], [10.0, 2.5], 1.0, Color::WHITE);

        for x in 0..10 {
            assert_eq!(raster.pixel(x, 2), Some([255, 255, 255, 255]));
        }
        assert_eq!(raster.pixel(0, 1), Some([0, 0, 0, 0]));
        assert_eq!(raster.pixel(0, 3), Some([0, 0, 0, 0]));
    }
}
