use easel::prelude::*;

pub static SKETCH_CONFIG: SketchConfig =
    SketchConfig::new("pattern_generator", "Pattern Generator")
        .description("Rotating circular, grid, spiral and radial patterns.")
        .size(400, 400);

const ANIMATION_SPEED: f32 = 0.02;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Pattern {
    #[default]
    Circular,
    Grid,
    Spiral,
    Radial,
}

impl Pattern {
    const ALL: [Self; 4] = [Self::Circular, Self::Grid, Self::Spiral, Self::Radial];

    fn next(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Circular => "Circular",
            Self::Grid => "Grid",
            Self::Spiral => "Spiral",
            Self::Radial => "Radial",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Palette {
    #[default]
    Rainbow,
    CoolBlue,
    Warm,
    Monochrome,
}

impl Palette {
    fn name(self) -> &'static str {
        match self {
            Self::Rainbow => "Rainbow",
            Self::CoolBlue => "Cool Blue",
            Self::Warm => "Warm",
            Self::Monochrome => "Monochrome",
        }
    }

    fn apply(self, index: usize) {
        let i = index as f32;
        match self {
            Self::Rainbow => {
                color_mode(ColorMode::Hsb);
                let hue = (i * 30.0 + frame_count() as f32) % 360.0;
                fill((hue, 80.0, 90.0));
                stroke((hue, 80.0, 60.0));
            }
            Self::CoolBlue => {
                color_mode(ColorMode::Rgb);
                fill((100.0 + i * 20.0, 150.0 + i * 10.0, 255.0, 180.0));
                stroke((50.0 + i * 10.0, 100.0 + i * 5.0, 200.0));
            }
            Self::Warm => {
                color_mode(ColorMode::Rgb);
                fill((255.0, 150.0 - i * 10.0, 50.0 + i * 20.0, 180.0));
                stroke((200.0, 100.0 - i * 5.0, 30.0 + i * 10.0));
            }
            Self::Monochrome => {
                color_mode(ColorMode::Rgb);
                let gray = 100.0 + i * 15.0;
                fill((gray, gray, gray + 50.0, 180.0));
                stroke((gray - 30.0, gray - 30.0, gray));
            }
        }
        stroke_weight(2.0);
    }
}

pub struct PatternGenerator {
    pattern: Pattern,
    palette: Palette,
    shape_size: f32,
    spacing: f32,
    rotation: f32,
    speed: f32,
}

pub fn init() -> PatternGenerator {
    PatternGenerator {
        pattern: Pattern::default(),
        palette: Palette::default(),
        shape_size: 30.0,
        spacing: 40.0,
        rotation: 0.0,
        speed: ANIMATION_SPEED,
    }
}

impl PatternGenerator {
    fn shape(&self, size: f32) {
        match self.pattern {
            Pattern::Circular | Pattern::Spiral => circle(0.0, 0.0, size),
            Pattern::Grid => rect(-size / 2.0, -size / 2.0, size, size),
            Pattern::Radial => triangle(
                0.0,
                -size / 2.0,
                -size / 2.0,
                size / 2.0,
                size / 2.0,
                size / 2.0,
            ),
        }
    }

    fn place(&self, x: f32, y: f32, angle: f32, color_index: usize, size: f32) {
        push();
        translate(x, y);
        rotate(angle);
        self.palette.apply(color_index);
        self.shape(size);
        pop();
    }

    fn circular(&self) {
        let count = 8;
        let radius = 80.0;
        for i in 0..count {
            let angle = TWO_PI / count as f32 * i as f32 + self.rotation;
            self.place(
                angle.cos() * radius,
                angle.sin() * radius,
                self.rotation * 2.0,
                i,
                self.shape_size,
            );
        }
    }

    fn grid(&self) {
        let (cols, rows) = (6, 6);
        let start_x = -self.spacing * (cols - 1) as f32 / 2.0;
        let start_y = -self.spacing * (rows - 1) as f32 / 2.0;
        for i in 0..cols {
            for j in 0..rows {
                let phase = (i + j) as f32;
                self.place(
                    start_x + i as f32 * self.spacing,
                    start_y + j as f32 * self.spacing,
                    self.rotation + phase * 0.2,
                    i + j,
                    self.shape_size * (0.5 + (self.rotation + phase).sin() * 0.3),
                );
            }
        }
    }

    fn spiral(&self) {
        let points = 50;
        let max_radius = 120.0;
        for i in 0..points {
            let t = i as f32 / points as f32;
            let angle = t * TWO_PI * 3.0 + self.rotation;
            let radius = t * max_radius;
            self.place(
                angle.cos() * radius,
                angle.sin() * radius,
                angle,
                i,
                self.shape_size * (1.0 - t * 0.5),
            );
        }
    }

    fn radial(&self) {
        for ring in 0..4 {
            let radius = (ring + 1) as f32 * 40.0;
            let count = 8 + ring * 2;
            for i in 0..count {
                let angle = TWO_PI / count as f32 * i as f32
                    + self.rotation * (ring + 1) as f32;
                self.place(
                    angle.cos() * radius,
                    angle.sin() * radius,
                    angle + self.rotation,
                    ring * 10 + i,
                    self.shape_size * (1.0 - ring as f32 * 0.2),
                );
            }
        }
    }

    fn info(&self) {
        color_mode(ColorMode::Rgb);
        fill((255.0, 255.0, 255.0, 200.0));
        no_stroke();
        text_align(TextAlign::Left);
        text_size(12.0);

        let lines = [
            format!("Pattern: {}", self.pattern.name()),
            format!("Colors: {}", self.palette.name()),
            format!("Size: {}", self.shape_size.round()),
            String::new(),
            "1-4: pattern  Q/W/E/T: colors".to_string(),
            "+/-: size  Space: pause  R: reset".to_string(),
        ];
        for (i, line) in lines.iter().enumerate() {
            text(line, 10.0, 20.0 + i as f32 * 15.0);
        }
    }
}

impl Sketch for PatternGenerator {
    fn init(&mut self) -> SketchResult {
        *self = init();
        Ok(())
    }

    fn frame(&mut self) -> SketchResult {
        background((20.0, 25.0, 40.0));
        self.rotation += self.speed;

        push();
        translate(width() / 2.0, height() / 2.0);
        match self.pattern {
            Pattern::Circular => self.circular(),
            Pattern::Grid => self.grid(),
            Pattern::Spiral => self.spiral(),
            Pattern::Radial => self.radial(),
        }
        pop();

        self.info();
        Ok(())
    }

    fn pointer_pressed(&mut self) -> SketchResult {
        self.pattern = self.pattern.next();
        debug!("pattern changed to {}", self.pattern.name());
        Ok(())
    }

    fn key_pressed(&mut self) -> SketchResult {
        let Some(c) = key().and_then(|k| k.as_char()) else {
            return Ok(());
        };

        match c.to_ascii_lowercase() {
            '1'..='4' => {
                let index = c as usize - '1' as usize;
                self.pattern = Pattern::ALL[index];
            }
            'q' => self.palette = Palette::Rainbow,
            'w' => self.palette = Palette::CoolBlue,
            'e' => self.palette = Palette::Warm,
            't' => self.palette = Palette::Monochrome,
            '+' | '=' => self.shape_size = (self.shape_size + 5.0).min(60.0),
            '-' => self.shape_size = (self.shape_size - 5.0).max(10.0),
            ' ' => {
                self.speed = if self.speed > 0.0 { 0.0 } else { ANIMATION_SPEED };
            }
            'r' => *self = init(),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicking_cycles_patterns() {
        let mut pattern = Pattern::Circular;
        let mut seen = Vec::new();
        for _ in 0..4 {
            pattern = pattern.next();
            seen.push(pattern);
        }
        assert_eq!(
            seen,
            vec![
                Pattern::Grid,
                Pattern::Spiral,
                Pattern::Radial,
                Pattern::Circular
            ]
        );
    }
}
