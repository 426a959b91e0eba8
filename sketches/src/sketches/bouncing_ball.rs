use easel::prelude::*;

pub static SKETCH_CONFIG: SketchConfig =
    SketchConfig::new("bouncing_ball", "Bouncing Ball")
        .description("A ball bouncing off the walls, tethered to the pointer.")
        .size(400, 400);

const BALL_SIZE: f32 = 50.0;

pub struct BouncingBall {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    background: f32,
}

pub fn init() -> BouncingBall {
    BouncingBall {
        x: 200.0,
        y: 200.0,
        vx: 3.0,
        vy: 2.0,
        background: 100.0,
    }
}

impl BouncingBall {
    fn reset(&mut self) {
        self.x = width() / 2.0;
        self.y = height() / 2.0;
        self.vx = 3.0;
        self.vy = 2.0;
    }

    fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;

        let r = BALL_SIZE / 2.0;
        if self.x > width() - r || self.x < r {
            self.vx *= -1.0;
        }
        if self.y > height() - r || self.y < r {
            self.vy *= -1.0;
        }
    }
}

impl Sketch for BouncingBall {
    fn init(&mut self) -> SketchResult {
        self.reset();
        Ok(())
    }

    fn frame(&mut self) -> SketchResult {
        background(self.background);
        self.advance();

        fill((255.0, 100.0, 100.0, 150.0));
        stroke(255.0);
        stroke_weight(2.0);
        circle(self.x, self.y, BALL_SIZE);

        let (px, py) = (pointer_x(), pointer_y());
        stroke((255.0, 255.0, 100.0));
        stroke_weight(1.0);
        line(self.x, self.y, px, py);
        fill((255.0, 255.0, 100.0));
        no_stroke();
        circle(px, py, 10.0);

        fill(255.0);
        text_size(12.0);
        text(
            format!("Circle: ({}, {})", self.x as i32, self.y as i32),
            10.0,
            20.0,
        );
        text(format!("Pointer: ({}, {})", px, py), 10.0, 35.0);
        text(
            "Click: change color, Space: speed up, R: reset",
            10.0,
            height() - 10.0,
        );

        Ok(())
    }

    fn pointer_pressed(&mut self) -> SketchResult {
        self.background = random(50.0, 200.0);
        debug!("background changed to {}", self.background);
        Ok(())
    }

    fn key_pressed(&mut self) -> SketchResult {
        match key() {
            Some(Key::Char(' ')) => {
                self.vx *= 1.2;
                self.vy *= 1.2;
            }
            Some(k) if k.is('r') => self.reset(),
            _ => {}
        }
        Ok(())
    }
}
