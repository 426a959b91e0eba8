use easel::prelude::*;

pub static SKETCH_CONFIG: SketchConfig = SketchConfig::new("runner", "Urban Glide")
    .description(
        "Side-scrolling runner. Space or click to jump, R to reverse the \
         skyline, S to sort it by area, +/- to change speed.",
    )
    .size(800, 400);

const GROUND_Y: f32 = 320.0;
const GRAVITY: f32 = 0.6;
const JUMP_VELOCITY: f32 = -12.0;
const BUILDING_COUNT: usize = 12;

#[derive(Clone, Debug)]
struct Building {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    color: (f32, f32, f32),
}

impl Building {
    fn random_at(x: f32) -> Self {
        let w = random(30.0, 80.0);
        let h = random(80.0, 200.0);
        Self {
            x,
            y: GROUND_Y - h,
            w,
            h,
            color: (
                random(50.0, 150.0),
                random(50.0, 150.0),
                random(100.0, 200.0),
            ),
        }
    }

    fn area(&self) -> f32 {
        self.w * self.h
    }

    fn right(&self) -> f32 {
        self.x + self.w
    }
}

#[derive(Debug)]
struct Player {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    vy: f32,
    grounded: bool,
    stride: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: 100.0,
            y: GROUND_Y - 40.0,
            w: 30.0,
            h: 40.0,
            vy: 0.0,
            grounded: true,
            stride: 0.0,
        }
    }
}

impl Player {
    fn jump(&mut self) {
        if self.grounded {
            self.vy = JUMP_VELOCITY;
            self.grounded = false;
        }
    }

    fn update(&mut self) {
        if !self.grounded {
            self.vy += GRAVITY;
            self.y += self.vy;
            if self.y + self.h >= GROUND_Y {
                self.y = GROUND_Y - self.h;
                self.vy = 0.0;
                self.grounded = true;
            }
        }

        self.stride += 0.3;
        if self.stride > 8.0 {
            self.stride = 0.0;
        }
    }

    fn draw(&self) {
        push();
        translate(self.x + self.w / 2.0, self.y + self.h / 2.0);

        let (bob, leg) = if self.grounded {
            (self.stride.sin() * 2.0, (self.stride * 2.0).sin() * 5.0)
        } else {
            (0.0, 0.0)
        };

        no_stroke();
        fill((255.0, 200.0, 150.0));
        circle(0.0, -15.0 + bob, 12.0);
        fill((0.0, 255.0, 136.0));
        ellipse(0.0, bob, 10.0, 16.0);

        stroke((255.0, 200.0, 150.0));
        stroke_weight(2.0);
        line(0.0, -5.0 + bob, -8.0, 5.0 + bob);
        line(0.0, -5.0 + bob, 8.0, 5.0 + bob);

        stroke((0.0, 255.0, 136.0));
        stroke_weight(3.0);
        if self.grounded {
            line(0.0, 8.0 + bob, -5.0 + leg, 18.0);
            line(0.0, 8.0 + bob, 5.0 - leg, 18.0);
        } else {
            line(0.0, 8.0, -3.0, 15.0);
            line(0.0, 8.0, 3.0, 15.0);
        }

        pop();
    }
}

pub struct Runner {
    buildings: Vec<Building>,
    player: Player,
    speed: f32,
    score: f32,
}

pub fn init() -> Runner {
    Runner {
        buildings: Vec::new(),
        player: Player::default(),
        speed: 5.0,
        score: 0.0,
    }
}

impl Runner {
    fn scroll(&mut self) {
        for building in &mut self.buildings {
            building.x -= self.speed;
        }

        let before = self.buildings.len();
        self.buildings.retain(|b| b.right() >= 0.0);

        for _ in self.buildings.len()..before {
            let rightmost = self
                .buildings
                .iter()
                .map(Building::right)
                .fold(width(), f32::max);
            let building = Building::random_at(rightmost + random(30.0, 80.0));
            self.buildings.push(building);
        }
    }

    fn draw_skyline(&self) {
        for (i, b) in self.buildings.iter().enumerate() {
            fill(b.color);
            stroke((255.0, 100.0));
            rect(b.x, b.y, b.w, b.h);

            fill((255.0, 255.0, 100.0, 150.0));
            let mut wx = 10.0;
            while wx < b.w - 10.0 {
                let mut wy = 10.0;
                while wy < b.h - 10.0 {
                    if random(0.0, 1.0) > 0.6 {
                        rect(b.x + wx, b.y + wy, 6.0, 6.0);
                    }
                    wy += 20.0;
                }
                wx += 15.0;
            }

            fill((255.0, 150.0));
            text_align(TextAlign::Center);
            text(
                format!("#{} {}", i + 1, b.area() as i64),
                b.x + b.w / 2.0,
                b.y + b.h / 2.0,
            );
        }
    }
}

impl Sketch for Runner {
    fn init(&mut self) -> SketchResult {
        self.buildings = (0..BUILDING_COUNT)
            .map(|i| Building::random_at(i as f32 * 70.0 + width()))
            .collect();
        Ok(())
    }

    fn frame(&mut self) -> SketchResult {
        background((25.0, 25.0, 50.0));

        fill((255.0, 200.0));
        no_stroke();
        for i in 0..30 {
            let x = (i as f32 * 27.0 + self.score * 0.1) % width();
            let y = (i as f32 * 13.0) % 150.0;
            circle(x, y, 2.0);
        }

        self.scroll();
        self.draw_skyline();

        self.player.update();
        self.score += self.speed * 0.1;
        self.player.draw();

        no_stroke();
        fill((60.0, 60.0, 60.0));
        rect(0.0, GROUND_Y, width(), height());

        fill(255.0);
        text_align(TextAlign::Left);
        text(
            format!(
                "Score: {} | Speed: {} | Buildings: {}",
                self.score as i64,
                self.speed,
                self.buildings.len()
            ),
            10.0,
            20.0,
        );
        text(
            format!(
                "Player Y: {} | Grounded: {}",
                self.player.y as i64, self.player.grounded
            ),
            10.0,
            40.0,
        );

        Ok(())
    }

    fn pointer_pressed(&mut self) -> SketchResult {
        self.player.jump();
        Ok(())
    }

    fn key_pressed(&mut self) -> SketchResult {
        let Some(key) = key() else {
            return Ok(());
        };

        if key == Key::Char(' ') {
            self.player.jump();
        } else if key.is('r') {
            self.buildings.reverse();
            debug!("skyline reversed");
        } else if key.is('s') {
            self.buildings.sort_by(|a, b| a.area().total_cmp(&b.area()));
            debug!("skyline sorted by area");
        } else if key.is('+') || key.is('=') {
            self.speed = (self.speed + 0.5).min(8.0);
        } else if key.is('-') {
            self.speed = (self.speed - 0.5).max(1.0);
        }
        Ok(())
    }
}
