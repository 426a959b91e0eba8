use std::thread;
use std::time::Duration;

use easel::prelude::*;

pub static SKETCH_CONFIG: SketchConfig =
    SketchConfig::new("object_detector", "Observant Shopper")
        .description(
            "A simulated camera feed whose detections fill a shopping list. \
             P cycles the confidence preset, C clears the list.",
        )
        .size(800, 500);

const CATEGORIES: &[&str] = &[
    "apple", "banana", "orange", "bottle", "cup", "broccoli", "carrot",
    "sandwich", "pizza", "donut", "cake", "wine glass", "bowl", "book",
];

const DETECT_EVERY: u64 = 10;
const ECHO_LIMIT: usize = 5;
const FEED_X: f32 = 20.0;
const FEED_Y: f32 = 60.0;
const FEED_W: f32 = 480.0;
const FEED_H: f32 = 360.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Preset {
    Default,
    Sensitive,
    Cautious,
}

impl Preset {
    pub fn threshold(self) -> f32 {
        match self {
            Self::Default => 0.5,
            Self::Sensitive => 0.35,
            Self::Cautious => 0.8,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Default => Self::Sensitive,
            Self::Sensitive => Self::Cautious,
            Self::Cautious => Self::Default,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Sensitive => "Sensitive",
            Self::Cautious => "Cautious",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub label: &'static str,
    pub confidence: f32,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Items seen so far, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShoppingList {
    items: Vec<(&'static str, u32)>,
}

impl ShoppingList {
    /// Returns `true` if `label` was new to the list.
    pub fn add(&mut self, label: &'static str) -> bool {
        match self.items.iter_mut().find(|(item, _)| *item == label) {
            Some((_, count)) => {
                *count += 1;
                false
            }
            None => {
                self.items.push((label, 1));
                true
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, u32)> {
        self.items.iter()
    }
}

/// Keeps detections at or above `threshold`.
pub fn accept(detections: Vec<Detection>, threshold: f32) -> Vec<Detection> {
    detections
        .into_iter()
        .filter(|d| d.confidence >= threshold)
        .collect()
}

struct Model {
    categories: &'static [&'static str],
}

struct Camera {
    w: f32,
    h: f32,
}

struct Explosion {
    x: f32,
    y: f32,
    radius: f32,
    alpha: f32,
}

pub struct ObjectDetector {
    model: Option<Deferred<Model>>,
    camera: Option<Deferred<Camera>>,
    preset: Preset,
    list: ShoppingList,
    current: Vec<Detection>,
    echoes: Vec<Detection>,
    explosions: Vec<Explosion>,
}

pub fn init() -> ObjectDetector {
    ObjectDetector {
        model: None,
        camera: None,
        preset: Preset::Default,
        list: ShoppingList::default(),
        current: Vec::new(),
        echoes: Vec::new(),
        explosions: Vec::new(),
    }
}

impl ObjectDetector {
    fn status(&mut self) -> &'static str {
        let model_ready = self.model.as_mut().is_some_and(Deferred::is_ready);
        let camera_ready = self.camera.as_mut().is_some_and(Deferred::is_ready);
        match (model_ready, camera_ready) {
            (true, true) => "Detecting",
            (false, _) => "Loading model...",
            (true, false) => "Starting camera...",
        }
    }

    fn detect(&mut self) {
        let (Some(model), Some(camera)) = (
            self.model.as_mut().and_then(Deferred::poll),
            self.camera.as_mut().and_then(Deferred::poll),
        ) else {
            return;
        };

        let categories = model.categories;
        let (cw, ch) = (camera.w, camera.h);
        let candidates = (0..random(0.0, 4.0) as usize)
            .map(|_| {
                let index = random(0.0, categories.len() as f32) as usize;
                let w = random(40.0, 120.0);
                let h = random(40.0, 120.0);
                Detection {
                    label: categories[index.min(categories.len() - 1)],
                    confidence: random(0.2, 1.0),
                    x: random(0.0, cw - w),
                    y: random(0.0, ch - h),
                    w,
                    h,
                }
            })
            .collect();

        self.current = accept(candidates, self.preset.threshold());
        for detection in &self.current {
            if self.list.add(detection.label) {
                info!(
                    "added {} ({:.0}%)",
                    detection.label,
                    detection.confidence * 100.0
                );
                self.explosions.push(Explosion {
                    x: FEED_X + detection.x + detection.w / 2.0,
                    y: FEED_Y + detection.y + detection.h / 2.0,
                    radius: 10.0,
                    alpha: 255.0,
                });
            }
            self.echoes.push(detection.clone());
        }
        let overflow = self.echoes.len().saturating_sub(ECHO_LIMIT);
        self.echoes.drain(..overflow);
    }

    fn draw_feed(&self) {
        fill(30.0);
        stroke(80.0);
        stroke_weight(2.0);
        rect(FEED_X, FEED_Y, FEED_W, FEED_H);

        no_fill();
        for (i, echo) in self.echoes.iter().enumerate() {
            let alpha = 40.0 + 30.0 * i as f32;
            stroke((120.0, 120.0, 255.0, alpha));
            rect(FEED_X + echo.x, FEED_Y + echo.y, echo.w, echo.h);
        }

        text_align(TextAlign::Left);
        for detection in &self.current {
            no_fill();
            stroke((0.0, 255.0, 120.0));
            stroke_weight(2.0);
            rect(
                FEED_X + detection.x,
                FEED_Y + detection.y,
                detection.w,
                detection.h,
            );
            no_stroke();
            fill((0.0, 255.0, 120.0));
            text_size(12.0);
            text(
                format!(
                    "{} {:.0}%",
                    detection.label,
                    detection.confidence * 100.0
                ),
                FEED_X + detection.x + 4.0,
                FEED_Y + detection.y - 6.0,
            );
        }
    }

    fn draw_list(&self) {
        let x = FEED_X + FEED_W + 30.0;
        no_stroke();
        fill(255.0);
        text_size(20.0);
        text_align(TextAlign::Left);
        text("Shopping List", x, FEED_Y + 10.0);

        text_size(14.0);
        if self.list.is_empty() {
            fill(150.0);
            text("Nothing spotted yet", x, FEED_Y + 40.0);
        }
        for (i, (item, count)) in self.list.iter().enumerate() {
            fill(220.0);
            text(
                format!("{} x{}", item, count),
                x,
                FEED_Y + 40.0 + i as f32 * 22.0,
            );
        }
    }

    fn draw_explosions(&mut self) {
        no_fill();
        stroke_weight(3.0);
        for e in &mut self.explosions {
            stroke((255.0, 200.0, 0.0, e.alpha));
            circle(e.x, e.y, e.radius * 2.0);
            e.radius += 3.0;
            e.alpha -= 12.0;
        }
        self.explosions.retain(|e| e.alpha > 0.0);
    }
}

impl Sketch for ObjectDetector {
    fn init(&mut self) -> SketchResult {
        let token = activation_token()
            .ok_or_else(|| anyhow::anyhow!("no active surface to load into"))?;

        self.model = Some(Deferred::spawn("model", token.clone(), || {
            thread::sleep(Duration::from_millis(300));
            Model {
                categories: CATEGORIES,
            }
        }));
        self.camera = Some(Deferred::spawn("camera", token, || {
            thread::sleep(Duration::from_millis(150));
            Camera {
                w: FEED_W,
                h: FEED_H,
            }
        }));
        Ok(())
    }

    fn frame(&mut self) -> SketchResult {
        background((15.0, 15.0, 25.0));

        let status = self.status();
        if status == "Detecting" && frame_count() % DETECT_EVERY == 0 {
            self.detect();
        }

        self.draw_feed();
        self.draw_list();
        self.draw_explosions();

        no_stroke();
        fill(200.0);
        text_size(14.0);
        text_align(TextAlign::Left);
        text(
            format!(
                "{} | preset: {} ({:.2})",
                status,
                self.preset.label(),
                self.preset.threshold()
            ),
            FEED_X,
            FEED_Y + FEED_H + 30.0,
        );

        fill((255.0, 220.0, 100.0));
        text_size(26.0);
        text("Observant Shopper", FEED_X, 35.0);
        Ok(())
    }

    fn key_pressed(&mut self) -> SketchResult {
        match key().and_then(|k| k.as_char()).map(|c| c.to_ascii_lowercase()) {
            Some('p') => {
                self.preset = self.preset.next();
                self.list.clear();
                self.echoes.clear();
                info!("switched to the {} preset", self.preset.label());
            }
            Some('c') => {
                self.list.clear();
                self.echoes.clear();
                info!("cleared the shopping list");
            }
            _ => {}
        }
        Ok(())
    }

    fn teardown(&mut self) -> SketchResult {
        self.model = None;
        self.camera = None;
        debug!("released {} list item(s)", self.list.len());
        Ok(())
    }
}
