use easel::prelude::*;

pub static SKETCH_CONFIG: SketchConfig =
    SketchConfig::new("basic_shapes", "Basic Shapes")
        .description("A line, a square, a circle and a rectangle, drawn once.")
        .size(400, 400);

pub struct BasicShapes;

pub fn init() -> BasicShapes {
    BasicShapes
}

impl Sketch for BasicShapes {
    fn init(&mut self) -> SketchResult {
        Ok(())
    }

    fn frame(&mut self) -> SketchResult {
        background(220.0);

        stroke(0.0);
        stroke_weight(2.0);
        line(0.0, 0.0, 100.0, 100.0);

        fill((150.0, 200.0, 255.0));
        square(100.0, 100.0, 50.0);

        fill((255.0, 150.0, 150.0));
        circle(200.0, 200.0, 25.0);

        fill((150.0, 255.0, 150.0));
        rect(10.0, 25.0, 50.0, 50.0);

        // Static image
        no_loop();
        Ok(())
    }

    fn pointer_pressed(&mut self) -> SketchResult {
        info!("clicked at ({}, {})", pointer_x(), pointer_y());
        Ok(())
    }

    fn key_pressed(&mut self) -> SketchResult {
        if let Some(key) = key() {
            info!("key pressed: {}", key);
        }
        Ok(())
    }
}
