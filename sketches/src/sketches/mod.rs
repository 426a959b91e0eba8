use easel::prelude::*;

pub mod basic_shapes;
pub mod bouncing_ball;
pub mod dungeon_tiles;
pub mod object_detector;
pub mod pattern_generator;
pub mod runner;
pub mod text_analyzer;

pub fn registry() -> Result<Registry, RegistrationError> {
    easel::register_sketches![
        basic_shapes,
        bouncing_ball,
        pattern_generator,
        runner,
        text_analyzer,
        object_detector,
        dungeon_tiles,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel::runtime::controller::TickOutcome;

    #[test]
    fn every_sketch_registers_cleanly() {
        let registry = registry().unwrap();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.first_sketch_name(), Some("basic_shapes"));
    }

    #[test]
    fn every_sketch_survives_a_short_session() {
        let registry = registry().unwrap();
        let names: Vec<&'static str> =
            registry.list().iter().map(|d| d.name()).collect();
        let mut controller = Controller::new(registry);

        let inputs = [
            InputEvent::PointerMoved { x: 40.0, y: 50.0 },
            InputEvent::PointerPressed { x: 40.0, y: 50.0 },
            InputEvent::PointerReleased { x: 40.0, y: 50.0 },
            InputEvent::KeyPressed(Key::Char(' ')),
            InputEvent::KeyPressed(Key::Char('d')),
            InputEvent::KeyPressed(Key::Char('j')),
            InputEvent::KeyPressed(Key::Char('s')),
            InputEvent::KeyPressed(Key::Char('p')),
            InputEvent::KeyPressed(Key::ArrowDown),
            InputEvent::KeyPressed(Key::ArrowRight),
        ];

        for name in names {
            controller.activate(name).unwrap();
            for frame in 0..30 {
                let outcome = controller.tick();
                assert_ne!(outcome, TickOutcome::Failed, "{} frame {}", name, frame);
                if let Some(event) = inputs.get(frame) {
                    controller.dispatch(*event);
                }
            }
            assert!(!controller.active().unwrap().degraded, "{}", name);
        }

        let stats = controller.stats();
        assert_eq!(stats.frame_failures(), 0);
        assert_eq!(stats.handler_failures(), 0);
        assert_eq!(stats.lifecycle_failures(), 0);
    }
}
