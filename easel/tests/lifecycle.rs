mod support;

use easel::prelude::*;
use easel::runtime::controller::TickOutcome;
use easel::runtime::registry::RegistrationWarning;
use easel::sketch::{DEFAULT_SURFACE_SIZE, SurfaceSize};

use support::{Faults, Journal, recorders, register_recorder};

#[test]
fn activate_makes_sketch_active() {
    let journal = Journal::default();
    let registry = recorders(&journal, &[("a", 10, 10), ("b", 20, 20)]);
    let names: Vec<&'static str> =
        registry.list().iter().map(|d| d.name()).collect();
    let mut controller = Controller::new(registry);

    for name in names {
        controller.activate(name).unwrap();
        assert_eq!(controller.active().unwrap().name, name);
    }
}

#[test]
fn unknown_id_leaves_state_unchanged() {
    let journal = Journal::default();
    let mut controller =
        Controller::new(recorders(&journal, &[("a", 10, 10)]));
    controller.activate("a").unwrap();
    controller.tick();
    journal.clear();

    let err = controller.activate("missing").unwrap_err();
    assert_eq!(err, ActivationError::NotFound("missing".to_string()));

    let active = controller.active().unwrap();
    assert_eq!(active.name, "a");
    assert!(journal.entries().is_empty());
    assert_eq!(controller.with_surface(|s| s.frame_count()), Some(1));
}

#[test]
fn missing_on_empty_registry_stays_idle() {
    let mut controller = Controller::new(Registry::new());
    assert!(matches!(
        controller.activate("missing"),
        Err(ActivationError::NotFound(_))
    ));
    assert!(controller.active().is_none());
    assert!(controller.is_idle());
}

#[test]
fn teardown_runs_once_before_next_init() {
    let journal = Journal::default();
    let mut controller =
        Controller::new(recorders(&journal, &[("a", 10, 10), ("b", 10, 10)]));

    controller.activate("a").unwrap();
    controller.activate("b").unwrap();

    assert_eq!(journal.count("a:teardown"), 1);
    assert_eq!(journal.count("b:init"), 1);
    assert!(journal.position("a:teardown") < journal.position("b:init"));
    assert_eq!(journal.count("b:teardown"), 0);
}

#[test]
fn switching_resizes_the_surface() {
    let journal = Journal::default();
    let mut controller = Controller::new(recorders(
        &journal,
        &[("a", 100, 100), ("b", 50, 50)],
    ));

    controller.activate("a").unwrap();
    assert_eq!(controller.active().unwrap().size, SurfaceSize::new(100, 100));
    assert_eq!(
        controller.with_surface(|s| (s.width(), s.height())),
        Some((100, 100))
    );

    controller.activate("b").unwrap();
    assert_eq!(controller.active().unwrap().size, SurfaceSize::new(50, 50));
    assert!(journal.position("a:teardown") < journal.position("b:init"));

    // init already sees the new surface through the bridge.
    assert!(journal.entries().contains(&"b:size 50x50".to_string()));
}

#[test]
fn switched_away_sketch_gets_nothing_more() {
    let journal = Journal::default();
    let mut controller =
        Controller::new(recorders(&journal, &[("a", 10, 10), ("b", 10, 10)]));

    controller.activate("a").unwrap();
    controller.tick();
    controller.activate("b").unwrap();
    let before = journal.with_prefix("a:");

    controller.tick();
    controller.dispatch(InputEvent::PointerPressed { x: 1.0, y: 2.0 });
    controller.dispatch(InputEvent::KeyPressed(Key::Char('k')));

    assert_eq!(journal.with_prefix("a:"), before);
    assert_eq!(
        journal.with_prefix("b:"),
        vec![
            "b:init",
            "b:size 10x10",
            "b:frame 1",
            "b:pointer_pressed 1,2",
            "b:key_pressed k",
        ]
    );
}

#[test]
fn duplicate_registration_is_rejected_and_first_wins() {
    let journal = Journal::default();
    let mut registry = Registry::new();
    register_recorder(
        &mut registry,
        &journal,
        SketchConfig::new("x", "First").size(10, 10),
        Faults::default(),
    )
    .unwrap();

    let err = register_recorder(
        &mut registry,
        &journal,
        SketchConfig::new("x", "Second").size(30, 30),
        Faults::default(),
    )
    .unwrap_err();
    assert_eq!(err, RegistrationError::Duplicate("x".to_string()));

    let mut controller = Controller::new(registry);
    controller.activate("x").unwrap();
    let active = controller.active().unwrap();
    assert_eq!(active.display_name, "First");
    assert_eq!(active.size, SurfaceSize::new(10, 10));
}

#[test]
fn failed_frame_halts_until_activate() {
    let journal = Journal::default();
    let mut registry = recorders(&journal, &[("ok", 10, 10)]);
    register_recorder(
        &mut registry,
        &journal,
        SketchConfig::new("flaky", "Flaky").size(10, 10),
        Faults {
            frame_from: Some(2),
            ..Faults::default()
        },
    )
    .unwrap();
    let mut controller = Controller::new(registry);

    controller.activate("flaky").unwrap();
    assert_eq!(controller.tick(), TickOutcome::Rendered);
    assert_eq!(controller.tick(), TickOutcome::Failed);
    assert_eq!(controller.tick(), TickOutcome::Degraded);
    assert_eq!(journal.with_prefix("flaky:frame").len(), 2);
    assert!(controller.active().unwrap().degraded);

    // Reactivating the same sketch starts over with a fresh instance.
    controller.activate("flaky").unwrap();
    assert!(!controller.active().unwrap().degraded);
    assert_eq!(controller.tick(), TickOutcome::Rendered);
    assert_eq!(journal.count("flaky:init"), 2);

    controller.tick();
    controller.activate("ok").unwrap();
    assert_eq!(controller.tick(), TickOutcome::Rendered);
}

#[test]
fn panicking_frame_is_contained() {
    let journal = Journal::default();
    let mut registry = Registry::new();
    register_recorder(
        &mut registry,
        &journal,
        SketchConfig::new("boom", "Boom").size(10, 10),
        Faults {
            frame_from: Some(1),
            panic_in_frame: true,
            ..Faults::default()
        },
    )
    .unwrap();
    let mut controller = Controller::new(registry);

    controller.activate("boom").unwrap();
    assert_eq!(controller.tick(), TickOutcome::Failed);
    assert_eq!(controller.tick(), TickOutcome::Degraded);

    // The surface is not left borrowed by the unwound frame.
    assert_eq!(controller.with_surface(|s| s.frame_count()), Some(1));
    assert_eq!(width(), 10.0);
}

#[test]
fn failing_pointer_handler_does_not_block_keys() {
    let journal = Journal::default();
    let mut registry = Registry::new();
    register_recorder(
        &mut registry,
        &journal,
        SketchConfig::new("clumsy", "Clumsy").size(10, 10),
        Faults {
            pointer_pressed: true,
            ..Faults::default()
        },
    )
    .unwrap();
    let mut controller = Controller::new(registry);
    controller.activate("clumsy").unwrap();

    assert!(controller.dispatch(InputEvent::PointerPressed { x: 3.0, y: 4.0 }));
    assert!(controller.dispatch(InputEvent::KeyPressed(Key::Char('z'))));
    controller.tick();
    assert!(controller.dispatch(InputEvent::PointerPressed { x: 5.0, y: 6.0 }));
    assert!(controller.dispatch(InputEvent::KeyPressed(Key::Enter)));

    assert_eq!(
        journal.with_prefix("clumsy:key_pressed"),
        vec!["clumsy:key_pressed z", "clumsy:key_pressed enter"]
    );
    assert_eq!(controller.stats().handler_failures(), 2);
    assert!(!controller.active().unwrap().degraded);
}

#[test]
fn invalid_size_is_coerced_with_a_warning() {
    let journal = Journal::default();
    let mut registry = Registry::new();
    let registration = register_recorder(
        &mut registry,
        &journal,
        SketchConfig::new("x", "X").size(-5, 0),
        Faults::default(),
    )
    .unwrap();

    assert_eq!(
        registration.warnings,
        vec![RegistrationWarning::SurfaceSizeCoerced {
            requested: (Some(-5), Some(0)),
            applied: DEFAULT_SURFACE_SIZE,
        }]
    );

    let mut controller = Controller::new(registry);
    controller.activate("x").unwrap();
    assert_eq!(controller.active().unwrap().size, DEFAULT_SURFACE_SIZE);
}

#[test]
fn failing_teardown_and_init_do_not_block_switches() {
    let journal = Journal::default();
    let mut registry = Registry::new();
    register_recorder(
        &mut registry,
        &journal,
        SketchConfig::new("sticky", "Sticky").size(10, 10),
        Faults {
            teardown: true,
            ..Faults::default()
        },
    )
    .unwrap();
    register_recorder(
        &mut registry,
        &journal,
        SketchConfig::new("shaky", "Shaky").size(20, 20),
        Faults {
            init: true,
            ..Faults::default()
        },
    )
    .unwrap();
    let mut controller = Controller::new(registry);

    controller.activate("sticky").unwrap();
    controller.activate("shaky").unwrap();

    assert_eq!(controller.active().unwrap().name, "shaky");
    assert!(journal.position("sticky:teardown") < journal.position("shaky:init"));
    assert_eq!(controller.stats().lifecycle_failures(), 2);

    // A failed init still leaves the sketch ticking.
    assert_eq!(controller.tick(), TickOutcome::Rendered);
}

#[test]
fn no_loop_pauses_frames() {
    struct Still;

    impl Sketch for Still {
        fn init(&mut self) -> SketchResult {
            no_loop();
            Ok(())
        }

        fn frame(&mut self) -> SketchResult {
            Ok(())
        }

        fn key_pressed(&mut self) -> SketchResult {
            start_loop();
            Ok(())
        }
    }

    let mut registry = Registry::new();
    registry
        .register(&SketchConfig::new("still", "Still").size(5, 5), || {
            Box::new(Still)
        })
        .unwrap();
    let mut controller = Controller::new(registry);
    controller.activate("still").unwrap();

    assert_eq!(controller.tick(), TickOutcome::NotLooping);
    controller.dispatch(InputEvent::KeyPressed(Key::Char(' ')));
    assert_eq!(controller.tick(), TickOutcome::Rendered);
}

#[test]
fn events_report_activations_and_failures() {
    let journal = Journal::default();
    let mut registry = recorders(&journal, &[("a", 10, 10)]);
    register_recorder(
        &mut registry,
        &journal,
        SketchConfig::new("bad", "Bad").size(10, 10),
        Faults {
            frame_from: Some(1),
            ..Faults::default()
        },
    )
    .unwrap();

    let (event_tx, event_rx) = event_channel();
    let mut controller = Controller::with_events(registry, event_tx);
    controller.activate("a").unwrap();
    let _ = controller.activate("nope");
    controller.activate("bad").unwrap();
    controller.tick();

    let events: Vec<RuntimeEvent> = event_rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            RuntimeEvent::SketchActivated("a".to_string()),
            RuntimeEvent::ActivationFailed("nope".to_string()),
            RuntimeEvent::SketchActivated("bad".to_string()),
            RuntimeEvent::FrameFailed("bad".to_string()),
        ]
    );
}

#[test]
fn stats_track_activations() {
    let journal = Journal::default();
    let mut controller =
        Controller::new(recorders(&journal, &[("a", 10, 10), ("b", 10, 10)]));

    controller.activate("a").unwrap();
    controller.activate("b").unwrap();
    controller.reload().unwrap();
    controller.tick();

    let summary = controller.stats().summary();
    assert_eq!(summary.total_activations, 3);
    assert_eq!(summary.sketches_opened, 2);
    assert_eq!(summary.most_activated.as_deref(), Some("b"));
    assert_eq!(summary.frames_rendered, 1);
}

#[test]
fn dropping_controller_tears_down_and_unbinds() {
    let journal = Journal::default();
    let mut controller =
        Controller::new(recorders(&journal, &[("a", 10, 10)]));
    controller.activate("a").unwrap();
    assert!(is_bound());

    drop(controller);
    assert_eq!(journal.count("a:teardown"), 1);
    assert!(!is_bound());
}

#[test]
fn capture_writes_a_png() {
    let journal = Journal::default();
    let mut controller =
        Controller::new(recorders(&journal, &[("a", 12, 8)]));
    controller.activate("a").unwrap();
    controller.tick();

    let path = std::env::temp_dir()
        .join(format!("easel-capture-{}", std::process::id()))
        .join("a.png");
    controller.capture_png(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
