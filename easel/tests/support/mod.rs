#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use easel::prelude::*;

/// Shared, ordered log of every callback the recorder sketches receive.
#[derive(Clone, Debug, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    pub fn count(&self, entry: &str) -> usize {
        self.entries().iter().filter(|e| *e == entry).count()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == entry)
    }

    pub fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.starts_with(prefix))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Faults {
    pub init: bool,
    pub teardown: bool,
    /// Fail every frame from this frame number on (1-based).
    pub frame_from: Option<u64>,
    pub panic_in_frame: bool,
    pub pointer_pressed: bool,
}

/// Journals `<name>:<callback>` entries and whatever ambient state the
/// callback observed through the bridge.
pub struct Recorder {
    name: &'static str,
    journal: Journal,
    faults: Faults,
}

impl Sketch for Recorder {
    fn init(&mut self) -> SketchResult {
        self.journal.push(format!("{}:init", self.name));
        self.journal
            .push(format!("{}:size {}x{}", self.name, width(), height()));
        if self.faults.init {
            anyhow::bail!("init fault");
        }
        Ok(())
    }

    fn frame(&mut self) -> SketchResult {
        let frame = frame_count();
        self.journal.push(format!("{}:frame {}", self.name, frame));
        if self.faults.frame_from.is_some_and(|from| frame >= from) {
            if self.faults.panic_in_frame {
                panic!("frame fault");
            }
            anyhow::bail!("frame fault");
        }
        background(0.0);
        Ok(())
    }

    fn pointer_pressed(&mut self) -> SketchResult {
        self.journal.push(format!(
            "{}:pointer_pressed {},{}",
            self.name,
            pointer_x(),
            pointer_y()
        ));
        if self.faults.pointer_pressed {
            anyhow::bail!("pointer fault");
        }
        Ok(())
    }

    fn key_pressed(&mut self) -> SketchResult {
        let key = key().map(|k| k.to_string()).unwrap_or_default();
        self.journal
            .push(format!("{}:key_pressed {}", self.name, key));
        Ok(())
    }

    fn teardown(&mut self) -> SketchResult {
        self.journal.push(format!("{}:teardown", self.name));
        if self.faults.teardown {
            anyhow::bail!("teardown fault");
        }
        Ok(())
    }
}

pub fn register_recorder(
    registry: &mut Registry,
    journal: &Journal,
    config: SketchConfig,
    faults: Faults,
) -> Result<Registration, RegistrationError> {
    let journal = journal.clone();
    let name = config.name;
    registry.register(&config, move || {
        Box::new(Recorder {
            name,
            journal: journal.clone(),
            faults,
        })
    })
}

/// A registry of well-behaved recorders, all sized `w`x`h`.
pub fn recorders(
    journal: &Journal,
    sketches: &[(&'static str, i32, i32)],
) -> Registry {
    let mut registry = Registry::new();
    for &(name, w, h) in sketches {
        register_recorder(
            &mut registry,
            journal,
            SketchConfig::new(name, name).size(w, h),
            Faults::default(),
        )
        .unwrap();
    }
    registry
}
