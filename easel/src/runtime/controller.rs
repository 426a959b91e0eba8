//! Owns the active sketch and its surface, and moves the gallery from one
//! sketch to the next.
//!
//! A switch always runs in the same order: the outgoing sketch's `teardown`,
//! then the bridge is unbound and the old surface dropped, then the new
//! surface is created and bound, and only then is the incoming sketch
//! instantiated and its `init` called. Callback failures (returned errors
//! and panics alike) are logged and never escape the controller.

use std::cell::Ref;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use log::{debug, error, info, warn};
use thiserror::Error;

use super::events::{RuntimeEvent, RuntimeEventSender};
use super::input::{InputEvent, InputKind};
use super::readiness::{ActivationToken, Generation};
use super::registry::Registry;
use super::stats::Stats;
use crate::bridge;
use crate::render::surface::{CaptureError, Surface, SurfaceHandle};
use crate::sketch::{Sketch, SketchResult, SurfaceSize};
use crate::util::panic_message;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ActivationError {
    #[error("sketch '{0}' is not registered")]
    NotFound(String),

    #[error("no sketch is active")]
    NothingActive,
}

/// The sketch callback a failure came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Hook {
    Init,
    Frame,
    Teardown,
    Input(InputKind),
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
            Self::Frame => f.write_str("frame"),
            Self::Teardown => f.write_str("teardown"),
            Self::Input(kind) => kind.fmt(f),
        }
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("'{sketch}' {hook} failed: {message}")]
pub struct CallbackError {
    pub sketch: String,
    pub hook: Hook,
    pub message: String,
}

/// Snapshot of the active sketch.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub size: SurfaceSize,
    pub fps: f32,
    /// Set after a failed `frame`; cleared by the next activation.
    pub degraded: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickOutcome {
    /// Nothing is active.
    Idle,
    Rendered,
    /// The sketch turned its loop off.
    NotLooping,
    /// A previous frame failed; frames stay off until the next activation.
    Degraded,
    /// This tick's frame failed and the sketch is now degraded.
    Failed,
}

struct ActiveSketch {
    name: &'static str,
    display_name: &'static str,
    fps: f32,
    sketch: Box<dyn Sketch>,
    surface: SurfaceHandle,
    token: ActivationToken,
    degraded: bool,
}

/// One gallery's lifecycle controller. Sketches reach their surface through
/// the thread-local [`bridge`], so a controller must be driven from a single
/// thread and only one controller per thread should be active at a time.
pub struct Controller {
    registry: Registry,
    generation: Generation,
    active: Option<ActiveSketch>,
    stats: Stats,
    events: Option<RuntimeEventSender>,
}

impl Controller {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            generation: Generation::new(),
            active: None,
            stats: Stats::default(),
            events: None,
        }
    }

    pub fn with_events(registry: Registry, events: RuntimeEventSender) -> Self {
        let mut controller = Self::new(registry);
        controller.events = Some(events);
        controller
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Switches to `name`. Activating the sketch that is already active runs
    /// a full teardown/init cycle with a fresh instance and surface.
    ///
    /// Unknown names leave the current sketch untouched.
    pub fn activate(&mut self, name: &str) -> Result<(), ActivationError> {
        if !self.registry.contains(name) {
            warn!("cannot activate unknown sketch '{}'", name);
            self.emit(RuntimeEvent::ActivationFailed(name.to_string()));
            return Err(ActivationError::NotFound(name.to_string()));
        }

        let token = self.generation.advance();
        self.deactivate();

        let Some(descriptor) = self.registry.get(name) else {
            return Err(ActivationError::NotFound(name.to_string()));
        };
        let config = descriptor.config();

        let surface = Surface::new(descriptor.size()).into_handle();
        bridge::rebind(&surface, token.clone());

        let mut active = ActiveSketch {
            name: config.name,
            display_name: config.display_name,
            fps: config.fps,
            sketch: descriptor.instantiate(),
            surface,
            token,
            degraded: false,
        };
        self.stats.record_activation(active.name);

        let sketch = &mut active.sketch;
        if let Err(err) = invoke(active.name, Hook::Init, || sketch.init()) {
            error!("{}", err);
            self.stats.record_lifecycle_failure();
        }

        info!(
            "activated '{}' ({}) at {}x{}",
            active.name,
            active.display_name,
            descriptor.size().w,
            descriptor.size().h
        );

        let activated = active.name.to_string();
        self.active = Some(active);
        self.emit(RuntimeEvent::SketchActivated(activated));

        Ok(())
    }

    /// Re-activates the current sketch from scratch.
    pub fn reload(&mut self) -> Result<(), ActivationError> {
        let Some(name) = self.active.as_ref().map(|active| active.name) else {
            return Err(ActivationError::NothingActive);
        };
        self.activate(name)
    }

    /// Tears down the active sketch, if any, and returns to idle.
    pub fn deactivate(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };

        let sketch = &mut active.sketch;
        if let Err(err) =
            invoke(active.name, Hook::Teardown, || sketch.teardown())
        {
            error!("{}", err);
            self.stats.record_lifecycle_failure();
        }

        bridge::unbind_surface(&active.surface);
        debug!("deactivated '{}'", active.name);
    }

    pub fn active(&self) -> Option<ActiveInfo> {
        self.active.as_ref().map(|active| ActiveInfo {
            name: active.name,
            display_name: active.display_name,
            size: active.surface.borrow().size(),
            fps: active.fps,
            degraded: active.degraded,
        })
    }

    pub fn activation_token(&self) -> Option<ActivationToken> {
        self.active.as_ref().map(|active| active.token.clone())
    }

    /// Runs one frame of the active sketch.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(active) = self.active.as_mut() else {
            return TickOutcome::Idle;
        };

        if active.degraded {
            return TickOutcome::Degraded;
        }

        if !active.surface.borrow().is_looping() {
            return TickOutcome::NotLooping;
        }

        active.surface.borrow_mut().begin_frame();

        let sketch = &mut active.sketch;
        match invoke(active.name, Hook::Frame, || sketch.frame()) {
            Ok(()) => {
                self.stats.record_frame();
                TickOutcome::Rendered
            }
            Err(err) => {
                error!("{}; no more frames until it is activated again", err);
                active.degraded = true;
                self.stats.record_frame_failure();
                let failed = active.name.to_string();
                self.emit(RuntimeEvent::FrameFailed(failed));
                TickOutcome::Failed
            }
        }
    }

    /// Feeds one input event to the live surface and then to the matching
    /// handler of the sketch that is active right now. Returns `false` when
    /// nothing is active.
    pub fn dispatch(&mut self, event: InputEvent) -> bool {
        let Some(active) = self.active.as_mut() else {
            debug!("dropping {} event: no active sketch", event.kind());
            return false;
        };

        active.surface.borrow_mut().apply_input(&event);

        let sketch = &mut active.sketch;
        let result = invoke(active.name, Hook::Input(event.kind()), || {
            match event {
                InputEvent::PointerMoved { .. } => sketch.pointer_moved(),
                InputEvent::PointerPressed { .. } => sketch.pointer_pressed(),
                InputEvent::PointerReleased { .. } => {
                    sketch.pointer_released()
                }
                InputEvent::KeyPressed(_) => sketch.key_pressed(),
                InputEvent::KeyReleased(_) => sketch.key_released(),
                InputEvent::Resized { .. } => sketch.resized(),
            }
        });

        if let Err(err) = result {
            warn!("{}", err);
            self.stats.record_handler_failure();
        }

        true
    }

    /// Read access to the live surface.
    pub fn surface(&self) -> Option<Ref<'_, Surface>> {
        self.active.as_ref().map(|active| active.surface.borrow())
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&Surface) -> R) -> Option<R> {
        self.surface().map(|surface| f(&surface))
    }

    pub fn capture_png(&self, path: impl AsRef<Path>) -> Result<(), CaptureError> {
        let Some(surface) = self.surface() else {
            return Err(CaptureError::NoActiveSketch);
        };
        surface.save_png(path)
    }

    fn emit(&self, event: RuntimeEvent) {
        if let Some(events) = self.events.as_ref() {
            if events.send(event).is_err() {
                debug!("runtime event receiver is gone");
            }
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Runs one sketch callback, turning both returned errors and panics into a
/// [`CallbackError`].
fn invoke(
    sketch: &str,
    hook: Hook,
    callback: impl FnOnce() -> SketchResult,
) -> Result<(), CallbackError> {
    let message = match panic::catch_unwind(AssertUnwindSafe(callback)) {
        Ok(Ok(())) => return Ok(()),
        Ok(Err(err)) => format!("{:#}", err),
        Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
    };

    Err(CallbackError {
        sketch: sketch.to_string(),
        hook,
        message,
    })
}
