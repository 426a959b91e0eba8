//! Headless host loop: paces ticks with a [`FrameClock`], applies
//! [`HostCommand`]s between ticks and reports [`RuntimeEvent`]s back.

use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use thiserror::Error;

use super::controller::{ActivationError, Controller, TickOutcome};
use super::events::{
    HostCommand, HostCommandReceiver, RuntimeEvent, RuntimeEventSender,
    command_channel,
};
use super::frame_clock::FrameClock;
use super::registry::Registry;
use super::settings::Settings;
use crate::logging;
use crate::sketch::DEFAULT_FPS;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("the registry has no sketches")]
    EmptyRegistry,

    #[error(transparent)]
    Activation(#[from] ActivationError),
}

pub struct Host {
    controller: Controller,
    clock: FrameClock,
    commands: HostCommandReceiver,
    events: Option<RuntimeEventSender>,
    settings: Settings,
    ticks: u64,
    running: bool,
}

impl Host {
    pub fn new(
        registry: Registry,
        settings: Settings,
        commands: HostCommandReceiver,
        events: Option<RuntimeEventSender>,
    ) -> Self {
        let controller = match events.clone() {
            Some(events) => Controller::with_events(registry, events),
            None => Controller::new(registry),
        };

        Self {
            controller,
            clock: FrameClock::new(settings.fps_override.unwrap_or(DEFAULT_FPS)),
            commands,
            events,
            settings,
            ticks: 0,
            running: true,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks delivered to an active sketch, rendered or not.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Activates the first sketch: `requested` if registered, else the
    /// settings' initial sketch, else the first name in sorted order.
    pub fn start(&mut self, requested: Option<&str>) -> Result<(), HostError> {
        let name = select_initial_sketch_name(
            self.controller.registry(),
            requested,
            self.settings.initial_sketch.as_deref(),
        )?;
        self.activate(&name)?;
        Ok(())
    }

    /// Applies every queued command without blocking.
    pub fn process_commands(&mut self) {
        while self.running {
            match self.commands.try_recv() {
                Ok(command) => self.apply(command),
                Err(_) => break,
            }
        }
    }

    pub fn apply(&mut self, command: HostCommand) {
        debug!("applying {:?}", command);
        match command {
            HostCommand::Activate(name) => {
                if let Err(err) = self.activate(&name) {
                    warn!("{}", err);
                }
            }
            HostCommand::Reload => match self.controller.reload() {
                Ok(()) => self.sync_clock(),
                Err(err) => warn!("cannot reload: {}", err),
            },
            HostCommand::Input(event) => {
                self.controller.dispatch(event);
            }
            HostCommand::Pause(paused) => {
                self.clock.set_paused(paused);
                info!("{}", if paused { "paused" } else { "resumed" });
            }
            HostCommand::AdvanceSingleFrame => {
                self.clock.advance_single_frame();
            }
            HostCommand::Capture(path) => self.capture(path),
            HostCommand::Quit => {
                info!("quit requested");
                self.running = false;
            }
        }
    }

    /// Applies queued commands, then renders a frame if one is due at `now`.
    pub fn step(&mut self, now: Instant) -> Option<TickOutcome> {
        self.process_commands();
        if !self.running {
            return None;
        }

        let tick = self.clock.tick(now);
        if tick.dropped > 0 {
            debug!("dropped {} late frame(s)", tick.dropped);
        }
        if !tick.due {
            return None;
        }

        let outcome = self.controller.tick();
        if outcome != TickOutcome::Idle {
            self.ticks += 1;
            if self
                .settings
                .frame_limit
                .is_some_and(|limit| self.ticks >= limit)
            {
                info!("reached frame limit of {}", self.ticks);
                self.running = false;
            }
        }
        Some(outcome)
    }

    /// Runs until a [`HostCommand::Quit`] arrives or the frame limit is hit.
    /// Waiting between frames doubles as waiting for commands.
    pub fn run_until_stopped(&mut self) {
        while self.running {
            let now = Instant::now();
            self.step(now);
            if !self.running {
                break;
            }

            let wait = if self.clock.paused() {
                self.clock.frame_duration()
            } else {
                self.clock
                    .next_deadline()
                    .saturating_duration_since(Instant::now())
            };

            match self.commands.recv_timeout(wait.max(Duration::from_millis(1)))
            {
                Ok(command) => self.apply(command),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    if self.settings.frame_limit.is_none()
                        && self.controller.is_idle()
                    {
                        info!("command channel closed with nothing active");
                        self.running = false;
                    } else {
                        std::thread::sleep(wait);
                    }
                }
            }
        }
    }

    /// Tears down the active sketch, writes the stats summary if configured
    /// and reports [`RuntimeEvent::Stopped`].
    pub fn shutdown(&mut self) {
        self.running = false;
        self.controller.deactivate();

        let summary = self.controller.stats().summary();
        info!(
            "rendered {} frame(s) across {} activation(s), averaging {:.1} fps",
            summary.frames_rendered,
            summary.total_activations,
            self.clock.average_fps()
        );
        if let Some(path) = self.settings.stats_path.as_ref() {
            match summary.save(path) {
                Ok(()) => debug!("wrote stats to {}", path.display()),
                Err(err) => {
                    error!("failed to write stats to {}: {}", path.display(), err)
                }
            }
        }

        self.emit(RuntimeEvent::Stopped);
    }

    pub fn run(&mut self) {
        self.run_until_stopped();
        self.shutdown();
    }

    fn activate(&mut self, name: &str) -> Result<(), ActivationError> {
        self.controller.activate(name)?;
        self.sync_clock();
        Ok(())
    }

    fn sync_clock(&mut self) {
        let Some(active) = self.controller.active() else {
            return;
        };
        self.clock
            .set_fps(self.settings.fps_override.unwrap_or(active.fps));
        self.clock.reset(Instant::now());
    }

    fn capture(&mut self, path: Option<PathBuf>) {
        let path = match path {
            // Bare file names land in the capture directory.
            Some(path)
                if path.components().count() == 1 && path.is_relative() =>
            {
                self.settings.capture_dir.join(path)
            }
            Some(path) => path,
            None => {
                let Some(active) = self.controller.active() else {
                    error!("capture failed: no sketch is active");
                    return;
                };
                let frame = self
                    .controller
                    .with_surface(|surface| surface.frame_count())
                    .unwrap_or_default();
                self.settings.capture_path(active.name, frame)
            }
        };

        match self.controller.capture_png(&path) {
            Ok(()) => {
                info!("saved capture to {}", path.display());
                self.emit(RuntimeEvent::Captured(path));
            }
            Err(err) => error!("capture failed: {}", err),
        }
    }

    fn emit(&self, event: RuntimeEvent) {
        if let Some(events) = self.events.as_ref() {
            if events.send(event).is_err() {
                debug!("runtime event receiver is gone");
            }
        }
    }
}

fn select_initial_sketch_name(
    registry: &Registry,
    requested: Option<&str>,
    configured: Option<&str>,
) -> Result<String, HostError> {
    for (source, name) in [("requested", requested), ("configured", configured)]
    {
        let Some(name) = name else {
            continue;
        };
        if registry.contains(name) {
            return Ok(name.to_string());
        }
        warn!("{} initial sketch '{}' does not exist; falling back", source, name);
    }

    registry
        .first_sketch_name()
        .map(ToOwned::to_owned)
        .ok_or(HostError::EmptyRegistry)
}

/// Runs `registry` headless until a frame limit or a quit command. The
/// command sender stays alive for the whole run.
pub fn run_registry(
    registry: Registry,
    settings: Settings,
    initial_sketch: Option<&str>,
) -> Result<(), HostError> {
    let (_command_tx, command_rx) = command_channel();
    run_registry_with_channels(registry, settings, initial_sketch, command_rx, None)
}

pub fn run_registry_with_channels(
    registry: Registry,
    settings: Settings,
    initial_sketch: Option<&str>,
    command_rx: HostCommandReceiver,
    event_tx: Option<RuntimeEventSender>,
) -> Result<(), HostError> {
    logging::init_logger();

    let mut host = Host::new(registry, settings, command_rx, event_tx);
    host.start(initial_sketch)?;
    host.run();
    Ok(())
}
