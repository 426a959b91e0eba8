use std::io::BufRead;
use std::path::PathBuf;
use std::thread;

use anyhow::Context;
use clap::Parser;
use easel::prelude::*;
use easel::runtime::host::Host;
use easel::runtime::settings::default_settings_path;

mod sketches;

/// Frames rendered by a non-interactive run when nothing else sets a limit.
const DEFAULT_FRAME_LIMIT: u64 = 120;

#[derive(Debug, Parser)]
#[command(version, about = "Runs the easel sketch gallery headless")]
struct Args {
    /// Sketch to activate first
    sketch: Option<String>,

    /// Settings file to use instead of the one in the config directory
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Stop after this many frames of the active sketch
    #[arg(long)]
    frames: Option<u64>,

    /// Override every sketch's frame rate
    #[arg(long)]
    fps: Option<f32>,

    /// Print the registered sketches and exit
    #[arg(long)]
    list: bool,

    /// Save the last rendered frame as a PNG
    #[arg(long)]
    capture: Option<PathBuf>,

    /// Read host commands from stdin, one per line
    #[arg(short, long)]
    interactive: bool,
}

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Args::parse();

    let registry = sketches::registry()?;
    if args.list {
        for info in registry.infos() {
            println!(
                "{:<20} {:<20} {}x{}  {}",
                info.name, info.display_name, info.w, info.h, info.description
            );
        }
        return Ok(());
    }

    let mut settings = load_settings(args.settings.as_ref())?;
    if let Some(fps) = args.fps {
        settings.fps_override = Some(fps);
    }
    if let Some(frames) = args.frames {
        settings.frame_limit = Some(frames);
    }
    if !args.interactive && settings.frame_limit.is_none() {
        settings.frame_limit = Some(DEFAULT_FRAME_LIMIT);
    }

    let (command_tx, command_rx) = command_channel();
    let (event_tx, event_rx) = event_channel();

    if args.interactive {
        spawn_stdin_reader(command_tx.clone());
    }
    let event_logger = thread::Builder::new()
        .name("events".into())
        .spawn(move || log_events(event_rx))
        .context("failed to spawn the event logger")?;

    let mut host = Host::new(registry, settings, command_rx, Some(event_tx));
    host.start(args.sketch.as_deref())?;
    host.run_until_stopped();

    if let Some(path) = args.capture.as_ref() {
        match host.controller().capture_png(path) {
            Ok(()) => info!("saved {}", path.display()),
            Err(err) => error!("could not save {}: {}", path.display(), err),
        }
    }

    host.shutdown();
    drop(command_tx);
    // Dropping the host closes the event channel even if `Stopped` was lost.
    drop(host);
    if event_logger.join().is_err() {
        error!("event logger panicked");
    }
    Ok(())
}

fn load_settings(explicit: Option<&PathBuf>) -> anyhow::Result<Settings> {
    if let Some(path) = explicit {
        return Settings::load(path)
            .with_context(|| format!("loading {}", path.display()));
    }

    match default_settings_path() {
        Some(path) => {
            debug!("reading settings from {}", path.display());
            Ok(Settings::load_or_default(&path)?)
        }
        None => {
            warn!("no config directory; using default settings");
            Ok(Settings::default())
        }
    }
}

fn spawn_stdin_reader(commands: HostCommandSender) {
    let spawned = thread::Builder::new().name("stdin".into()).spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<HostCommand>() {
                Ok(command) => {
                    if commands.send(command).is_err() {
                        return;
                    }
                }
                Err(err) => warn!("{}", err),
            }
        }
        let _ = commands.send(HostCommand::Quit);
    });

    if let Err(err) = spawned {
        error!("failed to spawn the stdin reader: {}", err);
    }
}

fn log_events(events: RuntimeEventReceiver) {
    for event in events {
        match event {
            RuntimeEvent::SketchActivated(name) => info!("now showing {}", name),
            RuntimeEvent::ActivationFailed(name) => {
                warn!("could not activate {}", name)
            }
            RuntimeEvent::FrameFailed(name) => {
                warn!("{} stopped rendering after a failed frame", name)
            }
            RuntimeEvent::Captured(path) => debug!("captured {}", path.display()),
            RuntimeEvent::Stopped => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_logger_ends_when_the_channel_closes() {
        let (event_tx, event_rx) = event_channel();
        let logger = thread::spawn(move || log_events(event_rx));

        event_tx
            .send(RuntimeEvent::SketchActivated("runner".to_string()))
            .unwrap();
        drop(event_tx);

        assert!(logger.join().is_ok());
    }

    #[test]
    fn event_logger_ends_on_stopped() {
        let (event_tx, event_rx) = event_channel();
        let logger = thread::spawn(move || log_events(event_rx));

        event_tx.send(RuntimeEvent::Stopped).unwrap();
        assert!(logger.join().is_ok());
        drop(event_tx);
    }
}
