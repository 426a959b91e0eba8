use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc;
use std::sync::mpsc::{Receiver, Sender};

use thiserror::Error;

use super::input::{InputEvent, Key, ParseKeyError};

/// Requests sent to a running host. Commands are applied in order on the
/// host's thread between ticks.
#[derive(Clone, Debug, PartialEq)]
pub enum HostCommand {
    Activate(String),
    Reload,
    Input(InputEvent),
    Pause(bool),
    AdvanceSingleFrame,
    /// Saves the surface as a PNG. `None` picks a numbered file in the
    /// capture directory.
    Capture(Option<PathBuf>),
    Quit,
}

/// Notifications emitted by the controller and host.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RuntimeEvent {
    SketchActivated(String),
    ActivationFailed(String),
    FrameFailed(String),
    Captured(PathBuf),
    Stopped,
}

pub type HostCommandSender = Sender<HostCommand>;
pub type HostCommandReceiver = Receiver<HostCommand>;
pub type RuntimeEventSender = Sender<RuntimeEvent>;
pub type RuntimeEventReceiver = Receiver<RuntimeEvent>;

pub fn command_channel() -> (HostCommandSender, HostCommandReceiver) {
    mpsc::channel()
}

pub fn event_channel() -> (RuntimeEventSender, RuntimeEventReceiver) {
    mpsc::channel()
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' expects {expected}")]
    Arguments {
        command: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Key(#[from] ParseKeyError),
}

/// Parses the line protocol used by the interactive command line, e.g.
/// `activate bouncing_ball`, `press 120 80`, `key space`, `quit`.
impl FromStr for HostCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Err(ParseCommandError::Empty);
        };
        let args: Vec<&str> = parts.collect();

        let arguments = |expected: &'static str| ParseCommandError::Arguments {
            command: command.to_string(),
            expected,
        };
        let point = || -> Result<(f32, f32), ParseCommandError> {
            match args.as_slice() {
                [x, y] => Ok((
                    x.parse().map_err(|_| arguments("<x> <y>"))?,
                    y.parse().map_err(|_| arguments("<x> <y>"))?,
                )),
                _ => Err(arguments("<x> <y>")),
            }
        };
        let key = || -> Result<Key, ParseCommandError> {
            match args.as_slice() {
                [key] => Ok(key.parse()?),
                _ => Err(arguments("<key>")),
            }
        };

        match command {
            "activate" | "a" => match args.as_slice() {
                [name] => Ok(Self::Activate(name.to_string())),
                _ => Err(arguments("<sketch>")),
            },
            "reload" => Ok(Self::Reload),
            "move" => {
                let (x, y) = point()?;
                Ok(Self::Input(InputEvent::PointerMoved { x, y }))
            }
            "press" | "click" => {
                let (x, y) = point()?;
                Ok(Self::Input(InputEvent::PointerPressed { x, y }))
            }
            "release" => {
                let (x, y) = point()?;
                Ok(Self::Input(InputEvent::PointerReleased { x, y }))
            }
            "key" => Ok(Self::Input(InputEvent::KeyPressed(key()?))),
            "keyup" => Ok(Self::Input(InputEvent::KeyReleased(key()?))),
            "resize" => match args.as_slice() {
                [w, h] => Ok(Self::Input(InputEvent::Resized {
                    w: w.parse().map_err(|_| arguments("<w> <h>"))?,
                    h: h.parse().map_err(|_| arguments("<w> <h>"))?,
                })),
                _ => Err(arguments("<w> <h>")),
            },
            "pause" => Ok(Self::Pause(true)),
            "resume" => Ok(Self::Pause(false)),
            "step" => Ok(Self::AdvanceSingleFrame),
            "capture" => match args.as_slice() {
                [] => Ok(Self::Capture(None)),
                [path] => Ok(Self::Capture(Some(PathBuf::from(path)))),
                _ => Err(arguments("[path]")),
            },
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}
