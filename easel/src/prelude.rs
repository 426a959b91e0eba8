pub use crate::bridge::*;
pub use crate::logging::init_logger;
pub use crate::logging::{debug, error, info, trace, warn};
pub use crate::register_sketches;
pub use crate::render::color::{Color, ColorMode};
pub use crate::render::surface::TextAlign;
pub use crate::run_registry;
pub use crate::run_registry_with_channels;
pub use crate::runtime::controller::{ActivationError, Controller};
pub use crate::runtime::events::{
    HostCommand, HostCommandReceiver, HostCommandSender, RuntimeEvent,
    RuntimeEventReceiver, RuntimeEventSender, command_channel, event_channel,
};
pub use crate::runtime::input::{InputEvent, InputKind, Key};
pub use crate::runtime::readiness::{ActivationToken, Deferred};
pub use crate::runtime::registry::{
    Registration, RegistrationError, Registry, SketchInfo,
};
pub use crate::runtime::settings::Settings;
pub use crate::sketch::*;
pub use crate::util::HashMap;
