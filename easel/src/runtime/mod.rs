pub mod controller;
pub mod events;
pub mod frame_clock;
pub mod host;
pub mod input;
pub mod readiness;
pub mod registry;
pub mod settings;
pub mod stats;
