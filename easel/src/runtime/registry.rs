use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use crate::sketch::{
    DEFAULT_FPS, DEFAULT_SURFACE_SIZE, Sketch, SketchConfig, SurfaceSize,
};
use crate::util::HashMap;

type SketchFactory = Box<dyn Fn() -> Box<dyn Sketch> + Send + Sync + 'static>;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RegistrationError {
    #[error("sketch name must not be empty")]
    EmptyName,

    #[error("sketch '{0}' has an empty display name")]
    EmptyDisplayName(String),

    #[error("sketch '{0}' declares neither a width nor a height")]
    MissingSurfaceSize(String),

    #[error("duplicate sketch registration: {0}")]
    Duplicate(String),
}

/// Non-fatal adjustments made while registering a sketch.
#[derive(Clone, Debug, PartialEq)]
pub enum RegistrationWarning {
    SurfaceSizeCoerced {
        requested: (Option<i32>, Option<i32>),
        applied: SurfaceSize,
    },
    FpsCoerced {
        requested: f32,
        applied: f32,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Registration {
    pub warnings: Vec<RegistrationWarning>,
}

impl Registration {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

pub struct SketchDescriptor {
    config: SketchConfig,
    size: SurfaceSize,
    factory: SketchFactory,
}

impl SketchDescriptor {
    pub fn name(&self) -> &'static str {
        self.config.name
    }

    pub fn display_name(&self) -> &'static str {
        self.config.display_name
    }

    pub fn description(&self) -> &'static str {
        self.config.description
    }

    /// The validated config; `fps` and the size fields hold the values that
    /// were actually applied.
    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn info(&self) -> SketchInfo {
        SketchInfo {
            name: self.config.name.to_string(),
            display_name: self.config.display_name.to_string(),
            description: self.config.description.to_string(),
            w: self.size.w,
            h: self.size.h,
        }
    }

    pub(crate) fn instantiate(&self) -> Box<dyn Sketch> {
        (self.factory)()
    }
}

impl std::fmt::Debug for SketchDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SketchDescriptor")
            .field("config", &self.config)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Listing entry for UIs and the `--list` command.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SketchInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub w: u32,
    pub h: u32,
}

/// Maps sketch names to descriptors. Registration order carries no meaning;
/// listings are always sorted by name.
///
/// Registering a name twice is rejected and the first registration wins.
#[derive(Default)]
pub struct Registry {
    entries: HashMap<String, SketchDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(
        &mut self,
        config: &SketchConfig,
        factory: F,
    ) -> Result<Registration, RegistrationError>
    where
        F: Fn() -> Box<dyn Sketch> + Send + Sync + 'static,
    {
        let name = config.name;
        if name.trim().is_empty() {
            return Err(RegistrationError::EmptyName);
        }

        if config.display_name.trim().is_empty() {
            return Err(RegistrationError::EmptyDisplayName(name.to_string()));
        }

        if self.entries.contains_key(name) {
            return Err(RegistrationError::Duplicate(name.to_string()));
        }

        let mut registration = Registration::default();
        let size = resolve_size(config, &mut registration)?;
        let fps = resolve_fps(config, &mut registration);

        let mut config = *config;
        config.fps = fps;
        config.w = Some(size.w as i32);
        config.h = Some(size.h as i32);

        debug!(
            "registered sketch '{}' ({}) at {}x{}",
            name, config.display_name, size.w, size.h
        );

        self.entries.insert(
            name.to_string(),
            SketchDescriptor {
                config,
                size,
                factory: Box::new(factory),
            },
        );

        Ok(registration)
    }

    pub fn get(&self, name: &str) -> Option<&SketchDescriptor> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All descriptors ordered by name.
    pub fn list(&self) -> Vec<&SketchDescriptor> {
        let mut descriptors: Vec<_> = self.entries.values().collect();
        descriptors.sort_by(|a, b| a.name().cmp(b.name()));
        descriptors
    }

    pub fn sketch_names(&self) -> Vec<&str> {
        self.list().into_iter().map(|d| d.name()).collect()
    }

    pub fn first_sketch_name(&self) -> Option<&str> {
        self.entries.keys().map(String::as_str).min()
    }

    pub fn infos(&self) -> Vec<SketchInfo> {
        self.list().into_iter().map(SketchDescriptor::info).collect()
    }
}

fn resolve_size(
    config: &SketchConfig,
    registration: &mut Registration,
) -> Result<SurfaceSize, RegistrationError> {
    match (config.w, config.h) {
        (None, None) => {
            Err(RegistrationError::MissingSurfaceSize(config.name.to_string()))
        }
        (Some(w), Some(h)) if w > 0 && h > 0 => {
            Ok(SurfaceSize::new(w as u32, h as u32))
        }
        (w, h) => {
            warn!(
                "sketch '{}' has an invalid surface size ({:?} x {:?}); \
                using {}x{}",
                config.name, w, h, DEFAULT_SURFACE_SIZE.w, DEFAULT_SURFACE_SIZE.h
            );
            registration
                .warnings
                .push(RegistrationWarning::SurfaceSizeCoerced {
                    requested: (w, h),
                    applied: DEFAULT_SURFACE_SIZE,
                });
            Ok(DEFAULT_SURFACE_SIZE)
        }
    }
}

fn resolve_fps(config: &SketchConfig, registration: &mut Registration) -> f32 {
    if config.fps.is_finite() && config.fps > 0.0 {
        return config.fps;
    }

    warn!(
        "sketch '{}' has an invalid fps ({}); using {}",
        config.name, config.fps, DEFAULT_FPS
    );
    registration.warnings.push(RegistrationWarning::FpsCoerced {
        requested: config.fps,
        applied: DEFAULT_FPS,
    });
    DEFAULT_FPS
}
