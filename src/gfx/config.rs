use crate::gfx::consts::{VALIDATION_ENABLED, VALIDATION_ENV_VAR};
use log::{debug, warn};

/// Construction parameters for a renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RendererConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Enables the Khronos validation layer and the diagnostic messenger.
    pub validation: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Hello Window".to_owned(),
            validation: VALIDATION_ENABLED,
        }
    }
}

impl RendererConfig {
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_validation(mut self, validation: bool) -> Self {
        self.validation = validation;
        self
    }

    /// Applies `RKENGINE_VALIDATION` on top of the current values.
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(VALIDATION_ENV_VAR) {
            Ok(value) => self.with_validation_override(&value),
            Err(_) => self,
        }
    }

    fn with_validation_override(mut self, value: &str) -> Self {
        match parse_switch(value) {
            Some(validation) => {
                debug!("{VALIDATION_ENV_VAR}={value}: validation {validation}.");
                self.validation = validation;
            }
            None => warn!("Ignoring unrecognised {VALIDATION_ENV_VAR} value `{value}`."),
        }
        self
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
