//! Validation layer support and the diagnostic messenger.

use crate::gfx::consts::EXTENSION_VALIDATION_LAYER;
use crate::gfx::debug::logging::debug_callback;
use crate::gfx::driver::{InstanceApi, Loader};
use crate::gfx::error::{RendererError, init_err};
use log::{debug, warn};
use vulkanalia::vk::{self, Handle, HasBuilder};

/// Which diagnostic messages reach the callback, and the callback itself.
#[derive(Clone, Copy, Debug)]
pub struct MessengerConfig {
    pub severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    pub types: vk::DebugUtilsMessageTypeFlagsEXT,
    pub callback: vk::PFN_vkDebugUtilsMessengerCallbackEXT,
}

impl MessengerConfig {
    pub fn info(&self) -> vk::DebugUtilsMessengerCreateInfoEXTBuilder<'static> {
        vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(self.severity)
            .message_type(self.types)
            .user_callback(self.callback)
    }
}

#[derive(Clone, Debug)]
pub struct ValidationLayer {
    enabled: bool,
    layers: Vec<vk::ExtensionName>,
}

impl ValidationLayer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            layers: vec![EXTENSION_VALIDATION_LAYER],
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Layers to enable on the instance and device; empty when disabled.
    pub fn layers(&self) -> &[vk::ExtensionName] {
        if self.enabled { &self.layers } else { &[] }
    }

    /// Instance extensions the messenger needs; empty when disabled.
    pub fn extensions(&self) -> Vec<vk::ExtensionName> {
        if self.enabled {
            vec![vk::EXT_DEBUG_UTILS_EXTENSION.name]
        } else {
            Vec::new()
        }
    }

    /// Returns true iff every required layer is available. Always true when
    /// validation is disabled.
    pub fn check_support<L: Loader>(&self, loader: &L) -> bool {
        self.unsupported_layers(loader).is_empty()
    }

    pub(crate) fn unsupported_layers<L: Loader>(&self, loader: &L) -> Vec<vk::ExtensionName> {
        if !self.enabled {
            return Vec::new();
        }

        let available = unsafe { loader.available_layers() }.unwrap_or_else(|e| {
            warn!("Failed to enumerate instance layers: {e}");
            Vec::new()
        });

        self.layers
            .iter()
            .filter(|l| !available.contains(l))
            .copied()
            .collect()
    }

    pub fn populate_messenger_config(&self) -> MessengerConfig {
        MessengerConfig {
            severity: vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            types: vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            callback: Some(debug_callback),
        }
    }

    /// Attaches the messenger to `instance`. Yields an empty messenger when
    /// validation is disabled or the entry point could not be resolved.
    pub fn create_messenger<I: InstanceApi>(
        &self,
        instance: &I,
    ) -> Result<DebugMessenger<I>, RendererError> {
        let mut messenger = DebugMessenger {
            instance: instance.clone(),
            handle: vk::DebugUtilsMessengerEXT::null(),
        };

        if !self.enabled {
            return Ok(messenger);
        }

        match unsafe { instance.create_debug_messenger(&self.populate_messenger_config()) } {
            Some(result) => {
                messenger.handle = result.map_err(init_err("debug messenger"))?;
                debug!("Debug messenger attached.");
            }
            None => debug!("Debug messenger entry point unavailable, continuing without it."),
        }

        Ok(messenger)
    }
}

/// An attached diagnostic messenger, detached on drop.
pub struct DebugMessenger<I: InstanceApi> {
    instance: I,
    handle: vk::DebugUtilsMessengerEXT,
}

impl<I: InstanceApi> DebugMessenger<I> {
    pub fn handle(&self) -> vk::DebugUtilsMessengerEXT {
        self.handle
    }

    pub fn is_attached(&self) -> bool {
        !self.handle.is_null()
    }
}

impl<I: InstanceApi> Drop for DebugMessenger<I> {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { self.instance.destroy_debug_messenger(self.handle) }
        }
    }
}
