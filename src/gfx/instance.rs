//! Instance creation, including validation and macOS portability setup.

use crate::gfx::consts::PORTABILITY_MACOS_VERSION;
use crate::gfx::debug::validation::ValidationLayer;
use crate::gfx::driver::{InstanceApi, InstanceSpec, Loader};
use crate::gfx::error::{RendererError, init_err};
use crate::gfx::window::WindowSystem;
use log::{debug, info};
use std::ffi::CString;
use vulkanalia::vk;

/// The graphics API instance. Destroyed on drop, which must come after every
/// surface, messenger and device created from it.
pub struct InstanceContext<I: InstanceApi> {
    api: I,
    portability: bool,
}

impl<I: InstanceApi> InstanceContext<I> {
    pub fn create<L, W>(
        loader: &L,
        window: &W,
        validation: &ValidationLayer,
        application_name: &str,
    ) -> Result<Self, RendererError>
    where
        L: Loader<Instance = I>,
        W: WindowSystem,
    {
        let missing = validation.unsupported_layers(loader);
        if !missing.is_empty() {
            return Err(RendererError::Configuration {
                missing: missing.iter().map(|l| l.to_string()).collect(),
            });
        }

        let mut extensions = window.required_instance_extensions();
        extensions.extend(validation.extensions());

        let version = unsafe { loader.version() }.map_err(init_err("loader version query"))?;
        let portability = cfg!(target_os = "macos") && version >= PORTABILITY_MACOS_VERSION;
        let flags = if portability {
            info!("Enabling extensions for macOS portability.");
            extensions.push(vk::KHR_GET_PHYSICAL_DEVICE_PROPERTIES2_EXTENSION.name);
            extensions.push(vk::KHR_PORTABILITY_ENUMERATION_EXTENSION.name);
            vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
        } else {
            vk::InstanceCreateFlags::empty()
        };

        let messenger = if validation.is_enabled() {
            debug!("Vulkan validation layers are enabled.");
            Some(validation.populate_messenger_config())
        } else {
            None
        };

        let spec = InstanceSpec {
            application_name: application_name_cstring(application_name),
            layers: validation.layers().to_vec(),
            extensions,
            flags,
            messenger,
        };

        let api = unsafe { loader.create_instance(&spec) }.map_err(init_err("instance"))?;
        debug!("Vulkan instance created (loader {version}).");

        Ok(Self { api, portability })
    }

    pub fn api(&self) -> &I {
        &self.api
    }

    /// Whether devices need `VK_KHR_portability_subset`.
    pub fn portability(&self) -> bool {
        self.portability
    }
}

impl<I: InstanceApi> Drop for InstanceContext<I> {
    fn drop(&mut self) {
        unsafe { self.api.destroy_instance() }
    }
}

/// Interior NUL bytes are dropped rather than failing instance creation.
fn application_name_cstring(name: &str) -> CString {
    CString::new(name.replace('\0', "")).unwrap_or_default()
}
