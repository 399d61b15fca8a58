//! Physical device selection.

use crate::gfx::driver::InstanceApi;
use crate::gfx::error::{RendererError, SuitabilityError, init_err};
use crate::gfx::queuefamily::{QueueFamilies, QueueFamilyIndices};
use crate::gfx::swapchain::SwapchainSupport;
use log::{info, warn};
use vulkanalia::vk;

/// The chosen GPU. Physical devices belong to the driver and are never destroyed.
#[derive(Clone, Debug)]
pub struct SelectedDevice {
    pub physical_device: vk::PhysicalDevice,
    pub families: QueueFamilies,
    pub name: String,
}

pub struct PhysicalDeviceSelector<'a, I: InstanceApi> {
    instance: &'a I,
    surface: vk::SurfaceKHR,
    required_extensions: &'a [vk::ExtensionName],
}

impl<'a, I: InstanceApi> PhysicalDeviceSelector<'a, I> {
    pub fn new(
        instance: &'a I,
        surface: vk::SurfaceKHR,
        required_extensions: &'a [vk::ExtensionName],
    ) -> Self {
        Self {
            instance,
            surface,
            required_extensions,
        }
    }

    /// Returns the first enumerated device that passes [`Self::check`]. There is
    /// no ranking between suitable devices.
    pub fn select(&self) -> Result<SelectedDevice, RendererError> {
        let devices = unsafe { self.instance.physical_devices() }
            .map_err(init_err("physical device list"))?;

        if devices.is_empty() {
            warn!("No GPUs with Vulkan support were found.");
            return Err(RendererError::NoSuitableDevice);
        }

        for physical_device in devices {
            let properties = unsafe { self.instance.properties(physical_device) };

            match self.check(physical_device, &properties) {
                Ok(families) => {
                    info!("Selected physical device (`{}`).", properties.device_name);
                    return Ok(SelectedDevice {
                        physical_device,
                        families,
                        name: properties.device_name.to_string(),
                    });
                }
                Err(error) => warn!(
                    "Skipping physical device (`{}`): {}",
                    properties.device_name, error
                ),
            }
        }

        Err(RendererError::NoSuitableDevice)
    }

    /// The suitability predicate: a discrete GPU with geometry shaders, complete
    /// queue families, the required extensions, and at least one surface format
    /// and present mode.
    pub fn check(
        &self,
        physical_device: vk::PhysicalDevice,
        properties: &vk::PhysicalDeviceProperties,
    ) -> Result<QueueFamilies, SuitabilityError> {
        let features = unsafe { self.instance.features(physical_device) };
        if properties.device_type != vk::PhysicalDeviceType::DISCRETE_GPU {
            return Err(SuitabilityError("a discrete GPU device type"));
        }
        if features.geometry_shader != vk::TRUE {
            return Err(SuitabilityError("geometry shader support"));
        }

        let families =
            unsafe { QueueFamilyIndices::get(self.instance, self.surface, physical_device) }
                .ok()
                .and_then(QueueFamilyIndices::complete)
                .ok_or(SuitabilityError("graphics and present queue families"))?;

        self.check_extensions(physical_device)?;

        let support = unsafe { SwapchainSupport::get(self.instance, physical_device, self.surface) }
            .map_err(|_| SuitabilityError("swapchain support"))?;
        if support.formats.is_empty() || support.present_modes.is_empty() {
            return Err(SuitabilityError("surface formats or present modes"));
        }

        Ok(families)
    }

    fn check_extensions(&self, physical_device: vk::PhysicalDevice) -> Result<(), SuitabilityError> {
        let extensions = unsafe { self.instance.device_extensions(physical_device) }
            .map_err(|_| SuitabilityError("device extension list"))?;

        if self.required_extensions.iter().all(|e| extensions.contains(e)) {
            Ok(())
        } else {
            Err(SuitabilityError("required device extensions"))
        }
    }
}
