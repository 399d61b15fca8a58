use crate::gfx::consts::REQUIRED_DEVICE_EXTENSIONS;
use crate::gfx::debug::validation::ValidationLayer;
use crate::gfx::driver::{DeviceApi, DeviceSpec, InstanceApi};
use crate::gfx::error::{RendererError, init_err};
use crate::gfx::physical::SelectedDevice;
use log::debug;
use vulkanalia::vk;

/// The logical device and its queues. Destroyed on drop, after every swapchain
/// and image view created from it.
pub struct LogicalDevice<D: DeviceApi> {
    api: D,
    graphics_queue: vk::Queue,
    present_queue: vk::Queue,
}

impl<D: DeviceApi> LogicalDevice<D> {
    pub fn create<I>(
        instance: &I,
        selected: &SelectedDevice,
        validation: &ValidationLayer,
        portability: bool,
    ) -> Result<Self, RendererError>
    where
        I: InstanceApi<Device = D>,
    {
        let spec = Self::spec(selected, validation, portability);
        debug!(
            "Creating logical device with {} queue request(s).",
            spec.queue_families.len()
        );

        let api = unsafe { instance.create_device(selected.physical_device, &spec) }
            .map_err(init_err("logical device"))?;

        let families = selected.families;
        let graphics_queue = unsafe { api.queue(families.graphics) };
        let present_queue = if families.is_unified() {
            graphics_queue
        } else {
            unsafe { api.queue(families.present) }
        };

        Ok(Self {
            api,
            graphics_queue,
            present_queue,
        })
    }

    /// One queue request per unique family. Device layers are ignored by newer
    /// loaders but still set for older implementations.
    pub fn spec(
        selected: &SelectedDevice,
        validation: &ValidationLayer,
        portability: bool,
    ) -> DeviceSpec {
        let mut extensions = REQUIRED_DEVICE_EXTENSIONS.to_vec();

        // Required by Vulkan SDK on macOS since 1.3.216.
        if portability {
            extensions.push(vk::KHR_PORTABILITY_SUBSET_EXTENSION.name);
        }

        DeviceSpec {
            queue_families: selected.families.unique(),
            layers: validation.layers().to_vec(),
            extensions,
        }
    }

    pub fn api(&self) -> &D {
        &self.api
    }

    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    pub fn present_queue(&self) -> vk::Queue {
        self.present_queue
    }
}

impl<D: DeviceApi> Drop for LogicalDevice<D> {
    fn drop(&mut self) {
        unsafe { self.api.destroy_device() }
    }
}
