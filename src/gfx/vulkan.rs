//! The vulkanalia-backed driver used outside of tests.

use crate::gfx::consts::ENGINE_NAME;
use crate::gfx::debug::validation::MessengerConfig;
use crate::gfx::driver::{DeviceApi, DeviceSpec, InstanceApi, InstanceSpec, Loader, VkResult};
use crate::gfx::error::RendererError;
use crate::gfx::swapchain::SwapchainConfig;
use crate::gfx::window::WindowSystem;
use vulkanalia::loader::{LIBRARY, LibloadingLoader};
use vulkanalia::vk::{
    DeviceV1_0, EntryV1_0, ExtDebugUtilsExtension, Handle, HasBuilder, InstanceV1_0,
    KhrSurfaceExtension, KhrSwapchainExtension,
};
use vulkanalia::{Device, Entry, Instance, Version, vk, window as vk_window};

/// Owns the loaded Vulkan library. Must outlive every instance created from it.
#[derive(Clone)]
pub struct VulkanLoader {
    entry: Entry,
}

impl VulkanLoader {
    pub fn new() -> Result<Self, RendererError> {
        unsafe {
            let loader = LibloadingLoader::new(LIBRARY)
                .map_err(|e| RendererError::Loader(e.to_string()))?;
            let entry = Entry::new(loader).map_err(|b| RendererError::Loader(b.to_string()))?;
            Ok(Self { entry })
        }
    }
}

impl Loader for VulkanLoader {
    type Instance = VulkanInstance;

    unsafe fn version(&self) -> VkResult<Version> {
        unsafe { self.entry.version() }
    }

    unsafe fn available_layers(&self) -> VkResult<Vec<vk::ExtensionName>> {
        unsafe {
            Ok(self
                .entry
                .enumerate_instance_layer_properties()?
                .iter()
                .map(|l| l.layer_name)
                .collect())
        }
    }

    unsafe fn create_instance(&self, spec: &InstanceSpec) -> VkResult<VulkanInstance> {
        let application_info = vk::ApplicationInfo::builder()
            .application_name(spec.application_name.as_bytes_with_nul())
            .application_version(vk::make_version(0, 1, 0))
            .engine_name(ENGINE_NAME)
            .engine_version(vk::make_version(0, 1, 0))
            .api_version(vk::make_version(1, 0, 0));

        let layers = spec.layers.iter().map(|l| l.as_ptr()).collect::<Vec<_>>();
        let extensions = spec.extensions.iter().map(|e| e.as_ptr()).collect::<Vec<_>>();

        let mut info = vk::InstanceCreateInfo::builder()
            .application_info(&application_info)
            .enabled_layer_names(&layers)
            .enabled_extension_names(&extensions)
            .flags(spec.flags);

        let mut debug_info = spec.messenger.as_ref().map(MessengerConfig::info);
        if let Some(debug_info) = debug_info.as_mut() {
            info = info.push_next(debug_info);
        }

        let instance = unsafe { self.entry.create_instance(&info, None)? };
        let debug_utils = spec
            .extensions
            .contains(&vk::EXT_DEBUG_UTILS_EXTENSION.name);

        Ok(VulkanInstance {
            instance,
            debug_utils,
        })
    }
}

#[derive(Clone)]
pub struct VulkanInstance {
    instance: Instance,
    /// Whether the debug-utils entry points were loaded with the instance.
    debug_utils: bool,
}

impl InstanceApi for VulkanInstance {
    type Device = VulkanDevice;

    unsafe fn create_debug_messenger(
        &self,
        config: &MessengerConfig,
    ) -> Option<VkResult<vk::DebugUtilsMessengerEXT>> {
        if !self.debug_utils {
            return None;
        }
        Some(unsafe {
            self.instance
                .create_debug_utils_messenger_ext(&config.info(), None)
        })
    }

    unsafe fn destroy_debug_messenger(&self, messenger: vk::DebugUtilsMessengerEXT) {
        if self.debug_utils {
            unsafe {
                self.instance
                    .destroy_debug_utils_messenger_ext(messenger, None)
            }
        }
    }

    unsafe fn create_surface<W: WindowSystem>(&self, window: &W) -> VkResult<vk::SurfaceKHR> {
        unsafe { vk_window::create_surface(&self.instance, window, window) }
    }

    unsafe fn destroy_surface(&self, surface: vk::SurfaceKHR) {
        unsafe { self.instance.destroy_surface_khr(surface, None) }
    }

    unsafe fn physical_devices(&self) -> VkResult<Vec<vk::PhysicalDevice>> {
        unsafe { self.instance.enumerate_physical_devices() }
    }

    unsafe fn properties(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> vk::PhysicalDeviceProperties {
        unsafe { self.instance.get_physical_device_properties(physical_device) }
    }

    unsafe fn features(&self, physical_device: vk::PhysicalDevice) -> vk::PhysicalDeviceFeatures {
        unsafe { self.instance.get_physical_device_features(physical_device) }
    }

    unsafe fn queue_families(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties> {
        unsafe {
            self.instance
                .get_physical_device_queue_family_properties(physical_device)
        }
    }

    unsafe fn surface_support(
        &self,
        physical_device: vk::PhysicalDevice,
        queue_family: u32,
        surface: vk::SurfaceKHR,
    ) -> VkResult<bool> {
        unsafe {
            self.instance
                .get_physical_device_surface_support_khr(physical_device, queue_family, surface)
        }
    }

    unsafe fn device_extensions(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<Vec<vk::ExtensionName>> {
        unsafe {
            Ok(self
                .instance
                .enumerate_device_extension_properties(physical_device, None)?
                .iter()
                .map(|e| e.extension_name)
                .collect())
        }
    }

    unsafe fn surface_capabilities(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<vk::SurfaceCapabilitiesKHR> {
        unsafe {
            self.instance
                .get_physical_device_surface_capabilities_khr(physical_device, surface)
        }
    }

    unsafe fn surface_formats(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::SurfaceFormatKHR>> {
        unsafe {
            self.instance
                .get_physical_device_surface_formats_khr(physical_device, surface)
        }
    }

    unsafe fn surface_present_modes(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::PresentModeKHR>> {
        unsafe {
            self.instance
                .get_physical_device_surface_present_modes_khr(physical_device, surface)
        }
    }

    unsafe fn create_device(
        &self,
        physical_device: vk::PhysicalDevice,
        spec: &DeviceSpec,
    ) -> VkResult<VulkanDevice> {
        let queue_priorities = &[1.0];
        let queue_infos = spec
            .queue_families
            .iter()
            .map(|i| {
                vk::DeviceQueueCreateInfo::builder()
                    .queue_family_index(*i)
                    .queue_priorities(queue_priorities)
            })
            .collect::<Vec<_>>();

        // as C strings
        let layers = spec.layers.iter().map(|l| l.as_ptr()).collect::<Vec<_>>();
        let extensions = spec.extensions.iter().map(|e| e.as_ptr()).collect::<Vec<_>>();

        let features = vk::PhysicalDeviceFeatures::builder();

        let info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_layer_names(&layers)
            .enabled_extension_names(&extensions)
            .enabled_features(&features);

        let device = unsafe { self.instance.create_device(physical_device, &info, None)? };
        Ok(VulkanDevice { device })
    }

    unsafe fn destroy_instance(&self) {
        unsafe { self.instance.destroy_instance(None) }
    }
}

#[derive(Clone)]
pub struct VulkanDevice {
    device: Device,
}

impl DeviceApi for VulkanDevice {
    unsafe fn queue(&self, queue_family: u32) -> vk::Queue {
        unsafe { self.device.get_device_queue(queue_family, 0) }
    }

    unsafe fn create_swapchain(
        &self,
        surface: vk::SurfaceKHR,
        config: &SwapchainConfig,
    ) -> VkResult<vk::SwapchainKHR> {
        let info = vk::SwapchainCreateInfoKHR::builder()
            .surface(surface)
            .min_image_count(config.image_count)
            .image_format(config.surface_format.format)
            .image_color_space(config.surface_format.color_space)
            .image_extent(config.extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(config.sharing.mode())
            .queue_family_indices(config.sharing.queue_family_indices())
            .pre_transform(config.pre_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(config.present_mode)
            .clipped(true)
            .old_swapchain(vk::SwapchainKHR::null());

        unsafe { self.device.create_swapchain_khr(&info, None) }
    }

    unsafe fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>> {
        unsafe { self.device.get_swapchain_images_khr(swapchain) }
    }

    unsafe fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR) {
        unsafe { self.device.destroy_swapchain_khr(swapchain, None) }
    }

    unsafe fn create_image_view(&self, info: &vk::ImageViewCreateInfo) -> VkResult<vk::ImageView> {
        unsafe { self.device.create_image_view(info, None) }
    }

    unsafe fn destroy_image_view(&self, view: vk::ImageView) {
        unsafe { self.device.destroy_image_view(view, None) }
    }

    unsafe fn destroy_device(&self) {
        unsafe { self.device.destroy_device(None) }
    }
}
