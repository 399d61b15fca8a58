//! The seam between the renderer and the graphics driver.
//!
//! The traits follow Vulkan's own dispatch levels: a [`Loader`] creates an
//! instance, an [`InstanceApi`] answers physical-device and surface queries and
//! creates a device, and a [`DeviceApi`] owns device-level objects. Every method
//! is a raw driver call; the scoped wrappers in the sibling modules are the only
//! callers and are responsible for handle provenance and destruction order.
//!
//! Enumerations return `Vec`s. Implementations must honour the driver's
//! count-then-fill contract, where the count may change between the two calls.

use crate::gfx::debug::validation::MessengerConfig;
use crate::gfx::swapchain::SwapchainConfig;
use crate::gfx::window::WindowSystem;
use std::ffi::CString;
use vulkanalia::{Version, vk};

pub type VkResult<T> = Result<T, vk::ErrorCode>;

/// Everything needed for instance creation.
#[derive(Clone, Debug)]
pub struct InstanceSpec {
    pub application_name: CString,
    pub layers: Vec<vk::ExtensionName>,
    pub extensions: Vec<vk::ExtensionName>,
    pub flags: vk::InstanceCreateFlags,
    /// Chained into instance creation so that creation itself is observed.
    pub messenger: Option<MessengerConfig>,
}

/// Everything needed for logical device creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceSpec {
    /// One single-queue request at priority 1.0 per entry; entries are unique.
    pub queue_families: Vec<u32>,
    pub layers: Vec<vk::ExtensionName>,
    pub extensions: Vec<vk::ExtensionName>,
}

pub trait Loader {
    type Instance: InstanceApi;

    unsafe fn version(&self) -> VkResult<Version>;

    unsafe fn available_layers(&self) -> VkResult<Vec<vk::ExtensionName>>;

    unsafe fn create_instance(&self, spec: &InstanceSpec) -> VkResult<Self::Instance>;
}

/// Instance-level entry points. Cloning shares the dispatch table, not ownership
/// of the instance.
pub trait InstanceApi: Clone {
    type Device: DeviceApi;

    /// `None` when the debug-utils entry points were not resolved.
    unsafe fn create_debug_messenger(
        &self,
        config: &MessengerConfig,
    ) -> Option<VkResult<vk::DebugUtilsMessengerEXT>>;

    unsafe fn destroy_debug_messenger(&self, messenger: vk::DebugUtilsMessengerEXT);

    unsafe fn create_surface<W: WindowSystem>(&self, window: &W) -> VkResult<vk::SurfaceKHR>;

    unsafe fn destroy_surface(&self, surface: vk::SurfaceKHR);

    unsafe fn physical_devices(&self) -> VkResult<Vec<vk::PhysicalDevice>>;

    unsafe fn properties(&self, physical_device: vk::PhysicalDevice)
    -> vk::PhysicalDeviceProperties;

    unsafe fn features(&self, physical_device: vk::PhysicalDevice) -> vk::PhysicalDeviceFeatures;

    unsafe fn queue_families(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties>;

    unsafe fn surface_support(
        &self,
        physical_device: vk::PhysicalDevice,
        queue_family: u32,
        surface: vk::SurfaceKHR,
    ) -> VkResult<bool>;

    unsafe fn device_extensions(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<Vec<vk::ExtensionName>>;

    unsafe fn surface_capabilities(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<vk::SurfaceCapabilitiesKHR>;

    unsafe fn surface_formats(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::SurfaceFormatKHR>>;

    unsafe fn surface_present_modes(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::PresentModeKHR>>;

    unsafe fn create_device(
        &self,
        physical_device: vk::PhysicalDevice,
        spec: &DeviceSpec,
    ) -> VkResult<Self::Device>;

    unsafe fn destroy_instance(&self);
}

/// Device-level entry points. Cloning shares the dispatch table.
pub trait DeviceApi: Clone {
    unsafe fn queue(&self, queue_family: u32) -> vk::Queue;

    unsafe fn create_swapchain(
        &self,
        surface: vk::SurfaceKHR,
        config: &SwapchainConfig,
    ) -> VkResult<vk::SwapchainKHR>;

    unsafe fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>>;

    unsafe fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR);

    unsafe fn create_image_view(&self, info: &vk::ImageViewCreateInfo) -> VkResult<vk::ImageView>;

    unsafe fn destroy_image_view(&self, view: vk::ImageView);

    unsafe fn destroy_device(&self);
}

pub type DeviceOf<L> = <<L as Loader>::Instance as InstanceApi>::Device;
