use vulkanalia::Version;
use vulkanalia::vk;

/// Default for [`RendererConfig::validation`](crate::gfx::config::RendererConfig).
pub const VALIDATION_ENABLED: bool = cfg!(debug_assertions);
pub const EXTENSION_VALIDATION_LAYER: vulkanalia_sys::ExtensionName =
    vulkanalia_sys::ExtensionName::from_bytes(b"VK_LAYER_KHRONOS_validation");
pub const PORTABILITY_MACOS_VERSION: Version = Version::new(1, 3, 216);

pub const REQUIRED_DEVICE_EXTENSIONS: &[vk::ExtensionName] = &[vk::KHR_SWAPCHAIN_EXTENSION.name];

pub const ENGINE_NAME: &[u8] = b"RKEngine\0";

/// Surfaces report this as their current extent when the window decides the size.
pub const UNDEFINED_EXTENT: u32 = u32::MAX;

pub const VALIDATION_ENV_VAR: &str = "RKENGINE_VALIDATION";
