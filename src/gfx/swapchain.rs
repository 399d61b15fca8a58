//! Swapchain negotiation against the surface's capabilities, and the swapchain
//! itself.

use crate::gfx::consts::UNDEFINED_EXTENT;
use crate::gfx::device::LogicalDevice;
use crate::gfx::driver::{DeviceApi, InstanceApi, VkResult};
use crate::gfx::error::{RendererError, init_err};
use crate::gfx::queuefamily::QueueFamilies;
use crate::gfx::surface::Surface;
use log::{debug, info, trace};
use vulkanalia::vk::{self, Handle};

/// What a surface supports on one physical device. Queried fresh every time.
#[derive(Clone, Debug)]
pub struct SwapchainSupport {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapchainSupport {
    pub unsafe fn get<I: InstanceApi>(
        instance: &I,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Self> {
        unsafe {
            Ok(Self {
                capabilities: instance.surface_capabilities(physical_device, surface)?,
                formats: instance.surface_formats(physical_device, surface)?,
                present_modes: instance.surface_present_modes(physical_device, surface)?,
            })
        }
    }
}

/// Prefers 8-bit BGRA sRGB with the non-linear sRGB color space, otherwise the
/// first listed format.
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    formats
        .iter()
        .copied()
        .find(|f| {
            f.format == vk::Format::B8G8R8A8_SRGB
                && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        })
        .or_else(|| formats.first().copied())
}

/// Mailbox when offered, FIFO otherwise. FIFO support is guaranteed.
pub fn choose_present_mode(present_modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    if present_modes.contains(&vk::PresentModeKHR::MAILBOX) {
        vk::PresentModeKHR::MAILBOX
    } else {
        vk::PresentModeKHR::FIFO
    }
}

/// The surface's current extent when defined, else the framebuffer size clamped
/// into the supported range.
pub fn choose_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    framebuffer_size: (u32, u32),
) -> vk::Extent2D {
    if capabilities.current_extent.width != UNDEFINED_EXTENT {
        return capabilities.current_extent;
    }

    let (width, height) = framebuffer_size;
    vk::Extent2D {
        width: width.clamp(
            capabilities.min_image_extent.width,
            capabilities.max_image_extent.width,
        ),
        height: height.clamp(
            capabilities.min_image_extent.height,
            capabilities.max_image_extent.height,
        ),
    }
}

/// One more than the minimum, bounded by the maximum unless that is 0 (unbounded).
pub fn choose_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let count = capabilities.min_image_count + 1;
    if capabilities.max_image_count != 0 {
        count.min(capabilities.max_image_count)
    } else {
        count
    }
}

/// How swapchain images are shared between the graphics and present queues.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImageSharing {
    Exclusive,
    /// Both families access the images without ownership transfers.
    Concurrent([u32; 2]),
}

impl ImageSharing {
    pub fn for_families(families: &QueueFamilies) -> Self {
        if families.is_unified() {
            Self::Exclusive
        } else {
            Self::Concurrent([families.graphics, families.present])
        }
    }

    pub fn mode(&self) -> vk::SharingMode {
        match self {
            Self::Exclusive => vk::SharingMode::EXCLUSIVE,
            Self::Concurrent(_) => vk::SharingMode::CONCURRENT,
        }
    }

    pub fn queue_family_indices(&self) -> &[u32] {
        match self {
            Self::Exclusive => &[],
            Self::Concurrent(indices) => indices.as_slice(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SwapchainConfig {
    pub surface_format: vk::SurfaceFormatKHR,
    pub present_mode: vk::PresentModeKHR,
    pub extent: vk::Extent2D,
    pub image_count: u32,
    pub pre_transform: vk::SurfaceTransformFlagsKHR,
    pub sharing: ImageSharing,
}

impl SwapchainConfig {
    pub fn negotiate<I: InstanceApi>(
        instance: &I,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
        framebuffer_size: (u32, u32),
        families: &QueueFamilies,
    ) -> Result<Self, RendererError> {
        let support = unsafe { SwapchainSupport::get(instance, physical_device, surface) }
            .map_err(init_err("swapchain support query"))?;
        Self::from_support(&support, framebuffer_size, families)
    }

    pub fn from_support(
        support: &SwapchainSupport,
        framebuffer_size: (u32, u32),
        families: &QueueFamilies,
    ) -> Result<Self, RendererError> {
        let surface_format = choose_surface_format(&support.formats).ok_or(
            RendererError::Initialization {
                what: "swapchain",
                code: vk::ErrorCode::FORMAT_NOT_SUPPORTED,
            },
        )?;

        let config = Self {
            surface_format,
            present_mode: choose_present_mode(&support.present_modes),
            extent: choose_extent(&support.capabilities, framebuffer_size),
            image_count: choose_image_count(&support.capabilities),
            pre_transform: support.capabilities.current_transform,
            sharing: ImageSharing::for_families(families),
        };
        trace!("Negotiated swapchain: {config:?}");

        Ok(config)
    }
}

/// A swapchain and its driver-owned images.
pub struct Swapchain<D: DeviceApi> {
    device: D,
    handle: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    config: SwapchainConfig,
}

impl<D: DeviceApi> Swapchain<D> {
    pub fn create<I: InstanceApi>(
        device: &LogicalDevice<D>,
        surface: &Surface<I>,
        config: &SwapchainConfig,
    ) -> Result<Self, RendererError> {
        let handle = unsafe { device.api().create_swapchain(surface.handle(), config) }
            .map_err(init_err("swapchain"))?;

        let mut swapchain = Self {
            device: device.api().clone(),
            handle,
            images: Vec::new(),
            config: *config,
        };

        // The driver may hand back more images than requested.
        swapchain.images = unsafe { swapchain.device.swapchain_images(handle) }
            .map_err(init_err("swapchain image list"))?;
        if swapchain.images.len() as u32 != config.image_count {
            debug!(
                "Driver adjusted swapchain image count from {} to {}.",
                config.image_count,
                swapchain.images.len()
            );
        }

        info!(
            "Swapchain acquired ({} images, {:?}, {:?})",
            swapchain.images.len(),
            config.surface_format.format,
            config.extent
        );

        Ok(swapchain)
    }

    pub fn handle(&self) -> vk::SwapchainKHR {
        self.handle
    }

    pub fn images(&self) -> &[vk::Image] {
        &self.images
    }

    pub fn format(&self) -> vk::Format {
        self.config.surface_format.format
    }

    pub fn extent(&self) -> vk::Extent2D {
        self.config.extent
    }

    pub fn config(&self) -> &SwapchainConfig {
        &self.config
    }
}

impl<D: DeviceApi> Drop for Swapchain<D> {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { self.device.destroy_swapchain(self.handle) }
        }
    }
}
