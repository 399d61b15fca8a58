//! The composed chain of GPU resources behind a renderer.

use crate::gfx::config::RendererConfig;
use crate::gfx::consts::REQUIRED_DEVICE_EXTENSIONS;
use crate::gfx::debug::validation::{DebugMessenger, ValidationLayer};
use crate::gfx::device::LogicalDevice;
use crate::gfx::driver::{DeviceOf, Loader};
use crate::gfx::error::RendererError;
use crate::gfx::imageview::ImageViewSet;
use crate::gfx::instance::InstanceContext;
use crate::gfx::physical::{PhysicalDeviceSelector, SelectedDevice};
use crate::gfx::surface::Surface;
use crate::gfx::swapchain::{Swapchain, SwapchainConfig};
use crate::gfx::window::WindowSystem;
use log::debug;

/// Every handle from instance to image views.
///
/// Fields drop in declaration order, which is the reverse of creation order:
/// image views, swapchain, device, surface, messenger, instance.
pub struct GpuContext<L: Loader> {
    image_views: ImageViewSet<DeviceOf<L>>,
    swapchain: Swapchain<DeviceOf<L>>,
    device: LogicalDevice<DeviceOf<L>>,
    selected: SelectedDevice,
    surface: Surface<L::Instance>,
    messenger: DebugMessenger<L::Instance>,
    instance: InstanceContext<L::Instance>,
}

impl<L: Loader> GpuContext<L> {
    /// Runs the construction sequence. On failure, everything acquired so far is
    /// released in reverse order as the locals go out of scope.
    pub fn create<W: WindowSystem>(
        loader: &L,
        window: &W,
        config: &RendererConfig,
    ) -> Result<Self, RendererError> {
        let validation = ValidationLayer::new(config.validation);

        let instance = InstanceContext::create(loader, window, &validation, &config.title)?;
        let messenger = validation.create_messenger(instance.api())?;

        // the surface must be created prior to picking the physical device
        let surface = Surface::create(instance.api(), window)?;

        let selected =
            PhysicalDeviceSelector::new(instance.api(), surface.handle(), REQUIRED_DEVICE_EXTENSIONS)
                .select()?;
        debug!("Queue families: {:?}", selected.families);

        let device =
            LogicalDevice::create(instance.api(), &selected, &validation, instance.portability())?;

        let swapchain_config = SwapchainConfig::negotiate(
            instance.api(),
            selected.physical_device,
            surface.handle(),
            window.framebuffer_size(),
            &selected.families,
        )?;
        let swapchain = Swapchain::create(&device, &surface, &swapchain_config)?;

        let image_views = ImageViewSet::create(&device, swapchain.images(), swapchain.format())?;

        Ok(Self {
            image_views,
            swapchain,
            device,
            selected,
            surface,
            messenger,
            instance,
        })
    }

    pub fn selected_device(&self) -> &SelectedDevice {
        &self.selected
    }

    pub fn device(&self) -> &LogicalDevice<DeviceOf<L>> {
        &self.device
    }

    pub fn swapchain(&self) -> &Swapchain<DeviceOf<L>> {
        &self.swapchain
    }

    pub fn image_views(&self) -> &ImageViewSet<DeviceOf<L>> {
        &self.image_views
    }

    pub fn surface(&self) -> &Surface<L::Instance> {
        &self.surface
    }

    pub fn messenger(&self) -> &DebugMessenger<L::Instance> {
        &self.messenger
    }

    pub fn instance(&self) -> &InstanceContext<L::Instance> {
        &self.instance
    }
}
