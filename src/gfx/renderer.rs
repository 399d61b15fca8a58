//! The externally visible renderer lifecycle.

use crate::gfx::config::RendererConfig;
use crate::gfx::context::GpuContext;
use crate::gfx::driver::Loader;
use crate::gfx::error::RendererError;
use crate::gfx::vulkan::VulkanLoader;
use crate::gfx::window::{WindowSystem, WinitWindow};
use log::{debug, info};
use vulkanalia::vk;

/// What the draw loop needs from any backend.
pub trait Renderer {
    /// Pumps window events. No GPU work is issued yet.
    fn draw(&mut self);

    fn should_close(&self) -> bool;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RendererState {
    Uninitialized,
    Initializing,
    Ready,
    Closing,
    Destroyed,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RendererBackend {
    #[default]
    Vulkan,
}

/// Builds a ready renderer for `backend`, or fails with nothing left behind.
pub fn create_renderer(
    backend: RendererBackend,
    config: &RendererConfig,
) -> Result<impl Renderer, RendererError> {
    match backend {
        RendererBackend::Vulkan => VulkanRenderer::new(config),
    }
}

pub struct VulkanRenderer<W: WindowSystem, L: Loader> {
    state: RendererState,
    // Declared before the window and loader so GPU handles are released first.
    context: Option<GpuContext<L>>,
    window: W,
    loader: L,
}

impl VulkanRenderer<WinitWindow, VulkanLoader> {
    pub fn new(config: &RendererConfig) -> Result<Self, RendererError> {
        let window = WinitWindow::new(config)?;
        let loader = VulkanLoader::new()?;
        Self::with_backend(window, loader, config)
    }
}

impl<W: WindowSystem, L: Loader> VulkanRenderer<W, L> {
    pub fn with_backend(window: W, loader: L, config: &RendererConfig) -> Result<Self, RendererError> {
        let mut state = RendererState::Uninitialized;
        transition(&mut state, RendererState::Initializing);

        let context = GpuContext::create(&loader, &window, config)?;
        transition(&mut state, RendererState::Ready);

        Ok(Self {
            state,
            context: Some(context),
            window,
            loader,
        })
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    pub fn context(&self) -> Option<&GpuContext<L>> {
        self.context.as_ref()
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn device_name(&self) -> Option<&str> {
        self.context.as_ref().map(|c| c.selected_device().name.as_str())
    }

    pub fn swapchain_format(&self) -> Option<vk::Format> {
        self.context.as_ref().map(|c| c.swapchain().format())
    }

    pub fn swapchain_extent(&self) -> Option<vk::Extent2D> {
        self.context.as_ref().map(|c| c.swapchain().extent())
    }

    pub fn present_mode(&self) -> Option<vk::PresentModeKHR> {
        self.context.as_ref().map(|c| c.swapchain().config().present_mode)
    }

    pub fn image_count(&self) -> usize {
        self.context
            .as_ref()
            .map_or(0, |c| c.swapchain().images().len())
    }

    /// Releases every GPU handle in reverse creation order. Calling it again is
    /// a no-op; the window stays alive until the renderer is dropped.
    pub fn close(&mut self) {
        if self.state == RendererState::Destroyed {
            return;
        }

        transition(&mut self.state, RendererState::Closing);
        drop(self.context.take());
        transition(&mut self.state, RendererState::Destroyed);

        info!("Vulkan instance destroyed successfully.");
    }
}

impl<W: WindowSystem, L: Loader> Renderer for VulkanRenderer<W, L> {
    fn draw(&mut self) {
        if self.state == RendererState::Ready {
            self.window.poll_events();
        }
    }

    fn should_close(&self) -> bool {
        self.state != RendererState::Ready || self.window.should_close()
    }
}

impl<W: WindowSystem, L: Loader> Drop for VulkanRenderer<W, L> {
    fn drop(&mut self) {
        self.close();
    }
}

fn transition(state: &mut RendererState, next: RendererState) {
    debug!("Renderer {state:?} -> {next:?}");
    *state = next;
}
