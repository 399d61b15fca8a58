//! Brings up a Vulkan instance, device and swapchain for a single window.

pub mod gfx;

pub use gfx::config::RendererConfig;
pub use gfx::error::RendererError;
pub use gfx::renderer::{Renderer, RendererBackend, RendererState, VulkanRenderer, create_renderer};
