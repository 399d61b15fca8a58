//! The windowing collaborator: a window to present into and its event pump.

use crate::gfx::config::RendererConfig;
use crate::gfx::error::RendererError;
use log::debug;
use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
};
use std::time::Duration;
use vulkanalia::{vk, window as vk_window};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

pub trait WindowSystem: HasDisplayHandle + HasWindowHandle {
    /// Instance extensions needed to create a surface for this window.
    fn required_instance_extensions(&self) -> Vec<vk::ExtensionName>;

    /// Size of the drawable area in pixels.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Processes pending events without blocking.
    fn poll_events(&mut self);

    fn should_close(&self) -> bool;
}

pub struct WinitWindow {
    // Dropped before the event loop that created it.
    window: Window,
    event_loop: EventLoop<()>,
    close_requested: bool,
}

impl WinitWindow {
    pub fn new(config: &RendererConfig) -> Result<Self, RendererError> {
        let event_loop = EventLoop::new()?;

        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(false);

        // Swapchain recreation is not supported, so the window is created
        // eagerly instead of on `resumed`.
        #[allow(deprecated)]
        let window = event_loop.create_window(attributes)?;

        Ok(Self {
            window,
            event_loop,
            close_requested: false,
        })
    }
}

struct EventPump<'a> {
    close_requested: &'a mut bool,
}

impl ApplicationHandler for EventPump<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested = event {
            debug!("Window close requested.");
            *self.close_requested = true;
        }
    }
}

impl WindowSystem for WinitWindow {
    fn required_instance_extensions(&self) -> Vec<vk::ExtensionName> {
        vk_window::get_required_instance_extensions(&self.window)
            .iter()
            .map(|e| **e)
            .collect()
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn poll_events(&mut self) {
        let mut pump = EventPump {
            close_requested: &mut self.close_requested,
        };
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut pump);

        if let PumpStatus::Exit(code) = status {
            debug!("Event loop exited with code {code}.");
            self.close_requested = true;
        }
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }
}

impl HasWindowHandle for WinitWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        self.window.window_handle()
    }
}

impl HasDisplayHandle for WinitWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        self.window.display_handle()
    }
}
