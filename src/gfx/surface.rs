use crate::gfx::driver::InstanceApi;
use crate::gfx::error::{RendererError, init_err};
use crate::gfx::window::WindowSystem;
use vulkanalia::vk::{self, Handle};

/// A presentable surface bound to one window and one instance.
pub struct Surface<I: InstanceApi> {
    instance: I,
    handle: vk::SurfaceKHR,
}

impl<I: InstanceApi> Surface<I> {
    pub fn create<W: WindowSystem>(instance: &I, window: &W) -> Result<Self, RendererError> {
        let handle = unsafe { instance.create_surface(window) }.map_err(init_err("window surface"))?;
        Ok(Self {
            instance: instance.clone(),
            handle,
        })
    }

    pub fn handle(&self) -> vk::SurfaceKHR {
        self.handle
    }
}

impl<I: InstanceApi> Drop for Surface<I> {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { self.instance.destroy_surface(self.handle) }
        }
    }
}
