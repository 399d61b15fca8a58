pub mod config;
pub mod consts;
pub mod context;
pub mod debug;
pub mod device;
pub mod driver;
pub mod error;
pub mod imageview;
pub mod instance;
pub mod physical;
pub mod queuefamily;
pub mod renderer;
pub mod surface;
pub mod swapchain;
pub mod vulkan;
pub mod window;

#[cfg(test)]
mod mock;
