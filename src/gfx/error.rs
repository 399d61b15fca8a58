use thiserror::Error;
use vulkanalia::vk;
use winit::error::{EventLoopError, OsError};

/// Everything that can abort renderer construction.
///
/// None of these are retried: the construction sequence unwinds whatever it
/// already acquired and hands the error to the caller.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Validation layers requested, but not available: {}.", missing.join(", "))]
    Configuration { missing: Vec<String> },

    #[error("Failed to create {what}: {code}.")]
    Initialization {
        what: &'static str,
        #[source]
        code: vk::ErrorCode,
    },

    #[error("Failed to find a suitable GPU.")]
    NoSuitableDevice,

    #[error("Failed to load the Vulkan library: {0}.")]
    Loader(String),

    #[error(transparent)]
    EventLoop(#[from] EventLoopError),

    #[error(transparent)]
    Window(#[from] OsError),
}

/// Maps a driver status onto [`RendererError::Initialization`] for `what`.
pub(crate) fn init_err(what: &'static str) -> impl FnOnce(vk::ErrorCode) -> RendererError {
    move |code| RendererError::Initialization { what, code }
}

/// A physical device was rejected by the suitability predicate.
#[derive(Debug, Error)]
#[error("Missing {0}.")]
pub struct SuitabilityError(pub &'static str);
