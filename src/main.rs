use anyhow::Result;
use log::info;
use rkengine::{Renderer, RendererBackend, RendererConfig, create_renderer};

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = RendererConfig::default().with_env_overrides();
    let mut renderer = create_renderer(RendererBackend::Vulkan, &config)?;

    while !renderer.should_close() {
        renderer.draw();
    }

    info!("Window closed, shutting down.");
    Ok(())
}
