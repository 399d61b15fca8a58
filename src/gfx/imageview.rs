use crate::gfx::device::LogicalDevice;
use crate::gfx::driver::DeviceApi;
use crate::gfx::error::{RendererError, init_err};
use vulkanalia::vk::{self, Handle, HasBuilder};

/// A 2D color view with identity swizzles over one mip level and one layer.
pub fn view_info(image: vk::Image, format: vk::Format) -> vk::ImageViewCreateInfo {
    let components = vk::ComponentMapping::builder()
        .r(vk::ComponentSwizzle::IDENTITY)
        .g(vk::ComponentSwizzle::IDENTITY)
        .b(vk::ComponentSwizzle::IDENTITY)
        .a(vk::ComponentSwizzle::IDENTITY);

    let subresource_range = vk::ImageSubresourceRange::builder()
        .aspect_mask(vk::ImageAspectFlags::COLOR)
        .base_mip_level(0)
        .level_count(1)
        .base_array_layer(0)
        .layer_count(1);

    vk::ImageViewCreateInfo::builder()
        .image(image)
        .view_type(vk::ImageViewType::_2D)
        .format(format)
        .components(components)
        .subresource_range(subresource_range)
        .build()
}

/// One view per swapchain image, used later as render targets.
pub struct ImageViewSet<D: DeviceApi> {
    device: D,
    views: Vec<vk::ImageView>,
}

impl<D: DeviceApi> ImageViewSet<D> {
    /// Views created before a failure are released when the partial set drops.
    pub fn create(
        device: &LogicalDevice<D>,
        images: &[vk::Image],
        format: vk::Format,
    ) -> Result<Self, RendererError> {
        let mut set = Self {
            device: device.api().clone(),
            views: Vec::with_capacity(images.len()),
        };

        for image in images {
            let info = view_info(*image, format);
            let view = unsafe { set.device.create_image_view(&info) }
                .map_err(init_err("swapchain image view"))?;
            set.views.push(view);
        }

        Ok(set)
    }

    pub fn views(&self) -> &[vk::ImageView] {
        &self.views
    }
}

impl<D: DeviceApi> Drop for ImageViewSet<D> {
    fn drop(&mut self) {
        for view in self.views.drain(..).rev() {
            if !view.is_null() {
                unsafe { self.device.destroy_image_view(view) }
            }
        }
    }
}
