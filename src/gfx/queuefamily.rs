use crate::gfx::driver::{InstanceApi, VkResult};
use vulkanalia::vk;

/// Queue families found on a physical device, possibly incomplete.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: Option<u32>,
    pub present: Option<u32>,
}

/// Queue families of a device that passed discovery.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QueueFamilies {
    pub graphics: u32,
    pub present: u32,
}

impl QueueFamilyIndices {
    /// Scans families in index order for the first graphics-capable family and,
    /// independently, the first family that can present to `surface`. Stops as
    /// soon as both are known.
    pub unsafe fn get<I: InstanceApi>(
        instance: &I,
        surface: vk::SurfaceKHR,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<Self> {
        unsafe {
            let properties = instance.queue_families(physical_device);

            let mut indices = Self::default();
            for (index, properties) in properties.iter().enumerate() {
                let index = index as u32;

                if indices.graphics.is_none()
                    && properties.queue_flags.contains(vk::QueueFlags::GRAPHICS)
                {
                    indices.graphics = Some(index);
                }

                if indices.present.is_none()
                    && instance.surface_support(physical_device, index, surface)?
                {
                    indices.present = Some(index);
                }

                if indices.is_complete() {
                    break;
                }
            }

            Ok(indices)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.graphics.is_some() && self.present.is_some()
    }

    pub fn complete(self) -> Option<QueueFamilies> {
        Some(QueueFamilies {
            graphics: self.graphics?,
            present: self.present?,
        })
    }
}

impl QueueFamilies {
    pub fn is_unified(&self) -> bool {
        self.graphics == self.present
    }

    /// Distinct family indices, graphics first.
    pub fn unique(&self) -> Vec<u32> {
        if self.is_unified() {
            vec![self.graphics]
        } else {
            vec![self.graphics, self.present]
        }
    }
}
