//! An in-memory driver and window for exercising the construction sequence
//! without a GPU. Every created handle gets a unique id and every create and
//! destroy is recorded in order.

use crate::gfx::consts::EXTENSION_VALIDATION_LAYER;
use crate::gfx::debug::validation::{MessengerConfig, ValidationLayer};
use crate::gfx::device::LogicalDevice;
use crate::gfx::driver::{DeviceApi, DeviceSpec, InstanceApi, InstanceSpec, Loader, VkResult};
use crate::gfx::physical::SelectedDevice;
use crate::gfx::queuefamily::QueueFamilies;
use crate::gfx::swapchain::SwapchainConfig;
use crate::gfx::window::WindowSystem;
use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use vulkanalia::Version;
use vulkanalia::vk::{self, Handle};

const PHYSICAL_DEVICE_BASE: u64 = 0x1000;
const QUEUE_BASE: u64 = 0x2000;
const IMAGE_BASE: u64 = 0x3000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Create(&'static str, u64),
    Destroy(&'static str, u64),
}

pub trait MockHandle: Handle {
    fn from_id(id: u64) -> Self;
    fn id(self) -> u64;
}

macro_rules! mock_handle {
    ($($ty:ty),*) => {
        $(impl MockHandle for $ty {
            #[allow(unused_unsafe)]
            fn from_id(id: u64) -> Self {
                unsafe { <$ty>::from_raw(id as _) }
            }

            fn id(self) -> u64 {
                self.as_raw() as u64
            }
        })*
    };
}

mock_handle!(
    vk::PhysicalDevice,
    vk::Queue,
    vk::SurfaceKHR,
    vk::DebugUtilsMessengerEXT,
    vk::SwapchainKHR,
    vk::Image,
    vk::ImageView
);

/// Routes log output through the test harness; repeated calls are harmless.
pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

pub fn family(flags: vk::QueueFlags, present: bool) -> (vk::QueueFamilyProperties, bool) {
    let properties = vk::QueueFamilyProperties {
        queue_flags: flags,
        queue_count: 1,
        ..Default::default()
    };
    (properties, present)
}

pub fn capabilities(min_image_count: u32, max_image_count: u32) -> vk::SurfaceCapabilitiesKHR {
    vk::SurfaceCapabilitiesKHR {
        min_image_count,
        max_image_count,
        current_extent: vk::Extent2D { width: 800, height: 600 },
        min_image_extent: vk::Extent2D { width: 1, height: 1 },
        max_image_extent: vk::Extent2D { width: 4096, height: 4096 },
        max_image_array_layers: 1,
        current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
        ..Default::default()
    }
}

#[derive(Clone, Debug)]
pub struct MockGpu {
    pub properties: vk::PhysicalDeviceProperties,
    pub features: vk::PhysicalDeviceFeatures,
    /// Family properties paired with present support for the test surface.
    pub families: Vec<(vk::QueueFamilyProperties, bool)>,
    pub extensions: Vec<vk::ExtensionName>,
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl MockGpu {
    /// A device that passes every suitability check.
    pub fn discrete() -> Self {
        let properties = vk::PhysicalDeviceProperties {
            device_type: vk::PhysicalDeviceType::DISCRETE_GPU,
            ..Default::default()
        };
        let features = vk::PhysicalDeviceFeatures {
            geometry_shader: vk::TRUE,
            ..Default::default()
        };

        Self {
            properties,
            features,
            families: vec![family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::TRANSFER, true)],
            extensions: vec![vk::KHR_SWAPCHAIN_EXTENSION.name],
            capabilities: capabilities(2, 4),
            formats: vec![
                vk::SurfaceFormatKHR {
                    format: vk::Format::B8G8R8A8_UNORM,
                    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
                },
                vk::SurfaceFormatKHR {
                    format: vk::Format::B8G8R8A8_SRGB,
                    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
                },
            ],
            present_modes: vec![vk::PresentModeKHR::FIFO],
        }
        .named("Mock Discrete GPU")
    }

    pub fn integrated() -> Self {
        let mut gpu = Self::discrete().named("Mock Integrated GPU");
        gpu.properties.device_type = vk::PhysicalDeviceType::INTEGRATED_GPU;
        gpu
    }

    pub fn named(mut self, name: &str) -> Self {
        self.properties.device_name = vk::ExtensionName::from_bytes(name.as_bytes());
        self
    }

    pub fn without_geometry_shader(mut self) -> Self {
        self.features.geometry_shader = vk::FALSE;
        self
    }

    pub fn with_families(mut self, families: Vec<(vk::QueueFamilyProperties, bool)>) -> Self {
        self.families = families;
        self
    }

    pub fn with_extensions(mut self, extensions: Vec<vk::ExtensionName>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_formats(mut self, formats: Vec<vk::SurfaceFormatKHR>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_present_modes(mut self, present_modes: Vec<vk::PresentModeKHR>) -> Self {
        self.present_modes = present_modes;
        self
    }
}

struct MockState {
    gpus: Vec<MockGpu>,
    layers: Vec<vk::ExtensionName>,
    debug_utils: bool,
    swapchain_image_count: Option<u32>,
    failures: Vec<(&'static str, usize)>,
    attempts: HashMap<&'static str, usize>,
    next_id: u64,
    calls: Vec<Call>,
    instance: Option<(u64, InstanceSpec)>,
    device: Option<(u64, DeviceSpec)>,
    swapchain: Option<SwapchainConfig>,
    surface_support_queries: usize,
    surface_format_queries: usize,
}

/// Loader, instance and device in one; clones share state.
#[derive(Clone)]
pub struct MockDriver(Rc<RefCell<MockState>>);

impl Default for MockDriver {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(MockState {
            gpus: Vec::new(),
            layers: vec![EXTENSION_VALIDATION_LAYER],
            debug_utils: true,
            swapchain_image_count: None,
            failures: Vec::new(),
            attempts: HashMap::new(),
            next_id: 1,
            calls: Vec::new(),
            instance: None,
            device: None,
            swapchain: None,
            surface_support_queries: 0,
            surface_format_queries: 0,
        })))
    }
}

impl MockDriver {
    pub fn with_gpus(gpus: Vec<MockGpu>) -> Self {
        let driver = Self::default();
        driver.0.borrow_mut().gpus = gpus;
        driver
    }

    pub fn set_layers(&self, layers: Vec<vk::ExtensionName>) {
        self.0.borrow_mut().layers = layers;
    }

    pub fn set_debug_utils(&self, available: bool) {
        self.0.borrow_mut().debug_utils = available;
    }

    /// Overrides how many images the driver hands back for a swapchain.
    pub fn set_swapchain_image_count(&self, count: Option<u32>) {
        self.0.borrow_mut().swapchain_image_count = count;
    }

    /// Makes the `nth` (0-based) call of `operation` fail.
    pub fn fail_on(&self, operation: &'static str, nth: usize) {
        self.0.borrow_mut().failures.push((operation, nth));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub fn raw<H: MockHandle>(&self, handle: H) -> u64 {
        handle.id()
    }

    pub fn physical_device(&self, index: usize) -> vk::PhysicalDevice {
        vk::PhysicalDevice::from_id(PHYSICAL_DEVICE_BASE + index as u64)
    }

    pub fn instance_spec(&self) -> Option<InstanceSpec> {
        self.0.borrow().instance.as_ref().map(|(_, spec)| spec.clone())
    }

    pub fn instance_id(&self) -> u64 {
        self.0.borrow().instance.as_ref().map_or(0, |(id, _)| *id)
    }

    pub fn device_spec(&self) -> Option<DeviceSpec> {
        self.0.borrow().device.as_ref().map(|(_, spec)| spec.clone())
    }

    pub fn device_id(&self) -> u64 {
        self.0.borrow().device.as_ref().map_or(0, |(id, _)| *id)
    }

    pub fn swapchain_config(&self) -> Option<SwapchainConfig> {
        self.0.borrow().swapchain
    }

    pub fn surface_support_queries(&self) -> usize {
        self.0.borrow().surface_support_queries
    }

    pub fn surface_format_queries(&self) -> usize {
        self.0.borrow().surface_format_queries
    }

    /// A device on the first GPU, without validation.
    pub fn logical_device(&self, families: QueueFamilies) -> LogicalDevice<MockDriver> {
        let selected = SelectedDevice {
            physical_device: self.physical_device(0),
            families,
            name: "mock".to_owned(),
        };
        LogicalDevice::create(self, &selected, &ValidationLayer::new(false), false).unwrap()
    }

    fn attempt(&self, operation: &'static str) -> VkResult<()> {
        let mut state = self.0.borrow_mut();
        let attempt = state.attempts.entry(operation).or_insert(0);
        let nth = *attempt;
        *attempt += 1;

        if state.failures.contains(&(operation, nth)) {
            Err(vk::ErrorCode::INITIALIZATION_FAILED)
        } else {
            Ok(())
        }
    }

    fn create(&self, kind: &'static str) -> VkResult<u64> {
        self.attempt(kind)?;
        let mut state = self.0.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.calls.push(Call::Create(kind, id));
        Ok(id)
    }

    fn destroy(&self, kind: &'static str, id: u64) {
        self.0.borrow_mut().calls.push(Call::Destroy(kind, id));
    }

    fn gpu(&self, physical_device: vk::PhysicalDevice) -> MockGpu {
        let index = (physical_device.id() - PHYSICAL_DEVICE_BASE) as usize;
        self.0.borrow().gpus[index].clone()
    }
}

impl Loader for MockDriver {
    type Instance = MockDriver;

    unsafe fn version(&self) -> VkResult<Version> {
        Ok(Version::new(1, 3, 0))
    }

    unsafe fn available_layers(&self) -> VkResult<Vec<vk::ExtensionName>> {
        self.attempt("layers")?;
        Ok(self.0.borrow().layers.clone())
    }

    unsafe fn create_instance(&self, spec: &InstanceSpec) -> VkResult<MockDriver> {
        let id = self.create("instance")?;
        self.0.borrow_mut().instance = Some((id, spec.clone()));
        Ok(self.clone())
    }
}

impl InstanceApi for MockDriver {
    type Device = MockDriver;

    unsafe fn create_debug_messenger(
        &self,
        _config: &MessengerConfig,
    ) -> Option<VkResult<vk::DebugUtilsMessengerEXT>> {
        let loaded = {
            let state = self.0.borrow();
            state.debug_utils
                && state.instance.as_ref().is_none_or(|(_, spec)| {
                    spec.extensions.contains(&vk::EXT_DEBUG_UTILS_EXTENSION.name)
                })
        };
        loaded.then(|| self.create("messenger").map(vk::DebugUtilsMessengerEXT::from_id))
    }

    unsafe fn destroy_debug_messenger(&self, messenger: vk::DebugUtilsMessengerEXT) {
        self.destroy("messenger", messenger.id());
    }

    unsafe fn create_surface<W: WindowSystem>(&self, _window: &W) -> VkResult<vk::SurfaceKHR> {
        self.create("surface").map(vk::SurfaceKHR::from_id)
    }

    unsafe fn destroy_surface(&self, surface: vk::SurfaceKHR) {
        self.destroy("surface", surface.id());
    }

    unsafe fn physical_devices(&self) -> VkResult<Vec<vk::PhysicalDevice>> {
        self.attempt("physical devices")?;
        let count = self.0.borrow().gpus.len();
        Ok((0..count).map(|i| self.physical_device(i)).collect())
    }

    unsafe fn properties(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> vk::PhysicalDeviceProperties {
        self.gpu(physical_device).properties
    }

    unsafe fn features(&self, physical_device: vk::PhysicalDevice) -> vk::PhysicalDeviceFeatures {
        self.gpu(physical_device).features
    }

    unsafe fn queue_families(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties> {
        self.gpu(physical_device)
            .families
            .iter()
            .map(|(properties, _)| *properties)
            .collect()
    }

    unsafe fn surface_support(
        &self,
        physical_device: vk::PhysicalDevice,
        queue_family: u32,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<bool> {
        self.0.borrow_mut().surface_support_queries += 1;
        Ok(self.gpu(physical_device).families[queue_family as usize].1)
    }

    unsafe fn device_extensions(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<Vec<vk::ExtensionName>> {
        Ok(self.gpu(physical_device).extensions)
    }

    unsafe fn surface_capabilities(
        &self,
        physical_device: vk::PhysicalDevice,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<vk::SurfaceCapabilitiesKHR> {
        Ok(self.gpu(physical_device).capabilities)
    }

    unsafe fn surface_formats(
        &self,
        physical_device: vk::PhysicalDevice,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::SurfaceFormatKHR>> {
        self.0.borrow_mut().surface_format_queries += 1;
        Ok(self.gpu(physical_device).formats)
    }

    unsafe fn surface_present_modes(
        &self,
        physical_device: vk::PhysicalDevice,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::PresentModeKHR>> {
        Ok(self.gpu(physical_device).present_modes)
    }

    unsafe fn create_device(
        &self,
        _physical_device: vk::PhysicalDevice,
        spec: &DeviceSpec,
    ) -> VkResult<MockDriver> {
        let id = self.create("device")?;
        self.0.borrow_mut().device = Some((id, spec.clone()));
        Ok(self.clone())
    }

    unsafe fn destroy_instance(&self) {
        let id = self.instance_id();
        self.destroy("instance", id);
    }
}

impl DeviceApi for MockDriver {
    unsafe fn queue(&self, queue_family: u32) -> vk::Queue {
        vk::Queue::from_id(QUEUE_BASE + queue_family as u64)
    }

    unsafe fn create_swapchain(
        &self,
        _surface: vk::SurfaceKHR,
        config: &SwapchainConfig,
    ) -> VkResult<vk::SwapchainKHR> {
        let id = self.create("swapchain")?;
        self.0.borrow_mut().swapchain = Some(*config);
        Ok(vk::SwapchainKHR::from_id(id))
    }

    unsafe fn swapchain_images(&self, _swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>> {
        self.attempt("swapchain images")?;
        let state = self.0.borrow();
        let count = state
            .swapchain_image_count
            .or(state.swapchain.map(|c| c.image_count))
            .unwrap_or(0);
        Ok((0..count as u64)
            .map(|i| vk::Image::from_id(IMAGE_BASE + i))
            .collect())
    }

    unsafe fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR) {
        self.destroy("swapchain", swapchain.id());
    }

    unsafe fn create_image_view(&self, _info: &vk::ImageViewCreateInfo) -> VkResult<vk::ImageView> {
        self.create("image view").map(vk::ImageView::from_id)
    }

    unsafe fn destroy_image_view(&self, view: vk::ImageView) {
        self.destroy("image view", view.id());
    }

    unsafe fn destroy_device(&self) {
        let id = self.device_id();
        self.destroy("device", id);
    }
}

/// A window that records its own lifetime in the driver's call log.
pub struct MockWindow {
    driver: MockDriver,
    id: u64,
    size: (u32, u32),
    close_after: Option<usize>,
    polls: usize,
    close_requested: bool,
}

impl MockWindow {
    pub fn new(driver: &MockDriver) -> Self {
        let id = driver.create("window").unwrap();
        Self {
            driver: driver.clone(),
            id,
            size: (800, 600),
            close_after: None,
            polls: 0,
            close_requested: false,
        }
    }

    /// Requests close once `polls` event pumps have happened.
    pub fn close_after(mut self, polls: usize) -> Self {
        self.close_after = Some(polls);
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl WindowSystem for MockWindow {
    fn required_instance_extensions(&self) -> Vec<vk::ExtensionName> {
        vec![vk::KHR_SURFACE_EXTENSION.name]
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn poll_events(&mut self) {
        self.polls += 1;
        if self.close_after.is_some_and(|n| self.polls >= n) {
            self.close_requested = true;
        }
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }
}

impl HasWindowHandle for MockWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        Err(HandleError::Unavailable)
    }
}

impl HasDisplayHandle for MockWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        Err(HandleError::Unavailable)
    }
}

impl Drop for MockWindow {
    fn drop(&mut self) {
        self.driver.destroy("window", self.id);
    }
}
