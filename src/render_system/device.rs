use std::sync::Arc;

use vulkano::{
    device::{
        physical::PhysicalDeviceType, Device, DeviceCreateInfo, DeviceExtensions, Queue,
        QueueCreateInfo,
    },
    instance::Instance,
    swapchain::Surface,
};

use super::RenderError;

pub struct DeviceAndQueue {
    logical: Arc<Device>,
    queue: Arc<Queue>,
}

impl DeviceAndQueue {
    pub fn into_parts(self) -> (Arc<Device>, Arc<Queue>) {
        (self.logical, self.queue)
    }
}

fn device_type_rank(device_type: PhysicalDeviceType) -> u32 {
    // lower score for preferred device types
    match device_type {
        PhysicalDeviceType::DiscreteGpu => 0,
        PhysicalDeviceType::IntegratedGpu => 1,
        PhysicalDeviceType::VirtualGpu => 2,
        PhysicalDeviceType::Cpu => 3,
        PhysicalDeviceType::Other => 4,
        _ => 5,
    }
}

pub fn create_device_and_queue_for_window_app(
    instance: Arc<Instance>,
    surface: Arc<Surface>,
) -> Result<DeviceAndQueue, RenderError> {
    let device_extensions = DeviceExtensions {
        khr_swapchain: true,
        ..DeviceExtensions::empty()
    };

    let (physical_device, queue_family_index) = instance
        .enumerate_physical_devices()?
        .filter(|p| p.supported_extensions().contains(&device_extensions))
        .filter_map(|p| {
            p.queue_family_properties()
                .iter()
                .enumerate()
                .position(|(i, q)| {
                    // first family that does graphics and can present to the winit surface
                    q.queue_flags.graphics && p.surface_support(i as u32, &surface).unwrap_or(false)
                })
                .map(|i| (p, i as u32))
        })
        .min_by_key(|(p, _)| device_type_rank(p.properties().device_type))
        .ok_or(RenderError::NoSuitableDevice)?;

    log::info!(
        "Using {} ({:?}), queue family {}",
        physical_device.properties().device_name,
        physical_device.properties().device_type,
        queue_family_index
    );

    let (logical_device, mut queues) = Device::new(
        physical_device,
        DeviceCreateInfo {
            enabled_extensions: device_extensions,
            queue_create_infos: vec![QueueCreateInfo {
                queue_family_index,
                ..Default::default()
            }],
            ..Default::default()
        },
    )?;
    let queue = queues.next().ok_or(RenderError::NoQueue)?;

    Ok(DeviceAndQueue {
        logical: logical_device,
        queue,
    })
}
