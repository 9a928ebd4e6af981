use std::sync::Arc;

use vulkano::instance::{Instance, InstanceCreateInfo};
use vulkano::{Version, VulkanLibrary};

use super::RenderError;

pub fn create_instance_for_window_app() -> Result<Arc<Instance>, RenderError> {
    let library = VulkanLibrary::new()?;
    let extensions = vulkano_win::required_extensions(&library);

    let instance = Instance::new(
        library,
        InstanceCreateInfo {
            enabled_extensions: extensions,
            enumerate_portability: true, // required for MoltenVK on macOS
            max_api_version: Some(Version::V1_1),
            ..Default::default()
        },
    )?;
    log::info!("Created Vulkan instance (api {:?})", instance.api_version());
    Ok(instance)
}
