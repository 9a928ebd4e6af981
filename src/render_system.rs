mod system;
pub use system::{MeshId, RenderSystem};

mod device;
mod instance;
pub mod mesh;
mod shaders;
mod swapchain;

use vulkano::{
    device::DeviceCreationError,
    instance::InstanceCreationError,
    memory::allocator::AllocationCreationError,
    pipeline::graphics::GraphicsPipelineCreationError,
    render_pass::{FramebufferCreationError, RenderPassCreationError},
    shader::ShaderCreationError,
    swapchain::SwapchainCreationError,
    LoadingError, VulkanError,
};

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to load the Vulkan library")]
    Loading(#[from] LoadingError),
    #[error("failed to create Vulkan instance")]
    Instance(#[from] InstanceCreationError),
    #[error("failed to create window surface")]
    Surface(#[from] vulkano_win::CreationError),
    #[error("Vulkan call failed")]
    Vulkan(#[from] VulkanError),
    #[error("no physical device supports graphics and presentation to this window")]
    NoSuitableDevice,
    #[error("device was created without a queue")]
    NoQueue,
    #[error("failed to create logical device")]
    Device(#[from] DeviceCreationError),
    #[error("surface is not backed by a winit window")]
    MissingWindow,
    #[error("surface reports no composite alpha mode")]
    NoCompositeAlpha,
    #[error("surface reports no image format")]
    NoSurfaceFormat,
    #[error("failed to create swapchain")]
    Swapchain(#[from] SwapchainCreationError),
    #[error("failed to create render pass")]
    RenderPass(#[from] RenderPassCreationError),
    #[error("failed to create framebuffer")]
    Framebuffer(#[from] FramebufferCreationError),
    #[error("failed to load shader module")]
    Shader(#[from] ShaderCreationError),
    #[error("shader module has no `main` entry point")]
    MissingEntryPoint,
    #[error("render pass has no subpass 0")]
    MissingSubpass,
    #[error("failed to create graphics pipeline")]
    Pipeline(#[from] GraphicsPipelineCreationError),
    #[error("failed to allocate buffer memory")]
    Allocation(#[from] AllocationCreationError),
    #[error("cannot upload a mesh without vertices")]
    EmptyMesh,
    #[error("mesh {0:?} was not registered with this render system")]
    UnknownMesh(MeshId),
    #[error("failed to set up rendering resources")]
    Setup(#[source] BoxedError),
    #[error("failed to record frame commands")]
    Record(#[source] BoxedError),
}

impl RenderError {
    pub(crate) fn setup<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RenderError::Setup(Box::new(err))
    }

    pub(crate) fn record<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RenderError::Record(Box::new(err))
    }
}
