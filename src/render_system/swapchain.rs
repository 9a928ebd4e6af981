use std::sync::Arc;

use vulkano::{
    device::Device,
    image::{view::ImageView, SwapchainImage},
    render_pass::{Framebuffer, FramebufferCreateInfo, RenderPass},
    swapchain::{Surface, Swapchain, SwapchainCreateInfo},
};

use winit::{dpi::PhysicalSize, window::Window};

use super::RenderError;

pub fn surface_window(surface: &Surface) -> Option<&Window> {
    surface.object()?.downcast_ref::<Window>()
}

pub fn surface_extent(surface: &Surface) -> Result<PhysicalSize<u32>, RenderError> {
    surface_window(surface)
        .map(Window::inner_size)
        .ok_or(RenderError::MissingWindow)
}

pub fn create_swapchain_and_images(
    device: Arc<Device>,
    surface: Arc<Surface>,
    old_swapchain: Option<Arc<Swapchain>>,
) -> Result<(Arc<Swapchain>, Vec<Arc<SwapchainImage>>), RenderError> {
    let image_extent: [u32; 2] = surface_extent(&surface)?.into();

    if let Some(old_swapchain) = old_swapchain {
        log::debug!("Recreating swapchain at {:?}", image_extent);
        return Ok(old_swapchain.recreate(SwapchainCreateInfo {
            image_extent,
            ..old_swapchain.create_info()
        })?);
    }

    let caps = device
        .physical_device()
        .surface_capabilities(&surface, Default::default())
        .map_err(RenderError::setup)?;

    let usage = caps.supported_usage_flags;
    let alpha = caps
        .supported_composite_alpha
        .iter()
        .next()
        .ok_or(RenderError::NoCompositeAlpha)?;

    let image_format = device
        .physical_device()
        .surface_formats(&surface, Default::default())
        .map_err(RenderError::setup)?
        .first()
        .map(|(format, _)| *format)
        .ok_or(RenderError::NoSurfaceFormat)?;

    log::info!(
        "Creating swapchain {:?} with {} images, format {:?}",
        image_extent,
        caps.min_image_count,
        image_format
    );

    Ok(Swapchain::new(
        device,
        surface,
        SwapchainCreateInfo {
            min_image_count: caps.min_image_count,
            image_format: Some(image_format),
            image_extent,
            image_usage: usage,
            composite_alpha: alpha,
            ..Default::default()
        },
    )?)
}

pub fn create_framebuffers(
    images: &[Arc<SwapchainImage>],
    render_pass: Arc<RenderPass>,
) -> Result<Vec<Arc<Framebuffer>>, RenderError> {
    let mut framebuffers = Vec::with_capacity(images.len());
    for image in images {
        let view = ImageView::new_default(image.clone()).map_err(RenderError::setup)?;
        framebuffers.push(Framebuffer::new(
            render_pass.clone(),
            FramebufferCreateInfo {
                attachments: vec![view],
                ..Default::default()
            },
        )?);
    }
    Ok(framebuffers)
}
