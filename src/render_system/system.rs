use std::sync::Arc;

use vulkano::{
    buffer::{BufferUsage, CpuAccessibleBuffer, CpuBufferPool, TypedBufferAccess},
    command_buffer::{
        allocator::StandardCommandBufferAllocator, AutoCommandBufferBuilder, CommandBufferUsage,
        PrimaryAutoCommandBuffer, RenderPassBeginInfo, SubpassContents,
    },
    device::{Device, Queue},
    memory::allocator::StandardMemoryAllocator,
    pipeline::{
        graphics::{
            input_assembly::InputAssemblyState,
            vertex_input::BuffersDefinition,
            viewport::{Viewport, ViewportState},
        },
        GraphicsPipeline, Pipeline,
    },
    render_pass::{Framebuffer, RenderPass, Subpass},
    swapchain::{
        AcquireError, Surface, Swapchain, SwapchainAcquireFuture, SwapchainCreationError,
        SwapchainPresentInfo,
    },
    sync::{self, FlushError, GpuFuture},
};

use vulkano_win::VkSurfaceBuild;

use winit::{
    dpi::LogicalSize,
    event_loop::EventLoop,
    window::WindowBuilder,
};

use super::{device, instance, shaders, swapchain, RenderError};
use crate::config::Config;
use crate::vertex::{InstanceData, Vertex};

/// Handle to a mesh uploaded with [`RenderSystem::add_mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderStage {
    Stopped,
    Drawing,
}

impl RenderStage {
    /// An open frame holds an acquired swapchain image that must be presented
    /// before another one is acquired.
    fn has_pending_frame(self) -> bool {
        self == RenderStage::Drawing
    }
}

/// Draws instanced 2D meshes into a window.
///
/// A frame is `start_frame`, any number of `render_instances`, then
/// `finish_frame`. When `start_frame` cannot get an image (minimised window,
/// out-of-date swapchain) the rest of that frame's calls do nothing.
pub struct RenderSystem {
    surface: Arc<Surface>,
    device: Arc<Device>,
    queue: Arc<Queue>,
    swapchain: Arc<Swapchain>,
    memory_allocator: Arc<StandardMemoryAllocator>,
    command_buffer_allocator: StandardCommandBufferAllocator,
    instance_buffer_pool: CpuBufferPool<InstanceData>,
    render_pass: Arc<RenderPass>,
    pipeline: Arc<GraphicsPipeline>,
    framebuffers: Vec<Arc<Framebuffer>>,
    viewport: Viewport,
    meshes: Vec<Arc<CpuAccessibleBuffer<[Vertex]>>>,
    clear_color: [f32; 4],
    aspect_stretch: [f32; 2],
    render_stage: RenderStage,
    commands: Option<AutoCommandBufferBuilder<PrimaryAutoCommandBuffer>>,
    image_index: u32,
    acquire_future: Option<SwapchainAcquireFuture>,
    previous_frame_end: Option<Box<dyn GpuFuture>>,
    recreate_swapchain: bool,
}

impl RenderSystem {
    pub fn new(event_loop: &EventLoop<()>, config: &Config) -> Result<Self, RenderError> {
        let instance = instance::create_instance_for_window_app()?;
        let surface = WindowBuilder::new()
            .with_title(config.window.title.clone())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
            .build_vk_surface(event_loop, instance.clone())?;
        let (device, queue) =
            device::create_device_and_queue_for_window_app(instance, surface.clone())?
                .into_parts();
        let (swapchain, swapchain_images) =
            swapchain::create_swapchain_and_images(device.clone(), surface.clone(), None)?;

        let memory_allocator = Arc::new(StandardMemoryAllocator::new_default(device.clone()));
        let command_buffer_allocator =
            StandardCommandBufferAllocator::new(device.clone(), Default::default());
        let instance_buffer_pool = CpuBufferPool::vertex_buffer(memory_allocator.clone());

        let render_pass = vulkano::single_pass_renderpass!(
            device.clone(),
            attachments: {
                color: {
                    load: Clear,
                    store: Store,
                    format: swapchain.image_format(),
                    samples: 1,
                }
            },
            pass: {
                color: [color],
                depth_stencil: {}
            }
        )?;

        let vs = shaders::instanced_vert::load(device.clone())?;
        let fs = shaders::flat_frag::load(device.clone())?;

        // binding 0 advances per vertex, binding 1 per instance
        let pipeline = GraphicsPipeline::start()
            .vertex_input_state(
                BuffersDefinition::new()
                    .vertex::<Vertex>()
                    .instance::<InstanceData>(),
            )
            .vertex_shader(
                vs.entry_point("main").ok_or(RenderError::MissingEntryPoint)?,
                (),
            )
            .input_assembly_state(InputAssemblyState::new())
            .viewport_state(ViewportState::viewport_dynamic_scissor_irrelevant())
            .fragment_shader(
                fs.entry_point("main").ok_or(RenderError::MissingEntryPoint)?,
                (),
            )
            .render_pass(
                Subpass::from(render_pass.clone(), 0).ok_or(RenderError::MissingSubpass)?,
            )
            .build(device.clone())?;

        let framebuffers = swapchain::create_framebuffers(&swapchain_images, render_pass.clone())?;
        let viewport = full_viewport(swapchain.image_extent());
        let previous_frame_end = Some(sync::now(device.clone()).boxed());

        log::info!("Render system ready");

        Ok(RenderSystem {
            surface,
            device,
            queue,
            swapchain,
            memory_allocator,
            command_buffer_allocator,
            instance_buffer_pool,
            render_pass,
            pipeline,
            framebuffers,
            viewport,
            meshes: Vec::new(),
            clear_color: config.render.clear_color,
            aspect_stretch: config.render.aspect_stretch,
            render_stage: RenderStage::Stopped,
            commands: None,
            image_index: 0,
            acquire_future: None,
            previous_frame_end,
            recreate_swapchain: false,
        })
    }

    /// Uploads a triangle list and returns the handle to draw it with.
    pub fn add_mesh(&mut self, vertices: &[Vertex]) -> Result<MeshId, RenderError> {
        if vertices.is_empty() {
            return Err(RenderError::EmptyMesh);
        }
        let buffer = CpuAccessibleBuffer::from_iter(
            &self.memory_allocator,
            BufferUsage {
                vertex_buffer: true,
                ..BufferUsage::empty()
            },
            false,
            vertices.iter().copied(),
        )?;
        self.meshes.push(buffer);
        let id = MeshId(self.meshes.len() - 1);
        log::debug!("Uploaded mesh {:?} ({} vertices)", id, vertices.len());
        Ok(id)
    }

    /// Marks the swapchain stale, e.g. after a resize. It is rebuilt at the
    /// start of the next frame.
    pub fn request_swapchain_recreation(&mut self) {
        self.recreate_swapchain = true;
    }

    pub fn start_frame(&mut self) -> Result<(), RenderError> {
        if let Some(previous_frame_end) = self.previous_frame_end.as_mut() {
            previous_frame_end.cleanup_finished();
        }

        if self.render_stage.has_pending_frame() {
            log::warn!("Frame started before the previous one finished, presenting it as is");
            self.finish_frame()?;
        }

        let extent = swapchain::surface_extent(&self.surface)?;
        if extent.width == 0 || extent.height == 0 {
            return Ok(());
        }

        if self.recreate_swapchain {
            self.recreate_swapchain()?;
            if self.recreate_swapchain {
                return Ok(());
            }
        }

        let (image_index, suboptimal, acquire_future) =
            match vulkano::swapchain::acquire_next_image(self.swapchain.clone(), None) {
                Ok(r) => r,
                Err(AcquireError::OutOfDate) => {
                    self.recreate_swapchain = true;
                    return Ok(());
                }
                Err(e) => return Err(RenderError::record(e)),
            };

        // still presentable, rebuild before the next frame
        if suboptimal {
            self.recreate_swapchain = true;
        }

        let clear_values = vec![Some(self.clear_color.into())];

        let mut commands = AutoCommandBufferBuilder::primary(
            &self.command_buffer_allocator,
            self.queue.queue_family_index(),
            CommandBufferUsage::OneTimeSubmit,
        )
        .map_err(RenderError::record)?;

        commands
            .begin_render_pass(
                RenderPassBeginInfo {
                    clear_values,
                    ..RenderPassBeginInfo::framebuffer(
                        self.framebuffers[image_index as usize].clone(),
                    )
                },
                SubpassContents::Inline,
            )
            .map_err(RenderError::record)?
            .set_viewport(0, [self.viewport.clone()])
            .bind_pipeline_graphics(self.pipeline.clone());

        self.commands = Some(commands);
        self.image_index = image_index;
        self.acquire_future = Some(acquire_future);
        self.render_stage = RenderStage::Drawing;
        Ok(())
    }

    /// Draws `mesh` once per entry of `instances`, filled with `color`.
    pub fn render_instances(
        &mut self,
        mesh: MeshId,
        instances: &[InstanceData],
        color: [f32; 4],
    ) -> Result<(), RenderError> {
        if self.render_stage != RenderStage::Drawing || instances.is_empty() {
            return Ok(());
        }

        let vertex_buffer = self
            .meshes
            .get(mesh.0)
            .ok_or(RenderError::UnknownMesh(mesh))?
            .clone();
        let instance_buffer = self
            .instance_buffer_pool
            .from_iter(instances.iter().copied())?;

        let push_constants = shaders::PushConstants {
            color,
            aspect_stretch: self.aspect_stretch,
        };

        let Some(commands) = self.commands.as_mut() else {
            return Ok(());
        };
        commands
            .push_constants(self.pipeline.layout().clone(), 0, push_constants)
            .bind_vertex_buffers(0, (vertex_buffer.clone(), instance_buffer))
            .draw(vertex_buffer.len() as u32, instances.len() as u32, 0, 0)
            .map_err(RenderError::record)?;
        Ok(())
    }

    pub fn finish_frame(&mut self) -> Result<(), RenderError> {
        if !self.render_stage.has_pending_frame() {
            return Ok(());
        }
        self.render_stage = RenderStage::Stopped;

        let (Some(mut commands), Some(acquire_future)) =
            (self.commands.take(), self.acquire_future.take())
        else {
            return Ok(());
        };

        commands.end_render_pass().map_err(RenderError::record)?;
        let command_buffer = commands.build().map_err(RenderError::record)?;

        let previous_frame_end = self
            .previous_frame_end
            .take()
            .unwrap_or_else(|| sync::now(self.device.clone()).boxed());

        let future = previous_frame_end
            .join(acquire_future)
            .then_execute(self.queue.clone(), command_buffer)
            .map_err(RenderError::record)?
            .then_swapchain_present(
                self.queue.clone(),
                SwapchainPresentInfo::swapchain_image_index(
                    self.swapchain.clone(),
                    self.image_index,
                ),
            )
            .then_signal_fence_and_flush();

        self.previous_frame_end = match future {
            Ok(future) => Some(future.boxed()),
            Err(FlushError::OutOfDate) => {
                self.recreate_swapchain = true;
                Some(sync::now(self.device.clone()).boxed())
            }
            Err(e) => {
                log::error!("Failed to flush future: {}", e);
                Some(sync::now(self.device.clone()).boxed())
            }
        };
        Ok(())
    }

    /// Leaves `recreate_swapchain` set when the surface is mid-resize and
    /// reports an extent the swapchain cannot take yet.
    fn recreate_swapchain(&mut self) -> Result<(), RenderError> {
        let (new_swapchain, new_images) = match swapchain::create_swapchain_and_images(
            self.device.clone(),
            self.surface.clone(),
            Some(self.swapchain.clone()),
        ) {
            Ok(r) => r,
            Err(RenderError::Swapchain(SwapchainCreationError::ImageExtentNotSupported {
                ..
            })) => {
                log::debug!("Surface extent not supported yet, retrying next frame");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        self.framebuffers = swapchain::create_framebuffers(&new_images, self.render_pass.clone())?;
        self.viewport = full_viewport(new_swapchain.image_extent());
        self.swapchain = new_swapchain;
        self.recreate_swapchain = false;
        Ok(())
    }
}

fn full_viewport(extent: [u32; 2]) -> Viewport {
    Viewport {
        origin: [0.0, 0.0],
        dimensions: [extent[0] as f32, extent[1] as f32],
        depth_range: 0.0..1.0,
    }
}
