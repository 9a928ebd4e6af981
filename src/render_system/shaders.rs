use bytemuck::{Pod, Zeroable};

pub(super) mod instanced_vert {
    vulkano_shaders::shader! {
        ty: "vertex",
        path: "src/render_system/shaders/instanced.vert",
    }
}

pub(super) mod flat_frag {
    vulkano_shaders::shader! {
        ty: "fragment",
        path: "src/render_system/shaders/flat.frag",
    }
}

/// Layout of the `PushConstants` block shared by both stages.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(super) struct PushConstants {
    pub color: [f32; 4],
    pub aspect_stretch: [f32; 2],
}
