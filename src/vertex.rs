use bytemuck::{Pod, Zeroable};

/// Mesh-local 2D position, bound per vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
pub struct Vertex {
    pub position: [f32; 2],
}
vulkano::impl_vertex!(Vertex, position);

/// Placement of one mesh copy, bound per instance.
///
/// `angle` is in degrees, `pos_offset` is already in clip space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
pub struct InstanceData {
    pub pos_offset: [f32; 2],
    pub angle: f32,
    pub scale: f32,
}
vulkano::impl_vertex!(InstanceData, pos_offset, angle, scale);
