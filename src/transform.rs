//! CPU side of the instanced vertex stage.
//!
//! `instanced.vert` computes
//! `R(angle) * position * scale * aspect_stretch + pos_offset`; the functions
//! here evaluate the same expression so gameplay code and tests agree with
//! what ends up on screen.

use glam::{Mat2, Vec2, Vec4};

use crate::vertex::InstanceData;

/// Aspect correction applied when nothing else is configured.
pub const DEFAULT_ASPECT_STRETCH: [f32; 2] = [1.0, 1920.0 / 1080.0];

/// Rotates `v` by `degrees` with the standard 2D rotation matrix.
pub fn rotate(v: Vec2, degrees: f32) -> Vec2 {
    Mat2::from_angle(degrees.to_radians()) * v
}

pub fn clip_position(position: [f32; 2], instance: &InstanceData, aspect_stretch: [f32; 2]) -> Vec4 {
    let local = rotate(Vec2::from(position), instance.angle) * instance.scale;
    let p = local * Vec2::from(aspect_stretch) + Vec2::from(instance.pos_offset);
    Vec4::new(p.x, p.y, 0.0, 1.0)
}
