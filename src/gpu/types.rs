//! GPU buffer types for scene rendering
//!
//! Uploaded directly to vertex and uniform buffers: all `repr(C)`, all f32.

use bytemuck::{Pod, Zeroable};

use crate::camera::Camera3D;
use crate::scene::{EdgeDraw, NodeDraw};

/// Per-instance data of a node mesh.
///
/// Layout matches the `NodeInstance` struct in the node shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct NodeInstance {
    /// World position
    pub position: [f32; 3],
    /// Uniform scale applied to the unit mesh
    pub radius: f32,
    /// RGBA base color
    pub color: [f32; 4],
    /// Emissive tint
    pub emissive: [f32; 3],
    /// Strength of the emissive tint
    pub emissive_intensity: f32,
}

impl From<&NodeDraw> for NodeInstance {
    fn from(draw: &NodeDraw) -> Self {
        Self {
            position: draw.position,
            radius: draw.radius,
            color: draw.color,
            emissive: draw.emissive,
            emissive_intensity: draw.emissive_intensity,
        }
    }
}

/// Per-instance data of a relationship line.
///
/// Vertex 0 of the instance is `start`, vertex 1 is `end`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct EdgeInstance {
    pub start: [f32; 3],
    pub end: [f32; 3],
    /// RGBA, alpha already scaled by strength
    pub color: [f32; 4],
}

impl From<&EdgeDraw> for EdgeInstance {
    fn from(draw: &EdgeDraw) -> Self {
        Self {
            start: draw.source,
            end: draw.target,
            color: draw.color,
        }
    }
}

/// Camera uniforms shared by all render shaders
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniforms {
    /// World -> camera space
    pub view: [[f32; 4]; 4],
    /// Camera -> clip space
    pub projection: [[f32; 4]; 4],
    /// Eye position, used for specular highlights
    pub camera_pos: [f32; 3],
    pub _padding: f32,
}

impl From<&Camera3D> for CameraUniforms {
    fn from(camera: &Camera3D) -> Self {
        Self {
            view: camera.view_matrix().to_cols_array_2d(),
            projection: camera.projection_matrix().to_cols_array_2d(),
            camera_pos: camera.position().to_array(),
            _padding: 0.0,
        }
    }
}
