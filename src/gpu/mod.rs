//! GPU scene rendering (wgpu)
//!
//! Turns the backend-independent [`FrameDrawList`](crate::scene::FrameDrawList)
//! into pixels:
//!
//! - **Nodes**: one unit mesh per [`NodeShape`](crate::visual::NodeShape),
//!   drawn instanced with per-node position, radius, color and emissive tint
//! - **Relationships**: instanced line segments with strength-scaled alpha
//! - **Capacity**: instance buffers grow to fit each frame
//! - **Quality**: mesh detail, lit/flat shading, MSAA and target size follow
//!   the active [`QualityTier`](crate::quality::QualityTier)
//!
//! # Example
//!
//! ```rust,ignore
//! use neurograph::gpu::{GpuRenderer, create_render_device};
//! use neurograph::{EngineConfig, GraphEngine, Mounted, WgpuProbe};
//!
//! let config = EngineConfig::default();
//! let mounted = GraphEngine::mount(&WgpuProbe, config, Default::default(), |config| {
//!     let context = pollster::block_on(create_render_device())?;
//!     Ok(GpuRenderer::for_config(&context, config))
//! })?;
//! ```

pub mod geometry;
pub mod renderer;
pub mod shaders;
pub mod types;

pub use geometry::{Mesh, MeshVertex, shape_mesh};
pub use renderer::{GpuContext, GpuRenderer, create_render_device};
pub use types::{CameraUniforms, EdgeInstance, NodeInstance};
