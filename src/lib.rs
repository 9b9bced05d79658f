//! neurograph - interactive 3D rendering of knowledge graphs.
//!
//! The engine lays typed nodes out on a sphere, submits a bounded subset of
//! them each frame, and trades rendering fidelity for frame rate as the
//! graph grows. Hosts mount a [`GraphEngine`] behind a capability probe,
//! hand it a [`GraphData`], call [`GraphEngine::tick`] once per refresh and
//! forward pointer events; selection and hover come back via
//! [`GraphCallbacks`].
//!
//! GPU rendering lives behind the `gpu` feature.

pub mod backend;
pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod interaction;
pub mod io;
pub mod layout;
pub mod model;
pub mod monitor;
pub mod probe;
pub mod quality;
pub mod scene;
pub mod virtualizer;
pub mod visual;

pub use backend::{RecordingBackend, RenderBackend};
pub use camera::Camera3D;
pub use config::{EngineConfig, Viewport};
pub use engine::{EngineStatus, FallbackNotice, FrameReport, GraphEngine, Mounted};
pub use error::{ConfigError, EngineError, EngineResult, IoError, IoResult, RenderError};
pub use interaction::{GraphCallbacks, InteractionState, NodeEvent};
pub use layout::{Positions, layout};
pub use model::{
    EvidenceLevel, GraphData, GraphNode, GraphRelationship, RelationshipType, SemanticType,
};
pub use monitor::{MemoryProbe, PerformanceMonitor, PerformanceSample};
pub use probe::{Capability, CapabilityProbe, StaticProbe, WgpuProbe, probe};
pub use quality::{AdaptiveQualityController, QualitySettings, QualityTier};
pub use scene::FrameDrawList;
pub use virtualizer::{RenderSet, RenderSetSelector};
