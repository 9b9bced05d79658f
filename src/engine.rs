//! The graph engine
//!
//! [`GraphEngine`] owns every per-view component: layout positions, the
//! render-set selector, interaction state, the performance monitor, the
//! quality controller, the camera and a [`RenderBackend`]. The host drives
//! it with one [`GraphEngine::tick`] per display refresh and forwards
//! pointer events; nothing runs in the background.
//!
//! Mounting is gated by a [`CapabilityProbe`]. When no rendering context
//! is available the host gets a [`FallbackNotice`] instead of an engine, and
//! no frame loop or monitor is ever created.

use std::collections::HashSet;
use std::fmt;
use std::time::Instant;

use serde::Serialize;

use crate::backend::RenderBackend;
use crate::camera::Camera3D;
use crate::config::EngineConfig;
use crate::error::{EngineResult, RenderError};
use crate::interaction::{GraphCallbacks, InteractionState, NodeEvent};
use crate::layout::{Positions, layout};
use crate::model::{GraphData, GraphNode, GraphRelationship};
use crate::monitor::{
    LOW_PERFORMANCE_FPS, MemoryProbe, PerformanceMonitor, PerformanceSample, ProcessMemory,
};
use crate::probe::{Capability, CapabilityProbe};
use crate::quality::{AdaptiveQualityController, QualityTier, QualityTransition};
use crate::scene::{FrameDrawList, SceneInput, build_frame};
use crate::virtualizer::{RenderSet, RenderSetSelector};
use crate::visual::{Highlight, HighlightScales, ease_scale};

/// Shown in place of the 3D view when it cannot run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackNotice {
    pub title: String,
    pub reason: String,
}

impl FallbackNotice {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            title: "3D view unavailable".to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FallbackNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}. Use the 2D view instead.", self.title, self.reason)
    }
}

/// Result of [`GraphEngine::mount`]
#[derive(Debug)]
pub enum Mounted<B> {
    Active(GraphEngine<B>),
    Fallback(FallbackNotice),
}

impl<B> Mounted<B> {
    /// The running engine, if mounting succeeded
    pub fn engine(&self) -> Option<&GraphEngine<B>> {
        match self {
            Mounted::Active(engine) => Some(engine),
            Mounted::Fallback(_) => None,
        }
    }

    /// Mutable access to the running engine
    pub fn engine_mut(&mut self) -> Option<&mut GraphEngine<B>> {
        match self {
            Mounted::Active(engine) => Some(engine),
            Mounted::Fallback(_) => None,
        }
    }

    /// The fallback notice, if mounting fell back
    pub fn fallback(&self) -> Option<&FallbackNotice> {
        match self {
            Mounted::Active(_) => None,
            Mounted::Fallback(notice) => Some(notice),
        }
    }
}

/// Snapshot of what the engine is doing, for host overlays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineStatus {
    /// Fps of the last completed sample (0 before the first)
    pub fps: f32,
    /// Memory estimate of the last completed sample in MB
    pub memory_mb: f32,
    pub quality_tier: QualityTier,
    pub rendered_node_count: usize,
    pub rendered_relationship_count: usize,
    /// Set while the last sample was below the low-performance fps
    pub low_performance: bool,
}

impl EngineStatus {
    fn initial(tier: QualityTier) -> Self {
        Self {
            fps: 0.0,
            memory_mb: 0.0,
            quality_tier: tier,
            rendered_node_count: 0,
            rendered_relationship_count: 0,
            low_performance: false,
        }
    }
}

/// What happened during one [`GraphEngine::tick`]
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Sample completed by this frame, if it closed a window
    pub sample: Option<PerformanceSample>,
    /// Tier change triggered by that sample
    pub transition: Option<QualityTransition>,
    pub rendered_node_count: usize,
    pub rendered_relationship_count: usize,
}

/// Interactive renderer for one knowledge graph view
pub struct GraphEngine<B> {
    config: EngineConfig,
    nodes: Vec<GraphNode>,
    relationships: Vec<GraphRelationship>,
    positions: Positions,
    selector: RenderSetSelector,
    interaction: InteractionState,
    callbacks: GraphCallbacks,
    controller: AdaptiveQualityController,
    monitor: PerformanceMonitor,
    camera: Camera3D,
    backend: B,
    highlight_scales: HighlightScales,
    render_set: Option<RenderSet>,
    frame: Option<FrameDrawList>,
    status: EngineStatus,
}

impl<B: RenderBackend> GraphEngine<B> {
    /// Probe for rendering support, then build the engine.
    ///
    /// `backend` is only called when the probe reports support. An invalid
    /// `config` is an error; an unsupported environment or a backend that
    /// fails to initialize yields [`Mounted::Fallback`].
    ///
    /// Memory is sampled from [`ProcessMemory`], which reads
    /// `/proc/self/status` on Linux. Hosts that must not touch the file
    /// system use [`mount_with_memory_probe`](Self::mount_with_memory_probe).
    pub fn mount<F>(
        probe: &impl CapabilityProbe,
        config: EngineConfig,
        callbacks: GraphCallbacks,
        backend: F,
    ) -> EngineResult<Mounted<B>>
    where
        F: FnOnce(&EngineConfig) -> Result<B, RenderError>,
    {
        Self::mount_with_memory_probe(probe, config, callbacks, ProcessMemory, backend)
    }

    /// [`mount`](Self::mount) with a host-supplied memory source
    pub fn mount_with_memory_probe<F>(
        probe: &impl CapabilityProbe,
        config: EngineConfig,
        callbacks: GraphCallbacks,
        memory: impl MemoryProbe + 'static,
        backend: F,
    ) -> EngineResult<Mounted<B>>
    where
        F: FnOnce(&EngineConfig) -> Result<B, RenderError>,
    {
        config.validate()?;

        let adapter = match probe.probe() {
            Capability::Supported(adapter) => adapter,
            Capability::Unsupported { reason } => {
                tracing::warn!(%reason, "3D rendering unavailable, showing fallback");
                return Ok(Mounted::Fallback(FallbackNotice::new(reason)));
            }
        };

        let mut backend = match backend(&config) {
            Ok(backend) => backend,
            Err(err) => {
                tracing::warn!(error = %err, "render backend failed to initialize, showing fallback");
                return Ok(Mounted::Fallback(FallbackNotice::new(err.to_string())));
            }
        };

        let controller =
            AdaptiveQualityController::with_thresholds(config.initial_quality_tier, config.thresholds);
        backend.apply_quality(&controller.settings())?;

        tracing::info!(
            %adapter,
            tier = %controller.tier(),
            max_render_nodes = config.max_render_nodes,
            "mounted graph engine"
        );

        Ok(Mounted::Active(Self {
            selector: RenderSetSelector::new(config.max_render_nodes),
            monitor: PerformanceMonitor::from_config(&config).with_memory_probe(memory),
            camera: Camera3D::new(config.viewport.aspect()),
            status: EngineStatus::initial(controller.tier()),
            controller,
            nodes: Vec::new(),
            relationships: Vec::new(),
            positions: Positions::new(),
            interaction: InteractionState::default(),
            callbacks,
            backend,
            highlight_scales: HighlightScales::new(),
            render_set: None,
            frame: None,
            config,
        }))
    }

    /// Replace the graph being shown.
    ///
    /// Recomputes the layout and forgets selection/hover of nodes that are
    /// gone. Dangling relationships of the new graph are reported afresh.
    pub fn set_graph(&mut self, graph: GraphData) {
        let GraphData {
            nodes,
            relationships,
        } = graph;

        if self.config.enable_physics {
            tracing::debug!("physics requested; using the static spherical layout");
        }
        self.positions = layout(&nodes);
        tracing::debug!(
            nodes = nodes.len(),
            relationships = relationships.len(),
            "laid out graph"
        );

        self.nodes = nodes;
        self.relationships = relationships;
        self.selector.reset();
        let positions = &self.positions;
        self.interaction.retain(|id| positions.contains_key(id));
        self.highlight_scales.clear();
        self.render_set = None;
        self.frame = None;
    }

    /// Advance one frame: sample performance, adapt quality, select and draw.
    ///
    /// When the backend rejects a new tier the controller keeps the old one.
    pub fn tick(&mut self, now: Instant) -> EngineResult<FrameReport> {
        let sample = self.monitor.record_frame(now);
        let transition = sample
            .as_ref()
            .and_then(|sample| self.controller.propose(sample.fps));
        if let Some(transition) = transition {
            self.backend.apply_quality(&transition.to.settings())?;
            self.controller.commit(transition);
        }
        self.animate_highlights();

        let render_set = self
            .selector
            .select(&self.nodes, &self.relationships, &self.interaction);
        let input = SceneInput {
            nodes: &self.nodes,
            relationships: &self.relationships,
            positions: &self.positions,
            render_set: &render_set,
            interaction: &self.interaction,
            highlight_scales: Some(&self.highlight_scales),
            settings: self.controller.settings(),
            edge_base_alpha: self.config.edge_base_alpha,
            clear_color: self.config.clear_color,
        };
        let frame = build_frame(&input, &self.camera, &self.config.viewport);
        self.backend.draw(&self.camera, &frame)?;

        if let Some(sample) = &sample {
            self.status.fps = sample.fps;
            self.status.memory_mb = sample.memory_mb;
            self.status.low_performance = sample.fps < LOW_PERFORMANCE_FPS;
        }
        self.status.quality_tier = self.controller.tier();
        self.status.rendered_node_count = frame.nodes.len();
        self.status.rendered_relationship_count = frame.edges.len();

        let report = FrameReport {
            sample,
            transition,
            rendered_node_count: frame.nodes.len(),
            rendered_relationship_count: frame.edges.len(),
        };
        self.render_set = Some(render_set);
        self.frame = Some(frame);
        Ok(report)
    }

    /// Pointer moved to `(x, y)` in logical viewport pixels
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        let hit = self.pick(x, y);
        self.dispatch(NodeEvent::Hover(hit))
    }

    /// Pointer clicked at `(x, y)`; clicking empty space keeps the selection
    pub fn pointer_click(&mut self, x: f32, y: f32) -> bool {
        match self.pick(x, y) {
            Some(node_id) => self.dispatch(NodeEvent::Click(node_id)),
            None => false,
        }
    }

    /// Pointer left the viewport
    pub fn pointer_leave(&mut self) -> bool {
        self.dispatch(NodeEvent::Hover(None))
    }

    /// Apply a resolved pointer event and notify the host callbacks.
    ///
    /// Events naming a node that is not in the current graph are ignored.
    /// Returns whether the interaction state changed.
    pub fn dispatch(&mut self, event: NodeEvent) -> bool {
        let target = match &event {
            NodeEvent::Click(node_id) => Some(node_id),
            NodeEvent::Hover(node_id) => node_id.as_ref(),
        };
        if let Some(node_id) = target.filter(|id| !self.positions.contains_key(*id)) {
            tracing::debug!(node = %node_id, "ignoring event for unknown node");
            return false;
        }
        if !self.interaction.apply(&event) {
            return false;
        }
        self.callbacks.notify(&event);
        true
    }

    /// Id of the node under `(x, y)` in the last drawn frame
    pub fn pick(&self, x: f32, y: f32) -> Option<String> {
        let frame = self.frame.as_ref()?;
        let viewport = &self.config.viewport;
        let ray = self
            .camera
            .ray(x, y, viewport.width as f32, viewport.height as f32);
        frame
            .pick(&ray)
            .map(|draw| self.nodes[draw.index].id.clone())
    }

    /// Center the camera on the selected node
    pub fn focus_selected(&mut self) -> bool {
        let Some(position) = self
            .interaction
            .selected()
            .and_then(|id| self.positions.get(id))
        else {
            return false;
        };
        self.camera.focus(*position);
        true
    }

    /// The host surface changed size
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) -> EngineResult<()> {
        let mut viewport = self.config.viewport;
        viewport.width = width;
        viewport.height = height;
        viewport.device_pixel_ratio = device_pixel_ratio;

        let mut config = self.config.clone();
        config.viewport = viewport;
        config.validate()?;

        self.backend.resize(&viewport)?;
        self.camera.set_aspect(viewport.aspect());
        self.config = config;
        Ok(())
    }

    /// Move every highlight scale one step toward its target
    fn animate_highlights(&mut self) {
        let mut ids: HashSet<String> = self.highlight_scales.keys().cloned().collect();
        ids.extend(
            [self.interaction.selected(), self.interaction.hovered()]
                .into_iter()
                .flatten()
                .map(str::to_string),
        );
        for id in ids {
            let target = Highlight::of(&id, &self.interaction).scale();
            let current = self.highlight_scales.get(&id).copied().unwrap_or(1.0);
            let next = ease_scale(current, target);
            if next == 1.0 {
                self.highlight_scales.remove(&id);
            } else {
                self.highlight_scales.insert(id, next);
            }
        }
    }

    /// Register a callback for every completed performance sample
    pub fn on_performance_sample(&mut self, subscriber: impl FnMut(&PerformanceSample) + 'static) {
        self.monitor.subscribe(subscriber);
    }

    /// Release the engine and its render resources
    pub fn teardown(self) {
        tracing::info!(nodes = self.nodes.len(), "tearing down graph engine");
    }
}

impl<B> GraphEngine<B> {
    pub fn status(&self) -> &EngineStatus {
        &self.status
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn relationships(&self) -> &[GraphRelationship] {
        &self.relationships
    }

    /// Layout positions of the current graph
    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn quality_tier(&self) -> QualityTier {
        self.controller.tier()
    }

    /// Render set of the last frame
    pub fn render_set(&self) -> Option<&RenderSet> {
        self.render_set.as_ref()
    }

    /// Draw list of the last frame
    pub fn last_frame(&self) -> Option<&FrameDrawList> {
        self.frame.as_ref()
    }

    /// Latest completed performance sample
    pub fn latest_sample(&self) -> Option<&PerformanceSample> {
        self.monitor.latest()
    }

    /// Distinct dangling relationships reported for the current graph
    pub fn integrity_warnings(&self) -> usize {
        self.selector.integrity_warnings()
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera3D {
        &mut self.camera
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B> fmt::Debug for GraphEngine<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphEngine")
            .field("nodes", &self.nodes.len())
            .field("relationships", &self.relationships.len())
            .field("interaction", &self.interaction)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
