//! Per-frame draw list construction and pointer picking
//!
//! The scene layer turns the render set, the layout and the interaction
//! state into a backend-agnostic [`FrameDrawList`]. Backends only ever see
//! draw lists; they never look at graph data directly.

use glam::{Vec2, Vec3};

use crate::camera::{Camera3D, Ray};
use crate::config::Viewport;
use crate::interaction::InteractionState;
use crate::layout::Positions;
use crate::model::{GraphNode, GraphRelationship};
use crate::quality::QualitySettings;
use crate::virtualizer::RenderSet;
use crate::visual::{Highlight, HighlightScales, NodeShape, map_node, map_relationship};

/// One node primitive
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDraw {
    /// Index into the caller's node list
    pub index: usize,
    pub position: [f32; 3],
    pub shape: NodeShape,
    pub color: [f32; 4],
    /// Base size times the (possibly animated) highlight scale
    pub radius: f32,
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub highlight: Highlight,
}

/// One relationship line
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDraw {
    /// Index into the caller's relationship list
    pub index: usize,
    pub source: [f32; 3],
    pub target: [f32; 3],
    /// RGB from the relationship type, alpha from strength
    pub color: [f32; 4],
}

/// Why a label is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayRole {
    Selected,
    Hovered,
}

/// Screen-space label attached to a node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeOverlay {
    pub node_id: String,
    pub title: String,
    pub description: Option<String>,
    pub badge: &'static str,
    /// Pixel position of the node, `None` when it is behind the camera
    pub anchor: Option<Vec2>,
    pub role: OverlayRole,
}

/// Everything a backend needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameDrawList {
    /// Node primitives in render-set order
    pub nodes: Vec<NodeDraw>,
    pub edges: Vec<EdgeDraw>,
    pub overlays: Vec<NodeOverlay>,
    pub settings: QualitySettings,
    pub clear_color: [f32; 4],
}

impl FrameDrawList {
    /// Nearest node hit by `ray`
    pub fn pick(&self, ray: &Ray) -> Option<&NodeDraw> {
        self.nodes
            .iter()
            .filter_map(|draw| {
                ray.intersect_sphere(Vec3::from_array(draw.position), draw.radius)
                    .map(|distance| (distance, draw))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, draw)| draw)
    }
}

/// Inputs to [`build_frame`], borrowed from the engine
#[derive(Debug, Clone, Copy)]
pub struct SceneInput<'a> {
    pub nodes: &'a [GraphNode],
    pub relationships: &'a [GraphRelationship],
    pub positions: &'a Positions,
    pub render_set: &'a RenderSet,
    pub interaction: &'a InteractionState,
    /// Animated highlight scales; `None` draws every highlight at full scale
    pub highlight_scales: Option<&'a HighlightScales>,
    pub settings: QualitySettings,
    /// Opacity of a relationship with strength 1
    pub edge_base_alpha: f32,
    pub clear_color: [f32; 4],
}

/// Build the draw list for one frame.
///
/// Render-set indices outside the node or relationship lists, and nodes
/// without a layout position, are skipped. Both only happen when the caller
/// pairs a render set or positions with another graph.
pub fn build_frame(input: &SceneInput<'_>, camera: &Camera3D, viewport: &Viewport) -> FrameDrawList {
    let nodes: Vec<NodeDraw> = input
        .render_set
        .nodes
        .iter()
        .filter_map(|&index| {
            let node = input.nodes.get(index)?;
            let position = *input.positions.get(&node.id)?;
            let visual = map_node(node.semantic_type);
            let highlight = Highlight::of(&node.id, input.interaction);
            let scale = match input.highlight_scales {
                Some(scales) => scales.get(&node.id).copied().unwrap_or(1.0),
                None => highlight.scale(),
            };
            Some(NodeDraw {
                index,
                position,
                shape: visual.shape,
                color: visual.base_color,
                radius: visual.base_size * scale,
                emissive: visual.emissive,
                emissive_intensity: highlight.emissive_intensity(),
                highlight,
            })
        })
        .collect();

    let edges = input
        .render_set
        .relationships
        .iter()
        .filter_map(|&index| {
            let rel = input.relationships.get(index)?;
            let source = *input.positions.get(&rel.source_id)?;
            let target = *input.positions.get(&rel.target_id)?;
            let [r, g, b] = map_relationship(rel.relationship_type);
            Some(EdgeDraw {
                index,
                source,
                target,
                color: [r, g, b, rel.clamped_strength() * input.edge_base_alpha],
            })
        })
        .collect();

    let overlays = overlays(input, &nodes, camera, viewport);

    FrameDrawList {
        nodes,
        edges,
        overlays,
        settings: input.settings,
        clear_color: input.clear_color,
    }
}

fn overlays(
    input: &SceneInput<'_>,
    draws: &[NodeDraw],
    camera: &Camera3D,
    viewport: &Viewport,
) -> Vec<NodeOverlay> {
    let mut overlays = Vec::with_capacity(2);
    let wanted = [
        (input.interaction.selected(), OverlayRole::Selected),
        (input.interaction.hovered(), OverlayRole::Hovered),
    ];
    for (node_id, role) in wanted {
        let Some(node_id) = node_id else { continue };
        if overlays
            .iter()
            .any(|overlay: &NodeOverlay| overlay.node_id == node_id)
        {
            continue;
        }
        let Some(draw) = draws.iter().find(|draw| input.nodes[draw.index].id == node_id) else {
            continue;
        };
        let node = &input.nodes[draw.index];
        overlays.push(NodeOverlay {
            node_id: node.id.clone(),
            title: node.display_name().to_string(),
            description: node.display_description().map(str::to_string),
            badge: node.semantic_type.badge(),
            anchor: camera.project(draw.position, viewport.width as f32, viewport.height as f32),
            role,
        });
    }
    overlays
}
