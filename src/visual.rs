//! Visual mapping table
//!
//! Static lookup from semantic node type to shape, color, emissive tint and
//! base size, and from relationship type to line color. Interaction state
//! only changes appearance through [`Highlight`].

use std::collections::HashMap;

use crate::interaction::InteractionState;
use crate::model::{RelationshipType, SemanticType};

/// Color constants (RGBA, normalized 0.0-1.0)
pub mod colors {
    /// Supplement nodes: Emerald (#10B981)
    pub const SUPPLEMENT: [f32; 4] = [0.063, 0.725, 0.506, 1.0];
    /// Supplement emissive (#065F46)
    pub const SUPPLEMENT_EMISSIVE: [f32; 3] = [0.024, 0.373, 0.275];

    /// Neurotransmitter nodes: Blue (#3B82F6)
    pub const NEUROTRANSMITTER: [f32; 4] = [0.231, 0.510, 0.965, 1.0];
    /// Neurotransmitter emissive (#1E40AF)
    pub const NEUROTRANSMITTER_EMISSIVE: [f32; 3] = [0.118, 0.251, 0.686];

    /// Brain region nodes: Violet (#8B5CF6)
    pub const BRAIN_REGION: [f32; 4] = [0.545, 0.361, 0.965, 1.0];
    /// Brain region emissive (#5B21B6)
    pub const BRAIN_REGION_EMISSIVE: [f32; 3] = [0.357, 0.129, 0.714];

    /// Cognitive function nodes: Amber (#F59E0B)
    pub const COGNITIVE_FUNCTION: [f32; 4] = [0.961, 0.620, 0.043, 1.0];
    /// Cognitive function emissive (#D97706)
    pub const COGNITIVE_FUNCTION_EMISSIVE: [f32; 3] = [0.851, 0.467, 0.024];

    /// Pathway nodes: Indigo (#6366F1)
    pub const PATHWAY: [f32; 4] = [0.388, 0.400, 0.945, 1.0];
    /// Pathway emissive (#4338CA)
    pub const PATHWAY_EMISSIVE: [f32; 3] = [0.263, 0.220, 0.792];

    /// Mechanism nodes: Pink (#EC4899)
    pub const MECHANISM: [f32; 4] = [0.925, 0.282, 0.600, 1.0];
    /// Mechanism emissive (#BE185D)
    pub const MECHANISM_EMISSIVE: [f32; 3] = [0.745, 0.094, 0.365];

    /// Fallback: Gray (#6B7280)
    pub const NEUTRAL: [f32; 4] = [0.420, 0.447, 0.502, 1.0];
    /// Fallback emissive (#374151)
    pub const NEUTRAL_EMISSIVE: [f32; 3] = [0.216, 0.255, 0.318];

    /// Enhancing/synergistic relationships: Emerald (#10B981)
    pub const POSITIVE: [f32; 3] = [0.063, 0.725, 0.506];
    /// Inhibiting/antagonistic relationships: Red (#EF4444)
    pub const NEGATIVE: [f32; 3] = [0.937, 0.267, 0.267];
    /// Modulating relationships: Amber (#F59E0B)
    pub const MODULATING: [f32; 3] = [0.961, 0.620, 0.043];
    /// Requirement relationships: Blue (#3B82F6)
    pub const REQUIRES: [f32; 3] = [0.231, 0.510, 0.965];
    /// Production relationships: Pink (#EC4899)
    pub const PRODUCES: [f32; 3] = [0.925, 0.282, 0.600];
    /// Metabolic relationships: Cyan (#06B6D4)
    pub const METABOLIZES: [f32; 3] = [0.024, 0.714, 0.831];
    /// Unknown relationships: Gray (#6B7280)
    pub const NEUTRAL_EDGE: [f32; 3] = [0.420, 0.447, 0.502];
}

/// Scale applied to a hovered node
pub const HOVER_SCALE: f32 = 1.2;

/// Scale applied to the selected node
pub const SELECTED_SCALE: f32 = 1.5;

/// Fraction of the remaining scale difference covered per frame
pub const HIGHLIGHT_EASING: f32 = 0.1;

/// Animated highlight scale per node id; absent ids are at 1.0
pub type HighlightScales = HashMap<String, f32>;

/// Primitive used to draw a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeShape {
    Sphere,
    Octahedron,
    Dodecahedron,
    Tetrahedron,
    Cylinder,
    Cone,
}

impl NodeShape {
    /// All shapes, in mesh-table order
    pub const ALL: [NodeShape; 6] = [
        NodeShape::Sphere,
        NodeShape::Octahedron,
        NodeShape::Dodecahedron,
        NodeShape::Tetrahedron,
        NodeShape::Cylinder,
        NodeShape::Cone,
    ];

    /// Position of this shape in [`NodeShape::ALL`]
    pub fn index(self) -> usize {
        match self {
            NodeShape::Sphere => 0,
            NodeShape::Octahedron => 1,
            NodeShape::Dodecahedron => 2,
            NodeShape::Tetrahedron => 3,
            NodeShape::Cylinder => 4,
            NodeShape::Cone => 5,
        }
    }
}

/// Base appearance of a node type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeVisual {
    pub shape: NodeShape,
    pub base_color: [f32; 4],
    pub base_size: f32,
    pub emissive: [f32; 3],
}

/// Appearance of a semantic node type. Unknown types get a gray sphere.
pub fn map_node(semantic_type: SemanticType) -> NodeVisual {
    use NodeShape::*;
    let (shape, base_color, base_size, emissive) = match semantic_type {
        SemanticType::Supplement => (Sphere, colors::SUPPLEMENT, 1.2, colors::SUPPLEMENT_EMISSIVE),
        SemanticType::Neurotransmitter => (
            Octahedron,
            colors::NEUROTRANSMITTER,
            1.0,
            colors::NEUROTRANSMITTER_EMISSIVE,
        ),
        SemanticType::BrainRegion => (
            Dodecahedron,
            colors::BRAIN_REGION,
            1.4,
            colors::BRAIN_REGION_EMISSIVE,
        ),
        SemanticType::CognitiveFunction => (
            Tetrahedron,
            colors::COGNITIVE_FUNCTION,
            1.1,
            colors::COGNITIVE_FUNCTION_EMISSIVE,
        ),
        SemanticType::Pathway => (Cylinder, colors::PATHWAY, 0.9, colors::PATHWAY_EMISSIVE),
        SemanticType::Mechanism => (Cone, colors::MECHANISM, 0.8, colors::MECHANISM_EMISSIVE),
        SemanticType::Unknown => (Sphere, colors::NEUTRAL, 1.0, colors::NEUTRAL_EMISSIVE),
    };
    NodeVisual {
        shape,
        base_color,
        base_size,
        emissive,
    }
}

/// Line color of a relationship type
pub fn map_relationship(relationship_type: RelationshipType) -> [f32; 3] {
    match relationship_type {
        RelationshipType::Enhances | RelationshipType::Synergizes => colors::POSITIVE,
        RelationshipType::Inhibits | RelationshipType::Antagonizes => colors::NEGATIVE,
        RelationshipType::Modulates => colors::MODULATING,
        RelationshipType::Requires => colors::REQUIRES,
        RelationshipType::Produces => colors::PRODUCES,
        RelationshipType::Metabolizes => colors::METABOLIZES,
        RelationshipType::Unknown => colors::NEUTRAL_EDGE,
    }
}

/// Interaction emphasis of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    Hovered,
    Selected,
}

impl Highlight {
    /// Emphasis of `node_id` under `interaction`; selection wins over hover
    pub fn of(node_id: &str, interaction: &InteractionState) -> Self {
        if interaction.is_selected(node_id) {
            Highlight::Selected
        } else if interaction.is_hovered(node_id) {
            Highlight::Hovered
        } else {
            Highlight::None
        }
    }

    /// Size multiplier
    pub fn scale(self) -> f32 {
        match self {
            Highlight::None => 1.0,
            Highlight::Hovered => HOVER_SCALE,
            Highlight::Selected => SELECTED_SCALE,
        }
    }

    /// Strength of the emissive tint
    pub fn emissive_intensity(self) -> f32 {
        match self {
            Highlight::None => 0.1,
            Highlight::Hovered => 0.2,
            Highlight::Selected => 0.3,
        }
    }
}

/// One animation step of a highlight scale toward `target`
pub fn ease_scale(current: f32, target: f32) -> f32 {
    let next = current + (target - current) * HIGHLIGHT_EASING;
    if (target - next).abs() < 1e-3 {
        target
    } else {
        next
    }
}
