//! Knowledge graph data model
//!
//! Nodes and relationships as handed to the engine by the content layer.
//! The engine treats every string field as opaque and never mutates these
//! values; it only reads ids, types, importance and strength.

use serde::{Deserialize, Serialize};

/// Semantic category of a node.
///
/// Tags use the content database spelling (`"BRAIN_REGION"`). Tags the
/// engine does not know deserialize to [`SemanticType::Unknown`] and get a
/// neutral visual mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemanticType {
    Supplement,
    Neurotransmitter,
    BrainRegion,
    CognitiveFunction,
    Pathway,
    Mechanism,
    #[serde(other)]
    Unknown,
}

impl SemanticType {
    /// All known semantic types, in display order
    pub const ALL: [SemanticType; 6] = [
        SemanticType::Supplement,
        SemanticType::Neurotransmitter,
        SemanticType::BrainRegion,
        SemanticType::CognitiveFunction,
        SemanticType::Pathway,
        SemanticType::Mechanism,
    ];

    /// Short label shown on the overlay type badge
    pub fn badge(&self) -> &'static str {
        match self {
            SemanticType::Supplement => "Supplement",
            SemanticType::Neurotransmitter => "Neurotransmitter",
            SemanticType::BrainRegion => "Brain region",
            SemanticType::CognitiveFunction => "Cognitive function",
            SemanticType::Pathway => "Pathway",
            SemanticType::Mechanism => "Mechanism",
            SemanticType::Unknown => "Other",
        }
    }
}

/// Kind of association between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    Enhances,
    Inhibits,
    Modulates,
    Synergizes,
    Antagonizes,
    Requires,
    Produces,
    Metabolizes,
    #[serde(other)]
    Unknown,
}

/// Strength of the scientific evidence behind a node or relationship
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceLevel {
    Strong,
    Moderate,
    Weak,
    #[default]
    Insufficient,
    Conflicting,
}

/// A typed entity in the knowledge graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Unique identifier
    pub id: String,

    /// Semantic category (drives shape and color)
    #[serde(rename = "type", alias = "semanticType")]
    pub semantic_type: SemanticType,

    /// Display name
    pub name: String,

    /// Localized display name (preferred over `name` when non-empty)
    #[serde(default, alias = "polishName")]
    pub localized_name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional localized description
    #[serde(default, alias = "polishDescription", skip_serializing_if = "Option::is_none")]
    pub localized_description: Option<String>,

    /// Relative importance in 0..1 (drives placement radius)
    #[serde(default)]
    pub importance: f32,

    /// Evidence backing this entity
    #[serde(default)]
    pub evidence_level: EvidenceLevel,
}

impl GraphNode {
    /// Create a node with the given id and type and default metadata
    pub fn new(id: impl Into<String>, semantic_type: SemanticType) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            semantic_type,
            localized_name: String::new(),
            description: None,
            localized_description: None,
            importance: 0.0,
            evidence_level: EvidenceLevel::default(),
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the localized display name
    pub fn with_localized_name(mut self, name: impl Into<String>) -> Self {
        self.localized_name = name.into();
        self
    }

    /// Set the localized description
    pub fn with_localized_description(mut self, description: impl Into<String>) -> Self {
        self.localized_description = Some(description.into());
        self
    }

    /// Set the importance
    pub fn with_importance(mut self, importance: f32) -> Self {
        self.importance = importance;
        self
    }

    /// Set the evidence level
    pub fn with_evidence(mut self, evidence_level: EvidenceLevel) -> Self {
        self.evidence_level = evidence_level;
        self
    }

    /// Importance clamped into 0..1; non-finite values count as 0
    pub fn clamped_importance(&self) -> f32 {
        if self.importance.is_finite() {
            self.importance.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Name shown to the user: the localized name when present
    pub fn display_name(&self) -> &str {
        if self.localized_name.is_empty() {
            &self.name
        } else {
            &self.localized_name
        }
    }

    /// Description shown to the user: the localized one when present
    pub fn display_description(&self) -> Option<&str> {
        self.localized_description
            .as_deref()
            .or(self.description.as_deref())
    }
}

/// A directed, typed association between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRelationship {
    /// Unique identifier
    pub id: String,

    /// Source node id (may reference a node that does not exist)
    pub source_id: String,

    /// Target node id (may reference a node that does not exist)
    pub target_id: String,

    /// Kind of association (drives line color)
    #[serde(rename = "type", alias = "relationshipType")]
    pub relationship_type: RelationshipType,

    /// Strength in 0..1 (drives line opacity)
    #[serde(default = "default_strength")]
    pub strength: f32,

    /// Confidence in 0..1
    #[serde(default)]
    pub confidence: f32,

    /// Evidence backing this relationship
    #[serde(default)]
    pub evidence_level: EvidenceLevel,
}

fn default_strength() -> f32 {
    1.0
}

impl GraphRelationship {
    /// Create a relationship between two node ids
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            relationship_type,
            strength: default_strength(),
            confidence: 0.0,
            evidence_level: EvidenceLevel::default(),
        }
    }

    /// Set the strength
    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    /// Set the confidence
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Strength clamped into 0..1; non-finite values count as 0
    pub fn clamped_strength(&self) -> f32 {
        if self.strength.is_finite() {
            self.strength.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// A complete graph as loaded from a file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    /// All nodes, in caller order
    #[serde(default)]
    pub nodes: Vec<GraphNode>,

    /// All relationships, in caller order
    #[serde(default, alias = "edges")]
    pub relationships: Vec<GraphRelationship>,
}

impl GraphData {
    /// Create graph data from node and relationship lists
    pub fn new(nodes: Vec<GraphNode>, relationships: Vec<GraphRelationship>) -> Self {
        Self {
            nodes,
            relationships,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_deserializes_original_tags() {
        let json = r#"{
            "id": "n1",
            "type": "BRAIN_REGION",
            "name": "Hippocampus",
            "polishName": "Hipokamp",
            "importance": 0.7,
            "evidenceLevel": "STRONG"
        }"#;
        let node: GraphNode = serde_json::from_str(json).unwrap();

        assert_eq!(node.semantic_type, SemanticType::BrainRegion);
        assert_eq!(node.localized_name, "Hipokamp");
        assert_eq!(node.evidence_level, EvidenceLevel::Strong);
        assert_eq!(node.display_name(), "Hipokamp");
    }

    #[test]
    fn test_unknown_tags_fall_back() {
        let node: GraphNode =
            serde_json::from_str(r#"{"id": "x", "type": "HERB", "name": "Ginkgo"}"#).unwrap();
        assert_eq!(node.semantic_type, SemanticType::Unknown);

        let rel: GraphRelationship = serde_json::from_str(
            r#"{"id": "r", "sourceId": "a", "targetId": "b", "type": "CATALYZES"}"#,
        )
        .unwrap();
        assert_eq!(rel.relationship_type, RelationshipType::Unknown);
        assert_eq!(rel.strength, 1.0);
        assert_eq!(rel.evidence_level, EvidenceLevel::Insufficient);
        assert_eq!(node.evidence_level, EvidenceLevel::Insufficient);
    }

    #[test]
    fn test_display_name_falls_back_to_name() {
        let node = GraphNode::new("n1", SemanticType::Supplement).with_name("Caffeine");
        assert_eq!(node.display_name(), "Caffeine");
        assert_eq!(node.display_description(), None);
    }

    #[test]
    fn test_display_description_prefers_localized() {
        let mut node =
            GraphNode::new("n1", SemanticType::Supplement).with_localized_description("Opis");
        node.description = Some("Description".to_string());
        assert_eq!(node.display_description(), Some("Opis"));
    }

    #[test]
    fn test_clamped_importance() {
        let node = GraphNode::new("n", SemanticType::Pathway);
        assert_eq!(node.clone().with_importance(1.7).clamped_importance(), 1.0);
        assert_eq!(node.clone().with_importance(-0.2).clamped_importance(), 0.0);
        assert_eq!(node.with_importance(f32::NAN).clamped_importance(), 0.0);
    }

    #[test]
    fn test_graph_data_accepts_edges_alias() {
        let graph: GraphData = serde_json::from_str(
            r#"{"nodes": [], "edges": [{"id": "r", "sourceId": "a", "targetId": "b", "type": "ENHANCES"}]}"#,
        )
        .unwrap();
        assert_eq!(graph.relationships.len(), 1);
    }
}
