//! Render-set selection (virtualization)
//!
//! Bounds how many nodes reach the renderer each frame. The selected and
//! hovered nodes are always kept; the remaining budget is filled in input
//! order. Relationships follow their endpoints: one is drawn only when both
//! endpoints made it into the node subset.

use std::collections::HashSet;

use crate::interaction::InteractionState;
use crate::model::{GraphNode, GraphRelationship};

/// The subset of the graph submitted to the renderer in one frame.
///
/// Entries are indices into the caller's node and relationship lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSet {
    /// Node indices, in input order
    pub nodes: Vec<usize>,
    /// Relationship indices whose endpoints are both in `nodes`
    pub relationships: Vec<usize>,
    /// Relationship indices with an endpoint missing from the full node list
    pub dangling: Vec<usize>,
}

impl RenderSet {
    /// Number of nodes in the set
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of relationships in the set
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Ids of the selected nodes, in render order
    pub fn node_ids<'a>(&self, nodes: &'a [GraphNode]) -> Vec<&'a str> {
        self.nodes.iter().map(|&i| nodes[i].id.as_str()).collect()
    }

    /// Ids of the selected relationships, in render order
    pub fn relationship_ids<'a>(&self, relationships: &'a [GraphRelationship]) -> Vec<&'a str> {
        self.relationships
            .iter()
            .map(|&i| relationships[i].id.as_str())
            .collect()
    }

    /// Whether the node with `node_id` is in the set
    pub fn contains_node(&self, nodes: &[GraphNode], node_id: &str) -> bool {
        self.nodes.iter().any(|&i| nodes[i].id == node_id)
    }
}

/// Compute the render set for one frame.
///
/// Guarantees:
/// - `selected` and `hovered` are included whenever they name an existing
///   node, wherever it sits in the input;
/// - up to `max_render_nodes` nodes in total are taken in input order, the
///   pinned nodes counting against the budget (so the total only exceeds
///   the budget when the pinned nodes alone do);
/// - a relationship is included only if both endpoints are included;
/// - relationships referencing an id absent from `nodes` are reported in
///   [`RenderSet::dangling`] and never included.
pub fn select(
    nodes: &[GraphNode],
    relationships: &[GraphRelationship],
    max_render_nodes: usize,
    selected: Option<&str>,
    hovered: Option<&str>,
) -> RenderSet {
    let all_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    let mut pinned: Vec<&str> = Vec::with_capacity(2);
    for id in [selected, hovered].into_iter().flatten() {
        if all_ids.contains(id) && !pinned.contains(&id) {
            pinned.push(id);
        }
    }

    let mut budget = max_render_nodes.saturating_sub(pinned.len());
    let mut chosen: HashSet<&str> = HashSet::with_capacity(max_render_nodes.min(nodes.len()) + 2);
    let mut set = RenderSet::default();

    for (index, node) in nodes.iter().enumerate() {
        let id = node.id.as_str();
        if chosen.contains(id) {
            continue;
        }
        if pinned.contains(&id) {
            chosen.insert(id);
            set.nodes.push(index);
        } else if budget > 0 {
            budget -= 1;
            chosen.insert(id);
            set.nodes.push(index);
        }
    }

    for (index, rel) in relationships.iter().enumerate() {
        let source = rel.source_id.as_str();
        let target = rel.target_id.as_str();
        if !all_ids.contains(source) || !all_ids.contains(target) {
            set.dangling.push(index);
        } else if chosen.contains(source) && chosen.contains(target) {
            set.relationships.push(index);
        }
    }

    set
}

/// Stateful wrapper around [`select`] that reports each dangling
/// relationship once per loaded graph.
#[derive(Debug, Clone, Default)]
pub struct RenderSetSelector {
    max_render_nodes: usize,
    reported: HashSet<String>,
}

impl RenderSetSelector {
    /// Create a selector with the given node budget
    pub fn new(max_render_nodes: usize) -> Self {
        Self {
            max_render_nodes,
            reported: HashSet::new(),
        }
    }

    /// Node budget per frame
    pub fn max_render_nodes(&self) -> usize {
        self.max_render_nodes
    }

    /// Number of distinct dangling relationships reported so far
    pub fn integrity_warnings(&self) -> usize {
        self.reported.len()
    }

    /// Forget reported relationships (call when the graph is replaced)
    pub fn reset(&mut self) {
        self.reported.clear();
    }

    /// Compute the render set for the current interaction state
    pub fn select(
        &mut self,
        nodes: &[GraphNode],
        relationships: &[GraphRelationship],
        interaction: &InteractionState,
    ) -> RenderSet {
        let set = select(
            nodes,
            relationships,
            self.max_render_nodes,
            interaction.selected(),
            interaction.hovered(),
        );

        for &index in &set.dangling {
            let rel = &relationships[index];
            if self.reported.insert(rel.id.clone()) {
                tracing::warn!(
                    relationship = %rel.id,
                    source = %rel.source_id,
                    target = %rel.target_id,
                    "relationship references a missing node, dropped from rendering"
                );
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::NodeEvent;
    use crate::model::{RelationshipType, SemanticType};

    fn nodes(count: usize) -> Vec<GraphNode> {
        (0..count)
            .map(|i| GraphNode::new(format!("n{i}"), SemanticType::Supplement))
            .collect()
    }

    fn rel(id: &str, source: &str, target: &str) -> GraphRelationship {
        GraphRelationship::new(id, source, target, RelationshipType::Enhances)
    }

    #[test]
    fn test_small_graph_is_rendered_whole() {
        let nodes = vec![
            GraphNode::new("n1", SemanticType::Supplement),
            GraphNode::new("n2", SemanticType::Neurotransmitter),
            GraphNode::new("n3", SemanticType::BrainRegion),
        ];
        let rels = vec![
            rel("r1", "n1", "n2"),
            GraphRelationship::new("r2", "n2", "n3", RelationshipType::Modulates),
        ];

        let set = select(&nodes, &rels, 500, None, None);
        insta::assert_debug_snapshot!(set.node_ids(&nodes), @r#"
        [
            "n1",
            "n2",
            "n3",
        ]
        "#);
        assert_eq!(set.relationship_ids(&rels), vec!["r1", "r2"]);
        assert!(set.dangling.is_empty());
    }

    #[test]
    fn test_no_truncation_within_budget() {
        for count in [0, 1, 10, 499, 500] {
            let input = nodes(count);
            assert_eq!(select(&input, &[], 500, None, None).node_count(), count);
            assert_eq!(
                select(&input, &[], 500, Some("n0"), Some("n1")).node_count(),
                count
            );
        }
    }

    #[test]
    fn test_truncates_in_input_order() {
        let input = nodes(2000);
        let set = select(&input, &[], 500, None, None);
        assert_eq!(set.node_count(), 500);
        assert_eq!(set.nodes, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn test_selected_node_outside_window_is_kept() {
        let input = nodes(2000);
        let set = select(&input, &[], 500, Some("n1800"), None);

        assert_eq!(set.node_count(), 500);
        assert!(set.contains_node(&input, "n1800"));
        let mut expected: Vec<usize> = (0..499).collect();
        expected.push(1800);
        assert_eq!(set.nodes, expected);
    }

    #[test]
    fn test_selected_and_hovered_outside_window_are_kept() {
        let input = nodes(2000);
        let set = select(&input, &[], 500, Some("n1999"), Some("n700"));

        assert_eq!(set.node_count(), 500);
        assert!(set.contains_node(&input, "n1999"));
        assert!(set.contains_node(&input, "n700"));
        assert!(set.contains_node(&input, "n497"));
        assert!(!set.contains_node(&input, "n498"));
    }

    #[test]
    fn test_pinned_inside_window_does_not_shrink_it() {
        let input = nodes(2000);
        let set = select(&input, &[], 500, Some("n3"), Some("n3"));
        assert_eq!(set.nodes, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_budget_keeps_only_pinned() {
        let input = nodes(10);
        assert_eq!(select(&input, &[], 0, None, None).node_count(), 0);
        assert_eq!(select(&input, &[], 0, Some("n4"), None).nodes, vec![4]);
    }

    #[test]
    fn test_unknown_selection_is_ignored() {
        let input = nodes(10);
        let set = select(&input, &[], 5, Some("missing"), None);
        assert_eq!(set.nodes, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_duplicate_ids_render_once() {
        let mut input = nodes(3);
        input.push(GraphNode::new("n1", SemanticType::Pathway));
        let set = select(&input, &[], 10, None, None);
        assert_eq!(set.nodes, vec![0, 1, 2]);
    }

    #[test]
    fn test_relationships_need_both_endpoints_rendered() {
        let input = nodes(10);
        let rels = vec![rel("in", "n0", "n1"), rel("cut", "n0", "n9")];
        let set = select(&input, &rels, 5, None, None);
        assert_eq!(set.relationship_ids(&rels), vec!["in"]);
        assert!(set.dangling.is_empty());
    }

    #[test]
    fn test_dangling_relationship_is_excluded() {
        let input = nodes(10);
        let rels = vec![rel("ok", "n5", "n6"), rel("bad", "n5", "n99")];
        for selected in [None, Some("n5")] {
            let set = select(&input, &rels, 500, selected, None);
            assert_eq!(set.relationship_ids(&rels), vec!["ok"]);
            assert_eq!(set.dangling, vec![1]);
        }
    }

    #[test]
    fn test_selector_warns_once_per_dangling_relationship() {
        let input = nodes(10);
        let rels = vec![rel("bad", "n5", "n99"), rel("worse", "ghost", "n1")];
        let mut selector = RenderSetSelector::new(500);
        let mut interaction = InteractionState::default();

        for frame in 0..5 {
            if frame == 2 {
                interaction.apply(&NodeEvent::Click("n5".into()));
            }
            let set = selector.select(&input, &rels, &interaction);
            assert!(set.relationships.is_empty());
        }
        assert_eq!(selector.integrity_warnings(), 2);

        selector.reset();
        assert_eq!(selector.integrity_warnings(), 0);
    }
}
