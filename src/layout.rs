//! Deterministic spherical layout
//!
//! Nodes are spread over a sphere by index: latitude from an inverse-cosine
//! spacing, longitude from a sweep proportional to `sqrt(n * PI)`. The
//! radius grows with importance so important nodes sit further out, which
//! keeps the origin uncluttered in large graphs. One pass, no relaxation.

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::model::GraphNode;

/// Radius of a node with importance 0
pub const BASE_RADIUS: f32 = 20.0;

/// Extra radius of a node with importance 1
pub const RADIUS_SPREAD: f32 = 10.0;

/// World position of each node, keyed by node id
pub type Positions = HashMap<String, [f32; 3]>;

/// Placement parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub base_radius: f32,
    pub radius_spread: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            base_radius: BASE_RADIUS,
            radius_spread: RADIUS_SPREAD,
        }
    }
}

/// Place `nodes` with the default parameters.
///
/// The result depends only on the order, ids and importance of `nodes`.
/// When an id repeats, the first occurrence keeps its position.
pub fn layout(nodes: &[GraphNode]) -> Positions {
    layout_with(nodes, LayoutParams::default())
}

/// Place `nodes` with custom radii
pub fn layout_with(nodes: &[GraphNode], params: LayoutParams) -> Positions {
    let count = nodes.len();
    let mut positions = Positions::with_capacity(count);
    if count == 0 {
        return positions;
    }

    let n = count as f64;
    let sweep = (n * PI).sqrt();
    for (index, node) in nodes.iter().enumerate() {
        if positions.contains_key(&node.id) {
            continue;
        }
        let radius = params.base_radius + node.clamped_importance() * params.radius_spread;
        positions.insert(node.id.clone(), sphere_point(index as f64, n, sweep, radius));
    }
    positions
}

fn sphere_point(index: f64, n: f64, sweep: f64, radius: f32) -> [f32; 3] {
    let phi = (-1.0 + 2.0 * index / n).clamp(-1.0, 1.0).acos();
    let theta = sweep * phi;
    let r = radius as f64;
    [
        (r * theta.cos() * phi.sin()) as f32,
        (r * theta.sin() * phi.sin()) as f32,
        (r * phi.cos()) as f32,
    ]
}

/// Distance of a position from the origin
pub fn radius_of(position: [f32; 3]) -> f32 {
    glam::Vec3::from_array(position).length()
}
