//! Unit meshes for the node shapes
//!
//! Meshes are built for a node of size 1 and centered on the origin; the
//! instance radius scales them. The sphere is a smooth icosphere, every
//! other shape is flat-shaded (one normal per face).

use std::collections::HashMap;
use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::quality::QualitySettings;
use crate::visual::NodeShape;

/// Cylinder radius relative to node size
pub const CYLINDER_RADIUS: f32 = 0.8;

/// Cylinder and cone height relative to node size
pub const SHAFT_HEIGHT: f32 = 1.5;

/// A mesh vertex with position and normal.
///
/// Layout matches the `MeshVertex` struct in the node shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a flat triangle, oriented so its normal points away from the
    /// mesh center
    fn push_flat(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let mut normal = (b - a).cross(c - a).normalize_or_zero();
        let (b, c) = if normal.dot((a + b + c) / 3.0) < 0.0 {
            normal = -normal;
            (c, b)
        } else {
            (b, c)
        };
        let base = self.vertices.len() as u32;
        for position in [a, b, c] {
            self.vertices.push(MeshVertex {
                position: position.to_array(),
                normal: normal.to_array(),
            });
        }
        self.indices.extend([base, base + 1, base + 2]);
    }

    fn from_faces(points: &[Vec3], faces: &[[u32; 3]]) -> Self {
        let mut mesh = Mesh::default();
        for face in faces {
            mesh.push_flat(
                points[face[0] as usize],
                points[face[1] as usize],
                points[face[2] as usize],
            );
        }
        mesh
    }
}

/// Mesh for `shape` at the detail level of `settings`
pub fn shape_mesh(shape: NodeShape, settings: &QualitySettings) -> Mesh {
    match shape {
        NodeShape::Sphere => icosphere(settings.sphere_subdivisions),
        NodeShape::Octahedron => octahedron(),
        NodeShape::Dodecahedron => dodecahedron(),
        NodeShape::Tetrahedron => tetrahedron(),
        NodeShape::Cylinder => cylinder(CYLINDER_RADIUS, SHAFT_HEIGHT, settings.radial_segments),
        NodeShape::Cone => cone(1.0, SHAFT_HEIGHT, settings.radial_segments),
    }
}

/// Icosphere with the given subdivision level.
///
/// - 0: 12 vertices, 20 faces
/// - 1: 42 vertices, 80 faces
/// - 2: 162 vertices, 320 faces
/// - 3: 642 vertices, 1280 faces
pub fn icosphere(subdivisions: u32) -> Mesh {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut points: Vec<Vec3> = [
        [-1.0, phi, 0.0],
        [1.0, phi, 0.0],
        [-1.0, -phi, 0.0],
        [1.0, -phi, 0.0],
        [0.0, -1.0, phi],
        [0.0, 1.0, phi],
        [0.0, -1.0, -phi],
        [0.0, 1.0, -phi],
        [phi, 0.0, -1.0],
        [phi, 0.0, 1.0],
        [-phi, 0.0, -1.0],
        [-phi, 0.0, 1.0],
    ]
    .into_iter()
    .map(|p| Vec3::from_array(p).normalize())
    .collect();

    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut next = Vec::with_capacity(faces.len() * 4);
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        for &[v1, v2, v3] in &faces {
            let a = midpoint(v1, v2, &mut points, &mut midpoints);
            let b = midpoint(v2, v3, &mut points, &mut midpoints);
            let c = midpoint(v3, v1, &mut points, &mut midpoints);
            next.extend([[v1, a, c], [v2, b, a], [v3, c, b], [a, b, c]]);
        }
        faces = next;
    }

    Mesh {
        vertices: points
            .iter()
            .map(|p| MeshVertex {
                position: p.to_array(),
                normal: p.to_array(),
            })
            .collect(),
        indices: faces.into_iter().flatten().collect(),
    }
}

fn midpoint(
    v1: u32,
    v2: u32,
    points: &mut Vec<Vec3>,
    cache: &mut HashMap<(u32, u32), u32>,
) -> u32 {
    let key = (v1.min(v2), v1.max(v2));
    *cache.entry(key).or_insert_with(|| {
        let mid = ((points[v1 as usize] + points[v2 as usize]) * 0.5).normalize();
        points.push(mid);
        (points.len() - 1) as u32
    })
}

/// Regular octahedron (8 faces)
pub fn octahedron() -> Mesh {
    let points = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
    let faces = [
        [0, 2, 4],
        [0, 4, 3],
        [0, 3, 5],
        [0, 5, 2],
        [1, 2, 5],
        [1, 5, 3],
        [1, 3, 4],
        [1, 4, 2],
    ];
    Mesh::from_faces(&points, &faces)
}

/// Regular tetrahedron (4 faces)
pub fn tetrahedron() -> Mesh {
    let points: Vec<Vec3> = [
        [1.0, 1.0, 1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
    ]
    .into_iter()
    .map(|p| Vec3::from_array(p).normalize())
    .collect();
    let faces = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];
    Mesh::from_faces(&points, &faces)
}

/// Regular dodecahedron (12 pentagons, 36 triangles)
pub fn dodecahedron() -> Mesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let r = 1.0 / t;
    let points: Vec<Vec3> = [
        [-1.0, -1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, 1.0],
        [0.0, -r, -t],
        [0.0, -r, t],
        [0.0, r, -t],
        [0.0, r, t],
        [-r, -t, 0.0],
        [-r, t, 0.0],
        [r, -t, 0.0],
        [r, t, 0.0],
        [-t, 0.0, -r],
        [t, 0.0, -r],
        [-t, 0.0, r],
        [t, 0.0, r],
    ]
    .into_iter()
    .map(|p| Vec3::from_array(p).normalize())
    .collect();

    // three triangles per pentagon
    let faces = [
        [3, 11, 7],
        [3, 7, 15],
        [3, 15, 13],
        [7, 19, 17],
        [7, 17, 6],
        [7, 6, 15],
        [17, 4, 8],
        [17, 8, 10],
        [17, 10, 6],
        [8, 0, 16],
        [8, 16, 2],
        [8, 2, 10],
        [0, 12, 1],
        [0, 1, 18],
        [0, 18, 16],
        [6, 10, 2],
        [6, 2, 13],
        [6, 13, 15],
        [2, 16, 18],
        [2, 18, 3],
        [2, 3, 13],
        [18, 1, 9],
        [18, 9, 11],
        [18, 11, 3],
        [4, 14, 12],
        [4, 12, 0],
        [4, 0, 8],
        [11, 9, 5],
        [11, 5, 19],
        [11, 19, 7],
        [19, 5, 14],
        [19, 14, 4],
        [19, 4, 17],
        [1, 12, 14],
        [1, 14, 5],
        [1, 5, 9],
    ];
    Mesh::from_faces(&points, &faces)
}

/// Capped cylinder along Y, centered on the origin
pub fn cylinder(radius: f32, height: f32, segments: u32) -> Mesh {
    shaft(radius, radius, height, segments)
}

/// Cone along Y with its apex up, centered on the origin
pub fn cone(radius: f32, height: f32, segments: u32) -> Mesh {
    shaft(0.0, radius, height, segments)
}

fn shaft(top_radius: f32, bottom_radius: f32, height: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let half = height / 2.0;
    let ring = |radius: f32, y: f32, i: u32| {
        let angle = TAU * i as f32 / segments as f32;
        Vec3::new(radius * angle.sin(), y, radius * angle.cos())
    };

    let mut mesh = Mesh::default();
    let top_center = Vec3::new(0.0, half, 0.0);
    let bottom_center = Vec3::new(0.0, -half, 0.0);
    for i in 0..segments {
        let top_a = ring(top_radius, half, i);
        let top_b = ring(top_radius, half, i + 1);
        let bottom_a = ring(bottom_radius, -half, i);
        let bottom_b = ring(bottom_radius, -half, i + 1);

        mesh.push_flat(bottom_a, bottom_b, top_a);
        if top_radius > 0.0 {
            mesh.push_flat(top_a, bottom_b, top_b);
            mesh.push_flat(top_center, top_a, top_b);
        }
        mesh.push_flat(bottom_center, bottom_b, bottom_a);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityTier;

    fn assert_outward(mesh: &Mesh) {
        for triangle in mesh.indices.chunks(3) {
            let [a, b, c] =
                [0, 1, 2].map(|k| Vec3::from_array(mesh.vertices[triangle[k] as usize].position));
            let normal = Vec3::from_array(mesh.vertices[triangle[0] as usize].normal);
            let winding = (b - a).cross(c - a);
            assert!(winding.dot(normal) > 0.0, "winding disagrees with normal");
            assert!(normal.dot((a + b + c) / 3.0) >= 0.0, "normal points inward");
        }
    }

    #[test]
    fn test_mesh_vertex_size() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
    }

    #[test]
    fn test_icosphere_counts() {
        for (level, vertices, faces) in [(0, 12, 20), (1, 42, 80), (2, 162, 320), (3, 642, 1280)] {
            let mesh = icosphere(level);
            assert_eq!(mesh.vertices.len(), vertices);
            assert_eq!(mesh.triangle_count(), faces);
        }
    }

    #[test]
    fn test_icosphere_vertices_on_unit_sphere() {
        let mesh = icosphere(2);
        for vertex in &mesh.vertices {
            let length = Vec3::from_array(vertex.position).length();
            assert!((length - 1.0).abs() < 1e-3);
            assert_eq!(vertex.position, vertex.normal);
        }
    }

    #[test]
    fn test_polyhedra_face_counts() {
        assert_eq!(tetrahedron().triangle_count(), 4);
        assert_eq!(octahedron().triangle_count(), 8);
        assert_eq!(dodecahedron().triangle_count(), 36);
    }

    #[test]
    fn test_flat_meshes_face_outward() {
        assert_outward(&tetrahedron());
        assert_outward(&octahedron());
        assert_outward(&dodecahedron());
        assert_outward(&cylinder(0.8, 1.5, 16));
        assert_outward(&cone(1.0, 1.5, 16));
    }

    #[test]
    fn test_meshes_stay_near_unit_size() {
        for shape in NodeShape::ALL {
            let mesh = shape_mesh(shape, &QualityTier::High.settings());
            for vertex in &mesh.vertices {
                assert!(Vec3::from_array(vertex.position).length() <= 1.26);
            }
        }
    }

    #[test]
    fn test_segments_follow_quality_tier() {
        let low = shape_mesh(NodeShape::Cylinder, &QualityTier::Low.settings());
        let high = shape_mesh(NodeShape::Cylinder, &QualityTier::High.settings());
        // side (2) + caps (2) per segment
        assert_eq!(low.triangle_count(), 8 * 4);
        assert_eq!(high.triangle_count(), 32 * 4);

        let cone = shape_mesh(NodeShape::Cone, &QualityTier::Medium.settings());
        assert_eq!(cone.triangle_count(), 16 * 2);
    }

    #[test]
    fn test_indices_in_bounds() {
        for shape in NodeShape::ALL {
            let mesh = shape_mesh(shape, &QualityTier::Medium.settings());
            assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        }
    }
}
