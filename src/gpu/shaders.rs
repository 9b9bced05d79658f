//! WGSL render shaders
//!
//! Nodes are instanced meshes with two fragment entry points: `fs_node_lit`
//! (Blinn-Phong plus emissive) for Medium/High and `fs_node_flat` for Low.
//! Relationships are instanced line segments.

/// Camera uniform struct used by all render shaders
pub const CAMERA_UNIFORMS: &str = r#"
struct CameraUniforms {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    camera_pos: vec3<f32>,
    _padding: f32,
}

@group(0) @binding(0) var<uniform> camera: CameraUniforms;
"#;

/// Node vertex shader: scale the unit mesh by radius, move it to position
pub const NODE_VERTEX_SHADER: &str = r#"
struct MeshVertex {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct NodeInstance {
    @location(2) world_pos: vec3<f32>,
    @location(3) radius: f32,
    @location(4) color: vec4<f32>,
    @location(5) emissive: vec3<f32>,
    @location(6) emissive_intensity: f32,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) world_position: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) emissive: vec3<f32>,
    @location(4) emissive_intensity: f32,
}

@vertex
fn vs_node(mesh: MeshVertex, instance: NodeInstance) -> VertexOutput {
    var out: VertexOutput;

    let world_pos = mesh.position * instance.radius + instance.world_pos;
    out.clip_position = camera.projection * camera.view * vec4<f32>(world_pos, 1.0);

    // uniform scale: the mesh normal is still valid
    out.world_normal = mesh.normal;
    out.world_position = world_pos;
    out.color = instance.color;
    out.emissive = instance.emissive;
    out.emissive_intensity = instance.emissive_intensity;

    return out;
}
"#;

/// Node fragment shaders
pub const NODE_FRAGMENT_SHADER: &str = r#"
struct FragmentInput {
    @location(0) world_normal: vec3<f32>,
    @location(1) world_position: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) emissive: vec3<f32>,
    @location(4) emissive_intensity: f32,
}

@fragment
fn fs_node_lit(in: FragmentInput) -> @location(0) vec4<f32> {
    let normal = normalize(in.world_normal);
    let light_dir = normalize(vec3<f32>(10.0, 10.0, 5.0));
    let view_dir = normalize(camera.camera_pos - in.world_position);
    let half_dir = normalize(light_dir + view_dir);

    let ambient = 0.6;
    let diffuse = max(dot(normal, light_dir), 0.0) * 0.8;
    let specular = pow(max(dot(normal, half_dir), 0.0), 32.0) * 0.2;

    let lit = in.color.rgb * min(ambient + diffuse, 1.2) + vec3<f32>(specular);
    let color = lit + in.emissive * in.emissive_intensity;
    return vec4<f32>(min(color, vec3<f32>(1.0)), in.color.a);
}

@fragment
fn fs_node_flat(in: FragmentInput) -> @location(0) vec4<f32> {
    let color = in.color.rgb + in.emissive * in.emissive_intensity;
    return vec4<f32>(min(color, vec3<f32>(1.0)), in.color.a);
}
"#;

/// Edge vertex shader: vertex 0 is the start, vertex 1 the end
pub const EDGE_VERTEX_SHADER: &str = r#"
struct EdgeInstance {
    @location(0) start: vec3<f32>,
    @location(1) end: vec3<f32>,
    @location(2) color: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
}

@vertex
fn vs_edge(@builtin(vertex_index) vertex_idx: u32, instance: EdgeInstance) -> VertexOutput {
    var out: VertexOutput;

    var pos: vec3<f32>;
    if (vertex_idx == 0u) {
        pos = instance.start;
    } else {
        pos = instance.end;
    }

    out.clip_position = camera.projection * camera.view * vec4<f32>(pos, 1.0);
    out.color = instance.color;
    return out;
}
"#;

/// Edge fragment shader
pub const EDGE_FRAGMENT_SHADER: &str = r#"
@fragment
fn fs_edge(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;

/// Fragment entry point of the node pipeline
pub fn node_fragment_entry(lit: bool) -> &'static str {
    if lit { "fs_node_lit" } else { "fs_node_flat" }
}

/// Complete node shader source
pub fn node_shader() -> String {
    format!("{CAMERA_UNIFORMS}\n{NODE_VERTEX_SHADER}\n{NODE_FRAGMENT_SHADER}")
}

/// Complete edge shader source
pub fn edge_shader() -> String {
    format!("{CAMERA_UNIFORMS}\n{EDGE_VERTEX_SHADER}\n{EDGE_FRAGMENT_SHADER}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_shader_has_both_shading_modes() {
        let shader = node_shader();
        assert!(shader.contains("fn vs_node"));
        assert!(shader.contains(&format!("fn {}", node_fragment_entry(true))));
        assert!(shader.contains(&format!("fn {}", node_fragment_entry(false))));
    }

    #[test]
    fn test_edge_shader_entry_points() {
        let shader = edge_shader();
        assert!(shader.contains("fn vs_edge"));
        assert!(shader.contains("fn fs_edge"));
    }

    #[test]
    fn test_shaders_share_camera_binding() {
        for shader in [node_shader(), edge_shader()] {
            assert!(shader.contains("@group(0) @binding(0)"));
            assert!(shader.contains("CameraUniforms"));
        }
    }

    #[test]
    fn test_braces_balanced() {
        for shader in [node_shader(), edge_shader()] {
            assert_eq!(shader.matches('{').count(), shader.matches('}').count());
        }
    }
}
