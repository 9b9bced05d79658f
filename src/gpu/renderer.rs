//! wgpu scene renderer
//!
//! Draws a [`FrameDrawList`] into an offscreen target: instanced meshes per
//! node shape, instanced lines for relationships. Everything the quality
//! tier controls (mesh detail, shading, MSAA, target size) is rebuilt by
//! [`GpuRenderer::apply_quality`].

use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::backend::RenderBackend;
use crate::camera::Camera3D;
use crate::config::{EngineConfig, Viewport};
use crate::error::RenderError;
use crate::gpu::geometry::{MeshVertex, shape_mesh};
use crate::gpu::shaders::{edge_shader, node_fragment_entry, node_shader};
use crate::gpu::types::{CameraUniforms, EdgeInstance, NodeInstance};
use crate::probe::AdapterSummary;
use crate::quality::QualitySettings;
use crate::scene::{FrameDrawList, NodeDraw};
use crate::visual::NodeShape;

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Initial instance buffer capacities; both grow on demand
pub const DEFAULT_MAX_NODES: u32 = 4096;
pub const DEFAULT_MAX_EDGES: u32 = 16384;

/// A device/queue pair plus a description of the adapter behind it
#[derive(Debug, Clone)]
pub struct GpuContext {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    info: wgpu::AdapterInfo,
}

impl GpuContext {
    /// Name, backend and type of the adapter
    pub fn adapter_summary(&self) -> AdapterSummary {
        AdapterSummary {
            name: self.info.name.clone(),
            backend: format!("{:?}", self.info.backend),
            device_type: format!("{:?}", self.info.device_type),
        }
    }
}

/// Request an adapter and a device for offscreen rendering
pub async fn create_render_device() -> Result<GpuContext, RenderError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| RenderError::Gpu("no compatible GPU adapter".to_string()))?;

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor::default(), None)
        .await
        .map_err(|err| RenderError::Gpu(err.to_string()))?;

    Ok(GpuContext {
        device: Arc::new(device),
        queue: Arc::new(queue),
        info: adapter.get_info(),
    })
}

/// Per-instance vertex buffer that is reallocated when a frame outgrows it
struct InstanceBuffer {
    label: &'static str,
    kind: &'static str,
    stride: u64,
    capacity: u32,
    buffer: wgpu::Buffer,
}

impl InstanceBuffer {
    fn new(
        device: &wgpu::Device,
        label: &'static str,
        kind: &'static str,
        stride: usize,
        capacity: u32,
    ) -> Self {
        let stride = stride as u64;
        let limit = device.limits().max_buffer_size / stride;
        let capacity = (capacity as u64).clamp(1, limit.max(1)) as u32;
        Self {
            label,
            kind,
            stride,
            capacity,
            buffer: create_instance_buffer(device, label, stride, capacity),
        }
    }

    /// Make room for `count` instances
    fn reserve(&mut self, device: &wgpu::Device, count: usize) -> Result<(), RenderError> {
        let limit = device.limits().max_buffer_size / self.stride;
        let capacity =
            grown_capacity(self.capacity, count, limit).ok_or(RenderError::CapacityExceeded {
                kind: self.kind,
                count,
                capacity: usize::try_from(limit).unwrap_or(usize::MAX),
            })?;
        if capacity != self.capacity {
            tracing::debug!(
                kind = self.kind,
                from = self.capacity,
                to = capacity,
                "growing instance buffer"
            );
            self.buffer = create_instance_buffer(device, self.label, self.stride, capacity);
            self.capacity = capacity;
        }
        Ok(())
    }
}

fn create_instance_buffer(
    device: &wgpu::Device,
    label: &str,
    stride: u64,
    capacity: u32,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Capacity holding `needed` instances: `current` when it already fits,
/// otherwise the next power of two, clamped to `limit`. `None` when even
/// `limit` is too small.
fn grown_capacity(current: u32, needed: usize, limit: u64) -> Option<u32> {
    if needed <= current as usize {
        return Some(current);
    }
    if needed as u64 > limit {
        return None;
    }
    let grown = u32::try_from(needed)
        .ok()?
        .checked_next_power_of_two()
        .unwrap_or(u32::MAX);
    Some((grown as u64).min(limit) as u32)
}

struct MeshBuffers {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

struct Targets {
    width: u32,
    height: u32,
    color: wgpu::Texture,
    /// Multisampled color, resolved into `color` (absent without MSAA)
    msaa: Option<wgpu::Texture>,
    depth: wgpu::Texture,
    staging: wgpu::Buffer,
    padded_bytes_per_row: u32,
}

/// Offscreen wgpu renderer for [`FrameDrawList`]s
pub struct GpuRenderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    viewport: Viewport,
    settings: QualitySettings,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    pipeline_layout: wgpu::PipelineLayout,
    node_module: wgpu::ShaderModule,
    edge_module: wgpu::ShaderModule,

    node_pipeline: wgpu::RenderPipeline,
    edge_pipeline: wgpu::RenderPipeline,
    meshes: Vec<MeshBuffers>,
    targets: Targets,

    node_instances: InstanceBuffer,
    edge_instances: InstanceBuffer,
}

impl GpuRenderer {
    /// Create a renderer for `viewport` at the detail level of `settings`
    pub fn new(context: &GpuContext, viewport: Viewport, settings: QualitySettings) -> Self {
        Self::with_capacity(context, viewport, settings, DEFAULT_MAX_NODES, DEFAULT_MAX_EDGES)
    }

    /// Create a renderer for an engine configuration.
    ///
    /// The node buffer starts large enough for the configured node budget.
    pub fn for_config(context: &GpuContext, config: &EngineConfig) -> Self {
        let max_nodes = u32::try_from(config.max_render_nodes).unwrap_or(u32::MAX);
        Self::with_capacity(
            context,
            config.viewport,
            config.initial_quality_tier.settings(),
            max_nodes,
            DEFAULT_MAX_EDGES,
        )
    }

    /// Create a renderer with specific initial instance buffer capacities
    pub fn with_capacity(
        context: &GpuContext,
        viewport: Viewport,
        settings: QualitySettings,
        max_nodes: u32,
        max_edges: u32,
    ) -> Self {
        let device = Arc::clone(&context.device);
        let queue = Arc::clone(&context.queue);

        let node_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Node Shader"),
            source: wgpu::ShaderSource::Wgsl(node_shader().into()),
        });
        let edge_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Edge Shader"),
            source: wgpu::ShaderSource::Wgsl(edge_shader().into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniform Buffer"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let node_instances = InstanceBuffer::new(
            &device,
            "Node Instance Buffer",
            "nodes",
            std::mem::size_of::<NodeInstance>(),
            max_nodes,
        );
        let edge_instances = InstanceBuffer::new(
            &device,
            "Edge Instance Buffer",
            "edges",
            std::mem::size_of::<EdgeInstance>(),
            max_edges,
        );

        let node_pipeline =
            create_node_pipeline(&device, &pipeline_layout, &node_module, &settings);
        let edge_pipeline =
            create_edge_pipeline(&device, &pipeline_layout, &edge_module, &settings);
        let meshes = create_meshes(&device, &settings);
        let targets = create_targets(&device, &viewport, &settings);

        Self {
            device,
            queue,
            viewport,
            settings,
            camera_buffer,
            camera_bind_group,
            pipeline_layout,
            node_module,
            edge_module,
            node_pipeline,
            edge_pipeline,
            meshes,
            targets,
            node_instances,
            edge_instances,
        }
    }

    /// Settings the pipelines and meshes were built for
    pub fn settings(&self) -> &QualitySettings {
        &self.settings
    }

    /// Physical size of the render target
    pub fn size(&self) -> (u32, u32) {
        (self.targets.width, self.targets.height)
    }

    /// Current node and edge instance capacities
    pub fn capacity(&self) -> (u32, u32) {
        (self.node_instances.capacity, self.edge_instances.capacity)
    }

    /// Recreate the render target for a new host surface size
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.targets = create_targets(&self.device, &self.viewport, &self.settings);
    }

    /// Rebuild tier-dependent resources when `settings` differ from the
    /// current ones
    pub fn apply_quality(&mut self, settings: &QualitySettings) {
        if *settings == self.settings {
            return;
        }
        tracing::debug!(tier = %settings.tier, "rebuilding GPU resources");

        if settings.msaa_samples != self.settings.msaa_samples || settings.lit != self.settings.lit
        {
            self.node_pipeline = create_node_pipeline(
                &self.device,
                &self.pipeline_layout,
                &self.node_module,
                settings,
            );
            self.edge_pipeline = create_edge_pipeline(
                &self.device,
                &self.pipeline_layout,
                &self.edge_module,
                settings,
            );
        }
        if settings.sphere_subdivisions != self.settings.sphere_subdivisions
            || settings.radial_segments != self.settings.radial_segments
        {
            self.meshes = create_meshes(&self.device, settings);
        }
        self.targets = create_targets(&self.device, &self.viewport, settings);
        self.settings = *settings;
    }

    /// Render one frame into the offscreen target.
    ///
    /// Instance buffers grow to fit the frame; only a frame larger than the
    /// device's buffer size limit fails.
    pub fn render(&mut self, camera: &Camera3D, frame: &FrameDrawList) -> Result<(), RenderError> {
        self.node_instances.reserve(&self.device, frame.nodes.len())?;
        self.edge_instances.reserve(&self.device, frame.edges.len())?;
        self.apply_quality(&frame.settings);

        let uniforms = CameraUniforms::from(camera);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniforms));

        let nodes: Vec<NodeInstance> = frame.nodes.iter().map(NodeInstance::from).collect();
        let edges: Vec<EdgeInstance> = frame.edges.iter().map(EdgeInstance::from).collect();
        if !nodes.is_empty() {
            self.queue
                .write_buffer(&self.node_instances.buffer, 0, bytemuck::cast_slice(&nodes));
        }
        if !edges.is_empty() {
            self.queue
                .write_buffer(&self.edge_instances.buffer, 0, bytemuck::cast_slice(&edges));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let color_view = self
            .targets
            .color
            .create_view(&wgpu::TextureViewDescriptor::default());
        let msaa_view = self
            .targets
            .msaa
            .as_ref()
            .map(|texture| texture.create_view(&wgpu::TextureViewDescriptor::default()));
        let depth_view = self
            .targets
            .depth
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (view, resolve_target) = match &msaa_view {
            Some(msaa) => (msaa, Some(&color_view)),
            None => (&color_view, None),
        };
        let [r, g, b, a] = frame.clear_color;

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !edges.is_empty() {
                pass.set_pipeline(&self.edge_pipeline);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_vertex_buffer(0, self.edge_instances.buffer.slice(..));
                pass.draw(0..2, 0..edges.len() as u32);
            }

            if !nodes.is_empty() {
                pass.set_pipeline(&self.node_pipeline);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_vertex_buffer(1, self.node_instances.buffer.slice(..));
                for (shape, instances) in shape_runs(&frame.nodes) {
                    let mesh = &self.meshes[shape.index()];
                    pass.set_vertex_buffer(0, mesh.vertices.slice(..));
                    pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..mesh.index_count, 0, instances);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Read back the last rendered image as tightly packed RGBA rows.
    ///
    /// Blocks until the GPU has finished.
    pub fn read_pixels(&self) -> Result<Vec<u8>, RenderError> {
        let Targets {
            width,
            height,
            padded_bytes_per_row,
            ..
        } = self.targets;
        let unpadded_bytes_per_row = width * 4;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.targets.color,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.targets.staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = self.targets.staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| RenderError::Gpu("readback was cancelled".to_string()))?
            .map_err(|err| RenderError::Gpu(err.to_string()))?;

        let data = slice.get_mapped_range();
        let mut pixels = Vec::with_capacity((unpadded_bytes_per_row * height) as usize);
        for row in 0..height {
            let start = (row * padded_bytes_per_row) as usize;
            pixels.extend_from_slice(&data[start..start + unpadded_bytes_per_row as usize]);
        }
        drop(data);
        self.targets.staging.unmap();

        Ok(pixels)
    }
}

impl RenderBackend for GpuRenderer {
    fn apply_quality(&mut self, settings: &QualitySettings) -> Result<(), RenderError> {
        GpuRenderer::apply_quality(self, settings);
        Ok(())
    }

    fn draw(&mut self, camera: &Camera3D, frame: &FrameDrawList) -> Result<(), RenderError> {
        self.render(camera, frame)
    }

    fn resize(&mut self, viewport: &Viewport) -> Result<(), RenderError> {
        GpuRenderer::resize(self, *viewport);
        Ok(())
    }
}

/// Consecutive runs of same-shaped nodes, as instance ranges.
///
/// Drawing run by run keeps instances in render-set order.
fn shape_runs(nodes: &[NodeDraw]) -> Vec<(NodeShape, std::ops::Range<u32>)> {
    let mut runs: Vec<(NodeShape, std::ops::Range<u32>)> = Vec::new();
    for (i, draw) in nodes.iter().enumerate() {
        let i = i as u32;
        match runs.last_mut() {
            Some((shape, range)) if *shape == draw.shape => range.end = i + 1,
            _ => runs.push((draw.shape, i..i + 1)),
        }
    }
    runs
}

fn create_meshes(device: &wgpu::Device, settings: &QualitySettings) -> Vec<MeshBuffers> {
    NodeShape::ALL
        .iter()
        .map(|&shape| {
            let mesh = shape_mesh(shape, settings);
            MeshBuffers {
                vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh Vertex Buffer"),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh Index Buffer"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: mesh.indices.len() as u32,
            }
        })
        .collect()
}

fn create_targets(device: &wgpu::Device, viewport: &Viewport, settings: &QualitySettings) -> Targets {
    let (width, height) =
        viewport.physical_size(settings.pixel_ratio(viewport.device_pixel_ratio));
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = |label: &str,
                   samples: u32,
                   format: wgpu::TextureFormat,
                   usage: wgpu::TextureUsages| {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: samples,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        })
    };

    let samples = settings.msaa_samples;
    let color = texture(
        "Color Texture",
        1,
        COLOR_FORMAT,
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
    );
    let msaa = (samples > 1).then(|| {
        texture(
            "MSAA Color Texture",
            samples,
            COLOR_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        )
    });
    let depth = texture(
        "Depth Texture",
        samples,
        DEPTH_FORMAT,
        wgpu::TextureUsages::RENDER_ATTACHMENT,
    );

    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_bytes_per_row = (width * 4).div_ceil(align) * align;
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Staging Buffer"),
        size: (padded_bytes_per_row * height) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    Targets {
        width,
        height,
        color,
        msaa,
        depth,
        staging,
        padded_bytes_per_row,
    }
}

fn depth_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

fn color_target() -> [Option<wgpu::ColorTargetState>; 1] {
    [Some(wgpu::ColorTargetState {
        format: COLOR_FORMAT,
        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
        write_mask: wgpu::ColorWrites::ALL,
    })]
}

fn create_node_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    module: &wgpu::ShaderModule,
    settings: &QualitySettings,
) -> wgpu::RenderPipeline {
    let targets = color_target();
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Node Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_node"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<NodeInstance>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        2 => Float32x3,
                        3 => Float32,
                        4 => Float32x4,
                        5 => Float32x3,
                        6 => Float32,
                    ],
                },
            ],
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some(node_fragment_entry(settings.lit)),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &targets,
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(depth_state()),
        multisample: wgpu::MultisampleState {
            count: settings.msaa_samples,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

fn create_edge_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    module: &wgpu::ShaderModule,
    settings: &QualitySettings,
) -> wgpu::RenderPipeline {
    let targets = color_target();
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Edge Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_edge"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<EdgeInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x3,
                    2 => Float32x4,
                ],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_edge"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &targets,
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::LineList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            // translucent lines should not hide each other
            depth_write_enabled: false,
            ..depth_state()
        }),
        multisample: wgpu::MultisampleState {
            count: settings.msaa_samples,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}
