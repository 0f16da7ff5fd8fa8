//! Instanced mesh pass for baubles and gifts.
//!
//! One pipeline draws every ornament group. Each group is a batch: a shared
//! mesh, a per-instance transform buffer rewritten every frame, a static
//! per-instance color buffer and its own material.

use glam::Mat4;
use wgpu::util::DeviceExt;

use super::mesh::Mesh;
use super::DEPTH_FORMAT;
use crate::dataset::Role;
use crate::scene::OrnamentGroup;
use crate::shaders::{MaterialUniforms, MeshVertex, SceneUniforms, ORNAMENT_WGSL};

const MESH_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
const TRANSFORM_ATTRIBUTES: [wgpu::VertexAttribute; 4] =
    wgpu::vertex_attr_array![2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![6 => Float32x3];

/// Sphere tessellation for baubles.
const SPHERE_SEGMENTS: u32 = 32;

/// One ornament group on the GPU.
struct Batch {
    role: Role,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    transform_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
    num_instances: u32,
}

/// GPU state for all ornaments.
pub struct OrnamentPass {
    pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    batches: Vec<Batch>,
}

impl OrnamentPass {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, groups: &[&OrnamentGroup]) -> Self {
        let uniform_layout = |label: &str| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            })
        };
        let scene_layout = uniform_layout("Ornament Scene Bind Group Layout");
        let material_layout = uniform_layout("Ornament Material Bind Group Layout");

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Ornament Scene Buffer"),
            size: std::mem::size_of::<SceneUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Ornament Scene Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let batches = groups
            .iter()
            .map(|group| Batch::new(device, &material_layout, group))
            .collect();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Ornament Shader"),
            source: wgpu::ShaderSource::Wgsl(ORNAMENT_WGSL.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Ornament Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Ornament Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &MESH_ATTRIBUTES,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &TRANSFORM_ATTRIBUTES,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &COLOR_ATTRIBUTES,
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            scene_buffer,
            scene_bind_group,
            batches,
        }
    }

    /// Upload the camera and lights plus this frame's transforms.
    pub fn update(&self, queue: &wgpu::Queue, scene: &SceneUniforms, groups: &[&OrnamentGroup]) {
        queue.write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(scene));
        for group in groups {
            if let Some(batch) = self.batches.iter().find(|b| b.role == group.role()) {
                let transforms: &[Mat4] = group.transforms();
                queue.write_buffer(&batch.transform_buffer, 0, bytemuck::cast_slice(transforms));
            }
        }
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
        for batch in &self.batches {
            render_pass.set_bind_group(1, &batch.material_bind_group, &[]);
            render_pass.set_vertex_buffer(0, batch.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, batch.transform_buffer.slice(..));
            render_pass.set_vertex_buffer(2, batch.color_buffer.slice(..));
            render_pass.set_index_buffer(batch.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..batch.index_count, 0, 0..batch.num_instances);
        }
    }
}

impl Batch {
    fn new(device: &wgpu::Device, material_layout: &wgpu::BindGroupLayout, group: &OrnamentGroup) -> Self {
        let role = group.role();
        let mesh = match role {
            Role::Bauble => Mesh::sphere(SPHERE_SEGMENTS, SPHERE_SEGMENTS),
            Role::Gift => Mesh::cube(),
        };

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ornament Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ornament Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let transforms: &[Mat4] = group.transforms();
        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ornament Transform Buffer"),
            contents: bytemuck::cast_slice(transforms),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ornament Color Buffer"),
            contents: bytemuck::cast_slice(&group.colors()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let material = MaterialUniforms::for_role(role);
        let material_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ornament Material Buffer"),
            contents: bytemuck::bytes_of(&material),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Ornament Material Bind Group"),
            layout: material_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: material_buffer.as_entire_binding(),
            }],
        });

        Self {
            role,
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
            transform_buffer,
            color_buffer,
            material_bind_group,
            num_instances: group.len() as u32,
        }
    }
}
