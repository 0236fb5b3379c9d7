use bytemuck::{Pod, Zeroable};

use crate::scene::{Scene, ShapeBatch};

use super::ctx::{RenderCtx, RenderTarget};
use super::depth_buffer::{DepthBuffer, DEPTH_FORMAT};
use super::shadow_target::ShadowTarget;
use super::tiles::{InstanceBuffer, OutlineVertex, ShapeBuffers, TileInstanceRaw};

/// Lit, shadowed render of every tile from the viewer's perspective.
///
/// Consumes the SAME batch list the shadow pass consumed this frame;
/// only the observer matrices differ. Clears color and depth, tests
/// depth with "closer wins", and samples the shadow target through a
/// comparison sampler.
#[derive(Default)]
pub struct ColorPassRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group: Option<wgpu::BindGroup>,
    globals_ubo: Option<wgpu::Buffer>,

    shapes: Option<[ShapeBuffers; 2]>,
    instances: [InstanceBuffer; 2],
    depth: Option<DepthBuffer>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ColorGlobals {
    view_proj: [[f32; 4]; 4],
    /// Light-space transform so the fragment stage can project world
    /// positions into the shadow map.
    light_view_proj: [[f32; 4]; 4],
    light_position: [f32; 4],
    base_color: [f32; 4],
}

impl ColorPassRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the color pass for this frame's batches.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        shadow: &ShadowTarget,
        batches: &[ShapeBatch; 2],
        scene: &Scene,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx, shadow);
        if self.shapes.is_none() {
            self.shapes = Some(ShapeBuffers::for_all_shapes(ctx));
        }

        if let Some(ubo) = self.globals_ubo.as_ref() {
            let light_pos = scene.light.position;
            let [r, g, b] = scene.base_color;
            ctx.queue.write_buffer(
                ubo,
                0,
                bytemuck::bytes_of(&ColorGlobals {
                    view_proj: scene.camera.view_projection(ctx.viewport).to_cols_array_2d(),
                    light_view_proj: scene.light.view_projection().to_cols_array_2d(),
                    light_position: [light_pos.x, light_pos.y, light_pos.z, 1.0],
                    base_color: [r, g, b, 1.0],
                }),
            );
        }

        for (slot, batch) in self.instances.iter_mut().zip(batches) {
            slot.upload(ctx, batch);
        }

        let depth_view = DepthBuffer::ensure(&mut self.depth, ctx.device, ctx.viewport);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(shapes) = self.shapes.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("hexpulse color pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);

        for (shape, slot) in shapes.iter().zip(&self.instances) {
            let Some(instance_vbo) = slot.buffer() else { continue };
            if slot.count == 0 {
                continue;
            }
            rpass.set_vertex_buffer(0, shape.vbo.slice(..));
            rpass.set_vertex_buffer(1, instance_vbo.slice(..));
            rpass.set_index_buffer(shape.ibo.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..shape.index_count, 0, 0..slot.count);
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("hexpulse tile shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/tile.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("hexpulse color bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(
                                std::num::NonZeroU64::new(
                                    std::mem::size_of::<ColorGlobals>() as u64
                                )
                                .expect("ColorGlobals has non-zero size by construction"),
                            ),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Depth,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                        count: None,
                    },
                ],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("hexpulse color pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("hexpulse color pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[OutlineVertex::layout(), TileInstanceRaw::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineStrip,
                strip_index_format: Some(wgpu::IndexFormat::Uint16),
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
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group = None;
        self.globals_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>, shadow: &ShadowTarget) {
        if self.bind_group.is_some() && self.globals_ubo.is_some() {
            return;
        }
        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let globals_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hexpulse color globals ubo"),
            size: std::mem::size_of::<ColorGlobals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("hexpulse color bind group"),
            layout: &pipeline.get_bind_group_layout(0),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow.sampled_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow.sampler),
                },
            ],
        });

        self.globals_ubo = Some(globals_ubo);
        self.bind_group = Some(bind_group);
    }
}
