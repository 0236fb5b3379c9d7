use bytemuck::{Pod, Zeroable};

use crate::scene::{LightRig, ShapeBatch};

use super::ctx::{RenderCtx, RenderTarget};
use super::shadow_target::ShadowTarget;
use super::tiles::{InstanceBuffer, OutlineVertex, ShapeBuffers, TileInstanceRaw};

/// Depth-only render of every tile from the light's point of view.
///
/// The pass targets the shadow map's depth view; its viewport is the
/// target's resolution, independent of the window. Slope-scaled depth
/// bias is baked into the pipeline to suppress self-shadowing acne.
#[derive(Default)]
pub struct ShadowPassRenderer {
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group: Option<wgpu::BindGroup>,
    globals_ubo: Option<wgpu::Buffer>,

    shapes: Option<[ShapeBuffers; 2]>,
    instances: [InstanceBuffer; 2],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ShadowGlobals {
    light_view_proj: [[f32; 4]; 4],
}

impl ShadowPassRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the shadow pass for this frame's batches.
    ///
    /// Must be recorded before the color pass on the same encoder so
    /// the depth write lands before the color pass samples it.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        shadow: &ShadowTarget,
        batches: &[ShapeBatch; 2],
        light: &LightRig,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        if self.shapes.is_none() {
            self.shapes = Some(ShapeBuffers::for_all_shapes(ctx));
        }

        if let Some(ubo) = self.globals_ubo.as_ref() {
            ctx.queue.write_buffer(
                ubo,
                0,
                bytemuck::bytes_of(&ShadowGlobals {
                    light_view_proj: light.view_projection().to_cols_array_2d(),
                }),
            );
        }

        for (slot, batch) in self.instances.iter_mut().zip(batches) {
            slot.upload(ctx, batch);
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(shapes) = self.shapes.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("hexpulse shadow pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &shadow.depth_view,
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
        if self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("hexpulse shadow shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shadow.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("hexpulse shadow bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(
                            std::num::NonZeroU64::new(
                                std::mem::size_of::<ShadowGlobals>() as u64
                            )
                            .expect("ShadowGlobals has non-zero size by construction"),
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("hexpulse shadow pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("hexpulse shadow pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[OutlineVertex::layout(), TileInstanceRaw::layout()],
            },
            // Depth-only: no fragment stage, no color targets.
            fragment: None,
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
                format: ShadowTarget::FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                // Constant + slope-scaled bias against self-shadow acne.
                bias: wgpu::DepthBiasState {
                    constant: 4,
                    slope_scale: 4.0,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline = Some(pipeline);
        self.bind_group = None;
        self.globals_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.globals_ubo.is_some() {
            return;
        }
        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let globals_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hexpulse shadow globals ubo"),
            size: std::mem::size_of::<ShadowGlobals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("hexpulse shadow bind group"),
            layout: &pipeline.get_bind_group_layout(0),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_ubo.as_entire_binding(),
            }],
        });

        self.globals_ubo = Some(globals_ubo);
        self.bind_group = Some(bind_group);
    }
}
