//! Shared tile geometry and instance plumbing for both passes.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::scene::{ShapeBatch, TileShape, TILE_SHAPES};

use super::ctx::RenderCtx;

/// Outline vertex layout (8 bytes, loc 0).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct OutlineVertex {
    pub pos: [f32; 2],
}

impl OutlineVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OutlineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Instance data layout (80 bytes):
///
///  offset  0  model col 0  [f32; 4]  loc 1
///  offset 16  model col 1  [f32; 4]  loc 2
///  offset 32  model col 2  [f32; 4]  loc 3
///  offset 48  model col 3  [f32; 4]  loc 4
///  offset 64  elevation    f32       loc 5  (+12 pad)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct TileInstanceRaw {
    pub model: [[f32; 4]; 4],
    pub elevation: f32,
    pub _pad: [f32; 3],
}

impl TileInstanceRaw {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x4, // model col 0
        2 => Float32x4, // model col 1
        3 => Float32x4, // model col 2
        4 => Float32x4, // model col 3
        5 => Float32    // elevation
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TileInstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Static outline buffers for one shape: vertex buffer plus a strip
/// index buffer that repeats index 0 to close the loop (wgpu has no
/// line-loop topology).
pub(super) struct ShapeBuffers {
    pub vbo: wgpu::Buffer,
    pub ibo: wgpu::Buffer,
    pub index_count: u32,
}

impl ShapeBuffers {
    fn new(ctx: &RenderCtx<'_>, shape: TileShape) -> Self {
        let outline = shape.outline();

        let vertices: Vec<OutlineVertex> =
            outline.iter().map(|&pos| OutlineVertex { pos }).collect();

        let mut indices: Vec<u16> = (0..outline.len() as u16).collect();
        indices.push(0); // close the loop

        let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hexpulse tile outline vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hexpulse tile outline ibo"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vbo,
            ibo,
            index_count: indices.len() as u32,
        }
    }

    /// One buffer set per shape, in draw order.
    pub(super) fn for_all_shapes(ctx: &RenderCtx<'_>) -> [ShapeBuffers; 2] {
        TILE_SHAPES.map(|shape| ShapeBuffers::new(ctx, shape))
    }
}

/// Growable instance vertex buffer, one per shape per renderer.
#[derive(Default)]
pub(super) struct InstanceBuffer {
    buffer: Option<wgpu::Buffer>,
    capacity: usize,
    pub count: u32,
}

impl InstanceBuffer {
    /// Uploads the batch's instances, growing the buffer if needed.
    pub(super) fn upload(&mut self, ctx: &RenderCtx<'_>, batch: &ShapeBatch) {
        let raw: Vec<TileInstanceRaw> = batch
            .instances
            .iter()
            .map(|inst| TileInstanceRaw {
                model: inst.model.to_cols_array_2d(),
                elevation: inst.elevation,
                _pad: [0.0; 3],
            })
            .collect();

        if raw.len() > self.capacity || self.buffer.is_none() {
            let new_cap = raw.len().next_power_of_two().max(64);
            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("hexpulse tile instance vbo"),
                size: (new_cap * std::mem::size_of::<TileInstanceRaw>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = new_cap;
        }

        if let Some(buffer) = self.buffer.as_ref() {
            ctx.queue.write_buffer(buffer, 0, bytemuck::cast_slice(&raw));
        }
        self.count = raw.len() as u32;
    }

    pub(super) fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }
}
