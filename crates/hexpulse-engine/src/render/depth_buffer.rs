//! Window-sized depth attachment for the color pass.

use crate::coords::Viewport;

pub(super) struct DepthBuffer {
    pub view: wgpu::TextureView,
    size: Viewport,
}

pub(super) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

impl DepthBuffer {
    fn new(device: &wgpu::Device, size: Viewport) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("hexpulse window depth texture"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            size,
        }
    }

    /// Returns a depth buffer matching `size`, recreating it after a
    /// resize.
    pub(super) fn ensure<'a>(
        slot: &'a mut Option<DepthBuffer>,
        device: &wgpu::Device,
        size: Viewport,
    ) -> &'a wgpu::TextureView {
        let stale = slot.as_ref().map(|d| d.size != size).unwrap_or(true);
        if stale {
            *slot = Some(DepthBuffer::new(device, size));
        }
        // Slot was just filled above when empty.
        &slot.as_ref().expect("depth buffer present after ensure").view
    }
}
