//! Offscreen depth target written by the shadow pass and sampled by
//! the color pass.

/// Square `Depth32Float` texture with a render view, a sampling view,
/// and a comparison sampler.
///
/// Exclusively written by the shadow pass and exclusively read by the
/// color pass within one frame; recording both passes on one encoder
/// preserves that ordering without explicit synchronization.
pub struct ShadowTarget {
    pub depth_view: wgpu::TextureView,
    pub sampled_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub resolution: u32,
}

impl ShadowTarget {
    /// Depth format used for both the attachment and the sampled view.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(device: &wgpu::Device, resolution: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("hexpulse shadow depth texture"),
            size: wgpu::Extent3d {
                width: resolution,
                height: resolution,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let depth_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("hexpulse shadow depth view"),
            format: Some(Self::FORMAT),
            dimension: Some(wgpu::TextureViewDimension::D2),
            aspect: wgpu::TextureAspect::DepthOnly,
            ..Default::default()
        });

        let sampled_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("hexpulse shadow sampled view"),
            format: Some(Self::FORMAT),
            dimension: Some(wgpu::TextureViewDimension::D2),
            aspect: wgpu::TextureAspect::DepthOnly,
            ..Default::default()
        });

        // Comparison sampler: hardware depth compare with linear
        // filtering gives 2x2 PCF on most backends.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("hexpulse shadow comparison sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        Self {
            depth_view,
            sampled_view,
            sampler,
            resolution,
        }
    }
}
