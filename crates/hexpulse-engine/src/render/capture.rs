//! Best-effort frame capture sink.
//!
//! Copies the presented surface texture into a mapped buffer and
//! writes numbered PNGs. Failures log a warning and never interrupt
//! the frame loop; capture is not part of the renderer's correctness
//! contract.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::ctx::RenderCtx;

/// Writes each presented frame to `<dir>/<NNNNN>.png`.
///
/// Requires the surface to be configured with COPY_SRC usage (see
/// `GpuInit::capture_readback`).
pub struct FrameCapture {
    dir: PathBuf,
    frame_index: u32,
    pending: Option<Pending>,
}

struct Pending {
    buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    bytes_per_row: u32,
    format: wgpu::TextureFormat,
}

impl FrameCapture {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create capture directory {}", dir.display()))?;
        Ok(Self {
            dir,
            frame_index: 0,
            pending: None,
        })
    }

    /// Number of frames successfully written so far.
    ///
    /// Skipped or failed frames do not advance this count, so callers
    /// bounding a capture run get exactly as many files as they ask
    /// for.
    pub fn frames_written(&self) -> u32 {
        self.frame_index
    }

    /// Records a copy of `texture` into a readback buffer.
    ///
    /// Must be called after all passes are recorded and before the
    /// encoder is submitted.
    pub(crate) fn record(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        texture: &wgpu::Texture,
    ) {
        let width = texture.width();
        let height = texture.height();

        // Buffer rows must honor wgpu's copy alignment.
        let unpadded = width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let bytes_per_row = unpadded.div_ceil(align) * align;

        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hexpulse capture readback buffer"),
            size: (bytes_per_row * height) as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        self.pending = Some(Pending {
            buffer,
            width,
            height,
            bytes_per_row,
            format: texture.format(),
        });
    }

    /// Maps the recorded copy and writes the image file.
    ///
    /// Must be called after the encoder was submitted. Best-effort: a
    /// failed readback or write logs a warning and drops the frame.
    pub(crate) fn finish(&mut self, device: &wgpu::Device) {
        let Some(pending) = self.pending.take() else { return };

        let path = self.dir.join(format!("{:05}.png", self.frame_index));
        match write_frame(device, &pending, &path) {
            Ok(()) => {
                log::debug!("captured frame {}", path.display());
                self.frame_index += 1;
            }
            Err(e) => log::warn!("frame capture failed: {e:#}"),
        }
    }
}

fn write_frame(device: &wgpu::Device, pending: &Pending, path: &Path) -> Result<()> {
    let slice = pending.buffer.slice(..);

    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });

    device
        .poll(wgpu::PollType::wait_indefinitely())
        .context("device poll failed during capture readback")?;
    rx.recv()
        .context("capture map callback dropped")?
        .context("failed to map capture readback buffer")?;

    let data = slice.get_mapped_range();

    // Strip row padding and normalize channel order to RGBA.
    let swap_bgra = matches!(
        pending.format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    );

    let unpadded = (pending.width * 4) as usize;
    let mut rgba = Vec::with_capacity(unpadded * pending.height as usize);
    for row in data.chunks_exact(pending.bytes_per_row as usize) {
        for px in row[..unpadded].chunks_exact(4) {
            if swap_bgra {
                rgba.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
            } else {
                rgba.extend_from_slice(&[px[0], px[1], px[2], px[3]]);
            }
        }
    }

    drop(data);
    pending.buffer.unmap();

    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    PngEncoder::new(writer)
        .write_image(&rgba, pending.width, pending.height, ExtendedColorType::Rgba8)
        .with_context(|| format!("failed to encode {}", path.display()))?;

    Ok(())
}
