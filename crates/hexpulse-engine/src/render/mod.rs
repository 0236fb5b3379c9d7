//! GPU rendering subsystem.
//!
//! Renderers consume `scene` instance batches and issue GPU commands
//! via wgpu. Each renderer is responsible for its own GPU resources
//! (pipelines, buffers).
//!
//! Convention:
//! - scene geometry is in world units, +Z up, elevation applied in the
//!   vertex stage
//! - the shadow pass is recorded before the color pass on the same
//!   encoder, which orders the depth-target write before its read

mod capture;
mod color_pass;
mod ctx;
mod depth_buffer;
mod shadow_pass;
mod shadow_target;
mod tiles;

pub use capture::FrameCapture;
pub use color_pass::ColorPassRenderer;
pub use ctx::{RenderCtx, RenderTarget};
pub use shadow_pass::ShadowPassRenderer;
pub use shadow_target::ShadowTarget;
