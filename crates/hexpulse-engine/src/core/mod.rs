//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the runtime
//! (platform loop) and the application: a per-frame context plus the
//! control directives the app returns.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
