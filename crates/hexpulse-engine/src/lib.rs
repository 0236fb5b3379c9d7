//! Hexpulse engine crate.
//!
//! This crate owns the platform + GPU runtime pieces plus the animated
//! tile scene consumed by the demo binary.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod scene;
