//! Core data structures for particlize
//!
//! This crate provides the data model shared by the particlize workspace:
//! particle geometry buffers, the shared particle material, fog, sprite
//! presets, live viewer settings, and the common error taxonomy.

pub mod error;
pub mod geometry;
pub mod material;
pub mod settings;
pub mod sprite;

pub use error::*;
pub use geometry::*;
pub use material::*;
pub use settings::*;
pub use sprite::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point3, Vector3};

/// Common result type for particlize operations
pub type Result<T> = std::result::Result<T, Error>;
