//! Interactive particle-field viewer
//!
//! This crate owns the scene/model lifecycle: format-dispatched loading,
//! conversion into a particle field, the cancellable continuous render
//! loop, live settings changes, and high-resolution snapshot export.
//! Rendering, scheduling, model loading and snapshot persistence sit
//! behind collaborator traits so the lifecycle is testable without a GPU:
//! - [`collaborators::SceneRenderer`] — implemented by [`gpu::GpuRenderer`]
//! - [`collaborators::FrameScheduler`] — implemented by [`app::WinitScheduler`]
//! - [`collaborators::ModelLoader`] — implemented by [`collaborators::FileModelLoader`]
//! - [`collaborators::SnapshotSink`] — implemented by [`collaborators::FileSnapshotSink`]

pub mod app;
pub mod camera;
pub mod collaborators;
pub mod gpu;
pub mod gui;
pub mod render_loop;
pub mod scene;
pub mod session;
pub mod shaders;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use camera::{Camera, OrbitController};
pub use collaborators::{
    FileModelLoader, FileSnapshotSink, FrameScheduler, FrameToken, LoadOutcome, LoadRequest,
    ModelLoader, SceneRenderer, SnapshotSink,
};
pub use render_loop::RenderLoop;
pub use scene::{ParticleNode, Scene};
pub use session::{SceneSession, SessionState};
