//! Collaborator seams for the scene session
//!
//! The GPU renderer, the frame scheduler, the asynchronous model loader
//! and the snapshot persistence step are external collaborators of the
//! lifecycle core. Each is a small trait so the session can be driven by
//! deterministic stand-ins in tests; the production implementations live
//! here ([`FileModelLoader`], [`FileSnapshotSink`]) and in [`crate::gpu`]
//! and [`crate::app`].

use std::path::PathBuf;
use std::sync::mpsc::Sender;

use particlize_core::{ParticleGeometry, Result};
use particlize_io::SourceFormat;

use crate::camera::Camera;
use crate::scene::Scene;

/// Opaque scheduling token for the continuous render loop.
///
/// At most one token is outstanding per session; starting a new loop
/// cancels the previous token first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Host-provided per-frame callback scheduling
pub trait FrameScheduler {
    /// Request one future frame callback
    fn request_frame(&mut self) -> FrameToken;

    /// Cancel a previously requested callback; cancelling a token that
    /// already fired is harmless
    fn cancel_frame(&mut self, token: FrameToken);
}

/// The GPU renderer seam: consumes a scene graph and camera, produces
/// pixels into a drawable surface
pub trait SceneRenderer {
    /// Render one frame of the scene to the display surface
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()>;

    /// Resize the render surface (physical pixels)
    fn set_size(&mut self, width: u32, height: u32);

    /// Override the pixel density used for frame capture
    fn set_pixel_ratio(&mut self, ratio: f32);

    /// The currently configured pixel density
    fn pixel_ratio(&self) -> f32;

    /// Render exactly one frame at the current pixel density and read it
    /// back as RGBA pixels
    fn capture_frame(&mut self, scene: &Scene, camera: &Camera) -> Result<image::RgbaImage>;
}

/// One asynchronous load request, tagged with its session generation
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub path: PathBuf,
    pub format: SourceFormat,
    pub generation: u64,
}

/// Completion message delivered back to the session.
///
/// The session compares `generation` against its current load generation
/// and silently discards stale outcomes.
#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: u64,
    pub format: SourceFormat,
    pub result: Result<Vec<ParticleGeometry>>,
}

/// Asynchronous model loading seam
pub trait ModelLoader {
    /// Begin a load; the outcome is delivered on `done` at some later
    /// point. Loads are never forcibly cancelled — a superseded outcome
    /// is discarded by the generation check on arrival.
    fn begin_load(&mut self, request: LoadRequest, done: Sender<LoadOutcome>);
}

/// Persistence seam for encoded snapshot images
pub trait SnapshotSink: Send + Sync {
    /// Persist encoded image bytes under the given file name
    fn save(&self, name: &str, bytes: &[u8]) -> Result<()>;
}

/// Production loader: reads and parses the file on a worker thread
#[derive(Debug, Default)]
pub struct FileModelLoader;

impl ModelLoader for FileModelLoader {
    fn begin_load(&mut self, request: LoadRequest, done: Sender<LoadOutcome>) {
        std::thread::spawn(move || {
            let result = std::fs::read(&request.path)
                .map_err(particlize_core::Error::from)
                .and_then(|bytes| particlize_io::parse_model(&bytes, request.format));
            // The session may already have been dropped; nothing to do then
            let _ = done.send(LoadOutcome {
                generation: request.generation,
                format: request.format,
                result,
            });
        });
    }
}

/// Production sink: writes the image next to the working directory
#[derive(Debug, Clone)]
pub struct FileSnapshotSink {
    pub directory: PathBuf,
}

impl Default for FileSnapshotSink {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl SnapshotSink for FileSnapshotSink {
    fn save(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.directory.join(name);
        std::fs::write(&path, bytes)?;
        log::info!("saved snapshot to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_writes_bytes() {
        let dir = std::env::temp_dir();
        let sink = FileSnapshotSink {
            directory: dir.clone(),
        };
        sink.save("particlize_sink_test.png", b"png-bytes").unwrap();

        let path = dir.join("particlize_sink_test.png");
        assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn file_loader_delivers_parse_failure() {
        let dir = std::env::temp_dir();
        let path = dir.join("particlize_loader_test.ply");
        std::fs::write(&path, b"not a ply").unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        FileModelLoader.begin_load(
            LoadRequest {
                path: path.clone(),
                format: SourceFormat::PointCloud,
                generation: 7,
            },
            tx,
        );

        let outcome = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("loader thread should answer");
        assert_eq!(outcome.generation, 7);
        assert!(outcome.result.is_err());
        let _ = std::fs::remove_file(path);
    }
}
