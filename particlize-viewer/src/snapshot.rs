//! High-resolution snapshot export
//!
//! An export pauses the render loop, overrides the renderer's pixel
//! density with the user-selected export scale, captures exactly one
//! frame, and hands the pixels to a worker thread for PNG encoding and
//! persistence. Pixel density, overlay visibility and the render loop are
//! restored when the asynchronous step completes — unconditionally, even
//! when encoding or saving fails.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;

use particlize_core::{Error, Result};

use crate::camera::Camera;
use crate::collaborators::{FrameScheduler, SceneRenderer, SnapshotSink};
use crate::render_loop::RenderLoop;
use crate::scene::Scene;

/// Fixed output naming convention
pub const SNAPSHOT_FILE_NAME: &str = "particle-poster.png";

#[derive(Debug)]
struct PendingExport {
    prior_pixel_ratio: f32,
    axes_were_visible: bool,
    done: Receiver<Result<()>>,
}

/// Coordinates the pause/override/capture/restore sequence
#[derive(Debug, Default)]
pub struct SnapshotExporter {
    pending: Option<PendingExport>,
}

impl SnapshotExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an encode/save step is still outstanding
    pub fn in_progress(&self) -> bool {
        self.pending.is_some()
    }

    /// Start an export. The render loop is stopped and the debug overlay
    /// hidden before the capture; scene mutations arriving afterwards are
    /// simply not part of the exported frame.
    pub fn begin(
        &mut self,
        scene: &mut Scene,
        camera: &Camera,
        renderer: &mut dyn SceneRenderer,
        render_loop: &mut RenderLoop,
        scheduler: &mut dyn FrameScheduler,
        export_scale: u32,
        sink: Arc<dyn SnapshotSink>,
    ) {
        if self.pending.is_some() {
            log::warn!("snapshot export already in progress");
            return;
        }

        render_loop.stop(scheduler);

        let axes_were_visible = scene.axes_visible;
        scene.axes_visible = false;

        let prior_pixel_ratio = renderer.pixel_ratio();
        renderer.set_pixel_ratio(export_scale as f32);

        match renderer.capture_frame(scene, camera) {
            Ok(image) => {
                let (tx, rx) = std::sync::mpsc::channel();
                std::thread::spawn(move || {
                    let result =
                        encode_png(&image).and_then(|bytes| sink.save(SNAPSHOT_FILE_NAME, &bytes));
                    let _ = tx.send(result);
                });
                self.pending = Some(PendingExport {
                    prior_pixel_ratio,
                    axes_were_visible,
                    done: rx,
                });
            }
            Err(e) => {
                log::warn!("snapshot capture failed: {e}");
                renderer.set_pixel_ratio(prior_pixel_ratio);
                scene.axes_visible = axes_were_visible;
                render_loop.start(scheduler);
            }
        }
    }

    /// Check for completion of the asynchronous encode/save step and
    /// restore pre-export state once it finishes. Restoration is not
    /// conditional on export success.
    pub fn poll(
        &mut self,
        scene: &mut Scene,
        renderer: Option<&mut dyn SceneRenderer>,
        render_loop: &mut RenderLoop,
        scheduler: &mut dyn FrameScheduler,
    ) -> Option<Result<()>> {
        let pending = self.pending.take()?;

        let result = match pending.done.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => {
                self.pending = Some(pending);
                return None;
            }
            Err(TryRecvError::Disconnected) => {
                Err(Error::Render("snapshot encoder thread vanished".to_string()))
            }
        };

        if let Some(renderer) = renderer {
            renderer.set_pixel_ratio(pending.prior_pixel_ratio);
        }
        scene.axes_visible = pending.axes_were_visible;
        render_loop.start(scheduler);

        if let Err(e) = &result {
            log::warn!("snapshot export failed: {e}");
        }
        Some(result)
    }
}

/// Encode RGBA pixels as PNG
fn encode_png(image: &image::RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .map_err(|e| Error::Render(format!("PNG encode: {e}")))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_png_produces_a_png_signature() {
        let image = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        let bytes = encode_png(&image).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }
}
