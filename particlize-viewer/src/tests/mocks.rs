//! Deterministic collaborator stand-ins

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use particlize_core::{Error, ParticleGeometry, Result};

use crate::camera::Camera;
use crate::collaborators::{
    FrameScheduler, FrameToken, LoadOutcome, LoadRequest, ModelLoader, SceneRenderer, SnapshotSink,
};
use crate::scene::Scene;

/// Scheduler that tracks the set of live tokens
#[derive(Debug, Default)]
pub struct CountingScheduler {
    next: u64,
    outstanding: BTreeSet<u64>,
}

impl CountingScheduler {
    /// Number of tokens that were requested and neither fired nor
    /// cancelled
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Deliver the oldest outstanding callback, consuming its token
    pub fn fire(&mut self) -> Option<FrameToken> {
        let oldest = *self.outstanding.iter().next()?;
        self.outstanding.remove(&oldest);
        Some(FrameToken(oldest))
    }
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) -> FrameToken {
        self.next += 1;
        self.outstanding.insert(self.next);
        FrameToken(self.next)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.outstanding.remove(&token.0);
    }
}

/// Loader that parks requests until the test completes them by hand
#[derive(Clone, Default)]
pub struct ManualLoader {
    requests: Rc<RefCell<Vec<(LoadRequest, Sender<LoadOutcome>)>>>,
}

impl ManualLoader {
    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Deliver the outcome for the n-th request, tagged with that
    /// request's generation
    pub fn complete(&self, index: usize, result: Result<Vec<ParticleGeometry>>) {
        let (request, done) = {
            let requests = self.requests.borrow();
            let (request, done) = &requests[index];
            (request.clone(), done.clone())
        };
        let _ = done.send(LoadOutcome {
            generation: request.generation,
            format: request.format,
            result,
        });
    }
}

impl ModelLoader for ManualLoader {
    fn begin_load(&mut self, request: LoadRequest, done: Sender<LoadOutcome>) {
        self.requests.borrow_mut().push((request, done));
    }
}

/// Observable renderer state shared with the test body
#[derive(Debug)]
pub struct RendererProbe {
    pub pixel_ratio: f32,
    pub size: (u32, u32),
    pub renders: usize,
    pub captures: usize,
    pub fail_capture: bool,
}

impl Default for RendererProbe {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            size: (800, 600),
            renders: 0,
            captures: 0,
            fail_capture: false,
        }
    }
}

/// Renderer that records calls instead of touching a GPU
#[derive(Clone, Default)]
pub struct NullRenderer {
    pub probe: Rc<RefCell<RendererProbe>>,
}

impl SceneRenderer for NullRenderer {
    fn render(&mut self, _scene: &Scene, _camera: &Camera) -> Result<()> {
        self.probe.borrow_mut().renders += 1;
        Ok(())
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.probe.borrow_mut().size = (width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.probe.borrow_mut().pixel_ratio = ratio;
    }

    fn pixel_ratio(&self) -> f32 {
        self.probe.borrow().pixel_ratio
    }

    fn capture_frame(&mut self, _scene: &Scene, _camera: &Camera) -> Result<image::RgbaImage> {
        let mut probe = self.probe.borrow_mut();
        probe.captures += 1;
        if probe.fail_capture {
            Err(Error::Render("capture failure injected".to_string()))
        } else {
            Ok(image::RgbaImage::new(2, 2))
        }
    }
}

/// Sink that records saves and optionally fails them
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub saves: Arc<Mutex<Vec<(String, usize)>>>,
    pub fail: bool,
}

impl SnapshotSink for RecordingSink {
    fn save(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.saves
            .lock()
            .unwrap()
            .push((name.to_string(), bytes.len()));
        if self.fail {
            Err(Error::Render("sink failure injected".to_string()))
        } else {
            Ok(())
        }
    }
}
