//! Scene session: the model lifecycle state machine
//!
//! The session owns the scene graph, camera, settings and render loop,
//! and coordinates format-dispatched loads, live settings changes and
//! snapshot export. Loads are asynchronous; every request is tagged with
//! a monotonically increasing generation number and a completion only
//! mutates the scene while its generation is still the session's current
//! one, so a slow first load can never overwrite a fast second one.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use particlize_core::{
    Error, FogExp2, Result, Settings, SpriteLibrary, EXPORT_SCALE_RANGE,
};
use particlize_io::SourceFormat;

use crate::camera::{Camera, OrbitController};
use crate::collaborators::{
    FrameScheduler, LoadOutcome, LoadRequest, ModelLoader, SceneRenderer, SnapshotSink,
};
use crate::render_loop::RenderLoop;
use crate::scene::{build_particle_field, Scene};
use crate::snapshot::{SnapshotExporter, SNAPSHOT_FILE_NAME};

/// Lifecycle state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No model loaded yet
    Empty,
    /// A load was dispatched and its completion is pending
    Loading,
    /// Particles attached; settings changes hit the live material
    Ready,
}

/// Owns the current scene, camera, settings and render loop
pub struct SceneSession {
    settings: Settings,
    sprites: SpriteLibrary,
    scene: Scene,
    camera: Camera,
    controls: OrbitController,
    renderer: Option<Box<dyn SceneRenderer>>,
    loader: Box<dyn ModelLoader>,
    sink: Arc<dyn SnapshotSink>,
    render_loop: RenderLoop,
    exporter: SnapshotExporter,
    state: SessionState,
    /// Generation of the most recent load request
    generation: u64,
    load_tx: Sender<LoadOutcome>,
    load_rx: Receiver<LoadOutcome>,
    /// Last user-visible notification
    status: Option<String>,
}

impl SceneSession {
    /// Create a session with default settings and the built-in sprites
    pub fn new(loader: Box<dyn ModelLoader>, sink: Arc<dyn SnapshotSink>) -> Self {
        let camera = Camera::default();
        let controls = OrbitController::new(&camera);
        let (load_tx, load_rx) = std::sync::mpsc::channel();
        Self {
            settings: Settings::default(),
            sprites: SpriteLibrary::builtin(),
            scene: Scene::new(),
            camera,
            controls,
            renderer: None,
            loader,
            sink,
            render_loop: RenderLoop::new(),
            exporter: SnapshotExporter::new(),
            state: SessionState::Empty,
            generation: 0,
            load_tx,
            load_rx,
            status: None,
        }
    }

    /// Install the renderer once the surface exists
    pub fn attach_renderer(&mut self, renderer: Box<dyn SceneRenderer>) {
        self.renderer = Some(renderer);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sprites(&self) -> &SpriteLibrary {
        &self.sprites
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_rendering(&self) -> bool {
        self.render_loop.is_running()
    }

    pub fn export_in_progress(&self) -> bool {
        self.exporter.in_progress()
    }

    // ----- model loading -------------------------------------------------

    /// Dispatch a model load by explicit format, or by extension sniff
    /// when `format` is `None`.
    ///
    /// Dispatch failure (unrecognized format) leaves all scene state
    /// untouched. Eviction of the previous model is deferred until the
    /// parse succeeds, so a failed load never shows an empty scene.
    pub fn load_model<P: Into<PathBuf>>(
        &mut self,
        path: P,
        format: Option<SourceFormat>,
    ) -> Result<()> {
        let path = path.into();
        let format = match format {
            Some(format) => format,
            None => match SourceFormat::from_path(&path) {
                Ok(format) => format,
                Err(e) => {
                    self.status = Some(e.to_string());
                    return Err(e);
                }
            },
        };

        self.generation += 1;
        self.state = SessionState::Loading;
        self.status = Some(format!("loading {} ({format})", path.display()));
        log::info!("load #{}: {} as {format}", self.generation, path.display());

        self.loader.begin_load(
            LoadRequest {
                path,
                format,
                generation: self.generation,
            },
            self.load_tx.clone(),
        );
        Ok(())
    }

    /// Handle a file dropped onto the window. An unrecognized extension
    /// surfaces a rejection message and leaves the current model intact.
    pub fn load_dropped_file<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        match SourceFormat::from_path(&path) {
            Ok(format) => {
                // Errors already set the status line
                let _ = self.load_model(path, Some(format));
            }
            Err(e) => {
                log::warn!("rejected dropped file: {e}");
                self.status = Some(format!(
                    "only .ply, .obj, .gltf/.glb and .fbx files are supported ({})",
                    path.display()
                ));
            }
        }
    }

    /// Drain pending load completions and the export pipeline. Called
    /// once per host loop tick.
    pub fn poll(&mut self, scheduler: &mut dyn FrameScheduler) {
        while let Ok(outcome) = self.load_rx.try_recv() {
            self.finish_load(outcome);
        }

        if let Some(result) = self.exporter.poll(
            &mut self.scene,
            self.renderer.as_deref_mut().map(|r| r as &mut dyn SceneRenderer),
            &mut self.render_loop,
            scheduler,
        ) {
            self.status = Some(match result {
                Ok(()) => format!("saved {SNAPSHOT_FILE_NAME}"),
                Err(e) => format!("snapshot export failed: {e}"),
            });
        }
    }

    fn finish_load(&mut self, outcome: LoadOutcome) {
        if outcome.generation != self.generation {
            log::debug!(
                "discarding stale load #{} (current #{})",
                outcome.generation,
                self.generation
            );
            return;
        }

        match outcome.result {
            Ok(geometries) => {
                let (nodes, material) =
                    build_particle_field(geometries, &self.settings, &self.sprites);
                self.scene.install_model(nodes, material);
                self.state = SessionState::Ready;
                self.status = Some(format!(
                    "loaded {} particles ({})",
                    self.scene.particle_count(),
                    outcome.format
                ));
            }
            Err(e) => {
                log::warn!("load #{} failed: {e}", outcome.generation);
                self.status = Some(format!("failed to load model: {e}"));
                // Previous model, if any, is still attached
                self.state = if self.scene.material.is_some() {
                    SessionState::Ready
                } else {
                    SessionState::Empty
                };
            }
        }
    }

    // ----- live settings -------------------------------------------------

    /// Select the sprite glyph; swaps the texture on the shared material
    /// without reloading geometry
    pub fn set_sprite(&mut self, label: &str) -> Result<()> {
        let preset = self
            .sprites
            .get(label)
            .ok_or_else(|| Error::UnknownSprite(label.to_string()))?
            .clone();

        self.settings.sprite_label = preset.label.clone();
        if let Some(material) = &mut self.scene.material {
            material.sprite = preset;
        }
        Ok(())
    }

    /// Set the particle size; visible next frame, no reload
    pub fn set_particle_size(&mut self, size: f32) -> Result<()> {
        if !size.is_finite() || size <= 0.0 {
            return Err(Error::InvalidSetting(format!(
                "particle size must be > 0, got {size}"
            )));
        }

        self.settings.particle_size = size;
        if let Some(material) = &mut self.scene.material {
            material.size = size;
        }
        Ok(())
    }

    /// Toggle exponential fog. Disabling when already disabled is a
    /// no-op; disabling clears the fog object.
    pub fn set_fog(&mut self, enabled: bool, density: f32) -> Result<()> {
        if !density.is_finite() || density < 0.0 {
            return Err(Error::InvalidSetting(format!(
                "fog density must be >= 0, got {density}"
            )));
        }

        self.settings.fog_enabled = enabled;
        self.settings.fog_density = density;

        if !enabled {
            if self.scene.fog.is_some() {
                self.scene.fog = None;
            }
            return Ok(());
        }
        self.scene.fog = Some(FogExp2::new(density));
        Ok(())
    }

    /// Set the export resolution multiplier
    pub fn set_export_scale(&mut self, scale: u32) -> Result<()> {
        if !EXPORT_SCALE_RANGE.contains(&scale) {
            return Err(Error::InvalidSetting(format!(
                "export scale must be in {EXPORT_SCALE_RANGE:?}, got {scale}"
            )));
        }
        self.settings.export_scale = scale;
        Ok(())
    }

    /// Toggle the world-axes overlay
    pub fn set_axes_visible(&mut self, visible: bool) {
        self.scene.axes_visible = visible;
    }

    // ----- geometry transforms -------------------------------------------

    /// Apply a multiplicative scale to every tracked geometry in place,
    /// independent of the material/render state. With no geometries
    /// tracked this is a logged no-op.
    pub fn apply_geometry_transform(&mut self, sx: f32, sy: f32, sz: f32) {
        if self.scene.nodes.is_empty() {
            log::debug!("geometry transform ignored: no geometries tracked");
            return;
        }
        for node in &mut self.scene.nodes {
            node.geometry.scale(sx, sy, sz);
        }
    }

    /// Mirror all geometry along the X axis
    pub fn flip_x(&mut self) {
        self.apply_geometry_transform(-1.0, 1.0, 1.0);
    }

    /// Mirror all geometry along the Y axis
    pub fn flip_y(&mut self) {
        self.apply_geometry_transform(1.0, -1.0, 1.0);
    }

    // ----- render loop ----------------------------------------------------

    /// Start (or restart) the continuous render loop
    pub fn animate(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.render_loop.start(scheduler);
    }

    /// Stop the continuous render loop
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.render_loop.stop(scheduler);
    }

    /// One render loop iteration, driven by the host's frame callback.
    /// Requests the next frame, renders, then advances the camera
    /// controller — camera motion lands on the next frame. Callbacks
    /// arriving while the loop is stopped are discarded.
    pub fn on_frame(&mut self, scheduler: &mut dyn FrameScheduler) {
        if !self.render_loop.is_running() {
            return;
        }
        self.render_loop.advance(scheduler);

        if let Some(renderer) = self.renderer.as_mut() {
            if let Err(e) = renderer.render(&self.scene, &self.camera) {
                log::warn!("render failed: {e}");
            }
        }
        self.controls.update(&mut self.camera);
    }

    // ----- pointer input --------------------------------------------------

    /// Feed a pointer drag into the orbit controller
    pub fn pointer_drag(&mut self, dx: f32, dy: f32) {
        self.controls.pointer_drag(dx, dy);
    }

    /// Feed a scroll step into the orbit controller
    pub fn scroll(&mut self, delta: f32) {
        self.controls.scroll(delta);
    }

    // ----- resize & export ------------------------------------------------

    /// Window resize: recompute the camera aspect ratio and resize the
    /// render surface. Geometry and settings are untouched.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.aspect_ratio = width as f32 / height as f32;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_size(width, height);
        }
    }

    /// Export the current view as a high-resolution still. Fails
    /// silently (logged) when no renderer is attached.
    pub fn export_snapshot(&mut self, scheduler: &mut dyn FrameScheduler) {
        let Some(renderer) = self.renderer.as_deref_mut() else {
            log::warn!("snapshot export skipped: renderer not constructed yet");
            return;
        };
        self.exporter.begin(
            &mut self.scene,
            &self.camera,
            renderer,
            &mut self.render_loop,
            scheduler,
            self.settings.export_scale,
            Arc::clone(&self.sink),
        );
    }
}
