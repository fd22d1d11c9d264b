//! Windowed application glue
//!
//! Wires the scene session to its production collaborators: a winit
//! window and event loop, the wgpu renderer, the threaded file loader,
//! the file snapshot sink, and the egui control panel composited over
//! each frame.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use particlize_core::{Error, Result};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};

use crate::collaborators::{
    FileModelLoader, FileSnapshotSink, FrameScheduler, FrameToken, SceneRenderer,
};
use crate::gpu::GpuRenderer;
use crate::gui;
use crate::session::SceneSession;

/// Frame scheduling backed by winit redraw requests.
///
/// Redraw requests cannot be recalled, so cancellation only invalidates
/// the token — the render loop forgets it and the stray redraw callback
/// is discarded on arrival.
pub struct WinitScheduler {
    window: Arc<Window>,
    next_token: u64,
}

impl WinitScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next_token: 0,
        }
    }
}

impl FrameScheduler for WinitScheduler {
    fn request_frame(&mut self) -> FrameToken {
        self.next_token += 1;
        self.window.request_redraw();
        FrameToken(self.next_token)
    }

    fn cancel_frame(&mut self, _token: FrameToken) {}
}

/// egui output of one frame, handed to the renderer's overlay pass
struct GuiFrame {
    primitives: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

/// Run the interactive viewer, optionally loading a model at startup
pub fn run(initial_model: Option<PathBuf>) -> Result<()> {
    let event_loop = EventLoop::new()
        .map_err(|e| Error::Render(format!("failed to create event loop: {e}")))?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("particlize")
            .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 800.0))
            .build(&event_loop)
            .map_err(|e| Error::Render(format!("failed to create window: {e}")))?,
    );

    let mut renderer = pollster::block_on(GpuRenderer::new(window.clone()))?;
    renderer.set_pixel_ratio(window.scale_factor() as f32);
    let device = renderer.device_handle();
    let surface_format = renderer.surface_format();

    let egui_ctx = egui::Context::default();
    let mut egui_state = egui_winit::State::new(
        egui_ctx.clone(),
        egui::ViewportId::ROOT,
        &window,
        Some(window.scale_factor() as f32),
        None,
    );
    let egui_renderer = Rc::new(RefCell::new(egui_wgpu::Renderer::new(
        &device,
        surface_format,
        None,
        1,
    )));
    let gui_frame: Rc<RefCell<Option<GuiFrame>>> = Rc::new(RefCell::new(None));

    {
        let egui_renderer = Rc::clone(&egui_renderer);
        let gui_frame = Rc::clone(&gui_frame);
        renderer.set_overlay(Box::new(move |device, queue, encoder, view, size| {
            let Some(frame) = gui_frame.borrow_mut().take() else {
                return;
            };
            let mut egui_renderer = egui_renderer.borrow_mut();
            let screen = egui_wgpu::ScreenDescriptor {
                size_in_pixels: size,
                pixels_per_point: frame.pixels_per_point,
            };
            for (id, delta) in &frame.textures_delta.set {
                egui_renderer.update_texture(device, queue, *id, delta);
            }
            let _ = egui_renderer.update_buffers(device, queue, encoder, &frame.primitives, &screen);
            {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("gui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                egui_renderer.render(&mut pass, &frame.primitives, &screen);
            }
            for id in &frame.textures_delta.free {
                egui_renderer.free_texture(id);
            }
        }));
    }

    let mut session = SceneSession::new(
        Box::new(FileModelLoader),
        Arc::new(FileSnapshotSink::default()),
    );
    session.attach_renderer(Box::new(renderer));

    let size = window.inner_size();
    session.resize(size.width, size.height);

    let mut scheduler = WinitScheduler::new(window.clone());
    session.animate(&mut scheduler);

    if let Some(path) = initial_model {
        let _ = session.load_model(path, None);
    }

    let mut left_button_down = false;
    let mut last_cursor: Option<PhysicalPosition<f64>> = None;

    event_loop
        .run(move |event, target| {
            target.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { event, .. } => {
                    let response = egui_state.on_window_event(&window, &event);

                    match event {
                        WindowEvent::CloseRequested => target.exit(),
                        WindowEvent::Resized(new_size) => {
                            session.resize(new_size.width, new_size.height);
                        }
                        WindowEvent::DroppedFile(path) => {
                            session.load_dropped_file(path);
                        }
                        WindowEvent::MouseInput {
                            state,
                            button: MouseButton::Left,
                            ..
                        } => {
                            left_button_down =
                                state == ElementState::Pressed && !response.consumed;
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            if left_button_down && !response.consumed {
                                if let Some(last) = last_cursor {
                                    session.pointer_drag(
                                        (position.x - last.x) as f32,
                                        (position.y - last.y) as f32,
                                    );
                                }
                            }
                            last_cursor = Some(position);
                        }
                        WindowEvent::MouseWheel { delta, .. } => {
                            if !response.consumed {
                                let step = match delta {
                                    MouseScrollDelta::LineDelta(_, y) => y * 0.1,
                                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 500.0,
                                };
                                session.scroll(step);
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            let raw_input = egui_state.take_egui_input(&window);
                            let output = egui_ctx.run(raw_input, |ctx| {
                                gui::control_panel(ctx, &mut session, &mut scheduler);
                            });
                            egui_state.handle_platform_output(&window, output.platform_output);
                            let primitives =
                                egui_ctx.tessellate(output.shapes, output.pixels_per_point);
                            *gui_frame.borrow_mut() = Some(GuiFrame {
                                primitives,
                                textures_delta: output.textures_delta,
                                pixels_per_point: output.pixels_per_point,
                            });

                            session.on_frame(&mut scheduler);
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    // Load completions and export restoration are drained
                    // here so they advance even while the loop is paused
                    session.poll(&mut scheduler);
                }
                _ => {}
            }
        })
        .map_err(|e| Error::Render(format!("event loop error: {e}")))?;

    Ok(())
}
