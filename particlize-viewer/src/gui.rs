//! egui control panel
//!
//! Binds the live settings to edit widgets; every change funnels through
//! the session's validating setters, so out-of-range input from the GUI
//! is rejected the same way as from any other caller.

use egui::{ComboBox, Context, Slider};
use particlize_core::{EXPORT_SCALE_RANGE, FOG_DENSITY_RANGE, PARTICLE_SIZE_RANGE};

use crate::collaborators::FrameScheduler;
use crate::session::SceneSession;

/// Draw the control panel for one GUI frame
pub fn control_panel(
    ctx: &Context,
    session: &mut SceneSession,
    scheduler: &mut dyn FrameScheduler,
) {
    egui::Window::new("particles")
        .default_width(260.0)
        .show(ctx, |ui| {
            let mut size = session.settings().particle_size;
            if ui
                .add(Slider::new(&mut size, PARTICLE_SIZE_RANGE).text("particle size"))
                .changed()
            {
                if let Err(e) = session.set_particle_size(size) {
                    log::warn!("{e}");
                }
            }

            let labels: Vec<String> = session.sprites().labels().map(str::to_string).collect();
            let mut selected = session.settings().sprite_label.clone();
            ComboBox::from_label("sprite")
                .selected_text(selected.clone())
                .show_ui(ui, |ui| {
                    for label in &labels {
                        if ui
                            .selectable_value(&mut selected, label.clone(), label)
                            .clicked()
                        {
                            if let Err(e) = session.set_sprite(label) {
                                log::warn!("{e}");
                            }
                        }
                    }
                });

            let mut fog_enabled = session.settings().fog_enabled;
            let mut fog_density = session.settings().fog_density;
            let fog_toggled = ui.checkbox(&mut fog_enabled, "fog").changed();
            let density_changed = ui
                .add(Slider::new(&mut fog_density, FOG_DENSITY_RANGE).text("fog density"))
                .changed();
            if fog_toggled || density_changed {
                if let Err(e) = session.set_fog(fog_enabled, fog_density) {
                    log::warn!("{e}");
                }
            }

            let mut axes = session.scene().axes_visible;
            if ui.checkbox(&mut axes, "axes").changed() {
                session.set_axes_visible(axes);
            }

            ui.separator();

            ui.label("geometry scale");
            ui.horizontal(|ui| {
                for scale in [0.1_f32, 0.5, 2.0, 10.0] {
                    if ui.button(format!("×{scale}")).clicked() {
                        session.apply_geometry_transform(scale, scale, scale);
                    }
                }
            });
            ui.horizontal(|ui| {
                if ui.button("flip X").clicked() {
                    session.flip_x();
                }
                if ui.button("flip Y").clicked() {
                    session.flip_y();
                }
            });

            ui.separator();

            let mut export_scale = session.settings().export_scale;
            if ui
                .add(Slider::new(&mut export_scale, EXPORT_SCALE_RANGE).text("export scale"))
                .changed()
            {
                if let Err(e) = session.set_export_scale(export_scale) {
                    log::warn!("{e}");
                }
            }
            ui.add_enabled_ui(!session.export_in_progress(), |ui| {
                if ui.button("export snapshot").clicked() {
                    session.export_snapshot(scheduler);
                }
            });

            if ui.button("open model…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("3D models", &["ply", "obj", "gltf", "glb", "fbx"])
                    .pick_file()
                {
                    // Errors surface through the status line
                    let _ = session.load_model(path, None);
                }
            }

            if let Some(status) = session.status().map(str::to_string) {
                ui.separator();
                ui.label(status);
            }
        });
}
