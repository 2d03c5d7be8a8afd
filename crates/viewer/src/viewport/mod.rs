//! 3D viewport panel with OpenGL rendering

mod camera;
mod gl_renderer;
pub use frustum_viewer_lib::viewport::mesh;
mod renderer;

use std::sync::{Arc, Mutex};

use egui::{PointerButton, Ui};

use crate::build::AssembledSolid;
use crate::state::{ViewPose, ViewerState};
use crate::textures::DecodedTexture;
use camera::{aspect_of, ViewCamera};
use gl_renderer::GlRenderer;

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    camera: ViewCamera,
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
}

impl ViewportPanel {
    pub fn new(state: &ViewerState) -> Self {
        Self {
            camera: ViewCamera::new(&state.settings.camera),
            gl_renderer: None,
        }
    }

    /// Initialize GL renderer (must be called with a GL context).
    /// On failure the software wireframe stays in use.
    pub fn init_gl(&mut self, gl: &glow::Context, solid: &AssembledSolid) {
        match GlRenderer::new(gl, solid) {
            Ok(renderer) => self.gl_renderer = Some(Arc::new(Mutex::new(renderer))),
            Err(e) => tracing::error!("GL renderer unavailable, using wireframe fallback: {e}"),
        }
    }

    pub fn has_gl(&self) -> bool {
        self.gl_renderer.is_some()
    }

    /// Hand decoded textures to the renderer; they are uploaded on the next paint
    pub fn queue_textures(&mut self, textures: Vec<DecodedTexture>) {
        if textures.is_empty() {
            return;
        }
        match &self.gl_renderer {
            Some(renderer) => {
                if let Ok(mut r) = renderer.lock() {
                    for texture in textures {
                        r.queue_texture(texture);
                    }
                }
            }
            None => tracing::debug!("Dropping {} textures: no GL renderer", textures.len()),
        }
    }

    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(mut r) = renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut ViewerState, pose: ViewPose) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());

        self.handle_pointer(&response, ui, state);

        self.camera.distance = pose.distance;

        if !ui.is_rect_visible(rect) {
            return;
        }

        self.render_gl(ui, rect, state);
    }

    /// Drag rotates, wheel zooms
    fn handle_pointer(&self, response: &egui::Response, ui: &Ui, state: &mut ViewerState) {
        let ctl = &mut state.controller;

        if response.drag_started_by(PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                ctl.on_pointer_down(pos.x, pos.y);
            }
        } else if response.dragged_by(PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                ctl.on_pointer_move(pos.x, pos.y);
            }
        }
        if response.drag_stopped() {
            ctl.on_pointer_up();
        }

        // egui reports wheel-away as positive; the controller expects the
        // opposite (positive = toward the viewer = zoom out)
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                ctl.on_wheel(-scroll);
            }
        }
    }

    fn render_gl(&self, ui: &mut Ui, rect: egui::Rect, state: &ViewerState) {
        if let Some(gl_renderer) = &self.gl_renderer {
            let renderer_clone = gl_renderer.clone();
            let view_projection = self.camera.view_projection(aspect_of(rect));
            let camera_position = self.camera.eye_position();
            let model = state.model_matrix();
            let bg_color = state.settings.viewport.background_color;
            let base_color = state.settings.viewport.base_color;

            let callback = egui::PaintCallback {
                rect,
                callback: Arc::new(eframe::egui_glow::CallbackFn::new(move |info, painter| {
                    let gl = painter.gl();

                    let clip = info.clip_rect_in_pixels();
                    let viewport = [
                        clip.left_px as f32,
                        clip.from_bottom_px as f32,
                        clip.width_px as f32,
                        clip.height_px as f32,
                    ];

                    if let Ok(mut r) = renderer_clone.lock() {
                        r.flush_textures(gl);
                        let params = gl_renderer::RenderParams {
                            viewport,
                            view_projection,
                            model,
                            camera_position,
                            bg_color,
                            base_color,
                        };
                        r.paint(gl, &params);
                    }
                })),
            };

            ui.painter().add(callback);
        } else {
            // Fallback: software wireframe rendering
            renderer::paint_viewport(ui, rect, &self.camera, state);
        }
    }
}
