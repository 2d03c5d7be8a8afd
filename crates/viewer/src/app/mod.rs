//! Main application module

mod styles;

use eframe::egui;
use tokio::runtime::Handle;

use crate::gaze::GazeFeed;
use crate::state::ViewerState;
use crate::textures::TextureLoader;
use crate::ui::{scale_panel, status_bar};
use crate::viewport::ViewportPanel;

/// Main application: owns the session and drives it once per display frame
pub struct ViewerApp {
    state: ViewerState,
    viewport: ViewportPanel,
    textures: TextureLoader,
    gaze_feed: Option<GazeFeed>,
}

impl ViewerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        mut state: ViewerState,
        gaze_feed: Option<GazeFeed>,
        runtime: Handle,
    ) -> Self {
        styles::configure_styles(&cc.egui_ctx);

        let mut viewport = ViewportPanel::new(&state);
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl, &state.solid);
        }

        if let Some(feed) = &gaze_feed {
            state.attach_gaze(feed.receiver());
        }

        let textures = TextureLoader::spawn(&runtime, &state.settings.textures);

        Self {
            state,
            viewport,
            textures,
            gaze_feed,
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.viewport.queue_textures(self.textures.poll());

        let dt = ctx.input(|i| i.stable_dt);
        let pose = self.state.frame(dt);

        // ── Scale slider ──────────────────────────────────────
        egui::TopBottomPanel::top("scale_panel")
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                scale_panel::show(ui, &mut self.state);
            });

        // ── Status bar ───────────────────────────────────────
        let renderer = if self.viewport.has_gl() { "OpenGL" } else { "wireframe" };
        let feed = self.gaze_feed.as_ref().map(|f| f.source());
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state, pose, feed, renderer);
            });

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state, pose);
            });

        ctx.request_repaint();
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(feed) = &mut self.gaze_feed {
            feed.stop();
        }
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
        tracing::info!("Session ended after {} frames", self.state.frame_count());
    }
}
