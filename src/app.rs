use std::sync::Arc;
use std::time::Duration;

use eframe::egui;

use crate::color::SeriesColors;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PrecipHarmonicsApp {
    pub state: AppState,
    colors: SeriesColors,
}

impl PrecipHarmonicsApp {
    /// Wire the state to the window so responses trigger a repaint.
    pub fn new(cc: &eframe::CreationContext<'_>, mut state: AppState) -> Self {
        let ctx = cc.egui_ctx.clone();
        state.set_notifier(Arc::new(move || ctx.request_repaint()));
        Self {
            state,
            colors: SeriesColors::default(),
        }
    }
}

impl eframe::App for PrecipHarmonicsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll();
        if self.state.has_pending() {
            // Keep the spinner moving even if a wake-up is missed.
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: error banner + results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Periodic regression of monthly precipitation");
            ui.add_space(6.0);
            panels::error_banner(ui, &self.state);
            panels::results_panel(ui, &self.state, &self.colors);
        });
    }
}
