use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::SeriesColors;
use crate::data::loader::SUPPORTED_EXTENSIONS;
use crate::data::model::{AnalysisResult, join_values};
use crate::state::{AppState, RequestState};
use crate::ui::plot;

const CARD_TITLES: [&str; 4] = ["Years analysed", "Phases", "Frequencies", "Amplitudes"];

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let file_label = state
            .selected_file
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "No file selected".to_string());
        ui.label(file_label);

        ui.separator();

        let loading = state.request.is_loading();
        let caption = if loading { "Analyzing…" } else { "Analyze" };
        if ui.add_enabled(!loading, egui::Button::new(caption)).clicked() {
            // Failures land in `state.request` and show in the banner.
            let _ = state.submit();
        }

        if loading {
            ui.spinner();
        }
    });
}

// ---------------------------------------------------------------------------
// Error banner
// ---------------------------------------------------------------------------

/// Red banner shown while the last submission failed.
pub fn error_banner(ui: &mut Ui, state: &AppState) {
    let Some(msg) = state.request.error() else {
        return;
    };
    egui::Frame::group(ui.style())
        .fill(Color32::from_rgb(80, 20, 20))
        .show(ui, |ui: &mut Ui| {
            ui.label(
                RichText::new("Something went wrong, contact support")
                    .strong()
                    .color(Color32::WHITE),
            );
            ui.label(RichText::new(msg).color(Color32::from_rgb(255, 160, 160)));
        });
    ui.add_space(8.0);
}

// ---------------------------------------------------------------------------
// Central panel – results
// ---------------------------------------------------------------------------

/// Render whatever the current request state calls for.
pub fn results_panel(ui: &mut Ui, state: &AppState, colors: &SeriesColors) {
    match &state.request {
        RequestState::Loading => loading_placeholder(ui),
        RequestState::Succeeded(result) => {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    plot::harmonics_plot(ui, result, colors, 420.0);
                    ui.add_space(8.0);
                    harmonics_table(ui, result);
                    ui.add_space(8.0);
                    data_card(ui, CARD_TITLES[0], &join_values(&state.years));
                    data_card(ui, CARD_TITLES[1], &join_values(&result.phases));
                    data_card(ui, CARD_TITLES[2], &join_values(&result.frequencies));
                    data_card(ui, CARD_TITLES[3], &join_values(&result.amplitudes));
                });
        }
        RequestState::Idle | RequestState::Failed(_) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file and press Analyze  (File → Open…)");
            });
        }
    }
}

fn loading_placeholder(ui: &mut Ui) {
    for title in CARD_TITLES {
        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.heading(title);
            ui.add_space(4.0);
            ui.horizontal(|ui: &mut Ui| {
                ui.spinner();
                ui.weak("Waiting for the analysis service…");
            });
        });
        ui.add_space(6.0);
    }
}

/// A titled, copyable block of comma-separated values.
fn data_card(ui: &mut Ui, title: &str, text: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui: &mut Ui| {
            ui.heading(title);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
                if ui.button("Copy").clicked() {
                    ui.ctx().copy_text(text.to_string());
                    log::debug!("Copied {title} to clipboard");
                }
            });
        });
        ScrollArea::vertical()
            .id_salt(title)
            .max_height(160.0)
            .show(ui, |ui: &mut Ui| {
                ui.label(RichText::new(text).monospace());
            });
    });
    ui.add_space(6.0);
}

/// Index / month / frequency / amplitude / phase, one row per component.
fn harmonics_table(ui: &mut Ui, result: &AnalysisResult) {
    let rows = result.rows();
    let text_height = egui::TextStyle::Body.resolve(ui.style()).size + 4.0;
    let fmt = |v: Option<f64>| v.map(|v| format!("{v:.6}")).unwrap_or_default();

    egui::CollapsingHeader::new(RichText::new(format!("Components ({})", rows.len())).strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .max_scroll_height(240.0)
                .column(Column::auto())
                .column(Column::auto())
                .column(Column::remainder())
                .column(Column::remainder())
                .column(Column::remainder())
                .header(text_height, |mut header| {
                    for name in ["#", "Month", "Frequency", "Amplitude", "Phase"] {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(text_height, rows.len(), |mut row| {
                        let r = &rows[row.index()];
                        row.col(|ui: &mut Ui| {
                            ui.label(r.index.to_string());
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(r.month);
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(fmt(Some(r.frequency)));
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(fmt(r.amplitude));
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(fmt(r.phase));
                        });
                    });
                });
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open monthly precipitation table")
        .add_filter("Supported files", SUPPORTED_EXTENSIONS)
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .pick_file();

    if let Some(path) = file {
        state.select_file(&path);
    }
}
