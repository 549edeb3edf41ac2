use eframe::egui::{Color32, Ui};
use egui_plot::{GridMark, Legend, Line, Plot, PlotPoints};

use crate::color::SeriesColors;
use crate::data::model::{AnalysisResult, HarmonicRow, month_label};

/// A named, coloured line ready to hand to a plot.
type Series = (&'static str, Color32, Vec<[f64; 2]>);

// ---------------------------------------------------------------------------
// Harmonics plots (central panel)
// ---------------------------------------------------------------------------

/// Frequency and amplitude on one chart, phase (radians) on its own below,
/// both against component index labelled by month.
pub fn harmonics_plot(ui: &mut Ui, result: &AnalysisResult, colors: &SeriesColors, height: f32) {
    let rows = result.rows();

    line_plot(ui, "spectrum_plot", "Value", spectrum_series(&rows, colors), height * 0.6);
    line_plot(ui, "phase_plot", "Phase (rad)", phase_series(&rows, colors), height * 0.4);
}

fn line_plot(ui: &mut Ui, id: &str, y_label: &str, series: Vec<Series>, height: f32) {
    Plot::new(id)
        .legend(Legend::default())
        .height(height)
        .x_axis_label("Month")
        .y_axis_label(y_label)
        .x_axis_formatter(|mark: GridMark, _range| month_tick(mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, move |plot_ui| {
            for (name, color, points) in series {
                plot_ui.line(Line::new(PlotPoints::from(points)).name(name).color(color).width(2.0));
            }
        });
}

fn spectrum_series(rows: &[HarmonicRow], colors: &SeriesColors) -> Vec<Series> {
    vec![
        ("Frequency", colors.frequency, series_points(rows, |r| Some(r.frequency))),
        ("Amplitude", colors.amplitude, series_points(rows, |r| r.amplitude)),
    ]
}

fn phase_series(rows: &[HarmonicRow], colors: &SeriesColors) -> Vec<Series> {
    vec![("Phase", colors.phase, series_points(rows, |r| r.phase))]
}

/// Points of one series; indices without a value are left out.
fn series_points(
    rows: &[HarmonicRow],
    value: impl Fn(&HarmonicRow) -> Option<f64>,
) -> Vec<[f64; 2]> {
    rows.iter()
        .filter_map(|r| value(r).map(|v| [r.index as f64, v]))
        .collect()
}

/// Axis label for a grid mark: month names on whole, non-negative indices.
fn month_tick(value: f64) -> String {
    if value < 0.0 || value.fract() != 0.0 {
        return String::new();
    }
    month_label(value as usize).to_string()
}
