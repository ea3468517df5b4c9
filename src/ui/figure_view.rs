// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Draws a [`Figure`] with `egui_plot`.
//!
//! Each panel becomes one `Plot` laid out on the figure's grid. Log-scaled
//! panels are drawn in log10 coordinates with tick labels mapped back to
//! powers of ten, since `egui_plot` only has linear axes.

use egui::{Color32, RichText, Vec2};
use egui_plot::{GridMark, Legend, Line, Plot, PlotPoint, PlotPoints};
use spectral_plot::{Axes, AxisScale, Figure, Spacing};

/// Height reserved above each plot for the panel title.
const TITLE_HEIGHT: f32 = 22.0;

/// Smallest panel size worth drawing.
const MIN_PANEL_SIZE: Vec2 = Vec2::new(120.0, 90.0);

/// Line colors cycled across series within a panel.
const SERIES_COLORS: [Color32; 4] = [
    Color32::from_rgb(100, 180, 255),
    Color32::from_rgb(255, 160, 60),
    Color32::from_rgb(120, 220, 120),
    Color32::from_rgb(230, 100, 160),
];

/// Render `figure` into the remaining space of `ui`.
///
/// `id` keeps plot state (zoom, pan) separate between figures.
pub fn show_figure(ui: &mut egui::Ui, id: &str, figure: &Figure) {
    if let Some(title) = &figure.title {
        ui.heading(title);
    }

    let panel = panel_size(
        ui.available_size(),
        figure.rows(),
        figure.cols(),
        figure.spacing,
    );
    let gap = Vec2::new(
        panel.x * spacing_to_f32(figure.spacing.wspace),
        panel.y * spacing_to_f32(figure.spacing.hspace),
    );

    for (row, panels) in figure.panel_rows().enumerate() {
        if row > 0 {
            ui.add_space(gap.y);
        }
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            for (col, axes) in panels.iter().enumerate() {
                if col > 0 {
                    ui.add_space(gap.x);
                }
                ui.allocate_ui(panel, |ui| {
                    show_axes(ui, (id, row, col), axes, panel);
                });
            }
        });
    }
}

/// Size of one panel so that `rows × cols` panels plus the fractional
/// gaps between them fill `available`.
#[allow(
    clippy::cast_precision_loss,
    reason = "grid dimensions are tiny"
)]
pub fn panel_size(available: Vec2, rows: usize, cols: usize, spacing: Spacing) -> Vec2 {
    let rows = rows.max(1) as f32;
    let cols = cols.max(1) as f32;
    let wspace = spacing_to_f32(spacing.wspace);
    let hspace = spacing_to_f32(spacing.hspace);

    let width = available.x / (cols + (cols - 1.0) * wspace);
    let height = available.y / (rows + (rows - 1.0) * hspace);
    Vec2::new(width, height).max(MIN_PANEL_SIZE)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "spacing fractions are small"
)]
fn spacing_to_f32(value: f64) -> f32 {
    value.max(0.0) as f32
}

fn show_axes(ui: &mut egui::Ui, id: impl std::hash::Hash, axes: &Axes, size: Vec2) {
    ui.vertical(|ui| {
        ui.label(RichText::new(&axes.title).strong());

        let scale = axes.y_scale;
        let mut plot = Plot::new(id)
            .width(size.x)
            .height((size.y - TITLE_HEIGHT).max(MIN_PANEL_SIZE.y))
            .x_axis_label(axes.x_label.clone())
            .y_axis_label(axes.y_label.clone())
            .label_formatter(move |name, point: &PlotPoint| {
                hover_label(name, point, scale)
            });

        if scale == AxisScale::Log {
            plot = plot.y_axis_formatter(|mark: GridMark, _range| log_tick_label(mark.value));
        }
        if axes.show_legend {
            plot = plot.legend(Legend::default());
        }

        plot.show(ui, |plot_ui| {
            for (i, series) in axes.series.iter().enumerate() {
                let name = series.label.clone().unwrap_or_default();
                let points = PlotPoints::from(series.plot_points(scale));
                plot_ui.line(
                    Line::new(name, points).color(SERIES_COLORS[i % SERIES_COLORS.len()]),
                );
            }
        });
    });
}

/// Tick label for a log10 coordinate: only whole decades are labelled.
pub fn log_tick_label(exponent: f64) -> String {
    if (exponent - exponent.round()).abs() < 1e-6 {
        format!("1e{}", exponent.round())
    } else {
        String::new()
    }
}

fn hover_label(name: &str, point: &PlotPoint, scale: AxisScale) -> String {
    let value = scale.inverse(point.y);
    let prefix = if name.is_empty() {
        String::new()
    } else {
        format!("{name}\n")
    };
    format!("{prefix}x = {:.3}\ny = {value:.4e}", point.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_size_fills_available_space() {
        let spacing = Spacing {
            wspace: 0.6,
            hspace: 0.6,
        };
        let panel = panel_size(Vec2::new(1040.0, 780.0), 2, 2, spacing);
        // 2 panels + 0.6 panel gap = 2.6 panels per side
        assert!((panel.x - 400.0).abs() < 1e-3);
        assert!((panel.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_panel_size_single_column() {
        let panel = panel_size(Vec2::new(800.0, 1000.0), 2, 1, Spacing::default());
        assert!((panel.x - 800.0).abs() < 1e-3);
        // 2 panels + 0.2 gap = 2.2 panels
        assert!((panel.y - 1000.0 / 2.2).abs() < 1e-2);
    }

    #[test]
    fn test_panel_size_has_minimum() {
        let panel = panel_size(Vec2::new(10.0, 10.0), 2, 2, Spacing::default());
        assert_eq!(panel, MIN_PANEL_SIZE);
    }

    #[test]
    fn test_log_tick_labels() {
        assert_eq!(log_tick_label(-3.0), "1e-3");
        assert_eq!(log_tick_label(2.0), "1e2");
        assert_eq!(log_tick_label(0.5), "");
    }

    #[test]
    fn test_hover_label_inverts_log_scale() {
        let label = hover_label("mean", &PlotPoint::new(50.0, -2.0), AxisScale::Log);
        assert_eq!(label, "mean\nx = 50.000\ny = 1.0000e-2");
    }
}
