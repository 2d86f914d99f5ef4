use eframe::egui::Ui;
use egui_plot::{Legend, Line, LineStyle, MarkerShape, Plot, PlotPoints, Points};

use crate::color::to_color32;
use crate::figure::{Dash, Figure, TraceRole, X_LABEL, Y_LABEL};

/// egui points per typographic point.
const PT: f32 = 96.0 / 72.0;

// ---------------------------------------------------------------------------
// Figure plot (central panel)
// ---------------------------------------------------------------------------

/// Render one figure in the central panel.
///
/// The mean lines carry the variable name so the legend shows a single
/// entry in the variable colour.
pub fn figure_plot(ui: &mut Ui, figure: &Figure) {
    let (name, _) = &figure.legend;

    Plot::new(("figure_plot", figure.variable.name()))
        .legend(Legend::default())
        .x_axis_label(X_LABEL)
        .y_axis_label(Y_LABEL)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for trace in &figure.traces {
                let points: PlotPoints = trace.points.iter().map(|&(x, y)| [x, y]).collect();

                let mut line = Line::new(points)
                    .color(to_color32(trace.color))
                    .width(trace.role.width_pt() as f32 * PT);
                if trace.dash == Dash::Dashed {
                    line = line.style(LineStyle::dashed_dense());
                }
                if trace.role == TraceRole::Mean {
                    line = line.name(name);
                }
                plot_ui.line(line);
            }

            if let Some(obs) = &figure.observations {
                let color = to_color32(obs.color);

                let path: PlotPoints = obs.points.iter().map(|&(x, y, _)| [x, y]).collect();
                plot_ui.line(Line::new(path).color(color).width(1.5 * PT));

                for &(x, y, e) in &obs.points {
                    let bar = Line::new(PlotPoints::from(vec![[x, y - e.abs()], [x, y + e.abs()]]))
                        .color(color)
                        .width(1.5 * PT);
                    plot_ui.line(bar);
                }

                let markers: PlotPoints = obs.points.iter().map(|&(x, y, _)| [x, y]).collect();
                plot_ui.points(
                    Points::new(markers)
                        .shape(MarkerShape::Circle)
                        .radius(3.0 * PT)
                        .filled(true)
                        .color(color),
                );
            }
        });
}
