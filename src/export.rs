use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use plotters_backend::DrawingErrorKind;

use crate::color::to_plotters;
use crate::config::{OutputFormat, OutputSpec};
use crate::figure::{Dash, Figure, X_LABEL, Y_LABEL};

/// Canvas size in inches.
pub const FIGURE_SIZE_IN: (f64, f64) = (6.4, 4.8);

/// Vector output is laid out in points.
const SVG_DPI: u32 = 72;

/// Largest raster side, in pixels, that will be allocated.
pub const MAX_RASTER_PX: u32 = 1 << 16;

// ---------------------------------------------------------------------------
// Physical scale
// ---------------------------------------------------------------------------

/// Converts typographic points to device pixels at a given resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub dpi: u32,
}

impl Scale {
    pub fn new(dpi: u32) -> Self {
        Scale { dpi: dpi.max(1) }
    }

    /// Canvas size in pixels.
    pub fn canvas(self) -> (u32, u32) {
        let (w, h) = FIGURE_SIZE_IN;
        let dpi = f64::from(self.dpi);
        ((w * dpi).round() as u32, (h * dpi).round() as u32)
    }

    pub fn pt(self, points: f64) -> f64 {
        points * f64::from(self.dpi) / 72.0
    }

    /// Whole pixels, never less than one.
    pub fn px(self, points: f64) -> u32 {
        self.pt(points).round().max(1.0) as u32
    }
}

// ---------------------------------------------------------------------------
// Saving
// ---------------------------------------------------------------------------

/// Write `figure` to `<dir>/<variable>.<format>` and return that path.
///
/// Raster output is drawn into an in-memory buffer which is dropped once
/// the file is encoded.
pub fn save_figure(figure: &Figure, output: &OutputSpec) -> Result<PathBuf> {
    let path = output.path_for(figure.variable);

    match &output.format {
        OutputFormat::Svg => {
            let scale = Scale::new(SVG_DPI);
            let root = SVGBackend::new(&path, scale.canvas()).into_drawing_area();
            draw_figure(root, figure, scale)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        OutputFormat::Raster { encoding, .. } => {
            let scale = Scale::new(output.dpi);
            let (w, h) = scale.canvas();
            if w >= MAX_RASTER_PX || h >= MAX_RASTER_PX {
                bail!(
                    "{w}x{h} px canvas for {} at {} dpi is too large (sides must be below {MAX_RASTER_PX} px)",
                    figure.variable,
                    output.dpi
                );
            }
            debug!("rasterising {} at {w}x{h}", figure.variable);

            let mut buffer = vec![0u8; w as usize * h as usize * 3];
            {
                let root = BitMapBackend::with_buffer(&mut buffer, (w, h)).into_drawing_area();
                draw_figure(root, figure, scale)
                    .with_context(|| format!("drawing {}", figure.variable))?;
            }

            let image = image::RgbImage::from_raw(w, h, buffer)
                .ok_or_else(|| anyhow!("raster buffer does not match {w}x{h}"))?;
            image
                .save_with_format(&path, *encoding)
                .with_context(|| format!("writing {}", path.display()))?;
        }
    }

    Ok(path)
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn draw_figure<DB>(root: DrawingArea<DB, Shift>, figure: &Figure, scale: Scale) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let ((x0, x1), (y0, y1)) = figure.bounds();
    let mut chart = ChartBuilder::on(&root)
        .margin(scale.px(10.0))
        .x_label_area_size(scale.px(30.0))
        .y_label_area_size(scale.px(48.0))
        .build_cartesian_2d(x0..x1, y0..y1)?;

    let font = FontDesc::new(FontFamily::SansSerif, scale.pt(10.0), FontStyle::Normal);
    draw_text_layer("axes", || {
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(X_LABEL)
            .y_desc(Y_LABEL)
            .axis_style(BLACK.stroke_width(scale.px(0.8)))
            .label_style(font.clone())
            .axis_desc_style(font.clone())
            .draw()
    })?;

    for trace in &figure.traces {
        let style = to_plotters(trace.color).stroke_width(scale.px(trace.role.width_pt()));
        let points = trace.points.iter().copied();
        match trace.dash {
            Dash::Solid => {
                chart.draw_series(LineSeries::new(points, style))?;
            }
            Dash::Dashed => {
                chart.draw_series(DashedLineSeries::new(
                    points,
                    scale.px(3.7),
                    scale.px(1.6),
                    style,
                ))?;
            }
        }
    }

    if let Some(obs) = &figure.observations {
        let color = to_plotters(obs.color);
        let line = color.stroke_width(scale.px(1.5));
        let cap = scale.px(4.0);
        let radius = scale.px(3.0);

        chart.draw_series(LineSeries::new(
            obs.points.iter().map(|&(x, y, _)| (x, y)),
            line,
        ))?;
        chart.draw_series(obs.points.iter().map(|&(x, y, e)| {
            ErrorBar::new_vertical(x, y - e.abs(), y, y + e.abs(), line, cap)
        }))?;
        chart.draw_series(
            obs.points
                .iter()
                .map(|&(x, y, _)| Circle::new((x, y), radius, color.filled())),
        )?;
    }

    let (label, patch) = &figure.legend;
    let patch = to_plotters(*patch);
    let (pw, ph) = (scale.px(20.0) as i32, scale.px(5.0) as i32);
    chart
        .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
        .label(label.as_str())
        .legend(move |(x, y)| Rectangle::new([(x, y - ph), (x + pw, y + ph)], patch.filled()));

    draw_text_layer("legend", || {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .margin(scale.px(6.0))
            .legend_area_size(scale.px(24.0))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.3))
            .label_font(font)
            .draw()
    })?;

    root.present()?;
    Ok(())
}

/// Run a drawing step that renders text.
///
/// Text needs a system font. When none can be loaded the step is skipped
/// with a warning; any other drawing error is returned.
fn draw_text_layer<E, F>(what: &str, draw: F) -> Result<()>
where
    E: std::error::Error + Send + Sync + 'static,
    F: FnOnce() -> Result<(), DrawingAreaErrorKind<E>>,
{
    match panic::catch_unwind(AssertUnwindSafe(draw)) {
        Ok(Err(DrawingAreaErrorKind::BackendError(DrawingErrorKind::FontError(e)))) => {
            warn!("{what} drawn without text: {e}");
            Ok(())
        }
        Ok(result) => Ok(result?),
        Err(_) => {
            warn!("{what} drawn without text: font backend panicked");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use palette::Srgb;

    use super::*;
    use crate::color::variable_color;
    use crate::data::model::Variable;
    use crate::figure::{ErrorBars, Trace, TraceRole};

    fn sample_figure(variable: Variable) -> Figure {
        let color = variable_color(variable);
        let mut fig = Figure::new(variable, color);
        let line: Vec<(f64, f64)> = (0..50).map(|i| (i as f64, (i * i) as f64)).collect();
        fig.traces.push(Trace {
            points: line.clone(),
            color: Srgb::new(0.9, 0.9, 1.0),
            dash: Dash::Solid,
            role: TraceRole::Member,
        });
        fig.traces.push(Trace {
            points: line,
            color,
            dash: Dash::Dashed,
            role: TraceRole::Spread,
        });
        fig.observations = Some(ErrorBars {
            color,
            points: vec![(10.0, 100.0, 20.0), (20.0, 400.0, 30.0)],
        });
        fig
    }

    #[test]
    fn canvas_follows_dpi() {
        assert_eq!(Scale::new(100).canvas(), (640, 480));
        assert_eq!(Scale::new(1200).canvas(), (7680, 5760));
        assert_eq!(Scale::new(72).pt(10.0), 10.0);
        assert_eq!(Scale::new(144).px(1.5), 3);
        assert_eq!(Scale::new(10).px(0.5), 1);
    }

    #[test]
    fn png_has_dpi_scaled_size() {
        let dir = tempfile::tempdir().unwrap();
        let spec = OutputSpec {
            dir: dir.path().to_path_buf(),
            format: "png".parse().unwrap(),
            dpi: 50,
        };

        let path = save_figure(&sample_figure(Variable::Dead), &spec).unwrap();
        assert_eq!(path, dir.path().join("dead.png"));

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (320, 240));
    }

    #[test]
    fn jpeg_is_written_at_dpi_size() {
        let dir = tempfile::tempdir().unwrap();
        let spec = OutputSpec {
            dir: dir.path().to_path_buf(),
            format: "jpg".parse().unwrap(),
            dpi: 25,
        };

        let path = save_figure(&sample_figure(Variable::Susc), &spec).unwrap();
        assert_eq!(path, dir.path().join("susc.jpg"));

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (160, 120));
        assert_eq!(
            image::ImageFormat::from_path(&path).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn oversized_raster_is_rejected_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let spec = OutputSpec {
            dir: dir.path().to_path_buf(),
            format: "png".parse().unwrap(),
            dpi: 200_000,
        };

        let err = save_figure(&sample_figure(Variable::Case), &spec).unwrap_err();
        assert!(err.to_string().contains("too large"));
        assert!(!dir.path().join("case.png").exists());

        // The largest side stays below the limit at 10239 dpi.
        assert!(Scale::new(10_239).canvas().0 < MAX_RASTER_PX);
        assert!(Scale::new(10_240).canvas().0 >= MAX_RASTER_PX);
        assert!(Scale::new(u32::MAX).canvas().0 >= MAX_RASTER_PX);
    }

    #[test]
    fn svg_is_written_as_vector() {
        let dir = tempfile::tempdir().unwrap();
        let spec = OutputSpec {
            dir: dir.path().to_path_buf(),
            format: "svg".parse().unwrap(),
            dpi: 1200,
        };

        let path = save_figure(&sample_figure(Variable::Hosp), &spec).unwrap();
        assert_eq!(path, dir.path().join("hosp.svg"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("<svg"));
    }

    #[test]
    fn missing_output_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let spec = OutputSpec {
            dir: dir.path().join("absent"),
            format: "bmp".parse().unwrap(),
            dpi: 20,
        };

        let err = save_figure(&sample_figure(Variable::Case), &spec).unwrap_err();
        assert!(format!("{err:#}").contains("case.bmp"));
    }
}
