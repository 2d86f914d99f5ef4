use eframe::egui::Color32;
use palette::{Mix, Srgb};
use plotters::style::RGBColor;

use crate::data::model::Variable;

/// Colour with channels in `[0, 1]`.
pub type Rgb = Srgb<f32>;

// ---------------------------------------------------------------------------
// Variable palette
// ---------------------------------------------------------------------------

/// Base colour of a variable's mean, spread and observation traces.
pub fn variable_color(variable: Variable) -> Rgb {
    let (r, g, b) = match variable {
        Variable::Dead => (0.0, 0.0, 1.0),
        Variable::Hosp => (0.0, 1.0, 0.0),
        Variable::Case => (1.0, 0.0, 0.0),
        Variable::Susc => (1.0, 1.0, 0.0),
        Variable::Recov => (0.0, 0.0, 0.0),
        Variable::Infec => (0.0, 1.0, 1.0),
        Variable::Expos => (1.0, 0.0, 1.0),
    };
    Srgb::new(r, g, b)
}

// ---------------------------------------------------------------------------
// Shading
// ---------------------------------------------------------------------------

/// Blend `color` towards white by `percent` (0 = unchanged, 1 = white).
pub fn lighter(color: Rgb, percent: f32) -> Rgb {
    color.mix(Srgb::new(1.0, 1.0, 1.0), percent.clamp(0.0, 1.0))
}

// ---------------------------------------------------------------------------
// Backend conversions
// ---------------------------------------------------------------------------

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn to_plotters(color: Rgb) -> RGBColor {
    RGBColor(to_u8(color.red), to_u8(color.green), to_u8(color.blue))
}

pub fn to_color32(color: Rgb) -> Color32 {
    Color32::from_rgb(to_u8(color.red), to_u8(color.green), to_u8(color.blue))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.red - b.red).abs() < EPS
            && (a.green - b.green).abs() < EPS
            && (a.blue - b.blue).abs() < EPS
    }

    fn samples() -> Vec<Rgb> {
        let mut colors: Vec<Rgb> = Variable::ALL.iter().map(|&v| variable_color(v)).collect();
        colors.push(Srgb::new(0.25, 0.5, 0.75));
        colors.push(Srgb::new(1.0, 1.0, 1.0));
        colors
    }

    #[test]
    fn zero_percent_keeps_color() {
        for c in samples() {
            assert!(close(lighter(c, 0.0), c), "{c:?}");
        }
    }

    #[test]
    fn full_percent_gives_white() {
        let white = Srgb::new(1.0, 1.0, 1.0);
        for c in samples() {
            assert!(close(lighter(c, 1.0), white), "{c:?}");
        }
    }

    #[test]
    fn blend_is_linear_and_stays_in_unit_cube() {
        for c in samples() {
            for step in 0..=20 {
                let p = step as f32 / 20.0;
                let l = lighter(c, p);
                for (ch, base) in [(l.red, c.red), (l.green, c.green), (l.blue, c.blue)] {
                    assert!((0.0..=1.0).contains(&ch));
                    assert!((ch - (base + (1.0 - base) * p)).abs() < EPS);
                }
            }
        }
    }

    #[test]
    fn stage_fadings_match_plot_shades() {
        let blue = variable_color(Variable::Dead);
        let prior = lighter(blue, 0.9);
        let posterior = lighter(blue, 0.6);
        assert!(close(prior, Srgb::new(0.9, 0.9, 1.0)));
        assert!(close(posterior, Srgb::new(0.6, 0.6, 1.0)));
    }

    #[test]
    fn backend_conversions_agree() {
        let c = lighter(variable_color(Variable::Case), 0.6);
        let p = to_plotters(c);
        let e = to_color32(c);
        assert_eq!((p.0, p.1, p.2), (e.r(), e.g(), e.b()));
        assert_eq!((p.0, p.1, p.2), (255, 153, 153));
    }
}
