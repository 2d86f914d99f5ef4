use eframe::egui::{RichText, Ui};

use crate::color::to_color32;
use crate::figure::Figure;

// ---------------------------------------------------------------------------
// Top bar – figure tabs
// ---------------------------------------------------------------------------

/// One selectable tab per figure, each with a swatch in the variable colour.
pub fn figure_tabs(ui: &mut Ui, figures: &[Figure], selected: &mut usize) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (i, figure) in figures.iter().enumerate() {
            let (name, color) = &figure.legend;
            ui.label(RichText::new("■").color(to_color32(*color)));
            ui.selectable_value(selected, i, name.as_str());
            ui.add_space(8.0);
        }
    });
}
