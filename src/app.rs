use anyhow::{anyhow, Result};
use eframe::egui;

use crate::figure::Figure;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

/// Window showing the figures of a run, one tab per variable.
pub struct FigureViewer {
    figures: Vec<Figure>,
    selected: usize,
}

impl FigureViewer {
    pub fn new(figures: Vec<Figure>) -> Self {
        Self {
            figures,
            selected: 0,
        }
    }
}

impl eframe::App for FigureViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: one tab per figure ----
        egui::TopBottomPanel::top("figure_tabs").show(ctx, |ui| {
            panels::figure_tabs(ui, &self.figures, &mut self.selected);
        });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| match self.figures.get(self.selected) {
            Some(figure) => plot::figure_plot(ui, figure),
            None => {
                ui.centered_and_justified(|ui: &mut egui::Ui| {
                    ui.heading("No figures to show");
                });
            }
        });
    }
}

/// Open the viewer and block until the window is closed.
pub fn show_figures(figures: Vec<Figure>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "EnKF ensemble plots",
        options,
        Box::new(|_cc| Ok(Box::new(FigureViewer::new(figures)))),
    )
    .map_err(|e| anyhow!("figure viewer: {e}"))
}
