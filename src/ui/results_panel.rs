//! # Results Panel
//!
//! Central panel showing:
//! - One colour-coded tile per result field (two decimals, non-finite values spelled out)
//! - The explanation section: API key, *Explain* button, request status and text
//!
//! Explanation failures are reported through the alert window and never hide
//! the numeric results.

use eframe::egui;
use egui::Color32;

use crate::calculations::{FieldSpec, FieldValue, format_fixed};
use crate::ui::AppState;

const TILE_WIDTH: f32 = 190.0;
const TILE_DECIMALS: usize = 2;

const VIABLE_COLOR: Color32 = Color32::from_rgb(30, 120, 60);
const NOT_VIABLE_COLOR: Color32 = Color32::from_rgb(150, 40, 40);

/// Background colour of the n-th result tile.
///
/// Tiles cycle through a muted palette so neighbouring values are easy to tell apart.
fn tile_color(index: usize) -> Color32 {
    const PALETTE: [Color32; 5] = [
        Color32::from_rgb(40, 70, 120),  // Blue
        Color32::from_rgb(90, 60, 120),  // Purple
        Color32::from_rgb(30, 100, 110), // Teal
        Color32::from_rgb(120, 80, 30),  // Amber
        Color32::from_rgb(70, 90, 50),   // Olive
    ];
    PALETTE[index % PALETTE.len()]
}

/// Text and background of a tile.
fn tile_content(index: usize, value: FieldValue) -> (String, Color32) {
    match value {
        FieldValue::Number(n) => (format_fixed(n, TILE_DECIMALS), tile_color(index)),
        FieldValue::Flag(true) => ("Viable".to_string(), VIABLE_COLOR),
        FieldValue::Flag(false) => ("Not viable".to_string(), NOT_VIABLE_COLOR),
    }
}

fn render_tile(ui: &mut egui::Ui, index: usize, spec: &FieldSpec, value: FieldValue) {
    let (text, fill) = tile_content(index, value);
    egui::Frame::group(ui.style())
        .fill(fill)
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(TILE_WIDTH);
            ui.vertical(|ui| {
                ui.label(egui::RichText::new(spec.label).color(Color32::LIGHT_GRAY));
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(text).size(22.0).strong().color(Color32::WHITE));
                    if !spec.unit.is_empty() {
                        ui.label(egui::RichText::new(spec.unit).color(Color32::LIGHT_GRAY));
                    }
                });
            });
        });
}

/// Render the results and explanation for the selected scenario.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_space(10.0);
        ui.heading("Results");
        ui.separator();

        let results = state.form().results;
        match results {
            Some(results) => {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = egui::vec2(10.0, 10.0);
                    for (index, (spec, value)) in results.fields().into_iter().enumerate() {
                        render_tile(ui, index, spec, value);
                    }
                });
            }
            None => {
                ui.label(egui::RichText::new("Enter the parameters and press Calculate.").italics());
            }
        }

        ui.add_space(20.0);
        ui.heading("Explanation");
        ui.separator();

        ui.horizontal(|ui| {
            ui.label("API key:");
            ui.add(egui::TextEdit::singleline(&mut state.api_key).password(true).desired_width(280.0));
            let explain = egui::Button::new(egui::RichText::new("Explain").strong()).min_size(egui::vec2(100.0, 26.0));
            if ui.add_enabled(results.is_some(), explain).clicked() {
                state.request_explanation();
            }
        });

        let form = state.form();
        if form.pending_requests() > 0 {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Requesting explanation…");
            });
        }

        if let Some(explanation) = &form.explanation {
            ui.label(
                egui::RichText::new(format!("Received {} (request #{})", explanation.received_at.format("%H:%M:%S"), explanation.request_id))
                    .weak()
                    .small(),
            );
            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                ui.label(explanation.text.as_str());
            });
        }
    });
}
