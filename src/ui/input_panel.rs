//! # Input Panel - Parameter Form
//!
//! Left side panel with one text field per parameter of the selected scenario,
//! followed by the *Calculate* and *Reset defaults* buttons. Text is accepted
//! as typed and coerced to numbers (invalid → 0) whenever it changes.

use eframe::egui;

use crate::ui::AppState;

const PANEL_WIDTH: f32 = 380.0;
const FIELD_WIDTH: f32 = 120.0;

/// Render the parameter form for the selected scenario.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::SidePanel::left("parameter_form").resizable(false).exact_width(PANEL_WIDTH).show(ctx, |ui| {
        ui.add_space(10.0);
        ui.heading("Parameters");
        ui.separator();

        let scenario = state.selected;
        let mut edited = false;
        egui::Grid::new(("parameter_grid", scenario.index()))
            .num_columns(3)
            .spacing([10.0, 8.0])
            .striped(true)
            .show(ui, |ui| {
                let form = state.form_mut();
                for (spec, text) in scenario.parameter_fields().iter().zip(form.inputs.iter_mut()) {
                    ui.label(spec.label);
                    let response = ui.add(egui::TextEdit::singleline(text).desired_width(FIELD_WIDTH));
                    if response.changed() {
                        edited = true;
                    }
                    ui.label(egui::RichText::new(spec.unit).weak());
                    ui.end_row();
                }
            });

        if edited {
            state.form_mut().refresh_parameters();
        }

        ui.add_space(16.0);
        ui.horizontal(|ui| {
            let calculate = egui::Button::new(egui::RichText::new("Calculate").size(15.0).strong()).min_size(egui::vec2(140.0, 32.0));
            if ui.add(calculate).clicked() {
                state.calculate();
            }
            if ui.add(egui::Button::new("Reset defaults").min_size(egui::vec2(120.0, 32.0))).clicked() {
                state.reset_defaults();
            }
        });
    });
}
