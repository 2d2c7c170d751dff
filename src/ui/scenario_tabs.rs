//! # Scenario Tabs
//!
//! Fixed top panel with the application title and one tab per scenario.
//! Selecting a tab only switches the visible form; each scenario keeps its
//! own inputs and results.

use eframe::egui;

use crate::calculations::Scenario;
use crate::ui::AppState;

/// Short description shown under the tab bar.
fn scenario_summary(scenario: Scenario) -> &'static str {
    match scenario {
        Scenario::LinkBudget => "Received power and margin of a point-to-point radio link using free-space path loss.",
        Scenario::CellularDesign => "Cell radius, number of cells, channels per cell and reuse for a coverage area and traffic load.",
        Scenario::DigitalChain => "Bit rate after each stage of a digital transmitter from sampling to burst formatting.",
        Scenario::Ofdm => "Throughput of an OFDM carrier from a single resource element up to the full bandwidth.",
    }
}

/// Render the tab bar.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("scenario_tabs").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new("Wireless Formula Lab").strong());
            ui.add_space(30.0);
            for scenario in Scenario::ALL {
                let label = egui::RichText::new(scenario.label()).size(16.0);
                if ui.selectable_label(state.selected == scenario, label).clicked() && state.selected != scenario {
                    log::debug!("Switched to {}", scenario.label());
                    state.selected = scenario;
                }
            }
        });
        ui.label(egui::RichText::new(scenario_summary(state.selected)).weak());
        ui.add_space(6.0);
    });
}
