// UI module for the Wireless Formula Lab
//
// This module organizes the UI into separate components:
// - `scenario_tabs`: Top tab bar for choosing the scenario
// - `input_panel`: Left panel with the parameter form
// - `results_panel`: Result tiles and the explanation view
// - `app_state`: Application state management and main update loop

pub mod app_state;
pub mod input_panel;
pub mod results_panel;
pub mod scenario_tabs;

pub use app_state::AppState;
