//! # Application State Management
//!
//! This module implements the central `AppState` struct which holds every form,
//! result and explanation shown in the window. It implements the `eframe::App`
//! trait to integrate with the egui application framework.
//!
//! ## Responsibilities
//!
//! - Keeps one form per scenario (field text, coerced parameters, last result)
//! - Runs calculations when the user presses *Calculate*
//! - Starts explanation requests and consumes their outcomes via `explanation_rx`
//! - Coordinates rendering of the tab bar, input panel and results panel
//! - Persists the selected scenario across sessions
//!
//! ## State Management
//!
//! egui rebuilds the interface every frame. Switching tabs keeps each scenario's
//! inputs and results; a new calculation replaces the previous result.

use chrono::{DateTime, Local};
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

use crate::calculations::{Scenario, ScenarioParameters, ScenarioResults, coerce_number, format_number};
use crate::explanation::{ExplanationEvent, ExplanationQueueReceiver, ExplanationQueueSender, ExplanationRequest, ExplanationService, spawn_explanation};

/// Repaint interval while explanation requests are in flight.
const PENDING_REPAINT_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

/// Explanation text received for a scenario.
#[derive(Debug, Clone)]
pub struct Explanation {
    pub request_id: u64,
    pub text: String,
    pub received_at: DateTime<Local>,
}

/// Form state of one scenario.
#[derive(Debug, Clone)]
pub struct ScenarioForm {
    pub scenario: Scenario,
    /// Raw text of each input, ordered like `Scenario::parameter_fields`.
    pub inputs: Vec<String>,
    /// Inputs after coercion; refreshed on every edit.
    pub parameters: ScenarioParameters,
    /// Parameters the current results were computed from.
    pub calculated_parameters: Option<ScenarioParameters>,
    pub results: Option<ScenarioResults>,
    pub explanation: Option<Explanation>,
    /// Explanation requests whose worker has not finished yet.
    pub in_flight: Arc<AtomicU32>,
}

impl ScenarioForm {
    pub fn new(scenario: Scenario) -> Self {
        let parameters = ScenarioParameters::defaults(scenario);
        Self {
            scenario,
            inputs: parameters.values().into_iter().map(format_number).collect(),
            parameters,
            calculated_parameters: None,
            results: None,
            explanation: None,
            in_flight: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Re-coerce every input field into the parameter record.
    pub fn refresh_parameters(&mut self) {
        let values: Vec<f64> = self.inputs.iter().map(|text| coerce_number(text)).collect();
        self.parameters = ScenarioParameters::from_values(self.scenario, &values);
    }

    /// Replace the result with a fresh calculation of the current inputs.
    pub fn calculate(&mut self) {
        self.refresh_parameters();
        self.results = Some(self.parameters.calculate());
        self.calculated_parameters = Some(self.parameters);
        self.explanation = None;
    }

    /// Restore default inputs and clear results.
    pub fn reset(&mut self) {
        let in_flight = self.in_flight.clone();
        *self = Self::new(self.scenario);
        self.in_flight = in_flight;
    }

    pub fn pending_requests(&self) -> u32 {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Central application state.
pub struct AppState {
    /// Optional alert message to display in a modal dialog.
    pub alert: Option<String>,
    /// Receiver for explanation outcomes from worker threads.
    pub explanation_rx: ExplanationQueueReceiver,
    /// Sender handed to each worker thread.
    pub explanation_tx: ExplanationQueueSender,
    /// Service used for explanation requests.
    pub service: Arc<dyn ExplanationService>,
    /// Scenario shown in the window.
    pub selected: Scenario,
    /// One form per scenario, ordered like `Scenario::ALL`.
    pub forms: Vec<ScenarioForm>,
    /// API key entered by the user (pre-filled from configuration).
    pub api_key: String,
    /// Identifier given to the next explanation request.
    pub next_request_id: u64,
}

/// Settings persisted across application sessions.
#[derive(Default, Serialize, Deserialize)]
struct PersistedSettings {
    selected_scenario: Option<Scenario>,
}

impl AppState {
    /// Create a new AppState, loading persisted settings if available.
    ///
    /// # Parameters
    ///
    /// * `rx` / `tx` - Both ends of the explanation queue
    /// * `service` - Explanation service used for requests
    /// * `api_key` - Initial API key from configuration
    /// * `storage` - Optional persistent storage for loading saved settings
    pub fn new(
        rx: ExplanationQueueReceiver,
        tx: ExplanationQueueSender,
        service: Arc<dyn ExplanationService>,
        api_key: String,
        storage: Option<&dyn eframe::Storage>,
    ) -> Self {
        let persisted: PersistedSettings = storage.and_then(|s| eframe::get_value(s, "app_settings")).unwrap_or_default();

        Self {
            alert: None,
            explanation_rx: rx,
            explanation_tx: tx,
            service,
            selected: persisted.selected_scenario.unwrap_or_default(),
            forms: Scenario::ALL.iter().map(|s| ScenarioForm::new(*s)).collect(),
            api_key,
            next_request_id: 1,
        }
    }

    pub fn form(&self) -> &ScenarioForm {
        &self.forms[self.selected.index()]
    }

    pub fn form_mut(&mut self) -> &mut ScenarioForm {
        &mut self.forms[self.selected.index()]
    }

    pub fn calculate(&mut self) {
        self.form_mut().calculate();
    }

    pub fn reset_defaults(&mut self) {
        self.form_mut().reset();
    }

    /// Start an explanation request for the selected scenario's latest result.
    ///
    /// # Returns
    ///
    /// The worker thread handle, or `None` if nothing was started (no result yet
    /// or the thread could not be spawned; the alert says why).
    pub fn request_explanation(&mut self) -> Option<thread::JoinHandle<()>> {
        let form = self.form();
        let (Some(params), Some(results)) = (form.calculated_parameters, form.results) else {
            self.alert = Some("Calculate a result before asking for an explanation.".to_string());
            return None;
        };

        let in_flight = form.in_flight.clone();
        let request = ExplanationRequest {
            request_id: self.next_request_id,
            api_key: self.api_key.clone(),
            params,
            results,
        };
        self.next_request_id += 1;

        match spawn_explanation(self.service.clone(), request, self.explanation_tx, in_flight) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("Failed to start explanation worker: {}", e);
                self.alert = Some(format!("Failed to start explanation request: {}", e));
                None
            }
        }
    }

    /// Apply an outcome posted by a worker. The last response to arrive wins.
    pub fn handle_explanation_event(&mut self, event: ExplanationEvent) {
        let form = &mut self.forms[event.scenario().index()];
        match event {
            ExplanationEvent::Completed { request_id, text, .. } => {
                form.explanation = Some(Explanation {
                    request_id,
                    text,
                    received_at: Local::now(),
                });
            }
            ExplanationEvent::Failed { error, .. } => {
                self.alert = Some(error.to_string());
            }
        }
    }

    fn any_request_pending(&self) -> bool {
        self.forms.iter().any(|f| f.pending_requests() > 0)
    }
}

impl eframe::App for AppState {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            selected_scenario: Some(self.selected),
        };
        eframe::set_value(storage, "app_settings", &settings);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Sampled before draining: a worker posts its outcome before leaving the count
        let pending = self.any_request_pending();
        while let Ok(event) = self.explanation_rx.try_receive() {
            self.handle_explanation_event(event);
        }

        // Keep polling the queue while workers are running
        if pending {
            ctx.request_repaint_after(PENDING_REPAINT_INTERVAL);
        }

        if let Some(alert) = self.alert.clone() {
            egui::Window::new("Alert")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.label(alert);
                        ui.add_space(20.0);

                        if ui.button("OK").clicked() {
                            self.alert = None;
                        }
                        ui.add_space(10.0);
                    });
                });
        }

        super::scenario_tabs::render(ctx, self);
        super::input_panel::render(ctx, self);
        super::results_panel::render(ctx, self);
    }
}
