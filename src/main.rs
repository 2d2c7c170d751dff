use eframe::egui;
use env_logger::Builder;
use log::{LevelFilter, info};
use std::path::Path;
use std::sync::Arc;

use crate::explanation::{ExplanationClient, ExplanationConfig, ExplanationQueue, ExplanationService, UnavailableService};
use crate::ui::AppState;

mod calculations;
mod explanation;
mod ui;

fn main() {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("wireless_formula_lab"), LevelFilter::Debug)
        .filter(Some("reqwest"), LevelFilter::Warn)
        .init();

    info!("Starting up");

    let mut startup_alert = None;
    let config = match ExplanationConfig::load(Path::new(explanation::config::CONFIG_FILE_NAME)) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{:#}", e);
            startup_alert = Some(format!("{:#}\nUsing default explanation settings.", e));
            ExplanationConfig::default()
        }
    };
    let api_key = config.api_key.clone();

    let service: Arc<dyn ExplanationService> = match ExplanationClient::new(config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            log::error!("{}", e);
            startup_alert = Some(e.to_string());
            Arc::new(UnavailableService { reason: e.to_string() })
        }
    };

    // Worker threads outlive any borrow of a local, so the queue lives for the whole process
    let explanation_queue: &'static ExplanationQueue = Box::leak(Box::new(ExplanationQueue::new()));
    let explanation_tx = explanation_queue.sender();
    let explanation_rx = explanation_queue.receiver();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1180.0, 760.0]).with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    };
    let result = eframe::run_native(
        "Wireless Formula Lab",
        native_options,
        Box::new(move |cc| {
            let mut state = AppState::new(explanation_rx, explanation_tx, service, api_key, cc.storage);
            state.alert = startup_alert;
            Ok(Box::new(state))
        }),
    );
    if let Err(e) = result {
        log::error!("UI terminated with error: {}", e);
    }
}
