//! Natural-language explanations of a calculation.
//!
//! Sends the scenario, its parameters and its results to a remote
//! text-generation endpoint and returns the generated text. The engine never
//! depends on this module; the UI calls it only when the user asks.
//!
//! - `config`: endpoint, key and generation controls from `config.toml`
//! - `prompt`: prompt text and request/response JSON shapes
//! - `client`: `ExplanationService` trait and the reqwest-backed client
//! - `worker`: one background thread per request, results posted to a channel

pub mod client;
pub mod config;
pub mod prompt;
pub mod worker;

pub use client::{ExplanationClient, ExplanationError, ExplanationService, UnavailableService};
pub use config::ExplanationConfig;
pub use worker::{ExplanationEvent, ExplanationQueue, ExplanationQueueReceiver, ExplanationQueueSender, ExplanationRequest, spawn_explanation};
