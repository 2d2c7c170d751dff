//! Calculation engine.
//!
//! Four independent closed-form calculators, one per scenario:
//! - `link_budget`: EIRP, free-space loss, received power, margin and viability
//! - `cellular`: cell radius/count, traffic and channels per cell, reuse, efficiency
//! - `digital_chain`: bit rate through sampler, coders, interleaver and burst formatter
//! - `ofdm`: resource element → symbol → resource block → carrier rates
//!
//! Every calculator is a pure function from a parameter record to a result
//! record. Arithmetic follows IEEE-754 `f64` semantics: division by zero and
//! logarithms of non-positive numbers yield infinities or NaN in the result
//! instead of failing.
//!
//! This module also holds the scenario registry used by the UI and the
//! explanation prompt: field metadata, sum types over the four records, and
//! number formatting that spells out non-finite values.

pub mod cellular;
pub mod digital_chain;
pub mod input;
pub mod link_budget;
pub mod ofdm;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use cellular::{CellularParameters, CellularResults, calculate_cellular_design};
pub use digital_chain::{DigitalChainParameters, DigitalChainResults, calculate_digital_chain};
pub use input::coerce_number;
pub use link_budget::{LinkBudgetParameters, LinkBudgetResults, calculate_link_budget};
pub use ofdm::{OfdmParameters, OfdmResults, calculate_ofdm_rates};

/// Metadata for one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Stable camelCase key used in prompts.
    pub key: &'static str,
    /// Human readable label for forms and result tiles.
    pub label: &'static str,
    /// Unit hint, empty for dimensionless values.
    pub unit: &'static str,
}

impl FieldSpec {
    pub const fn new(key: &'static str, label: &'static str, unit: &'static str) -> Self {
        Self { key, label, unit }
    }
}

/// A single value of a result record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Flag(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(value) => write!(f, "{}", format_number(*value)),
            FieldValue::Flag(flag) => write!(f, "{}", flag),
        }
    }
}

/// The four calculator scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Scenario {
    #[default]
    LinkBudget,
    CellularDesign,
    DigitalChain,
    Ofdm,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [Scenario::LinkBudget, Scenario::CellularDesign, Scenario::DigitalChain, Scenario::Ofdm];

    /// Title shown on the scenario tab.
    pub fn label(&self) -> &'static str {
        match self {
            Scenario::LinkBudget => "Link Budget",
            Scenario::CellularDesign => "Cellular Design",
            Scenario::DigitalChain => "Digital Chain",
            Scenario::Ofdm => "OFDM Rates",
        }
    }

    /// Upper-cased title used in the explanation prompt.
    pub fn prompt_name(&self) -> String {
        self.label().to_uppercase()
    }

    /// Position in [`Scenario::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Scenario::LinkBudget => 0,
            Scenario::CellularDesign => 1,
            Scenario::DigitalChain => 2,
            Scenario::Ofdm => 3,
        }
    }

    pub fn parameter_fields(&self) -> &'static [FieldSpec] {
        match self {
            Scenario::LinkBudget => &link_budget::PARAMETER_FIELDS,
            Scenario::CellularDesign => &cellular::PARAMETER_FIELDS,
            Scenario::DigitalChain => &digital_chain::PARAMETER_FIELDS,
            Scenario::Ofdm => &ofdm::PARAMETER_FIELDS,
        }
    }

    pub fn result_fields(&self) -> &'static [FieldSpec] {
        match self {
            Scenario::LinkBudget => &link_budget::RESULT_FIELDS,
            Scenario::CellularDesign => &cellular::RESULT_FIELDS,
            Scenario::DigitalChain => &digital_chain::RESULT_FIELDS,
            Scenario::Ofdm => &ofdm::RESULT_FIELDS,
        }
    }
}

/// Parameter record of any scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScenarioParameters {
    LinkBudget(LinkBudgetParameters),
    CellularDesign(CellularParameters),
    DigitalChain(DigitalChainParameters),
    Ofdm(OfdmParameters),
}

impl ScenarioParameters {
    /// Default inputs of a scenario.
    pub fn defaults(scenario: Scenario) -> Self {
        match scenario {
            Scenario::LinkBudget => ScenarioParameters::LinkBudget(LinkBudgetParameters::default()),
            Scenario::CellularDesign => ScenarioParameters::CellularDesign(CellularParameters::default()),
            Scenario::DigitalChain => ScenarioParameters::DigitalChain(DigitalChainParameters::default()),
            Scenario::Ofdm => ScenarioParameters::Ofdm(OfdmParameters::default()),
        }
    }

    /// Build a record from values ordered like [`Scenario::parameter_fields`].
    pub fn from_values(scenario: Scenario, values: &[f64]) -> Self {
        match scenario {
            Scenario::LinkBudget => ScenarioParameters::LinkBudget(LinkBudgetParameters::from_values(values)),
            Scenario::CellularDesign => ScenarioParameters::CellularDesign(CellularParameters::from_values(values)),
            Scenario::DigitalChain => ScenarioParameters::DigitalChain(DigitalChainParameters::from_values(values)),
            Scenario::Ofdm => ScenarioParameters::Ofdm(OfdmParameters::from_values(values)),
        }
    }

    pub fn scenario(&self) -> Scenario {
        match self {
            ScenarioParameters::LinkBudget(_) => Scenario::LinkBudget,
            ScenarioParameters::CellularDesign(_) => Scenario::CellularDesign,
            ScenarioParameters::DigitalChain(_) => Scenario::DigitalChain,
            ScenarioParameters::Ofdm(_) => Scenario::Ofdm,
        }
    }

    pub fn values(&self) -> Vec<f64> {
        match self {
            ScenarioParameters::LinkBudget(p) => p.values().to_vec(),
            ScenarioParameters::CellularDesign(p) => p.values().to_vec(),
            ScenarioParameters::DigitalChain(p) => p.values().to_vec(),
            ScenarioParameters::Ofdm(p) => p.values().to_vec(),
        }
    }

    /// `(field, value)` pairs in form order.
    pub fn fields(&self) -> Vec<(&'static FieldSpec, FieldValue)> {
        self.scenario()
            .parameter_fields()
            .iter()
            .zip(self.values())
            .map(|(spec, value)| (spec, FieldValue::Number(value)))
            .collect()
    }

    /// Run the matching calculator.
    pub fn calculate(&self) -> ScenarioResults {
        let results = match self {
            ScenarioParameters::LinkBudget(p) => ScenarioResults::LinkBudget(calculate_link_budget(p)),
            ScenarioParameters::CellularDesign(p) => ScenarioResults::CellularDesign(calculate_cellular_design(p)),
            ScenarioParameters::DigitalChain(p) => ScenarioResults::DigitalChain(calculate_digital_chain(p)),
            ScenarioParameters::Ofdm(p) => ScenarioResults::Ofdm(calculate_ofdm_rates(p)),
        };
        log::debug!("Calculated {}: {}", self.scenario().label(), results.summary());
        results
    }
}

/// Result record of any scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScenarioResults {
    LinkBudget(LinkBudgetResults),
    CellularDesign(CellularResults),
    DigitalChain(DigitalChainResults),
    Ofdm(OfdmResults),
}

impl ScenarioResults {
    pub fn scenario(&self) -> Scenario {
        match self {
            ScenarioResults::LinkBudget(_) => Scenario::LinkBudget,
            ScenarioResults::CellularDesign(_) => Scenario::CellularDesign,
            ScenarioResults::DigitalChain(_) => Scenario::DigitalChain,
            ScenarioResults::Ofdm(_) => Scenario::Ofdm,
        }
    }

    pub fn values(&self) -> Vec<FieldValue> {
        match self {
            ScenarioResults::LinkBudget(r) => r.values().to_vec(),
            ScenarioResults::CellularDesign(r) => r.values().to_vec(),
            ScenarioResults::DigitalChain(r) => r.values().to_vec(),
            ScenarioResults::Ofdm(r) => r.values().to_vec(),
        }
    }

    /// `(field, value)` pairs in display order.
    pub fn fields(&self) -> Vec<(&'static FieldSpec, FieldValue)> {
        self.scenario().result_fields().iter().zip(self.values()).collect()
    }

    /// One-line `key=value` rendering for logs.
    pub fn summary(&self) -> String {
        self.fields()
            .iter()
            .map(|(spec, value)| format!("{}={}", spec.key, value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Render a number the way a browser prints it: `Infinity`, `-Infinity` and
/// `NaN` for non-finite values, integers without a trailing `.0`, and
/// exponent notation outside `[1e-6, 1e21)`.
pub fn format_number(value: f64) -> String {
    if let Some(text) = non_finite_text(value) {
        return text.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        // Rust prints `1e21`/`1.5e-7`; browsers sign positive exponents
        let text = format!("{:e}", value);
        return match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{}e+{}", mantissa, exponent),
            _ => text,
        };
    }
    // `-0` prints as `0` in a browser
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// Render a number with a fixed number of decimals, keeping the spelled-out
/// non-finite values.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    match non_finite_text(value) {
        Some(text) => text.to_string(),
        None => format!("{:.*}", decimals, value),
    }
}

fn non_finite_text(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("Infinity")
    } else if value == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}
