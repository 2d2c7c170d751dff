//! Prompt text and JSON bodies exchanged with the text-generation endpoint.

use serde::{Deserialize, Serialize};

use super::config::ExplanationConfig;
use crate::calculations::{ScenarioParameters, ScenarioResults};

/// Returned when the response has no candidate text.
pub const FALLBACK_EXPLANATION: &str = "No explanation available.";

const PREAMBLE: &str = "You are a tutor for a wireless networking course. \
Explain the following calculation to a student in plain language. \
Describe what each input parameter represents, walk through how every result is derived from the inputs, \
and point out whether the outcome is realistic and what it means in practice.";

/// Build the prompt for one calculation.
///
/// Layout: preamble, upper-cased scenario name, then one `- key: value` line per
/// parameter and per result.
pub fn build_prompt(params: &ScenarioParameters, results: &ScenarioResults) -> String {
    let mut prompt = String::new();
    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\nScenario: ");
    prompt.push_str(&params.scenario().prompt_name());
    prompt.push_str("\n\nParameters:\n");
    for (spec, value) in params.fields() {
        prompt.push_str(&format!("- {}: {}\n", spec.key, value));
    }
    prompt.push_str("\nResults:\n");
    for (spec, value) in results.fields() {
        prompt.push_str(&format!("- {}: {}\n", spec.key, value));
    }
    prompt
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
pub struct RequestPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl GenerateContentRequest {
    /// Single-prompt request using the generation controls from `config`.
    pub fn new(prompt: &str, config: &ExplanationConfig) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt.to_string() }],
            }],
            generation_config: GenerationConfig {
                temperature: config.temperature,
                top_p: config.top_p,
                max_output_tokens: config.max_output_tokens,
            },
        }
    }
}

/// The subset of the response that carries generated text. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, or [`FALLBACK_EXPLANATION`].
    pub fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .unwrap_or_else(|| FALLBACK_EXPLANATION.to_string())
    }
}
