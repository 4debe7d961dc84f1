//! Qualitative insight generation.
//!
//! The pipeline hands the metrics to an [`InsightGenerator`] together with a
//! fixed system instruction. Generators are pluggable (a hosted model client,
//! a canned responder in tests, or [`DisabledInsight`] offline). A failing
//! generator never fails the analysis: the orchestrator substitutes
//! [`InsightError::fallback_message`] and marks the outcome as degraded.

use crate::metrics::DrawingMetrics;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Instruction sent with every request.
pub const SYSTEM_INSTRUCTION: &str = "You are a visual data analysis assistant supporting psychologists. \
Turn the numeric metrics of a drawing into a qualitative description of what is visible. \
Then, based only on that visual description, suggest possible areas of focus or visual questions \
for the psychologist, without any psychological judgement, diagnosis or emotional interpretation. \
Keep an objective, supportive tone and describe what the visual patterns could indicate from a visual \
standpoint, leaving interpretation to the human expert. \
Example: 'The drawing shows medium stroke density with smooth edges. Visually, this could suggest a fluid \
use of space. Could the uniform stroke point to a pattern of consistency?' \
Do NOT use language such as 'the patient might feel...' or 'indicates anxiety'. Stay visual.";

/// Payload for one generation call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub system_instruction: String,
    /// Metric name/value pairs in report order.
    pub metrics: Vec<(String, Value)>,
}

impl InsightRequest {
    pub fn new(metrics: &DrawingMetrics) -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            metrics: metrics.entries(),
        }
    }

    /// User turn listing the metrics as `name: value` pairs.
    pub fn user_prompt(&self) -> String {
        let listed = self
            .metrics
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Here are the drawing metrics: {{{listed}}}. \
             Please give me the objective description and the visual suggestions."
        )
    }
}

/// Failure reported by a generator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InsightError {
    #[error("the provided credential is not valid")]
    InvalidCredential,
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("insight generation failed: {0}")]
    Other(String),
}

impl InsightError {
    /// Classify a provider error message: an invalid key marker maps to
    /// [`InsightError::InvalidCredential`], a 404 to
    /// [`InsightError::ModelUnavailable`], anything else to
    /// [`InsightError::Other`].
    pub fn from_provider_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("API_KEY_INVALID") {
            Self::InvalidCredential
        } else if message.contains("404") {
            Self::ModelUnavailable(message)
        } else {
            Self::Other(message)
        }
    }

    /// Text returned in place of an insight.
    pub fn fallback_message(&self) -> String {
        match self {
            Self::InvalidCredential => "Error: the provided API key is not valid.".to_string(),
            Self::ModelUnavailable(details) => {
                format!("Error 404: model not found. Check the model name. {details}")
            }
            Self::Timeout(limit) => {
                format!("Error: the insight service did not answer within {limit:?}.")
            }
            Self::Other(details) => format!("Error contacting the insight service: {details}"),
        }
    }
}

/// External text generator.
pub trait InsightGenerator: Send + Sync {
    fn generate(&self, request: &InsightRequest) -> Result<String, InsightError>;
}

impl<F> InsightGenerator for F
where
    F: Fn(&InsightRequest) -> Result<String, InsightError> + Send + Sync,
{
    fn generate(&self, request: &InsightRequest) -> Result<String, InsightError> {
        self(request)
    }
}

/// Generator for offline runs: always answers with a fixed notice.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledInsight;

pub const DISABLED_INSIGHT_TEXT: &str = "Insight generation is disabled.";

impl InsightGenerator for DisabledInsight {
    fn generate(&self, _request: &InsightRequest) -> Result<String, InsightError> {
        Ok(DISABLED_INSIGHT_TEXT.to_string())
    }
}

/// Insight text as delivered to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightOutcome {
    pub text: String,
    /// `true` when `text` is a fallback message.
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InsightOutcome {
    pub fn generated(text: String) -> Self {
        Self {
            text,
            degraded: false,
            error: None,
        }
    }

    pub fn fallback(err: &InsightError) -> Self {
        Self {
            text: err.fallback_message(),
            degraded: true,
            error: Some(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> DrawingMetrics {
        DrawingMetrics {
            stroke_density_pct: 6.25,
            edge_complexity_pct: 1.0,
            skeleton_length_px: 1,
            corner_count: 12,
            global_contrast: 61.99,
            space_usage_pct: 6.25,
        }
    }

    #[test]
    fn request_carries_instruction_and_ordered_metrics() {
        let req = InsightRequest::new(&metrics());
        assert_eq!(req.system_instruction, SYSTEM_INSTRUCTION);
        assert_eq!(req.metrics.len(), 6);
        assert_eq!(req.metrics[0].0, "strokeDensityPct");
        let prompt = req.user_prompt();
        assert!(prompt.contains("cornerCount: 12"));
        assert!(prompt.contains("spaceUsagePct: 6.25"));
    }

    #[test]
    fn provider_messages_are_classified() {
        assert_eq!(
            InsightError::from_provider_message("400 API_KEY_INVALID"),
            InsightError::InvalidCredential
        );
        assert!(matches!(
            InsightError::from_provider_message("404 models/foo not found"),
            InsightError::ModelUnavailable(_)
        ));
        assert!(matches!(
            InsightError::from_provider_message("connection reset"),
            InsightError::Other(_)
        ));
    }

    #[test]
    fn fallback_messages_are_distinct() {
        let errors = [
            InsightError::InvalidCredential,
            InsightError::ModelUnavailable("m".into()),
            InsightError::Timeout(Duration::from_secs(1)),
            InsightError::Other("x".into()),
        ];
        let texts: Vec<String> = errors.iter().map(|e| e.fallback_message()).collect();
        for (i, a) in texts.iter().enumerate() {
            assert!(texts[i + 1..].iter().all(|b| a != b));
        }
        let outcome = InsightOutcome::fallback(&errors[0]);
        assert!(outcome.degraded);
        assert!(outcome.text.contains("API key"));
    }

    #[test]
    fn closures_act_as_generators() {
        let echo = |req: &InsightRequest| -> Result<String, InsightError> {
            Ok(format!("{} metrics", req.metrics.len()))
        };
        assert_eq!(echo.generate(&InsightRequest::new(&metrics())).unwrap(), "6 metrics");
        assert_eq!(
            DisabledInsight.generate(&InsightRequest::new(&metrics())).unwrap(),
            DISABLED_INSIGHT_TEXT
        );
    }
}
