//! Interpretation of AI-text classifier output.
//!
//! The classifier reports its top label and a confidence for that label. Labels name
//! either the machine-generated class or the human-written class; `ai_score` is
//! always expressed as the probability that the text is machine-generated.

use crate::plagiarism::round_to;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inputs longer than this many characters are cut before inference.
pub const MAX_DETECTION_CHARS: usize = 1000;

/// One raw prediction as returned by a text-classification model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

impl Prediction {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self { label: Some(label.into()), score: Some(score) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorship {
    Machine,
    Human,
}

/// Closed set of labels the detector understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectorLabel {
    Known { name: String, authorship: Authorship },
    Unrecognized(Option<String>),
}

impl DetectorLabel {
    pub fn parse(label: Option<&str>) -> Self {
        let authorship = match label {
            Some("Fake") | Some("LABEL_1") => Authorship::Machine,
            Some("Real") | Some("LABEL_0") => Authorship::Human,
            other => return DetectorLabel::Unrecognized(other.map(str::to_string)),
        };
        DetectorLabel::Known { name: label.unwrap_or_default().to_string(), authorship }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AssessError {
    #[error("classifier returned no predictions")]
    EmptyOutput,
    #[error("classifier returned label '{0}' without a score")]
    MissingScore(String),
}

/// A number, or the literal "N/A" when no value can be given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportedScore {
    Value(f64),
    NotAvailable,
}

impl Serialize for ReportedScore {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReportedScore::Value(v) => serializer.serialize_f64(*v),
            ReportedScore::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiReport {
    pub ai_score: ReportedScore,
    pub prediction_label: Option<String>,
    pub model_score: ReportedScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AiReport {
    /// Response for blank input; the classifier is not consulted.
    pub fn empty_input() -> Self {
        Self {
            ai_score: ReportedScore::Value(0.0),
            prediction_label: Some("N/A".to_string()),
            model_score: ReportedScore::Value(0.0),
            message: Some("Input text is empty.".to_string()),
        }
    }

    pub fn is_recognized(&self) -> bool { matches!(self.ai_score, ReportedScore::Value(_)) }
}

/// Cut `text` to at most `MAX_DETECTION_CHARS` characters. The flag reports whether
/// anything was removed.
pub fn truncate_for_detection(text: &str) -> (&str, bool) {
    match text.char_indices().nth(MAX_DETECTION_CHARS) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

/// Map the classifier's top prediction to an AI-likelihood report.
///
/// Unrecognized labels still produce a report, with `ai_score` set to "N/A".
pub fn assess(predictions: &[Prediction]) -> Result<AiReport, AssessError> {
    let top = predictions.first().ok_or(AssessError::EmptyOutput)?;
    match DetectorLabel::parse(top.label.as_deref()) {
        DetectorLabel::Known { name, authorship } => {
            let score = top.score.ok_or_else(|| AssessError::MissingScore(name.clone()))?;
            let ai_score = match authorship {
                Authorship::Machine => score,
                Authorship::Human => 1.0 - score,
            };
            Ok(AiReport {
                ai_score: ReportedScore::Value(round_to(ai_score, 3)),
                prediction_label: Some(name),
                model_score: ReportedScore::Value(round_to(score, 3)),
                message: None,
            })
        }
        DetectorLabel::Unrecognized(label) => {
            tracing::warn!(label = ?label, "unexpected label from AI model");
            Ok(AiReport {
                ai_score: ReportedScore::NotAvailable,
                prediction_label: label,
                model_score: top
                    .score
                    .map(|s| ReportedScore::Value(round_to(s, 3)))
                    .unwrap_or(ReportedScore::NotAvailable),
                message: Some("Model returned an unexpected label.".to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_labels_pass_score_through() {
        for label in ["Fake", "LABEL_1"] {
            let report = assess(&[Prediction::new(label, 0.95)]).unwrap();
            assert_eq!(report.ai_score, ReportedScore::Value(0.95));
            assert_eq!(report.model_score, ReportedScore::Value(0.95));
            assert_eq!(report.prediction_label.as_deref(), Some(label));
        }
    }

    #[test]
    fn human_labels_invert_score() {
        for label in ["Real", "LABEL_0"] {
            let report = assess(&[Prediction::new(label, 0.88)]).unwrap();
            assert_eq!(report.ai_score, ReportedScore::Value(0.12));
            assert!(report.is_recognized());
        }
    }

    #[test]
    fn unknown_label_degrades_to_not_available() {
        let report = assess(&[Prediction::new("Maybe", 0.51234)]).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["ai_score"], "N/A");
        assert_eq!(value["model_score"], 0.512);
        assert_eq!(value["prediction_label"], "Maybe");
        assert_eq!(value["message"], "Model returned an unexpected label.");

        let value = serde_json::to_value(assess(&[Prediction::default()]).unwrap()).unwrap();
        assert_eq!(value["model_score"], "N/A");
        assert!(value["prediction_label"].is_null());
    }

    #[test]
    fn malformed_output_is_an_error() {
        assert_eq!(assess(&[]), Err(AssessError::EmptyOutput));
        let missing = Prediction { label: Some("Fake".into()), score: None };
        assert_eq!(assess(&[missing]), Err(AssessError::MissingScore("Fake".into())));
    }

    #[test]
    fn truncation_counts_characters() {
        let text = "ü".repeat(MAX_DETECTION_CHARS + 5);
        let (cut, truncated) = truncate_for_detection(&text);
        assert!(truncated);
        assert_eq!(cut.chars().count(), MAX_DETECTION_CHARS);
        assert_eq!(truncate_for_detection("short"), ("short", false));
    }
}
