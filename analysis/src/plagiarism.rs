//! Plagiarism check: normalize the input, score it against the corpus and turn the
//! best score into a verdict.

use crate::corpus::{Corpus, Document};
use crate::similarity;
use crate::tokenizer::normalize;
use serde::Serialize;

/// Scores at or above this value are reported as potential plagiarism.
pub const PLAGIARISM_THRESHOLD: f64 = 0.70;

/// Number of characters of the matched document echoed back for review.
pub const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    InputEmpty,
    InputEmptyAfterProcessing,
    CorpusEmptyAfterProcessing,
    PotentialPlagiarism,
    NoSignificantSimilarity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlagiarismReport {
    pub status: Verdict,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corpus_document_preview: Option<String>,
}

impl PlagiarismReport {
    fn empty(status: Verdict, message: &str) -> Self {
        Self {
            status,
            score: 0.0,
            message: Some(message.to_string()),
            document_id: None,
            details: None,
            corpus_document_preview: None,
        }
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// First `PREVIEW_CHARS` characters of the document followed by an ellipsis.
pub fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    out.push_str("...");
    out
}

/// Run the full pipeline for one input text.
pub fn check(corpus: &Corpus, text: &str) -> PlagiarismReport {
    if text.trim().is_empty() {
        return PlagiarismReport::empty(Verdict::InputEmpty, "Input text is empty.");
    }
    let tokens = normalize(text);
    if tokens.is_empty() {
        return PlagiarismReport::empty(
            Verdict::InputEmptyAfterProcessing,
            "Input text contains only stopwords or punctuation.",
        );
    }
    let Some(row) = similarity::score(&tokens, corpus.normalized()) else {
        return PlagiarismReport::empty(
            Verdict::CorpusEmptyAfterProcessing,
            "Corpus documents are empty after preprocessing.",
        );
    };
    match row.best() {
        Some(best) => classify(best.score, corpus.get(best.index)),
        None => classify(0.0, None),
    }
}

/// Turn the best similarity score and its document into a verdict.
pub fn classify(best_score: f64, best_document: Option<&Document>) -> PlagiarismReport {
    let score = round_to(best_score, 2);
    match best_document {
        Some(doc) if best_score >= PLAGIARISM_THRESHOLD => PlagiarismReport {
            status: Verdict::PotentialPlagiarism,
            score,
            message: None,
            document_id: Some(doc.id.clone()),
            details: Some(format!("High similarity with document: '{}'.", doc.id)),
            corpus_document_preview: Some(preview(&doc.raw_text)),
        },
        Some(doc) if best_score > 0.0 && best_score < PLAGIARISM_THRESHOLD => PlagiarismReport {
            status: Verdict::NoSignificantSimilarity,
            score,
            message: None,
            document_id: Some(doc.id.clone()),
            details: Some(format!("Highest similarity ({score}) with document '{}', but below threshold.", doc.id)),
            corpus_document_preview: None,
        },
        _ => PlagiarismReport {
            status: Verdict::NoSignificantSimilarity,
            score,
            message: None,
            document_id: None,
            details: Some("No significant similarity found with corpus documents.".to_string()),
            corpus_document_preview: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        let doc = Document::new("d", "text");
        assert_eq!(classify(0.70, Some(&doc)).status, Verdict::PotentialPlagiarism);
        assert_eq!(classify(0.69, Some(&doc)).status, Verdict::NoSignificantSimilarity);
        assert_eq!(classify(1.0, Some(&doc)).score, 1.0);
    }

    #[test]
    fn threshold_applies_to_unrounded_score() {
        let doc = Document::new("d", "text");
        let report = classify(0.6951, Some(&doc));
        assert_eq!(report.score, 0.7);
        assert_eq!(report.status, Verdict::NoSignificantSimilarity);
        assert_eq!(report.details.as_deref(), Some("Highest similarity (0.7) with document 'd', but below threshold."));
    }

    #[test]
    fn below_threshold_names_best_document() {
        let doc = Document::new("doc_x", "text");
        let report = classify(0.4321, Some(&doc));
        assert_eq!(report.score, 0.43);
        assert_eq!(report.document_id.as_deref(), Some("doc_x"));
        assert_eq!(report.details.as_deref(), Some("Highest similarity (0.43) with document 'doc_x', but below threshold."));
        assert!(report.corpus_document_preview.is_none());
    }

    #[test]
    fn zero_score_uses_generic_message() {
        let doc = Document::new("doc_x", "text");
        for report in [classify(0.0, Some(&doc)), classify(0.0, None)] {
            assert_eq!(report.status, Verdict::NoSignificantSimilarity);
            assert!(report.document_id.is_none());
            assert_eq!(report.details.as_deref(), Some("No significant similarity found with corpus documents."));
        }
    }

    #[test]
    fn preview_is_bounded_by_characters() {
        let long = "é".repeat(250);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
        assert_eq!(preview("short"), "short...");
    }

    #[test]
    fn empty_verdicts_serialize_with_message() {
        let corpus = Corpus::reference();
        let value = serde_json::to_value(check(&corpus, "   ")).unwrap();
        assert_eq!(value, serde_json::json!({"status": "input_empty", "score": 0.0, "message": "Input text is empty."}));
    }
}
