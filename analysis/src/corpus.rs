use crate::tokenizer::normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("failed to parse corpus file {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
    #[error("duplicate corpus document id '{0}'")]
    DuplicateId(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(rename = "text")]
    pub raw_text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self { id: id.into(), raw_text: raw_text.into() }
    }
}

/// Ordered, immutable set of reference documents with their normalized tokens.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
    normalized: Vec<Vec<String>>,
}

const REFERENCE_DOCUMENTS: &[(&str, &str)] = &[
    (
        "doc1_histor_rome",
        "The Roman Empire was founded by Augustus in 27 BC. It spanned across Europe, North Africa, and the Middle East. Its fall in 476 AD marked the beginning of the Middle Ages in Western Europe. Rome's legacy includes its language, laws, architecture, and political institutions.",
    ),
    (
        "doc2_python_intro",
        "Python is a versatile and widely-used programming language. Known for its readability and extensive libraries, it's popular in web development, data science, and artificial intelligence. Guido van Rossum began working on Python in the late 1980s.",
    ),
    (
        "doc3_cooking_basics",
        "Cooking involves applying heat to food to transform its chemical and physical properties. Common methods include baking, frying, boiling, and grilling. Understanding basic techniques and ingredient combinations is key to successful cooking.",
    ),
    (
        "doc4_space_exploration",
        "Space exploration began with the launch of Sputnik 1 in 1957. Key milestones include the Apollo Moon landing in 1969 and the operations of the International Space Station. Future goals involve missions to Mars and beyond.",
    ),
];

impl Corpus {
    /// Build a corpus, normalizing every document once. Ids must be unique.
    pub fn new(documents: Vec<Document>) -> Result<Self, CorpusError> {
        let mut ids = HashSet::new();
        for doc in &documents {
            if !ids.insert(doc.id.as_str()) {
                return Err(CorpusError::DuplicateId(doc.id.clone()));
            }
        }
        let normalized = documents.iter().map(|d| normalize(&d.raw_text)).collect();
        Ok(Self { documents, normalized })
    }

    /// The built-in reference corpus.
    pub fn reference() -> Self {
        let documents = REFERENCE_DOCUMENTS.iter().map(|(id, text)| Document::new(*id, *text)).collect();
        Self::new(documents).expect("reference corpus ids are unique")
    }

    /// Load a JSON array of `{"id": ..., "text": ...}` objects.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| CorpusError::Read { path: display.clone(), source })?;
        let documents: Vec<Document> =
            serde_json::from_str(&raw).map_err(|source| CorpusError::Parse { path: display, source })?;
        Self::new(documents)
    }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    pub fn documents(&self) -> &[Document] { &self.documents }

    pub fn get(&self, index: usize) -> Option<&Document> { self.documents.get(index) }

    /// Normalized tokens per document, in corpus order.
    pub fn normalized(&self) -> &[Vec<String>] { &self.normalized }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_corpus_keeps_insertion_order() {
        let corpus = Corpus::reference();
        let ids: Vec<&str> = corpus.documents().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["doc1_histor_rome", "doc2_python_intro", "doc3_cooking_basics", "doc4_space_exploration"]);
        assert_eq!(corpus.normalized().len(), corpus.len());
        assert!(corpus.normalized()[1].contains(&"python".to_string()));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Corpus::new(vec![Document::new("a", "one"), Document::new("a", "two")]).unwrap_err();
        assert!(matches!(err, CorpusError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn empty_corpus_is_allowed() {
        let corpus = Corpus::new(Vec::new()).unwrap();
        assert!(corpus.is_empty());
        assert!(corpus.get(0).is_none());
    }
}
