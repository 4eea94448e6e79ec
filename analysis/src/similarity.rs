use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

pub type TermId = u32;

lazy_static! {
    // Terms are runs of two or more word characters; single characters never become terms.
    static ref TERM: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("valid regex");
}

/// Split a space-joined token string into vectorizer terms.
pub fn analyze(text: &str) -> impl Iterator<Item = &str> {
    TERM.find_iter(text).map(|m| m.as_str())
}

/// Sparse, L2-normalized term weights sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: Vec<(TermId, f64)>,
}

impl TermVector {
    pub fn is_zero(&self) -> bool { self.weights.is_empty() }

    pub fn weights(&self) -> &[(TermId, f64)] { &self.weights }

    /// Cosine similarity. Both vectors are unit length (or empty), so this is the
    /// dot product, clamped into [0, 1] to absorb rounding.
    pub fn cosine(&self, other: &TermVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0f64;
        while i < self.weights.len() && j < other.weights.len() {
            let (a_id, a_w) = self.weights[i];
            let (b_id, b_w) = other.weights[j];
            if a_id == b_id {
                dot += a_w * b_w;
                i += 1;
                j += 1;
            } else if a_id < b_id {
                i += 1;
            } else {
                j += 1;
            }
        }
        dot.clamp(0.0, 1.0)
    }
}

/// TF-IDF vector space fitted on a set of documents.
///
/// Weights are raw term counts times smoothed IDF `ln((1 + n) / (1 + df)) + 1`, with
/// each vector L2-normalized.
#[derive(Debug, Default)]
pub struct TfidfModel {
    dictionary: HashMap<String, TermId>,
    df: Vec<u32>,
    idf: Vec<f64>,
}

impl TfidfModel {
    /// Fit vocabulary and IDF weights. Each document is one space-joined string.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut model = TfidfModel::default();
        for doc in documents {
            let mut seen: Vec<TermId> = Vec::new();
            for term in analyze(doc.as_ref()) {
                let next_id = model.dictionary.len() as TermId;
                let tid = *model.dictionary.entry(term.to_string()).or_insert(next_id);
                if tid == next_id {
                    model.df.push(0);
                }
                if !seen.contains(&tid) {
                    seen.push(tid);
                    model.df[tid as usize] += 1;
                }
            }
        }
        let n = documents.len() as f64;
        model.idf = model
            .df
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();
        model
    }

    pub fn vocabulary_len(&self) -> usize { self.dictionary.len() }

    /// Project text into the fitted space. Terms outside the vocabulary are dropped.
    pub fn transform(&self, text: &str) -> TermVector {
        let mut tf: HashMap<TermId, u32> = HashMap::new();
        for term in analyze(text) {
            if let Some(&tid) = self.dictionary.get(term) {
                *tf.entry(tid).or_insert(0) += 1;
            }
        }
        let mut weights: Vec<(TermId, f64)> = tf
            .into_iter()
            .map(|(tid, count)| (tid, count as f64 * self.idf[tid as usize]))
            .collect();
        weights.sort_by_key(|&(tid, _)| tid);
        let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return TermVector::default();
        }
        for (_, w) in weights.iter_mut() {
            *w /= norm;
        }
        TermVector { weights }
    }
}

/// Similarity of one input against the corpus documents that survived normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityRow {
    /// Original corpus positions of the scored documents, in corpus order.
    pub valid_indices: Vec<usize>,
    /// One score per entry of `valid_indices`.
    pub scores: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch {
    /// Position in the full corpus.
    pub index: usize,
    pub score: f64,
}

impl SimilarityRow {
    /// Highest score; ties go to the earliest document.
    pub fn best(&self) -> Option<BestMatch> {
        let mut best: Option<BestMatch> = None;
        for (&index, &score) in self.valid_indices.iter().zip(&self.scores) {
            match best {
                Some(b) if score <= b.score => {}
                _ => best = Some(BestMatch { index, score }),
            }
        }
        best
    }
}

/// Score normalized input tokens against normalized corpus documents.
///
/// Documents with no tokens are skipped. Returns `None` when none remain, in which
/// case nothing is vectorized. The vector space is fitted on the remaining corpus
/// documents only.
pub fn score<T: AsRef<str>>(input: &[T], corpus: &[Vec<String>]) -> Option<SimilarityRow> {
    let valid_indices: Vec<usize> = corpus
        .iter()
        .enumerate()
        .filter(|(_, tokens)| !tokens.is_empty())
        .map(|(i, _)| i)
        .collect();
    if valid_indices.is_empty() {
        return None;
    }

    let joined: Vec<String> = valid_indices.iter().map(|&i| corpus[i].join(" ")).collect();
    let model = TfidfModel::fit(&joined);
    if model.vocabulary_len() == 0 {
        tracing::debug!(docs = joined.len(), "corpus produced an empty vocabulary");
    }

    let input_joined = input.iter().map(|t| t.as_ref()).collect::<Vec<&str>>().join(" ");
    let input_vector = model.transform(&input_joined);
    let scores = joined
        .iter()
        .map(|doc| model.transform(doc).cosine(&input_vector))
        .collect();
    Some(SimilarityRow { valid_indices, scores })
}
