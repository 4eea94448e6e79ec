pub mod corpus;
pub mod detector;
pub mod plagiarism;
pub mod similarity;
pub mod tokenizer;

pub use corpus::{Corpus, CorpusError, Document};
pub use plagiarism::{PlagiarismReport, Verdict, PLAGIARISM_THRESHOLD};
pub use similarity::{BestMatch, SimilarityRow, TermId, TermVector, TfidfModel};
