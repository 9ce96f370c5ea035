//! Sentiscope Classifiers
//!
//! Review sentiment classification over a pretrained linear text model.
//!
//! - [`TextModel`]: what the classifier needs from a fitted model
//! - [`artifact`]: the persisted model format and its loader
//! - [`TfidfVectorizer`] and [`LinearClassifier`]: a native evaluation of
//!   the exported TF-IDF + linear pipeline
//! - [`explain`]: coefficient-based word ranking
//! - [`SentimentClassifier`]: the serving policy (short-input fallback,
//!   rounding, best-effort explanations, batch classification)
//!
//! All inference is CPU-only, synchronous, and free of shared mutable state.

pub mod artifact;
pub mod explain;
pub mod linear;
pub mod model;
pub mod pipeline;
pub mod sentiment;
pub mod vectorizer;

pub use artifact::ArtifactFile;
pub use explain::ExplanationError;
pub use linear::{LinearClassifier, MultiClass};
pub use model::TextModel;
pub use pipeline::LinearTextPipeline;
pub use sentiment::{fallback_verdict, SentimentClassifier};
pub use vectorizer::{Norm, SparseVector, TfidfVectorizer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::model::TextModel;
    pub use crate::pipeline::LinearTextPipeline;
    pub use crate::sentiment::SentimentClassifier;
    pub use sentiscope_core::{ClassProbabilities, Error, Result, Verdict};
}
