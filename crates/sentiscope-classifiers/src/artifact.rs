//! Persisted model artifact format and loader
//!
//! The offline trainer exports its fitted TF-IDF + linear pipeline as a JSON
//! document. Loading parses it, validates every shape the inference path
//! relies on, and returns a ready [`LinearTextPipeline`].

use crate::linear::{LinearClassifier, MultiClass};
use crate::model::TextModel;
use crate::pipeline::LinearTextPipeline;
use crate::vectorizer::{Norm, TfidfVectorizer, DEFAULT_TOKEN_PATTERN};
use sentiscope_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Artifact format version understood by this loader
pub const FORMAT_VERSION: u32 = 1;

/// Top-level artifact document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub format_version: u32,

    /// Model name for logs and health reporting
    #[serde(default = "default_name")]
    pub name: String,

    /// Class labels in coefficient-row order
    pub classes: Vec<String>,

    pub vectorizer: VectorizerSpec,

    pub classifier: ClassifierSpec,
}

/// Fitted TF-IDF transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerSpec {
    /// Feature index to term
    pub vocabulary: Vec<String>,

    pub idf: Vec<f64>,

    #[serde(default = "default_ngram_range")]
    pub ngram_range: [usize; 2],

    #[serde(default = "default_true")]
    pub lowercase: bool,

    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,

    #[serde(default)]
    pub stop_words: Vec<String>,

    #[serde(default)]
    pub sublinear_tf: bool,

    #[serde(default)]
    pub norm: Norm,
}

/// Fitted linear classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSpec {
    pub coef: Vec<Vec<f64>>,

    pub intercept: Vec<f64>,

    #[serde(default)]
    pub multi_class: MultiClass,
}

impl ArtifactFile {
    /// Parse an artifact document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::artifact(format!("malformed artifact: {}", e)))
    }

    /// Validate and assemble the pipeline
    pub fn into_pipeline(self) -> Result<LinearTextPipeline> {
        if self.format_version != FORMAT_VERSION {
            return Err(Error::artifact(format!(
                "unsupported format_version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }

        let [min_n, max_n] = self.vectorizer.ngram_range;
        let vectorizer = TfidfVectorizer::new(self.vectorizer.vocabulary, self.vectorizer.idf)?
            .with_token_pattern(&self.vectorizer.token_pattern)?
            .with_ngram_range(min_n, max_n)?
            .with_stop_words(self.vectorizer.stop_words)
            .with_lowercase(self.vectorizer.lowercase)
            .with_sublinear_tf(self.vectorizer.sublinear_tf)
            .with_norm(self.vectorizer.norm);

        let classifier = LinearClassifier::new(
            self.classifier.coef,
            self.classifier.intercept,
            self.classifier.multi_class,
        )?;

        LinearTextPipeline::new(self.name, self.classes, vectorizer, classifier)
    }
}

/// Load a pipeline from an artifact file
pub fn load(path: impl AsRef<Path>) -> Result<LinearTextPipeline> {
    let path = path.as_ref();
    debug!("Reading model artifact from {}", path.display());

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::artifact(format!("{}: {}", path.display(), e)))?;

    let pipeline = ArtifactFile::from_json(&content)
        .and_then(ArtifactFile::into_pipeline)
        .map_err(|e| match e {
            Error::Artifact(msg) => Error::artifact(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;

    info!(
        "Model loaded successfully from {} (size: {:.1} MB, {} classes, {} terms)",
        path.display(),
        content.len() as f64 / 1e6,
        pipeline.classes().len(),
        pipeline.vectorizer().n_features()
    );

    Ok(pipeline)
}

fn default_name() -> String {
    "sentiment-tfidf-linear".to_string()
}

fn default_ngram_range() -> [usize; 2] {
    [1, 1]
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}
