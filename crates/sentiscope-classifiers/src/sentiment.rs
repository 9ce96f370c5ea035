//! Review sentiment classifier
//!
//! Wraps a loaded [`TextModel`] with the serving policy: short-input
//! fallback, probability rounding, and best-effort explanations. The model is
//! loaded once and shared read-only; a failed load leaves the classifier in
//! an unavailable state where every call returns [`Error::ModelUnavailable`].

use crate::artifact;
use crate::explain;
use crate::model::TextModel;
use sentiscope_core::{ClassProbabilities, Error, Result, Verdict};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Trimmed inputs shorter than this many characters skip inference
pub const MIN_TEXT_CHARS: usize = 3;

pub const TOO_SHORT_MESSAGE: &str = "Review too short";
pub const NO_EXPLANATION_MESSAGE: &str = "No explanation available";

enum ModelState {
    Available(Arc<dyn TextModel>),
    Unavailable { reason: String },
}

/// Sentiment classifier over a shared, immutable model
pub struct SentimentClassifier {
    state: ModelState,
}

impl SentimentClassifier {
    /// Create a classifier backed by a loaded model
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self {
            state: ModelState::Available(model),
        }
    }

    /// Create a classifier with no model; every call fails with `ModelUnavailable`
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: ModelState::Unavailable {
                reason: reason.into(),
            },
        }
    }

    /// Load the model artifact at `path`.
    ///
    /// Never fails: a load error is logged and yields an unavailable classifier.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match artifact::load(path) {
            Ok(pipeline) => {
                info!("Sentiment model '{}' ready", pipeline.name());
                Self::new(Arc::new(pipeline))
            }
            Err(e) => {
                error!("Failed to load model from {}: {}", path.display(), e);
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, ModelState::Available(_))
    }

    /// Name of the loaded model, if any
    pub fn model_name(&self) -> Option<&str> {
        match &self.state {
            ModelState::Available(model) => Some(model.name()),
            ModelState::Unavailable { .. } => None,
        }
    }

    /// Why the model is unavailable, if it is
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.state {
            ModelState::Available(_) => None,
            ModelState::Unavailable { reason } => Some(reason),
        }
    }

    /// Classify one review.
    ///
    /// Returns `ModelUnavailable` without a model and `Inference` when the
    /// model fails; explanation problems only degrade `top_words`/`message`.
    pub fn classify(&self, text: &str) -> Result<Verdict> {
        let model = self.model()?;

        if is_too_short(text) {
            return Ok(fallback_verdict());
        }

        let start = Instant::now();
        let (sentiment, probabilities) = infer(model, &[text])
            .map_err(|e| {
                error!("Prediction error: {}", e);
                e
            })?
            .pop()
            .ok_or_else(|| Error::inference("model returned no prediction"))?;

        let (top_words, message) = explanation(model, &sentiment);

        debug!(
            sentiment = %sentiment,
            latency_us = start.elapsed().as_micros() as u64,
            "Classified review"
        );

        Ok(Verdict::new(sentiment, probabilities, top_words, message))
    }

    /// Classify many reviews, one result per input in input order.
    ///
    /// Short inputs get the same fallback as [`classify`](Self::classify).
    /// The rest share a single model call; if it fails, each of them carries
    /// the same `Inference` error. Explanations are not computed.
    pub fn classify_batch(&self, texts: &[&str]) -> Vec<Result<Verdict>> {
        let model = match self.model() {
            Ok(model) => model,
            Err(_) => return texts.iter().map(|_| Err(Error::ModelUnavailable)).collect(),
        };

        let inputs: Vec<&str> = texts.iter().copied().filter(|t| !is_too_short(t)).collect();
        let inferred = if inputs.is_empty() {
            Ok(Vec::new())
        } else {
            infer(model, &inputs)
        };
        let mut inferred = inferred.map(|rows| rows.into_iter());

        if let Err(e) = &inferred {
            error!("Batch prediction error: {}", e);
        }

        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            if is_too_short(text) {
                results.push(Ok(fallback_verdict()));
                continue;
            }
            let verdict = match &mut inferred {
                Ok(rows) => rows
                    .next()
                    .map(|(sentiment, probabilities)| {
                        Verdict::new(sentiment, probabilities, Vec::new(), "")
                    })
                    .ok_or_else(|| Error::inference("model returned too few predictions")),
                Err(e) => Err(Error::inference(inference_message(e))),
            };
            results.push(verdict);
        }

        results
    }

    fn model(&self) -> Result<&dyn TextModel> {
        match &self.state {
            ModelState::Available(model) => Ok(model.as_ref()),
            ModelState::Unavailable { .. } => Err(Error::ModelUnavailable),
        }
    }
}

/// The fixed verdict for empty or near-empty input
pub fn fallback_verdict() -> Verdict {
    let probabilities: ClassProbabilities = [("negative", 0.0), ("neutral", 1.0), ("positive", 0.0)]
        .into_iter()
        .collect();

    Verdict {
        sentiment: "neutral".to_string(),
        confidence: 0.0,
        probabilities,
        top_words: Vec::new(),
        message: TOO_SHORT_MESSAGE.to_string(),
    }
}

fn is_too_short(text: &str) -> bool {
    trim_review(text).chars().count() < MIN_TEXT_CHARS
}

/// Trim Unicode whitespace and the ASCII information separators (U+001C..U+001F)
fn trim_review(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
}

/// Round to 4 decimal places
fn round4(p: f64) -> f64 {
    (p * 10_000.0).round() / 10_000.0
}

/// Predicted label and rounded class probabilities for each text
fn infer(model: &dyn TextModel, texts: &[&str]) -> Result<Vec<(String, ClassProbabilities)>> {
    let (labels, rows) = model.predict_with_proba(texts).map_err(as_inference)?;
    let classes = model.classes();

    if labels.len() != texts.len() || rows.len() != texts.len() {
        return Err(Error::inference(format!(
            "model returned {} labels and {} probability rows for {} texts",
            labels.len(),
            rows.len(),
            texts.len()
        )));
    }

    labels
        .into_iter()
        .zip(rows)
        .map(|(label, row)| {
            if row.len() != classes.len() {
                return Err(Error::inference(format!(
                    "probability row has {} values for {} classes",
                    row.len(),
                    classes.len()
                )));
            }
            let probabilities = classes
                .iter()
                .zip(row)
                .map(|(class, p)| (class.as_str(), round4(p)))
                .collect();
            Ok((label, probabilities))
        })
        .collect()
}

/// Explanation fields for a verdict; failures degrade to the diagnostic message
fn explanation(model: &dyn TextModel, sentiment: &str) -> (Vec<String>, String) {
    match explain::top_words(model, sentiment) {
        Ok(words) if !words.is_empty() => {
            let message = explain::message_for(sentiment, &words);
            (words, message)
        }
        Ok(_) => (Vec::new(), NO_EXPLANATION_MESSAGE.to_string()),
        Err(e) => {
            warn!(model = model.name(), "Explanation error: {}", e);
            (Vec::new(), NO_EXPLANATION_MESSAGE.to_string())
        }
    }
}

fn as_inference(e: Error) -> Error {
    match e {
        Error::Inference(msg) => Error::Inference(msg),
        other => Error::Inference(other.to_string()),
    }
}

fn inference_message(e: &Error) -> String {
    match e {
        Error::Inference(msg) => msg.clone(),
        other => other.to_string(),
    }
}
