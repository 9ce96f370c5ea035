//! Coefficient-based explanation of a prediction
//!
//! The words reported for a verdict are the vocabulary terms with the
//! largest coefficients for the predicted class. This is a property of the
//! model, not of the input text.

use crate::model::TextModel;
use std::cmp::Ordering;

/// Number of top-ranked terms considered before thresholding
pub const CANDIDATE_POOL: usize = 10;

/// Minimum coefficient for a term to be reported
pub const COEFFICIENT_THRESHOLD: f64 = 0.05;

/// Maximum number of reported terms
pub const MAX_TOP_WORDS: usize = 5;

/// Reasons an explanation could not be produced
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExplanationError {
    #[error("predicted class '{0}' is not among the model classes")]
    UnknownClass(String),

    #[error("model exposes no vocabulary")]
    MissingVocabulary,

    #[error("model exposes no coefficients")]
    MissingCoefficients,

    #[error("no coefficient row for class index {class_index} ({rows} rows)")]
    MissingRow { class_index: usize, rows: usize },

    #[error("coefficient row has {coefficients} values for {vocabulary} vocabulary terms")]
    LengthMismatch { coefficients: usize, vocabulary: usize },
}

/// Terms pushing hardest toward `predicted`, strongest first
pub fn top_words(model: &dyn TextModel, predicted: &str) -> Result<Vec<String>, ExplanationError> {
    let class_index = model
        .classes()
        .iter()
        .position(|c| c == predicted)
        .ok_or_else(|| ExplanationError::UnknownClass(predicted.to_string()))?;

    let vocabulary = model.vocabulary().ok_or(ExplanationError::MissingVocabulary)?;
    let coefficients = model.coefficients().ok_or(ExplanationError::MissingCoefficients)?;

    let row = coefficients
        .get(class_index)
        .ok_or(ExplanationError::MissingRow {
            class_index,
            rows: coefficients.len(),
        })?;

    if row.len() != vocabulary.len() {
        return Err(ExplanationError::LengthMismatch {
            coefficients: row.len(),
            vocabulary: vocabulary.len(),
        });
    }

    Ok(rank_terms(row, CANDIDATE_POOL)
        .into_iter()
        .filter(|&i| row[i] > COEFFICIENT_THRESHOLD)
        .take(MAX_TOP_WORDS)
        .map(|i| vocabulary[i].clone())
        .collect())
}

/// Explanation sentence for a non-empty word list
pub fn message_for(predicted: &str, words: &[String]) -> String {
    format!(
        "Key words driving the '{}' prediction: {}",
        predicted,
        words.join(", ")
    )
}

/// Indices of the `limit` largest coefficients, largest first.
///
/// Equal coefficients keep ascending index order; NaN ranks last.
pub fn rank_terms(row: &[f64], limit: usize) -> Vec<usize> {
    let by_weight = |a: &usize, b: &usize| descending(row[*a], row[*b]).then(a.cmp(b));

    let mut indices: Vec<usize> = (0..row.len()).collect();
    let limit = limit.min(indices.len());
    if limit == 0 {
        return Vec::new();
    }

    if limit < indices.len() {
        indices.select_nth_unstable_by(limit - 1, by_weight);
        indices.truncate(limit);
    }
    indices.sort_by(by_weight);
    indices
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
