//! TF-IDF feature transform
//!
//! Re-applies a transform fitted offline: the vocabulary, idf weights and
//! tokenization settings all come from the artifact, nothing is learned here.

use regex::Regex;
use sentiscope_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Default token pattern: runs of two or more word characters
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Sparse feature vector as ascending `(feature index, value)` pairs
pub type SparseVector = Vec<(usize, f64)>;

/// Row normalization applied after idf weighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

/// TF-IDF vectorizer over a fixed vocabulary
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    /// Feature index to term
    vocabulary: Vec<String>,

    /// Term to feature index
    index: HashMap<String, usize>,

    /// Inverse document frequency per feature
    idf: Vec<f64>,

    token_pattern: Regex,
    stop_words: HashSet<String>,
    ngram_range: (usize, usize),
    lowercase: bool,
    sublinear_tf: bool,
    norm: Norm,
}

impl TfidfVectorizer {
    /// Create a unigram, lowercasing, l2-normalized vectorizer.
    ///
    /// Fails if `idf` and `vocabulary` differ in length or a term repeats.
    pub fn new(vocabulary: Vec<String>, idf: Vec<f64>) -> Result<Self> {
        if vocabulary.len() != idf.len() {
            return Err(Error::artifact(format!(
                "vocabulary has {} terms but idf has {} values",
                vocabulary.len(),
                idf.len()
            )));
        }

        let mut index = HashMap::with_capacity(vocabulary.len());
        for (i, term) in vocabulary.iter().enumerate() {
            if index.insert(term.clone(), i).is_some() {
                return Err(Error::artifact(format!("duplicate vocabulary term '{}'", term)));
            }
        }

        let token_pattern = Regex::new(DEFAULT_TOKEN_PATTERN)
            .map_err(|e| Error::internal(format!("default token pattern: {e}")))?;

        Ok(Self {
            vocabulary,
            index,
            idf,
            token_pattern,
            stop_words: HashSet::new(),
            ngram_range: (1, 1),
            lowercase: true,
            sublinear_tf: false,
            norm: Norm::L2,
        })
    }

    /// Set the token pattern
    pub fn with_token_pattern(mut self, pattern: &str) -> Result<Self> {
        self.token_pattern = Regex::new(pattern)
            .map_err(|e| Error::artifact(format!("invalid token pattern '{}': {}", pattern, e)))?;
        Ok(self)
    }

    /// Set the n-gram range (inclusive)
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Result<Self> {
        if min_n == 0 || min_n > max_n {
            return Err(Error::artifact(format!(
                "invalid ngram_range [{}, {}]",
                min_n, max_n
            )));
        }
        self.ngram_range = (min_n, max_n);
        Ok(self)
    }

    /// Set stop words, removed before n-grams are formed
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn with_sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.sublinear_tf = sublinear_tf;
        self
    }

    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = norm;
        self
    }

    /// Feature index to term
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Number of features produced by `transform`
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Tokens after lowercasing and stop-word removal
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };

        self.token_pattern
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .map(str::to_string)
            .collect()
    }

    /// Map text to its tf-idf vector
    pub fn transform(&self, text: &str) -> SparseVector {
        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.ngram_range;

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let gram = window.join(" ");
                if let Some(&idx) = self.index.get(&gram) {
                    *counts.entry(idx).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut features: SparseVector = counts
            .into_iter()
            .map(|(idx, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (idx, tf * self.idf[idx])
            })
            .collect();

        let magnitude = match self.norm {
            Norm::L2 => features.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Norm::L1 => features.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            Norm::None => 0.0,
        };
        if magnitude > 0.0 {
            for (_, v) in &mut features {
                *v /= magnitude;
            }
        }

        features
    }
}
