//! Core types for Sentiscope

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Structured output of one classification call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Predicted class label
    pub sentiment: String,

    /// Maximum value in `probabilities`
    pub confidence: f64,

    /// Per-class probabilities, in the model's class order
    pub probabilities: ClassProbabilities,

    /// Terms that pushed hardest toward the predicted class (at most 5)
    pub top_words: Vec<String>,

    /// Human-readable explanation or diagnostic
    pub message: String,
}

impl Verdict {
    /// Build a verdict whose confidence is derived from the probabilities
    pub fn new(
        sentiment: impl Into<String>,
        probabilities: ClassProbabilities,
        top_words: Vec<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sentiment: sentiment.into(),
            confidence: probabilities.max(),
            probabilities,
            top_words,
            message: message.into(),
        }
    }
}

/// Ordered mapping from class label to probability.
///
/// Serialized as a JSON object whose keys keep the order they were inserted
/// in, which is the class order reported by the model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassProbabilities {
    entries: Vec<(String, f64)>,
}

impl ClassProbabilities {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a class; a label that is already present is overwritten in place
    pub fn insert(&mut self, label: impl Into<String>, probability: f64) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = probability,
            None => self.entries.push((label, probability)),
        }
    }

    /// Probability for a label
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| *p)
    }

    /// Iterate in class order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(l, p)| (l.as_str(), *p))
    }

    /// Labels in class order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Largest probability, 0.0 when empty
    pub fn max(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, p)| *p)
            .fold(None, |acc: Option<f64>, p| match acc {
                Some(m) if m >= p => Some(m),
                _ => Some(p),
            })
            .unwrap_or(0.0)
    }

    /// Sum of all probabilities
    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, f64)> for ClassProbabilities {
    fn from_iter<I: IntoIterator<Item = (L, f64)>>(iter: I) -> Self {
        let mut probabilities = Self::new();
        for (label, p) in iter {
            probabilities.insert(label, p);
        }
        probabilities
    }
}

impl Serialize for ClassProbabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, p) in &self.entries {
            map.serialize_entry(label, p)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ClassProbabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ProbabilitiesVisitor;

        impl<'de> Visitor<'de> for ProbabilitiesVisitor {
            type Value = ClassProbabilities;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of class label to probability")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut probabilities = ClassProbabilities::new();
                while let Some((label, p)) = access.next_entry::<String, f64>()? {
                    probabilities.insert(label, p);
                }
                Ok(probabilities)
            }
        }

        deserializer.deserialize_map(ProbabilitiesVisitor)
    }
}
