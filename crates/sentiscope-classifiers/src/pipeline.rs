//! TF-IDF transform chained with a linear classifier

use crate::linear::{argmax, LinearClassifier};
use crate::model::TextModel;
use crate::vectorizer::TfidfVectorizer;
use sentiscope_core::{Error, Result};
use std::collections::HashSet;

/// A fitted text pipeline: `text -> tf-idf -> linear scores -> probabilities`
#[derive(Debug, Clone)]
pub struct LinearTextPipeline {
    name: String,
    classes: Vec<String>,
    vectorizer: TfidfVectorizer,
    classifier: LinearClassifier,
}

impl LinearTextPipeline {
    /// Chain a vectorizer and classifier, checking that their shapes agree
    pub fn new(
        name: impl Into<String>,
        classes: Vec<String>,
        vectorizer: TfidfVectorizer,
        classifier: LinearClassifier,
    ) -> Result<Self> {
        if classes.len() < 2 {
            return Err(Error::artifact(format!(
                "model needs at least two classes, got {}",
                classes.len()
            )));
        }

        let mut seen = HashSet::with_capacity(classes.len());
        if let Some(label) = classes.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(Error::artifact(format!("duplicate class label '{}'", label)));
        }

        if classifier.n_classes() != classes.len() {
            return Err(Error::artifact(format!(
                "{} coefficient rows do not match {} classes",
                classifier.n_rows(),
                classes.len()
            )));
        }

        if classifier.n_features() != vectorizer.n_features() {
            return Err(Error::artifact(format!(
                "classifier expects {} features but vocabulary has {} terms",
                classifier.n_features(),
                vectorizer.n_features()
            )));
        }

        Ok(Self {
            name: name.into(),
            classes,
            vectorizer,
            classifier,
        })
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &LinearClassifier {
        &self.classifier
    }

    fn proba_one(&self, text: &str) -> Result<Vec<f64>> {
        let features = self.vectorizer.transform(text);
        self.classifier.predict_proba(&features)
    }

    fn label_for(&self, probabilities: &[f64]) -> Result<String> {
        argmax(probabilities)
            .and_then(|i| self.classes.get(i))
            .cloned()
            .ok_or_else(|| Error::inference("empty probability row"))
    }
}

impl TextModel for LinearTextPipeline {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict(&self, texts: &[&str]) -> Result<Vec<String>> {
        texts
            .iter()
            .map(|text| self.label_for(&self.proba_one(text)?))
            .collect()
    }

    fn predict_proba(&self, texts: &[&str]) -> Result<Vec<Vec<f64>>> {
        texts.iter().map(|text| self.proba_one(text)).collect()
    }

    fn predict_with_proba(&self, texts: &[&str]) -> Result<(Vec<String>, Vec<Vec<f64>>)> {
        let rows = self.predict_proba(texts)?;
        let labels = rows
            .iter()
            .map(|row| self.label_for(row))
            .collect::<Result<Vec<_>>>()?;
        Ok((labels, rows))
    }

    fn vocabulary(&self) -> Option<&[String]> {
        Some(self.vectorizer.vocabulary())
    }

    fn coefficients(&self) -> Option<&[Vec<f64>]> {
        Some(self.classifier.coef())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
