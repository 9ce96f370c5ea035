//! Linear classifier over sparse feature vectors

use crate::vectorizer::SparseVector;
use sentiscope_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// How per-row scores become class probabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiClass {
    /// Softmax over all rows
    #[default]
    Multinomial,
    /// Independent sigmoid per row, renormalized
    Ovr,
}

/// Fitted linear model: one coefficient row and intercept per class.
///
/// Binary models carry a single row scoring the second class.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    multi_class: MultiClass,
}

impl LinearClassifier {
    pub fn new(coef: Vec<Vec<f64>>, intercept: Vec<f64>, multi_class: MultiClass) -> Result<Self> {
        let n_features = match coef.first() {
            Some(row) => row.len(),
            None => return Err(Error::artifact("coefficient matrix has no rows")),
        };

        if let Some((i, row)) = coef.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(Error::artifact(format!(
                "coefficient row {} has {} columns, expected {}",
                i,
                row.len(),
                n_features
            )));
        }

        if intercept.len() != coef.len() {
            return Err(Error::artifact(format!(
                "intercept has {} values for {} coefficient rows",
                intercept.len(),
                coef.len()
            )));
        }

        Ok(Self {
            coef,
            intercept,
            multi_class,
        })
    }

    /// Coefficient matrix, row per class
    pub fn coef(&self) -> &[Vec<f64>] {
        &self.coef
    }

    pub fn n_features(&self) -> usize {
        self.coef[0].len()
    }

    pub fn n_rows(&self) -> usize {
        self.coef.len()
    }

    /// Number of classes this model scores (a single row means two)
    pub fn n_classes(&self) -> usize {
        if self.coef.len() == 1 {
            2
        } else {
            self.coef.len()
        }
    }

    /// Raw score per row: `coef · x + intercept`
    pub fn decision_function(&self, x: &SparseVector) -> Result<Vec<f64>> {
        let n_features = self.n_features();
        if let Some(&(idx, _)) = x.iter().find(|(idx, _)| *idx >= n_features) {
            return Err(Error::inference(format!(
                "feature index {} out of range for {} features",
                idx, n_features
            )));
        }

        Ok(self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| x.iter().map(|&(idx, v)| row[idx] * v).sum::<f64>() + b)
            .collect())
    }

    /// Class probabilities, one per class
    pub fn predict_proba(&self, x: &SparseVector) -> Result<Vec<f64>> {
        let scores = self.decision_function(x)?;

        let probabilities = if scores.len() == 1 {
            let p = sigmoid(scores[0]);
            vec![1.0 - p, p]
        } else {
            match self.multi_class {
                MultiClass::Multinomial => softmax(&scores),
                MultiClass::Ovr => {
                    let raw: Vec<f64> = scores.iter().map(|&s| sigmoid(s)).collect();
                    let total: f64 = raw.iter().sum();
                    if total > 0.0 {
                        raw.into_iter().map(|p| p / total).collect()
                    } else {
                        vec![1.0 / raw.len() as f64; raw.len()]
                    }
                }
            }
        };

        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(Error::inference("non-finite class probability"));
        }

        Ok(probabilities)
    }
}

/// Index of the largest value; ties resolve to the lowest index
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / total).collect()
}
