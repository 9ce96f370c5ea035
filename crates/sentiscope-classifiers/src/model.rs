//! Contract between the classifier and a pretrained text model

use sentiscope_core::Result;

/// A fitted text-classification model: a feature transform plus a linear
/// classifier over the transform's vocabulary.
///
/// Implementations must be immutable once constructed; the classifier shares
/// them read-only across threads.
pub trait TextModel: Send + Sync {
    /// Known class labels, in the column order of `predict_proba`
    fn classes(&self) -> &[String];

    /// Predicted class label for each text
    fn predict(&self, texts: &[&str]) -> Result<Vec<String>>;

    /// Per-class probability row for each text
    fn predict_proba(&self, texts: &[&str]) -> Result<Vec<Vec<f64>>>;

    /// Labels and probability rows together.
    ///
    /// The default runs both calls; models that can share the feature
    /// transform between them should override it.
    fn predict_with_proba(&self, texts: &[&str]) -> Result<(Vec<String>, Vec<Vec<f64>>)> {
        Ok((self.predict(texts)?, self.predict_proba(texts)?))
    }

    /// Feature index to term, if the transform exposes one
    fn vocabulary(&self) -> Option<&[String]>;

    /// Coefficient matrix (row per class, column per feature), if exposed
    fn coefficients(&self) -> Option<&[Vec<f64>]>;

    /// Model name for logs and health reporting
    fn name(&self) -> &str;
}
