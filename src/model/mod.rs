pub mod onnx;

pub use onnx::OnnxModel;

use ndarray::Array2;

use crate::error::AppResult;

/// Scoring capability consumed by the recommender.
///
/// Takes a single-row one-hot interaction vector of shape (1, D) and returns
/// predicted interaction scores of the same shape, one score per content
/// index in the store's mapping. Implementations must be safe to share
/// across concurrent requests.
pub trait ScoringModel: Send + Sync {
    fn score(&self, input: &Array2<f32>) -> AppResult<Array2<f32>>;
}
