use std::path::Path;

use ndarray::Array2;
use tract_onnx::prelude::*;
use tracing::info;

use crate::error::{AppError, AppResult};

use super::ScoringModel;

type OnnxPlan = TypedSimplePlan<TypedModel>;

/// Pre-trained collaborative-filtering model loaded from an ONNX artifact.
///
/// The network internals are opaque; the only contract is a (1, dim) f32
/// input and a (1, dim) f32 output in the store's index space.
pub struct OnnxModel {
    plan: OnnxPlan,
    dim: usize,
}

impl OnnxModel {
    /// Loads and optimizes the model, pinning the input shape to (1, dim).
    pub fn load(path: impl AsRef<Path>, dim: usize) -> AppResult<Self> {
        let path = path.as_ref();
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| m.with_input_fact(0, f32::fact([1, dim]).into()))
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| AppError::Model(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), dim, "loaded scoring model");
        Ok(Self { plan, dim })
    }
}

impl ScoringModel for OnnxModel {
    fn score(&self, input: &Array2<f32>) -> AppResult<Array2<f32>> {
        if input.shape() != [1, self.dim] {
            return Err(AppError::Inference(format!(
                "expected input shape [1, {}], got {:?}",
                self.dim,
                input.shape()
            )));
        }

        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_shape(&[1, self.dim], &data)
            .map_err(|e| AppError::Inference(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| AppError::Inference(e.to_string()))?;

        let scores = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| AppError::Inference(e.to_string()))?;
        let scores: Vec<f32> = scores.iter().copied().collect();

        Array2::from_shape_vec((1, self.dim), scores)
            .map_err(|e| AppError::Inference(e.to_string()))
    }
}
