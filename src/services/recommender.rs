use ndarray::Array2;
use serde::Serialize;
use tracing::debug;

use crate::data::ContentStore;
use crate::error::{AppError, AppResult};
use crate::model::ScoringModel;

/// A single ranked recommendation returned to the client.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub content_id: i64,
    pub score: f32,
    pub game: String,
}

/// Builds the one-hot interaction vector for a viewed-index list.
///
/// Index i of the returned (1, dim) row is 1.0 when i appears in `viewed`,
/// 0.0 otherwise. Every index must be within [0, dim); an out-of-range index
/// is reported, never silently skipped.
pub fn interaction_vector(viewed: &[usize], dim: usize) -> AppResult<Array2<f32>> {
    let mut vector = Array2::zeros((1, dim));
    for &idx in viewed {
        if idx >= dim {
            return Err(AppError::InvalidInput(format!(
                "content index {} out of range (known content indices are 0..{})",
                idx, dim
            )));
        }
        vector[[0, idx]] = 1.0;
    }
    Ok(vector)
}

/// Runs the full recommendation pipeline for one request.
///
/// Vectorizes the viewed list, scores it with the model, zeroes out
/// already-viewed positions, joins the remaining scores against content
/// metadata, then sorts by score descending, keeps the first `topn` rows and
/// drops non-positive scores.
pub fn recommend(
    model: &dyn ScoringModel,
    store: &ContentStore,
    viewed: &[usize],
    topn: usize,
) -> AppResult<Vec<Recommendation>> {
    let dim = store.dimension();
    let input = interaction_vector(viewed, dim)?;

    let scores = model.score(&input)?;
    if scores.shape() != [1, dim] {
        return Err(AppError::Inference(format!(
            "model returned shape {:?}, expected [1, {}]",
            scores.shape(),
            dim
        )));
    }

    // Never recommend what the user already viewed.
    let masked = &scores * &input.mapv(|v| if v == 0.0 { 1.0 } else { 0.0 });

    // Pairs are emitted in index order, so equal scores keep ascending
    // content-id order through the stable sort below. Ids without a metadata
    // entry are dropped here, matching the join against the metadata table.
    let mut ranked: Vec<Recommendation> = masked
        .row(0)
        .iter()
        .enumerate()
        .filter_map(|(idx, &score)| {
            let content_id = store.content_id(idx);
            store.game_name(content_id).map(|game| Recommendation {
                content_id,
                score,
                game: game.to_string(),
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(topn);
    ranked.retain(|r| r.score > 0.0);

    debug!(
        viewed = viewed.len(),
        returned = ranked.len(),
        "ranked recommendations"
    );
    Ok(ranked)
}
