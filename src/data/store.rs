use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use ndarray::Array2;
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, AppResult};

/// One row of the raw interaction dataset.
///
/// Extra columns in the CSV (e.g. a denormalized game name) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionRecord {
    pub user_id: i64,
    pub content_id: i64,
    pub view: f32,
}

/// One row of the content metadata dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentRecord {
    pub content_id: i64,
    pub game: String,
}

/// Immutable store of interaction and content data, built once at startup.
///
/// The index <-> content-id mapping is fixed at construction: column `i` of
/// the interaction matrix is the i-th distinct content id in ascending order.
/// Every request vector and score vector uses this same index space, so the
/// mapping must never change for the process lifetime.
pub struct ContentStore {
    content_ids: Vec<i64>,
    index_by_id: HashMap<i64, usize>,
    user_ids: Vec<i64>,
    interactions: Array2<f32>,
    games_by_id: HashMap<i64, String>,
}

impl ContentStore {
    /// Builds the store from already-parsed records.
    ///
    /// Pivots the interaction records into a users x items matrix, missing
    /// cells zero-filled.
    pub fn from_records(
        interactions: &[InteractionRecord],
        content: &[ContentRecord],
    ) -> AppResult<Self> {
        if interactions.is_empty() {
            return Err(AppError::Dataset(
                "interaction dataset has no records".to_string(),
            ));
        }

        let content_id_set: BTreeSet<i64> = interactions.iter().map(|r| r.content_id).collect();
        let user_id_set: BTreeSet<i64> = interactions.iter().map(|r| r.user_id).collect();

        let content_ids: Vec<i64> = content_id_set.into_iter().collect();
        let user_ids: Vec<i64> = user_id_set.into_iter().collect();

        let index_by_id: HashMap<i64, usize> = content_ids
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();
        let row_by_user: HashMap<i64, usize> = user_ids
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();

        let mut matrix = Array2::zeros((user_ids.len(), content_ids.len()));
        for record in interactions {
            let row = row_by_user[&record.user_id];
            let col = index_by_id[&record.content_id];
            matrix[[row, col]] = record.view;
        }

        let games_by_id: HashMap<i64, String> = content
            .iter()
            .map(|r| (r.content_id, r.game.clone()))
            .collect();

        Ok(Self {
            content_ids,
            index_by_id,
            user_ids,
            interactions: matrix,
            games_by_id,
        })
    }

    /// Loads both datasets from CSV files.
    pub fn load_from_files(
        interactions_path: impl AsRef<Path>,
        content_path: impl AsRef<Path>,
    ) -> AppResult<Self> {
        let interactions = read_csv::<InteractionRecord>(interactions_path.as_ref())?;
        let content = read_csv::<ContentRecord>(content_path.as_ref())?;

        let store = Self::from_records(&interactions, &content)?;
        info!(
            users = store.user_count(),
            items = store.dimension(),
            titles = store.games_by_id.len(),
            "loaded content store"
        );
        Ok(store)
    }

    /// Number of distinct content ids, i.e. the width of every interaction
    /// and score vector.
    pub fn dimension(&self) -> usize {
        self.content_ids.len()
    }

    /// Number of distinct users in the interaction dataset.
    pub fn user_count(&self) -> usize {
        self.user_ids.len()
    }

    /// Content id at vector index `idx`.
    ///
    /// Panics if `idx >= dimension()`; callers index with positions taken
    /// from the same store.
    pub fn content_id(&self, idx: usize) -> i64 {
        self.content_ids[idx]
    }

    /// Vector index of `content_id`, if it is known.
    pub fn index_of(&self, content_id: i64) -> Option<usize> {
        self.index_by_id.get(&content_id).copied()
    }

    /// Game name for `content_id`, if the metadata table has an entry.
    pub fn game_name(&self, content_id: i64) -> Option<&str> {
        self.games_by_id.get(&content_id).map(String::as_str)
    }

    /// Pivoted users x items view matrix.
    pub fn interactions(&self) -> &Array2<f32> {
        &self.interactions
    }
}

fn read_csv<T: serde::de::DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| AppError::Dataset(format!("{}: {}", path.display(), e)))?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record.map_err(|e| AppError::Dataset(format!("{}: {}", path.display(), e)))?);
    }
    Ok(records)
}
