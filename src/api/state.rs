use std::sync::Arc;

use crate::data::ContentStore;
use crate::model::ScoringModel;

/// Shared application state
///
/// Everything in here is built before the listener binds and is read-only
/// afterwards, so concurrent handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContentStore>,
    pub model: Arc<dyn ScoringModel>,
    pub top_n: usize,
}

impl AppState {
    pub fn new(store: Arc<ContentStore>, model: Arc<dyn ScoringModel>, top_n: usize) -> Self {
        Self {
            store,
            model,
            top_n,
        }
    }
}
