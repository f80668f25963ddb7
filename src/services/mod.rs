pub mod recommender;

pub use recommender::{recommend, Recommendation};
