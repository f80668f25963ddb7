pub mod store;

pub use store::{ContentRecord, ContentStore, InteractionRecord};
