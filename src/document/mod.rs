pub mod store;

mod model;

pub use model::Document;
pub use store::{Forest, ForestSnapshot};
