pub mod protocol;

pub use protocol::{completion_item_kind, to_completion_item, to_diagnostic};
