//! The branch pointer: `HEAD` and its single branch ref.

pub mod head;
pub mod store;

pub use head::Head;
pub use store::{RefStore, DEFAULT_BRANCH};
