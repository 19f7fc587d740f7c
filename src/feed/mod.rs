pub mod document;

pub use document::{FeedDocument, FeedEntry};
