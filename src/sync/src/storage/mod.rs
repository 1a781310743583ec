//! Workbook storage for the local draw history
//!
//! Loads the existing sheet, merges fresh draws into it and rewrites it.

pub mod merge;
pub mod repository;
pub mod schema;

pub use merge::{latest_code, merge_draws};
pub use repository::DrawRepository;
