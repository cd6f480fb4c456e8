// src/pages/mod.rs
pub mod batch;
pub mod listing;

pub use batch::{run_batch, BatchContext, PageOutcome};
pub use listing::list_pages;
