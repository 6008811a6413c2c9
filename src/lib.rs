// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod ingest;
pub mod metrics;
pub mod sentiment;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router;
pub use crate::ingest::{normalize_text, run_once, PipelineDeps, RunSummary};
pub use crate::store::{MemoryStore, NewsRecord, NewsStore};
