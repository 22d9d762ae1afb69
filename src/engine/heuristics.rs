use crate::engine::types::{EnrichedListing, TagValue};

/// One self-contained classifier over an enriched record. Implementations
/// own their configuration; the pipeline only sees this interface, so new
/// heuristics plug in without touching the orchestrator.
pub trait Heuristic: Send + Sync {
    /// Tag name the evaluation result is stored under.
    fn name(&self) -> &'static str;

    fn evaluate(&self, record: &EnrichedListing) -> TagValue;
}
