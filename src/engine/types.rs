// ============================
// Pipeline stage artifacts
// ============================

// Each stage consumes the previous stage's artifact and produces a new
// one; nothing here is mutated after creation. Serialized field order is
// the output column contract: new columns only ever get appended.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{MatchDecision, RawListing};
use crate::registry::specs::GpuModelSpec;

/// Value emitted by a heuristic. Untagged so tags serialize as plain JSON
/// scalars.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Bool(bool),
    Number(f64),
    Category(String),
}

/// Listing + decision + joined spec. `spec` is None for UNKNOWN models
/// (expected, no warning) and for registry misses (anomalous, warning set).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichedListing {
    pub listing: RawListing,
    pub decision: MatchDecision,
    pub spec: Option<GpuModelSpec>,
    pub enrich_warning: Option<String>,
}

/// Enriched record plus heuristic tags. Tags never overwrite each other;
/// duplicate tag names are rejected when the pipeline is assembled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaggedListing {
    #[serde(flatten)]
    pub enriched: EnrichedListing,
    pub tags: BTreeMap<String, TagValue>,
}

/// Terminal artifact of the pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredListing {
    #[serde(flatten)]
    pub tagged: TaggedListing,
    pub raw_score: f64,
    /// Continuous quantization fitness in [0, 1]; independent of the
    /// boolean capability tag.
    pub quantization_score: f64,
    pub adjusted_score: f64,
    /// Batch-rescaled onto 0-100.
    pub final_score: f64,
}
