use serde::Deserialize;

use crate::engine::types::{ScoredListing, TaggedListing};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScoringCfg {
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub maxima: ScoreMaxima,
}

/// Named weights for the additive model. Conventionally sum to 1.0 but
/// are not required to.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_w_vram")]
    pub vram: f64,
    #[serde(default = "default_w_mig")]
    pub mig: f64,
    #[serde(default = "default_w_nvlink")]
    pub nvlink: f64,
    #[serde(default = "default_w_tdp")]
    pub tdp: f64,
    #[serde(default = "default_w_price")]
    pub price: f64,
}

fn default_w_vram() -> f64 {
    0.30
}
fn default_w_mig() -> f64 {
    0.20
}
fn default_w_nvlink() -> f64 {
    0.10
}
fn default_w_tdp() -> f64 {
    0.20
}
fn default_w_price() -> f64 {
    0.20
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            vram: default_w_vram(),
            mig: default_w_mig(),
            nvlink: default_w_nvlink(),
            tdp: default_w_tdp(),
            price: default_w_price(),
        }
    }
}

/// Normalization ceilings; attribute values are clamped here before
/// scaling into [0, 1].
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreMaxima {
    #[serde(default = "default_max_vram_gb")]
    pub vram_gb: f64,
    #[serde(default = "default_max_mig")]
    pub mig: u32,
    #[serde(default = "default_max_tdp_watts")]
    pub tdp_watts: f64,
    #[serde(default = "default_max_price")]
    pub price: f64,
}

fn default_max_vram_gb() -> f64 {
    96.0
}
fn default_max_mig() -> u32 {
    7
}
fn default_max_tdp_watts() -> f64 {
    600.0
}
fn default_max_price() -> f64 {
    10_000.0
}

impl Default for ScoreMaxima {
    fn default() -> Self {
        Self {
            vram_gb: default_max_vram_gb(),
            mig: default_max_mig(),
            tdp_watts: default_max_tdp_watts(),
            price: default_max_price(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreBreakdown {
    pub raw: f64,
    pub adjusted: f64,
}

/// Scoring formula behind a capability interface so alternative formulas
/// can be substituted without touching callers.
pub trait ScoreStrategy: Send + Sync {
    fn score(&self, record: &TaggedListing, quantization_score: f64) -> ScoreBreakdown;
}

pub struct WeightedAdditiveStrategy {
    cfg: ScoringCfg,
}

impl WeightedAdditiveStrategy {
    pub fn new(cfg: ScoringCfg) -> Self {
        Self { cfg }
    }
}

/// Clamp-and-scale into [0, 1].
fn norm(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    value.clamp(0.0, max) / max
}

impl ScoreStrategy for WeightedAdditiveStrategy {
    fn score(&self, record: &TaggedListing, quantization_score: f64) -> ScoreBreakdown {
        let weights = &self.cfg.weights;
        let maxima = &self.cfg.maxima;
        let spec = record.enriched.spec.as_ref();

        // A missing or non-positive attribute contributes 0 to its term;
        // the record stays comparable and ranks low instead of being
        // dropped. This also covers the inverse terms, where a zero TDP or
        // price would otherwise read as a perfect value.
        let vram_term = spec.map_or(0.0, |s| norm(s.vram_gb, maxima.vram_gb));
        let mig_term = spec.map_or(0.0, |s| norm(s.mig_support as f64, maxima.mig as f64));
        let nvlink_term = spec.map_or(0.0, |s| if s.nvlink { 1.0 } else { 0.0 });
        let tdp_term = spec
            .filter(|s| s.tdp_watts > 0.0)
            .map_or(0.0, |s| 1.0 - norm(s.tdp_watts, maxima.tdp_watts));
        let price_term = record
            .enriched
            .listing
            .price
            .filter(|price| *price > 0.0)
            .map_or(0.0, |price| 1.0 - norm(price, maxima.price));

        let raw = weights.vram * vram_term
            + weights.mig * mig_term
            + weights.nvlink * nvlink_term
            + weights.tdp * tdp_term
            + weights.price * price_term;
        let adjusted = raw * (1.0 + quantization_score);

        ScoreBreakdown { raw, adjusted }
    }
}

/// Rescale adjusted scores linearly onto 0-100 over the batch (min -> 0,
/// max -> 100). A batch whose scores are all equal, including a
/// single-record batch, maps to 100.
pub fn finalize_batch(mut records: Vec<ScoredListing>) -> Vec<ScoredListing> {
    if records.is_empty() {
        return records;
    }

    let min = records
        .iter()
        .map(|r| r.adjusted_score)
        .fold(f64::INFINITY, f64::min);
    let max = records
        .iter()
        .map(|r| r.adjusted_score)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    for record in &mut records {
        record.final_score = if span > 0.0 {
            (record.adjusted_score - min) / span * 100.0
        } else {
            100.0
        };
    }
    records
}
