use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::config::config::AppCfg;
use crate::core::types::{MatchDecision, MatchType, RawListing};
use crate::engine::enrich::enrich;
use crate::engine::heuristics::Heuristic;
use crate::engine::matcher::ModelMatcher;
use crate::engine::quantization::QuantizationHeuristic;
use crate::engine::scoring::{finalize_batch, ScoreStrategy, WeightedAdditiveStrategy};
use crate::engine::types::{EnrichedListing, ScoredListing, TaggedListing};
use crate::registry::specs::SpecRegistry;

/// Per-stage artifacts of one batch run, kept side by side so every
/// intermediate can be inspected or replayed on its own.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub decisions: Vec<MatchDecision>,
    pub enriched: Vec<EnrichedListing>,
    pub tagged: Vec<TaggedListing>,
    pub scored: Vec<ScoredListing>,
}

/// Orchestrates the fixed stage sequence: matcher -> enrichment join ->
/// heuristics in registration order -> scoring -> batch rescale. Stateless
/// between runs; identical input and configuration reproduce identical
/// output.
pub struct Pipeline {
    registry: SpecRegistry,
    matcher: ModelMatcher,
    heuristics: Vec<Box<dyn Heuristic>>,
    quantization: QuantizationHeuristic,
    strategy: Box<dyn ScoreStrategy>,
}

impl Pipeline {
    pub fn new(registry: SpecRegistry, cfg: &AppCfg) -> Result<Self> {
        let matcher = ModelMatcher::new(&registry, cfg.matcher.clone());
        let quantization = QuantizationHeuristic::new(cfg.heuristics.quantization.clone());
        let heuristics: Vec<Box<dyn Heuristic>> = vec![Box::new(quantization.clone())];
        let strategy = Box::new(WeightedAdditiveStrategy::new(cfg.scoring.clone()));
        Self::with_parts(registry, matcher, heuristics, quantization, strategy)
    }

    /// Assemble from explicit parts, so tests and alternative strategies
    /// plug in without touching the stage sequence.
    pub fn with_parts(
        registry: SpecRegistry,
        matcher: ModelMatcher,
        heuristics: Vec<Box<dyn Heuristic>>,
        quantization: QuantizationHeuristic,
        strategy: Box<dyn ScoreStrategy>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for heuristic in &heuristics {
            anyhow::ensure!(
                seen.insert(heuristic.name()),
                "duplicate heuristic tag name {}",
                heuristic.name()
            );
        }

        Ok(Self {
            registry,
            matcher,
            heuristics,
            quantization,
            strategy,
        })
    }

    pub fn run(&self, batch: &[RawListing]) -> PipelineRun {
        // Stage 1: model identification.
        let decisions: Vec<MatchDecision> = batch
            .iter()
            .map(|listing| self.matcher.match_listing(&listing.title, &listing.bulk_notes))
            .collect();

        // Stage 2: enrichment join.
        let enriched: Vec<EnrichedListing> = batch
            .iter()
            .cloned()
            .zip(decisions.iter().cloned())
            .map(|(listing, decision)| enrich(listing, decision, &self.registry))
            .collect();

        // Stage 3: heuristics, in registration order.
        let tagged: Vec<TaggedListing> = enriched
            .iter()
            .cloned()
            .map(|record| {
                let mut tags = BTreeMap::new();
                for heuristic in &self.heuristics {
                    tags.insert(heuristic.name().to_string(), heuristic.evaluate(&record));
                }
                TaggedListing {
                    enriched: record,
                    tags,
                }
            })
            .collect();

        // Stage 4: scoring, then the batch-level rescale once every
        // record's adjusted score is known.
        let scored: Vec<ScoredListing> = tagged
            .iter()
            .cloned()
            .map(|record| {
                let quantization_score = self.quantization.continuous_score(&record.enriched);
                let breakdown = self.strategy.score(&record, quantization_score);
                ScoredListing {
                    tagged: record,
                    raw_score: breakdown.raw,
                    quantization_score,
                    adjusted_score: breakdown.adjusted,
                    final_score: 0.0,
                }
            })
            .collect();
        let scored = finalize_batch(scored);

        let valid_gpus = decisions.iter().filter(|d| d.is_valid_gpu).count();
        let matched = decisions
            .iter()
            .filter(|d| d.match_type != MatchType::None)
            .count();
        info!(
            listings = batch.len(),
            valid_gpus, matched, "Pipeline run complete"
        );

        PipelineRun {
            decisions,
            enriched,
            tagged,
            scored,
        }
    }
}
