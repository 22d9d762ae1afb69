use serde::Deserialize;

use crate::engine::heuristics::Heuristic;
use crate::engine::types::{EnrichedListing, TagValue};

pub const QUANTIZATION_TAG: &str = "quantization_capable";

/// Thresholds for the quantization heuristic. Defaults target single-card
/// 4-bit 70B-class inference: ~35 GB of weights plus a fixed OS/runtime
/// reservation.
#[derive(Debug, Clone, Deserialize)]
pub struct QuantizationCfg {
    #[serde(default = "default_min_vram_gb")]
    pub min_vram_gb: f64,
    #[serde(default = "default_max_tdp_watts")]
    pub max_tdp_watts: f64,
    #[serde(default = "default_min_mig_instances")]
    pub min_mig_instances: u32,
    /// VRAM the target model itself needs.
    #[serde(default = "default_target_model_vram_gb")]
    pub target_model_vram_gb: f64,
    /// Fixed OS/runtime reservation on top of the model.
    #[serde(default = "default_runtime_overhead_gb")]
    pub runtime_overhead_gb: f64,
    /// Spare VRAM beyond the requirement at which the continuous score
    /// saturates at 1.0.
    #[serde(default = "default_saturation_headroom_gb")]
    pub saturation_headroom_gb: f64,
}

fn default_min_vram_gb() -> f64 {
    24.0
}
fn default_max_tdp_watts() -> f64 {
    300.0
}
fn default_min_mig_instances() -> u32 {
    1
}
fn default_target_model_vram_gb() -> f64 {
    35.0
}
fn default_runtime_overhead_gb() -> f64 {
    2.0
}
fn default_saturation_headroom_gb() -> f64 {
    32.0
}

impl Default for QuantizationCfg {
    fn default() -> Self {
        Self {
            min_vram_gb: default_min_vram_gb(),
            max_tdp_watts: default_max_tdp_watts(),
            min_mig_instances: default_min_mig_instances(),
            target_model_vram_gb: default_target_model_vram_gb(),
            runtime_overhead_gb: default_runtime_overhead_gb(),
            saturation_headroom_gb: default_saturation_headroom_gb(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuantizationHeuristic {
    cfg: QuantizationCfg,
}

impl QuantizationHeuristic {
    pub fn new(cfg: QuantizationCfg) -> Self {
        Self { cfg }
    }

    fn capable(&self, record: &EnrichedListing) -> bool {
        let Some(spec) = &record.spec else {
            return false;
        };
        spec.vram_gb >= self.cfg.min_vram_gb
            && spec.tdp_watts <= self.cfg.max_tdp_watts
            && spec.mig_support >= self.cfg.min_mig_instances
    }

    /// Continuous fitness in [0, 1], from VRAM headroom above the target
    /// model requirement. 0 when the requirement is unmet or the record
    /// has no spec.
    pub fn continuous_score(&self, record: &EnrichedListing) -> f64 {
        let Some(spec) = &record.spec else {
            return 0.0;
        };
        let required = self.cfg.target_model_vram_gb + self.cfg.runtime_overhead_gb;
        let spare = spec.vram_gb - required;
        if spare < 0.0 {
            return 0.0;
        }
        if self.cfg.saturation_headroom_gb <= 0.0 {
            return 1.0;
        }
        (spare / self.cfg.saturation_headroom_gb).min(1.0)
    }
}

impl Heuristic for QuantizationHeuristic {
    fn name(&self) -> &'static str {
        QUANTIZATION_TAG
    }

    fn evaluate(&self, record: &EnrichedListing) -> TagValue {
        TagValue::Bool(self.capable(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MatchDecision, MatchType, RawListing};
    use crate::registry::specs::GpuModelSpec;

    fn make_record(spec: Option<GpuModelSpec>) -> EnrichedListing {
        EnrichedListing {
            listing: RawListing::from_title("test card"),
            decision: MatchDecision {
                canonical_model: spec
                    .as_ref()
                    .map(|s| s.key.clone())
                    .unwrap_or_else(|| "UNKNOWN".to_string()),
                match_type: MatchType::Regex,
                match_score: 0.9,
                is_valid_gpu: true,
                unknown_reason: None,
                match_notes: String::new(),
            },
            spec,
            enrich_warning: None,
        }
    }

    fn make_spec(vram_gb: f64, tdp_watts: f64, mig_support: u32) -> GpuModelSpec {
        GpuModelSpec {
            key: "TEST".to_string(),
            vram_gb,
            tdp_watts,
            mig_support,
            nvlink: false,
            generation: "Ampere".to_string(),
            cuda_cores: 6912,
            slot_width: 2,
            pcie_generation: 4,
        }
    }

    #[test]
    fn test_capable_requires_all_thresholds() {
        let heuristic = QuantizationHeuristic::default();

        // 48GB / 300W / MIG-capable: every threshold holds (300W inclusive).
        let record = make_record(Some(make_spec(48.0, 300.0, 4)));
        assert_eq!(heuristic.evaluate(&record), TagValue::Bool(true));

        // Each threshold alone breaks it.
        let record = make_record(Some(make_spec(16.0, 300.0, 4)));
        assert_eq!(heuristic.evaluate(&record), TagValue::Bool(false));
        let record = make_record(Some(make_spec(48.0, 301.0, 4)));
        assert_eq!(heuristic.evaluate(&record), TagValue::Bool(false));
        let record = make_record(Some(make_spec(48.0, 300.0, 0)));
        assert_eq!(heuristic.evaluate(&record), TagValue::Bool(false));

        // No spec -> not capable.
        let record = make_record(None);
        assert_eq!(heuristic.evaluate(&record), TagValue::Bool(false));
    }

    #[test]
    fn test_continuous_score_headroom() {
        let heuristic = QuantizationHeuristic::default();

        // Requirement: 35 + 2 = 37 GB.
        let below = make_record(Some(make_spec(24.0, 250.0, 1)));
        assert_eq!(heuristic.continuous_score(&below), 0.0);

        let at = make_record(Some(make_spec(37.0, 250.0, 1)));
        assert_eq!(heuristic.continuous_score(&at), 0.0);

        // 48 GB: 11 GB spare over a 32 GB saturation span.
        let mid = make_record(Some(make_spec(48.0, 250.0, 1)));
        assert!((heuristic.continuous_score(&mid) - 11.0 / 32.0).abs() < 1e-9);

        // 96 GB: 59 GB spare saturates at 1.0.
        let high = make_record(Some(make_spec(96.0, 250.0, 1)));
        assert_eq!(heuristic.continuous_score(&high), 1.0);

        assert_eq!(heuristic.continuous_score(&make_record(None)), 0.0);
    }

    #[test]
    fn test_continuous_score_is_monotonic_in_vram() {
        let heuristic = QuantizationHeuristic::default();
        let mut last = -1.0;
        for vram in [8.0, 24.0, 37.0, 40.0, 48.0, 64.0, 80.0, 96.0, 128.0] {
            let score = heuristic.continuous_score(&make_record(Some(make_spec(vram, 250.0, 1))));
            assert!(score >= last, "score dropped at {vram} GB");
            assert!((0.0..=1.0).contains(&score));
            last = score;
        }
    }
}
