use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::core::types::{MatchDecision, MatchType, UNKNOWN_MODEL};
use crate::engine::fuzzy::{FuzzyCandidate, FuzzyMatcher};
use crate::engine::normalizers::{normalize_for_matching, normalize_title};
use crate::engine::patterns;
use crate::engine::rejects;
use crate::registry::specs::SpecRegistry;

/// Fixed score for regex-tier matches.
pub const REGEX_MATCH_SCORE: f64 = 0.9;

#[derive(Debug, Clone, Deserialize)]
pub struct MatcherCfg {
    /// Minimum fuzzy similarity (0-1, inclusive) to accept a candidate.
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
}

fn default_fuzzy_threshold() -> f64 {
    0.80
}

impl Default for MatcherCfg {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
        }
    }
}

/// Multi-stage model identification: vendor disqualification -> non-GPU
/// rejection -> exact alias -> regex table -> fuzzy -> none. Deterministic
/// given the registry and configuration; no state across calls.
pub struct ModelMatcher {
    cfg: MatcherCfg,
    /// (alias, key) pairs in table order; exact tier, first hit wins.
    exact: Vec<(String, String)>,
    /// (key, pattern) in table order; regex tier, first hit wins.
    regexes: Vec<(String, Regex)>,
    fuzzy: FuzzyMatcher,
}

impl ModelMatcher {
    /// The registry key set is the entire candidate universe: table
    /// entries without a registry row are dropped here, so no decision can
    /// ever name a key the registry does not know.
    pub fn new(registry: &SpecRegistry, cfg: MatcherCfg) -> Self {
        let mut exact = Vec::new();
        for entry in patterns::ALIAS_TABLE {
            if !registry.contains(entry.key) {
                warn!(key = entry.key, "alias table entry has no registry row; skipped");
                continue;
            }
            for alias in entry.aliases {
                exact.push((alias.to_string(), entry.key.to_string()));
            }
        }

        let mut regexes = Vec::new();
        for (key, re) in patterns::REGEX_TABLE.iter() {
            if registry.contains(key) {
                regexes.push((key.to_string(), re.clone()));
            } else {
                warn!(key, "regex table entry has no registry row; skipped");
            }
        }

        let mut candidates = Vec::new();
        for (index, spec) in registry.entries().iter().enumerate() {
            if let Some(aliases) = patterns::aliases_for(&spec.key) {
                for alias in aliases {
                    candidates.push(FuzzyCandidate {
                        key: spec.key.clone(),
                        alias: alias.to_string(),
                        registry_index: index,
                    });
                }
            }
        }
        let fuzzy = FuzzyMatcher::new(candidates, cfg.fuzzy_threshold);

        Self {
            cfg,
            exact,
            regexes,
            fuzzy,
        }
    }

    /// Decide the canonical model for one listing. Never fails: empty or
    /// malformed text simply falls through to `none`.
    pub fn match_listing(&self, title: &str, notes: &str) -> MatchDecision {
        let text = normalize_for_matching(title, notes);
        let norm_title = normalize_title(title);

        // 1. Vendor disqualification, ahead of everything else, so numeric
        // overlap with competitor SKUs can never produce a match.
        if let Some(hit) = rejects::vendor_disqualification(&text) {
            return MatchDecision {
                canonical_model: UNKNOWN_MODEL.to_string(),
                match_type: MatchType::None,
                match_score: 0.0,
                is_valid_gpu: false,
                unknown_reason: Some(hit.reason.to_string()),
                match_notes: format!(
                    "vendor disqualification: '{}' matched {} signature",
                    hit.matched, hit.reason
                ),
            };
        }

        // 2. Accessory / non-GPU rejection.
        if let Some(hit) = rejects::non_gpu_rejection(&text) {
            return MatchDecision {
                canonical_model: UNKNOWN_MODEL.to_string(),
                match_type: MatchType::None,
                match_score: 0.0,
                is_valid_gpu: false,
                unknown_reason: Some(hit.reason.to_string()),
                match_notes: format!("non-GPU rejection: keyword '{}' ({})", hit.matched, hit.reason),
            };
        }

        // 3. Exact: the whole normalized title equals a canonical
        // name/alias.
        for (alias, key) in &self.exact {
            if norm_title == *alias {
                return MatchDecision {
                    canonical_model: key.clone(),
                    match_type: MatchType::Exact,
                    match_score: 1.0,
                    is_valid_gpu: true,
                    unknown_reason: None,
                    match_notes: format!("exact: title equals alias '{alias}' of {key}"),
                };
            }
        }

        // 4. Regex table, in order.
        for (key, re) in &self.regexes {
            if let Some(m) = re.find(&text) {
                return MatchDecision {
                    canonical_model: key.clone(),
                    match_type: MatchType::Regex,
                    match_score: REGEX_MATCH_SCORE,
                    is_valid_gpu: true,
                    unknown_reason: None,
                    match_notes: format!("regex: pattern for {} matched '{}'", key, m.as_str()),
                };
            }
        }

        // 5. Fuzzy over canonical names/aliases; the rejected path still
        // records the best candidate and its similarity for the audit
        // trail.
        match self.fuzzy.best(&norm_title) {
            Some(outcome) if self.fuzzy.accepts(outcome.similarity) => MatchDecision {
                canonical_model: outcome.key.clone(),
                match_type: MatchType::Fuzzy,
                match_score: outcome.similarity,
                is_valid_gpu: true,
                unknown_reason: None,
                match_notes: format!(
                    "fuzzy: '{}' ~ alias '{}' of {} (similarity {:.3} >= threshold {:.3})",
                    norm_title,
                    outcome.alias,
                    outcome.key,
                    outcome.similarity,
                    self.cfg.fuzzy_threshold
                ),
            },
            Some(outcome) => MatchDecision {
                canonical_model: UNKNOWN_MODEL.to_string(),
                match_type: MatchType::None,
                match_score: 0.0,
                is_valid_gpu: true,
                unknown_reason: Some("unrecognized model".to_string()),
                match_notes: format!(
                    "no match: best fuzzy candidate '{}' ({}) at similarity {:.3}, below threshold {:.3}",
                    outcome.alias, outcome.key, outcome.similarity, self.cfg.fuzzy_threshold
                ),
            },
            None => MatchDecision {
                canonical_model: UNKNOWN_MODEL.to_string(),
                match_type: MatchType::None,
                match_score: 0.0,
                is_valid_gpu: true,
                unknown_reason: Some("unrecognized model".to_string()),
                match_notes: "no match: no exact, regex, or fuzzy candidate".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::specs::GpuModelSpec;

    fn spec(key: &str, vram_gb: f64) -> GpuModelSpec {
        GpuModelSpec {
            key: key.to_string(),
            vram_gb,
            tdp_watts: 300.0,
            mig_support: 0,
            nvlink: false,
            generation: "Ada".to_string(),
            cuda_cores: 10000,
            slot_width: 2,
            pcie_generation: 4,
        }
    }

    fn full_matcher() -> ModelMatcher {
        let registry = SpecRegistry::from_entries(vec![
            spec("RTX_PRO_6000_BLACKWELL", 96.0),
            spec("RTX_6000_ADA", 48.0),
            spec("QUADRO_RTX_6000", 24.0),
            spec("RTX_A6000", 48.0),
            spec("RTX_A5000", 24.0),
            spec("RTX_A4000", 16.0),
            spec("RTX_4070_TI", 12.0),
            spec("RTX_4070", 12.0),
            spec("RTX_4090", 24.0),
            spec("V100_16GB", 16.0),
        ])
        .unwrap();
        ModelMatcher::new(&registry, MatcherCfg::default())
    }

    #[test]
    fn test_regex_scenario_rtx_pro_6000() {
        let matcher = full_matcher();
        let decision = matcher.match_listing("PNY NVIDIA RTX PRO 6000 96GB", "");

        assert_eq!(decision.canonical_model, "RTX_PRO_6000_BLACKWELL");
        assert_eq!(decision.match_type, MatchType::Regex);
        assert_eq!(decision.match_score, 0.9);
        assert!(decision.is_valid_gpu);
        assert!(decision.unknown_reason.is_none());
        assert!(decision.match_notes.contains("RTX_PRO_6000_BLACKWELL"));
    }

    #[test]
    fn test_intel_scenario() {
        let matcher = full_matcher();
        let decision = matcher.match_listing("ASRock Intel Arc A380", "");

        assert!(!decision.is_valid_gpu);
        assert_eq!(decision.unknown_reason.as_deref(), Some("Intel GPU"));
        assert_eq!(decision.canonical_model, UNKNOWN_MODEL);
        assert_eq!(decision.match_type, MatchType::None);
    }

    #[test]
    fn test_nvlink_bridge_scenario() {
        let matcher = full_matcher();
        let decision = matcher.match_listing("NVIDIA NVLINK 3-SLOT BRG", "");

        assert!(!decision.is_valid_gpu);
        assert!(decision
            .unknown_reason
            .as_deref()
            .unwrap()
            .contains("NVLINK bridge/connector accessory"));
    }

    #[test]
    fn test_vendor_disqualification_beats_regex() {
        let matcher = full_matcher();
        // Contains a perfectly regex-matchable "RTX 4090", but the AMD
        // signature must win.
        let decision = matcher.match_listing("AMD Radeon RX 7900 XTX trade for RTX 4090", "");

        assert!(!decision.is_valid_gpu);
        assert_eq!(decision.unknown_reason.as_deref(), Some("AMD GPU"));
        assert_eq!(decision.canonical_model, UNKNOWN_MODEL);
    }

    #[test]
    fn test_exact_tier_on_clean_title() {
        let matcher = full_matcher();
        let decision = matcher.match_listing("NVIDIA RTX A6000", "");

        assert_eq!(decision.canonical_model, "RTX_A6000");
        assert_eq!(decision.match_type, MatchType::Exact);
        assert_eq!(decision.match_score, 1.0);
    }

    #[test]
    fn test_notes_participate_in_regex_tier() {
        let matcher = full_matcher();
        let decision =
            matcher.match_listing("Workstation GPU lot", "includes one RTX 4070 Ti, tested");

        assert_eq!(decision.canonical_model, "RTX_4070_TI");
        assert_eq!(decision.match_type, MatchType::Regex);
    }

    #[test]
    fn test_fuzzy_catches_typo() {
        let matcher = full_matcher();
        // One character short of the "rtx a6000" alias: similarity 8/9.
        let decision = matcher.match_listing("RTX A600", "");

        assert_eq!(decision.canonical_model, "RTX_A6000");
        assert_eq!(decision.match_type, MatchType::Fuzzy);
        assert!((decision.match_score - 8.0 / 9.0).abs() < 1e-9);
        assert!(decision.match_notes.contains("similarity"));
    }

    #[test]
    fn test_unmatched_hardware_stays_valid() {
        let matcher = full_matcher();
        let decision = matcher.match_listing("Generic workstation graphics card, untested", "");

        assert!(decision.is_valid_gpu);
        assert_eq!(decision.canonical_model, UNKNOWN_MODEL);
        assert_eq!(decision.match_type, MatchType::None);
        assert_eq!(decision.match_score, 0.0);
        assert_eq!(decision.unknown_reason.as_deref(), Some("unrecognized model"));
    }

    #[test]
    fn test_empty_text_never_panics() {
        let matcher = full_matcher();
        let decision = matcher.match_listing("", "");

        assert_eq!(decision.canonical_model, UNKNOWN_MODEL);
        assert_eq!(decision.match_type, MatchType::None);
        assert!(decision.is_valid_gpu);
    }

    #[test]
    fn test_table_entries_outside_registry_are_dropped() {
        // Registry with a single model: all other table entries vanish and
        // their SKUs come back unmatched rather than inventing keys.
        let registry = SpecRegistry::from_entries(vec![spec("RTX_A6000", 48.0)]).unwrap();
        let matcher = ModelMatcher::new(&registry, MatcherCfg::default());

        let decision = matcher.match_listing("NVIDIA RTX 4090 24GB", "");
        assert_eq!(decision.canonical_model, UNKNOWN_MODEL);

        let decision = matcher.match_listing("NVIDIA RTX A6000 48GB", "");
        assert_eq!(decision.canonical_model, "RTX_A6000");
    }

    #[test]
    fn test_decisions_are_deterministic() {
        let matcher = full_matcher();
        let first = matcher.match_listing("PNY NVIDIA RTX PRO 6000 96GB", "bulk lot of 3");
        let second = matcher.match_listing("PNY NVIDIA RTX PRO 6000 96GB", "bulk lot of 3");
        assert_eq!(first, second);
    }
}
