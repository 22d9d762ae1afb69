use tracing::warn;

use crate::core::types::{MatchDecision, RawListing, UNKNOWN_MODEL};
use crate::engine::types::EnrichedListing;
use crate::registry::specs::SpecRegistry;

/// Pure registry join. A matched model missing from the registry degrades
/// the record with a structured warning instead of failing it; UNKNOWN
/// gets null spec fields with no warning, since absence is expected there.
pub fn enrich(
    listing: RawListing,
    decision: MatchDecision,
    registry: &SpecRegistry,
) -> EnrichedListing {
    if decision.canonical_model == UNKNOWN_MODEL {
        return EnrichedListing {
            listing,
            decision,
            spec: None,
            enrich_warning: None,
        };
    }

    match registry.lookup(&decision.canonical_model) {
        Some(spec) => EnrichedListing {
            listing,
            decision,
            spec: Some(spec.clone()),
            enrich_warning: None,
        },
        None => {
            warn!(
                model = %decision.canonical_model,
                "model matched but not present in registry"
            );
            let warning = format!(
                "model {} matched but not present in registry",
                decision.canonical_model
            );
            EnrichedListing {
                listing,
                decision,
                spec: None,
                enrich_warning: Some(warning),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MatchType;
    use crate::registry::specs::GpuModelSpec;

    fn make_registry() -> SpecRegistry {
        SpecRegistry::from_entries(vec![GpuModelSpec {
            key: "RTX_A6000".to_string(),
            vram_gb: 48.0,
            tdp_watts: 300.0,
            mig_support: 0,
            nvlink: true,
            generation: "Ampere".to_string(),
            cuda_cores: 10752,
            slot_width: 2,
            pcie_generation: 4,
        }])
        .unwrap()
    }

    fn make_decision(model: &str) -> MatchDecision {
        MatchDecision {
            canonical_model: model.to_string(),
            match_type: if model == UNKNOWN_MODEL {
                MatchType::None
            } else {
                MatchType::Regex
            },
            match_score: if model == UNKNOWN_MODEL { 0.0 } else { 0.9 },
            is_valid_gpu: true,
            unknown_reason: None,
            match_notes: String::new(),
        }
    }

    #[test]
    fn test_matched_model_gets_spec() {
        let registry = make_registry();
        let enriched = enrich(
            RawListing::from_title("rtx a6000"),
            make_decision("RTX_A6000"),
            &registry,
        );

        assert_eq!(enriched.spec.as_ref().unwrap().vram_gb, 48.0);
        assert!(enriched.enrich_warning.is_none());
    }

    #[test]
    fn test_unknown_model_is_not_a_warning() {
        let registry = make_registry();
        let enriched = enrich(
            RawListing::from_title("mystery card"),
            make_decision(UNKNOWN_MODEL),
            &registry,
        );

        assert!(enriched.spec.is_none());
        assert!(enriched.enrich_warning.is_none());
    }

    #[test]
    fn test_registry_miss_warns_but_proceeds() {
        let registry = make_registry();
        let enriched = enrich(
            RawListing::from_title("rtx 9000"),
            make_decision("RTX_9000"),
            &registry,
        );

        assert!(enriched.spec.is_none());
        assert!(enriched
            .enrich_warning
            .as_ref()
            .unwrap()
            .contains("not present in registry"));
    }

    #[test]
    fn test_enrichment_is_idempotent() {
        let registry = make_registry();
        let listing = RawListing::from_title("rtx a6000");
        let decision = make_decision("RTX_A6000");

        let first = enrich(listing.clone(), decision.clone(), &registry);
        let second = enrich(listing, decision, &registry);
        assert_eq!(first, second);
    }
}
