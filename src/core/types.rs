use serde::{Deserialize, Serialize};

/// Sentinel canonical model for listings the matcher could not resolve.
pub const UNKNOWN_MODEL: &str = "UNKNOWN";

// ----------- Domain records -----------------

/// One marketplace row as handed over by an ingestion adapter. Immutable
/// once read; columns the engine never inspects ride along in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub title: String,
    #[serde(default)]
    pub bulk_notes: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub seller: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Probability from the external "is a GPU" classifier, when the
    /// ingestion side ran one. Carried through untouched; never consulted
    /// during matching.
    #[serde(default)]
    pub classifier_gpu_probability: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Method that produced a canonical-model decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Regex,
    Fuzzy,
    None,
}

/// Outcome of the model matcher for one listing.
///
/// Invariants: `Exact` carries 1.0, `Regex` the fixed 0.9, `Fuzzy` the
/// similarity ratio, `None` carries 0.0 and the UNKNOWN sentinel.
/// `unknown_reason` is present iff the listing is not a valid GPU or the
/// model stayed unknown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchDecision {
    pub canonical_model: String,
    pub match_type: MatchType,
    pub match_score: f64,
    pub is_valid_gpu: bool,
    pub unknown_reason: Option<String>,
    /// Audit trail: which rule, alias, pattern, or fuzzy candidate fired,
    /// with its raw score. Required for debugging and regression tests.
    pub match_notes: String,
}

impl RawListing {
    pub fn from_title(title: &str) -> Self {
        Self {
            title: title.to_string(),
            bulk_notes: String::new(),
            price: None,
            seller: None,
            region: None,
            url: None,
            classifier_gpu_probability: None,
            extra: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_passthrough_columns_survive_roundtrip() {
        let json = r#"{
            "title": "NVIDIA RTX A6000",
            "bulk_notes": "pulled from workstation",
            "price": 3500.0,
            "seller": "gpu_liquidators",
            "condition": "refurbished",
            "lot_size": 4
        }"#;

        let listing: RawListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.title, "NVIDIA RTX A6000");
        assert_eq!(listing.price, Some(3500.0));
        // Unknown columns land in the passthrough map untouched.
        assert_eq!(listing.extra["condition"], "refurbished");
        assert_eq!(listing.extra["lot_size"], 4);

        let out = serde_json::to_value(&listing).unwrap();
        assert_eq!(out["condition"], "refurbished");
        assert_eq!(out["lot_size"], 4);
    }

    #[test]
    fn test_match_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MatchType::Exact).unwrap(),
            "\"exact\""
        );
        assert_eq!(serde_json::to_string(&MatchType::None).unwrap(), "\"none\"");
    }
}
