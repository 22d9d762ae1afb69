//! Pre-matching disqualification: competitor vendor signatures and
//! accessory/non-GPU keyword families. Both run on normalized text and
//! return the triggering pattern for the audit trail.

use aho_corasick::AhoCorasick;
use lazy_static::lazy_static;
use regex::Regex;

/// A disqualification hit: the machine-readable reason category for
/// `unknown_reason` plus the matched text for `match_notes`.
#[derive(Debug, Clone)]
pub struct RejectHit {
    pub reason: &'static str,
    pub matched: String,
}

struct VendorRule {
    reason: &'static str,
    pattern: Regex,
}

lazy_static! {
    static ref VENDOR_RULES: Vec<VendorRule> = vec![
        // AMD
        VendorRule { reason: "AMD GPU", pattern: Regex::new(r"\bradeon\b").unwrap() },
        VendorRule { reason: "AMD GPU", pattern: Regex::new(r"\brx\s?-?\d{3,4}\s?(xtx|xt|gre)?\b").unwrap() },
        VendorRule { reason: "AMD GPU", pattern: Regex::new(r"\binstinct\b").unwrap() },
        VendorRule { reason: "AMD GPU", pattern: Regex::new(r"\bmi\d{2,3}x?\b").unwrap() },
        VendorRule { reason: "AMD GPU", pattern: Regex::new(r"\bfirepro\b").unwrap() },
        VendorRule { reason: "AMD GPU", pattern: Regex::new(r"\bvega\s?(56|64)\b").unwrap() },
        // Intel
        VendorRule { reason: "Intel GPU", pattern: Regex::new(r"\bintel\s+arc\b").unwrap() },
        VendorRule { reason: "Intel GPU", pattern: Regex::new(r"\barc\s?[ab]\d{3}\b").unwrap() },
        VendorRule { reason: "Intel GPU", pattern: Regex::new(r"\bdata\s?center\s+gpu\s+(flex|max)\b").unwrap() },
        VendorRule { reason: "Intel GPU", pattern: Regex::new(r"\b(battlemage|alchemist)\b").unwrap() },
    ];
}

/// Keyword families for items that are not discrete GPUs at all. Family
/// label doubles as the `unknown_reason` category.
const ACCESSORY_FAMILIES: &[(&str, &[&str])] = &[
    (
        "NVLINK bridge/connector accessory",
        &[
            "nvlink bridge",
            "nvlink connector",
            "nvlink 2-slot",
            "nvlink 3-slot",
            "nvlink 4-slot",
            "slot brg",
            "sli bridge",
        ],
    ),
    (
        "capture device",
        &["capture card", "capture device", "video capture", "elgato"],
    ),
    (
        "sync module accessory",
        &["quadro sync", "sync module", "framelock"],
    ),
    (
        "streaming encoder",
        &["streaming encoder", "video encoder card"],
    ),
    (
        "cooling/mounting accessory",
        &["waterblock", "water block", "backplate", "heatsink only", "bracket only"],
    ),
];

lazy_static! {
    static ref ACCESSORY_PATTERNS: Vec<(&'static str, &'static str)> = ACCESSORY_FAMILIES
        .iter()
        .flat_map(|(reason, patterns)| patterns.iter().map(move |p| (*reason, *p)))
        .collect();
    static ref ACCESSORY_AC: AhoCorasick =
        AhoCorasick::new(ACCESSORY_PATTERNS.iter().map(|(_, p)| *p)).unwrap();
}

/// Unambiguous non-NVIDIA vendor signature, if any. Runs before any model
/// matching so numeric overlap (e.g. "RX 7600" vs "RTX 6000") can never
/// pull a competitor's card onto an NVIDIA canonical model.
pub fn vendor_disqualification(text: &str) -> Option<RejectHit> {
    for rule in VENDOR_RULES.iter() {
        if let Some(m) = rule.pattern.find(text) {
            return Some(RejectHit {
                reason: rule.reason,
                matched: m.as_str().to_string(),
            });
        }
    }
    None
}

/// Accessory / non-GPU keyword families.
pub fn non_gpu_rejection(text: &str) -> Option<RejectHit> {
    ACCESSORY_AC.find(text).map(|m| {
        let (reason, pattern) = ACCESSORY_PATTERNS[m.pattern().as_usize()];
        RejectHit {
            reason,
            matched: pattern.to_string(),
        }
    })
}
