//! Model identification tables: per-model aliases for the exact tier and
//! an ordered regex table for embedded mentions.
//!
//! The regex table is evaluated top to bottom, first match wins. The
//! `regex` crate has no lookaround, so cross-model collisions are handled
//! by ordering alone: qualified SKUs ("rtx 4070 ti", "quadro rtx 6000",
//! "a100 ... 80 gb") sit above the bare forms they would otherwise be
//! swallowed by. Keep it that way when adding entries.

use lazy_static::lazy_static;
use regex::Regex;

pub struct ModelAliases {
    pub key: &'static str,
    /// Normalized form (lowercase, single spaces).
    pub aliases: &'static [&'static str],
}

pub const ALIAS_TABLE: &[ModelAliases] = &[
    ModelAliases {
        key: "RTX_PRO_6000_BLACKWELL",
        aliases: &["rtx pro 6000", "rtx pro 6000 blackwell", "nvidia rtx pro 6000"],
    },
    ModelAliases {
        key: "RTX_6000_ADA",
        aliases: &["rtx 6000 ada", "rtx 6000 ada generation", "nvidia rtx 6000 ada"],
    },
    ModelAliases {
        key: "RTX_5000_ADA",
        aliases: &["rtx 5000 ada", "nvidia rtx 5000 ada"],
    },
    ModelAliases {
        key: "QUADRO_RTX_8000",
        aliases: &["quadro rtx 8000", "nvidia quadro rtx 8000"],
    },
    ModelAliases {
        key: "QUADRO_RTX_6000",
        aliases: &["quadro rtx 6000", "nvidia quadro rtx 6000"],
    },
    ModelAliases {
        key: "RTX_A6000",
        aliases: &["rtx a6000", "nvidia rtx a6000", "a6000"],
    },
    ModelAliases {
        key: "RTX_A5000",
        aliases: &["rtx a5000", "nvidia rtx a5000", "a5000"],
    },
    ModelAliases {
        key: "RTX_A4000",
        aliases: &["rtx a4000", "nvidia rtx a4000", "a4000"],
    },
    ModelAliases {
        key: "A40",
        aliases: &["nvidia a40", "a40"],
    },
    ModelAliases {
        key: "A100_80GB",
        aliases: &["nvidia a100 80gb", "a100 80gb"],
    },
    ModelAliases {
        key: "A100_40GB",
        aliases: &["nvidia a100 40gb", "a100 40gb", "a100"],
    },
    ModelAliases {
        key: "H100_80GB",
        aliases: &["nvidia h100", "h100 80gb", "h100"],
    },
    ModelAliases {
        key: "L40S",
        aliases: &["nvidia l40s", "l40s"],
    },
    ModelAliases {
        key: "L4",
        aliases: &["nvidia l4", "l4"],
    },
    ModelAliases {
        key: "V100_32GB",
        aliases: &["tesla v100 32gb", "v100 32gb"],
    },
    ModelAliases {
        key: "V100_16GB",
        aliases: &["tesla v100", "tesla v100 16gb", "v100"],
    },
    ModelAliases {
        key: "TESLA_T4",
        aliases: &["tesla t4", "nvidia t4"],
    },
    ModelAliases {
        key: "RTX_3090",
        aliases: &["rtx 3090", "geforce rtx 3090", "nvidia rtx 3090"],
    },
    ModelAliases {
        key: "RTX_4070_TI",
        aliases: &["rtx 4070 ti", "geforce rtx 4070 ti"],
    },
    ModelAliases {
        key: "RTX_4070",
        aliases: &["rtx 4070", "geforce rtx 4070"],
    },
    ModelAliases {
        key: "RTX_4080",
        aliases: &["rtx 4080", "geforce rtx 4080"],
    },
    ModelAliases {
        key: "RTX_4090",
        aliases: &["rtx 4090", "geforce rtx 4090", "nvidia rtx 4090"],
    },
    ModelAliases {
        key: "RTX_5090",
        aliases: &["rtx 5090", "geforce rtx 5090"],
    },
];

pub fn aliases_for(key: &str) -> Option<&'static [&'static str]> {
    ALIAS_TABLE
        .iter()
        .find(|entry| entry.key == key)
        .map(|entry| entry.aliases)
}

struct RegexRule {
    key: &'static str,
    pattern: &'static str,
}

/// Ordered, most specific first. First match wins.
const REGEX_RULES: &[RegexRule] = &[
    RegexRule { key: "RTX_PRO_6000_BLACKWELL", pattern: r"\brtx\s*pro\s*6000\b" },
    RegexRule { key: "RTX_6000_ADA", pattern: r"\brtx\s*6000\s*ada\b" },
    RegexRule { key: "QUADRO_RTX_8000", pattern: r"\bquadro\s*rtx\s*8000\b" },
    RegexRule { key: "QUADRO_RTX_6000", pattern: r"\bquadro\s*rtx\s*6000\b" },
    // Bare "rtx 6000": sellers mean the Ada card; the qualified forms are
    // consumed by the rules above.
    RegexRule { key: "RTX_6000_ADA", pattern: r"\brtx\s*6000\b" },
    RegexRule { key: "RTX_5000_ADA", pattern: r"\brtx\s*5000\s*ada\b" },
    RegexRule { key: "RTX_A6000", pattern: r"\brtx\s*a6000\b|\ba6000\b" },
    RegexRule { key: "RTX_A5000", pattern: r"\brtx\s*a5000\b|\ba5000\b" },
    RegexRule { key: "RTX_A4000", pattern: r"\brtx\s*a4000\b|\ba4000\b" },
    RegexRule { key: "A100_80GB", pattern: r"\ba100\b.*\b80\s*gb\b" },
    RegexRule { key: "A100_40GB", pattern: r"\ba100\b" },
    RegexRule { key: "H100_80GB", pattern: r"\bh100\b" },
    RegexRule { key: "L40S", pattern: r"\bl40s\b" },
    RegexRule { key: "L4", pattern: r"\bl4\b" },
    RegexRule { key: "A40", pattern: r"\ba40\b" },
    RegexRule { key: "V100_32GB", pattern: r"\bv100\b.*\b32\s*gb\b" },
    RegexRule { key: "V100_16GB", pattern: r"\bv100\b" },
    RegexRule { key: "TESLA_T4", pattern: r"\btesla\s+t4\b|\bnvidia\s+t4\b" },
    RegexRule { key: "RTX_4070_TI", pattern: r"\brtx\s*4070\s*ti\b" },
    RegexRule { key: "RTX_4070", pattern: r"\brtx\s*4070\b" },
    RegexRule { key: "RTX_4080", pattern: r"\brtx\s*4080\b" },
    RegexRule { key: "RTX_4090", pattern: r"\brtx\s*4090\b" },
    RegexRule { key: "RTX_3090", pattern: r"\brtx\s*3090\b" },
    RegexRule { key: "RTX_5090", pattern: r"\brtx\s*5090\b" },
];

lazy_static! {
    pub static ref REGEX_TABLE: Vec<(&'static str, Regex)> = REGEX_RULES
        .iter()
        .map(|rule| (rule.key, Regex::new(rule.pattern).unwrap()))
        .collect();
}
