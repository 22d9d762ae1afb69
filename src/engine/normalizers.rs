use deunicode::deunicode;
use regex::Regex;

/// Normalization for model matching: lowercase, URLs removed, unicode
/// folded to ASCII, whitespace collapsed. Punctuation stays because SKU
/// tokens like "3-slot" and "a6000" must survive intact.
pub fn normalize_for_matching(title: &str, notes: &str) -> String {
    lazy_static::lazy_static! {
        static ref URL_RE: Regex = Regex::new(r"https?://\S+").unwrap();
    }

    let combined = format!("{} {}", title, notes);

    let lower = combined.to_lowercase();
    let no_url = URL_RE.replace_all(&lower, "");
    let ascii = deunicode(&no_url);

    // collapse tabs/newlines/multiple spaces into a single space
    ascii
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Title-only normalization; exact and fuzzy tiers compare against this.
pub fn normalize_title(title: &str) -> String {
    normalize_for_matching(title, "")
}
