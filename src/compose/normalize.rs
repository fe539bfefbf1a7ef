use once_cell::sync::Lazy;
use regex::Regex;

static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").expect("valid space-run regex"));

/// Cleans the seams left by conditional assembly: collapses runs of spaces,
/// repairs comma spacing, trims, and drops one trailing comma. Idempotent.
pub fn clean_description(description: &str) -> String {
    let collapsed = SPACE_RUN_RE.replace_all(description, " ");
    let repaired = collapsed.replace(" , ", ", ").replace("., ", ", ");
    let trimmed = repaired.trim();
    trimmed.strip_suffix(',').unwrap_or(trimmed).to_string()
}
