//! Turning a planner reply into subtopics

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading list markers: `1.`, `2)`, `-`, `*`, `•`
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+[.)]|[-*•])\s*").expect("list marker pattern is valid"));

/// Markdown bold, `**text**` or `__text__`
static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").expect("bold pattern is valid"));

/// Clean one reply line. Returns `None` for blank lines and `#` headings.
fn clean_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let line = LIST_MARKER.replace(line, "");
    let line = BOLD.replace_all(&line, "$1$2");
    let line = line.trim();

    (!line.is_empty()).then(|| line.to_string())
}

/// Extract up to `max_subtopics` subtopics from a planner reply.
///
/// Returns an empty list when nothing usable is found.
pub fn parse_subtopics(reply: &str, max_subtopics: usize) -> Vec<String> {
    reply
        .lines()
        .filter_map(clean_line)
        .take(max_subtopics)
        .collect()
}

/// Parsed subtopics, or `fallback` when the reply yields none
pub fn subtopics_or_fallback(
    reply: Option<&str>,
    max_subtopics: usize,
    fallback: &[String],
) -> Vec<String> {
    let parsed = reply
        .map(|r| parse_subtopics(r, max_subtopics))
        .unwrap_or_default();

    if parsed.is_empty() {
        tracing::warn!("Planner reply had no usable subtopics, using defaults");
        fallback.to_vec()
    } else {
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> Vec<String> {
        vec![
            "Technical challenges".to_string(),
            "Economic factors".to_string(),
            "Policy considerations".to_string(),
        ]
    }

    #[test]
    fn test_numbered_list_with_bold() {
        let reply = "# Subtopics\n\n1. **Grid infrastructure**: storage and transmission\n2) Financing models\n3. Regulatory frameworks\n4. Extra";
        let topics = parse_subtopics(reply, 3);

        assert_eq!(
            topics,
            vec![
                "Grid infrastructure: storage and transmission",
                "Financing models",
                "Regulatory frameworks",
            ]
        );
    }

    #[test]
    fn test_bullets() {
        let reply = "- Solar\n* Wind\n• Hydro";
        assert_eq!(parse_subtopics(reply, 3), vec!["Solar", "Wind", "Hydro"]);
    }

    #[test]
    fn test_limit() {
        assert_eq!(parse_subtopics("a\nb\nc", 2), vec!["a", "b"]);
    }

    #[test]
    fn test_only_headings_falls_back() {
        let topics = subtopics_or_fallback(Some("# Plan\n   \n## Done"), 3, &fallback());
        assert_eq!(topics, fallback());
    }

    #[test]
    fn test_missing_reply_falls_back() {
        assert_eq!(subtopics_or_fallback(None, 3, &fallback()), fallback());
    }

    #[test]
    fn test_bare_marker_line_dropped() {
        assert_eq!(parse_subtopics("1.\nSolar", 3), vec!["Solar"]);
    }
}
