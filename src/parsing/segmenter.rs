use crate::types::document::LanguageTrack;
use regex::Regex;
use std::sync::OnceLock;

/// Pieces at or below this many characters are treated as noise.
const MIN_SEGMENT_CHARS: usize = 5;
const HEADING_CHARS: usize = 50;

fn line_breaks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\r\n]+").expect("static regex"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

fn is_substantial(piece: &str) -> bool {
    piece.chars().count() > MIN_SEGMENT_CHARS
}

/// Splits pasted article text into paragraph segments and derives a heading.
///
/// This is a starting point for manual correction: paragraphs are whatever
/// sits between line breaks, and short fragments are dropped.
pub fn segment(raw_text: &str, label: &str) -> LanguageTrack {
    let mut segments: Vec<String> = line_breaks()
        .split(raw_text)
        .map(str::trim)
        .filter(|p| is_substantial(p))
        .map(String::from)
        .collect();

    if segments.is_empty() {
        let trimmed = raw_text.trim();
        if is_substantial(trimmed) {
            segments.push(trimmed.to_string());
        }
    }

    let heading = match segments.first() {
        Some(first) => derive_heading(first),
        None => format!("Untitled {}", label),
    };

    log::debug!(
        "segmented {} text into {} segment(s)",
        label,
        segments.len()
    );
    LanguageTrack { heading, segments }
}

fn derive_heading(first_segment: &str) -> String {
    let lead: String = first_segment.chars().take(HEADING_CHARS).collect();
    format!("{}...", whitespace_runs().replace_all(&lead, " "))
}
