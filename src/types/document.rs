//*** START FILE: src/types/document.rs ***//
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackId {
    A,
    B,
}

impl TrackId {
    pub fn other(self) -> Self {
        match self {
            TrackId::A => TrackId::B,
            TrackId::B => TrackId::A,
        }
    }
}

/// Human-facing names for the two tracks, e.g. "Bangla" / "English".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackLabels {
    pub a: String,
    pub b: String,
}

impl TrackLabels {
    pub fn new(a: &str, b: &str) -> Self {
        Self {
            a: a.to_string(),
            b: b.to_string(),
        }
    }

    pub fn get(&self, track: TrackId) -> &str {
        match track {
            TrackId::A => &self.a,
            TrackId::B => &self.b,
        }
    }
}

impl Default for TrackLabels {
    fn default() -> Self {
        Self::new("Bangla", "English")
    }
}

/// One language's heading plus its ordered segments.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageTrack {
    #[serde(default)]
    pub heading: String,
    #[serde(default, alias = "sentences")]
    pub segments: Vec<String>,
}

impl LanguageTrack {
    pub fn new(heading: impl Into<String>, segments: Vec<String>) -> Self {
        Self {
            heading: heading.into(),
            segments,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Two tracks whose segments are aligned by index. The tracks may differ in
/// length; a missing entry renders as an empty block.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentDocument {
    #[serde(alias = "bn")]
    pub track_a: LanguageTrack,
    #[serde(alias = "en")]
    pub track_b: LanguageTrack,
}

impl AlignmentDocument {
    pub fn new(track_a: LanguageTrack, track_b: LanguageTrack) -> Self {
        Self { track_a, track_b }
    }

    pub fn track(&self, id: TrackId) -> &LanguageTrack {
        match id {
            TrackId::A => &self.track_a,
            TrackId::B => &self.track_b,
        }
    }

    pub fn track_mut(&mut self, id: TrackId) -> &mut LanguageTrack {
        match id {
            TrackId::A => &mut self.track_a,
            TrackId::B => &mut self.track_b,
        }
    }

    /// Number of rendered pairs: the longer of the two tracks.
    pub fn row_count(&self) -> usize {
        self.track_a.len().max(self.track_b.len())
    }
}

/// Which track is rendered first. Never changes the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayOrder {
    #[default]
    Natural,
    Swapped,
}

impl DisplayOrder {
    pub fn toggled(self) -> Self {
        match self {
            DisplayOrder::Natural => DisplayOrder::Swapped,
            DisplayOrder::Swapped => DisplayOrder::Natural,
        }
    }

    pub fn is_swapped(self) -> bool {
        self == DisplayOrder::Swapped
    }
}

/// Visual position of a block inside a rendered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Horizontal,
    Vertical,
}

impl Layout {
    pub fn toggled(self) -> Self {
        match self {
            Layout::Horizontal => Layout::Vertical,
            Layout::Vertical => Layout::Horizontal,
        }
    }
}

/// Text size multiplier, clamped to `MIN..=MAX` and kept at two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSize(f32);

impl FontSize {
    pub const MIN: f32 = 1.0;
    pub const MAX: f32 = 5.0;
    pub const STEP: f32 = 0.25;
    pub const DEFAULT: FontSize = FontSize(2.25);

    pub fn new(value: f32) -> Self {
        if !value.is_finite() {
            return Self::DEFAULT;
        }
        FontSize(round2(value.clamp(Self::MIN, Self::MAX)))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn adjusted(self, delta: f32) -> Self {
        Self::new(self.0 + delta)
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_size_clamps_at_both_ends() {
        assert_eq!(FontSize::new(4.9).adjusted(FontSize::STEP).value(), 5.0);
        assert_eq!(FontSize::new(1.1).adjusted(-FontSize::STEP).value(), 1.0);
        assert_eq!(FontSize::DEFAULT.adjusted(FontSize::STEP).value(), 2.5);
        assert_eq!(FontSize::new(f32::NAN), FontSize::DEFAULT);
    }

    #[test]
    fn document_accepts_legacy_field_names() {
        let legacy = r#"{
            "bn": { "heading": "h-bn", "sentences": ["one", "two"] },
            "en": { "heading": "h-en", "sentences": ["uno"] }
        }"#;
        let doc: AlignmentDocument = serde_json::from_str(legacy).unwrap();
        assert_eq!(doc.track_a.heading, "h-bn");
        assert_eq!(doc.track_a.segments, vec!["one", "two"]);
        assert_eq!(doc.track_b.segments, vec!["uno"]);
        assert_eq!(doc.row_count(), 2);
    }

    #[test]
    fn document_serializes_with_track_names() {
        let doc = AlignmentDocument::new(
            LanguageTrack::new("a", vec!["x".into()]),
            LanguageTrack::default(),
        );
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["track_a"]["segments"][0], "x");
        assert!(json["track_b"]["segments"].as_array().unwrap().is_empty());
    }
}
//*** END FILE: src/types/document.rs ***//
