use crate::types::document::{
    AlignmentDocument, Column, DisplayOrder, FontSize, Layout, TrackId, TrackLabels,
};

/// One rendered row: the text of the first and second visual blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPair {
    pub first: String,
    pub second: String,
}

impl BlockPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::First => &self.first,
            Column::Second => &self.second,
        }
    }
}

/// Display preferences. Kept next to the document but never persisted with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub order: DisplayOrder,
    pub layout: Layout,
    pub font_size: FontSize,
    pub masked: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            order: DisplayOrder::Natural,
            layout: Layout::Horizontal,
            font_size: FontSize::DEFAULT,
            masked: true,
        }
    }
}

/// Maps a visual column to the track it shows.
///
/// Both the store and the edit engine go through this function; a second
/// copy of the rule would let them disagree and write into the wrong track.
pub fn track_for(order: DisplayOrder, column: Column) -> TrackId {
    match (order.is_swapped(), column) {
        (false, Column::First) | (true, Column::Second) => TrackId::A,
        (false, Column::Second) | (true, Column::First) => TrackId::B,
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlignmentStore {
    document: AlignmentDocument,
    view: ViewState,
}

impl AlignmentStore {
    pub fn new(document: AlignmentDocument, view: ViewState) -> Self {
        Self { document, view }
    }

    pub fn document(&self) -> &AlignmentDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut AlignmentDocument {
        &mut self.document
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn replace(&mut self, document: AlignmentDocument) {
        self.document = document;
    }

    pub fn track_for(&self, column: Column) -> TrackId {
        track_for(self.view.order, column)
    }

    /// What the view shows for `column`, minus the empty padding blocks that
    /// sit past the end of the track behind it.
    fn column_from_view(&self, pairs: &[BlockPair], column: Column) -> Vec<String> {
        let current_len = self.document.track(self.track_for(column)).len();
        let mut texts: Vec<String> = pairs.iter().map(|p| p.get(column).to_string()).collect();
        while texts.len() > current_len && texts.last().is_some_and(|t| t.is_empty()) {
            texts.pop();
        }
        texts
    }

    /// Rebuilds both tracks' segments from what the view currently shows.
    /// Headings are left alone.
    pub fn synchronize_from_view(&mut self, pairs: &[BlockPair]) {
        let first = self.column_from_view(pairs, Column::First);
        let second = self.column_from_view(pairs, Column::Second);
        let first_track = self.track_for(Column::First);
        self.document.track_mut(first_track).segments = first;
        self.document.track_mut(first_track.other()).segments = second;
    }

    /// True when synchronizing from `pairs` would change the document.
    pub fn differs_from_view(&self, pairs: &[BlockPair]) -> bool {
        [Column::First, Column::Second].into_iter().any(|column| {
            self.document.track(self.track_for(column)).segments
                != self.column_from_view(pairs, column)
        })
    }

    /// Projects the document into display-ordered pairs, padding the shorter
    /// track with empty blocks.
    pub fn render_pairs(&self) -> Vec<BlockPair> {
        let first = self.document.track(self.track_for(Column::First));
        let second = self.document.track(self.track_for(Column::Second));
        (0..self.document.row_count())
            .map(|i| BlockPair {
                first: first.segments.get(i).cloned().unwrap_or_default(),
                second: second.segments.get(i).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Headings in display order, with a fallback for empty ones.
    pub fn headings(&self, labels: &TrackLabels) -> (String, String) {
        let heading = |column: Column| {
            let track = self.track_for(column);
            let text = &self.document.track(track).heading;
            if text.is_empty() {
                format!("{} Article", labels.get(track))
            } else {
                text.clone()
            }
        };
        (heading(Column::First), heading(Column::Second))
    }
}
