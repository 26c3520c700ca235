use super::edit_engine::{self, EditGesture};
use super::history::HistoryLog;
use super::store::{AlignmentStore, BlockPair, ViewState};
use crate::error::InputError;
use crate::parsing::segmenter::segment;
use crate::types::document::{
    AlignmentDocument, Column, DisplayOrder, FontSize, TrackId, TrackLabels,
};

/// Address of one editable block in the rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRef {
    pub row: usize,
    pub column: Column,
}

impl BlockRef {
    pub fn new(row: usize, column: Column) -> Self {
        Self { row, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditOutcome {
    /// The document changed.
    pub changed: bool,
    /// The view must rebuild its blocks from the store.
    pub rerender: bool,
}

impl EditOutcome {
    fn applied() -> Self {
        Self {
            changed: true,
            rerender: true,
        }
    }
}

/// Everything one editing session owns: the live document, its view state
/// and its undo history. Dropped when the user leaves the editor.
#[derive(Debug, Clone)]
pub struct EditorSession {
    store: AlignmentStore,
    history: HistoryLog,
    labels: TrackLabels,
}

impl EditorSession {
    pub fn new(
        document: AlignmentDocument,
        view: ViewState,
        labels: TrackLabels,
        history_depth: usize,
    ) -> Self {
        Self {
            store: AlignmentStore::new(document, view),
            history: HistoryLog::with_capacity(history_depth),
            labels,
        }
    }

    /// Segments freshly pasted text for both tracks. Nothing is created when
    /// either side is empty or yields no segments.
    pub fn from_raw(
        text_a: &str,
        text_b: &str,
        labels: TrackLabels,
        view: ViewState,
        history_depth: usize,
    ) -> Result<Self, InputError> {
        let (text_a, text_b) = (text_a.trim(), text_b.trim());
        if text_a.is_empty() || text_b.is_empty() {
            return Err(InputError::MissingText {
                label_a: labels.a.clone(),
                label_b: labels.b.clone(),
            });
        }

        let track_a = segment(text_a, &labels.a);
        let track_b = segment(text_b, &labels.b);
        for (track, id) in [(&track_a, TrackId::A), (&track_b, TrackId::B)] {
            if track.is_empty() {
                return Err(InputError::NoContent {
                    label: labels.get(id).to_string(),
                });
            }
        }

        log::info!(
            "started session with {} {} and {} {} segment(s)",
            track_a.len(),
            labels.a,
            track_b.len(),
            labels.b
        );
        Ok(Self::new(
            AlignmentDocument::new(track_a, track_b),
            view,
            labels,
            history_depth,
        ))
    }

    pub fn document(&self) -> &AlignmentDocument {
        self.store.document()
    }

    pub fn store(&self) -> &AlignmentStore {
        &self.store
    }

    pub fn view(&self) -> &ViewState {
        self.store.view()
    }

    pub fn labels(&self) -> &TrackLabels {
        &self.labels
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn render_pairs(&self) -> Vec<BlockPair> {
        self.store.render_pairs()
    }

    pub fn headings(&self) -> (String, String) {
        self.store.headings(&self.labels)
    }

    /// Pulls the view's text into the model without recording history.
    pub fn synchronize_from_view(&mut self, pairs: &[BlockPair]) {
        self.store.synchronize_from_view(pairs);
    }

    /// Called on every input event from the view. Records the pre-edit
    /// document and then adopts the view's text.
    pub fn record_input(&mut self, pairs: &[BlockPair]) -> bool {
        if !self.store.differs_from_view(pairs) {
            return false;
        }
        self.history.snapshot(self.store.document());
        self.store.synchronize_from_view(pairs);
        true
    }

    /// Runs a gesture captured at `target`. `pairs` is the view's current
    /// text, read just before the gesture.
    pub fn apply(&mut self, gesture: EditGesture, target: BlockRef, pairs: &[BlockPair]) -> EditOutcome {
        if gesture == EditGesture::Undo {
            return self.undo();
        }

        if self.store.differs_from_view(pairs) {
            self.store.synchronize_from_view(pairs);
        }

        let track = self.store.track_for(target.column);
        let len = self.store.document().track(track).len();
        if !edit_engine::can_apply(gesture, len, target.row) {
            log::debug!("ignored {:?} at row {} of {:?} (len {})", gesture, target.row, track, len);
            return EditOutcome::default();
        }

        let block_text = pairs
            .get(target.row)
            .map(|pair| pair.get(target.column).to_string())
            .unwrap_or_default();

        self.history.snapshot(self.store.document());
        let segments = &mut self.store.document_mut().track_mut(track).segments;
        let changed = edit_engine::apply(segments, gesture, target.row, &block_text);
        debug_assert!(changed, "can_apply and apply disagree");
        EditOutcome::applied()
    }

    pub fn undo(&mut self) -> EditOutcome {
        match self.history.undo() {
            Some(previous) => {
                self.store.replace(previous);
                EditOutcome::applied()
            }
            None => EditOutcome::default(),
        }
    }

    pub fn toggle_mask(&mut self) -> bool {
        let view = self.store.view_mut();
        view.masked = !view.masked;
        view.masked
    }

    pub fn toggle_layout(&mut self) {
        let view = self.store.view_mut();
        view.layout = view.layout.toggled();
    }

    /// Changes which track is shown in the first column. The document is
    /// untouched; only the column-to-track mapping moves.
    pub fn set_order(&mut self, order: DisplayOrder) {
        self.store.view_mut().order = order;
    }

    pub fn adjust_font_size(&mut self, delta: f32) -> FontSize {
        let view = self.store.view_mut();
        view.font_size = view.font_size.adjusted(delta);
        view.font_size
    }

    pub fn into_document(self) -> AlignmentDocument {
        self.store.document().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_HISTORY_DEPTH;
    use crate::types::document::{Layout, LanguageTrack};

    fn session(a: &[&str], b: &[&str]) -> EditorSession {
        let track = |items: &[&str]| {
            LanguageTrack::new("h", items.iter().map(|s| s.to_string()).collect())
        };
        EditorSession::new(
            AlignmentDocument::new(track(a), track(b)),
            ViewState::default(),
            TrackLabels::default(),
            DEFAULT_HISTORY_DEPTH,
        )
    }

    #[test]
    fn from_raw_rejects_blank_side() {
        let err = EditorSession::from_raw(
            "A long enough paragraph",
            "   ",
            TrackLabels::default(),
            ViewState::default(),
            DEFAULT_HISTORY_DEPTH,
        )
        .unwrap_err();
        assert!(matches!(err, InputError::MissingText { .. }));
    }

    #[test]
    fn from_raw_rejects_side_without_segments() {
        let err = EditorSession::from_raw(
            "A long enough paragraph",
            "tiny",
            TrackLabels::default(),
            ViewState::default(),
            DEFAULT_HISTORY_DEPTH,
        )
        .unwrap_err();
        assert_eq!(
            err,
            InputError::NoContent {
                label: "English".to_string()
            }
        );
    }

    #[test]
    fn from_raw_segments_both_tracks() {
        let session = EditorSession::from_raw(
            "প্রথম অনুচ্ছেদ এখানে\n\nদ্বিতীয় অনুচ্ছেদ এখানে",
            "First paragraph here",
            TrackLabels::default(),
            ViewState::default(),
            DEFAULT_HISTORY_DEPTH,
        )
        .unwrap();
        assert_eq!(session.document().track_a.len(), 2);
        assert_eq!(session.document().track_b.len(), 1);
        assert_eq!(session.render_pairs().len(), 2);
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn split_targets_the_column_under_the_caret() {
        let mut s = session(&["alpha beta"], &["uno dos"]);
        s.set_order(DisplayOrder::Swapped);
        let pairs = s.render_pairs();
        let outcome = s.apply(
            EditGesture::Split { caret: 3 },
            BlockRef::new(0, Column::First),
            &pairs,
        );
        assert!(outcome.changed && outcome.rerender);
        assert_eq!(s.document().track_b.segments, vec!["uno", " dos"]);
        assert_eq!(s.document().track_a.segments, vec!["alpha beta"]);
        assert_eq!(s.view().order, DisplayOrder::Swapped);
    }

    #[test]
    fn gesture_picks_up_unsynced_typing() {
        let mut s = session(&["first", "second"], &["x", "y"]);
        let mut pairs = s.render_pairs();
        pairs[0].first = "first edited".to_string();
        s.apply(EditGesture::MergeForward, BlockRef::new(0, Column::First), &pairs);
        assert_eq!(s.document().track_a.segments, vec!["first edited second"]);
    }

    #[test]
    fn noop_gesture_leaves_history_alone() {
        let mut s = session(&["a", "b"], &["c"]);
        let pairs = s.render_pairs();
        let outcome = s.apply(EditGesture::MergeBackward, BlockRef::new(0, Column::Second), &pairs);
        assert_eq!(outcome, EditOutcome::default());
        assert_eq!(s.history_len(), 0);
    }

    #[test]
    fn record_input_snapshots_pre_edit_state() {
        let mut s = session(&["hello"], &["hola"]);
        let mut pairs = s.render_pairs();
        assert!(!s.record_input(&pairs));
        pairs[0].second.push_str(" mundo");
        assert!(s.record_input(&pairs));
        assert_eq!(s.document().track_b.segments, vec!["hola mundo"]);
        s.undo();
        assert_eq!(s.document().track_b.segments, vec!["hola"]);
    }

    #[test]
    fn undo_restores_each_step_then_noops() {
        let mut s = session(&["a", "b", "c", "d"], &["w", "x", "y", "z"]);
        let original = s.document().clone();
        for _ in 0..3 {
            let pairs = s.render_pairs();
            s.apply(EditGesture::MergeForward, BlockRef::new(0, Column::Second), &pairs);
        }
        assert_eq!(s.document().track_b.segments, vec!["w x y z"]);
        for _ in 0..3 {
            assert!(s.undo().changed);
        }
        assert_eq!(s.document(), &original);
        assert_eq!(s.undo(), EditOutcome::default());
    }

    #[test]
    fn view_toggles() {
        let mut s = session(&["a"], &["b"]);
        assert!(!s.toggle_mask());
        assert!(!s.view().masked);
        s.toggle_layout();
        assert_eq!(s.view().layout, Layout::Vertical);
        s.toggle_layout();
        assert_eq!(s.view().layout, Layout::Horizontal);
        assert_eq!(s.adjust_font_size(0.25).value(), 2.5);
        s.set_order(DisplayOrder::Swapped);
        assert_eq!(s.view().order, DisplayOrder::Swapped);
        assert_eq!(s.render_pairs()[0], BlockPair::new("b", "a"));
        s.set_order(DisplayOrder::Natural);
        assert_eq!(s.render_pairs()[0], BlockPair::new("a", "b"));
    }
}
