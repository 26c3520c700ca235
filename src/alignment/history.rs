use crate::config::DEFAULT_HISTORY_DEPTH;
use crate::types::document::AlignmentDocument;
use std::collections::VecDeque;

/// Bounded stack of whole-document snapshots.
///
/// Every snapshot is a full deep copy. That is fine for article-sized
/// documents; documents with thousands of segments would want an operation
/// log with inverse edits instead.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    snapshots: VecDeque<AlignmentDocument>,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_DEPTH)
    }
}

impl HistoryLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            snapshots: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Records `document` as it is now. Call before mutating it.
    pub fn snapshot(&mut self, document: &AlignmentDocument) {
        self.snapshots.push_back(document.clone());
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
    }

    /// Pops the most recent snapshot, if any.
    pub fn undo(&mut self) -> Option<AlignmentDocument> {
        self.snapshots.pop_back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::LanguageTrack;

    fn numbered(n: usize) -> AlignmentDocument {
        AlignmentDocument::new(
            LanguageTrack::new(format!("doc {}", n), vec![n.to_string()]),
            LanguageTrack::default(),
        )
    }

    #[test]
    fn undo_on_empty_log_is_none() {
        let mut log = HistoryLog::default();
        assert!(log.undo().is_none());
    }

    #[test]
    fn pops_in_reverse_order() {
        let mut log = HistoryLog::default();
        log.snapshot(&numbered(1));
        log.snapshot(&numbered(2));
        assert_eq!(log.undo(), Some(numbered(2)));
        assert_eq!(log.undo(), Some(numbered(1)));
        assert!(log.is_empty());
    }

    #[test]
    fn oldest_snapshot_is_evicted_past_capacity() {
        let mut log = HistoryLog::default();
        for n in 0..=DEFAULT_HISTORY_DEPTH {
            log.snapshot(&numbered(n));
        }
        assert_eq!(log.len(), DEFAULT_HISTORY_DEPTH);
        let mut last = None;
        while let Some(doc) = log.undo() {
            last = Some(doc);
        }
        assert_eq!(last, Some(numbered(1)));
    }

    #[test]
    fn snapshot_is_independent_of_later_mutation() {
        let mut log = HistoryLog::with_capacity(3);
        let mut doc = numbered(7);
        log.snapshot(&doc);
        doc.track_a.segments.push("changed".into());
        assert_eq!(log.undo(), Some(numbered(7)));
    }
}
