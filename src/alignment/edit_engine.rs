//! Structural edits on a single track's segment list.
//!
//! Every operation checks its own bounds and reports whether it changed
//! anything. An out-of-range position is a no-op, never an error: the editor
//! stays usable and the user can always undo.

/// Keys the editor reacts to inside a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Backspace,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub command: bool,
}

/// Caret as reported by the view: a char offset into the block text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caret {
    pub offset: usize,
    pub has_selection: bool,
}

impl Caret {
    pub fn at(offset: usize) -> Self {
        Self {
            offset,
            has_selection: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditGesture {
    Split { caret: usize },
    MergeForward,
    MergeBackward,
    Undo,
}

impl EditGesture {
    /// Classifies a key press inside a block. `None` means ordinary typing
    /// that the view should handle itself.
    pub fn classify(key: EditKey, modifiers: KeyModifiers, caret: Caret) -> Option<Self> {
        match key {
            EditKey::Enter if modifiers.shift => Some(EditGesture::MergeForward),
            EditKey::Enter => Some(EditGesture::Split {
                caret: caret.offset,
            }),
            EditKey::Backspace if caret.offset == 0 && !caret.has_selection => {
                Some(EditGesture::MergeBackward)
            }
            EditKey::Z if modifiers.command && !modifiers.shift => Some(EditGesture::Undo),
            _ => None,
        }
    }
}

/// Whether `gesture` at `row` would change a track of length `len`.
pub fn can_apply(gesture: EditGesture, len: usize, row: usize) -> bool {
    match gesture {
        EditGesture::Split { .. } => row <= len,
        EditGesture::MergeForward => row + 1 < len,
        EditGesture::MergeBackward => row > 0 && row < len,
        EditGesture::Undo => false,
    }
}

/// Applies a structural gesture to `segments`. `block_text` is the text of
/// the edited block as the view shows it.
pub fn apply(segments: &mut Vec<String>, gesture: EditGesture, row: usize, block_text: &str) -> bool {
    match gesture {
        EditGesture::Split { caret } => split(segments, row, block_text, caret),
        EditGesture::MergeForward => merge_forward(segments, row),
        EditGesture::MergeBackward => merge_backward(segments, row),
        EditGesture::Undo => false,
    }
}

/// Splits `text` at char offset `caret` into two segments at `row`.
/// `row == len` appends both halves; anything beyond is ignored.
pub fn split(segments: &mut Vec<String>, row: usize, text: &str, caret: usize) -> bool {
    let at = text
        .char_indices()
        .nth(caret)
        .map_or(text.len(), |(byte, _)| byte);
    let (head, tail) = text.split_at(at);
    let halves = [head.to_string(), tail.to_string()];

    if row < segments.len() {
        segments.splice(row..=row, halves);
        true
    } else if row == segments.len() {
        segments.extend(halves);
        true
    } else {
        false
    }
}

pub fn merge_forward(segments: &mut Vec<String>, row: usize) -> bool {
    if row + 1 >= segments.len() {
        return false;
    }
    let next = segments.remove(row + 1);
    let current = &mut segments[row];
    current.push(' ');
    current.push_str(&next);
    true
}

pub fn merge_backward(segments: &mut Vec<String>, row: usize) -> bool {
    if row == 0 || row >= segments.len() {
        return false;
    }
    merge_forward(segments, row - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;

    quickcheck::quickcheck! {
        fn split_keeps_text_and_adds_one_segment(
            segments: Vec<String>,
            text: String,
            row: usize,
            caret: usize
        ) -> TestResult {
            if segments.is_empty() {
                return TestResult::discard();
            }
            let row = row % segments.len();
            let mut after = segments.clone();
            TestResult::from_bool(
                split(&mut after, row, &text, caret)
                    && after.len() == segments.len() + 1
                    && format!("{}{}", after[row], after[row + 1]) == text
                    && after[..row] == segments[..row]
                    && after[row + 2..] == segments[row + 1..],
            )
        }

        fn merge_forward_joins_with_one_space(segments: Vec<String>, row: usize) -> bool {
            let row = row % (segments.len() + 1);
            let mut after = segments.clone();
            let changed = merge_forward(&mut after, row);
            if row + 1 < segments.len() {
                changed
                    && after.len() == segments.len() - 1
                    && after[row] == format!("{} {}", segments[row], segments[row + 1])
            } else {
                !changed && after == segments
            }
        }

        fn merge_backward_is_merge_forward_on_the_previous_row(
            segments: Vec<String>,
            row: usize
        ) -> bool {
            let row = row % (segments.len() + 1);
            let mut backward = segments.clone();
            let changed = merge_backward(&mut backward, row);
            if row == 0 || row >= segments.len() {
                return !changed && backward == segments;
            }
            let mut forward = segments.clone();
            merge_forward(&mut forward, row - 1);
            changed && backward == forward && backward.len() == segments.len() - 1
        }
    }

    fn segs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn split_replaces_in_place() {
        let mut s = segs(&["one two", "three"]);
        assert!(split(&mut s, 0, "one two", 3));
        assert_eq!(s, segs(&["one", " two", "three"]));
        assert_eq!(format!("{}{}", s[0], s[1]), "one two");
    }

    #[test]
    fn split_one_past_end_appends() {
        let mut s = segs(&["a"]);
        assert!(split(&mut s, 1, "new block", 3));
        assert_eq!(s, segs(&["a", "new", " block"]));
    }

    #[test]
    fn split_beyond_end_is_noop() {
        let mut s = segs(&["a"]);
        assert!(!split(&mut s, 3, "text", 1));
        assert_eq!(s, segs(&["a"]));
    }

    #[test]
    fn split_clamps_caret_and_respects_char_boundaries() {
        let mut s = segs(&["বাংলা"]);
        assert!(split(&mut s, 0, "বাংলা", 2));
        assert_eq!(format!("{}{}", s[0], s[1]), "বাংলা");
        assert_eq!(s[0].chars().count(), 2);

        let mut s = segs(&["abc"]);
        assert!(split(&mut s, 0, "abc", 99));
        assert_eq!(s, segs(&["abc", ""]));
    }

    #[test]
    fn merge_forward_joins_with_single_space() {
        let mut s = segs(&["a", "b", "c"]);
        assert!(merge_forward(&mut s, 1));
        assert_eq!(s, segs(&["a", "b c"]));
        assert!(!merge_forward(&mut s, 1));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn merge_backward_at_first_row_is_noop() {
        let mut s = segs(&["a", "b"]);
        assert!(!merge_backward(&mut s, 0));
        assert!(merge_backward(&mut s, 1));
        assert_eq!(s, segs(&["a b"]));
        assert!(!merge_backward(&mut s, 5));
    }

    #[test]
    fn classify_maps_keys_to_gestures() {
        let none = KeyModifiers::default();
        let shift = KeyModifiers {
            shift: true,
            command: false,
        };
        let command = KeyModifiers {
            shift: false,
            command: true,
        };
        assert_eq!(
            EditGesture::classify(EditKey::Enter, none, Caret::at(4)),
            Some(EditGesture::Split { caret: 4 })
        );
        assert_eq!(
            EditGesture::classify(EditKey::Enter, shift, Caret::at(4)),
            Some(EditGesture::MergeForward)
        );
        assert_eq!(
            EditGesture::classify(EditKey::Backspace, none, Caret::at(0)),
            Some(EditGesture::MergeBackward)
        );
        assert_eq!(EditGesture::classify(EditKey::Backspace, none, Caret::at(2)), None);
        let selected = Caret {
            offset: 0,
            has_selection: true,
        };
        assert_eq!(EditGesture::classify(EditKey::Backspace, none, selected), None);
        assert_eq!(
            EditGesture::classify(EditKey::Z, command, Caret::default()),
            Some(EditGesture::Undo)
        );
        assert_eq!(EditGesture::classify(EditKey::Z, none, Caret::default()), None);
    }

    #[test]
    fn can_apply_matches_apply() {
        for len in 0..4 {
            for row in 0..6 {
                for gesture in [
                    EditGesture::Split { caret: 0 },
                    EditGesture::MergeForward,
                    EditGesture::MergeBackward,
                ] {
                    let mut s = vec!["seg".to_string(); len];
                    assert_eq!(
                        can_apply(gesture, len, row),
                        apply(&mut s, gesture, row, "seg"),
                        "{:?} len={} row={}",
                        gesture,
                        len,
                        row
                    );
                }
            }
        }
    }
}
