//*** START FILE: src/alignment/mod.rs ***//
pub mod edit_engine;
pub mod history;
pub mod session;
pub mod store;

// Re-export the pieces the GUI and CLI reach for
pub use edit_engine::{Caret, EditGesture, EditKey, KeyModifiers};
pub use history::HistoryLog;
pub use session::{BlockRef, EditOutcome, EditorSession};
pub use store::{AlignmentStore, BlockPair, ViewState};
//*** END FILE: src/alignment/mod.rs ***//
