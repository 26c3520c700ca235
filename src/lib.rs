//*** START FILE: src/lib.rs ***//

// Declare all modules that are part of this library
pub mod config;
pub mod error;
pub mod types {
    pub mod document;
}
pub mod parsing;
pub mod alignment;
pub mod storage;

pub use alignment::{EditorSession, ViewState};
pub use config::Config;
pub use error::{AppError, Result};
pub use types::document::{AlignmentDocument, LanguageTrack, TrackLabels};

//*** END FILE: src/lib.rs ***//
