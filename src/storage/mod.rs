//*** START FILE: src/storage/mod.rs ***//
pub mod kv_store;
pub mod repository;
pub mod session_io;

pub use kv_store::{FileStore, KeyValueStore, MemoryStore};
pub use repository::{
    session_title, ImportReport, SaveChoice, SaveOutcome, SavedSession, SessionRepository,
};
pub use session_io::{export_sessions_to_file, import_sessions_from_file, DEFAULT_EXPORT_FILE_NAME};
//*** END FILE: src/storage/mod.rs ***//
