//*** START FILE: src/storage/session_io.rs ***//
use super::kv_store::KeyValueStore;
use super::repository::{export_collection, ImportReport, SessionRepository};
use crate::error::StorageError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub const DEFAULT_EXPORT_FILE_NAME: &str = "translation_sessions_backup.json";

/// Writes every saved session to `file_path` as pretty-printed JSON.
pub fn export_sessions_to_file<S: KeyValueStore>(
    repository: &SessionRepository<S>,
    file_path: &Path,
) -> Result<usize, StorageError> {
    let sessions = repository.list()?;
    let count = sessions.len();
    let json = export_collection(&sessions)?;

    let to_io = |source| StorageError::Io {
        path: file_path.to_path_buf(),
        source,
    };
    let file = File::create(file_path).map_err(to_io)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(json.as_bytes()).map_err(to_io)?;
    writer.flush().map_err(to_io)?;

    log::info!("exported {} session(s) to {}", count, file_path.display());
    Ok(count)
}

/// Reads a backup from `file_path` and merges it by id.
pub fn import_sessions_from_file<S: KeyValueStore>(
    repository: &mut SessionRepository<S>,
    file_path: &Path,
) -> Result<ImportReport, StorageError> {
    let contents = fs::read_to_string(file_path).map_err(|source| StorageError::Io {
        path: file_path.to_path_buf(),
        source,
    })?;
    repository.import_json(&contents)
}
//*** END FILE: src/storage/session_io.rs ***//
