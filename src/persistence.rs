// File: src/persistence.rs
use crate::core::dictionary::Dictionary;
use crate::core::engine::{Solution, SolverConfig};
use log::debug;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode or decode dictionary snapshot: {0}")]
    Snapshot(#[from] bincode::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not move temporary file into place: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("no word list given and no dictionary snapshot at {0:?}")]
    NoDictionarySource(Option<std::path::PathBuf>),
}

/// Writes through a temp file in the target directory, then renames it over
/// `path`, so readers never see a half-written file.
fn write_atomically<F>(path: &Path, write: F) -> Result<(), PersistenceError>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<(), PersistenceError>,
{
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush()?;
    }
    temp_file.persist(path)?;
    Ok(())
}

/// Saves a compiled dictionary so large word lists need not be re-read.
pub fn save_dictionary(dictionary: &Dictionary, path: &Path) -> Result<(), PersistenceError> {
    write_atomically(path, |writer| Ok(bincode::serialize_into(writer, dictionary)?))
}

pub fn load_dictionary(path: &Path) -> Result<Dictionary, PersistenceError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(reader)?)
}

/// Reads a newline-separated word list.
pub fn load_word_list(path: &Path) -> Result<Dictionary, PersistenceError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(Dictionary::from_reader(reader)?)
}

/// Resolves the dictionary from a word list and/or a snapshot.
///
/// A word list, when given, always wins and refreshes the snapshot. Without
/// one, an existing snapshot is loaded.
pub fn open_dictionary(
    words: Option<&Path>,
    snapshot: Option<&Path>,
) -> Result<Dictionary, PersistenceError> {
    if let Some(words) = words {
        let dictionary = load_word_list(words)?;
        if let Some(snapshot) = snapshot {
            save_dictionary(&dictionary, snapshot)?;
            debug!("dictionary snapshot written to {}", snapshot.display());
        }
        return Ok(dictionary);
    }

    match snapshot {
        Some(snapshot) if snapshot.exists() => {
            debug!("loading dictionary snapshot {}", snapshot.display());
            load_dictionary(snapshot)
        }
        _ => Err(PersistenceError::NoDictionarySource(snapshot.map(Path::to_path_buf))),
    }
}

/// Writes a solution as pretty-printed JSON.
pub fn save_report(solution: &Solution, path: &Path) -> Result<(), PersistenceError> {
    write_atomically(path, |writer| Ok(serde_json::to_writer_pretty(writer, solution)?))
}

pub fn load_config(path: &Path) -> Result<SolverConfig, PersistenceError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
