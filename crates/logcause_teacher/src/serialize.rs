//! Rule serialization using `MessagePack`.
//!
//! Exported rules are encoded with named fields so that saved rules stay
//! readable by later versions that add fields.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use logcause_foundation::{Error, ErrorKind, Result};

use crate::intent::RuleIntent;

/// Serializes a rule to `MessagePack` bytes.
///
/// # Errors
///
/// Returns a `Serialization` error if encoding fails.
pub fn to_bytes(rule: &RuleIntent) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(rule).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Deserializes a rule from `MessagePack` bytes.
///
/// # Errors
///
/// Returns a `Serialization` error if decoding fails.
pub fn from_bytes(bytes: &[u8]) -> Result<RuleIntent> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> Error {
    Error::new(ErrorKind::Io(format!(
        "failed to {action} file '{}': {e}",
        path.display()
    )))
}

/// Saves a rule to a file, overwriting it if it exists.
///
/// # Errors
///
/// Returns an `Io` error if the file cannot be written, or a
/// `Serialization` error if encoding fails.
pub fn save_to_file<P: AsRef<Path>>(rule: &RuleIntent, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_bytes(rule)?;
    let file = File::create(path).map_err(|e| io_error("create", path, &e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .map_err(|e| io_error("write to", path, &e))?;
    writer.flush().map_err(|e| io_error("flush", path, &e))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "saved rule");
    Ok(())
}

/// Loads a rule from a file.
///
/// # Errors
///
/// Returns an `Io` error if the file cannot be read, or a
/// `Serialization` error if decoding fails.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<RuleIntent> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error("open", path, &e))?;
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| io_error("read", path, &e))?;
    from_bytes(&bytes)
}
