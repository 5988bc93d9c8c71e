// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Synchronous file access for the configuration directory.
//!
//! The gate runs once, before the async runtime exists, so plain blocking
//! `std::fs` is used throughout.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use super::GateError;

/// Result type for gate file operations.
pub type FileResult<T> = Result<T, GateError>;

fn storage_error(path: &Path, source: io::Error) -> GateError {
    GateError::Storage {
        path: path.to_path_buf(),
        source,
    }
}

/// Check if a file exists.
///
/// An unreadable file still counts as present, so callers fail on the read
/// instead of overwriting it.
pub fn exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Create a directory (including parents).
pub fn create_dir(path: impl AsRef<Path>) -> FileResult<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|e| storage_error(path, e))
}

/// Read a JSON file and deserialize it.
///
/// A missing file maps to `MissingDocument`, bad JSON to `MalformedDocument`.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> FileResult<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => GateError::MissingDocument {
            path: path.to_path_buf(),
        },
        _ => storage_error(path, e),
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| GateError::MalformedDocument {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write a JSON file (atomic write via rename).
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> FileResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }

    // Write to temp file first, then rename for atomicity
    let temp_path = path.with_extension("tmp");
    {
        let file = File::create(&temp_path).map_err(|e| storage_error(&temp_path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value).map_err(|e| {
            storage_error(&temp_path, io::Error::new(io::ErrorKind::InvalidData, e))
        })?;
        writer.flush().map_err(|e| storage_error(&temp_path, e))?;
    }

    fs::rename(&temp_path, path).map_err(|e| storage_error(path, e))
}

/// Write raw bytes to a file, truncating any previous content.
///
/// With `private` set the file is created owner-read/write only on unix.
pub fn write_raw(path: impl AsRef<Path>, data: &[u8], private: bool) -> FileResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    if private {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    #[cfg(not(unix))]
    let _ = private;

    let mut file = options.open(path).map_err(|e| storage_error(path, e))?;
    // `mode` only applies on create; tighten a pre-existing file too.
    #[cfg(unix)]
    if private {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| storage_error(path, e))?;
    }
    file.write_all(data).map_err(|e| storage_error(path, e))?;
    file.flush().map_err(|e| storage_error(path, e))
}

/// Read a file as UTF-8 text.
pub fn read_text(path: impl AsRef<Path>) -> FileResult<String> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| storage_error(path, e))?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|e| storage_error(path, e))?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        port: String,
    }

    #[test]
    fn write_and_read_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.json");
        let sample = Sample {
            port: "38012".to_string(),
        };

        write_json(&path, &sample).unwrap();
        let read: Sample = read_json(&path).unwrap();

        assert_eq!(read, sample);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn missing_json_is_missing_document() {
        let temp = TempDir::new().unwrap();
        let result = read_json::<Sample>(temp.path().join("config.json"));
        assert!(matches!(result, Err(GateError::MissingDocument { .. })));
    }

    #[test]
    fn garbage_json_is_malformed_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();

        let result = read_json::<Sample>(&path);
        assert!(matches!(result, Err(GateError::MalformedDocument { .. })));
    }

    #[test]
    fn write_raw_truncates() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("public.key");

        write_raw(&path, b"a much longer first payload", false).unwrap();
        write_raw(&path, b"short", false).unwrap();

        assert_eq!(read_text(&path).unwrap(), "short");
    }

    #[cfg(unix)]
    #[test]
    fn private_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("private.key");
        write_raw(&path, b"secret", true).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn exists_reports_presence() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("x");
        assert!(!exists(&path));
        write_raw(&path, b"x", false).unwrap();
        assert!(exists(&path));
    }
}
