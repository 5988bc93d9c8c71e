// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the sealed configuration layout.

use std::path::{Path, PathBuf};

/// Default configuration directory, relative to the working directory.
pub const CONFIG_ROOT: &str = "config";

/// File name of the configuration document.
pub const DOCUMENT_FILE: &str = "config.json";

/// File name of the public key artifact (SPKI PEM).
pub const PUBLIC_KEY_FILE: &str = "public.key";

/// File name of the private key artifact (PKCS#8 PEM).
pub const PRIVATE_KEY_FILE: &str = "private.key";

/// Locations of the configuration document and its two key artifacts.
///
/// All three live side by side in one directory.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    root: PathBuf,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::new(CONFIG_ROOT)
    }
}

impl ConfigPaths {
    /// Create paths rooted at a custom directory (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the document and keys.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to `config.json`.
    pub fn document(&self) -> PathBuf {
        self.root.join(DOCUMENT_FILE)
    }

    /// Path to `public.key`.
    pub fn public_key(&self) -> PathBuf {
        self.root.join(PUBLIC_KEY_FILE)
    }

    /// Path to `private.key`.
    pub fn private_key(&self) -> PathBuf {
        self.root.join(PRIVATE_KEY_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_use_config_root() {
        let paths = ConfigPaths::default();
        assert_eq!(paths.root(), Path::new("config"));
        assert_eq!(paths.document(), PathBuf::from("config/config.json"));
    }

    #[test]
    fn key_artifacts_are_siblings_of_document() {
        let paths = ConfigPaths::new("/srv/att");
        assert_eq!(paths.public_key(), PathBuf::from("/srv/att/public.key"));
        assert_eq!(paths.private_key(), PathBuf::from("/srv/att/private.key"));
        assert_eq!(paths.document().parent(), paths.public_key().parent());
    }
}
