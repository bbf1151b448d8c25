//! File-backed wrappers around the text entry points.
//!
//! The tree itself never touches the file system; these helpers read the
//! whole file, hand the text to the engine, and report I/O failures as
//! [`ConfigError::SourceUnavailable`].

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::ConfigError;
use crate::parser::ParseOptions;
use crate::tree::ConfigTree;

/// Read a whole file, reporting failures as `SourceUnavailable`.
pub fn read_source(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

impl ConfigTree {
    /// Read `path` and combine it with replace semantics.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        self.load_file_with(path, &ParseOptions::default())
    }

    /// Read `path` and combine it with accumulate semantics.
    pub fn merge_file(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        self.merge_file_with(path, &ParseOptions::default())
    }

    pub fn load_file_with(
        &mut self,
        path: impl AsRef<Path>,
        options: &ParseOptions,
    ) -> Result<(), ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading configuration file");
        let text = read_source(path)?;
        self.load_text_with(&text, options)
    }

    pub fn merge_file_with(
        &mut self,
        path: impl AsRef<Path>,
        options: &ParseOptions,
    ) -> Result<(), ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "merging configuration file");
        let text = read_source(path)?;
        self.merge_text_with(&text, options)
    }

    /// Write the marshalled tree to `path`, replacing its contents.
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.marshal()).map_err(|source| ConfigError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })
    }
}
