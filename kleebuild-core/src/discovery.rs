//! Filesystem discovery for build inputs and intermediates.

use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

/// Non-recursive listing of the files in one directory that carry a
/// given extension.
///
/// Used twice per build: once over `sources/` for `.glyphs` files, once
/// over `master_otf/` for the compiler's output.
#[derive(Debug, Clone)]
pub struct SourceDiscovery {
    dir: PathBuf,
    extension: String,
}

impl SourceDiscovery {
    pub fn new<P: Into<PathBuf>>(dir: P, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.to_ascii_lowercase(),
        }
    }

    /// List matching files, sorted by path.
    ///
    /// A directory that does not exist yields no entries rather than an
    /// error; a build with nothing to do is still a valid build.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut found = Vec::new();

        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_file() && self.matches(entry.path()) {
                found.push(entry.path().to_path_buf());
            }
        }

        found.sort();
        Ok(found)
    }

    fn matches(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_ascii_lowercase() == self.extension,
            None => false,
        }
    }
}
