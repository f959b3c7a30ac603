//! Lazy recursive discovery of conversion candidates

use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use super::task::{is_wav, ConversionTask};

/// What the walk found at one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovered {
    Candidate(ConversionTask),
    AlreadyWav(PathBuf),
    /// Not in the extension allowlist
    Ignored(PathBuf),
    Unreadable { path: PathBuf, reason: String },
}

#[derive(Debug, Clone)]
pub struct Discoverer {
    root: PathBuf,
    extensions: Vec<String>,
}

impl Discoverer {
    /// `extensions` are lowercase without a leading dot; empty accepts every non-WAV file.
    pub fn new<P: Into<PathBuf>>(root: P, extensions: &[String]) -> Self {
        Self {
            root: root.into(),
            extensions: extensions.to_vec(),
        }
    }

    /// Walks the tree on demand. Symlinks are not followed, so linked
    /// directories cannot loop and linked files are not picked up.
    pub fn walk(&self) -> impl Iterator<Item = Discovered> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() => Some(self.classify(entry.into_path())),
                Ok(_) => None,
                Err(e) => Some(Discovered::Unreadable {
                    path: e.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone()),
                    reason: e.to_string(),
                }),
            })
    }

    fn classify(&self, path: PathBuf) -> Discovered {
        if is_wav(&path) {
            return Discovered::AlreadyWav(path);
        }
        if !self.accepts(&path) {
            return Discovered::Ignored(path);
        }
        Discovered::Candidate(ConversionTask::for_source(path))
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}
