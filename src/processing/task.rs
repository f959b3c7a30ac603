//! Conversion tasks

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionTask {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl ConversionTask {
    /// Pair a source with the `.wav` sibling that shares its base name
    pub fn for_source<P: Into<PathBuf>>(source: P) -> Self {
        let source = source.into();
        let target = source.with_extension("wav");
        Self { source, target }
    }

    /// Key used to detect two tasks writing the same file. Only the file
    /// name is case-folded; directories that differ by case are distinct.
    pub fn target_key(&self) -> (PathBuf, String) {
        let parent = self.target.parent().map(Path::to_path_buf).unwrap_or_default();
        let name = self.target.file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        (parent, name)
    }
}

pub fn is_wav(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}
