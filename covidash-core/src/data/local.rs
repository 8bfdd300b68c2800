//! Local directory source: two fixed filenames under a base directory.

use super::provider::{DataError, DataOrigin, RawTable, TableKind, TableSource};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct LocalDirectory {
    base_dir: PathBuf,
}

impl LocalDirectory {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// `{base_dir}/{file_name}` for a table.
    pub fn path_for(&self, kind: TableKind) -> PathBuf {
        self.base_dir.join(kind.file_name())
    }
}

impl TableSource for LocalDirectory {
    fn name(&self) -> &str {
        "local_directory"
    }

    fn fetch(&self, kind: TableKind) -> Result<RawTable, DataError> {
        let path = self.path_for(kind);
        debug!(path = %path.display(), "reading local table");

        let text = fs::read_to_string(&path)
            .map_err(|e| DataError::unavailable(self.name(), format!("{}: {e}", path.display())))?;

        Ok(RawTable {
            kind,
            origin: DataOrigin::LocalFile,
            location: path.display().to_string(),
            text,
        })
    }
}
