use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::error::{AppError, Result};
use crate::domain::host::DownloadSink;

/// Saves export files into a directory
pub struct FileDownloadSink {
    dir: PathBuf,
}

impl FileDownloadSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, filename: &str) -> Result<PathBuf> {
        let name = Path::new(filename)
            .file_name()
            .filter(|name| name.to_string_lossy() == filename)
            .ok_or_else(|| AppError::Io(format!("Invalid export filename: {}", filename)))?;
        Ok(self.dir.join(name))
    }
}

impl DownloadSink for FileDownloadSink {
    fn trigger_download(&self, content: &str, filename: &str, mime_type: &str) -> Result<()> {
        let path = self.path_for(filename)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, content)?;
        info!(path = %path.display(), mime_type, bytes = content.len(), "Export written");
        Ok(())
    }
}
