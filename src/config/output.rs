use crate::utils::error::{FetchError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Local destination for the fetched secret, readable only by its owner.
#[derive(Debug, Clone)]
pub struct OutputFile {
    path: PathBuf,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_private(&self, data: &[u8]) -> Result<()> {
        self.write_with_mode(data).map_err(|source| FetchError::WriteError {
            path: self.path.display().to_string(),
            source,
        })
    }

    #[cfg(unix)]
    fn write_with_mode(&self, data: &[u8]) -> std::io::Result<()> {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&self.path)?;
        // mode() only applies on creation; tighten a pre-existing file too.
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(data)?;
        file.sync_all()
    }

    #[cfg(not(unix))]
    fn write_with_mode(&self, data: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(&self.path)?;
        file.write_all(data)?;
        file.sync_all()
    }
}
