//! Isolated home directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{LaunchError, Result};

/// A freshly created directory that serves as `HOME` for one launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsolatedHome {
    path: PathBuf,
}

impl IsolatedHome {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the directory and everything the collaborators left in it
    pub fn remove(self) -> io::Result<()> {
        fs::remove_dir_all(&self.path)
    }
}

/// Create a uniquely named directory under `parent`.
///
/// The name is `<prefix><random>` and is created with `O_EXCL` semantics, so
/// concurrent launchers never end up sharing a home. The directory is not
/// removed when the returned value is dropped.
pub fn create_isolated_home(parent: &Path, prefix: &str) -> Result<IsolatedHome> {
    let dir = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir_in(parent)
        .map_err(|source| LaunchError::HomeCreation {
            parent: parent.to_path_buf(),
            source,
        })?;

    Ok(IsolatedHome { path: dir.keep() })
}
