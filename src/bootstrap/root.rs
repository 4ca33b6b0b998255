//! Working-directory pin

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::bootstrap::check_access;
use crate::error::{LaunchError, Result};

/// An application root that has been checked to be an enterable directory.
/// Every collaborator process is started inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedRoot {
    path: PathBuf,
}

impl PinnedRoot {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Check that `path` exists, is a directory and can be entered (the same
/// conditions `chdir(2)` enforces).
pub fn pin_application_root(path: &Path) -> Result<PinnedRoot> {
    let inaccessible = |source: io::Error| LaunchError::RootInaccessible {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(inaccessible)?;
    if !metadata.is_dir() {
        return Err(LaunchError::RootNotDirectory(path.to_path_buf()));
    }

    check_access(path, libc::X_OK).map_err(inaccessible)?;

    Ok(PinnedRoot {
        path: path.to_path_buf(),
    })
}
