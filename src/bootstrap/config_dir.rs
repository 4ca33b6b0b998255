//! Tool configuration directory under the isolated home

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::bootstrap::check_access;
use crate::bootstrap::home::IsolatedHome;
use crate::config::LaunchConfig;
use crate::error::{LaunchError, Result};

/// `mkdir -p <home>/.config/<tool>`. Succeeds if the directory already exists.
pub fn ensure_config_dir(config: &LaunchConfig, home: &IsolatedHome) -> Result<PathBuf> {
    let dir = config.config_dir_in(home.path());
    let failed = |source: io::Error| LaunchError::ConfigDir {
        path: dir.clone(),
        source,
    };

    fs::create_dir_all(&dir).map_err(failed)?;

    // the tool writes its cache and rc files here
    check_access(&dir, libc::W_OK | libc::X_OK).map_err(failed)?;

    Ok(dir)
}
