//! Append-mode log sink shared by every launch

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::error::{LaunchError, Result};

/// The log file, opened with `O_APPEND`. Every write the task makes lands at
/// the current end of file, so concurrent launches never overwrite each other.
#[derive(Debug)]
pub struct LogSink {
    path: PathBuf,
    file: File,
}

/// Open (creating if needed) the log file for appending. The parent directory
/// must already exist.
pub fn open_log(path: &Path) -> Result<LogSink> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LaunchError::LogOpen {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(LogSink {
        path: path.to_path_buf(),
        file,
    })
}

impl LogSink {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one diagnostic line written by the launcher itself
    pub fn write_line(&self, line: &str) -> Result<()> {
        (&self.file)
            .write_all(format!("{}\n", line).as_bytes())
            .map_err(|source| LaunchError::LogWrite {
                path: self.path.clone(),
                source,
            })
    }

    /// Stdout and stderr handles sharing one open file description
    pub fn stdio_pair(&self) -> Result<(Stdio, Stdio)> {
        let clone = || {
            self.file.try_clone().map_err(|source| LaunchError::LogOpen {
                path: self.path.clone(),
                source,
            })
        };
        Ok((Stdio::from(clone()?), Stdio::from(clone()?)))
    }
}
