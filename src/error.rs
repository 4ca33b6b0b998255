//! Error types for the launcher

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The bootstrap step a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    IsolatedHome,
    ApplicationRoot,
    Activation,
    ConfigDir,
    Delegation,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::IsolatedHome => "isolated home",
            Step::ApplicationRoot => "application root",
            Step::Activation => "environment activation",
            Step::ConfigDir => "config directory",
            Step::Delegation => "task delegation",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Could not create isolated home under {}: {source}", .parent.display())]
    HomeCreation {
        parent: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Application root {} is not accessible: {source}", .path.display())]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Application root {} is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("Activation script not found: {}", .0.display())]
    ActivationMissing(PathBuf),

    #[error("Could not run activation script {}: {source}", .path.display())]
    ActivationSpawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Activation script {} failed ({status})", .path.display())]
    ActivationFailed { path: PathBuf, status: String },

    #[error("Activation script {} produced a malformed environment", .0.display())]
    ActivationOutput(PathBuf),

    #[error("Could not create config directory {}: {source}", .path.display())]
    ConfigDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not open log file {}: {source}", .path.display())]
    LogOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not write to log file {}: {source}", .path.display())]
    LogWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Task runner command is empty")]
    EmptyTaskCommand,
}

impl LaunchError {
    /// The step that failed
    pub fn step(&self) -> Step {
        match self {
            LaunchError::HomeCreation { .. } => Step::IsolatedHome,
            LaunchError::RootInaccessible { .. } | LaunchError::RootNotDirectory(_) => {
                Step::ApplicationRoot
            }
            LaunchError::ActivationMissing(_)
            | LaunchError::ActivationSpawn { .. }
            | LaunchError::ActivationFailed { .. }
            | LaunchError::ActivationOutput(_) => Step::Activation,
            LaunchError::ConfigDir { .. } => Step::ConfigDir,
            LaunchError::LogOpen { .. }
            | LaunchError::LogWrite { .. }
            | LaunchError::EmptyTaskCommand => Step::Delegation,
        }
    }

    /// Whether this failure happened while preparing the environment,
    /// before the task could be handed off
    pub fn is_environment_setup(&self) -> bool {
        self.step() != Step::Delegation
    }

    /// Process exit code for this failure (sysexits.h values)
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::HomeCreation { .. } | LaunchError::ConfigDir { .. } => EX_CANTCREAT,
            LaunchError::RootInaccessible { .. } | LaunchError::RootNotDirectory(_) => {
                EX_NOINPUT
            }
            LaunchError::ActivationMissing(_)
            | LaunchError::ActivationSpawn { .. }
            | LaunchError::ActivationFailed { .. }
            | LaunchError::ActivationOutput(_) => EX_CONFIG,
            LaunchError::LogOpen { .. } | LaunchError::LogWrite { .. } => EX_IOERR,
            LaunchError::EmptyTaskCommand => EX_UNAVAILABLE,
        }
    }
}

pub const EX_NOINPUT: i32 = 66;
pub const EX_UNAVAILABLE: i32 = 69;
pub const EX_CANTCREAT: i32 = 73;
pub const EX_IOERR: i32 = 74;
pub const EX_CONFIG: i32 = 78;

pub type Result<T> = std::result::Result<T, LaunchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_failures_are_classified() {
        let err = LaunchError::RootNotDirectory(PathBuf::from("/code"));
        assert_eq!(err.step(), Step::ApplicationRoot);
        assert!(err.is_environment_setup());
        assert_eq!(err.exit_code(), EX_NOINPUT);

        let err = LaunchError::ActivationMissing(PathBuf::from("/code/env/bin/activate"));
        assert_eq!(err.step(), Step::Activation);
        assert!(err.is_environment_setup());
    }

    #[test]
    fn test_delegation_failures_are_not_setup() {
        let err = LaunchError::LogWrite {
            path: PathBuf::from("/var/log/osf/analytics.log"),
            source: io::Error::from(io::ErrorKind::Other),
        };
        assert_eq!(err.step(), Step::Delegation);
        assert!(!err.is_environment_setup());
        assert_eq!(err.exit_code(), EX_IOERR);

        assert_eq!(LaunchError::EmptyTaskCommand.exit_code(), EX_UNAVAILABLE);
    }

    #[test]
    fn test_error_message_names_path() {
        let err = LaunchError::ConfigDir {
            path: PathBuf::from("/tmp/home/.config/matplotlib"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/tmp/home/.config/matplotlib"));
    }
}
