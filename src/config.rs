//! Launch configuration
//!
//! The production launcher runs with [`LaunchConfig::default`]; none of these
//! paths are read from the command line or the environment.

use std::path::{Path, PathBuf};

pub const APPLICATION_ROOT: &str = "/code";
pub const ACTIVATION_SCRIPT: &str = "/code/env/bin/activate";
pub const CONFIG_TOOL_NAME: &str = "matplotlib";
pub const LOG_FILE: &str = "/var/log/osf/analytics.log";
pub const TASK_RUNNER: &str = "invoke";
pub const TASK_NAME: &str = "analytics";
pub const HOME_PREFIX: &str = "analytics-home.";

/// What happens to the isolated home once the task returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeCleanup {
    /// Leave the directory behind for the host to reap
    #[default]
    Keep,
    /// Remove the directory tree after the task exits
    RemoveOnExit,
}

#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Directory the isolated home is created in
    pub temp_root: PathBuf,
    /// Name prefix for the isolated home
    pub home_prefix: String,
    /// Working directory for the collaborators
    pub application_root: PathBuf,
    /// Script sourced to activate the runtime environment
    pub activation_script: PathBuf,
    /// Name of the directory created under `<home>/.config`
    pub config_tool: String,
    /// Append-mode sink for the task's output
    pub log_file: PathBuf,
    /// Task runner program followed by its arguments
    pub task_command: Vec<String>,
    pub cleanup: HomeCleanup,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            temp_root: std::env::temp_dir(),
            home_prefix: HOME_PREFIX.to_string(),
            application_root: PathBuf::from(APPLICATION_ROOT),
            activation_script: PathBuf::from(ACTIVATION_SCRIPT),
            config_tool: CONFIG_TOOL_NAME.to_string(),
            log_file: PathBuf::from(LOG_FILE),
            task_command: vec![TASK_RUNNER.to_string(), TASK_NAME.to_string()],
            cleanup: HomeCleanup::Keep,
        }
    }
}

impl LaunchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temp_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_root = dir.into();
        self
    }

    pub fn with_application_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.application_root = dir.into();
        self
    }

    pub fn with_activation_script(mut self, path: impl Into<PathBuf>) -> Self {
        self.activation_script = path.into();
        self
    }

    pub fn with_config_tool(mut self, name: impl Into<String>) -> Self {
        self.config_tool = name.into();
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }

    /// Replace the task runner command (program first)
    pub fn with_task_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.task_command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cleanup(mut self, cleanup: HomeCleanup) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// `<home>/.config/<tool>`
    pub fn config_dir_in(&self, home: &Path) -> PathBuf {
        home.join(".config").join(&self.config_tool)
    }
}
