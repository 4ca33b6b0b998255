//! The bootstrap-and-delegate sequence
//!
//! ```text
//! Init -> HomeCreated -> RootPinned -> EnvActivated -> ConfigEnsured -> Delegated(code)
//! ```
//!
//! Any failure moves straight to `Failed(step)`; later steps never run.

use std::path::PathBuf;

use crate::bootstrap::{
    activate_environment, create_isolated_home, ensure_config_dir, pin_application_root,
    BaseEnv, IsolatedHome,
};
use crate::config::{HomeCleanup, LaunchConfig};
use crate::delegate::{open_log, run_task, TaskInvocation};
use crate::error::{LaunchError, Result, Step};

/// How far a launch has progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    HomeCreated,
    RootPinned,
    EnvActivated,
    ConfigEnsured,
    Delegated(i32),
    Failed(Step),
}

/// Outcome of a launch that reached the task runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launch {
    /// The isolated home. Already removed when cleanup was requested.
    pub home: PathBuf,
    pub config_dir: PathBuf,
    /// Exit code of the task, passed through untouched
    pub exit_code: i32,
}

#[derive(Debug)]
pub struct Launcher {
    config: LaunchConfig,
    stage: Stage,
    home: Option<PathBuf>,
}

impl Launcher {
    pub fn new(config: LaunchConfig) -> Self {
        Self {
            config,
            stage: Stage::Init,
            home: None,
        }
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The isolated home, once one has been created
    pub fn home(&self) -> Option<&PathBuf> {
        self.home.as_ref()
    }

    /// Run every step in order, stopping at the first failure. With
    /// [`HomeCleanup::RemoveOnExit`] the home is removed whether or not the
    /// later steps succeeded.
    pub fn run(&mut self) -> Result<Launch> {
        let home = create_isolated_home(&self.config.temp_root, &self.config.home_prefix)
            .inspect_err(|e| self.fail(e))?;
        self.home = Some(home.path().to_path_buf());
        self.advance(Stage::HomeCreated);

        let result = self.run_in_home(&home);
        if let Err(e) = &result {
            self.fail(e);
        }

        if self.config.cleanup == HomeCleanup::RemoveOnExit {
            let path = home.path().to_path_buf();
            if let Err(e) = home.remove() {
                tracing::warn!(
                    home = %path.display(),
                    error = %e,
                    "could not remove isolated home"
                );
            } else {
                tracing::debug!(home = %path.display(), "removed isolated home");
            }
        }

        result
    }

    fn run_in_home(&mut self, home: &IsolatedHome) -> Result<Launch> {
        let root = pin_application_root(&self.config.application_root)?;
        self.advance(Stage::RootPinned);

        let base = BaseEnv::inherit_with_home(home.path());
        let overlay = activate_environment(&self.config.activation_script, &root, &base)?;
        tracing::debug!(
            set = overlay.set_vars().count(),
            unset = overlay.unset_vars().count(),
            "activation overlay computed"
        );
        self.advance(Stage::EnvActivated);

        let config_dir = ensure_config_dir(&self.config, home)?;
        self.advance(Stage::ConfigEnsured);

        let log = open_log(&self.config.log_file)?;
        let invocation = TaskInvocation {
            command: &self.config.task_command,
            root: &root,
            base: &base,
            overlay: &overlay,
        };
        let exit_code = run_task(&invocation, log)?;
        self.advance(Stage::Delegated(exit_code));

        Ok(Launch {
            home: home.path().to_path_buf(),
            config_dir,
            exit_code,
        })
    }

    fn advance(&mut self, stage: Stage) {
        tracing::debug!(?stage, "launch stage reached");
        self.stage = stage;
    }

    fn fail(&mut self, error: &LaunchError) {
        tracing::debug!(step = %error.step(), after = ?self.stage, "launch failed");
        self.stage = Stage::Failed(error.step());
    }
}

/// Run a full launch with `config`
pub fn launch(config: &LaunchConfig) -> Result<Launch> {
    Launcher::new(config.clone()).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    struct Fixture {
        tmp: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = tempfile::tempdir().unwrap();
            fs::create_dir_all(tmp.path().join("code/env/bin")).unwrap();
            fs::create_dir_all(tmp.path().join("homes")).unwrap();
            fs::create_dir_all(tmp.path().join("log")).unwrap();
            fs::write(
                tmp.path().join("code/env/bin/activate"),
                "VIRTUAL_ENV=/code/env\nexport VIRTUAL_ENV\n",
            )
            .unwrap();
            Self { tmp }
        }

        fn path(&self) -> &Path {
            self.tmp.path()
        }

        fn config(&self, task: &str) -> LaunchConfig {
            LaunchConfig::default()
                .with_temp_root(self.path().join("homes"))
                .with_application_root(self.path().join("code"))
                .with_activation_script(self.path().join("code/env/bin/activate"))
                .with_log_file(self.path().join("log/analytics.log"))
                .with_task_command(["/bin/sh", "-c", task])
        }

        fn log(&self) -> String {
            fs::read_to_string(self.path().join("log/analytics.log")).unwrap_or_default()
        }
    }

    #[test]
    fn test_full_launch() {
        let fx = Fixture::new();
        let mut launcher = Launcher::new(fx.config("echo \"$HOME $VIRTUAL_ENV\"; exit 3"));

        let launch = launcher.run().unwrap();

        assert_eq!(launch.exit_code, 3);
        assert_eq!(launcher.stage(), Stage::Delegated(3));
        assert!(launch.home.starts_with(fx.path().join("homes")));
        assert!(launch.config_dir.is_dir());
        assert!(launch.config_dir.starts_with(&launch.home));
        assert_eq!(fx.log(), format!("{} /code/env\n", launch.home.display()));
    }

    #[test]
    fn test_missing_root_stops_before_activation() {
        let fx = Fixture::new();
        let config = fx.config("echo ran").with_application_root(fx.path().join("missing"));
        let mut launcher = Launcher::new(config);

        let err = launcher.run().unwrap_err();

        assert_eq!(err.step(), Step::ApplicationRoot);
        assert_eq!(launcher.stage(), Stage::Failed(Step::ApplicationRoot));
        assert!(!fx.path().join("log/analytics.log").exists());
        // home was created but nothing went into it
        let home = launcher.home().unwrap();
        assert!(!home.join(".config").exists());
    }

    #[test]
    fn test_failed_activation_skips_task() {
        let fx = Fixture::new();
        fs::write(fx.path().join("code/env/bin/activate"), "return 1\n").unwrap();
        let mut launcher = Launcher::new(fx.config("echo ran"));

        let err = launcher.run().unwrap_err();

        assert_eq!(err.step(), Step::Activation);
        assert_eq!(launcher.stage(), Stage::Failed(Step::Activation));
        assert!(!fx.path().join("log/analytics.log").exists());
    }

    #[test]
    fn test_config_dir_exists_before_task() {
        let fx = Fixture::new();
        let task = "test -d \"$HOME/.config/matplotlib\" && test -w \"$HOME/.config/matplotlib\"";

        let launch = launch(&fx.config(task)).unwrap();
        assert_eq!(launch.exit_code, 0);
    }

    #[test]
    fn test_cleanup_on_exit() {
        let fx = Fixture::new();
        let config = fx.config("touch \"$HOME/state\"").with_cleanup(HomeCleanup::RemoveOnExit);

        let launch = launch(&config).unwrap();

        assert_eq!(launch.exit_code, 0);
        assert!(!launch.home.exists());
    }

    #[test]
    fn test_home_kept_by_default() {
        let fx = Fixture::new();
        let launch = launch(&fx.config("touch \"$HOME/state\"")).unwrap();
        assert!(launch.home.join("state").is_file());
    }
}
