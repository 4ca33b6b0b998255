//! analytics-launcher - run the analytics task in an isolated environment
//!
//! The launcher creates a throwaway home directory, activates the runtime
//! environment shipped with the application, makes sure the tool config
//! directory exists, and hands off to the task runner with its output
//! appended to a shared log file.
//!
//! # Example
//!
//! ```no_run
//! use analytics_launcher::{launch, LaunchConfig};
//!
//! let outcome = launch(&LaunchConfig::default()).unwrap();
//! std::process::exit(outcome.exit_code);
//! ```

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod delegate;
pub mod error;
pub mod launcher;
pub mod observability;

pub use bootstrap::{BaseEnv, EnvOverlay, IsolatedHome, PinnedRoot};
pub use config::{HomeCleanup, LaunchConfig};
pub use error::{LaunchError, Result, Step};
pub use launcher::{launch, Launch, Launcher, Stage};
