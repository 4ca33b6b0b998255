//! CLI argument parsing

use clap::Parser;

/// The launcher takes no options of its own; clap only supplies `--help` and
/// `--version` and rejects anything else.
#[derive(Parser, Debug)]
#[command(name = "analytics-launcher")]
#[command(
    author,
    version,
    about = "Run the analytics task in an isolated home with the runtime environment activated",
    long_about = "Creates a fresh home directory, activates the runtime environment from the \
                  application root, ensures the tool config directory exists, then runs \
                  `invoke analytics` with all of its output appended to the analytics log. \
                  Exits with the task's exit code."
)]
pub struct Args {}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_no_arguments() {
        assert!(Args::try_parse_from(["analytics-launcher"]).is_ok());
    }

    #[test]
    fn test_rejects_arguments() {
        assert!(Args::try_parse_from(["analytics-launcher", "reports"]).is_err());
        assert!(Args::try_parse_from(["analytics-launcher", "--dry-run"]).is_err());
    }

    #[test]
    fn test_command_is_valid() {
        Args::command().debug_assert();
    }
}
