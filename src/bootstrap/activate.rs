//! Runtime environment activation
//!
//! Activation scripts (a virtualenv's `bin/activate`, for instance) are meant
//! to be sourced into a shell. The launcher sources the script in a child
//! `/bin/sh`, has that shell print its environment NUL-separated, and keeps
//! the difference as an [`EnvOverlay`].
//!
//! Anything the script itself prints is sent to the launcher's stderr so the
//! stdout pipe carries nothing but the `env -0` dump.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::bootstrap::env::{BaseEnv, EnvOverlay};
use crate::bootstrap::root::PinnedRoot;
use crate::error::{LaunchError, Result};

const SHELL: &str = "/bin/sh";
// env is named absolutely: the sourced script may have replaced PATH
const SOURCE_AND_DUMP: &str = ". \"$1\" >&2 && exec /usr/bin/env -0";

pub fn activate_environment(
    script: &Path,
    root: &PinnedRoot,
    base: &BaseEnv,
) -> Result<EnvOverlay> {
    if !script.is_file() {
        return Err(LaunchError::ActivationMissing(script.to_path_buf()));
    }

    let mut cmd = Command::new(SHELL);
    cmd.arg("-c")
        .arg(SOURCE_AND_DUMP)
        .arg("sh")
        .arg(script)
        .current_dir(root.path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());
    base.apply(&mut cmd);

    let output = cmd.output().map_err(|source| LaunchError::ActivationSpawn {
        path: script.to_path_buf(),
        source,
    })?;

    if !output.status.success() {
        return Err(LaunchError::ActivationFailed {
            path: script.to_path_buf(),
            status: output.status.to_string(),
        });
    }

    let activated = parse_env_dump(&output.stdout)
        .ok_or_else(|| LaunchError::ActivationOutput(script.to_path_buf()))?;

    Ok(EnvOverlay::diff(base, &activated))
}

/// Parse `env -0` output. Returns `None` if an entry has no `=`.
fn parse_env_dump(bytes: &[u8]) -> Option<BTreeMap<OsString, OsString>> {
    let mut vars = BTreeMap::new();
    for entry in bytes.split(|b| *b == 0).filter(|e| !e.is_empty()) {
        let eq = entry.iter().position(|b| *b == b'=')?;
        // a leading '=' would be an empty name
        if eq == 0 {
            return None;
        }
        let key = OsStr::from_bytes(&entry[..eq]).to_os_string();
        let value = OsStr::from_bytes(&entry[eq + 1..]).to_os_string();
        vars.insert(key, value);
    }
    Some(vars)
}
