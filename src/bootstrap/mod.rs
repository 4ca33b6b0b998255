//! Bootstrap steps run before the task is handed off
//!
//! Each step either yields a value the next one consumes or fails with a
//! [`LaunchError`](crate::error::LaunchError). Nothing here touches the
//! launcher's own process environment or working directory.

pub mod activate;
pub mod config_dir;
pub mod env;
pub mod home;
pub mod root;

pub use activate::activate_environment;
pub use config_dir::ensure_config_dir;
pub use env::{BaseEnv, EnvOverlay};
pub use home::{create_isolated_home, IsolatedHome};
pub use root::{pin_application_root, PinnedRoot};

use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// `access(2)` for the real user: `Ok` if every permission in `mode`
/// (`libc::R_OK`, `W_OK`, `X_OK`) is granted on `path`.
pub(crate) fn check_access(path: &Path, mode: libc::c_int) -> io::Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call
    let rc = unsafe { libc::access(c_path.as_ptr(), mode) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
