//! Environments handed to the collaborators
//!
//! The launcher never calls `set_var`. Instead the environment a collaborator
//! sees is built from two explicit values:
//!
//! - [`BaseEnv`]: the launcher's inherited environment with `HOME` pointed at
//!   the isolated home
//! - [`EnvOverlay`]: what activation added, changed or removed on top of it

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;

/// Variables a POSIX shell maintains for itself; never part of an overlay.
const SHELL_BOOKKEEPING: &[&str] = &["_", "SHLVL"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseEnv {
    vars: BTreeMap<OsString, OsString>,
}

impl BaseEnv {
    /// The current process environment with `HOME` replaced
    pub fn inherit_with_home(home: &Path) -> Self {
        Self::from_vars(std::env::vars_os()).with_var("HOME", home.as_os_str())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn with_var(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn vars(&self) -> &BTreeMap<OsString, OsString> {
        &self.vars
    }

    /// Replace the command's environment with exactly this one
    pub fn apply(&self, cmd: &mut Command) {
        cmd.env_clear();
        cmd.envs(&self.vars);
    }
}

/// Changes activation made to a [`BaseEnv`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
    set: BTreeMap<OsString, OsString>,
    unset: BTreeSet<OsString>,
}

impl EnvOverlay {
    /// Compute the overlay that turns `base` into `activated`
    pub fn diff(base: &BaseEnv, activated: &BTreeMap<OsString, OsString>) -> Self {
        let bookkeeping = |key: &OsStr| SHELL_BOOKKEEPING.iter().any(|b| OsStr::new(b) == key);

        let set = activated
            .iter()
            .filter(|(k, _)| !bookkeeping(k))
            .filter(|(k, v)| base.vars.get(*k) != Some(*v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let unset = base
            .vars
            .keys()
            .filter(|k| !bookkeeping(k) && !activated.contains_key(*k))
            .cloned()
            .collect();

        Self { set, unset }
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }

    /// Value activation assigned to `key`, if it changed it
    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.set.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn removes(&self, key: impl AsRef<OsStr>) -> bool {
        self.unset.contains(key.as_ref())
    }

    pub fn set_vars(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.set.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    pub fn unset_vars(&self) -> impl Iterator<Item = &OsStr> {
        self.unset.iter().map(OsString::as_os_str)
    }

    /// Layer the overlay onto a command whose environment is already `base`
    pub fn apply(&self, cmd: &mut Command) {
        for key in &self.unset {
            cmd.env_remove(key);
        }
        cmd.envs(&self.set);
    }

    /// The full environment `base` becomes once the overlay is applied
    pub fn resolve(&self, base: &BaseEnv) -> BTreeMap<OsString, OsString> {
        let mut vars = base.vars.clone();
        vars.retain(|k, _| !self.unset.contains(k));
        vars.extend(self.set.iter().map(|(k, v)| (k.clone(), v.clone())));
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<OsString, OsString> {
        pairs
            .iter()
            .map(|(k, v)| (OsString::from(k), OsString::from(v)))
            .collect()
    }

    #[test]
    fn test_inherit_overrides_home() {
        let base = BaseEnv::inherit_with_home(Path::new("/tmp/analytics-home.x"));
        assert_eq!(base.get("HOME"), Some(OsStr::new("/tmp/analytics-home.x")));
    }

    #[test]
    fn test_diff_tracks_changes_and_removals() {
        let base = BaseEnv::from_vars([
            ("HOME", "/tmp/h"),
            ("PATH", "/usr/bin"),
            ("PYTHONHOME", "/opt/python"),
        ]);
        let activated = map(&[
            ("HOME", "/tmp/h"),
            ("PATH", "/code/env/bin:/usr/bin"),
            ("VIRTUAL_ENV", "/code/env"),
        ]);

        let overlay = EnvOverlay::diff(&base, &activated);
        assert_eq!(overlay.get("PATH"), Some(OsStr::new("/code/env/bin:/usr/bin")));
        assert_eq!(overlay.get("VIRTUAL_ENV"), Some(OsStr::new("/code/env")));
        assert_eq!(overlay.get("HOME"), None);
        assert!(overlay.removes("PYTHONHOME"));
        assert_eq!(overlay.set_vars().count(), 2);
    }

    #[test]
    fn test_diff_ignores_shell_bookkeeping() {
        let base = BaseEnv::from_vars([("PATH", "/usr/bin"), ("SHLVL", "1")]);
        let activated = map(&[("PATH", "/usr/bin"), ("SHLVL", "2"), ("_", "/usr/bin/env")]);

        let overlay = EnvOverlay::diff(&base, &activated);
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_resolve_applies_overlay() {
        let base = BaseEnv::from_vars([("HOME", "/tmp/h"), ("PYTHONHOME", "/opt/python")]);
        let activated = map(&[("HOME", "/tmp/h"), ("VIRTUAL_ENV", "/code/env")]);
        let overlay = EnvOverlay::diff(&base, &activated);

        assert_eq!(overlay.resolve(&base), activated);
    }
}
