//! Environment isolation for unit tests.
//!
//! Config and cart code read `STOREFRONT_ROOT`, `STOREFRONT_API_URL` and
//! `STOREFRONT_TOKEN` from the process environment. Tests that change them
//! hold a guard that puts every touched variable back on drop, panics
//! included. The environment is process-global, so such tests are `#[serial]`.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::{ENV_API_URL, ENV_TOKEN};
use crate::types::STOREFRONT_DIR;

const ENV_ROOT: &str = "STOREFRONT_ROOT";

/// Restores a set of environment variables to their values at first touch.
#[derive(Default)]
pub struct EnvGuard {
    saved: Vec<(String, Option<OsString>)>,
}

impl EnvGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` for the lifetime of the guard.
    ///
    /// # Safety
    /// Mutates the process environment; callers must be `#[serial]`.
    pub unsafe fn set(key: &str, value: impl AsRef<OsStr>) -> Self {
        let mut guard = Self::new();
        unsafe { guard.with(key, Some(value.as_ref())) };
        guard
    }

    /// Remove `key` for the lifetime of the guard.
    ///
    /// # Safety
    /// Mutates the process environment; callers must be `#[serial]`.
    pub unsafe fn remove(key: &str) -> Self {
        let mut guard = Self::new();
        unsafe { guard.with(key, None) };
        guard
    }

    /// Set (`Some`) or remove (`None`) one more variable.
    ///
    /// # Safety
    /// Mutates the process environment; callers must be `#[serial]`.
    pub unsafe fn with(&mut self, key: &str, value: Option<&OsStr>) -> &mut Self {
        if !self.saved.iter().any(|(saved, _)| saved == key) {
            self.saved.push((key.to_string(), env::var_os(key)));
        }
        match value {
            Some(value) => unsafe { env::set_var(key, value) },
            None => unsafe { env::remove_var(key) },
        }
        self
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // Reverse order so a key touched twice ends at its first snapshot.
        for (key, value) in self.saved.drain(..).rev() {
            match value {
                Some(value) => unsafe { env::set_var(&key, value) },
                None => unsafe { env::remove_var(&key) },
            }
        }
    }
}

/// A throwaway storefront root with the API settings cleared.
pub struct TempRoot {
    _env: EnvGuard,
    dir: TempDir,
}

impl TempRoot {
    /// # Safety
    /// Mutates the process environment; callers must be `#[serial]`.
    pub unsafe fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let root = dir.path().join(STOREFRONT_DIR);
        let mut env = EnvGuard::new();
        unsafe {
            env.with(ENV_ROOT, Some(root.as_os_str()))
                .with(ENV_API_URL, None)
                .with(ENV_TOKEN, None);
        }
        Self { _env: env, dir }
    }

    /// The `.storefront` directory inside the temp dir. Not created until something saves.
    pub fn path(&self) -> PathBuf {
        self.dir.path().join(STOREFRONT_DIR)
    }

    pub fn temp_dir(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_restores_previous_value() {
        let key = "STOREFRONT_TEST_GUARD_EXISTING";
        unsafe { env::set_var(key, "before") };
        {
            let _guard = unsafe { EnvGuard::set(key, "during") };
            assert_eq!(env::var(key).unwrap(), "during");
        }
        assert_eq!(env::var(key).unwrap(), "before");
        unsafe { env::remove_var(key) };
    }

    #[test]
    #[serial]
    fn test_removes_variable_that_was_absent() {
        let key = "STOREFRONT_TEST_GUARD_ABSENT";
        unsafe { env::remove_var(key) };
        {
            let _guard = unsafe { EnvGuard::set(key, "temp") };
            assert!(env::var(key).is_ok());
        }
        assert!(env::var_os(key).is_none());
    }

    #[test]
    #[serial]
    fn test_key_touched_twice_restores_first_snapshot() {
        let key = "STOREFRONT_TEST_GUARD_TWICE";
        unsafe { env::set_var(key, "first") };
        {
            let mut guard = EnvGuard::new();
            unsafe {
                guard
                    .with(key, Some(OsStr::new("second")))
                    .with(key, None);
            }
            assert!(env::var_os(key).is_none());
        }
        assert_eq!(env::var(key).unwrap(), "first");
        unsafe { env::remove_var(key) };
    }

    #[test]
    #[serial]
    fn test_temp_root_isolates_storefront_env() {
        let _url = unsafe { EnvGuard::set(ENV_API_URL, "http://outer") };
        {
            let root = unsafe { TempRoot::new() };
            assert_eq!(env::var_os(ENV_ROOT).map(PathBuf::from), Some(root.path()));
            assert!(env::var_os(ENV_API_URL).is_none());
            assert!(root.path().starts_with(root.temp_dir()));
        }
        assert_eq!(env::var(ENV_API_URL).unwrap(), "http://outer");
    }
}
