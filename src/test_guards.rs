//! RAII guard for environment variables touched by tests.
//!
//! Environment variables are process-global, so tests using this guard must
//! also be marked `#[serial]`.

use std::env;
use std::ffi::{OsStr, OsString};

/// Snapshots a set of environment variables and restores them on drop.
pub struct EnvGuard {
    saved: Vec<(String, Option<OsString>)>,
}

impl EnvGuard {
    pub fn new(keys: &[&str]) -> Self {
        Self {
            saved: keys
                .iter()
                .map(|key| (key.to_string(), env::var_os(key)))
                .collect(),
        }
    }

    /// Set `key`, which must be one of the guarded keys.
    ///
    /// # Safety
    /// Calls `std::env::set_var`; the calling test must be `#[serial]`.
    pub unsafe fn set(&self, key: &str, value: impl AsRef<OsStr>) {
        debug_assert!(self.saved.iter().any(|(k, _)| k == key));
        unsafe { env::set_var(key, value) };
    }

    /// Remove `key`, which must be one of the guarded keys.
    ///
    /// # Safety
    /// Calls `std::env::remove_var`; the calling test must be `#[serial]`.
    pub unsafe fn remove(&self, key: &str) {
        debug_assert!(self.saved.iter().any(|(k, _)| k == key));
        unsafe { env::remove_var(key) };
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, original) in &self.saved {
            // SAFETY: guarded tests run under #[serial].
            match original {
                Some(value) => unsafe { env::set_var(key, value) },
                None => unsafe { env::remove_var(key) },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_restores_set_and_absent_vars() {
        let present = "FOLIO_TEST_GUARD_PRESENT";
        let absent = "FOLIO_TEST_GUARD_ABSENT";
        unsafe {
            env::set_var(present, "original");
            env::remove_var(absent);
        }
        {
            let guard = EnvGuard::new(&[present, absent]);
            unsafe {
                guard.remove(present);
                guard.set(absent, "temporary");
            }
            assert!(env::var(present).is_err());
            assert_eq!(env::var(absent).unwrap(), "temporary");
        }
        assert_eq!(env::var(present).unwrap(), "original");
        assert!(env::var(absent).is_err());
        unsafe { env::remove_var(present) };
    }
}
