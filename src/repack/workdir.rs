//! Scoped working-directory changes.
//!
//! The metadata, vendoring, and pruning phases run from inside the
//! extraction directory. The process working directory is shared mutable
//! state, so it is acquired and released through a guard that restores
//! the previous directory on every exit path, including early `?` returns.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

/// RAII guard for a temporary working-directory change.
#[derive(Debug)]
pub struct WorkdirGuard {
    original: PathBuf,
}

impl WorkdirGuard {
    /// Switch the process into `dir`, restoring the previous directory
    /// when the guard is dropped.
    pub fn enter(dir: &Path) -> io::Result<Self> {
        let original = env::current_dir()?;
        env::set_current_dir(dir)?;
        Ok(Self { original })
    }

    /// The directory the process will return to.
    pub fn original(&self) -> &Path {
        &self.original
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.original) {
            tracing::warn!(
                dir = %self.original.display(),
                "failed to restore working directory: {e}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_enter_and_restore() {
        let before = env::current_dir().unwrap();
        let temp = tempfile::tempdir().unwrap();

        {
            let guard = WorkdirGuard::enter(temp.path()).unwrap();
            assert_eq!(guard.original(), before);
            let inside = env::current_dir().unwrap();
            assert_eq!(inside.canonicalize().unwrap(), temp.path().canonicalize().unwrap());
        }

        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn test_restore_on_early_return() {
        let before = env::current_dir().unwrap();
        let temp = tempfile::tempdir().unwrap();

        fn fails_inside(dir: &Path) -> io::Result<()> {
            let _guard = WorkdirGuard::enter(dir)?;
            Err(io::Error::other("phase failed"))
        }

        assert!(fails_inside(temp.path()).is_err());
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn test_enter_missing_dir_fails() {
        let before = env::current_dir().unwrap();
        assert!(WorkdirGuard::enter(Path::new("/definitely/not/a/dir")).is_err());
        assert_eq!(env::current_dir().unwrap(), before);
    }
}
