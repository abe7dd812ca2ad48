//! Ignore-rule pruning.
//!
//! Plugin authors routinely ignore their local `wheels/` directory; left
//! in place, that rule would strip the vendored wheels out of the final
//! package.

use std::path::Path;

use super::error::RepackResult;
use super::vendor::WHEELS_DIR;

/// Ignore files consulted, in priority order.
pub const IGNORE_FILES: [&str; 2] = [".difyignore", ".gitignore"];

/// Remove rules excluding the vendored directory from the first ignore
/// file that exists in `plugin_dir`.
///
/// Only lines whose trimmed content starts with `wheels/` are dropped;
/// every other line, including comments and blanks, is preserved
/// verbatim and in order. No ignore file at all is a no-op.
pub fn prune_ignore_rules(plugin_dir: &Path) -> RepackResult<()> {
    let Some(path) = IGNORE_FILES.iter().map(|name| plugin_dir.join(name)).find(|p| p.exists())
    else {
        return Ok(());
    };

    let prefix = format!("{WHEELS_DIR}/");
    let content = std::fs::read_to_string(&path)?;

    let mut kept = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        if !line.trim().starts_with(&prefix) {
            kept.push_str(line);
        }
    }

    std::fs::write(&path, kept)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prunes_wheels_rules_only() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(".difyignore");
        std::fs::write(
            &path,
            "# build artifacts\n__pycache__/\nwheels/\n\n  wheels/cache\n*.pyc\n",
        )
        .unwrap();

        prune_ignore_rules(temp.path()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# build artifacts\n__pycache__/\n\n*.pyc\n");
    }

    #[test]
    fn test_difyignore_takes_priority() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join(".difyignore"), "wheels/\n").unwrap();
        std::fs::write(temp.path().join(".gitignore"), "wheels/\nvenv/\n").unwrap();

        prune_ignore_rules(temp.path()).unwrap();

        assert_eq!(std::fs::read_to_string(temp.path().join(".difyignore")).unwrap(), "");
        // .gitignore is untouched when .difyignore exists.
        assert_eq!(
            std::fs::read_to_string(temp.path().join(".gitignore")).unwrap(),
            "wheels/\nvenv/\n"
        );
    }

    #[test]
    fn test_falls_back_to_gitignore() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join(".gitignore"), "wheels/\nvenv/\n").unwrap();

        prune_ignore_rules(temp.path()).unwrap();

        assert_eq!(std::fs::read_to_string(temp.path().join(".gitignore")).unwrap(), "venv/\n");
    }

    #[test]
    fn test_no_ignore_file_is_noop() {
        let temp = tempfile::tempdir().unwrap();
        prune_ignore_rules(temp.path()).unwrap();
    }

    #[test]
    fn test_preserves_missing_trailing_newline() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(".gitignore");
        std::fs::write(&path, "wheels/\nvenv").unwrap();

        prune_ignore_rules(temp.path()).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "venv");
    }

    #[test]
    fn test_wheel_file_rules_are_kept() {
        // Only directory-prefix rules are dropped; a rule for a stray
        // wheel file elsewhere stays.
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(".gitignore");
        std::fs::write(&path, "wheels/\n*.whl\nwheelhouse/\n").unwrap();

        prune_ignore_rules(temp.path()).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "*.whl\nwheelhouse/\n");
    }
}
