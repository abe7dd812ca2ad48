//! The repackaging pipeline.
//!
//! Acquire, extract, patch metadata, vendor dependencies, prune ignore
//! rules, re-package. Phases run strictly in order; the first failure
//! aborts the run.

use std::path::{Path, PathBuf};

use super::error::{RepackError, RepackResult};
use super::source::PluginSource;
use super::workdir::WorkdirGuard;
use super::{extract, ignore, metadata, package, vendor};
use crate::config::Config;

/// Options controlling a repackaging run.
#[derive(Debug, Clone)]
pub struct RepackOptions {
    /// Cross-build target platform passed to pip
    /// (e.g. `manylinux2014_x86_64`); host platform if unset.
    pub platform: Option<String>,

    /// Suffix appended to the output archive stem.
    pub suffix: String,
}

impl Default for RepackOptions {
    fn default() -> Self {
        Self { platform: None, suffix: "offline".to_string() }
    }
}

/// Runs the repackaging pipeline for a single plugin package.
pub struct Repackager {
    config: Config,
    options: RepackOptions,

    /// Directory downloads, working trees, and the output land in.
    base_dir: PathBuf,
}

impl Repackager {
    /// Create a repackager anchored at the current directory.
    pub fn new(config: Config, options: RepackOptions) -> RepackResult<Self> {
        Ok(Self { config, options, base_dir: std::env::current_dir()? })
    }

    /// Acquire the plugin package from `source` and repackage it for
    /// offline installation, returning the path of the produced archive.
    pub fn run(&self, source: &PluginSource) -> RepackResult<PathBuf> {
        let archive = source.resolve(&self.config, &self.base_dir)?;
        self.repackage(&archive)
    }

    fn repackage(&self, archive: &Path) -> RepackResult<PathBuf> {
        // Checked before the working directory exists, so a bad local
        // path leaves nothing behind.
        if !archive.is_file() {
            return Err(RepackError::PackageNotFound(archive.to_path_buf()));
        }

        let stem = archive
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                RepackError::Extraction(format!("unusable archive name: {}", archive.display()))
            })?
            .to_string();

        let workdir = self.base_dir.join(&stem);
        std::fs::create_dir_all(&workdir)?;

        println!("Unzipping...");
        extract::extract_archive(archive, &workdir)?;

        println!("Repackaging...");
        {
            // Phases below run from inside the working tree; the guard
            // puts the process back in base_dir on success and failure.
            let _guard = WorkdirGuard::enter(&workdir)?;

            metadata::patch_manifest(&workdir)?;
            metadata::patch_verification(&workdir)?;
            vendor::vendor_wheels(&workdir, &self.config, self.options.platform.as_deref())?;
            ignore::prune_ignore_rules(&workdir)?;
        }

        let output = package::run_packager(&workdir, &stem, &self.options.suffix, &self.base_dir)?;
        println!("Repackage success.");

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_options() {
        let options = RepackOptions::default();
        assert_eq!(options.suffix, "offline");
        assert!(options.platform.is_none());
    }

    #[test]
    #[serial]
    fn test_missing_local_package_creates_no_workdir() {
        let temp = tempfile::tempdir().unwrap();
        let _guard = WorkdirGuard::enter(temp.path()).unwrap();

        let repackager = Repackager::new(Config::default(), RepackOptions::default()).unwrap();
        let source = PluginSource::Local { path: temp.path().join("missing.difypkg") };

        let err = repackager.run(&source).unwrap_err();
        assert!(matches!(err, RepackError::PackageNotFound(_)));
        assert!(!temp.path().join("missing").exists());
    }
}
