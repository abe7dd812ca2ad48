//! Python dependency vendoring.
//!
//! Every requirement is materialized as a prebuilt wheel under `wheels/`
//! inside the plugin, and the requirements file is rewritten to install
//! exclusively from that directory, so the repackaged plugin installs
//! without network access.

use std::path::Path;

use super::error::{RepackError, RepackResult};
use super::process::ToolRunner;
use crate::config::Config;

/// Directory the wheels are vendored into, relative to the plugin root.
pub const WHEELS_DIR: &str = "wheels";

/// Dependency manifest file name.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Build backend pip needs before it can build source distributions.
const BUILD_BACKEND_REQS: [&str; 2] = ["setuptools>=40.8.0", "wheel"];

/// Vendor all dependencies of the plugin in `plugin_dir` into its
/// `wheels/` directory and rewrite `requirements.txt` for offline
/// installation.
///
/// With `platform` set, wheels are cross-built for that platform/ABI and
/// source-only distributions are rejected (`--only-binary=:all:`).
pub fn vendor_wheels(plugin_dir: &Path, config: &Config, platform: Option<&str>) -> RepackResult<()> {
    let wheels_dir = plugin_dir.join(WHEELS_DIR);
    std::fs::create_dir_all(&wheels_dir)?;

    let runner = ToolRunner::new().in_dir(plugin_dir);

    println!("Downloading build dependencies...");
    let mut args: Vec<String> = vec!["download".to_string()];
    args.extend(BUILD_BACKEND_REQS.iter().map(|r| (*r).to_string()));
    args.extend(["-d".to_string(), WHEELS_DIR.to_string()]);
    args.extend(index_args(config));

    let result = runner.run("pip", &args)?;
    if !result.success() {
        return Err(RepackError::DependencyBuild { stage: "pip download", status: result.status });
    }

    println!("Building all dependencies as wheels...");
    let mut args: Vec<String> = vec!["wheel".to_string()];
    if let Some(platform) = platform {
        args.extend([
            "--platform".to_string(),
            platform.to_string(),
            "--only-binary=:all:".to_string(),
        ]);
    }
    args.extend([
        "-r".to_string(),
        REQUIREMENTS_FILE.to_string(),
        "-w".to_string(),
        WHEELS_DIR.to_string(),
    ]);
    args.extend(index_args(config));

    let result = runner.run("pip", &args)?;
    if !result.success() {
        return Err(RepackError::DependencyBuild { stage: "pip wheel", status: result.status });
    }

    println!("Verifying all packages are in wheel format...");
    let stray = non_wheel_files(&wheels_dir)?;
    if stray.is_empty() {
        println!("All dependencies are pre-built as wheels.");
    } else {
        println!("Warning: found non-wheel files: {}", stray.join(", "));
        println!("These files may require building in the target environment.");
        tracing::warn!(files = ?stray, "vendored directory contains non-wheel artifacts");
    }

    rewrite_requirements(&plugin_dir.join(REQUIREMENTS_FILE))?;
    Ok(())
}

/// Files in the vendored directory that are not prebuilt wheels, sorted
/// by name. These are reported but never fail the run.
pub fn non_wheel_files(wheels_dir: &Path) -> RepackResult<Vec<String>> {
    let mut stray = Vec::new();

    for entry in std::fs::read_dir(wheels_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) != Some("whl") {
            stray.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    stray.sort();
    Ok(stray)
}

/// Prepend the offline-install directives to `requirements.txt`.
///
/// The first two lines of the rewritten file disable index resolution and
/// point pip at the vendored directory; the original content follows
/// byte-for-byte.
pub fn rewrite_requirements(path: &Path) -> RepackResult<()> {
    let original = std::fs::read_to_string(path)?;
    let rewritten = format!("--no-index\n--find-links=./{WHEELS_DIR}/\n{original}");
    std::fs::write(path, rewritten)?;
    Ok(())
}

fn index_args(config: &Config) -> Vec<String> {
    let mut args = vec!["--index-url".to_string(), config.pip_mirror_url.clone()];
    if let Some(host) = config.pip_trusted_host() {
        args.push("--trusted-host".to_string());
        args.push(host);
    }
    args
}
