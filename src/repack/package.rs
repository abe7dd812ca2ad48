//! Final plugin packaging.
//!
//! The last phase hands the patched working tree to the dify-plugin CLI
//! that ships alongside this tool, which produces the installable
//! `.difypkg`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::error::{RepackError, RepackResult};
use super::process::ToolRunner;
use super::source::PACKAGE_EXTENSION;

/// Maximum package size passed to the packager.
const MAX_PACKAGE_SIZE: &str = "5120";

/// Name of the bundled dify-plugin executable for the host platform.
///
/// Two architecture buckets: `arm64` for 64-bit ARM machines, `amd64`
/// for everything else.
pub fn packager_name() -> String {
    let arch = match std::env::consts::ARCH {
        "aarch64" => "arm64",
        _ => "amd64",
    };
    format!("dify-plugin-{}-{arch}", std::env::consts::OS)
}

/// Package `plugin_dir` into `<stem>-<suffix>.difypkg` inside
/// `output_dir`, returning the output path.
pub fn run_packager(
    plugin_dir: &Path,
    stem: &str,
    suffix: &str,
    output_dir: &Path,
) -> RepackResult<PathBuf> {
    let packager = packager_path()?;
    ensure_executable(&packager)?;

    let output = output_dir.join(format!("{stem}-{suffix}.{PACKAGE_EXTENSION}"));

    let args: Vec<OsString> = vec![
        "plugin".into(),
        "package".into(),
        plugin_dir.into(),
        "-o".into(),
        output.clone().into(),
        "--max-size".into(),
        MAX_PACKAGE_SIZE.into(),
    ];

    let result = ToolRunner::new().run(&packager, &args)?;
    if !result.success() {
        return Err(RepackError::Repackage(format!(
            "{} exited with {}",
            packager_name(),
            result.status
        )));
    }

    Ok(output)
}

/// Locate the packager next to the running executable.
fn packager_path() -> RepackResult<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().ok_or_else(|| RepackError::MissingPackager(exe.clone()))?;

    let path = dir.join(packager_name());
    if !path.exists() {
        return Err(RepackError::MissingPackager(path));
    }
    Ok(path)
}

#[cfg(unix)]
fn ensure_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn ensure_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
