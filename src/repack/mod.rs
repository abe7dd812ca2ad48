//! Plugin repackaging pipeline.
//!
//! Takes a Dify plugin package from the Marketplace, a GitHub release, or
//! the local filesystem and rebuilds it as an offline-installable archive:
//! the bundle is extracted, its identification metadata rewritten, every
//! Python dependency vendored as a prebuilt wheel, and the tree handed
//! back to the dify-plugin CLI for packaging.
//!
//! The pipeline is a single linear pass; the heavy lifting (dependency
//! resolution, wheel building, final packaging) is delegated to pip and
//! the bundled packager binary.

mod error;
mod extract;
mod ignore;
mod metadata;
mod package;
mod pipeline;
mod process;
mod source;
mod vendor;
mod workdir;

pub use error::{RepackError, RepackResult};
pub use extract::extract_archive;
pub use ignore::{prune_ignore_rules, IGNORE_FILES};
pub use metadata::{
    canonical_datetime, normalize_created_at, normalize_datetime_str, patch_manifest,
    patch_verification, MANIFEST_FILE, REPACK_AUTHOR, VERIFICATION_FILE,
};
pub use package::{packager_name, run_packager};
pub use pipeline::{RepackOptions, Repackager};
pub use process::{ExecutionResult, ToolRunner};
pub use source::{PluginSource, PACKAGE_EXTENSION};
pub use vendor::{
    non_wheel_files, rewrite_requirements, vendor_wheels, REQUIREMENTS_FILE, WHEELS_DIR,
};
pub use workdir::WorkdirGuard;
