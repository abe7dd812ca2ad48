//! # dify-repack
//!
//! Offline repackaging for Dify plugin packages.
//!
//! Dify plugins declare their Python dependencies in a `requirements.txt`
//! that is resolved over the network at install time. This crate fetches a
//! plugin package (Marketplace, GitHub release, or local file), vendors
//! every dependency as a prebuilt wheel inside the bundle, and rebuilds it
//! into an archive that installs on air-gapped deployments.
//!
//! ## Quick Start
//!
//! ```bash
//! # From the Dify Marketplace
//! dify-repack market langgenius openai 0.0.1
//!
//! # Cross-build for a Linux x86_64 target
//! dify-repack -p manylinux2014_x86_64 -s linux-amd64 local ./your-plugin.difypkg
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod repack;

// Re-export commonly used types
pub use config::Config;
pub use repack::{PluginSource, RepackError, RepackOptions, RepackResult, Repackager};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "dify-repack";
