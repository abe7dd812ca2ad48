//! dify-repack - repackage Dify plugins for offline installation.
//!
//! Fetches a plugin package, vendors its Python dependencies as prebuilt
//! wheels, and rebuilds it into an archive that installs without network
//! access.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dify_repack::{Config, PluginSource, RepackOptions, Repackager};

/// Repackage a Dify plugin with its Python dependencies vendored for offline installation
#[derive(Parser)]
#[command(name = "dify-repack")]
#[command(author, version, long_about = None)]
struct Cli {
    /// Python packages platform for cross repackaging (e.g. manylinux2014_x86_64)
    #[arg(short, long)]
    platform: Option<String>,

    /// Output package suffix
    #[arg(short, long, default_value = "offline")]
    suffix: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Where the plugin package comes from
    #[arg(value_enum)]
    source: Source,

    /// Source-specific arguments (market: author name version,
    /// github: repo release asset, local: path)
    args: Vec<String>,
}

/// Plugin package sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Source {
    /// The Dify Marketplace
    Market,
    /// A GitHub release asset
    Github,
    /// A package file on disk
    Local,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    match run(&cli) {
        Ok(output) => {
            tracing::debug!(output = %output.display(), "repackaging finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<PathBuf> {
    let source = parse_source(cli)?;
    let options = RepackOptions { platform: cli.platform.clone(), suffix: cli.suffix.clone() };

    let repackager = Repackager::new(Config::from_env(), options)?;
    Ok(repackager.run(&source)?)
}

/// Validate the source-specific positional arguments.
fn parse_source(cli: &Cli) -> Result<PluginSource> {
    match cli.source {
        Source::Market => match cli.args.as_slice() {
            [author, name, version]
                if !author.is_empty() && !name.is_empty() && !version.is_empty() =>
            {
                Ok(PluginSource::Market {
                    author: author.clone(),
                    name: name.clone(),
                    version: version.clone(),
                })
            }
            _ => anyhow::bail!("Usage: market [plugin author] [plugin name] [plugin version]"),
        },
        Source::Github => match cli.args.as_slice() {
            [repo, release, asset]
                if !repo.is_empty() && !release.is_empty() && !asset.is_empty() =>
            {
                Ok(PluginSource::GitHub {
                    repo: repo.clone(),
                    release: release.clone(),
                    asset: asset.clone(),
                })
            }
            _ => anyhow::bail!(
                "Usage: github [Github repo] [Release title] [Assets name (include .difypkg suffix)]"
            ),
        },
        Source::Local => match cli.args.as_slice() {
            [path] if !path.is_empty() => Ok(PluginSource::Local { path: PathBuf::from(path) }),
            _ => anyhow::bail!("Usage: local [difypkg path]"),
        },
    }
}
