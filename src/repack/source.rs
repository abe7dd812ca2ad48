//! Plugin package acquisition.
//!
//! Three source variants converge on a local `.difypkg` path: the Dify
//! Marketplace API, a GitHub release asset, or a file already on disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{RepackError, RepackResult};
use crate::config::Config;

/// File extension of Dify plugin packages.
pub const PACKAGE_EXTENSION: &str = "difypkg";

/// Where a plugin package comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginSource {
    /// A plugin published on the Dify Marketplace.
    Market {
        /// Plugin author
        author: String,
        /// Plugin name
        name: String,
        /// Plugin version
        version: String,
    },

    /// A release asset on a GitHub repository.
    GitHub {
        /// Repository, either `owner/repo` or a full URL
        repo: String,
        /// Release tag or title
        release: String,
        /// Asset file name, including the `.difypkg` suffix
        asset: String,
    },

    /// A package already on the local filesystem.
    Local {
        /// Path to the `.difypkg` file
        path: PathBuf,
    },
}

impl PluginSource {
    /// The remote download URL, or `None` for local sources.
    pub fn download_url(&self, config: &Config) -> Option<String> {
        match self {
            Self::Market { author, name, version } => Some(format!(
                "{}/api/v1/plugins/{author}/{name}/{version}/download",
                config.marketplace_base_url
            )),
            Self::GitHub { repo, release, asset } => {
                let repo = if repo.starts_with(&config.github_base_url) {
                    repo.clone()
                } else {
                    format!("{}/{repo}", config.github_base_url)
                };
                Some(format!("{repo}/releases/download/{release}/{asset}"))
            }
            Self::Local { .. } => None,
        }
    }

    /// File name the downloaded archive is stored under, or `None` for
    /// local sources.
    pub fn archive_name(&self) -> Option<String> {
        match self {
            Self::Market { author, name, version } => {
                Some(format!("{author}-{name}_{version}.{PACKAGE_EXTENSION}"))
            }
            Self::GitHub { release, asset, .. } => {
                let stem = Path::new(asset)
                    .file_stem()
                    .map_or_else(|| asset.clone(), |s| s.to_string_lossy().into_owned());
                Some(format!("{stem}-{release}.{PACKAGE_EXTENSION}"))
            }
            Self::Local { .. } => None,
        }
    }

    /// Resolve the source to a local archive path, downloading into
    /// `dest_dir` for the remote variants.
    pub fn resolve(&self, config: &Config, dest_dir: &Path) -> RepackResult<PathBuf> {
        match self {
            Self::Market { .. } => {
                println!("From the Dify Marketplace downloading ...");
                self.fetch(config, dest_dir)
            }
            Self::GitHub { .. } => {
                println!("From Github downloading ...");
                self.fetch(config, dest_dir)
            }
            // Resolved lexically; existence is checked at extraction time.
            Self::Local { path } => Ok(std::path::absolute(path)?),
        }
    }

    fn fetch(&self, config: &Config, dest_dir: &Path) -> RepackResult<PathBuf> {
        let url = self.download_url(config).expect("remote source has a URL");
        let dest = dest_dir.join(self.archive_name().expect("remote source has a file name"));

        println!("Downloading {url} ...");
        download_file(&url, &dest)?;
        println!("Download success.");

        Ok(dest)
    }
}

/// Download a URL to a file on disk.
fn download_file(url: &str, dest: &Path) -> RepackResult<()> {
    let download_err = |reason: String| RepackError::Download { url: url.to_string(), reason };

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(format!("dify-repack/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| download_err(e.to_string()))?;

    let response = client.get(url).send().map_err(|e| download_err(e.to_string()))?;

    if !response.status().is_success() {
        return Err(download_err(format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes().map_err(|e| download_err(e.to_string()))?;
    std::fs::write(dest, &bytes)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market_source() -> PluginSource {
        PluginSource::Market {
            author: "langgenius".to_string(),
            name: "openai".to_string(),
            version: "0.0.1".to_string(),
        }
    }

    #[test]
    fn test_market_download_url() {
        let url = market_source().download_url(&Config::default()).unwrap();
        assert_eq!(
            url,
            "https://marketplace.dify.ai/api/v1/plugins/langgenius/openai/0.0.1/download"
        );
    }

    #[test]
    fn test_market_archive_name() {
        assert_eq!(market_source().archive_name().unwrap(), "langgenius-openai_0.0.1.difypkg");
    }

    #[test]
    fn test_github_url_prefixes_bare_repo() {
        let source = PluginSource::GitHub {
            repo: "owner/plugin".to_string(),
            release: "v1.2.0".to_string(),
            asset: "plugin.difypkg".to_string(),
        };
        let url = source.download_url(&Config::default()).unwrap();
        assert_eq!(url, "https://github.com/owner/plugin/releases/download/v1.2.0/plugin.difypkg");
    }

    #[test]
    fn test_github_url_keeps_full_url() {
        let source = PluginSource::GitHub {
            repo: "https://github.com/owner/plugin".to_string(),
            release: "v1.2.0".to_string(),
            asset: "plugin.difypkg".to_string(),
        };
        let url = source.download_url(&Config::default()).unwrap();
        assert_eq!(url, "https://github.com/owner/plugin/releases/download/v1.2.0/plugin.difypkg");
    }

    #[test]
    fn test_github_archive_name_uses_asset_stem() {
        let source = PluginSource::GitHub {
            repo: "owner/plugin".to_string(),
            release: "v1.2.0".to_string(),
            asset: "plugin.difypkg".to_string(),
        };
        assert_eq!(source.archive_name().unwrap(), "plugin-v1.2.0.difypkg");
    }

    #[test]
    fn test_local_source_has_no_url() {
        let source = PluginSource::Local { path: PathBuf::from("./plugin.difypkg") };
        assert_eq!(source.download_url(&Config::default()), None);
        assert_eq!(source.archive_name(), None);
    }
}
