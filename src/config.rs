//! Remote endpoint configuration.
//!
//! All three endpoints have fixed defaults and can be overridden through
//! environment variables, so the tool works out of the box but can be
//! pointed at mirrors or self-hosted instances.

use std::env;

/// Default base URL for GitHub release downloads.
pub const DEFAULT_GITHUB_BASE_URL: &str = "https://github.com";

/// Default base URL for the Dify Marketplace API.
pub const DEFAULT_MARKETPLACE_BASE_URL: &str = "https://marketplace.dify.ai";

/// Default PyPI-compatible index pip resolves wheels from.
pub const DEFAULT_PIP_MIRROR_URL: &str = "https://mirrors.aliyun.com/pypi/simple";

/// Remote endpoints used by the repackaging pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL plugin repositories are resolved against (`GITHUB_API_URL`).
    pub github_base_url: String,

    /// Marketplace API base URL (`MARKETPLACE_API_URL`).
    pub marketplace_base_url: String,

    /// Package index pip downloads and builds wheels from (`PIP_MIRROR_URL`).
    pub pip_mirror_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_base_url: DEFAULT_GITHUB_BASE_URL.to_string(),
            marketplace_base_url: DEFAULT_MARKETPLACE_BASE_URL.to_string(),
            pip_mirror_url: DEFAULT_PIP_MIRROR_URL.to_string(),
        }
    }
}

impl Config {
    /// Build a configuration from the environment, falling back to defaults
    /// for unset variables.
    pub fn from_env() -> Self {
        Self {
            github_base_url: env_or("GITHUB_API_URL", DEFAULT_GITHUB_BASE_URL),
            marketplace_base_url: env_or("MARKETPLACE_API_URL", DEFAULT_MARKETPLACE_BASE_URL),
            pip_mirror_url: env_or("PIP_MIRROR_URL", DEFAULT_PIP_MIRROR_URL),
        }
    }

    /// Host component of the pip mirror, passed to pip as `--trusted-host`.
    ///
    /// Returns `None` when the mirror URL has no parseable host, in which
    /// case the flag is omitted and pip applies its own trust rules.
    pub fn pip_trusted_host(&self) -> Option<String> {
        reqwest::Url::parse(&self.pip_mirror_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.github_base_url, "https://github.com");
        assert_eq!(config.marketplace_base_url, "https://marketplace.dify.ai");
        assert_eq!(config.pip_mirror_url, "https://mirrors.aliyun.com/pypi/simple");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        env::set_var("MARKETPLACE_API_URL", "https://marketplace.example.com");
        let config = Config::from_env();
        assert_eq!(config.marketplace_base_url, "https://marketplace.example.com");
        assert_eq!(config.github_base_url, DEFAULT_GITHUB_BASE_URL);
        env::remove_var("MARKETPLACE_API_URL");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_when_unset() {
        env::remove_var("GITHUB_API_URL");
        env::remove_var("MARKETPLACE_API_URL");
        env::remove_var("PIP_MIRROR_URL");
        let config = Config::from_env();
        assert_eq!(config.pip_mirror_url, DEFAULT_PIP_MIRROR_URL);
    }

    #[test]
    fn test_trusted_host_from_mirror() {
        let config = Config::default();
        assert_eq!(config.pip_trusted_host().as_deref(), Some("mirrors.aliyun.com"));
    }

    #[test]
    fn test_trusted_host_unparseable_mirror() {
        let config = Config { pip_mirror_url: "not a url".to_string(), ..Config::default() };
        assert_eq!(config.pip_trusted_host(), None);
    }
}
