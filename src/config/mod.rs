//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.further-review.toml` in current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `FURTHER_REVIEW_PR_URL`,
//!    `FURTHER_REVIEW_TOKEN`, or legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--pr-url`/`-u` and `--token`/`-t`
//!
//! # Configuration File
//!
//! Place `.further-review.toml` in the current directory, home directory, or
//! XDG config directory with:
//!
//! ```toml
//! pr_url = "https://github.com/owner/repo/pull/123"
//! token = "ghp_example"
//! providers = "further_review_file,maintainers_file"
//! rules_file = ".further-review.yml"
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::GithubError;
use crate::review::error::ReviewError;
use crate::review::provider::{
    MaintainersFileProvider, ProviderOptions, ProviderSetting, RulesFileProvider,
};

const DEFAULT_PROVIDERS: &str = RulesFileProvider::NAME;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `FURTHER_REVIEW_PR_URL` or `--pr-url`: Pull request URL
/// - `FURTHER_REVIEW_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `FURTHER_REVIEW_PROVIDERS` or `--providers`: Enabled rule providers
/// - `FURTHER_REVIEW_RULES_FILE` or `--rules-file`: Rules file candidate paths
/// - `FURTHER_REVIEW_MAINTAINERS_FILE` or `--maintainers-file`: Maintainers
///   file candidate paths
///
/// # Example
///
/// ```no_run
/// use further_review::FurtherReviewConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = FurtherReviewConfig::load().expect("failed to load configuration");
/// let pr_url = config.require_pr_url().expect("PR URL required");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "FURTHER_REVIEW",
    discovery(
        dotfile_name = ".further-review.toml",
        config_file_name = "further-review.toml",
        app_name = "further-review"
    )
)]
pub struct FurtherReviewConfig {
    /// GitHub pull request URL to evaluate.
    ///
    /// Can be provided via:
    /// - CLI: `--pr-url <URL>` or `-u <URL>`
    /// - Environment: `FURTHER_REVIEW_PR_URL`
    /// - Config file: `pr_url = "..."`
    #[ortho_config(cli_short = 'u')]
    pub pr_url: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `FURTHER_REVIEW_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Comma-separated review rule providers, in evaluation order.
    ///
    /// Defaults to the rules-file provider alone. An empty value enables no
    /// providers, so the evaluation succeeds vacuously.
    ///
    /// Can be provided via:
    /// - CLI: `--providers <NAMES>` or `-p <NAMES>`
    /// - Environment: `FURTHER_REVIEW_PROVIDERS`
    /// - Config file: `providers = "..."`
    #[ortho_config(cli_short = 'p')]
    pub providers: Option<String>,

    /// Comma-separated candidate paths for the rules-file provider.
    ///
    /// Overrides the provider default of
    /// `.further-review.yml,.further-review.yaml`.
    #[ortho_config()]
    pub rules_file: Option<String>,

    /// Comma-separated candidate paths for the maintainers-file provider.
    ///
    /// Overrides the provider default of `MAINTAINERS`.
    #[ortho_config()]
    pub maintainers_file: Option<String>,
}

impl FurtherReviewConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::MissingToken`] (wrapped in [`ReviewError`])
    /// when no token source provides a value.
    pub fn resolve_token(&self) -> Result<String, ReviewError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(ReviewError::Github(GithubError::MissingToken))
    }

    /// Returns the pull request URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Configuration`] when no URL is configured.
    pub fn require_pr_url(&self) -> Result<&str, ReviewError> {
        self.pr_url
            .as_deref()
            .ok_or_else(|| ReviewError::Configuration {
                message: "a pull request URL is required (use --pr-url or -u)".to_owned(),
            })
    }

    /// Renders the provider configuration into the ordered entries the
    /// review registry consumes.
    ///
    /// Provider names keep their configured order; file-path overrides are
    /// threaded through as provider options. Unknown names are passed along
    /// unchanged so the registry can report them.
    #[must_use]
    pub fn review_entries(&self) -> Vec<(String, ProviderSetting)> {
        let configured = self.providers.as_deref().unwrap_or(DEFAULT_PROVIDERS);

        configured
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                let setting = self.file_override(name).map_or(
                    ProviderSetting::Enabled(true),
                    |file| {
                        ProviderSetting::Options(ProviderOptions { file: Some(file) })
                    },
                );
                (name.to_owned(), setting)
            })
            .collect()
    }

    fn file_override(&self, name: &str) -> Option<String> {
        if name == RulesFileProvider::NAME {
            self.rules_file.clone()
        } else if name == MaintainersFileProvider::NAME {
            self.maintainers_file.clone()
        } else {
            None
        }
    }
}
