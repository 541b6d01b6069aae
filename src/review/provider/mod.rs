//! Pluggable sources of review rules.
//!
//! Each provider reads its own backing source (typically a file in the
//! repository at the review head commit) and yields validated rules. The
//! registry instantiates the providers the configuration enables, preserving
//! configuration order so rule concatenation stays deterministic.

mod maintainers;
mod rules_file;

pub use maintainers::MaintainersFileProvider;
pub use rules_file::RulesFileProvider;

use async_trait::async_trait;

use crate::github::gateway::RepositoryFileSource;
use crate::github::locator::ReviewTarget;

use super::error::ReviewError;
use super::rule::ReviewRule;

/// Source of review rules for a pull request snapshot.
#[async_trait]
pub trait ReviewProvider: Send + Sync {
    /// Stable name the configuration refers to.
    fn name(&self) -> &'static str;

    /// Loads the provider's rules for the review target.
    ///
    /// # Errors
    ///
    /// Propagates repository access failures and rejects backing documents
    /// that fail to parse or validate.
    async fn reviews(
        &self,
        repository: &dyn RepositoryFileSource,
        target: &ReviewTarget,
    ) -> Result<Vec<ReviewRule>, ReviewError>;
}

/// Configuration value controlling one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSetting {
    /// Enable (or disable) the provider with its defaults.
    Enabled(bool),
    /// Enable the provider with options.
    Options(ProviderOptions),
}

/// Options recognised by file-backed providers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Comma-separated candidate paths overriding the provider default.
    pub file: Option<String>,
}

/// Instantiates the providers the configuration enables, in entry order.
///
/// # Errors
///
/// Returns [`ReviewError::UnknownProvider`] when an entry names a provider
/// the registry does not know.
pub fn build_providers(
    entries: &[(String, ProviderSetting)],
) -> Result<Vec<Box<dyn ReviewProvider>>, ReviewError> {
    let mut providers: Vec<Box<dyn ReviewProvider>> = Vec::new();

    for (name, setting) in entries {
        let file = match setting {
            ProviderSetting::Enabled(false) => continue,
            ProviderSetting::Enabled(true) => None,
            ProviderSetting::Options(options) => options.file.clone(),
        };
        match name.as_str() {
            rules_file::PROVIDER_NAME => providers.push(Box::new(RulesFileProvider::new(file))),
            maintainers::PROVIDER_NAME => {
                providers.push(Box::new(MaintainersFileProvider::new(file)));
            }
            _ => {
                return Err(ReviewError::UnknownProvider { name: name.clone() });
            }
        }
    }

    Ok(providers)
}

/// Splits a comma-separated path list, dropping empty entries.
pub(super) fn split_paths(paths: &str) -> Vec<String> {
    paths
        .split(',')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
