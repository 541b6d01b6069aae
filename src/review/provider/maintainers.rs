//! Review rule derived from a MAINTAINERS file.

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::debug;

use crate::github::gateway::RepositoryFileSource;
use crate::github::locator::ReviewTarget;
use crate::review::error::ReviewError;
use crate::review::rule::ReviewRule;

use super::{ReviewProvider, split_paths};

pub(super) const PROVIDER_NAME: &str = "maintainers_file";

const DEFAULT_PATHS: &str = "MAINTAINERS";
const RULE_NAME: &str = "MAINTAINERS file";

/// Provider deriving one catch-all rule from the repository MAINTAINERS file.
///
/// Each non-blank, non-comment line is an identity string. A present file
/// yields a single rule with no glob that requires one sign-off from any
/// listed maintainer; an absent or empty file yields no rules.
pub struct MaintainersFileProvider {
    paths: Vec<String>,
}

impl MaintainersFileProvider {
    /// Name the configuration uses to enable this provider.
    pub const NAME: &'static str = PROVIDER_NAME;

    /// Creates the provider, overriding the default candidate paths when a
    /// comma-separated `file` option is given.
    #[must_use]
    pub fn new(file: Option<String>) -> Self {
        Self {
            paths: split_paths(file.as_deref().unwrap_or(DEFAULT_PATHS)),
        }
    }
}

#[async_trait]
impl ReviewProvider for MaintainersFileProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn reviews(
        &self,
        repository: &dyn RepositoryFileSource,
        target: &ReviewTarget,
    ) -> Result<Vec<ReviewRule>, ReviewError> {
        let fetches = self
            .paths
            .iter()
            .map(|path| repository.file_contents(target, path));
        let documents = try_join_all(fetches).await.map_err(ReviewError::from)?;

        let mut rules = Vec::new();
        for (path, document) in self.paths.iter().zip(documents) {
            let Some(body) = document else {
                debug!(provider = PROVIDER_NAME, path, "maintainers file absent");
                continue;
            };
            if let Some(rule) = parse_maintainers(&body, path)? {
                rules.push(rule);
            }
        }
        Ok(rules)
    }
}

fn parse_maintainers(body: &str, path: &str) -> Result<Option<ReviewRule>, ReviewError> {
    let identities: Vec<&str> = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    if identities.is_empty() {
        return Ok(None);
    }

    ReviewRule::new(RULE_NAME, identities, None, 1)
        .map(Some)
        .map_err(|error| ReviewError::Provider {
            provider: PROVIDER_NAME.to_owned(),
            path: path.to_owned(),
            message: error.to_string(),
        })
}
