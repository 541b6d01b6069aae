//! Review rules loaded from YAML documents stored in the repository.

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::Deserialize;
use tracing::debug;

use crate::github::gateway::RepositoryFileSource;
use crate::github::locator::ReviewTarget;
use crate::review::error::ReviewError;
use crate::review::rule::ReviewRule;

use super::{ReviewProvider, split_paths};

pub(super) const PROVIDER_NAME: &str = "further_review_file";

const DEFAULT_PATHS: &str = ".further-review.yml,.further-review.yaml";
const DEFAULT_REQUIRED: usize = 1;

/// Provider reading rules from `.further-review.yml` documents at the review
/// head commit.
///
/// Every candidate path is fetched; a missing file or a document without a
/// `reviews` sequence contributes zero rules. Unknown top-level keys are
/// ignored so the file can carry unrelated tooling configuration.
pub struct RulesFileProvider {
    paths: Vec<String>,
}

impl RulesFileProvider {
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
impl ReviewProvider for RulesFileProvider {
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
                debug!(provider = PROVIDER_NAME, path, "rules file absent");
                continue;
            };
            let parsed = parse_rules(&body, path)?;
            debug!(
                provider = PROVIDER_NAME,
                path,
                rules = parsed.len(),
                "rules file loaded"
            );
            rules.extend(parsed);
        }
        Ok(rules)
    }
}

#[derive(Debug, Deserialize)]
struct RulesDocument {
    reviews: Option<Vec<RawRule>>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    name: String,
    #[serde(default)]
    logins: Vec<String>,
    #[serde(default)]
    glob: Option<String>,
    #[serde(default)]
    required: Option<usize>,
}

fn parse_rules(body: &str, path: &str) -> Result<Vec<ReviewRule>, ReviewError> {
    let document: Option<RulesDocument> =
        serde_yaml::from_str(body).map_err(|error| provider_failure(path, &error.to_string()))?;
    let raw_rules = document
        .and_then(|document| document.reviews)
        .unwrap_or_default();

    let mut rules = Vec::with_capacity(raw_rules.len());
    for raw in raw_rules {
        let required = raw.required.unwrap_or(DEFAULT_REQUIRED);
        let rule = ReviewRule::new(raw.name, raw.logins, raw.glob, required)
            .map_err(|error| provider_failure(path, &error.to_string()))?;
        rules.push(rule);
    }
    Ok(rules)
}

fn provider_failure(path: &str, message: &str) -> ReviewError {
    ReviewError::Provider {
        provider: PROVIDER_NAME.to_owned(),
        path: path.to_owned(),
        message: message.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ReviewProvider, RulesFileProvider};
    use crate::github::gateway::MockRepositoryFileSource;
    use crate::github::locator::{CommitSha, PullRequestLocator, ReviewTarget};
    use crate::review::error::ReviewError;
    use crate::review::login::Login;

    fn target() -> ReviewTarget {
        let locator = PullRequestLocator::parse("https://github.com/octo/repo/pull/4")
            .expect("sample locator should parse");
        ReviewTarget::new(locator, CommitSha::new("abc123").expect("sample SHA"))
    }

    fn source_with(files: Vec<(&'static str, Option<&'static str>)>) -> MockRepositoryFileSource {
        let mut source = MockRepositoryFileSource::new();
        for (path, body) in files {
            source
                .expect_file_contents()
                .withf(move |_, requested| requested == path)
                .returning(move |_, _| Ok(body.map(ToOwned::to_owned)));
        }
        source
    }

    #[tokio::test]
    async fn loads_and_normalises_rules() {
        let yaml = concat!(
            "reviews:\n",
            "  - name: Deploy schema\n",
            "    logins:\n",
            "      - paultyng1\n",
            "      - paultyng2 <paul@example.com>\n",
            "      - Paul Tyng <paul@example.com> (@paultyng3)\n",
            "    glob: '{package.json,schema/**/*.{yaml,yml}}'\n",
            "    required: 2\n",
        );
        let source = source_with(vec![
            (".further-review.yml", Some(yaml)),
            (".further-review.yaml", None),
        ]);

        let rules = RulesFileProvider::new(None)
            .reviews(&source, &target())
            .await
            .expect("rules should load");

        assert_eq!(rules.len(), 1, "expected one rule");
        let rule = rules.first().expect("rule should exist");
        assert_eq!(rule.name(), "Deploy schema");
        let logins: Vec<&str> = rule.logins().iter().map(Login::as_str).collect();
        assert_eq!(logins, ["paultyng1", "paultyng2", "paultyng3"]);
        assert_eq!(rule.glob(), Some("{package.json,schema/**/*.{yaml,yml}}"));
        assert_eq!(rule.required(), 2);
    }

    #[tokio::test]
    async fn required_defaults_to_one() {
        let yaml = "reviews:\n  - name: Anything\n    logins: [alice]\n";
        let source = source_with(vec![
            (".further-review.yml", Some(yaml)),
            (".further-review.yaml", None),
        ]);

        let rules = RulesFileProvider::new(None)
            .reviews(&source, &target())
            .await
            .expect("rules should load");

        assert_eq!(rules.first().map(super::ReviewRule::required), Some(1));
    }

    #[tokio::test]
    async fn concatenates_candidate_paths_in_order() {
        let first = "reviews:\n  - name: First\n    logins: [alice]\n";
        let second = "reviews:\n  - name: Second\n    logins: [bob]\n";
        let source = source_with(vec![("a.yml", Some(first)), ("b.yml", Some(second))]);

        let rules = RulesFileProvider::new(Some("a.yml, b.yml".to_owned()))
            .reviews(&source, &target())
            .await
            .expect("rules should load");

        let names: Vec<&str> = rules.iter().map(super::ReviewRule::name).collect();
        assert_eq!(names, ["First", "Second"]);
    }

    #[rstest]
    #[case::missing_file(None)]
    #[case::empty_document(Some(""))]
    #[case::no_reviews_key(Some("unrelated: true\n"))]
    #[case::null_reviews(Some("reviews:\n"))]
    #[tokio::test]
    async fn absent_rules_are_not_an_error(#[case] body: Option<&'static str>) {
        let source = source_with(vec![
            (".further-review.yml", body),
            (".further-review.yaml", None),
        ]);

        let rules = RulesFileProvider::new(None)
            .reviews(&source, &target())
            .await
            .expect("absent rules should load as empty");

        assert!(rules.is_empty(), "expected no rules, got {rules:?}");
    }

    #[rstest]
    #[case::malformed_yaml("reviews: [unclosed")]
    #[case::invalid_identity("reviews:\n  - name: Bad\n    logins: ['Paul Tyng']\n")]
    #[case::unsatisfiable("reviews:\n  - name: Bad\n    logins: [alice]\n    required: 2\n")]
    #[case::bad_glob("reviews:\n  - name: Bad\n    logins: [alice]\n    glob: 'src/{a,b'\n")]
    #[tokio::test]
    async fn rejects_invalid_documents(#[case] body: &'static str) {
        let source = source_with(vec![
            (".further-review.yml", Some(body)),
            (".further-review.yaml", None),
        ]);

        let error = RulesFileProvider::new(None)
            .reviews(&source, &target())
            .await
            .expect_err("invalid document should be rejected");

        assert!(
            matches!(
                &error,
                ReviewError::Provider { provider, path, .. }
                    if provider == "further_review_file" && path == ".further-review.yml"
            ),
            "expected provider failure, got {error:?}"
        );
    }
}
