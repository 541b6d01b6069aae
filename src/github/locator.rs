//! URL parsing and identity wrappers for review targets.

use url::Url;

use super::error::GithubError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, GithubError> {
        if value.is_empty() {
            return Err(GithubError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, GithubError> {
        if value.is_empty() {
            return Err(GithubError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    pub(crate) const fn new(value: u64) -> Result<Self, GithubError> {
        if value == 0 {
            return Err(GithubError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, GithubError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(GithubError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Commit SHA wrapper enforcing a plausible object identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSha(String);

impl CommitSha {
    /// Validates that the SHA is non-empty and hexadecimal.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::InvalidCommitSha` when the value is blank or
    /// contains characters outside `[0-9a-fA-F]`.
    pub fn new(sha: impl AsRef<str>) -> Result<Self, GithubError> {
        let trimmed = sha.as_ref().trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GithubError::InvalidCommitSha);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the SHA value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Derives the GitHub API base URL from a host string.
fn derive_api_base_from_host(
    scheme: &str,
    host: &str,
    port: Option<u16>,
) -> Result<Url, GithubError> {
    if host.eq_ignore_ascii_case("github.com") {
        Url::parse("https://api.github.com")
            .map_err(|error| GithubError::InvalidUrl(error.to_string()))
    } else {
        let authority = if host.contains(':') {
            format!("[{host}]")
        } else {
            host.to_owned()
        };
        let mut api_url = Url::parse(&format!("{scheme}://{authority}"))
            .map_err(|error| GithubError::InvalidUrl(error.to_string()))?;

        api_url
            .set_port(port)
            .map_err(|()| GithubError::InvalidUrl("invalid port".to_owned()))?;
        api_url.set_path("api/v3");
        Ok(api_url)
    }
}

/// Derives the GitHub API base URL from a parsed URL.
fn derive_api_base(parsed: &Url) -> Result<Url, GithubError> {
    let host = parsed
        .host_str()
        .ok_or_else(|| GithubError::InvalidUrl("URL must include a host".to_owned()))?;

    derive_api_base_from_host(parsed.scheme(), host, parsed.port())
}

/// Parsed pull request URL and derived API base.
///
/// # Example
///
/// ```
/// use further_review::github::locator::PullRequestLocator;
///
/// let locator = PullRequestLocator::parse("https://github.com/octo/repo/pull/8")
///     .expect("should parse pull request URL");
/// assert_eq!(locator.owner().as_str(), "octo");
/// assert_eq!(locator.repository().as_str(), "repo");
/// assert_eq!(locator.number().get(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: PullRequestNumber,
}

impl PullRequestLocator {
    /// Parses a GitHub pull request URL in the form
    /// `https://github.com/<owner>/<repo>/pull/<number>`.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::InvalidUrl` when parsing fails, `MissingPathSegments`
    /// when the URL path is not `/owner/repo/pull/<number>`, and
    /// `InvalidPullRequestNumber` when the final segment is not a positive
    /// integer.
    pub fn parse(input: &str) -> Result<Self, GithubError> {
        let parsed =
            Url::parse(input).map_err(|error| GithubError::InvalidUrl(error.to_string()))?;

        let mut segments = parsed
            .path_segments()
            .ok_or(GithubError::MissingPathSegments)?;

        let owner_segment = segments.next().ok_or(GithubError::MissingPathSegments)?;
        let repository_segment = segments.next().ok_or(GithubError::MissingPathSegments)?;
        let marker = segments.next().ok_or(GithubError::MissingPathSegments)?;
        let number_segment = segments.next().ok_or(GithubError::MissingPathSegments)?;

        if marker != "pull" {
            return Err(GithubError::MissingPathSegments);
        }

        if number_segment.is_empty() {
            return Err(GithubError::MissingPathSegments);
        }

        let owner = RepositoryOwner::new(owner_segment)?;
        let repository = RepositoryName::new(repository_segment)?;
        let number = number_segment
            .parse::<u64>()
            .map_err(|_| GithubError::InvalidPullRequestNumber)
            .and_then(PullRequestNumber::new)?;

        let api_base = derive_api_base(&parsed)?;

        Ok(Self {
            api_base,
            owner,
            repository,
            number,
        })
    }

    /// API base URL derived from the pull request host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    pub(crate) fn pull_request_path(&self) -> String {
        format!(
            "/repos/{}/{}/pulls/{}",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }

    pub(crate) fn files_path(&self) -> String {
        format!("{}/files", self.pull_request_path())
    }

    pub(crate) fn comments_path(&self) -> String {
        format!(
            "/repos/{}/{}/issues/{}/comments",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }
}

/// Pull request coordinates pinned to the head commit under review.
///
/// Statuses report against a specific commit and repository files are read at
/// that commit, so review evaluation carries the SHA alongside the locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTarget {
    locator: PullRequestLocator,
    sha: CommitSha,
}

impl ReviewTarget {
    /// Pins a pull request locator to its head commit.
    #[must_use]
    pub const fn new(locator: PullRequestLocator, sha: CommitSha) -> Self {
        Self { locator, sha }
    }

    /// Pull request coordinates.
    #[must_use]
    pub const fn locator(&self) -> &PullRequestLocator {
        &self.locator
    }

    /// Head commit the evaluation reports against.
    #[must_use]
    pub const fn sha(&self) -> &CommitSha {
        &self.sha
    }

    pub(crate) fn statuses_path(&self) -> String {
        format!(
            "/repos/{}/{}/statuses/{}",
            self.locator.owner().as_str(),
            self.locator.repository().as_str(),
            self.sha.as_str()
        )
    }

    pub(crate) fn contents_path(&self, path: &str) -> String {
        format!(
            "/repos/{}/{}/contents/{}",
            self.locator.owner().as_str(),
            self.locator.repository().as_str(),
            path
        )
    }
}
