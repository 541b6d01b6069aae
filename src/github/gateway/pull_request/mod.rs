//! Octocrab implementation of the review gateway traits.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};

use crate::github::error::GithubError;
use crate::github::locator::{CommitSha, PersonalAccessToken, PullRequestLocator, ReviewTarget};
use crate::github::models::{
    ApiCurrentUser, ApiPullRequest, ApiPullRequestFile, ChangedFile, CommitStatus, CurrentUser,
    IssueComment,
};

use super::client::build_octocrab_client;
use super::comments::fetch_issue_comments;
use super::contents::fetch_file_contents;
use super::error_mapping::map_octocrab_error;
use super::{RepositoryFileSource, ReviewGateway};

/// Octocrab-backed review gateway.
pub struct OctocrabReviewGateway {
    client: Octocrab,
}

impl OctocrabReviewGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and pull request locator.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::InvalidUrl` when the base URI cannot be parsed or
    /// `GithubError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &PullRequestLocator,
    ) -> Result<Self, GithubError> {
        let octocrab = build_octocrab_client(token, locator.api_base().as_str())?;
        Ok(Self::new(octocrab))
    }

    /// Fetches the head commit of the pull request.
    ///
    /// Statuses must report against a concrete commit, so callers resolve the
    /// head SHA once before evaluation starts.
    ///
    /// # Errors
    ///
    /// Propagates GitHub API failures and rejects responses whose head SHA is
    /// not a plausible commit identifier.
    pub async fn pull_request_head(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<CommitSha, GithubError> {
        let pull_request = self
            .client
            .get::<ApiPullRequest, _, _>(locator.pull_request_path(), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("pull request", &error))?;
        CommitSha::new(pull_request.head.sha)
    }
}

#[async_trait]
impl ReviewGateway for OctocrabReviewGateway {
    async fn current_user(&self) -> Result<CurrentUser, GithubError> {
        self.client
            .get::<ApiCurrentUser, _, _>("/user", None::<&()>)
            .await
            .map(ApiCurrentUser::into)
            .map_err(|error| map_octocrab_error("current user", &error))
    }

    async fn changed_files(&self, target: &ReviewTarget) -> Result<Vec<ChangedFile>, GithubError> {
        let page = self
            .client
            .get::<Page<ApiPullRequestFile>, _, _>(target.locator().files_path(), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("changed files", &error))?;

        self.client
            .all_pages(page)
            .await
            .map(|files| files.into_iter().map(ApiPullRequestFile::into).collect())
            .map_err(|error| map_octocrab_error("changed files", &error))
    }

    async fn issue_comments(
        &self,
        target: &ReviewTarget,
    ) -> Result<Vec<IssueComment>, GithubError> {
        fetch_issue_comments(&self.client, target.locator()).await
    }

    async fn create_status(
        &self,
        target: &ReviewTarget,
        status: &CommitStatus,
    ) -> Result<(), GithubError> {
        let _: serde_json::Value = self
            .client
            .post(target.statuses_path(), Some(status))
            .await
            .map_err(|error| map_octocrab_error("create status", &error))?;
        Ok(())
    }

    async fn create_comment(&self, target: &ReviewTarget, body: &str) -> Result<(), GithubError> {
        let payload = serde_json::json!({ "body": body });
        let _: serde_json::Value = self
            .client
            .post(target.locator().comments_path(), Some(&payload))
            .await
            .map_err(|error| map_octocrab_error("create comment", &error))?;
        Ok(())
    }
}

#[async_trait]
impl RepositoryFileSource for OctocrabReviewGateway {
    async fn file_contents(
        &self,
        target: &ReviewTarget,
        path: &str,
    ) -> Result<Option<String>, GithubError> {
        fetch_file_contents(&self.client, target, path).await
    }
}
