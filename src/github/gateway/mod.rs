//! Gateways for pull request review data through Octocrab.
//!
//! This module provides trait-based gateways for communicating with the GitHub
//! API. The trait-based design enables mocking in tests while the Octocrab
//! implementations handle real HTTP requests.

mod client;
mod comments;
mod contents;
mod error_mapping;
mod pull_request;

pub use pull_request::OctocrabReviewGateway;

use async_trait::async_trait;

use crate::github::error::GithubError;
use crate::github::locator::ReviewTarget;
use crate::github::models::{ChangedFile, CommitStatus, CurrentUser, IssueComment};

/// Gateway covering the pull request surface review evaluation reads and
/// writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewGateway: Send + Sync {
    /// Fetch the authenticated account the tool acts as.
    async fn current_user(&self) -> Result<CurrentUser, GithubError>;

    /// Fetch every file changed by the pull request.
    async fn changed_files(&self, target: &ReviewTarget) -> Result<Vec<ChangedFile>, GithubError>;

    /// Fetch all issue comments on the pull request thread.
    async fn issue_comments(&self, target: &ReviewTarget)
    -> Result<Vec<IssueComment>, GithubError>;

    /// Post a commit status against the pull request head.
    async fn create_status(
        &self,
        target: &ReviewTarget,
        status: &CommitStatus,
    ) -> Result<(), GithubError>;

    /// Post an issue comment on the pull request thread.
    async fn create_comment(&self, target: &ReviewTarget, body: &str) -> Result<(), GithubError>;
}

/// Source of repository file contents pinned to the review head commit.
///
/// Review rule providers read repository files through this trait so they stay
/// decoupled from the HTTP client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryFileSource: Send + Sync {
    /// Fetch a repository file at the review head commit.
    ///
    /// Returns `Ok(None)` when the file does not exist at that commit.
    async fn file_contents(
        &self,
        target: &ReviewTarget,
        path: &str,
    ) -> Result<Option<String>, GithubError>;
}
