//! GitHub pull request access for review evaluation.
//!
//! This module wraps Octocrab to parse pull request URLs, fetch the files and
//! discussion thread of a pull request, read repository files at the head
//! commit, and publish commit statuses. Errors are mapped into user-friendly
//! variants so that callers can surface precise failures without exposing
//! Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;

pub use error::GithubError;
pub use gateway::{OctocrabReviewGateway, RepositoryFileSource, ReviewGateway};
pub use locator::{
    CommitSha, PersonalAccessToken, PullRequestLocator, PullRequestNumber, RepositoryName,
    RepositoryOwner, ReviewTarget,
};
pub use models::{ChangedFile, CommitStatus, CurrentUser, IssueComment, StatusState};

#[cfg(test)]
pub use gateway::{MockRepositoryFileSource, MockReviewGateway};
