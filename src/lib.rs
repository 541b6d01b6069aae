//! Further Review library crate: pull request review gating for GitHub.
//!
//! The library loads review rules from pluggable providers, matches each
//! rule's file glob against a pull request's changed files, extracts
//! sign-offs and prior mentions from the comment thread, and reports the
//! aggregate verdict as a commit status. GitHub access goes through
//! trait-based gateways wrapping Octocrab so evaluations stay testable in
//! isolation.

pub mod config;
pub mod github;
pub mod review;

pub use config::FurtherReviewConfig;
pub use github::{
    CommitSha, GithubError, OctocrabReviewGateway, PersonalAccessToken, PullRequestLocator,
    RepositoryFileSource, ReviewGateway, ReviewTarget, StatusState,
};
pub use review::{
    Login, ReviewError, ReviewOutcome, ReviewProvider, ReviewRule, Reviewer, RuleDecision,
    StatusUpdate, build_providers,
};
