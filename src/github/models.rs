//! Data models for pull request review state and commit statuses.
//!
//! This module contains domain models for the pull request data consumed by
//! review evaluation. Types prefixed with `Api` are internal deserialisation
//! targets that convert into public domain types.

use serde::{Deserialize, Serialize};

/// Authenticated account the tool acts as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Login of the authenticated account.
    pub login: String,
}

/// File changed by a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    /// Repository-relative path of the file.
    pub path: String,
}

/// Pull request issue comment details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueComment {
    /// Comment identifier.
    pub id: u64,
    /// Comment body.
    pub body: Option<String>,
    /// Author login.
    pub author: Option<String>,
}

/// Commit status state reported to GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    /// Evaluation is underway.
    Pending,
    /// Every applicable review rule is satisfied.
    Success,
    /// At least one applicable review rule lacks sign-offs.
    Failure,
}

impl StatusState {
    /// Status state as the lowercase string GitHub expects.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl std::fmt::Display for StatusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commit status payload posted against a pull request head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitStatus {
    /// Status state.
    pub state: StatusState,
    /// Human-readable summary shown next to the status.
    pub description: String,
    /// Status context distinguishing this check from others.
    pub context: String,
    /// Optional details link; always serialised so GitHub clears stale URLs.
    pub target_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCurrentUser {
    pub(super) login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequestFile {
    pub(super) filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiComment {
    pub(super) id: u64,
    pub(super) body: Option<String>,
    pub(super) user: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
}

/// API response type for the pull request resource; only the head commit is
/// consumed.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) head: ApiCommitRef,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommitRef {
    pub(super) sha: String,
}

/// API response type for repository file contents.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiContents {
    pub(super) content: Option<String>,
    pub(super) encoding: Option<String>,
}

impl From<ApiCurrentUser> for CurrentUser {
    fn from(value: ApiCurrentUser) -> Self {
        Self { login: value.login }
    }
}

impl From<ApiPullRequestFile> for ChangedFile {
    fn from(value: ApiPullRequestFile) -> Self {
        Self {
            path: value.filename,
        }
    }
}

impl From<ApiComment> for IssueComment {
    fn from(value: ApiComment) -> Self {
        Self {
            id: value.id,
            body: value.body,
            author: value.user.and_then(|user| user.login),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{
        ApiComment, ApiContents, ApiPullRequest, ApiPullRequestFile, CommitStatus, IssueComment,
        StatusState,
    };

    #[test]
    fn api_comment_converts_into_issue_comment() {
        let value = json!({
            "id": 42,
            "body": "LGTM",
            "user": { "login": "octocat" }
        });

        let api: ApiComment = serde_json::from_value(value).expect("ApiComment should deserialise");
        let comment: IssueComment = api.into();
        assert_eq!(comment.id, 42);
        assert_eq!(comment.body.as_deref(), Some("LGTM"));
        assert_eq!(comment.author.as_deref(), Some("octocat"));
    }

    #[rstest]
    #[case::user_null(json!({ "id": 7, "body": "hi", "user": null }))]
    #[case::login_null(json!({ "id": 7, "body": "hi", "user": { "login": null } }))]
    fn api_comment_tolerates_missing_author(#[case] value: serde_json::Value) {
        let api: ApiComment = serde_json::from_value(value).expect("ApiComment should deserialise");
        let comment: IssueComment = api.into();
        assert_eq!(comment.id, 7);
        assert!(comment.author.is_none());
    }

    #[test]
    fn api_pull_request_file_maps_filename_to_path() {
        let value = json!({
            "filename": "src/main.rs",
            "status": "modified",
            "additions": 3
        });

        let api: ApiPullRequestFile =
            serde_json::from_value(value).expect("ApiPullRequestFile should deserialise");
        let file: super::ChangedFile = api.into();
        assert_eq!(file.path, "src/main.rs");
    }

    #[test]
    fn api_pull_request_exposes_head_sha() {
        let value = json!({
            "number": 8,
            "head": { "sha": "abc123", "ref": "feature" }
        });

        let api: ApiPullRequest =
            serde_json::from_value(value).expect("ApiPullRequest should deserialise");
        assert_eq!(api.head.sha, "abc123");
    }

    #[test]
    fn api_contents_deserialises_encoding_and_content() {
        let value = json!({
            "content": "aGVsbG8=\n",
            "encoding": "base64",
            "size": 5
        });

        let api: ApiContents =
            serde_json::from_value(value).expect("ApiContents should deserialise");
        assert_eq!(api.content.as_deref(), Some("aGVsbG8=\n"));
        assert_eq!(api.encoding.as_deref(), Some("base64"));
    }

    #[test]
    fn commit_status_serialises_github_payload() {
        let status = CommitStatus {
            state: StatusState::Pending,
            description: "in progress".to_owned(),
            context: "Further Review".to_owned(),
            target_url: None,
        };

        let body = serde_json::to_value(&status).expect("CommitStatus should serialise");
        assert_eq!(
            body,
            json!({
                "state": "pending",
                "description": "in progress",
                "context": "Further Review",
                "target_url": null
            })
        );
    }

    #[rstest]
    #[case(StatusState::Pending, "pending")]
    #[case(StatusState::Success, "success")]
    #[case(StatusState::Failure, "failure")]
    fn status_state_renders_lowercase(#[case] state: StatusState, #[case] expected: &str) {
        assert_eq!(state.as_str(), expected);
        assert_eq!(state.to_string(), expected);
    }
}
