//! Repository file fetching and decoding helpers for GitHub gateways.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use octocrab::Octocrab;

use crate::github::error::GithubError;
use crate::github::locator::ReviewTarget;
use crate::github::models::ApiContents;

use super::error_mapping::{is_not_found, map_octocrab_error};

/// Fetches a repository file at the review head commit.
///
/// Returns `Ok(None)` when GitHub reports the file missing at that commit.
pub(super) async fn fetch_file_contents(
    client: &Octocrab,
    target: &ReviewTarget,
    path: &str,
) -> Result<Option<String>, GithubError> {
    let response = client
        .get::<ApiContents, _, _>(
            target.contents_path(path),
            Some(&[("ref", target.sha().as_str())]),
        )
        .await;

    match response {
        Ok(contents) => decode_contents(&contents, path).map(Some),
        Err(error) if is_not_found(&error) => Ok(None),
        Err(error) => Err(map_octocrab_error("file contents", &error)),
    }
}

/// Decodes the contents payload GitHub returns for a repository file.
///
/// GitHub base64-encodes file bodies and wraps the encoded text in newlines,
/// so whitespace is stripped before decoding.
fn decode_contents(contents: &ApiContents, path: &str) -> Result<String, GithubError> {
    let encoded = contents
        .content
        .as_deref()
        .ok_or_else(|| GithubError::Api {
            message: format!("file contents for {path} missing content body"),
        })?;

    match contents.encoding.as_deref() {
        Some("base64") => {
            let cleaned: String = encoded
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            let bytes = STANDARD.decode(cleaned).map_err(|error| GithubError::Api {
                message: format!("file contents for {path} are not valid base64: {error}"),
            })?;
            String::from_utf8(bytes).map_err(|error| GithubError::Api {
                message: format!("file contents for {path} are not valid UTF-8: {error}"),
            })
        }
        other => Err(GithubError::Api {
            message: format!(
                "file contents for {path} use unsupported encoding {encoding}",
                encoding = other.unwrap_or("<missing>")
            ),
        }),
    }
}
