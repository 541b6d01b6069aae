//! Comment analysis extracting sign-offs and prior mentions.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::github::models::IssueComment;

use super::login::Login;

/// Phrases treated as an approval when found anywhere in a comment.
const SIGN_OFF_PHRASES: [&str; 4] = ["lgtm", "looks good to me", ":+1:", ":shipit:"];

#[expect(clippy::expect_used, reason = "pattern is a fixed literal")]
static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([\w-]+)").expect("mention pattern compiles"));

/// Collects the logins that have approved the pull request.
///
/// A comment counts as a sign-off when its author is not the tool itself and
/// its body contains one of the approval phrases, case-insensitively.
/// Comments without an author or body are skipped. The result is
/// deduplicated and ordered for stable comparison.
#[must_use]
pub fn sign_offs(comments: &[IssueComment], self_login: &Login) -> BTreeSet<Login> {
    comments
        .iter()
        .filter_map(|comment| {
            let author = Login::from_handle(comment.author.as_deref()?);
            if author == *self_login {
                return None;
            }
            let body = comment.body.as_deref()?;
            is_approval(body).then_some(author)
        })
        .collect()
}

/// Collects the logins this tool has already mentioned on the thread.
///
/// Only comments authored by the tool itself are scanned, so the result
/// tracks which reviewers have been nagged before. Handles are lowercased,
/// deduplicated, and returned in ascending order.
#[must_use]
pub fn mentions(comments: &[IssueComment], self_login: &Login) -> Vec<Login> {
    let mut seen = BTreeSet::new();

    for comment in comments {
        let authored_by_self = comment
            .author
            .as_deref()
            .is_some_and(|author| Login::from_handle(author) == *self_login);
        if !authored_by_self {
            continue;
        }
        let Some(body) = comment.body.as_deref() else {
            continue;
        };
        for captures in MENTION.captures_iter(body) {
            if let Some(handle) = captures.get(1) {
                seen.insert(Login::from_handle(handle.as_str()));
            }
        }
    }

    seen.into_iter().collect()
}

fn is_approval(text: &str) -> bool {
    let lowered = text.to_lowercase();
    SIGN_OFF_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}
