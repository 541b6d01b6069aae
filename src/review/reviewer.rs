//! Review evaluation orchestrating providers, comment analysis, and status
//! reporting.
//!
//! One [`Reviewer::process_reviews`] call is one evaluation: it re-reads the
//! pull request state from GitHub, loads rules from every configured
//! provider, and reports the verdict as a commit status. Evaluations hold no
//! state between runs, so re-running against unchanged GitHub state yields
//! the same verdict and posts no duplicate reviewer mentions.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::github::error::GithubError;
use crate::github::gateway::{RepositoryFileSource, ReviewGateway};
use crate::github::locator::ReviewTarget;
use crate::github::models::{CommitStatus, StatusState};

use super::comments;
use super::error::ReviewError;
use super::login::Login;
use super::provider::ReviewProvider;
use super::rule::ReviewRule;

/// Context label distinguishing this tool's commit statuses.
pub const STATUS_CONTEXT: &str = "Further Review";

const PENDING_DESCRIPTION: &str = "review is in progress";
const SUCCESS_DESCRIPTION: &str = "all review requirements satisfied";
const FAILURE_DESCRIPTION: &str = "sign-offs are outstanding";

const COMMENT_HEADER: &str =
    "Further review is needed before this pull request can merge. Awaiting sign-off from:";

/// Commit status content posted through [`Reviewer::update_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Status state to report.
    pub state: StatusState,
    /// Human-readable summary shown next to the status.
    pub description: String,
    /// Optional details link.
    pub target_url: Option<String>,
}

impl StatusUpdate {
    fn new(state: StatusState, description: &str) -> Self {
        Self {
            state,
            description: description.to_owned(),
            target_url: None,
        }
    }
}

/// Verdict for a single rule within one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDecision {
    /// Rule the decision is about.
    pub rule: ReviewRule,
    /// Whether the rule's glob matched the changed-file set.
    pub matched: bool,
    /// Whether the rule is satisfied; unmatched rules are vacuously so.
    pub satisfied: bool,
    /// Sign-offs still needed; zero for satisfied or unmatched rules.
    pub missing_count: usize,
}

/// Aggregate outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    /// Final status state reported to GitHub.
    pub state: StatusState,
    /// Per-rule decisions in provider order, then rule order.
    pub decisions: Vec<RuleDecision>,
}

impl ReviewOutcome {
    /// Decisions for rules that matched the changed-file set.
    #[must_use]
    pub fn matched(&self) -> impl Iterator<Item = &RuleDecision> {
        self.decisions.iter().filter(|decision| decision.matched)
    }
}

/// Review evaluator bound to a gateway and an ordered provider list.
pub struct Reviewer<'a, G>
where
    G: ReviewGateway + RepositoryFileSource,
{
    gateway: &'a G,
    providers: Vec<Box<dyn ReviewProvider>>,
}

impl<'a, G> Reviewer<'a, G>
where
    G: ReviewGateway + RepositoryFileSource,
{
    /// Creates a reviewer over the gateway and providers.
    #[must_use]
    pub const fn new(gateway: &'a G, providers: Vec<Box<dyn ReviewProvider>>) -> Self {
        Self { gateway, providers }
    }

    /// Posts a commit status with the fixed `Further Review` context.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures unchanged; there is no local retry.
    pub async fn update_status(
        &self,
        target: &ReviewTarget,
        update: StatusUpdate,
    ) -> Result<(), GithubError> {
        let status = CommitStatus {
            state: update.state,
            description: update.description,
            context: STATUS_CONTEXT.to_owned(),
            target_url: update.target_url,
        };
        self.gateway.create_status(target, &status).await
    }

    /// Runs one end-to-end evaluation of the pull request.
    ///
    /// Fetches identity, changed files, and comments concurrently while the
    /// `pending` status posts; loads every provider's rules; decides each
    /// matched rule against the collected sign-offs; reports the final
    /// status; and on failure posts a comment mentioning reviewers that have
    /// neither signed off nor been mentioned before.
    ///
    /// # Errors
    ///
    /// Aborts on the first gateway or provider failure, leaving the status
    /// `pending` for a later event to correct.
    pub async fn process_reviews(
        &self,
        target: &ReviewTarget,
    ) -> Result<ReviewOutcome, ReviewError> {
        let (user, files, thread, ()) = tokio::try_join!(
            self.gateway.current_user(),
            self.gateway.changed_files(target),
            self.gateway.issue_comments(target),
            self.update_status(
                target,
                StatusUpdate::new(StatusState::Pending, PENDING_DESCRIPTION)
            ),
        )?;

        let self_login = Login::from_handle(&user.login);
        let paths: Vec<String> = files.into_iter().map(|file| file.path).collect();
        let sign_offs = comments::sign_offs(&thread, &self_login);
        let mentioned = comments::mentions(&thread, &self_login);

        let rules = self.load_rules(target).await?;
        debug!(rules = rules.len(), files = paths.len(), "evaluating rules");

        let decisions = decide(rules, &paths, &sign_offs)?;
        let state = if decisions.iter().all(|decision| decision.satisfied) {
            StatusState::Success
        } else {
            StatusState::Failure
        };
        info!(%state, "review evaluated");

        let description = match state {
            StatusState::Failure => FAILURE_DESCRIPTION,
            _ => SUCCESS_DESCRIPTION,
        };
        self.update_status(target, StatusUpdate::new(state, description))
            .await?;

        if state == StatusState::Failure
            && let Some(body) = failure_comment(&decisions, &sign_offs, &mentioned)
        {
            self.gateway.create_comment(target, &body).await?;
        }

        Ok(ReviewOutcome { state, decisions })
    }

    /// Loads every provider's rules concurrently, concatenating them in
    /// provider order then rule order.
    async fn load_rules(&self, target: &ReviewTarget) -> Result<Vec<ReviewRule>, ReviewError> {
        let loads = self
            .providers
            .iter()
            .map(|provider| provider.reviews(self.gateway, target));
        let rule_sets = futures::future::try_join_all(loads).await?;
        Ok(rule_sets.into_iter().flatten().collect())
    }
}

fn decide(
    rules: Vec<ReviewRule>,
    paths: &[String],
    sign_offs: &BTreeSet<Login>,
) -> Result<Vec<RuleDecision>, ReviewError> {
    let mut decisions = Vec::with_capacity(rules.len());
    for rule in rules {
        let matched = rule.applies_to(paths)?;
        let missing_count = if matched {
            rule.missing_count(sign_offs)
        } else {
            0
        };
        let satisfied = missing_count == 0;
        debug!(
            rule = rule.name(),
            matched, satisfied, missing_count, "rule decided"
        );
        decisions.push(RuleDecision {
            rule,
            matched,
            satisfied,
            missing_count,
        });
    }
    Ok(decisions)
}

/// Composes the failure comment, or `None` when every outstanding reviewer
/// has been mentioned before.
///
/// Lists each unsatisfied matched rule in order with the logins that have
/// neither signed off nor appeared in a prior mention, so re-running against
/// unchanged state never nags anyone twice.
fn failure_comment(
    decisions: &[RuleDecision],
    sign_offs: &BTreeSet<Login>,
    mentioned: &[Login],
) -> Option<String> {
    let mut listed: Vec<Login> = Vec::new();
    let mut lines = Vec::new();

    for decision in decisions {
        if !decision.matched || decision.satisfied {
            continue;
        }
        let outstanding: Vec<Login> = decision
            .rule
            .outstanding(sign_offs)
            .into_iter()
            .filter(|login| !mentioned.contains(login) && !listed.contains(login))
            .collect();
        if outstanding.is_empty() {
            continue;
        }
        let handles: Vec<String> = outstanding
            .iter()
            .map(|login| format!("@{login}"))
            .collect();
        lines.push(format!(
            "- {name}: {handles}",
            name = decision.rule.name(),
            handles = handles.join(", ")
        ));
        listed.extend(outstanding);
    }

    if lines.is_empty() {
        None
    } else {
        Some(format!("{COMMENT_HEADER}\n\n{}", lines.join("\n")))
    }
}
