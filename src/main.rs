//! Further Review CLI entrypoint: one review evaluation per invocation.

use std::io::{self, Write};
use std::process::ExitCode;

use further_review::{
    FurtherReviewConfig, OctocrabReviewGateway, PersonalAccessToken, PullRequestLocator,
    ReviewError, ReviewOutcome, ReviewTarget, Reviewer, build_providers,
};
use ortho_config::OrthoConfig;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Evaluates the configured pull request and prints a short verdict summary.
///
/// The process exits zero whenever the evaluation completes; the verdict
/// itself lives in the posted commit status, not the exit code.
async fn run() -> Result<(), ReviewError> {
    let config = load_config()?;

    let pr_url = config.require_pr_url()?;
    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let locator = PullRequestLocator::parse(pr_url)?;

    let gateway = OctocrabReviewGateway::for_token(&token, &locator)?;
    let sha = gateway.pull_request_head(&locator).await?;
    let target = ReviewTarget::new(locator, sha);

    let providers = build_providers(&config.review_entries())?;
    let reviewer = Reviewer::new(&gateway, providers);
    let outcome = reviewer.process_reviews(&target).await?;

    write_summary(&outcome);
    Ok(())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ReviewError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<FurtherReviewConfig, ReviewError> {
    FurtherReviewConfig::load().map_err(|error| ReviewError::Configuration {
        message: error.to_string(),
    })
}

fn write_summary(outcome: &ReviewOutcome) {
    let mut stdout = io::stdout().lock();
    let _ignored = writeln!(stdout, "review {state}", state = outcome.state);
    for decision in outcome.matched() {
        let verdict = if decision.satisfied {
            "satisfied".to_owned()
        } else {
            format!("missing {count} sign-off(s)", count = decision.missing_count)
        };
        let _ignored = writeln!(
            stdout,
            "  {name}: {verdict}",
            name = decision.rule.name()
        );
    }
}
