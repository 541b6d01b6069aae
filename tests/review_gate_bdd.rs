//! Behavioural tests for pull request review gating.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use further_review::review::ProviderSetting;
use further_review::{
    CommitSha, OctocrabReviewGateway, PersonalAccessToken, PullRequestLocator, ReviewError,
    ReviewOutcome, ReviewTarget, Reviewer, build_providers,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Shared runtime wrapper that can be stored in rstest-bdd Slot.
#[derive(Clone)]
struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

/// Review rule recorded by the givens and rendered into the rules file.
#[derive(Clone)]
struct RuleSpec {
    name: String,
    required: u64,
    logins: Vec<String>,
    glob: String,
}

#[derive(ScenarioState, Default)]
struct GateState {
    runtime: Slot<SharedRuntime>,
    server: Slot<MockServer>,
    changed_file: Slot<String>,
    rule: Slot<RuleSpec>,
    comment: Slot<(String, String)>,
    bot_mentions: Slot<Vec<String>>,
    outcome: Slot<ReviewOutcome>,
}

#[fixture]
fn gate_state() -> GateState {
    GateState::default()
}

fn configuration_error(message: impl Into<String>) -> ReviewError {
    ReviewError::Configuration {
        message: message.into(),
    }
}

/// Ensures the runtime and server are initialised in `GateState`.
fn ensure_runtime_and_server(gate_state: &GateState) -> Result<SharedRuntime, ReviewError> {
    if gate_state.runtime.with_ref(|_| ()).is_none() {
        let runtime = Runtime::new()
            .map_err(|error| configuration_error(format!("failed to create runtime: {error}")))?;
        gate_state.runtime.set(SharedRuntime::new(runtime));
    }

    let shared_runtime = gate_state
        .runtime
        .get()
        .ok_or_else(|| configuration_error("runtime not initialised"))?;

    if gate_state.server.with_ref(|_| ()).is_none() {
        gate_state
            .server
            .set(shared_runtime.block_on(MockServer::start()));
    }

    Ok(shared_runtime)
}

fn split_logins(raw: &str) -> Vec<String> {
    raw.trim_matches('"')
        .split(',')
        .map(str::trim)
        .filter(|login| !login.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a pull request changing {file}")]
fn record_changed_file(gate_state: &GateState, file: String) {
    gate_state
        .changed_file
        .set(file.trim_matches('"').to_owned());
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a review rule {name} requiring {required:u64} sign-offs from {logins} guarding {glob}")]
fn record_rule(gate_state: &GateState, name: String, required: u64, logins: String, glob: String) {
    gate_state.rule.set(RuleSpec {
        name: name.trim_matches('"').to_owned(),
        required,
        logins: split_logins(&logins),
        glob: glob.trim_matches('"').to_owned(),
    });
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a comment {body} from {author}")]
fn record_comment(gate_state: &GateState, body: String, author: String) {
    gate_state.comment.set((
        body.trim_matches('"').to_owned(),
        author.trim_matches('"').to_owned(),
    ));
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a prior bot comment mentioning {logins}")]
fn record_bot_mentions(gate_state: &GateState, logins: String) {
    gate_state.bot_mentions.set(split_logins(&logins));
}

fn rules_yaml(rule: &RuleSpec) -> String {
    format!(
        "reviews:\n  - name: {name}\n    logins: [{logins}]\n    glob: '{glob}'\n    required: {required}\n",
        name = rule.name,
        logins = rule.logins.join(", "),
        glob = rule.glob,
        required = rule.required
    )
}

fn comment_thread(gate_state: &GateState) -> Vec<serde_json::Value> {
    let mut thread = Vec::new();

    if let Some(mentions) = gate_state.bot_mentions.with_ref(Clone::clone) {
        let handles: Vec<String> = mentions.iter().map(|login| format!("@{login}")).collect();
        thread.push(json!({
            "id": thread.len() + 1,
            "body": format!("Awaiting sign-off from: {}", handles.join(", ")),
            "user": { "login": "review-bot" }
        }));
    }

    if let Some((body, author)) = gate_state.comment.with_ref(Clone::clone) {
        thread.push(json!({
            "id": thread.len() + 1,
            "body": body,
            "user": { "login": author }
        }));
    }

    thread
}

fn mount_github(gate_state: &GateState, runtime: &SharedRuntime) -> Result<(), ReviewError> {
    let user_mock = Mock::given(method("GET"))
        .and(path("/api/v3/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "review-bot",
            "id": 1
        })));

    let file = gate_state
        .changed_file
        .with_ref(Clone::clone)
        .ok_or_else(|| configuration_error("changed file not recorded"))?;
    let files_mock = Mock::given(method("GET"))
        .and(path("/api/v3/repos/owner/repo/pulls/42/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "filename": file, "status": "modified" }
        ])));

    let comments_mock = Mock::given(method("GET"))
        .and(path("/api/v3/repos/owner/repo/issues/42/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_thread(gate_state)));

    let not_found = ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" }));
    let yml_response = gate_state.rule.with_ref(|rule| {
        ResponseTemplate::new(200).set_body_json(json!({
            "content": STANDARD.encode(rules_yaml(rule)),
            "encoding": "base64"
        }))
    });
    let yml_mock = Mock::given(method("GET"))
        .and(path("/api/v3/repos/owner/repo/contents/.further-review.yml"))
        .respond_with(yml_response.unwrap_or_else(|| not_found.clone()));
    let yaml_mock = Mock::given(method("GET"))
        .and(path("/api/v3/repos/owner/repo/contents/.further-review.yaml"))
        .respond_with(not_found);

    let status_mock = Mock::given(method("POST"))
        .and(path("/api/v3/repos/owner/repo/statuses/abc123"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })));
    let comment_mock = Mock::given(method("POST"))
        .and(path("/api/v3/repos/owner/repo/issues/42/comments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 2 })));

    gate_state
        .server
        .with_ref(|server| {
            runtime.block_on(user_mock.mount(server));
            runtime.block_on(files_mock.mount(server));
            runtime.block_on(comments_mock.mount(server));
            runtime.block_on(yml_mock.mount(server));
            runtime.block_on(yaml_mock.mount(server));
            runtime.block_on(status_mock.mount(server));
            runtime.block_on(comment_mock.mount(server));
        })
        .ok_or_else(|| configuration_error("mock server not initialised"))
}

#[when("the review evaluation runs")]
fn run_evaluation(gate_state: &GateState) -> Result<(), ReviewError> {
    let runtime = ensure_runtime_and_server(gate_state)?;
    mount_github(gate_state, &runtime)?;

    let server_url = gate_state
        .server
        .with_ref(MockServer::uri)
        .ok_or_else(|| configuration_error("mock server URL missing"))?;
    let locator = PullRequestLocator::parse(&format!("{server_url}/owner/repo/pull/42"))?;
    let target = ReviewTarget::new(locator.clone(), CommitSha::new("abc123")?);
    let token = PersonalAccessToken::new("valid-token")?;

    let outcome = runtime.block_on(async {
        let gateway = OctocrabReviewGateway::for_token(&token, &locator)?;
        let providers = build_providers(&[(
            "further_review_file".to_owned(),
            ProviderSetting::Enabled(true),
        )])?;
        let reviewer = Reviewer::new(&gateway, providers);
        reviewer.process_reviews(&target).await
    })?;

    gate_state.outcome.set(outcome);
    Ok(())
}

/// Bodies of requests posted to the given path, in arrival order.
fn posted_bodies(gate_state: &GateState, suffix: &str) -> Result<Vec<serde_json::Value>, ReviewError> {
    let runtime = gate_state
        .runtime
        .get()
        .ok_or_else(|| configuration_error("runtime not initialised"))?;

    gate_state
        .server
        .with_ref(|server| {
            let requests = runtime
                .block_on(server.received_requests())
                .unwrap_or_default();
            requests
                .iter()
                .filter(|request| {
                    request.method.as_str() == "POST" && request.url.path().ends_with(suffix)
                })
                .map(|request| {
                    serde_json::from_slice(&request.body).map_err(|error| {
                        configuration_error(format!("posted body is not JSON: {error}"))
                    })
                })
                .collect()
        })
        .ok_or_else(|| configuration_error("mock server not initialised"))?
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the commit statuses posted are {first} then {second}")]
fn assert_statuses(gate_state: &GateState, first: String, second: String) -> Result<(), ReviewError> {
    let bodies = posted_bodies(gate_state, "/statuses/abc123")?;
    let states: Vec<&str> = bodies
        .iter()
        .filter_map(|body| body.get("state").and_then(serde_json::Value::as_str))
        .collect();

    let expected = [first.trim_matches('"'), second.trim_matches('"')];
    if states == expected {
        Ok(())
    } else {
        Err(configuration_error(format!(
            "expected statuses {expected:?}, got {states:?}"
        )))
    }
}

#[then("no reviewer comment is posted")]
fn assert_no_comment(gate_state: &GateState) -> Result<(), ReviewError> {
    let bodies = posted_bodies(gate_state, "/issues/42/comments")?;
    if bodies.is_empty() {
        Ok(())
    } else {
        Err(configuration_error(format!(
            "expected no comment, got {bodies:?}"
        )))
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the reviewer comment mentions {logins}")]
fn assert_comment_mentions(gate_state: &GateState, logins: String) -> Result<(), ReviewError> {
    let bodies = posted_bodies(gate_state, "/issues/42/comments")?;
    if bodies.len() != 1 {
        return Err(configuration_error(format!(
            "expected exactly one comment, got {count}",
            count = bodies.len()
        )));
    }

    let body = bodies
        .first()
        .and_then(|value| value.get("body"))
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| configuration_error("comment body missing"))?;

    for login in split_logins(&logins) {
        let handle = format!("@{login}");
        if !body.contains(&handle) {
            return Err(configuration_error(format!(
                "comment does not mention {handle}: {body}"
            )));
        }
    }
    Ok(())
}

#[scenario(path = "tests/features/review_gate.feature", index = 0)]
fn review_gate_success(gate_state: GateState) {
    let _ = gate_state;
}

#[scenario(path = "tests/features/review_gate.feature", index = 1)]
fn review_gate_failure_with_mentions(gate_state: GateState) {
    let _ = gate_state;
}

#[scenario(path = "tests/features/review_gate.feature", index = 2)]
fn review_gate_absent_rules_file(gate_state: GateState) {
    let _ = gate_state;
}

#[scenario(path = "tests/features/review_gate.feature", index = 3)]
fn review_gate_mention_suppression(gate_state: GateState) {
    let _ = gate_state;
}
