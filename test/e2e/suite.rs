//! End-to-end suite scenarios against a mock node.
//!
//! A wiremock server stands in for the node's control API: `/sessions` for
//! cookie authentication, `/v2/specs` for job creation and counts, and
//! `/v2/runs` for run polling. Retry delays are shrunk so exhaustion
//! scenarios finish quickly.
//!
//! ## Running
//!
//! ```bash
//! cargo test -p chainsmoke-e2e --test suite
//! ```

use std::time::Duration;

use chainsmoke::catalog::TestCase;
use chainsmoke::client::ChainlinkNode;
use chainsmoke::config::{Config, Credentials};
use chainsmoke::runner::run_suite;
use chainsmoke_harness::RetryPolicy;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> Config {
    Config {
        chainlink_url: server.uri(),
        initiator_url: "http://external-initiator:8080".to_string(),
        credentials: Credentials {
            email: "notreal@fakeemail.ch".to_string(),
            password: "twochains".to_string(),
        },
    }
}

fn eth_case(expected_runs: u64) -> TestCase {
    TestCase {
        blockchain: "ETH".to_string(),
        name: "connection over HTTP RPC".to_string(),
        expected_runs,
        params: json!({ "endpoint": "eth-mock-http", "addresses": ["0x0"] }),
    }
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        run_count_attempts: 3,
        status_attempts: 2,
        delay: Duration::from_millis(10),
    }
}

/// The session is opened once and reused across every call in a scenario.
async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/sessions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "clsession=e2e-session; Path=/; Max-Age=86400")
                .set_body_json(json!({ "data": { "type": "session" } })),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn jobs_body(count: u64) -> serde_json::Value {
    json!({ "data": [], "meta": { "count": count } })
}

fn runs_body(count: u64, statuses: &[&str]) -> serde_json::Value {
    let data: Vec<_> = statuses
        .iter()
        .enumerate()
        .map(|(i, status)| {
            json!({
                "type": "runs",
                "id": format!("run-{}", i + 1),
                "attributes": { "status": status }
            })
        })
        .collect();
    json!({ "data": data, "meta": { "count": count } })
}

fn created_job_body(id: &str) -> serde_json::Value {
    json!({ "data": { "type": "specs", "id": id, "attributes": {} } })
}

/// Scenario A: count increments, first poll already shows a completed run.
#[tokio::test]
async fn suite_passes_when_job_creates_and_completes() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body(5)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_job_body("job-1")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body(6)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/runs"))
        .and(query_param("jobSpecId", "job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(runs_body(1, &["completed"])))
        .mount(&server)
        .await;

    let node = ChainlinkNode::new(&test_config(&server)).unwrap();
    let tally = run_suite(&node, &[eth_case(1)], &fast_policy()).await;

    assert_eq!(tally.successes, 2);
    assert_eq!(tally.fails, 0);
    assert!(tally.passed());
}

/// Scenario B: the job count never moves, but the run phase still executes
/// against the returned id and passes on its own.
#[tokio::test]
async fn count_mismatch_fails_creation_but_run_phase_still_attempts() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body(5)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_job_body("job-1")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/runs"))
        .and(query_param("jobSpecId", "job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(runs_body(1, &["completed"])))
        .mount(&server)
        .await;

    let node = ChainlinkNode::new(&test_config(&server)).unwrap();
    let tally = run_suite(&node, &[eth_case(1)], &fast_policy()).await;

    assert_eq!(tally.successes, 1);
    assert_eq!(tally.fails, 1);
}

/// Scenario C: three runs accumulate across successive polls before the
/// final one reports completed.
#[tokio::test]
async fn run_count_converges_across_polls() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body(0)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_job_body("job-2")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body(1)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/runs"))
        .and(query_param("jobSpecId", "job-2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(runs_body(1, &["in_progress"])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/runs"))
        .and(query_param("jobSpecId", "job-2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(runs_body(2, &["completed", "in_progress"])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/runs"))
        .and(query_param("jobSpecId", "job-2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(runs_body(3, &["completed", "completed", "completed"])),
        )
        .mount(&server)
        .await;

    let node = ChainlinkNode::new(&test_config(&server)).unwrap();
    let policy = RetryPolicy {
        run_count_attempts: 5,
        status_attempts: 2,
        delay: Duration::from_millis(10),
    };
    let tally = run_suite(&node, &[eth_case(3)], &policy).await;

    assert_eq!(tally.successes, 2);
    assert_eq!(tally.fails, 0);
}

/// Scenario D: the run count never converges; the full attempt budget is
/// spent and the suite records one failure.
#[tokio::test]
async fn run_count_exhaustion_spends_full_budget() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body(0)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_job_body("job-3")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body(1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/runs"))
        .and(query_param("jobSpecId", "job-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(runs_body(0, &[])))
        .expect(3)
        .mount(&server)
        .await;

    let node = ChainlinkNode::new(&test_config(&server)).unwrap();
    let tally = run_suite(&node, &[eth_case(1)], &fast_policy()).await;

    assert_eq!(tally.successes, 1);
    assert_eq!(tally.fails, 1);
    assert!(!tally.passed());
}

/// A transport error during polling is not retried: one request, one failure.
#[tokio::test]
async fn transport_error_fails_run_phase_without_retry() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body(0)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_job_body("job-4")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body(1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/runs"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "errors": [{ "detail": "internal error" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let node = ChainlinkNode::new(&test_config(&server)).unwrap();
    let tally = run_suite(&node, &[eth_case(1)], &fast_policy()).await;

    assert_eq!(tally.successes, 1);
    assert_eq!(tally.fails, 1);
}

/// Without a job id there is nothing to poll: both sub-checks fail.
#[tokio::test]
async fn missing_job_id_fails_both_phases() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body(0)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "type": "specs", "attributes": {} }
        })))
        .mount(&server)
        .await;

    let node = ChainlinkNode::new(&test_config(&server)).unwrap();
    let tally = run_suite(&node, &[eth_case(1)], &fast_policy()).await;

    assert_eq!(tally.successes, 0);
    assert_eq!(tally.fails, 2);
}

/// One failing test never halts the suite: the next catalog entry executes.
#[tokio::test]
async fn suite_continues_past_a_failing_test() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    // The job count never moves, so every "creates job" check fails, while
    // the run phase passes for both entries.
    Mock::given(method("GET"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body(5)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/specs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_job_body("job-5")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/runs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(runs_body(1, &["completed"])))
        .mount(&server)
        .await;

    let node = ChainlinkNode::new(&test_config(&server)).unwrap();
    let tests = [eth_case(1), eth_case(1)];
    let tally = run_suite(&node, &tests, &fast_policy()).await;

    assert_eq!(tally.successes, 2);
    assert_eq!(tally.fails, 2);
}

/// Authentication failure surfaces as a transport error and fails the test
/// without crashing the suite.
#[tokio::test]
async fn auth_failure_fails_test_without_crashing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{ "detail": "invalid email" }]
        })))
        .mount(&server)
        .await;

    let node = ChainlinkNode::new(&test_config(&server)).unwrap();
    let tally = run_suite(&node, &[eth_case(1)], &fast_policy()).await;

    assert_eq!(tally.successes, 0);
    assert_eq!(tally.fails, 2);
}
