//! Test execution orchestrator.
//!
//! Drives the catalog strictly sequentially. Each test is two independently
//! tallied sub-checks:
//!
//! 1. **creates job** - submit the job spec and verify the node's job count
//!    moved by exactly one. No retry: a transport error or mismatch here
//!    fails the sub-check outright.
//! 2. **runs job successfully** - poll until the run count reaches the
//!    expected value, then until the final run reports `"completed"`. Only
//!    assertion mismatches are retried, inside `with_retry`.
//!
//! One test's failure never halts the suite.

use std::future::Future;

use chainsmoke_harness::{equals, is_false, with_retry, CheckError, Context, RetryPolicy};
use tracing::debug;

use crate::catalog::TestCase;
use crate::client::{ChainlinkNode, JobSpec};
use crate::output;

/// Name the node knows the external initiator by; submitted jobs trigger
/// through it.
pub const INITIATOR_NAME: &str = "mock-client";

/// Terminal status of a successful run.
const COMPLETED: &str = "completed";

/// Run the whole catalog against `node` and return the final tally.
pub async fn run_suite(node: &ChainlinkNode, tests: &[TestCase], policy: &RetryPolicy) -> Context {
    let mut ctx = Context::new();
    for test in tests {
        run_case(node, test, policy, &mut ctx).await;
    }
    ctx
}

/// Execute a single catalog entry, recording each sub-check into `ctx`.
async fn run_case(node: &ChainlinkNode, test: &TestCase, policy: &RetryPolicy, ctx: &mut Context) {
    output::case_header(&test.blockchain, &test.name);

    // The id is captured before the count check so that a count mismatch
    // still leaves phase 2 something to poll.
    let mut job_id: Option<String> = None;
    let job_id_slot = &mut job_id;
    let created = sub_check(ctx, "creates job", async {
        let before = node.get_jobs().await?.count();

        let spec = JobSpec::external(INITIATOR_NAME, test.params.clone());
        let response = node.create_job(&spec).await?;
        let id = response.data.id.unwrap_or_default();
        let empty = id.is_empty();
        *job_id_slot = Some(id);
        is_false(empty, "got a job ID")?;

        let after = node.get_jobs().await?.count();
        equals(after, before + 1, "job count should increase by 1")
    })
    .await;

    let ran = match job_id.as_deref() {
        Some(id) if !id.is_empty() => {
            let node = &*node;
            sub_check(ctx, "runs job successfully", async {
                with_retry(policy.run_count_attempts, policy.delay, move || async move {
                    let runs = node.get_job_runs(id).await?;
                    equals(runs.count(), test.expected_runs, "job runs should increase")
                })
                .await?;

                let index = (test.expected_runs - 1) as usize;
                with_retry(policy.status_attempts, policy.delay, move || async move {
                    let runs = node.get_job_runs(id).await?;
                    // Fewer runs than expected reads as an empty status: a
                    // retryable mismatch, not a hard failure.
                    let status = runs
                        .data
                        .get(index)
                        .map(|run| run.status().to_string())
                        .unwrap_or_default();
                    equals(
                        status.as_str(),
                        COMPLETED,
                        "last job run should be marked as completed",
                    )
                })
                .await
            })
            .await
        }
        _ => {
            // No id to poll: the run phase cannot be attempted and counts
            // as a failure.
            ctx.record(false);
            output::fail_line("runs job successfully", "no job ID to poll");
            false
        }
    };

    output::case_footer(&test.blockchain, &test.name, created && ran);
}

/// Run one named sub-check, tally the outcome, and log it.
async fn sub_check(
    ctx: &mut Context,
    name: &str,
    check: impl Future<Output = Result<(), CheckError>>,
) -> bool {
    match check.await {
        Ok(()) => {
            ctx.record(true);
            output::pass_line(name);
            true
        }
        Err(e) => {
            ctx.record(false);
            debug!(name, error = %e, "sub-check failed");
            output::fail_line(name, &e.to_string());
            false
        }
    }
}
