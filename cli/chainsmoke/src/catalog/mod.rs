//! Static per-blockchain test catalog.
//!
//! Each chain module implements [`Provider`]: a name plus the test cases it
//! contributes. The runner depends only on the flattened [`TestCase`] list,
//! so providers can be swapped out freely in tests.

mod cfx;
mod eth;
mod keeper;
mod near;
mod substrate;

use serde_json::Value;

/// Address most EVM-style chains subscribe to by default.
pub const DEFAULT_EVM_ADDRESS: &str = "0x2aD9B7b9386c2f45223dDFc4A4d81C2957bAE19A";

/// Env var overriding the subscribed EVM address.
pub const EVM_ADDRESS_ENV_VAR: &str = "EVM_SUBSCRIBED_ADDRESS";

/// One integration test: which chain, what to submit, what to expect.
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Blockchain identifier, stamped on by the provider.
    pub blockchain: String,
    /// Human-readable scenario label.
    pub name: String,
    /// Runs the job must accumulate before it counts as complete. Always >= 1.
    pub expected_runs: u64,
    /// Opaque parameters forwarded verbatim as the job-submission body.
    pub params: Value,
}

/// A chain-specific test definition, before the chain name is stamped on.
#[derive(Debug, Clone)]
pub struct CaseSpec {
    pub name: String,
    pub expected_runs: u64,
    pub params: Value,
}

/// A blockchain integration's static test provider.
pub trait Provider {
    /// Blockchain identifier, e.g. `"ETH"`.
    fn name(&self) -> &'static str;

    /// The test cases this integration contributes.
    fn tests(&self) -> Vec<CaseSpec>;
}

fn providers() -> Vec<Box<dyn Provider>> {
    vec![
        Box::new(eth::Eth),
        Box::new(cfx::Cfx),
        Box::new(substrate::Substrate),
        Box::new(near::Near),
        Box::new(keeper::Keeper),
    ]
}

/// Flatten all providers into the ordered catalog.
///
/// `filter` is a case-insensitive allow-list of blockchain names; an empty
/// list selects the full catalog.
pub fn fetch_tests(filter: &[String]) -> Vec<TestCase> {
    providers()
        .iter()
        .filter(|p| filter.is_empty() || filter.iter().any(|f| f.eq_ignore_ascii_case(p.name())))
        .flat_map(|p| {
            let blockchain = p.name();
            p.tests().into_iter().map(move |case| TestCase {
                blockchain: blockchain.to_string(),
                name: case.name,
                expected_runs: case.expected_runs,
                params: case.params,
            })
        })
        .collect()
}

/// Env var override with a static default.
pub(crate) fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}
