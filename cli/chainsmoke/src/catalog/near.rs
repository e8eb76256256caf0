use serde_json::json;

use super::{env_or, CaseSpec, Provider};

const ACCOUNT_ID_ENV_VAR: &str = "NEAR_ORACLE_ACCOUNT_ID";
const DEFAULT_ACCOUNT_ID: &str = "oracle.oracle.testnet";

pub struct Near;

impl Provider for Near {
    fn name(&self) -> &'static str {
        "NEAR"
    }

    fn tests(&self) -> Vec<CaseSpec> {
        let account_ids = vec![env_or(ACCOUNT_ID_ENV_VAR, DEFAULT_ACCOUNT_ID)];

        // The mock oracle answers three pending requests, so the job
        // accumulates three runs.
        vec![CaseSpec {
            name: "connection over HTTP RPC".to_string(),
            expected_runs: 3,
            params: json!({
                "endpoint": "near-mock-http",
                "accountIds": account_ids,
            }),
        }]
    }
}
