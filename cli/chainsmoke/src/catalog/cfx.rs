use serde_json::json;

use super::{env_or, CaseSpec, Provider};

const ADDRESS_ENV_VAR: &str = "CFX_EVM_SUBSCRIBED_ADDRESS";
const DEFAULT_ADDRESS: &str = "cfxtest:acdjv47k166p1pt4e8yph9rbcumrpbn2u69wyemxv0";

pub struct Cfx;

impl Provider for Cfx {
    fn name(&self) -> &'static str {
        "CFX"
    }

    fn tests(&self) -> Vec<CaseSpec> {
        let addresses = vec![env_or(ADDRESS_ENV_VAR, DEFAULT_ADDRESS)];

        vec![
            CaseSpec {
                name: "connection over HTTP RPC".to_string(),
                expected_runs: 1,
                params: json!({
                    "endpoint": "cfx-mock-http",
                    "addresses": addresses.clone(),
                }),
            },
            CaseSpec {
                name: "connection over WS".to_string(),
                expected_runs: 1,
                params: json!({
                    "endpoint": "cfx-mock-ws",
                    "addresses": addresses,
                }),
            },
        ]
    }
}
