use serde_json::json;

use super::{env_or, CaseSpec, Provider, DEFAULT_EVM_ADDRESS, EVM_ADDRESS_ENV_VAR};

pub struct Eth;

impl Provider for Eth {
    fn name(&self) -> &'static str {
        "ETH"
    }

    fn tests(&self) -> Vec<CaseSpec> {
        let addresses = vec![env_or(EVM_ADDRESS_ENV_VAR, DEFAULT_EVM_ADDRESS)];

        vec![
            CaseSpec {
                name: "connection over HTTP RPC".to_string(),
                expected_runs: 1,
                params: json!({
                    "endpoint": "eth-mock-http",
                    "addresses": addresses.clone(),
                }),
            },
            CaseSpec {
                name: "connection over WS".to_string(),
                expected_runs: 1,
                params: json!({
                    "endpoint": "eth-mock-ws",
                    "addresses": addresses,
                }),
            },
        ]
    }
}
