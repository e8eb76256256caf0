use serde_json::json;

use super::{env_or, CaseSpec, Provider, DEFAULT_EVM_ADDRESS, EVM_ADDRESS_ENV_VAR};

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

pub struct Keeper;

impl Provider for Keeper {
    fn name(&self) -> &'static str {
        "Keeper"
    }

    fn tests(&self) -> Vec<CaseSpec> {
        let address = env_or(EVM_ADDRESS_ENV_VAR, DEFAULT_EVM_ADDRESS);

        vec![
            CaseSpec {
                name: "connection over HTTP RPC".to_string(),
                expected_runs: 1,
                params: json!({
                    "endpoint": "keeper-mock-http",
                    "address": address.clone(),
                    "from": ZERO_ADDRESS,
                    "upkeepId": "123",
                }),
            },
            CaseSpec {
                name: "connection over WS".to_string(),
                expected_runs: 1,
                params: json!({
                    "endpoint": "keeper-mock-ws",
                    "address": address,
                    "from": ZERO_ADDRESS,
                    "upkeepId": "123",
                }),
            },
        ]
    }
}
