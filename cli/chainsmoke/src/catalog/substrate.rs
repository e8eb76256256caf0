use serde_json::json;

use super::{CaseSpec, Provider};

/// Public keys of the three operator accounts the mock chain signs with.
const DEFAULT_ACCOUNT_IDS: [&str; 3] = [
    "0x7c522c8273973e7bcf4a5dbfcc745dba4a3ab08c1e410167d7b1bdf9cb924f6c",
    "0x06f0d58c43477508c0e5d5901342acf93a0208088816ff303996564a1d8c1c54",
    "0xfaa31acde43e8859565f7576d5a37e6e8ee1b0f6a7c1ae2e8b0ce2bf76248467",
];

pub struct Substrate;

impl Provider for Substrate {
    fn name(&self) -> &'static str {
        "Substrate"
    }

    fn tests(&self) -> Vec<CaseSpec> {
        (1..=3)
            .map(|i| CaseSpec {
                name: format!("WS mock with account #{i}"),
                expected_runs: 1,
                params: json!({
                    "endpoint": "substrate-mock-ws",
                    "accountIds": account_ids(i),
                }),
            })
            .collect()
    }
}

fn account_ids(i: usize) -> Vec<String> {
    let var = format!("SUBSTRATE_OPERATOR_{i}_ACCOUNT_ID");
    let default = DEFAULT_ACCOUNT_IDS.get(i - 1).copied().unwrap_or("");
    vec![std::env::var(var).unwrap_or_else(|_| default.to_string())]
}
