//! chainsmoke - end-to-end smoke-test driver for a Chainlink-style node.
//!
//! Submits one job per catalog entry through the node's control API and
//! verifies, by bounded polling, that each job runs the expected number of
//! times and finishes `"completed"`.

pub mod catalog;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod runner;
