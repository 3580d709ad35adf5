//! Request and response bodies of the HTTP API

use serde::{Deserialize, Serialize};

use crate::deployment::types::Node;
use crate::ledger::types::{Alert, SmsLog};

#[derive(Debug, Deserialize)]
pub struct DeployRequest {
    #[serde(alias = "forest_name")]
    pub region_name: String,
    #[serde(default)]
    pub live_analysis: bool,
}

#[derive(Debug, Deserialize)]
pub struct TipRequest {
    #[serde(default = "anonymous")]
    pub sender: String,
    #[serde(default)]
    pub message: String,
}

fn anonymous() -> String {
    "Anonymous".to_string()
}

#[derive(Debug, Serialize)]
pub struct TipResponse {
    pub status: &'static str,
    pub tx_hash: String,
}

#[derive(Debug, Serialize)]
pub struct LedgerStatus {
    pub height: u64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub system_status: &'static str,
    pub nodes: Vec<Node>,
    pub alerts: Vec<Alert>,
    pub sms_logs: Vec<SmsLog>,
    pub blockchain: LedgerStatus,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
