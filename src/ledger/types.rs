//! Community tip records

use serde::{Deserialize, Serialize};

/// Alert raised from a community tip, listed most-recent-first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: u64,
    pub node: String,
    pub threat: String,
    pub time: String,
    pub status: String,
    pub tx_hash: String,
    /// "N/A" until tips are geocoded
    pub gps: String,
}

/// Inbound tip submission, listed oldest-first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsLog {
    pub id: String,
    pub sender: String,
    pub message: String,
    pub time: String,
    pub hash: String,
    pub status: String,
}

/// Ledger entry created for a tip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReceipt {
    pub height: u64,
    pub tx_hash: String,
}
