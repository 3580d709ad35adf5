//! Tip ledger
//!
//! Every community tip is anchored in a ledger before it is turned into an
//! SMS log entry and an alert. The shipped `SyntheticLedger` is a height
//! counter with a truncated SHA-256 tag; the hash identifies a submission
//! but proves nothing about it.

pub mod types;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use tracing::info;

use types::{Alert, LedgerReceipt, SmsLog};

const TIP_STATUS: &str = "VERIFYING";
const TIP_NODE: &str = "COMMUNITY_TIP";
const UNRESOLVED_GPS: &str = "N/A";

/// Anchors tip messages and reports the resulting height
pub trait TipLedger: Send + Sync {
    fn record(&mut self, message: &str, at: DateTime<Utc>) -> LedgerReceipt;

    fn height(&self) -> u64;
}

/// Monotonic counter standing in for a real chain
#[derive(Debug)]
pub struct SyntheticLedger {
    height: u64,
}

impl SyntheticLedger {
    pub fn new(genesis_height: u64) -> Self {
        Self {
            height: genesis_height,
        }
    }
}

impl TipLedger for SyntheticLedger {
    fn record(&mut self, message: &str, at: DateTime<Utc>) -> LedgerReceipt {
        self.height += 1;
        LedgerReceipt {
            height: self.height,
            tx_hash: tip_hash(message, at),
        }
    }

    fn height(&self) -> u64 {
        self.height
    }
}

/// `0x` + 16 hex digits derived from the message and submission instant
pub fn tip_hash(message: &str, at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(message.as_bytes());
    hasher.update(at.to_rfc3339_opts(SecondsFormat::Nanos, true).as_bytes());
    let digest = hasher.finalize();
    format!("0x{}", hex::encode(&digest[..8]))
}

/// Ledger plus the alert and SMS lists it feeds
///
/// Kept behind a single lock so ids and height advance together.
pub struct TipBook {
    ledger: Box<dyn TipLedger>,
    alerts: VecDeque<Alert>,
    sms_logs: Vec<SmsLog>,
}

impl TipBook {
    pub fn new(ledger: Box<dyn TipLedger>) -> Self {
        Self {
            ledger,
            alerts: VecDeque::new(),
            sms_logs: Vec::new(),
        }
    }

    /// Anchor a tip, append its SMS log entry and raise an alert
    pub fn submit(&mut self, sender: &str, message: &str, now: DateTime<Local>) -> LedgerReceipt {
        let receipt = self.ledger.record(message, now.with_timezone(&Utc));
        let time = now.format("%H:%M:%S").to_string();

        self.sms_logs.push(SmsLog {
            id: format!("SMS_{}", self.sms_logs.len() + 1),
            sender: sender.to_string(),
            message: message.to_string(),
            time: time.clone(),
            hash: receipt.tx_hash.clone(),
            status: TIP_STATUS.to_string(),
        });

        self.alerts.push_front(Alert {
            id: self.alerts.len() as u64 + 1,
            node: TIP_NODE.to_string(),
            threat: format!("SMS TIP: {}", message),
            time,
            status: TIP_STATUS.to_string(),
            tx_hash: receipt.tx_hash.clone(),
            gps: UNRESOLVED_GPS.to_string(),
        });

        info!(
            "Logged tip from {} at height {} ({})",
            sender, receipt.height, receipt.tx_hash
        );
        receipt
    }

    pub fn height(&self) -> u64 {
        self.ledger.height()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }

    pub fn sms_logs(&self) -> Vec<SmsLog> {
        self.sms_logs.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn book() -> TipBook {
        TipBook::new(Box::new(SyntheticLedger::new(142)))
    }

    #[test]
    fn test_hash_shape() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let hash = tip_hash("logging trucks near gate 3", at);

        assert_eq!(hash.len(), 18);
        assert!(hash.starts_with("0x"));
        assert!(hash[2..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, tip_hash("logging trucks near gate 3", at));
    }

    #[test]
    fn test_hash_depends_on_time_and_message() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let later = at + chrono::Duration::nanoseconds(1);

        assert_ne!(tip_hash("fire", at), tip_hash("fire", later));
        assert_ne!(tip_hash("fire", at), tip_hash("smoke", at));
    }

    #[test]
    fn test_synthetic_ledger_increments_by_one() {
        let mut ledger = SyntheticLedger::new(142);
        let first = ledger.record("a", Utc::now());
        let second = ledger.record("b", Utc::now());

        assert_eq!(first.height, 143);
        assert_eq!(second.height, 144);
        assert_eq!(ledger.height(), 144);
    }

    #[test]
    fn test_submit_appends_log_and_prepends_alert() {
        let mut book = book();
        let now = Local::now();
        book.submit("+254700000001", "chainsaw heard", now);
        let receipt = book.submit("Anonymous", "smoke on ridge", now);

        assert_eq!(book.height(), 144);
        assert_eq!(receipt.height, 144);

        let logs = book.sms_logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].id, "SMS_1");
        assert_eq!(logs[1].id, "SMS_2");
        assert_eq!(logs[1].hash, receipt.tx_hash);
        assert_eq!(logs[1].status, "VERIFYING");

        let alerts = book.alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].id, 2);
        assert_eq!(alerts[0].threat, "SMS TIP: smoke on ridge");
        assert_eq!(alerts[0].node, "COMMUNITY_TIP");
        assert_eq!(alerts[0].gps, "N/A");
        assert_eq!(alerts[1].id, 1);
        assert_eq!(alerts[0].time, now.format("%H:%M:%S").to_string());
    }
}
