//! Coordinating service
//!
//! Owns the only mutable state in the process: the current deployment's
//! node set and the tip book. Handlers talk to it through these accessors.

use chrono::Local;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use crate::deployment::types::{DeploymentResult, Node};
use crate::deployment::Deployer;
use crate::error::SentinelError;
use crate::ledger::types::{Alert, LedgerReceipt, SmsLog};
use crate::ledger::{TipBook, TipLedger};

/// Point-in-time view of the in-memory state
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub nodes: Vec<Node>,
    pub alerts: Vec<Alert>,
    pub sms_logs: Vec<SmsLog>,
    pub height: u64,
}

pub struct SentinelService {
    deployer: Deployer,
    current: RwLock<Vec<Node>>,
    tips: Mutex<TipBook>,
}

impl SentinelService {
    pub fn new(deployer: Deployer, ledger: Box<dyn TipLedger>) -> Self {
        Self {
            deployer,
            current: RwLock::new(Vec::new()),
            tips: Mutex::new(TipBook::new(ledger)),
        }
    }

    pub fn region_names(&self) -> Vec<String> {
        self.deployer.catalog().names()
    }

    pub fn live_enabled(&self) -> bool {
        self.deployer.live_enabled()
    }

    /// Plan a deployment and make it the current one
    ///
    /// Planning happens outside the lock; the swap is last-write-wins. An
    /// unknown region leaves the current deployment untouched.
    pub async fn deploy(
        &self,
        region_name: &str,
        use_live: bool,
    ) -> Result<DeploymentResult, SentinelError> {
        let result = self.deployer.deploy(region_name, use_live).await?;
        *self.current.write() = result.nodes.clone();
        Ok(result)
    }

    pub fn current_nodes(&self) -> Vec<Node> {
        self.current.read().clone()
    }

    pub fn submit_tip(&self, sender: &str, message: &str) -> LedgerReceipt {
        self.tips.lock().submit(sender, message, Local::now())
    }

    pub fn status(&self) -> StatusSnapshot {
        let nodes = self.current_nodes();
        let tips = self.tips.lock();
        StatusSnapshot {
            nodes,
            alerts: tips.alerts(),
            sms_logs: tips.sms_logs(),
            height: tips.height(),
        }
    }
}
