//! Node and deployment records returned to the presentation layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Coord;

/// Device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    Sensor,
    Relay,
}

/// Operating state label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeStatus {
    Active,
    Online,
    Sleep,
}

/// Either a charge percentage or a power-source label ("SOLAR", "95%")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Battery {
    Percent(u8),
    Label(String),
}

/// A planned sensor or relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub status: NodeStatus,
    pub battery: Battery,
    /// Why the node was placed here
    pub role: String,
}

/// Where a node set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    SatelliteLive,
    PreComputed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentStats {
    pub sensors: usize,
    pub relays: usize,
    pub cost: u64,
    pub source: Source,
    pub terrain_factor: f64,
}

/// Result of one deploy call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentResult {
    pub deployment_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub nodes: Vec<Node>,
    pub center: Coord,
    pub zoom: u8,
    pub active_forest: String,
    pub stats: DeploymentStats,
}
