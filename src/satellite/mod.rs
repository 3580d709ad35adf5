//! Live terrain/vegetation analysis
//!
//! Samples ridge pixels (candidate relay sites) and sparse-vegetation pixels
//! (candidate sensor sites) from a remote geospatial provider and converts
//! them into nodes.
//!
//! ## How it works:
//! 1. Buffer the region center by its radius and take the bounding rectangle
//! 2. Ask the provider for a capped stratified sample of each masked layer
//! 3. Map sampled points to `RELAY_LIVE_<i>` / `SENS_LIVE_<i>` nodes
//!
//! Whether the provider is usable is decided once at startup. A failed layer
//! only drops that layer's nodes.

#[cfg(feature = "live")]
pub mod provider;
pub mod types;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::catalog::Coord;
use crate::config::{LiveConfig, SamplingConfig};
use crate::deployment::types::{Battery, Node, NodeKind, NodeStatus};
use crate::error::SentinelError;
use types::{BoundingBox, GeoPoint, SampleLayer, SampleRequest};

/// Remote source of sampled raster points
#[async_trait]
pub trait TerrainProvider: Send + Sync {
    /// Provider identifier for logs
    fn name(&self) -> &str;

    /// Draw a stratified sample of points from one masked layer
    async fn sample(&self, request: &SampleRequest) -> anyhow::Result<Vec<GeoPoint>>;
}

/// Live analysis capability, fixed for the lifetime of the process
#[derive(Clone)]
pub enum LiveAdapter {
    Enabled {
        provider: Arc<dyn TerrainProvider>,
        sampling: SamplingConfig,
    },
    Disabled,
}

impl LiveAdapter {
    pub fn enabled(provider: Arc<dyn TerrainProvider>, sampling: SamplingConfig) -> Self {
        LiveAdapter::Enabled { provider, sampling }
    }

    /// Connect to the configured provider, or fall back to offline mode
    pub async fn initialize(config: Option<&LiveConfig>) -> Self {
        let Some(config) = config else {
            info!("Live analysis not configured (precomputed mode only)");
            return LiveAdapter::Disabled;
        };

        match connect_provider(config).await {
            Ok(provider) => {
                info!("Live analysis enabled via {}", provider.name());
                LiveAdapter::enabled(provider, config.sampling.clone())
            }
            Err(e) => {
                warn!(
                    "{} (running in precomputed mode)",
                    SentinelError::ProviderUnavailable(format!("{:#}", e))
                );
                LiveAdapter::Disabled
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, LiveAdapter::Enabled { .. })
    }

    /// Sample relays and sensors around `center`. Never fails; an empty
    /// result means nothing usable came back.
    pub async fn analyze(&self, center: Coord, radius_km: f64) -> Vec<Node> {
        let (provider, sampling) = match self {
            LiveAdapter::Enabled { provider, sampling } => (provider, sampling),
            LiveAdapter::Disabled => {
                debug!("Live analysis disabled, returning no nodes");
                return Vec::new();
            }
        };

        info!(
            "Satellite scan: {} km around ({}, {}) via {}",
            radius_km,
            center.lat(),
            center.lon(),
            provider.name()
        );

        let region = BoundingBox::around(center, radius_km * 1000.0);
        let request = |layer: SampleLayer, num_points: usize| SampleRequest {
            layer,
            region,
            num_points,
            scale_m: sampling.scale_m,
            geometries: true,
        };

        let ridge_request = request(SampleLayer::ridges(sampling), sampling.max_relays);
        let risk_request = request(SampleLayer::risk_zones(sampling), sampling.max_sensors);

        let (ridges, risks) = tokio::join!(
            provider.sample(&ridge_request),
            provider.sample(&risk_request)
        );

        let mut nodes = Vec::new();
        let relays = layer_points(&ridge_request, ridges);
        nodes.extend(relays.iter().take(sampling.max_relays).enumerate().map(|(i, p)| Node {
            id: format!("RELAY_LIVE_{}", i),
            lat: p.lat,
            lon: p.lon,
            kind: NodeKind::Relay,
            status: NodeStatus::Online,
            battery: Battery::Label("SOLAR".to_string()),
            role: "Topo-Optimized Ridge".to_string(),
        }));

        let sensors = layer_points(&risk_request, risks);
        nodes.extend(sensors.iter().take(sampling.max_sensors).enumerate().map(|(i, p)| Node {
            id: format!("SENS_LIVE_{}", i),
            lat: p.lat,
            lon: p.lon,
            kind: NodeKind::Sensor,
            status: NodeStatus::Sleep,
            battery: Battery::Label("95%".to_string()),
            role: "NDVI Risk Zone".to_string(),
        }));

        info!("Live analysis complete: {} candidate nodes", nodes.len());
        nodes
    }
}

#[cfg(feature = "live")]
async fn connect_provider(config: &LiveConfig) -> anyhow::Result<Arc<dyn TerrainProvider>> {
    let client = provider::GeoQueryClient::connect(config.clone()).await?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "live"))]
async fn connect_provider(_config: &LiveConfig) -> anyhow::Result<Arc<dyn TerrainProvider>> {
    anyhow::bail!("built without the live feature")
}

/// Unwrap one layer's sample, logging and dropping it on failure
fn layer_points(request: &SampleRequest, result: anyhow::Result<Vec<GeoPoint>>) -> Vec<GeoPoint> {
    match result {
        Ok(points) => points,
        Err(e) => {
            warn!(
                "{}",
                SentinelError::ProviderQueryFailed {
                    layer: request.layer.label().to_string(),
                    reason: format!("{:#}", e),
                }
            );
            Vec::new()
        }
    }
}
