//! Geospatial query provider client
//!
//! Minimal HTTP protocol for remote terrain/vegetation sampling:
//! 1. Check the project via GET /v1/projects/<project> with a bearer token
//! 2. Sample a masked layer via POST /v1/projects/<project>/sample
//! 3. Parse the GeoJSON point collection in the response

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use super::types::{FeatureCollection, GeoPoint, Geometry, SampleRequest};
use super::TerrainProvider;
use crate::config::LiveConfig;

/// HTTP client for the remote sampling service
pub struct GeoQueryClient {
    config: LiveConfig,
    http: Client,
}

impl GeoQueryClient {
    /// Create a client (does not contact the provider yet)
    pub fn new(config: LiveConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self { config, http })
    }

    /// Create a client and verify the project is reachable with our token
    pub async fn connect(config: LiveConfig) -> Result<Self> {
        let client = Self::new(config)?;
        client.check_project().await?;
        Ok(client)
    }

    async fn check_project(&self) -> Result<()> {
        let url = self.project_url();
        info!("Checking geospatial project {} at {}", self.config.project, self.config.url);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .context("failed to reach geospatial provider")?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("project check failed with status {}: {}", status, body_text);
        }

        info!("Geospatial project {} ready", self.config.project);
        Ok(())
    }

    fn project_url(&self) -> String {
        format!(
            "{}/v1/projects/{}",
            self.config.url.trim_end_matches('/'),
            self.config.project
        )
    }
}

#[async_trait]
impl TerrainProvider for GeoQueryClient {
    fn name(&self) -> &str {
        &self.config.project
    }

    async fn sample(&self, request: &SampleRequest) -> Result<Vec<GeoPoint>> {
        let url = format!("{}/sample", self.project_url());
        debug!(
            "Sampling {} (n={}, scale={}m) over {:?}",
            request.layer.label(),
            request.num_points,
            request.scale_m,
            request.region
        );

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(request)
            .send()
            .await
            .with_context(|| format!("failed to send {} sample request", request.layer.label()))?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("sample request failed with status {}: {}", status, body_text);
        }

        let collection: FeatureCollection = resp
            .json()
            .await
            .context("failed to parse sample response")?;

        let total = collection.features.len();
        let points: Vec<GeoPoint> = collection
            .features
            .iter()
            .filter_map(|f| f.geometry.as_ref().and_then(Geometry::as_point))
            .collect();

        if points.len() < total {
            debug!("Skipped {} non-point features", total - points.len());
        }

        Ok(points)
    }
}
