pub mod precomputed;
pub mod types;

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::{Region, RegionCatalog};
use crate::config::PlannerConfig;
use crate::error::SentinelError;
use crate::satellite::LiveAdapter;
use precomputed::PrecomputedPlanner;
use types::{DeploymentResult, DeploymentStats, Node, NodeKind, Source};

/// Chooses live or precomputed placement for a region and summarizes it
pub struct Deployer {
    catalog: Arc<RegionCatalog>,
    planner: PrecomputedPlanner,
    live: LiveAdapter,
    live_timeout: Duration,
    sensor_unit_cost: u64,
    relay_unit_cost: u64,
}

impl Deployer {
    pub fn new(
        catalog: Arc<RegionCatalog>,
        planner_config: PlannerConfig,
        live: LiveAdapter,
        live_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            sensor_unit_cost: planner_config.sensor_unit_cost,
            relay_unit_cost: planner_config.relay_unit_cost,
            planner: PrecomputedPlanner::new(planner_config),
            live,
            live_timeout,
        }
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    pub fn live_enabled(&self) -> bool {
        self.live.is_enabled()
    }

    /// Plan a deployment for `region_name`
    ///
    /// An empty or timed-out live analysis falls back to the precomputed
    /// plan and is then reported as `PRE_COMPUTED`.
    pub async fn deploy(
        &self,
        region_name: &str,
        use_live: bool,
    ) -> Result<DeploymentResult, SentinelError> {
        let region = self.catalog.lookup(region_name)?;

        let (nodes, source) = if use_live && self.live.is_enabled() {
            let nodes = self.run_live(region).await;
            if nodes.is_empty() {
                warn!(
                    "{}, falling back to precomputed placement",
                    SentinelError::EmptyLiveResult(region.name.clone())
                );
                (self.planner.plan(region), Source::PreComputed)
            } else {
                (nodes, Source::SatelliteLive)
            }
        } else {
            (self.planner.plan(region), Source::PreComputed)
        };

        let stats = self.stats(region, &nodes, source);
        info!(
            "Deployed {}: {} sensors, {} relays, cost {} ({:?})",
            region.name, stats.sensors, stats.relays, stats.cost, stats.source
        );

        Ok(DeploymentResult {
            deployment_id: Uuid::new_v4(),
            generated_at: chrono::Utc::now(),
            nodes,
            center: region.center,
            zoom: region.zoom,
            active_forest: region.name.clone(),
            stats,
        })
    }

    async fn run_live(&self, region: &Region) -> Vec<Node> {
        let analysis = self.live.analyze(region.center, region.radius_km);
        match tokio::time::timeout(self.live_timeout, analysis).await {
            Ok(nodes) => nodes,
            Err(_) => {
                warn!(
                    "Live analysis of {} timed out after {:?}",
                    region.name, self.live_timeout
                );
                Vec::new()
            }
        }
    }

    fn stats(&self, region: &Region, nodes: &[Node], source: Source) -> DeploymentStats {
        let sensors = nodes.iter().filter(|n| n.kind == NodeKind::Sensor).count();
        let relays = nodes.iter().filter(|n| n.kind == NodeKind::Relay).count();

        DeploymentStats {
            sensors,
            relays,
            cost: sensors as u64 * self.sensor_unit_cost + relays as u64 * self.relay_unit_cost,
            source,
            terrain_factor: region.terrain_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SamplingConfig;
    use crate::satellite::tests::{points, FakeProvider};
    use crate::satellite::types::{GeoPoint, SampleRequest};
    use crate::satellite::TerrainProvider;
    use async_trait::async_trait;
    use std::collections::HashSet;

    fn deployer(live: LiveAdapter) -> Deployer {
        Deployer::new(
            Arc::new(RegionCatalog::builtin()),
            PlannerConfig::default(),
            live,
            Duration::from_secs(5),
        )
    }

    fn fake_live(ridges: Option<Vec<GeoPoint>>, risks: Option<Vec<GeoPoint>>) -> LiveAdapter {
        LiveAdapter::enabled(
            Arc::new(FakeProvider::new(ridges, risks)),
            SamplingConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_karura_precomputed() {
        let result = deployer(LiveAdapter::Disabled)
            .deploy("Karura Forest", false)
            .await
            .unwrap();

        assert_eq!(result.stats.sensors, 20);
        assert_eq!(result.stats.relays, 2);
        assert_eq!(result.stats.cost, 940);
        assert_eq!(result.stats.source, Source::PreComputed);
        assert_eq!(result.stats.terrain_factor, 1.1);
        assert_eq!(result.zoom, 13);
        assert_eq!(result.active_forest, "Karura Forest");
        assert_eq!(result.nodes.len(), 22);
    }

    #[tokio::test]
    async fn test_stats_invariants_for_all_regions() {
        let deployer = deployer(LiveAdapter::Disabled);
        for name in deployer.catalog().names() {
            let result = deployer.deploy(&name, false).await.unwrap();
            let s = &result.stats;
            assert_eq!(s.sensors + s.relays, result.nodes.len());
            assert_eq!(s.cost, s.sensors as u64 * 35 + s.relays as u64 * 120);

            let ids: HashSet<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
            assert_eq!(ids.len(), result.nodes.len());
        }
    }

    #[tokio::test]
    async fn test_unknown_region() {
        let err = deployer(LiveAdapter::Disabled)
            .deploy("Nowhere", false)
            .await
            .unwrap_err();
        assert!(matches!(err, SentinelError::UnknownRegion(_)));
    }

    #[tokio::test]
    async fn test_live_requested_but_disabled() {
        let deployer = deployer(LiveAdapter::Disabled);
        let live = deployer.deploy("Mau Complex", true).await.unwrap();
        let offline = deployer.deploy("Mau Complex", false).await.unwrap();

        assert_eq!(live.stats.source, Source::PreComputed);
        assert_eq!(live.stats.sensors, offline.stats.sensors);
        assert_eq!(live.stats.relays, offline.stats.relays);
        assert_eq!(live.stats.cost, offline.stats.cost);
    }

    #[tokio::test]
    async fn test_live_nodes_used() {
        let result = deployer(fake_live(Some(points(3)), Some(points(10))))
            .deploy("Karura Forest", true)
            .await
            .unwrap();

        assert_eq!(result.stats.source, Source::SatelliteLive);
        assert_eq!(result.stats.relays, 3);
        assert_eq!(result.stats.sensors, 10);
        assert_eq!(result.stats.cost, 10 * 35 + 3 * 120);
        assert!(result.nodes.iter().all(|n| n.id.contains("_LIVE_")));
    }

    #[tokio::test]
    async fn test_partial_live_result_is_kept() {
        let result = deployer(fake_live(None, Some(points(6))))
            .deploy("Karura Forest", true)
            .await
            .unwrap();

        assert_eq!(result.stats.source, Source::SatelliteLive);
        assert_eq!(result.stats.relays, 0);
        assert_eq!(result.stats.sensors, 6);
    }

    #[tokio::test]
    async fn test_empty_live_falls_back() {
        let deployer = deployer(fake_live(Some(vec![]), None));
        let result = deployer.deploy("Karura Forest", true).await.unwrap();

        assert_eq!(result.stats.source, Source::PreComputed);
        assert_eq!(result.stats.sensors, 20);
        assert_eq!(result.stats.relays, 2);
        assert_eq!(result.nodes[0].id, "SENS_0");
    }

    #[tokio::test]
    async fn test_live_not_used_when_not_requested() {
        let provider = Arc::new(FakeProvider::new(Some(points(3)), Some(points(3))));
        let live = LiveAdapter::enabled(provider.clone(), SamplingConfig::default());
        let result = deployer(live).deploy("Arabuko Sokoke", false).await.unwrap();

        assert_eq!(result.stats.source, Source::PreComputed);
        assert_eq!(provider.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    struct StalledProvider;

    #[async_trait]
    impl TerrainProvider for StalledProvider {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn sample(&self, _request: &SampleRequest) -> anyhow::Result<Vec<GeoPoint>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(points(5))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_timeout_falls_back() {
        let deployer = Deployer::new(
            Arc::new(RegionCatalog::builtin()),
            PlannerConfig::default(),
            LiveAdapter::enabled(Arc::new(StalledProvider), SamplingConfig::default()),
            Duration::from_secs(30),
        );

        let result = deployer.deploy("Arabuko Sokoke", true).await.unwrap();
        assert_eq!(result.stats.source, Source::PreComputed);
        assert_eq!(result.stats.relays, 1);
    }
}
