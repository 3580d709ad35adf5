//! Precomputed placement
//!
//! Walks every risk vector of a region at a kind-dependent spacing and drops a
//! jittered sensor at each step, then puts one relay on every ridge point.
//! Distances use the small-angle `degrees * km_per_degree` approximation,
//! which is only meaningful over a few tens of kilometres.

use rand::Rng;

use super::types::{Battery, Node, NodeKind, NodeStatus};
use crate::catalog::{Region, RiskKind, RiskVector};
use crate::config::PlannerConfig;

pub struct PrecomputedPlanner {
    config: PlannerConfig,
}

impl PrecomputedPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn plan(&self, region: &Region) -> Vec<Node> {
        self.plan_with_rng(region, &mut rand::thread_rng())
    }

    pub fn plan_with_rng<R: Rng + ?Sized>(&self, region: &Region, rng: &mut R) -> Vec<Node> {
        let mut nodes = Vec::with_capacity(self.expected_sensors(region) + region.ridges.len());

        let mut sensor_count = 0usize;
        for vector in &region.risk_vectors {
            let steps = self.steps(vector);
            let d_lat = vector.end.lat() - vector.start.lat();
            let d_lon = vector.end.lon() - vector.start.lon();

            for i in 0..=steps {
                let fraction = if steps > 0 {
                    i as f64 / steps as f64
                } else {
                    0.0
                };

                nodes.push(Node {
                    id: format!("SENS_{}", sensor_count),
                    lat: vector.start.lat() + d_lat * fraction + self.jitter(rng),
                    lon: vector.start.lon() + d_lon * fraction + self.jitter(rng),
                    kind: NodeKind::Sensor,
                    status: NodeStatus::Active,
                    battery: Battery::Percent(100),
                    role: format!("Risk Zone ({})", vector.kind),
                });
                sensor_count += 1;
            }
        }

        for (i, ridge) in region.ridges.iter().enumerate() {
            nodes.push(Node {
                id: format!("RELAY_{}", i),
                lat: ridge.lat(),
                lon: ridge.lon(),
                kind: NodeKind::Relay,
                status: NodeStatus::Active,
                battery: Battery::Percent(100),
                role: "High Altitude Backbone".to_string(),
            });
        }

        nodes
    }

    /// Number of spacing intervals along a vector; it carries `steps + 1` sensors
    pub fn steps(&self, vector: &RiskVector) -> usize {
        let d_lat = vector.end.lat() - vector.start.lat();
        let d_lon = vector.end.lon() - vector.start.lon();
        let distance_km = (d_lat * d_lat + d_lon * d_lon).sqrt() * self.config.km_per_degree;

        let spacing = match vector.kind {
            RiskKind::Road => self.config.road_spacing_km,
            _ => self.config.default_spacing_km,
        };

        (distance_km / spacing).floor() as usize
    }

    /// Sensor count the plan will produce for a region, ignoring jitter
    fn expected_sensors(&self, region: &Region) -> usize {
        region.risk_vectors.iter().map(|v| self.steps(v) + 1).sum()
    }

    fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.config.jitter_deg > 0.0 {
            rng.gen_range(-self.config.jitter_deg..=self.config.jitter_deg)
        } else {
            0.0
        }
    }
}
