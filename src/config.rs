use serde::Deserialize;
use std::path::Path;

use crate::catalog::{Region, RegionCatalog};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    pub live: Option<LiveConfig>,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Replaces the built-in region catalog when present
    pub regions: Option<Vec<Region>>,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Precomputed placement model and unit costs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Small-angle degrees-to-kilometres factor
    pub km_per_degree: f64,
    /// Sensor spacing along roads
    pub road_spacing_km: f64,
    /// Sensor spacing along every other vector kind
    pub default_spacing_km: f64,
    /// Maximum absolute jitter applied to each sensor coordinate
    pub jitter_deg: f64,
    pub sensor_unit_cost: u64,
    pub relay_unit_cost: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            km_per_degree: 111.0,
            road_spacing_km: 0.3,
            default_spacing_km: 0.8,
            jitter_deg: 0.0005,
            sensor_unit_cost: 35,
            relay_unit_cost: 120,
        }
    }
}

/// Remote terrain/vegetation provider. Absent means offline mode.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveConfig {
    pub url: String,
    pub project: String,
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub sampling: SamplingConfig,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub max_relays: usize,
    pub max_sensors: usize,
    pub scale_m: f64,
    /// Relief above the local mean that marks a ridge pixel
    pub relief_threshold_m: f64,
    pub relief_window_m: f64,
    /// Vegetation index below which a pixel is a risk zone
    pub vegetation_threshold: f64,
    pub max_cloud_pct: f64,
    pub date_start: String,
    pub date_end: String,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_relays: 5,
            max_sensors: 15,
            scale_m: 100.0,
            relief_threshold_m: 15.0,
            relief_window_m: 500.0,
            vegetation_threshold: 0.5,
            max_cloud_pct: 20.0,
            date_start: "2023-01-01".to_string(),
            date_end: "2024-01-01".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LedgerConfig {
    pub genesis_height: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { genesis_height: 142 }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {:?}: {}", path, e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let p = &self.planner;
        if !(p.road_spacing_km > 0.0 && p.default_spacing_km > 0.0) {
            anyhow::bail!("planner spacings must be positive");
        }
        if !(p.jitter_deg >= 0.0) {
            anyhow::bail!("planner.jitter_deg must not be negative");
        }
        if !(p.km_per_degree > 0.0) {
            anyhow::bail!("planner.km_per_degree must be positive");
        }
        if let Some(regions) = &self.regions {
            Self::catalog_from(regions.clone())?;
        }
        Ok(())
    }

    /// Region catalog to serve: the `[[regions]]` override or the built-in table
    pub fn catalog(&self) -> anyhow::Result<RegionCatalog> {
        match &self.regions {
            Some(regions) => Self::catalog_from(regions.clone()),
            None => Ok(RegionCatalog::builtin()),
        }
    }

    fn catalog_from(regions: Vec<Region>) -> anyhow::Result<RegionCatalog> {
        RegionCatalog::from_regions(regions)
            .map_err(|e| anyhow::anyhow!("Invalid [[regions]]: {}", e))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            planner: PlannerConfig::default(),
            live: None,
            ledger: LedgerConfig::default(),
            logging: LoggingConfig::default(),
            regions: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:5000");
        assert_eq!(config.planner.road_spacing_km, 0.3);
        assert_eq!(config.ledger.genesis_height, 142);
        assert!(config.live.is_none());
        assert!(config.regions.is_none());
    }

    #[test]
    fn test_live_section_with_partial_sampling() {
        let config = Config::parse(
            r#"
            [live]
            url = "http://localhost:9000"
            project = "forest-grid"
            token = "secret"

            [live.sampling]
            max_sensors = 30
            "#,
        )
        .unwrap();

        let live = config.live.unwrap();
        assert_eq!(live.timeout_secs, 30);
        assert_eq!(live.sampling.max_sensors, 30);
        assert_eq!(live.sampling.max_relays, 5);
        assert_eq!(live.sampling.vegetation_threshold, 0.5);
    }

    #[test]
    fn test_rejects_zero_spacing() {
        let err = Config::parse(
            r#"
            [planner]
            road_spacing_km = 0.0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("spacings"));
    }

    #[test]
    fn test_regions_override() {
        let config = Config::parse(
            r#"
            [[regions]]
            name = "Test Grove"
            center = [0.1, 30.2]
            radius_km = 1.0
            area_sqkm = 3.0
            risk_vectors = [{ start = [0.1, 30.1], end = [0.12, 30.1], type = "ROAD" }]
            ridges = [[0.11, 30.15]]
            "#,
        )
        .unwrap();

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.names(), vec!["Test Grove"]);

        let regions = config.regions.unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].zoom, 12);
        assert_eq!(regions[0].terrain_factor, 1.0);
    }

    #[test]
    fn test_rejects_nonfinite_region() {
        let err = Config::parse(
            r#"
            [[regions]]
            name = "Runaway"
            center = [0.1, 30.2]
            radius_km = 1.0
            area_sqkm = 3.0
            risk_vectors = [{ start = [0.1, 30.1], end = [inf, 30.0], type = "ROAD" }]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Runaway"), "{}", err);

        let err = Config::parse(
            r#"
            [[regions]]
            name = "Polar"
            center = [91.0, 30.2]
            radius_km = 1.0
            area_sqkm = 3.0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("center"), "{}", err);

        let err = Config::parse(
            r#"
            [[regions]]
            name = "Pinhole"
            center = [0.1, 30.2]
            radius_km = -2.0
            area_sqkm = 3.0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("radius_km"), "{}", err);
    }

    #[test]
    fn test_rejects_duplicate_region_names() {
        let err = Config::parse(
            r#"
            [[regions]]
            name = "Test Grove"
            center = [0.1, 30.2]
            radius_km = 1.0
            area_sqkm = 3.0

            [[regions]]
            name = "Test Grove"
            center = [0.2, 30.3]
            radius_km = 2.0
            area_sqkm = 5.0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate region name"), "{}", err);
    }

    #[test]
    fn test_default_config_serves_builtin_catalog() {
        let catalog = Config::default().catalog().unwrap();
        assert_eq!(catalog.len(), 3);
    }
}
