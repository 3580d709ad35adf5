//! Region catalog
//!
//! Static geographic models for every forest the planner knows about.
//! Loaded once at startup (built-in table or `[[regions]]` in config)
//! and only read afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::SentinelError;

/// A (lat, lon) pair in decimal degrees, serialized as `[lat, lon]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord(pub f64, pub f64);

impl Coord {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lon(&self) -> f64 {
        self.1
    }

    /// Finite and within the lat/lon ranges
    pub fn is_valid(&self) -> bool {
        self.0.is_finite()
            && self.1.is_finite()
            && self.0.abs() <= 90.0
            && self.1.abs() <= 180.0
    }
}

/// Kind of linear hazard a risk vector follows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskKind {
    Road,
    River,
    Path,
    Other(String),
}

impl From<String> for RiskKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ROAD" => RiskKind::Road,
            "RIVER" => RiskKind::River,
            "PATH" => RiskKind::Path,
            other => RiskKind::Other(other.to_string()),
        }
    }
}

impl From<RiskKind> for String {
    fn from(kind: RiskKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for RiskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskKind::Road => write!(f, "ROAD"),
            RiskKind::River => write!(f, "RIVER"),
            RiskKind::Path => write!(f, "PATH"),
            RiskKind::Other(name) => write!(f, "{}", name),
        }
    }
}

/// A straight segment along which sensors are seeded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskVector {
    pub start: Coord,
    pub end: Coord,
    #[serde(rename = "type")]
    pub kind: RiskKind,
}

/// Immutable geographic model of one forest region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub center: Coord,
    pub radius_km: f64,
    /// Map framing hint for the presentation layer
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    pub area_sqkm: f64,
    /// Reported only; no effect on placement
    #[serde(default = "default_terrain_factor")]
    pub terrain_factor: f64,
    #[serde(default)]
    pub risk_vectors: Vec<RiskVector>,
    #[serde(default)]
    pub ridges: Vec<Coord>,
}

impl Region {
    /// Reject geometry the planner cannot walk in bounded steps
    pub fn validate(&self) -> Result<(), SentinelError> {
        let invalid = |what: String| {
            SentinelError::Config(format!("region '{}': {}", self.name, what))
        };

        if !self.center.is_valid() {
            return Err(invalid(format!("center {:?} out of range", self.center)));
        }
        if !(self.radius_km.is_finite() && self.radius_km > 0.0) {
            return Err(invalid(format!(
                "radius_km must be positive, got {}",
                self.radius_km
            )));
        }
        for (i, vector) in self.risk_vectors.iter().enumerate() {
            if !(vector.start.is_valid() && vector.end.is_valid()) {
                return Err(invalid(format!("risk vector {} out of range", i)));
            }
        }
        if let Some(ridge) = self.ridges.iter().find(|r| !r.is_valid()) {
            return Err(invalid(format!("ridge {:?} out of range", ridge)));
        }
        Ok(())
    }
}

fn default_zoom() -> u8 {
    12
}

fn default_terrain_factor() -> f64 {
    1.0
}

/// Name-keyed, insertion-ordered set of regions
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    regions: Vec<Region>,
    index: HashMap<String, usize>,
}

impl RegionCatalog {
    pub fn from_regions(regions: Vec<Region>) -> Result<Self, SentinelError> {
        let mut index = HashMap::with_capacity(regions.len());
        for (i, region) in regions.iter().enumerate() {
            region.validate()?;
            if index.insert(region.name.clone(), i).is_some() {
                return Err(SentinelError::Config(format!(
                    "duplicate region name '{}'",
                    region.name
                )));
            }
        }
        Ok(Self { regions, index })
    }

    pub fn lookup(&self, name: &str) -> Result<&Region, SentinelError> {
        self.index
            .get(name)
            .map(|&i| &self.regions[i])
            .ok_or_else(|| SentinelError::UnknownRegion(name.to_string()))
    }

    /// Region names in catalog order
    pub fn names(&self) -> Vec<String> {
        self.regions.iter().map(|r| r.name.clone()).collect()
    }

    #[cfg(test)]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// The three Kenyan forests shipped with the service
    pub fn builtin() -> Self {
        let road = |start: (f64, f64), end: (f64, f64)| RiskVector {
            start: Coord(start.0, start.1),
            end: Coord(end.0, end.1),
            kind: RiskKind::Road,
        };

        let regions = vec![
            Region {
                name: "Karura Forest".to_string(),
                center: Coord(-1.240, 36.825),
                radius_km: 2.5,
                zoom: 13,
                area_sqkm: 10.4,
                terrain_factor: 1.1,
                risk_vectors: vec![
                    // Limuru Road boundary
                    road((-1.23, 36.81), (-1.25, 36.81)),
                    // Kiambu Road boundary
                    road((-1.23, 36.84), (-1.25, 36.84)),
                    RiskVector {
                        start: Coord(-1.235, 36.815),
                        end: Coord(-1.245, 36.835),
                        kind: RiskKind::River,
                    },
                ],
                ridges: vec![Coord(-1.238, 36.822), Coord(-1.245, 36.830)],
            },
            Region {
                name: "Mau Complex".to_string(),
                center: Coord(-0.55, 35.75),
                radius_km: 15.0,
                zoom: 11,
                area_sqkm: 400.0,
                terrain_factor: 1.8,
                risk_vectors: vec![
                    // Narok Road entry
                    road((-0.50, 35.70), (-0.60, 35.80)),
                    RiskVector {
                        start: Coord(-0.55, 35.72),
                        end: Coord(-0.55, 35.78),
                        kind: RiskKind::Path,
                    },
                ],
                ridges: vec![
                    Coord(-0.52, 35.73),
                    Coord(-0.58, 35.77),
                    Coord(-0.54, 35.76),
                    Coord(-0.56, 35.74),
                ],
            },
            Region {
                name: "Arabuko Sokoke".to_string(),
                center: Coord(-3.30, 39.90),
                radius_km: 10.0,
                zoom: 11,
                area_sqkm: 420.0,
                terrain_factor: 1.0,
                risk_vectors: vec![road((-3.25, 39.85), (-3.35, 39.95))],
                ridges: vec![Coord(-3.30, 39.90)],
            },
        ];

        Self::from_regions(regions).expect("built-in regions are valid and uniquely named")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let catalog = RegionCatalog::builtin();
        assert_eq!(
            catalog.names(),
            vec!["Karura Forest", "Mau Complex", "Arabuko Sokoke"]
        );
    }

    #[test]
    fn test_lookup() {
        let catalog = RegionCatalog::builtin();
        let karura = catalog.lookup("Karura Forest").unwrap();
        assert_eq!(karura.zoom, 13);
        assert_eq!(karura.risk_vectors.len(), 3);
        assert_eq!(karura.ridges.len(), 2);

        match catalog.lookup("Kakamega") {
            Err(SentinelError::UnknownRegion(name)) => assert_eq!(name, "Kakamega"),
            other => panic!("expected UnknownRegion, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let karura = RegionCatalog::builtin().lookup("Karura Forest").unwrap().clone();
        let result = RegionCatalog::from_regions(vec![karura.clone(), karura]);
        assert!(matches!(result, Err(SentinelError::Config(_))));
    }

    #[test]
    fn test_risk_kind_strings() {
        assert_eq!(RiskKind::from("ROAD".to_string()), RiskKind::Road);
        assert_eq!(
            RiskKind::from("road".to_string()),
            RiskKind::Other("road".to_string())
        );
        assert_eq!(
            RiskKind::from("FIREBREAK".to_string()),
            RiskKind::Other("FIREBREAK".to_string())
        );
        assert_eq!(RiskKind::River.to_string(), "RIVER");
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let karura = RegionCatalog::builtin().lookup("Karura Forest").unwrap().clone();

        let mut far_end = karura.clone();
        far_end.risk_vectors[0].end = Coord(f64::INFINITY, 30.0);
        assert!(matches!(far_end.validate(), Err(SentinelError::Config(_))));

        let mut off_globe = karura.clone();
        off_globe.center = Coord(-1.24, 190.0);
        assert!(off_globe.validate().is_err());

        let mut no_radius = karura.clone();
        no_radius.radius_km = 0.0;
        assert!(no_radius.validate().is_err());

        let mut nan_ridge = karura.clone();
        nan_ridge.ridges.push(Coord(f64::NAN, 36.8));
        assert!(RegionCatalog::from_regions(vec![nan_ridge]).is_err());

        assert!(karura.validate().is_ok());
    }

    #[test]
    fn test_coord_serializes_as_pair() {
        let json = serde_json::to_value(Coord(-1.24, 36.825)).unwrap();
        assert_eq!(json, serde_json::json!([-1.24, 36.825]));
    }
}
