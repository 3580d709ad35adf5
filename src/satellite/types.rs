//! Wire types for the geospatial sampling provider

use serde::{Deserialize, Serialize};

use crate::catalog::Coord;
use crate::config::SamplingConfig;

/// Metres per degree of latitude
const METRES_PER_DEGREE: f64 = 111_320.0;

pub const ELEVATION_DATASET: &str = "USGS/SRTMGL1_003";
pub const OPTICAL_COLLECTION: &str = "COPERNICUS/S2_SR_HARMONIZED";

/// Axis-aligned query rectangle in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Bounds of a circular buffer of `radius_m` around `center`
    pub fn around(center: Coord, radius_m: f64) -> Self {
        let d_lat = radius_m / METRES_PER_DEGREE;
        let cos_lat = center.lat().to_radians().cos().abs().max(1e-6);
        let d_lon = radius_m / (METRES_PER_DEGREE * cos_lat);

        Self {
            west: center.lon() - d_lon,
            south: center.lat() - d_lat,
            east: center.lon() + d_lon,
            north: center.lat() + d_lat,
        }
    }

    #[cfg(test)]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lon)
    }
}

/// Masked raster layer to draw sample points from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SampleLayer {
    /// Pixels whose elevation exceeds the focal mean by more than the threshold
    Ridges {
        dataset: String,
        band: String,
        relief_window_m: f64,
        relief_threshold_m: f64,
    },
    /// Pixels of a cloud-filtered median composite with low vegetation index
    RiskZones {
        collection: String,
        date_start: String,
        date_end: String,
        max_cloud_pct: f64,
        composite: String,
        nir_band: String,
        red_band: String,
        vegetation_threshold: f64,
    },
}

impl SampleLayer {
    pub fn ridges(sampling: &SamplingConfig) -> Self {
        SampleLayer::Ridges {
            dataset: ELEVATION_DATASET.to_string(),
            band: "elevation".to_string(),
            relief_window_m: sampling.relief_window_m,
            relief_threshold_m: sampling.relief_threshold_m,
        }
    }

    pub fn risk_zones(sampling: &SamplingConfig) -> Self {
        SampleLayer::RiskZones {
            collection: OPTICAL_COLLECTION.to_string(),
            date_start: sampling.date_start.clone(),
            date_end: sampling.date_end.clone(),
            max_cloud_pct: sampling.max_cloud_pct,
            composite: "median".to_string(),
            nir_band: "B8".to_string(),
            red_band: "B4".to_string(),
            vegetation_threshold: sampling.vegetation_threshold,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SampleLayer::Ridges { .. } => "ridges",
            SampleLayer::RiskZones { .. } => "risk_zones",
        }
    }
}

/// Stratified sample request for one layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRequest {
    pub layer: SampleLayer,
    pub region: BoundingBox,
    pub num_points: usize,
    pub scale_m: f64,
    pub geometries: bool,
}

/// GeoJSON feature collection returned by the provider
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: serde_json::Value,
}

/// A sampled location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl Geometry {
    /// GeoJSON point coordinates are `[lon, lat]`
    pub fn as_point(&self) -> Option<GeoPoint> {
        if self.kind != "Point" {
            return None;
        }
        let coords = self.coordinates.as_array()?;
        Some(GeoPoint {
            lat: coords.get(1)?.as_f64()?,
            lon: coords.first()?.as_f64()?,
        })
    }
}
