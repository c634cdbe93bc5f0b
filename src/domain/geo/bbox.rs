use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Latitude limit of the web-mercator projection
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// Geographic bounding box in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Collection area used for Iasi
    pub fn iasi() -> Self {
        Self::new(47.10, 27.52, 47.22, 27.66)
    }

    /// Wider view used when rendering the Iasi street network
    pub fn iasi_render_view() -> Self {
        Self::new(47.0342, 27.5010, 47.2852, 27.6943)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let values = [self.min_lat, self.min_lon, self.max_lat, self.max_lon];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(DomainError::validation(
                "Bounding box coordinates must be finite numbers",
            ));
        }

        if self.min_lat >= self.max_lat {
            return Err(DomainError::validation(format!(
                "min_lat ({}) must be below max_lat ({})",
                self.min_lat, self.max_lat
            )));
        }

        if self.min_lon >= self.max_lon {
            return Err(DomainError::validation(format!(
                "min_lon ({}) must be below max_lon ({})",
                self.min_lon, self.max_lon
            )));
        }

        if self.min_lat < -MAX_MERCATOR_LAT || self.max_lat > MAX_MERCATOR_LAT {
            return Err(DomainError::validation(format!(
                "Latitudes must stay within +/-{} for tile addressing",
                MAX_MERCATOR_LAT
            )));
        }

        if self.min_lon < -180.0 || self.max_lon > 180.0 {
            return Err(DomainError::validation(
                "Longitudes must stay within +/-180",
            ));
        }

        Ok(())
    }

    /// TomTom `bbox` query value: `minLon,minLat,maxLon,maxLat`
    pub fn to_query_param(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::iasi()
    }
}
