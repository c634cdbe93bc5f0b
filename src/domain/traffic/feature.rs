use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::geo::Geometry;

/// JSON object holding a feature's properties
pub type Properties = Map<String, Value>;

/// GeoJSON feature
///
/// The geometry is kept as raw JSON so collections with geometry types or
/// members this crate does not model still load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: Value,
    pub properties: Properties,
}

impl Feature {
    pub fn new(geometry: &Geometry, properties: Properties) -> Self {
        Self {
            geometry: serde_json::to_value(geometry).unwrap_or(Value::Null),
            properties,
        }
    }

    pub fn from_raw(geometry: Value, properties: Properties) -> Self {
        Self {
            geometry,
            properties,
        }
    }

    /// Typed geometry, `None` when missing or of an unsupported type.
    pub fn parsed_geometry(&self) -> Option<Geometry> {
        if self.geometry.is_null() {
            return None;
        }
        serde_json::from_value(self.geometry.clone()).ok()
    }

    pub fn property_f64(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(Value::as_f64)
    }
}

/// GeoJSON feature collection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Properties of every feature, in order, for NDJSON record files.
    pub fn records(&self) -> Vec<&Properties> {
        self.features.iter().map(|f| &f.properties).collect()
    }
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    geometry: Value,
    #[serde(default, deserialize_with = "null_as_empty")]
    properties: Properties,
}

#[derive(Deserialize)]
struct RawFeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<Feature>,
}

impl<'de> Deserialize<'de> for Feature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawFeature::deserialize(deserializer)?;
        expect_type::<D::Error>(&raw.kind, "Feature")?;
        Ok(Self::from_raw(raw.geometry, raw.properties))
    }
}

impl<'de> Deserialize<'de> for FeatureCollection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawFeatureCollection::deserialize(deserializer)?;
        expect_type::<D::Error>(&raw.kind, "FeatureCollection")?;
        Ok(Self::new(raw.features))
    }
}

fn expect_type<E: serde::de::Error>(found: &str, expected: &str) -> Result<(), E> {
    if found == expected {
        Ok(())
    } else {
        Err(E::custom(format!("expected type {expected}, found {found}")))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Properties>::deserialize(deserializer)?.unwrap_or_default())
}
