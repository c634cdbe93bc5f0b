use std::io::Read;

use flate2::read::GzDecoder;
use prost::Message;
use serde_json::{Number, Value as JsonValue};

use super::proto::{self, GeomType};
use crate::domain::geo::{tile_pixel_to_lonlat, DEFAULT_EXTENT};
use crate::domain::{DomainError, Geometry, Position, Properties, TileCoord};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

const CMD_MOVE_TO: u32 = 1;
const CMD_LINE_TO: u32 = 2;
const CMD_CLOSE_PATH: u32 = 7;

/// Feature with geometry still in tile pixel space (y down)
#[derive(Debug, Clone, PartialEq)]
pub struct TileFeature {
    pub id: Option<u64>,
    pub geometry: Geometry,
    pub properties: Properties,
}

impl TileFeature {
    /// Geometry projected to WGS84 `[lon, lat]`
    pub fn geographic(&self, tile: TileCoord, extent: u32) -> Geometry {
        self.geometry.map_positions(|[px, py]| {
            let (lon, lat) = tile_pixel_to_lonlat(tile, px, py, extent);
            [lon, lat]
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLayer {
    pub name: String,
    pub extent: u32,
    pub features: Vec<TileFeature>,
    /// Features dropped for unknown type or malformed geometry
    pub skipped: usize,
}

/// Decode a (possibly gzip-compressed) Mapbox Vector Tile.
pub fn decode_tile(bytes: &[u8]) -> Result<Vec<DecodedLayer>, DomainError> {
    let raw = if bytes.starts_with(&GZIP_MAGIC) {
        let mut inflated = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut inflated)
            .map_err(|e| DomainError::decode(format!("Invalid gzip payload: {}", e)))?;
        inflated
    } else {
        bytes.to_vec()
    };

    let tile = proto::Tile::decode(raw.as_slice())
        .map_err(|e| DomainError::decode(format!("Invalid vector tile: {}", e)))?;

    Ok(tile.layers.into_iter().map(decode_layer).collect())
}

fn decode_layer(layer: proto::Layer) -> DecodedLayer {
    let extent = layer.extent.filter(|e| *e > 0).unwrap_or(DEFAULT_EXTENT);
    let mut features = Vec::with_capacity(layer.features.len());
    let mut skipped = 0;

    for feature in &layer.features {
        let kind = GeomType::try_from(feature.r#type.unwrap_or(0)).unwrap_or(GeomType::Unknown);
        match decode_geometry(kind, &feature.geometry) {
            Some(geometry) => features.push(TileFeature {
                id: feature.id,
                geometry,
                properties: decode_properties(&feature.tags, &layer.keys, &layer.values),
            }),
            None => skipped += 1,
        }
    }

    DecodedLayer {
        name: layer.name,
        extent,
        features,
        skipped,
    }
}

fn zigzag(n: u32) -> i64 {
    i64::from(n >> 1) ^ -i64::from(n & 1)
}

/// Split a command stream into paths; every MoveTo starts a new path.
fn decode_paths(commands: &[u32]) -> Option<Vec<Vec<Position>>> {
    let mut paths: Vec<Vec<Position>> = Vec::new();
    let (mut x, mut y) = (0i64, 0i64);
    let mut i = 0;

    while i < commands.len() {
        let cmd = commands[i];
        let (id, count) = (cmd & 0x7, (cmd >> 3) as usize);
        i += 1;

        match id {
            CMD_MOVE_TO | CMD_LINE_TO => {
                if commands.len() < i + count * 2 {
                    return None;
                }
                for _ in 0..count {
                    x += zigzag(commands[i]);
                    y += zigzag(commands[i + 1]);
                    i += 2;
                    let point = [x as f64, y as f64];
                    if id == CMD_MOVE_TO {
                        paths.push(vec![point]);
                    } else {
                        paths.last_mut()?.push(point);
                    }
                }
            }
            CMD_CLOSE_PATH => {
                let path = paths.last_mut()?;
                let first = *path.first()?;
                path.push(first);
            }
            _ => return None,
        }
    }

    Some(paths)
}

/// Surveyor's formula; positive for exterior rings in tile space.
fn signed_area(ring: &[Position]) -> f64 {
    ring.windows(2)
        .map(|w| w[0][0] * w[1][1] - w[1][0] * w[0][1])
        .sum::<f64>()
        / 2.0
}

fn decode_geometry(kind: GeomType, commands: &[u32]) -> Option<Geometry> {
    let paths = decode_paths(commands)?;

    match kind {
        GeomType::Point => {
            let mut points: Vec<Position> = paths.into_iter().flatten().collect();
            match points.len() {
                0 => None,
                1 => points.pop().map(Geometry::Point),
                _ => Some(Geometry::MultiPoint(points)),
            }
        }
        GeomType::Linestring => {
            let mut lines: Vec<Vec<Position>> =
                paths.into_iter().filter(|line| line.len() >= 2).collect();
            match lines.len() {
                0 => None,
                1 => lines.pop().map(Geometry::LineString),
                _ => Some(Geometry::MultiLineString(lines)),
            }
        }
        GeomType::Polygon => {
            let mut polygons: Vec<Vec<Vec<Position>>> = Vec::new();
            for ring in paths.into_iter().filter(|ring| ring.len() >= 4) {
                let area = signed_area(&ring);
                if area > 0.0 {
                    polygons.push(vec![ring]);
                } else if area < 0.0 {
                    if let Some(current) = polygons.last_mut() {
                        current.push(ring);
                    }
                }
            }
            match polygons.len() {
                0 => None,
                1 => polygons.pop().map(Geometry::Polygon),
                _ => Some(Geometry::MultiPolygon(polygons)),
            }
        }
        GeomType::Unknown => None,
    }
}

fn decode_value(value: &proto::Value) -> JsonValue {
    if let Some(s) = &value.string_value {
        JsonValue::String(s.clone())
    } else if let Some(f) = value.float_value {
        float_json(f64::from(f))
    } else if let Some(d) = value.double_value {
        float_json(d)
    } else if let Some(i) = value.int_value {
        JsonValue::from(i)
    } else if let Some(u) = value.uint_value {
        JsonValue::from(u)
    } else if let Some(s) = value.sint_value {
        JsonValue::from(s)
    } else if let Some(b) = value.bool_value {
        JsonValue::Bool(b)
    } else {
        JsonValue::Null
    }
}

fn float_json(value: f64) -> JsonValue {
    Number::from_f64(value)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

fn decode_properties(tags: &[u32], keys: &[String], values: &[proto::Value]) -> Properties {
    let mut properties = Properties::new();
    for pair in tags.chunks_exact(2) {
        let (Some(key), Some(value)) = (keys.get(pair[0] as usize), values.get(pair[1] as usize))
        else {
            continue;
        };
        properties.insert(key.clone(), decode_value(value));
    }
    properties
}
