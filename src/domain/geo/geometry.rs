use serde::{Deserialize, Serialize};

/// `[lon, lat]` position, GeoJSON axis order
pub type Position = [f64; 2];

/// GeoJSON geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    /// Representative `(lat, lon)` used to query per-segment data.
    ///
    /// Lines use the vertex at `len / 2` (first part for multi-lines).
    pub fn center_point(&self) -> Option<(f64, f64)> {
        let [lon, lat] = match self {
            Self::Point(p) => *p,
            Self::LineString(coords) => *coords.get(coords.len() / 2)?,
            Self::MultiLineString(parts) => {
                let first = parts.first()?;
                *first.get(first.len() / 2)?
            }
            _ => return None,
        };
        Some((lat, lon))
    }

    /// Polylines making up this geometry, empty for non-linear types.
    pub fn lines(&self) -> Vec<&[Position]> {
        match self {
            Self::LineString(coords) => vec![coords.as_slice()],
            Self::MultiLineString(parts) => parts.iter().map(Vec::as_slice).collect(),
            _ => Vec::new(),
        }
    }

    /// Apply `f` to every position.
    pub fn map_positions<F>(&self, mut f: F) -> Self
    where
        F: FnMut(Position) -> Position,
    {
        match self {
            Self::Point(p) => Self::Point(f(*p)),
            Self::MultiPoint(coords) => Self::MultiPoint(map_line(coords, &mut f)),
            Self::LineString(coords) => Self::LineString(map_line(coords, &mut f)),
            Self::MultiLineString(parts) => Self::MultiLineString(map_lines(parts, &mut f)),
            Self::Polygon(rings) => Self::Polygon(map_lines(rings, &mut f)),
            Self::MultiPolygon(polys) => Self::MultiPolygon(
                polys.iter().map(|rings| map_lines(rings, &mut f)).collect(),
            ),
        }
    }
}

fn map_line<F>(coords: &[Position], f: &mut F) -> Vec<Position>
where
    F: FnMut(Position) -> Position,
{
    coords.iter().map(|p| f(*p)).collect()
}

fn map_lines<F>(lines: &[Vec<Position>], f: &mut F) -> Vec<Vec<Position>>
where
    F: FnMut(Position) -> Position,
{
    lines.iter().map(|line| map_line(line, f)).collect()
}
