use geo_types::{Coord, LineString};
use serde::{Deserialize, Serialize};

pub const FEATURE_COLLECTION_TYPE: &str = "FeatureCollection";
pub const FEATURE_TYPE: &str = "Feature";
pub const LINE_STRING_TYPE: &str = "LineString";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub type_: String,
    pub name: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(name: String, features: Vec<Feature>) -> Self {
        FeatureCollection {
            type_: FEATURE_COLLECTION_TYPE.to_string(),
            name,
            features,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub properties: Properties,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Properties {
    // reserved for sorting routes later, always 0 for now
    pub ranking: i32,
    pub start_date: String,
    pub end_date: String,
}

/// A GeoJSON `LineString`. Coordinates are `[lon, lat]`, i.e. `x` is the
/// longitude.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeometryRepr", into = "GeometryRepr")]
pub struct Geometry {
    pub line_string: LineString<f64>,
}

impl Geometry {
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        self.line_string.coords().map(|c| [c.x, c.y]).collect()
    }

    pub fn len(&self) -> usize {
        self.line_string.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line_string.0.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
struct GeometryRepr {
    #[serde(rename = "type")]
    type_: String,
    coordinates: Vec<[f64; 2]>,
}

impl TryFrom<GeometryRepr> for Geometry {
    type Error = String;

    fn try_from(repr: GeometryRepr) -> Result<Self, Self::Error> {
        if repr.type_ != LINE_STRING_TYPE {
            return Err(format!("unsupported geometry type: {}", repr.type_));
        }
        let coords: Vec<Coord<f64>> = repr
            .coordinates
            .into_iter()
            .map(|[x, y]| Coord { x, y })
            .collect();
        Ok(Geometry {
            line_string: LineString::new(coords),
        })
    }
}

impl From<Geometry> for GeometryRepr {
    fn from(geometry: Geometry) -> Self {
        GeometryRepr {
            type_: LINE_STRING_TYPE.to_string(),
            coordinates: geometry.coordinates(),
        }
    }
}
