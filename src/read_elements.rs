use geojson::{Feature, GeoJson, Value, feature::Id};

use crate::ingest::{RawElement, RawGeometry, Tags};
use crate::point::GeoPoint;

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("invalid GeoJSON: {0}")]
    Parse(#[from] geojson::Error),
}

fn position_to_point(position: &[f64]) -> GeoPoint {
    // GeoJSON positions are [longitude, latitude]
    GeoPoint::new(position[1], position[0])
}

fn ring_to_points(ring: &[Vec<f64>]) -> Vec<GeoPoint> {
    ring.iter().map(|p| position_to_point(p)).collect()
}

fn value_to_geometry(value: &Value) -> Option<RawGeometry> {
    match value {
        Value::Polygon(rings) => {
            let outer = rings.first()?;
            if rings.len() == 1 {
                Some(RawGeometry::Ring(ring_to_points(outer)))
            } else {
                Some(RawGeometry::Relation {
                    outers: vec![ring_to_points(outer)],
                    inners: rings[1..].iter().map(|r| ring_to_points(r)).collect(),
                })
            }
        }
        Value::MultiPolygon(polygons) => {
            let mut outers = Vec::new();
            let mut inners = Vec::new();
            for rings in polygons {
                if let Some(outer) = rings.first() {
                    outers.push(ring_to_points(outer));
                }
                for inner in rings.iter().skip(1) {
                    inners.push(ring_to_points(inner));
                }
            }
            if outers.is_empty() {
                None
            } else {
                Some(RawGeometry::Relation { outers, inners })
            }
        }
        _ => None,
    }
}

fn property_string(feature: &Feature, key: &str) -> Option<String> {
    feature
        .properties
        .as_ref()
        .and_then(|props| props.get(key))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn feature_to_element(index: usize, feature: &Feature) -> Option<RawElement> {
    let geometry = value_to_geometry(&feature.geometry.as_ref()?.value)?;
    let id = match &feature.id {
        Some(Id::Number(n)) => n.as_i64().unwrap_or(index as i64),
        _ => index as i64,
    };
    Some(RawElement {
        id,
        tags: Tags {
            name: property_string(feature, "name"),
            building_type: property_string(feature, "building"),
        },
        geometry,
    })
}

/// Parses a GeoJSON document into raw elements: a Polygon becomes a simple
/// ring (holes travel along and are discarded by ingest), a MultiPolygon
/// becomes a multi-ring relation. Non-area geometries are ignored.
pub fn elements_from_geojson(content: &str) -> Result<Vec<RawElement>, ReadError> {
    let geojson: GeoJson = content.parse()?;
    let elements: Vec<RawElement> = match geojson {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .iter()
            .enumerate()
            .filter_map(|(i, feature)| feature_to_element(i, feature))
            .collect(),
        GeoJson::Feature(feature) => feature_to_element(0, &feature).into_iter().collect(),
        GeoJson::Geometry(geometry) => value_to_geometry(&geometry.value)
            .map(|g| RawElement {
                id: 0,
                tags: Tags::default(),
                geometry: g,
            })
            .into_iter()
            .collect(),
    };
    log::info!("read {} element(s)", elements.len());
    Ok(elements)
}
