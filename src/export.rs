use std::str::FromStr;

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use crate::ingest::BuildingPolygon;
use crate::record::FeatureRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    GeoJson,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "geojson" => Ok(ExportFormat::GeoJson),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

pub const CSV_HEADER: &str =
    "name,lat,lon,orientation_deg,deviation_deg,signed_dev_deg,aspect_ratio,confidence";

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Fixed header and column order; empty input yields the header line only.
pub fn to_csv(records: &[FeatureRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for r in records {
        out.push_str(&format!(
            "{},{:.6},{:.6},{:.1},{:.1},{:.1},{:.2},{}\n",
            csv_field(r.name.as_deref().unwrap_or("")),
            r.lat,
            r.lon,
            r.orientation_deg,
            r.deviation_deg,
            r.signed_dev_deg,
            r.aspect_ratio,
            r.confidence.as_str(),
        ));
    }
    out
}

/// Point feature at the record's representative location, every non-geometry
/// field carried as a property. Used by the map-display payload.
pub fn record_feature(r: &FeatureRecord) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), json!(r.name));
    properties.insert("orientation_deg".to_string(), json!(r.orientation_deg));
    properties.insert("deviation_deg".to_string(), json!(r.deviation_deg));
    properties.insert("signed_dev_deg".to_string(), json!(r.signed_dev_deg));
    properties.insert("aspect_ratio".to_string(), json!(r.aspect_ratio));
    properties.insert("long_side_m".to_string(), json!(r.long_side_m));
    properties.insert("confidence".to_string(), json!(r.confidence.as_str()));
    properties.insert("arrow_lat".to_string(), json!(r.arrow_lat));
    properties.insert("arrow_lon".to_string(), json!(r.arrow_lon));
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![r.lon, r.lat]))),
        id: Some(Id::Number(r.id.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn records_geojson(records: &[FeatureRecord]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: records.iter().map(record_feature).collect(),
        foreign_members: None,
    }
}

/// Pass-through of the original outline, closed again for GeoJSON, with the
/// display properties the overlay popup shows.
pub fn polygon_feature(building: &BuildingPolygon, record: &FeatureRecord) -> Feature {
    let mut ring: Vec<Vec<f64>> = building.ring.iter().map(|p| vec![p.lon, p.lat]).collect();
    if let Some(first) = ring.first().cloned() {
        ring.push(first);
    }
    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), json!(record.name));
    properties.insert("orientation_deg".to_string(), json!(record.orientation_deg));
    properties.insert("deviation_deg".to_string(), json!(record.deviation_deg));
    properties.insert("long_side_m".to_string(), json!(record.long_side_m));
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: Some(Id::Number(building.id.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn geojson_string(collection: &FeatureCollection) -> Result<String, serde_json::Error> {
    serde_json::to_string(collection)
}
