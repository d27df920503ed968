use geojson::FeatureCollection;

use crate::equirect::LocalProjection;
use crate::export;
use crate::ingest::{self, RawElement};
use crate::orientation::{self, Confidence};
use crate::point::PlanarPoint;

/// Exportable result for one building, in geographic coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureRecord {
    pub id: i64,
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub orientation_deg: f64,
    pub deviation_deg: f64,
    pub signed_dev_deg: f64,
    pub aspect_ratio: f64,
    pub long_side_m: f64,
    pub confidence: Confidence,
    pub arrow_lat: f64,
    pub arrow_lon: f64,
}

pub struct BatchResult {
    pub records: Vec<FeatureRecord>,
    /// Original building outlines with display properties, for map overlay.
    pub polygons: FeatureCollection,
    pub discarded: usize,
}

/// Runs the whole pipeline over one batch of raw elements. Pure and
/// synchronous: identical input yields bit-identical records, and one bad
/// geometry only bumps the discard counter.
pub fn analyze_batch(elements: &[RawElement]) -> BatchResult {
    let ingested = ingest::normalize(elements);
    let mut discarded = ingested.discarded;
    let mut records = Vec::with_capacity(ingested.polygons.len());
    let mut features = Vec::with_capacity(ingested.polygons.len());

    for building in &ingested.polygons {
        let proj = LocalProjection::centered_on(&building.ring);
        let planar: Vec<PlanarPoint> = building.ring.iter().map(|w| proj.project(w)).collect();
        let Some(o) = orientation::analyze(&planar) else {
            log::debug!("discarding polygon {}: analysis failed", building.id);
            discarded += 1;
            continue;
        };
        let representative = proj.unproject(&o.representative);
        let arrow = proj.unproject(&o.arrow);
        let record = FeatureRecord {
            id: building.id,
            name: building.name.clone(),
            lat: representative.lat,
            lon: representative.lon,
            orientation_deg: o.bearing_deg,
            deviation_deg: o.deviation_deg,
            signed_dev_deg: o.signed_deviation_deg,
            aspect_ratio: o.aspect_ratio,
            long_side_m: o.long_side_m,
            confidence: o.confidence,
            arrow_lat: arrow.lat,
            arrow_lon: arrow.lon,
        };
        features.push(export::polygon_feature(building, &record));
        records.push(record);
    }

    log::info!(
        "batch: {} record(s), {} discarded",
        records.len(),
        discarded
    );
    BatchResult {
        records,
        polygons: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
        discarded,
    }
}
