use geo::{Area, Coord};

use crate::equirect::LocalProjection;
use crate::point::GeoPoint;

#[derive(Clone, Debug, Default)]
pub struct Tags {
    pub name: Option<String>,
    pub building_type: Option<String>,
}

/// Raw geometry as delivered by the map-data boundary: either a single closed
/// way or a relation with outer and inner (hole) boundaries.
#[derive(Clone, Debug)]
pub enum RawGeometry {
    Ring(Vec<GeoPoint>),
    Relation {
        outers: Vec<Vec<GeoPoint>>,
        inners: Vec<Vec<GeoPoint>>,
    },
}

#[derive(Clone, Debug)]
pub struct RawElement {
    pub id: i64,
    pub tags: Tags,
    pub geometry: RawGeometry,
}

/// One building, reduced to a single outer ring. The stored ring is open:
/// consecutive duplicates and the closing vertex are removed.
#[derive(Clone, Debug)]
pub struct BuildingPolygon {
    pub id: i64,
    pub name: Option<String>,
    pub ring: Vec<GeoPoint>,
}

pub struct IngestResult {
    pub polygons: Vec<BuildingPolygon>,
    pub discarded: usize,
}

/// Planar ring area via a provisional local projection, used only to pick the
/// representative outer ring of a relation.
fn ring_area_m2(ring: &[GeoPoint]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let proj = LocalProjection::centered_on(ring);
    let coords: Vec<Coord<f64>> = ring
        .iter()
        .map(|w| {
            let p = proj.project(w);
            Coord { x: p.x, y: p.y }
        })
        .collect();
    let polygon = geo::Polygon::new(coords.into(), vec![]);
    polygon.unsigned_area()
}

/// Drops consecutive duplicate vertices and the closing vertex. Returns None
/// when a coordinate is non-finite or out of range, or when fewer than 3
/// distinct vertices remain.
fn clean_ring(ring: &[GeoPoint]) -> Option<Vec<GeoPoint>> {
    if ring.iter().any(|p| !p.is_valid()) {
        return None;
    }
    let mut out: Vec<GeoPoint> = Vec::with_capacity(ring.len());
    for p in ring {
        if out.last() != Some(p) {
            out.push(*p);
        }
    }
    if out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    if out.len() < 3 { None } else { Some(out) }
}

fn select_ring(geometry: &RawGeometry) -> Option<Vec<GeoPoint>> {
    match geometry {
        RawGeometry::Ring(ring) => clean_ring(ring),
        RawGeometry::Relation { outers, inners } => {
            if !inners.is_empty() {
                log::trace!("dropping {} inner ring(s)", inners.len());
            }
            // Largest planar area wins; ties keep the first outer, so the
            // result only depends on input order.
            let mut best: Option<(f64, Vec<GeoPoint>)> = None;
            for outer in outers {
                let Some(clean) = clean_ring(outer) else {
                    continue;
                };
                let area = ring_area_m2(&clean);
                match &best {
                    Some((best_area, _)) if area <= *best_area => {}
                    _ => best = Some((area, clean)),
                }
            }
            best.map(|(_, ring)| ring)
        }
    }
}

/// Normalizes raw elements into building polygons, preserving input order.
/// Elements without a usable ring are skipped and counted, never an error.
pub fn normalize(elements: &[RawElement]) -> IngestResult {
    let mut polygons = Vec::with_capacity(elements.len());
    let mut discarded = 0usize;
    for element in elements {
        match select_ring(&element.geometry) {
            Some(ring) => polygons.push(BuildingPolygon {
                id: element.id,
                name: element.tags.name.clone(),
                ring,
            }),
            None => {
                log::debug!("discarding element {}: no usable ring", element.id);
                discarded += 1;
            }
        }
    }
    log::info!(
        "ingest: {} polygon(s), {} discarded",
        polygons.len(),
        discarded
    );
    IngestResult {
        polygons,
        discarded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(coords: &[(f64, f64)]) -> Vec<GeoPoint> {
        coords.iter().map(|&(lat, lon)| GeoPoint::new(lat, lon)).collect()
    }

    fn simple(id: i64, coords: &[(f64, f64)]) -> RawElement {
        RawElement {
            id,
            tags: Tags::default(),
            geometry: RawGeometry::Ring(ring(coords)),
        }
    }

    #[test]
    fn test_clean_ring_dedupes_and_opens() {
        let r = ring(&[
            (0.0, 0.0),
            (0.0, 0.001),
            (0.0, 0.001),
            (0.001, 0.001),
            (0.0, 0.0),
        ]);
        let clean = clean_ring(&r).unwrap();
        assert_eq!(clean.len(), 3);
        assert_eq!(clean[0], GeoPoint::new(0.0, 0.0));
        assert_eq!(clean[2], GeoPoint::new(0.001, 0.001));
    }

    #[test]
    fn test_degenerate_ring_is_discarded() {
        let elements = vec![
            simple(1, &[(0.0, 0.0), (0.0, 0.0), (0.0, 0.001), (0.0, 0.0)]),
            simple(2, &[(0.0, 0.0), (0.0, 0.001), (0.001, 0.001), (0.0, 0.0)]),
        ];
        let result = normalize(&elements);
        assert_eq!(result.polygons.len(), 1);
        assert_eq!(result.polygons[0].id, 2);
        assert_eq!(result.discarded, 1);
    }

    #[test]
    fn test_non_finite_coordinate_is_discarded() {
        let elements = vec![simple(
            7,
            &[(0.0, 0.0), (f64::NAN, 0.001), (0.001, 0.001), (0.0, 0.0)],
        )];
        let result = normalize(&elements);
        assert!(result.polygons.is_empty());
        assert_eq!(result.discarded, 1);
    }

    #[test]
    fn test_relation_keeps_largest_outer() {
        let small = ring(&[(0.0, 0.0), (0.0, 0.0001), (0.0001, 0.0001), (0.0, 0.0)]);
        let big = ring(&[
            (1.0, 1.0),
            (1.0, 1.001),
            (1.001, 1.001),
            (1.001, 1.0),
            (1.0, 1.0),
        ]);
        let hole = ring(&[(1.0002, 1.0002), (1.0002, 1.0004), (1.0004, 1.0004)]);
        let element = RawElement {
            id: 5,
            tags: Tags {
                name: Some("abbey".to_string()),
                building_type: Some("church".to_string()),
            },
            geometry: RawGeometry::Relation {
                outers: vec![small, big.clone()],
                inners: vec![hole],
            },
        };
        let result = normalize(&[element]);
        assert_eq!(result.discarded, 0);
        let polygon = &result.polygons[0];
        assert_eq!(polygon.name.as_deref(), Some("abbey"));
        // The closing vertex of the winning outer was removed.
        assert_eq!(polygon.ring.len(), 4);
        assert_eq!(polygon.ring[0], GeoPoint::new(1.0, 1.0));
    }

    #[test]
    fn test_order_preserved() {
        let elements = vec![
            simple(10, &[(0.0, 0.0), (0.0, 0.001), (0.001, 0.001), (0.0, 0.0)]),
            simple(11, &[(2.0, 2.0), (2.0, 2.001), (2.001, 2.001), (2.0, 2.0)]),
            simple(12, &[(4.0, 4.0), (4.0, 4.001), (4.001, 4.001), (4.0, 4.0)]),
        ];
        let result = normalize(&elements);
        let ids: Vec<i64> = result.polygons.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }
}
