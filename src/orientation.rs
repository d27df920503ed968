use core::fmt;

use crate::point::PlanarPoint;
use crate::rectangle::{self, OrientedRectangle};

/// Aspect ratios below this are too square to trust the fitted axis.
pub const LOW_CONFIDENCE_MAX_ASPECT: f64 = 1.15;
/// Aspect ratios at or above this give a clearly dominant axis.
pub const HIGH_CONFIDENCE_MIN_ASPECT: f64 = 1.6;

const ASPECT_HEIGHT_FLOOR_M: f64 = 1e-6;
const ASPECT_SENTINEL: f64 = 1e4;

const ARROW_FRACTION: f64 = 0.3;
const ARROW_MIN_M: f64 = 10.0;
const ARROW_MAX_M: f64 = 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything derived from one footprint, still in planar coordinates.
#[derive(Clone, Debug)]
pub struct Orientation {
    pub bearing_deg: f64,
    pub deviation_deg: f64,
    pub signed_deviation_deg: f64,
    pub aspect_ratio: f64,
    pub long_side_m: f64,
    pub confidence: Confidence,
    pub representative: PlanarPoint,
    pub arrow: PlanarPoint,
}

/// Compass bearing of the rectangle's long axis. The rotation is measured
/// counter-clockwise from planar east, the bearing clockwise from north; of
/// the two antipodal candidates the smaller is reported, so the result is
/// always in [0, 180).
pub fn bearing_deg(rotation: f64) -> f64 {
    let bearing = (90.0 - rotation.to_degrees()).rem_euclid(180.0);
    // rem_euclid of a tiny negative value can round up to the modulus itself
    if bearing >= 180.0 { 0.0 } else { bearing }
}

fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    if diff <= 180.0 { diff } else { 360.0 - diff }
}

/// Angular distance from the nearest east-west bearing (90 or 270), in [0, 90].
pub fn deviation_deg(bearing: f64) -> f64 {
    angular_difference(bearing, 90.0).min(angular_difference(bearing, 270.0))
}

/// Departure from east-west with its sign kept, normalized into (-90, 90].
pub fn signed_deviation_deg(bearing: f64) -> f64 {
    let dev = bearing - 90.0;
    if dev <= -90.0 { dev + 180.0 } else { dev }
}

pub fn aspect_ratio(rect: &OrientedRectangle) -> f64 {
    if rect.height < ASPECT_HEIGHT_FLOOR_M {
        return ASPECT_SENTINEL;
    }
    (rect.width / rect.height).clamp(1.0, ASPECT_SENTINEL)
}

/// Monotonic in the aspect ratio; a hull with fewer than 4 vertices is always
/// low because the fitted axis is numerically fragile there.
pub fn confidence(aspect: f64, hull_vertices: usize) -> Confidence {
    if hull_vertices < 4 || aspect < LOW_CONFIDENCE_MAX_ASPECT {
        Confidence::Low
    } else if aspect < HIGH_CONFIDENCE_MIN_ASPECT {
        Confidence::Medium
    } else {
        Confidence::High
    }
}

fn vertex_mean(ring: &[PlanarPoint]) -> PlanarPoint {
    let n = ring.len() as f64;
    PlanarPoint::new(
        ring.iter().map(|p| p.x).sum::<f64>() / n,
        ring.iter().map(|p| p.y).sum::<f64>() / n,
    )
}

/// Point-on-surface: scan a horizontal line placed strictly between two
/// distinct vertex levels, intersect it with the ring's edges and take the
/// midpoint of the widest interior segment. Unlike the centroid this stays
/// inside concave outlines. Falls back to the vertex mean for flat rings.
pub fn point_on_surface(ring: &[PlanarPoint]) -> PlanarPoint {
    let mean = vertex_mean(ring);
    if ring.len() < 3 {
        return mean;
    }
    let mut levels: Vec<f64> = ring.iter().map(|p| p.y).collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup();
    if levels.len() < 2 {
        return mean;
    }
    let mid = (levels[0] + levels[levels.len() - 1]) / 2.0;
    let mut scan_y = (levels[0] + levels[1]) / 2.0;
    for pair in levels.windows(2) {
        if pair[0] <= mid && mid <= pair[1] {
            scan_y = (pair[0] + pair[1]) / 2.0;
            break;
        }
    }

    let n = ring.len();
    let mut crossings: Vec<f64> = Vec::new();
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        if (a.y > scan_y) != (b.y > scan_y) {
            let t = (scan_y - a.y) / (b.y - a.y);
            crossings.push(a.x + t * (b.x - a.x));
        }
    }
    crossings.sort_by(f64::total_cmp);

    let mut best_width = 0.0;
    let mut best = mean;
    for pair in crossings.chunks_exact(2) {
        let width = pair[1] - pair[0];
        if width > best_width {
            best_width = width;
            best = PlanarPoint::new((pair[0] + pair[1]) / 2.0, scan_y);
        }
    }
    best
}

/// Endpoint of the visualization arrow: the representative point displaced
/// along the bearing by a fraction of the long side, clamped to a readable
/// on-map length. Display-only, nothing downstream consumes it.
pub fn arrow_endpoint(from: &PlanarPoint, bearing: f64, long_side_m: f64) -> PlanarPoint {
    let length = (long_side_m * ARROW_FRACTION).clamp(ARROW_MIN_M, ARROW_MAX_M);
    let rad = bearing.to_radians();
    PlanarPoint::new(from.x + length * rad.sin(), from.y + length * rad.cos())
}

/// Full analysis of one planar ring. Returns None when the fit degenerates
/// numerically; the caller skips and counts such polygons.
pub fn analyze(ring: &[PlanarPoint]) -> Option<Orientation> {
    let hull = rectangle::convex_hull(ring);
    let rect = rectangle::min_area_rect(&hull)?;
    if !(rect.rotation.is_finite() && rect.width.is_finite() && rect.height.is_finite()) {
        log::debug!("non-finite rectangle fit, skipping polygon");
        return None;
    }
    let bearing = bearing_deg(rect.rotation);
    let aspect = aspect_ratio(&rect);
    let representative = point_on_surface(ring);
    if !(representative.x.is_finite() && representative.y.is_finite()) {
        return None;
    }
    Some(Orientation {
        bearing_deg: bearing,
        deviation_deg: deviation_deg(bearing),
        signed_deviation_deg: signed_deviation_deg(bearing),
        aspect_ratio: aspect,
        long_side_m: rect.width,
        confidence: confidence(aspect, hull.len()),
        representative,
        arrow: arrow_endpoint(&representative, bearing, rect.width),
    })
}
