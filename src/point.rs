use core::fmt;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wgs(lat: {:.6}, lon: {:.6})", self.lat, self.lon)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for PlanarPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "planar(x: {:.3}, y: {:.3})", self.x, self.y)
    }
}

impl Eq for PlanarPoint {}

impl PartialOrd for PlanarPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PlanarPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare x first, then y (lexicographical order)
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

#[derive(Clone, Debug)]
pub struct GeoBoundingBox {
    pub min: GeoPoint,
    pub max: GeoPoint,
}

impl GeoBoundingBox {
    pub fn from(p1: &GeoPoint, p2: &GeoPoint) -> Self {
        let min = GeoPoint {
            lat: p1.lat.min(p2.lat),
            lon: p1.lon.min(p2.lon),
        };
        let max = GeoPoint {
            lat: p1.lat.max(p2.lat),
            lon: p1.lon.max(p2.lon),
        };
        Self { min, max }
    }
    pub fn contains(&self, w: &GeoPoint) -> bool {
        w.lon >= self.min.lon
            && w.lon <= self.max.lon
            && w.lat >= self.min.lat
            && w.lat <= self.max.lat
    }
}

impl fmt::Display for GeoBoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geobbox(min: {}, max: {})", self.min, self.max)
    }
}
