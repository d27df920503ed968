use crate::point::{GeoPoint, PlanarPoint};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Local equirectangular projection, accurate over footprint-sized extents.
/// x = (lon - lon0) * cos(lat0) * R, y = (lat - lat0) * R, angles in radians.
pub struct LocalProjection {
    lat0: f64,
    lon0: f64,
    cos_lat0: f64,
}

impl LocalProjection {
    pub fn make(origin: &GeoPoint) -> Self {
        let lat0 = origin.lat.to_radians();
        let lon0 = origin.lon.to_radians();
        Self {
            lat0,
            lon0,
            cos_lat0: lat0.cos(),
        }
    }

    /// Origin at the arithmetic mean of the ring's vertices, which keeps
    /// distortion negligible for geometry spanning tens of meters.
    pub fn centered_on(ring: &[GeoPoint]) -> Self {
        assert!(!ring.is_empty());
        let n = ring.len() as f64;
        let lat = ring.iter().map(|p| p.lat).sum::<f64>() / n;
        let lon = ring.iter().map(|p| p.lon).sum::<f64>() / n;
        Self::make(&GeoPoint::new(lat, lon))
    }

    pub fn project(&self, w: &GeoPoint) -> PlanarPoint {
        let x = (w.lon.to_radians() - self.lon0) * self.cos_lat0 * EARTH_RADIUS_M;
        let y = (w.lat.to_radians() - self.lat0) * EARTH_RADIUS_M;
        PlanarPoint::new(x, y)
    }

    pub fn unproject(&self, p: &PlanarPoint) -> GeoPoint {
        let lat = self.lat0 + p.y / EARTH_RADIUS_M;
        let lon = self.lon0 + p.x / (self.cos_lat0 * EARTH_RADIUS_M);
        GeoPoint::new(lat.to_degrees(), lon.to_degrees())
    }
}
