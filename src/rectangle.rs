use std::f64::consts::{FRAC_PI_2, PI};

use crate::point::PlanarPoint;

/// Minimum-area bounding rectangle of a planar point set. `width` is the long
/// side; `rotation` is the angle of the long side from the +x axis, in [0, PI)
/// since the axis of an undirected shape has no forward end.
#[derive(Clone, Copy, Debug)]
pub struct OrientedRectangle {
    pub center: PlanarPoint,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl OrientedRectangle {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

fn cross(a: &PlanarPoint, b: &PlanarPoint, c: &PlanarPoint) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Convex hull by Andrew's monotone chain, counter-clockwise, extreme points
/// only (collinear points are dropped). Sorting makes the result independent
/// of input order, so winding direction and start vertex cannot leak through.
/// Collinear input collapses to the two extreme points.
pub fn convex_hull(points: &[PlanarPoint]) -> Vec<PlanarPoint> {
    let mut pts = points.to_vec();
    pts.sort();
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }
    let mut lower: Vec<PlanarPoint> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<PlanarPoint> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Swap axes so width >= height and fold the rotation into [0, PI).
fn canonical(width: f64, height: f64, rotation: f64) -> (f64, f64, f64) {
    let (w, h, rot) = if width >= height {
        (width, height, rotation)
    } else {
        (height, width, rotation + FRAC_PI_2)
    };
    let rot = rot.rem_euclid(PI);
    // rem_euclid of a tiny negative value can round up to the modulus itself
    (w, h, if rot >= PI { 0.0 } else { rot })
}

/// Rotating calipers: the minimum-area rectangle has a side flush with a hull
/// edge, so each edge direction is a candidate. Ties on area are broken by the
/// smaller canonical rotation, which keeps repeated runs bit-identical.
pub fn min_area_rect(hull: &[PlanarPoint]) -> Option<OrientedRectangle> {
    if hull.len() < 2 {
        return None;
    }
    if hull.len() == 2 {
        let (a, b) = (hull[0], hull[1]);
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let (_, _, rotation) = canonical((dx * dx + dy * dy).sqrt(), 0.0, dy.atan2(dx));
        return Some(OrientedRectangle {
            center: PlanarPoint::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0),
            width: (dx * dx + dy * dy).sqrt(),
            height: 0.0,
            rotation,
        });
    }

    let n = hull.len();
    let mut best: Option<OrientedRectangle> = None;
    for i in 0..n {
        let j = (i + 1) % n;
        let edge_x = hull[j].x - hull[i].x;
        let edge_y = hull[j].y - hull[i].y;
        let edge_len = (edge_x * edge_x + edge_y * edge_y).sqrt();
        if edge_len == 0.0 {
            continue;
        }
        let ux = edge_x / edge_len;
        let uy = edge_y / edge_len;
        // Perpendicular direction
        let px = -uy;
        let py = ux;

        let mut min_u = f64::MAX;
        let mut max_u = f64::MIN;
        let mut min_p = f64::MAX;
        let mut max_p = f64::MIN;
        for point in hull {
            let rel_x = point.x - hull[i].x;
            let rel_y = point.y - hull[i].y;
            let along = ux * rel_x + uy * rel_y;
            min_u = min_u.min(along);
            max_u = max_u.max(along);
            let across = px * rel_x + py * rel_y;
            min_p = min_p.min(across);
            max_p = max_p.max(across);
        }

        let (width, height, rotation) = canonical(max_u - min_u, max_p - min_p, uy.atan2(ux));
        let center_u = (min_u + max_u) / 2.0;
        let center_p = (min_p + max_p) / 2.0;
        let candidate = OrientedRectangle {
            center: PlanarPoint::new(
                hull[i].x + center_u * ux + center_p * px,
                hull[i].y + center_u * uy + center_p * py,
            ),
            width,
            height,
            rotation,
        };

        best = match best {
            None => Some(candidate),
            Some(current) => {
                let eps = current.area().abs() * 1e-9;
                let better = candidate.area() < current.area() - eps
                    || ((candidate.area() - current.area()).abs() <= eps
                        && candidate.rotation < current.rotation);
                Some(if better { candidate } else { current })
            }
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn pts(coords: &[(f64, f64)]) -> Vec<PlanarPoint> {
        coords.iter().map(|&(x, y)| PlanarPoint::new(x, y)).collect()
    }

    #[test]
    fn test_hull_drops_interior_and_collinear() {
        let points = pts(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (5.0, 0.0), // collinear on the bottom edge
            (10.0, 10.0),
            (0.0, 10.0),
            (5.0, 5.0), // interior
        ]);
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&PlanarPoint::new(5.0, 0.0)));
        assert!(!hull.contains(&PlanarPoint::new(5.0, 5.0)));
    }

    #[test]
    fn test_hull_collinear_collapses_to_extremes() {
        let points = pts(&[(0.0, 0.0), (3.0, 3.0), (1.0, 1.0), (2.0, 2.0)]);
        let hull = convex_hull(&points);
        assert_eq!(hull, pts(&[(0.0, 0.0), (3.0, 3.0)]));
    }

    #[test]
    fn test_axis_aligned_rectangle() {
        let hull = convex_hull(&pts(&[(0.0, 0.0), (20.0, 0.0), (20.0, 10.0), (0.0, 10.0)]));
        let rect = min_area_rect(&hull).unwrap();
        assert!((rect.width - 20.0).abs() < TOL);
        assert!((rect.height - 10.0).abs() < TOL);
        assert!(rect.rotation.abs() < TOL);
        assert!((rect.center.x - 10.0).abs() < TOL);
        assert!((rect.center.y - 5.0).abs() < TOL);
    }

    #[test]
    fn test_tall_rectangle_reports_vertical_axis() {
        let hull = convex_hull(&pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 30.0), (0.0, 30.0)]));
        let rect = min_area_rect(&hull).unwrap();
        assert!((rect.width - 30.0).abs() < TOL);
        assert!((rect.height - 10.0).abs() < TOL);
        assert!((rect.rotation - FRAC_PI_2).abs() < TOL);
    }

    #[test]
    fn test_rotated_rectangle() {
        // 20 x 10 rectangle rotated by 30 degrees around the origin
        let angle = 30f64.to_radians();
        let (c, s) = (angle.cos(), angle.sin());
        let corners = [(0.0, 0.0), (20.0, 0.0), (20.0, 10.0), (0.0, 10.0)];
        let rotated: Vec<PlanarPoint> = corners
            .iter()
            .map(|&(x, y)| PlanarPoint::new(x * c - y * s, x * s + y * c))
            .collect();
        let rect = min_area_rect(&convex_hull(&rotated)).unwrap();
        assert!((rect.width - 20.0).abs() < 1e-6);
        assert!((rect.height - 10.0).abs() < 1e-6);
        assert!((rect.rotation - angle).abs() < 1e-6);
    }

    #[test]
    fn test_square_tie_breaks_to_smaller_rotation() {
        let hull = convex_hull(&pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]));
        let rect = min_area_rect(&hull).unwrap();
        assert!(rect.rotation.abs() < TOL);
        assert!((rect.width - 10.0).abs() < TOL);
        assert!((rect.height - 10.0).abs() < TOL);
    }

    #[test]
    fn test_collinear_degenerate_rectangle() {
        let hull = convex_hull(&pts(&[(0.0, 0.0), (1.0, 1.0), (4.0, 4.0)]));
        let rect = min_area_rect(&hull).unwrap();
        assert_eq!(rect.height, 0.0);
        assert!((rect.width - 32f64.sqrt()).abs() < TOL);
        assert!((rect.rotation - 45f64.to_radians()).abs() < TOL);
        assert!((rect.center.x - 2.0).abs() < TOL);
    }

    #[test]
    fn test_invariant_under_winding_and_start_vertex() {
        let base = pts(&[(0.0, 0.0), (20.0, 2.0), (22.0, 12.0), (2.0, 10.0)]);
        let mut shifted = base.clone();
        shifted.rotate_left(2);
        let mut reversed = base.clone();
        reversed.reverse();

        let a = min_area_rect(&convex_hull(&base)).unwrap();
        let b = min_area_rect(&convex_hull(&shifted)).unwrap();
        let c = min_area_rect(&convex_hull(&reversed)).unwrap();
        for other in [b, c] {
            assert_eq!(a.rotation, other.rotation);
            assert_eq!(a.width, other.width);
            assert_eq!(a.height, other.height);
            assert_eq!(a.center, other.center);
        }
    }

    #[test]
    fn test_redundant_collinear_point_changes_nothing() {
        let plain = pts(&[(0.0, 0.0), (20.0, 0.0), (20.0, 10.0), (0.0, 10.0)]);
        let mut padded = plain.clone();
        padded.insert(1, PlanarPoint::new(12.0, 0.0));
        let a = min_area_rect(&convex_hull(&plain)).unwrap();
        let b = min_area_rect(&convex_hull(&padded)).unwrap();
        assert_eq!(a.rotation, b.rotation);
        assert_eq!(a.width, b.width);
        assert_eq!(a.height, b.height);
        assert_eq!(a.center, b.center);
    }

    #[test]
    fn test_single_point_has_no_rectangle() {
        assert!(min_area_rect(&pts(&[(1.0, 1.0)])).is_none());
    }
}
