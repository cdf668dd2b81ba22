//! ## havsvakt-geometry::polygon
//! **Ray-casting point-in-polygon**
//!
//! Vertices are projected to the plane as (x = longitude, y = latitude). The
//! ring is implicitly closed and may wind either way. A repeated closing
//! vertex is harmless.
//!
//! Points on an edge or vertex count as inside, the same rule circles use
//! for their boundary.
//!
//! Rings crossing the antimeridian are not supported.

use crate::coord::LatLng;

/// Collinearity tolerance, in squared degrees.
const EDGE_EPSILON: f64 = 1e-12;

/// Whether `point` lies inside, or on the boundary of, the ring `vertices`.
///
/// Fewer than three vertices never contain anything.
pub fn contains_polygon(point: LatLng, vertices: &[LatLng]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let (px, py) = point.xy();
    let mut inside = false;
    let mut j = vertices.len() - 1;

    for i in 0..vertices.len() {
        let (xi, yi) = vertices[i].xy();
        let (xj, yj) = vertices[j].xy();

        if on_segment((px, py), (xi, yi), (xj, yj)) {
            return true;
        }

        if (yi > py) != (yj > py) {
            let x_cross = xi + (py - yi) * (xj - xi) / (yj - yi);
            if px < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

fn on_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> bool {
    let cross = (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
    if cross.abs() > EDGE_EPSILON {
        return false;
    }
    let within = |v: f64, lo: f64, hi: f64| v >= lo.min(hi) - EDGE_EPSILON && v <= lo.max(hi) + EDGE_EPSILON;
    within(p.0, a.0, b.0) && within(p.1, a.1, b.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 10.0),
            LatLng::new(10.0, 10.0),
            LatLng::new(10.0, 0.0),
        ]
    }

    #[test]
    fn square_contains_center() {
        assert!(contains_polygon(LatLng::new(5.0, 5.0), &square()));
    }

    #[test]
    fn square_excludes_outside_point() {
        assert!(!contains_polygon(LatLng::new(15.0, 15.0), &square()));
        assert!(!contains_polygon(LatLng::new(-0.5, 5.0), &square()));
    }

    #[test]
    fn edges_and_vertices_are_inside() {
        let ring = square();
        assert!(contains_polygon(LatLng::new(0.0, 5.0), &ring));
        assert!(contains_polygon(LatLng::new(5.0, 10.0), &ring));
        assert!(contains_polygon(LatLng::new(10.0, 10.0), &ring));
        assert!(contains_polygon(LatLng::new(0.0, 0.0), &ring));
    }

    #[test]
    fn winding_order_does_not_matter() {
        let mut ring = square();
        ring.reverse();
        assert!(contains_polygon(LatLng::new(5.0, 5.0), &ring));
        assert!(!contains_polygon(LatLng::new(15.0, 15.0), &ring));
    }

    #[test]
    fn explicit_closing_vertex_is_harmless() {
        let mut ring = square();
        ring.push(ring[0]);
        assert!(contains_polygon(LatLng::new(5.0, 5.0), &ring));
        assert!(!contains_polygon(LatLng::new(15.0, 15.0), &ring));
    }

    #[test]
    fn latitude_and_longitude_are_not_transposed() {
        // Wide, flat strip: latitude 0..1, longitude 0..20.
        let strip = vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 20.0),
            LatLng::new(1.0, 20.0),
            LatLng::new(1.0, 0.0),
        ];
        assert!(contains_polygon(LatLng::new(0.5, 15.0), &strip));
        assert!(!contains_polygon(LatLng::new(15.0, 0.5), &strip));
    }

    #[test]
    fn concave_notch_is_outside() {
        // U shape opening to the north.
        let u = vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 9.0),
            LatLng::new(9.0, 9.0),
            LatLng::new(9.0, 6.0),
            LatLng::new(3.0, 6.0),
            LatLng::new(3.0, 3.0),
            LatLng::new(9.0, 3.0),
            LatLng::new(9.0, 0.0),
        ];
        assert!(!contains_polygon(LatLng::new(6.0, 4.5), &u));
        assert!(contains_polygon(LatLng::new(1.5, 4.5), &u));
        assert!(contains_polygon(LatLng::new(6.0, 1.5), &u));
    }

    #[test]
    fn degenerate_rings_contain_nothing() {
        let line = vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)];
        assert!(!contains_polygon(LatLng::new(0.5, 0.5), &line));
        assert!(!contains_polygon(LatLng::new(0.0, 0.0), &[]));
    }

    proptest! {
        #[test]
        fn rotation_and_reversal_agree(
            lat in -2.0f64..12.0,
            lng in -2.0f64..12.0,
            shift in 0usize..8,
        ) {
            let ring = vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(0.0, 9.0),
                LatLng::new(9.0, 9.0),
                LatLng::new(9.0, 6.0),
                LatLng::new(3.0, 6.0),
                LatLng::new(3.0, 3.0),
                LatLng::new(9.0, 3.0),
                LatLng::new(9.0, 0.0),
            ];
            let p = LatLng::new(lat, lng);
            let expected = contains_polygon(p, &ring);

            let mut rotated = ring.clone();
            rotated.rotate_left(shift % ring.len());
            prop_assert_eq!(contains_polygon(p, &rotated), expected);

            let mut reversed = ring;
            reversed.reverse();
            prop_assert_eq!(contains_polygon(p, &reversed), expected);
        }
    }
}
