//! ## havsvakt-geometry::circle
//! **Great-circle containment**
//!
//! Distances use the Haversine formula on a spherical Earth. The error
//! against the WGS84 ellipsoid is well under 0.5%, far below AIS position
//! noise for harbour-sized geofences.

use crate::coord::LatLng;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Slack applied at the circle boundary so a point computed to be exactly
/// `radius` away is not lost to rounding (one micrometre).
const BOUNDARY_EPSILON_KM: f64 = 1e-9;

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(a: LatLng, b: LatLng) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = lat2 - lat1;
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Whether `point` lies within `radius_meters` of `center`. The boundary is
/// inside.
pub fn contains_circle(point: LatLng, center: LatLng, radius_meters: f64) -> bool {
    let radius_km = radius_meters / 1000.0;
    haversine_km(center, point) <= radius_km + BOUNDARY_EPSILON_KM
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = haversine_km(LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0));
        let expected = 111.19;
        assert!((d - expected).abs() / expected < 0.001, "got {d}");
    }

    #[test]
    fn longitude_shrinks_with_latitude() {
        // A degree of longitude at 60° N spans half a degree of latitude.
        let east = haversine_km(LatLng::new(60.0, 0.0), LatLng::new(60.0, 1.0));
        let north = haversine_km(LatLng::new(0.0, 60.0), LatLng::new(1.0, 60.0));
        assert!((east - 55.6).abs() < 0.1, "got {east}");
        assert!((north - 111.19).abs() < 0.1, "got {north}");
    }

    #[test]
    fn zero_distance_to_self() {
        let p = LatLng::new(59.3293, 18.0686);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn point_on_boundary_is_inside() {
        let center = LatLng::new(10.0, 10.0);
        let point = LatLng::new(10.0012, 10.0007);
        let radius_meters = haversine_km(center, point) * 1000.0;
        assert!(contains_circle(point, center, radius_meters));
        assert!(!contains_circle(point, center, radius_meters - 0.01));
    }

    #[test]
    fn harbour_scenario() {
        // ~55.6 m north of the centre.
        let center = LatLng::new(10.0, 10.0);
        let vessel = LatLng::new(10.0005, 10.0);
        let meters = haversine_km(center, vessel) * 1000.0;
        assert!((meters - 55.6).abs() < 0.5, "got {meters}");
        assert!(contains_circle(vessel, center, 100.0));
        assert!(!contains_circle(vessel, center, 50.0));
    }

    proptest! {
        #[test]
        fn center_is_always_inside(
            lat in -89.0f64..89.0,
            lng in -179.0f64..179.0,
            radius in 0.001f64..100_000.0,
        ) {
            let c = LatLng::new(lat, lng);
            prop_assert!(contains_circle(c, c, radius));
        }

        #[test]
        fn distance_is_symmetric(
            a_lat in -89.0f64..89.0, a_lng in -179.0f64..179.0,
            b_lat in -89.0f64..89.0, b_lng in -179.0f64..179.0,
        ) {
            let a = LatLng::new(a_lat, a_lng);
            let b = LatLng::new(b_lat, b_lng);
            prop_assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-6);
        }
    }
}
