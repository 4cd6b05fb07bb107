//! Great-circle distance helpers.

use super::Coordinates;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometres.
///
/// ```
/// use waypoint::domain::{Coordinates, geo::haversine_km};
///
/// let saigon = Coordinates::try_new(10.7769, 106.7009).expect("valid");
/// let vung_tau = Coordinates::try_new(10.3460, 107.0843).expect("valid");
/// let km = haversine_km(saigon, vung_tau);
/// assert!((62.0..66.0).contains(&km));
/// ```
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let d_lat = (to.latitude() - from.latitude()).to_radians();
    let d_lng = (to.longitude() - from.longitude()).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Haversine distance in metres.
pub fn haversine_m(from: Coordinates, to: Coordinates) -> f64 {
    haversine_km(from, to) * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn point(lat: f64, lng: f64) -> Coordinates {
        Coordinates::try_new(lat, lng).expect("valid coordinates")
    }

    #[rstest]
    fn distance_to_self_is_zero() {
        let p = point(10.0, 106.0);
        assert!(haversine_km(p, p).abs() < 1e-9);
    }

    #[rstest]
    fn distance_is_symmetric() {
        let a = point(10.0, 106.0);
        let b = point(11.0, 107.0);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[rstest]
    fn one_degree_of_latitude_is_about_111_km() {
        let km = haversine_km(point(0.0, 0.0), point(1.0, 0.0));
        assert!((km - 111.19).abs() < 0.1, "got {km}");
    }

    #[rstest]
    fn metres_scale_kilometres() {
        let a = point(0.0, 0.0);
        let b = point(0.0, 0.001);
        assert!((haversine_m(a, b) - haversine_km(a, b) * 1000.0).abs() < 1e-9);
    }
}
