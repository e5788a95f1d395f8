//! Great-circle distance between report locations.

use civicsense_core::GeoPoint;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A coordinate of exactly zero (or NaN) counts as "not supplied".
///
/// Points exactly on the equator or prime meridian are therefore unknown too.
fn is_missing(value: f64) -> bool {
    value == 0.0 || value.is_nan()
}

/// Haversine distance in meters, or `f64::INFINITY` when either location is
/// unknown.
pub fn distance_meters(a: Option<GeoPoint>, b: Option<GeoPoint>) -> f64 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return f64::INFINITY,
    };
    if [a.lon, a.lat, b.lon, b.lat].into_iter().any(is_missing) {
        return f64::INFINITY;
    }

    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    EARTH_RADIUS_M * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}
