//! Great-circle distance between coordinate pairs.
//!
//! Used for nearby-property radius filtering and for annotating search
//! results with their distance from the query point.

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Haversine distance between two points, in meters.
///
/// Non-negative and symmetric; zero when both points coincide.
pub fn distance_m(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAR_ES_SALAAM: Coordinates = Coordinates {
        latitude: -6.7924,
        longitude: 39.2083,
    };
    const DODOMA: Coordinates = Coordinates {
        latitude: -6.1630,
        longitude: 35.7516,
    };
    const ARUSHA: Coordinates = Coordinates {
        latitude: -3.3869,
        longitude: 36.6830,
    };

    #[test]
    fn identical_points_have_zero_distance() {
        assert_eq!(distance_m(DAR_ES_SALAAM, DAR_ES_SALAAM), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = distance_m(DAR_ES_SALAAM, DODOMA);
        let ba = distance_m(DODOMA, DAR_ES_SALAAM);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn distance_is_non_negative() {
        assert!(distance_m(DAR_ES_SALAAM, ARUSHA) > 0.0);
    }

    #[test]
    fn dar_to_dodoma_is_roughly_388_km() {
        let d = distance_m(DAR_ES_SALAAM, DODOMA);
        // Great-circle distance for these coordinates is ~388.3 km.
        assert!((d - 388_270.0).abs() < 1_000.0, "got {d}");
    }

    #[test]
    fn triangle_inequality_holds() {
        let ab = distance_m(DAR_ES_SALAAM, DODOMA);
        let bc = distance_m(DODOMA, ARUSHA);
        let ac = distance_m(DAR_ES_SALAAM, ARUSHA);
        assert!(ab + bc >= ac - 1e-6);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(1.0, 0.0);
        let d = distance_m(a, b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }
}
