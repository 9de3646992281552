//! Fixed PHC coordinates and distance estimates.
//!
//! There is no live geolocation; destinations come from this table.

use crate::models::Coordinate;

/// Launch site for every mission.
pub const HOSPITAL_LOCATION: Coordinate = Coordinate {
    lat: 19.9260,
    lng: 79.9033,
};

/// PHC used when a request names a center missing from [`PHC_COORDINATES`].
pub const FALLBACK_PHC: &str = "PHC Chamorshi";

pub const PHC_COORDINATES: &[(&str, Coordinate)] = &[
    (
        "PHC Chamorshi",
        Coordinate {
            lat: 19.9280,
            lng: 79.9050,
        },
    ),
    (
        "PHC Gadhchiroli",
        Coordinate {
            lat: 20.1849,
            lng: 79.9948,
        },
    ),
];

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Look up a PHC's coordinate by exact name.
pub fn phc_coordinate(phc: &str) -> Option<Coordinate> {
    PHC_COORDINATES
        .iter()
        .find(|(name, _)| *name == phc)
        .map(|(_, coord)| *coord)
}

/// Mission destination for a PHC, falling back to [`FALLBACK_PHC`].
pub fn destination_for(phc: &str) -> Coordinate {
    phc_coordinate(phc)
        .or_else(|| phc_coordinate(FALLBACK_PHC))
        .unwrap_or(HOSPITAL_LOCATION)
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = lat2 - lat1;
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Distance label from the hospital, e.g. `"29km"`. `None` for unknown PHCs.
pub fn distance_label(phc: &str) -> Option<String> {
    let dest = phc_coordinate(phc)?;
    let km = haversine_km(HOSPITAL_LOCATION, dest).round().max(1.0);
    Some(format!("{km:.0}km"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_phc_falls_back() {
        assert_eq!(destination_for("PHC Nowhere"), destination_for(FALLBACK_PHC));
        assert!(phc_coordinate("PHC Nowhere").is_none());
    }

    #[test]
    fn test_haversine_zero_and_symmetry() {
        let g = phc_coordinate("PHC Gadhchiroli").unwrap();
        assert!(haversine_km(g, g).abs() < 1e-9);
        let d1 = haversine_km(HOSPITAL_LOCATION, g);
        let d2 = haversine_km(g, HOSPITAL_LOCATION);
        assert!((d1 - d2).abs() < 1e-9);
        // Roughly 30 km north-east of the hospital.
        assert!(d1 > 25.0 && d1 < 35.0, "got {d1}");
    }

    #[test]
    fn test_distance_label() {
        assert_eq!(distance_label("PHC Chamorshi").as_deref(), Some("1km"));
        assert!(distance_label("PHC Nowhere").is_none());
    }
}
