use crate::predict::ground_station::{EARTH_ECCENTRICITY_SQ, EARTH_EQUATORIAL_RADIUS_KM};
use crate::predict::types::{LookAngle, SubSatellitePoint};
use crate::predict::GroundStation;

/// Azimuth/elevation of a satellite ECEF position as seen from `station`.
pub fn look_angle(station: &GroundStation, sat_ecef: [f64; 3]) -> LookAngle {
    let sta_ecef = station.position_ecef_km();
    let dr = [
        sat_ecef[0] - sta_ecef[0],
        sat_ecef[1] - sta_ecef[1],
        sat_ecef[2] - sta_ecef[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

    let (east, north, up) = ecef_to_enu(dr, station.lat_rad(), station.lon_rad());
    let azimuth = east.atan2(north).to_degrees().rem_euclid(360.0);
    let elevation = if range_km > 0.0 {
        (up / range_km).asin().to_degrees()
    } else {
        0.0
    };

    LookAngle {
        azimuth_deg: azimuth,
        elevation_deg: elevation,
        range_km,
    }
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

/// Geodetic point below an ECEF position (WGS-84, iterative latitude).
pub fn ecef_to_geodetic(pos: [f64; 3]) -> SubSatellitePoint {
    let [x, y, z] = pos;
    let p = (x * x + y * y).sqrt();
    let lon = y.atan2(x);

    let mut lat = z.atan2(p * (1.0 - EARTH_ECCENTRICITY_SQ));
    let mut n = EARTH_EQUATORIAL_RADIUS_KM;
    for _ in 0..8 {
        let sin_lat = lat.sin();
        n = EARTH_EQUATORIAL_RADIUS_KM / (1.0 - EARTH_ECCENTRICITY_SQ * sin_lat * sin_lat).sqrt();
        lat = (z + EARTH_ECCENTRICITY_SQ * n * sin_lat).atan2(p);
    }

    let altitude_km = if lat.cos().abs() > 1e-9 {
        p / lat.cos() - n
    } else {
        z.abs() - n * (1.0 - EARTH_ECCENTRICITY_SQ)
    };

    SubSatellitePoint {
        longitude_deg: lon.to_degrees(),
        latitude_deg: lat.to_degrees(),
        altitude_km,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overhead_satellite_is_at_zenith() {
        let station = GroundStation::new(45.0, 10.0, 0.0);
        let above = GroundStation::new(45.0, 10.0, 800_000.0).position_ecef_km();
        let look = look_angle(&station, above);
        assert!((look.elevation_deg - 90.0).abs() < 1e-4);
        assert!((look.range_km - 800.0).abs() < 1e-6);
    }

    #[test]
    fn satellite_due_north_has_zero_azimuth() {
        let station = GroundStation::new(0.0, 0.0, 0.0);
        let north = GroundStation::new(10.0, 0.0, 800_000.0).position_ecef_km();
        let look = look_angle(&station, north);
        assert!(look.azimuth_deg < 1e-6 || look.azimuth_deg > 360.0 - 1e-6);
        assert!(look.elevation_deg > 0.0);
    }

    #[test]
    fn satellite_due_east_has_azimuth_ninety() {
        let station = GroundStation::new(0.0, 0.0, 0.0);
        let east = GroundStation::new(0.0, 10.0, 800_000.0).position_ecef_km();
        let look = look_angle(&station, east);
        assert!((look.azimuth_deg - 90.0).abs() < 1e-6);
    }

    #[test]
    fn geodetic_round_trip_recovers_station() {
        let station = GroundStation::new(-33.9, 151.2, 850_000.0);
        let point = ecef_to_geodetic(station.position_ecef_km());
        assert!((point.latitude_deg - -33.9).abs() < 1e-6);
        assert!((point.longitude_deg - 151.2).abs() < 1e-6);
        assert!((point.altitude_km - 850.0).abs() < 1e-3);
    }

    #[test]
    fn gmst_rotation_preserves_radius() {
        let pos = [7000.0, 0.0, 100.0];
        let rotated = teme_to_ecef_position(pos, 1.0);
        let r0 = (pos[0] * pos[0] + pos[1] * pos[1]).sqrt();
        let r1 = (rotated[0] * rotated[0] + rotated[1] * rotated[1]).sqrt();
        assert!((r0 - r1).abs() < 1e-9);
        assert_eq!(rotated[2], 100.0);
    }
}
