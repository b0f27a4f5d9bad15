use std::fmt;

use chrono::{DateTime, Duration, Utc};
use sgp4::{Constants, Elements};

use crate::predict::pass_finder::find_passes;
use crate::predict::propagation::{ecef_to_geodetic, look_angle, teme_to_ecef_position};
use crate::predict::types::{LookAngle, RawPass, SubSatellitePoint};
use crate::predict::{GroundStation, PropagationError};

/// Mean motion band (revolutions per day) treated as geosynchronous.
const GEOSYNC_MEAN_MOTION: std::ops::RangeInclusive<f64> = 0.9..=1.1;

/// Orbital mechanics the pass layer relies on.
pub trait Propagator: Send + Sync {
    fn observer_look(
        &self,
        at: DateTime<Utc>,
        station: &GroundStation,
    ) -> Result<LookAngle, PropagationError>;

    fn sub_satellite_point(&self, at: DateTime<Utc>) -> Result<SubSatellitePoint, PropagationError>;

    fn enumerate_passes(
        &self,
        start: DateTime<Utc>,
        window: Duration,
        station: &GroundStation,
    ) -> Result<Vec<RawPass>, PropagationError>;
}

/// SGP4 propagator for one catalog entry.
pub struct Orbit {
    name: String,
    elements: Elements,
    constants: Constants,
}

impl Orbit {
    pub fn from_tle(name: &str, line1: &str, line2: &str) -> Result<Self, PropagationError> {
        let invalid = |message: String| PropagationError::InvalidTle {
            name: name.to_string(),
            message,
        };

        let elements = Elements::from_tle(
            Some(name.to_string()),
            line1.as_bytes(),
            line2.as_bytes(),
        )
        .map_err(|e| invalid(e.to_string()))?;

        if GEOSYNC_MEAN_MOTION.contains(&elements.mean_motion) {
            return Err(PropagationError::UnsupportedOrbit {
                name: name.to_string(),
                reason: format!(
                    "geosynchronous, {:.3} revolutions per day",
                    elements.mean_motion
                ),
            });
        }

        let constants = Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            elements,
            constants,
        })
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    fn position_ecef_km(&self, at: DateTime<Utc>) -> Result<[f64; 3], PropagationError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&at.naive_utc())
            .map_err(|e| PropagationError::Propagation(e.to_string()))?;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PropagationError::Propagation(e.to_string()))?;

        let sidereal =
            sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&at.naive_utc()));

        Ok(teme_to_ecef_position(prediction.position, sidereal))
    }
}

impl Propagator for Orbit {
    fn observer_look(
        &self,
        at: DateTime<Utc>,
        station: &GroundStation,
    ) -> Result<LookAngle, PropagationError> {
        Ok(look_angle(station, self.position_ecef_km(at)?))
    }

    fn sub_satellite_point(&self, at: DateTime<Utc>) -> Result<SubSatellitePoint, PropagationError> {
        Ok(ecef_to_geodetic(self.position_ecef_km(at)?))
    }

    fn enumerate_passes(
        &self,
        start: DateTime<Utc>,
        window: Duration,
        station: &GroundStation,
    ) -> Result<Vec<RawPass>, PropagationError> {
        find_passes(
            |t| self.observer_look(t, station).map(|look| look.elevation_deg),
            start,
            start + window,
        )
    }
}

impl fmt::Debug for Orbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orbit")
            .field("name", &self.name)
            .field("norad_id", &self.norad_id())
            .finish()
    }
}
