use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::predict::{GroundStation, PropagationError, Propagator};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngle {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubSatellitePoint {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub altitude_km: f64,
}

/// A candidate pass as enumerated by the propagator, measured from a 0 degree horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPass {
    pub aos: DateTime<Utc>,
    pub los: DateTime<Utc>,
    pub max_elevation_time: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Hemisphere {
    East,
    West,
}

impl Hemisphere {
    /// West when the sub-satellite longitude lies below the station longitude.
    pub fn of(sub_satellite_longitude_deg: f64, station_longitude_deg: f64) -> Self {
        if sub_satellite_longitude_deg < station_longitude_deg {
            Hemisphere::West
        } else {
            Hemisphere::East
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Hemisphere::East => 'E',
            Hemisphere::West => 'W',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum Heading {
    North,
    South,
}

/// A pass that survived filtering, with everything needed to display it.
#[derive(Clone)]
pub struct AnnotatedPass {
    pub satellite: String,
    pub aos: DateTime<Utc>,
    pub los: DateTime<Utc>,
    pub max_elevation_time: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub azimuth_deg: f64,
    pub azimuth_after_deg: f64,
    pub longitude_deg: f64,
    pub heading: Heading,
    pub hemisphere: Hemisphere,
    pub orbit: Arc<dyn Propagator>,
}

impl AnnotatedPass {
    pub fn duration(&self) -> Duration {
        self.los - self.aos
    }

    /// Look angles at any instant, e.g. for pointing an antenna mid-pass.
    pub fn look_at(
        &self,
        at: DateTime<Utc>,
        station: &GroundStation,
    ) -> Result<LookAngle, PropagationError> {
        self.orbit.observer_look(at, station)
    }
}

impl fmt::Debug for AnnotatedPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatedPass")
            .field("satellite", &self.satellite)
            .field("aos", &self.aos)
            .field("los", &self.los)
            .field("max_elevation_time", &self.max_elevation_time)
            .field("max_elevation_deg", &self.max_elevation_deg)
            .field("azimuth_deg", &self.azimuth_deg)
            .field("azimuth_after_deg", &self.azimuth_after_deg)
            .field("heading", &self.heading)
            .field("hemisphere", &self.hemisphere)
            .finish()
    }
}
