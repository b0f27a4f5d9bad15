//! Scripted propagator for exercising the pass layer without SGP4.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::predict::types::{LookAngle, RawPass, SubSatellitePoint};
use crate::predict::{GroundStation, OrbitSource, PropagationError, Propagator};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

/// A ten minute pass starting `index * 2` hours after [`t0`].
pub fn pass_at(index: i64) -> RawPass {
    let aos = t0() + Duration::hours(2 * index);
    RawPass {
        aos,
        los: aos + Duration::minutes(10),
        max_elevation_time: aos + Duration::minutes(5),
    }
}

struct Culmination {
    pass: RawPass,
    elevation_deg: f64,
    azimuth_deg: f64,
    longitude_deg: f64,
}

/// Answers look-angle queries only at scripted culminations and one minute
/// after them, when the azimuth has dropped by 10 degrees.
#[derive(Default)]
pub struct ScriptedOrbit {
    culminations: Vec<Culmination>,
}

impl ScriptedOrbit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn culminating(
        mut self,
        pass: RawPass,
        elevation_deg: f64,
        azimuth_deg: f64,
        longitude_deg: f64,
    ) -> Self {
        self.culminations.push(Culmination {
            pass,
            elevation_deg,
            azimuth_deg,
            longitude_deg,
        });
        self
    }

    pub fn shared(self) -> Arc<dyn Propagator> {
        Arc::new(self)
    }

    fn at(&self, at: DateTime<Utc>) -> Option<(&Culmination, bool)> {
        self.culminations.iter().find_map(|c| {
            if c.pass.max_elevation_time == at {
                Some((c, false))
            } else if c.pass.max_elevation_time + Duration::minutes(1) == at {
                Some((c, true))
            } else {
                None
            }
        })
    }
}

impl Propagator for ScriptedOrbit {
    fn observer_look(
        &self,
        at: DateTime<Utc>,
        _station: &GroundStation,
    ) -> Result<LookAngle, PropagationError> {
        let (c, later) = self
            .at(at)
            .ok_or_else(|| PropagationError::Propagation(format!("no sample at {at}")))?;
        Ok(if later {
            LookAngle {
                azimuth_deg: (c.azimuth_deg - 10.0).rem_euclid(360.0),
                elevation_deg: c.elevation_deg - 1.0,
                range_km: 1000.0,
            }
        } else {
            LookAngle {
                azimuth_deg: c.azimuth_deg,
                elevation_deg: c.elevation_deg,
                range_km: 1000.0,
            }
        })
    }

    fn sub_satellite_point(&self, at: DateTime<Utc>) -> Result<SubSatellitePoint, PropagationError> {
        let (c, _) = self
            .at(at)
            .ok_or_else(|| PropagationError::Propagation(format!("no sample at {at}")))?;
        Ok(SubSatellitePoint {
            longitude_deg: c.longitude_deg,
            latitude_deg: 0.0,
            altitude_km: 850.0,
        })
    }

    fn enumerate_passes(
        &self,
        start: DateTime<Utc>,
        window: Duration,
        _station: &GroundStation,
    ) -> Result<Vec<RawPass>, PropagationError> {
        Ok(self
            .culminations
            .iter()
            .map(|c| c.pass)
            .filter(|p| p.aos >= start && p.aos < start + window)
            .collect())
    }
}

/// Name-keyed orbits; names mapped to an error fail the lookup with it.
#[derive(Default)]
pub struct ScriptedSource {
    orbits: HashMap<String, Arc<dyn Propagator>>,
    unsupported: Vec<String>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, orbit: ScriptedOrbit) -> Self {
        self.orbits.insert(name.to_string(), orbit.shared());
        self
    }

    pub fn unsupported(mut self, name: &str) -> Self {
        self.unsupported.push(name.to_string());
        self
    }
}

impl OrbitSource for ScriptedSource {
    fn orbit(&self, name: &str) -> Result<Arc<dyn Propagator>, PropagationError> {
        if self.unsupported.iter().any(|n| n == name) {
            return Err(PropagationError::UnsupportedOrbit {
                name: name.to_string(),
                reason: "geosynchronous".into(),
            });
        }
        self.orbits
            .get(name)
            .cloned()
            .ok_or_else(|| PropagationError::UnknownSatellite(name.to_string()))
    }
}
