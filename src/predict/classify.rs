use std::sync::Arc;

use chrono::Duration;

use crate::predict::types::{AnnotatedPass, Heading, Hemisphere, RawPass};
use crate::predict::{GroundStation, PropagationError, Propagator};

/// Offset of the second azimuth sample used to tell the direction of travel.
const HEADING_SAMPLE_OFFSET_SECONDS: i64 = 60;

/// Drop passes below `elevation_floor` or outside the requested hemisphere and
/// annotate the rest. Input order is preserved.
pub fn classify_and_filter(
    orbit: &Arc<dyn Propagator>,
    satellite: &str,
    raw_passes: &[RawPass],
    station: &GroundStation,
    elevation_floor: f64,
    hemisphere_filter: Option<Hemisphere>,
) -> Result<Vec<AnnotatedPass>, PropagationError> {
    let mut annotated = Vec::with_capacity(raw_passes.len());

    for pass in raw_passes {
        let culmination = orbit.observer_look(pass.max_elevation_time, station)?;
        if culmination.elevation_deg < elevation_floor {
            log::debug!(
                "{}: dropping pass at {} ({:.1} deg below floor {:.1})",
                satellite,
                pass.aos,
                culmination.elevation_deg,
                elevation_floor
            );
            continue;
        }

        let point = orbit.sub_satellite_point(pass.max_elevation_time)?;
        let hemisphere = Hemisphere::of(point.longitude_deg, station.longitude_deg);
        if hemisphere_filter.is_some_and(|wanted| wanted != hemisphere) {
            continue;
        }

        let later = pass.max_elevation_time + Duration::seconds(HEADING_SAMPLE_OFFSET_SECONDS);
        let after = orbit.observer_look(later, station)?;

        annotated.push(AnnotatedPass {
            satellite: satellite.to_string(),
            aos: pass.aos,
            los: pass.los,
            max_elevation_time: pass.max_elevation_time,
            max_elevation_deg: culmination.elevation_deg,
            azimuth_deg: culmination.azimuth_deg,
            azimuth_after_deg: after.azimuth_deg,
            longitude_deg: point.longitude_deg,
            heading: heading(culmination.azimuth_deg, after.azimuth_deg),
            hemisphere,
            orbit: Arc::clone(orbit),
        });
    }

    Ok(annotated)
}

/// Direction of travel from two azimuth samples taken a minute apart.
///
/// A falling azimuth means southbound on the western half of the sky and
/// northbound on the eastern half. Unreliable across the 0/360 wrap and for
/// culminations near azimuth 180.
pub fn heading(az0: f64, az1: f64) -> Heading {
    let mut southbound = az0 > az1;
    if az0 < 180.0 {
        southbound = !southbound;
    }
    if southbound {
        Heading::South
    } else {
        Heading::North
    }
}
