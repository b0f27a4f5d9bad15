use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::predict::{AnnotatedPass, GroundStation, Heading, Hemisphere};
use crate::report::duration::{format_duration, format_relative};
use crate::schedule::Schedule;

/// Serializable view of one scheduled pass.
#[derive(Debug, Clone, Serialize)]
pub struct PassSummary {
    pub satellite: String,
    pub aos: DateTime<Utc>,
    pub los: DateTime<Utc>,
    pub max_elevation_time: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub azimuth_deg: f64,
    pub azimuth_after_deg: f64,
    pub los_azimuth_deg: Option<f64>,
    pub longitude_deg: f64,
    pub heading: Heading,
    pub hemisphere: Hemisphere,
    pub duration_seconds: i64,
}

impl PassSummary {
    pub fn from_pass(pass: &AnnotatedPass, station: &GroundStation) -> Self {
        let los_azimuth_deg = match pass.look_at(pass.los, station) {
            Ok(look) => Some(round2(look.azimuth_deg)),
            Err(e) => {
                log::debug!("{}: no look angle at LOS: {}", pass.satellite, e);
                None
            }
        };

        Self {
            satellite: pass.satellite.clone(),
            aos: pass.aos,
            los: pass.los,
            max_elevation_time: pass.max_elevation_time,
            max_elevation_deg: round2(pass.max_elevation_deg),
            azimuth_deg: round2(pass.azimuth_deg),
            azimuth_after_deg: round2(pass.azimuth_after_deg),
            los_azimuth_deg,
            longitude_deg: round2(pass.longitude_deg),
            heading: pass.heading,
            hemisphere: pass.hemisphere,
            duration_seconds: pass.duration().num_seconds(),
        }
    }
}

pub fn render_json(schedule: &Schedule, station: &GroundStation) -> serde_json::Result<String> {
    let summaries: Vec<PassSummary> = schedule
        .passes()
        .iter()
        .map(|p| PassSummary::from_pass(p, station))
        .collect();
    serde_json::to_string_pretty(&summaries)
}

/// One numbered line per pass, AOS shown in `tz`.
pub fn render_text<Tz>(schedule: &Schedule, now: DateTime<Utc>, tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    schedule
        .passes()
        .iter()
        .enumerate()
        .map(|(i, pass)| pass_line(i + 1, pass, now, tz))
        .collect()
}

fn pass_line<Tz>(number: usize, pass: &AnnotatedPass, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let longitude = pass.longitude_deg.round();
    let long_side = if longitude > 0.0 { 'E' } else { 'W' };
    format!(
        "{}) {} - {} - {}{} degree MEL pass ({}{} Long) heading {} {} - duration {}",
        number,
        pass.aos.with_timezone(tz).format("%Y-%m-%d %H:%M:%S"),
        pass.satellite,
        pass.max_elevation_deg.round(),
        pass.hemisphere.letter(),
        longitude.abs(),
        long_side,
        pass.heading,
        format_relative((pass.aos - now).num_seconds()),
        format_duration(pass.duration().num_seconds()),
    )
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::classify_and_filter;
    use crate::predict::testing::{pass_at, t0, ScriptedOrbit};
    use crate::schedule::merge;
    use chrono::Duration;

    fn station() -> GroundStation {
        GroundStation::new(40.0, -3.7, 650.0)
    }

    fn schedule() -> Schedule {
        let orbit = ScriptedOrbit::new()
            .culminating(pass_at(1), 47.6, 120.0, -20.4)
            .culminating(pass_at(2), 12.2, 300.0, 2.0)
            .shared();
        let passes = classify_and_filter(
            &orbit,
            "NOAA 19",
            &[pass_at(1), pass_at(2)],
            &station(),
            0.0,
            None,
        )
        .unwrap();
        merge(vec![passes])
    }

    #[test]
    fn text_line_layout() {
        let lines = render_text(&schedule(), t0(), &Utc);
        assert_eq!(
            lines[0],
            "1) 2024-06-01 02:00:00 - NOAA 19 - 48W degree MEL pass (20W Long) heading North in 2 hours - duration 10 minutes"
        );
        assert_eq!(
            lines[1],
            "2) 2024-06-01 04:00:00 - NOAA 19 - 12E degree MEL pass (2E Long) heading South in 4 hours - duration 10 minutes"
        );
    }

    #[test]
    fn pass_in_progress_reads_as_started() {
        let now = pass_at(1).aos + Duration::minutes(3);
        let lines = render_text(&schedule(), now, &Utc);
        assert!(lines[0].contains("heading North started 3 minutes ago"));
    }

    #[test]
    fn json_summary_fields() {
        let json = render_json(&schedule(), &station()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value[0];
        assert_eq!(first["satellite"], "NOAA 19");
        assert_eq!(first["heading"], "north");
        assert_eq!(first["hemisphere"], "west");
        assert_eq!(first["duration_seconds"], 600);
        assert_eq!(first["max_elevation_deg"], 47.6);
        assert_eq!(first["azimuth_after_deg"], 110.0);
        // the scripted orbit has no sample at LOS
        assert!(first["los_azimuth_deg"].is_null());
    }
}
