use chrono::{DateTime, Duration, Utc};

use crate::predict::error::PropagationError;
use crate::predict::types::RawPass;

const COARSE_STEP_SECONDS: i64 = 60; // 1 minute for initial scan
const FINE_STEP_SECONDS: i64 = 1; // 1 second for refinement
const HORIZON_ELEVATION: f64 = 0.0;
// A pass still in progress at the end of the window is followed this far at most
const MAX_OVERRUN_HOURS: i64 = 24;

/// Find every pass above the horizon that starts before `end`.
///
/// `elevation_at` returns the elevation in degrees at a given instant. A pass
/// already in progress at `start` is reported with `aos == start`; one still
/// in progress at `end` is followed until it sets.
pub fn find_passes<F>(
    elevation_at: F,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<RawPass>, PropagationError>
where
    F: Fn(DateTime<Utc>) -> Result<f64, PropagationError>,
{
    let mut passes = Vec::new();
    let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);
    let overrun_limit = end + Duration::hours(MAX_OVERRUN_HOURS);

    let mut cursor = start;
    let mut elevation = elevation_at(cursor)?;
    let mut pass_start = (elevation >= HORIZON_ELEVATION).then_some(start);
    let mut max_el = elevation;
    let mut max_el_time = cursor;

    loop {
        let mut next = cursor + coarse_step;
        if next > end && pass_start.is_none() {
            if cursor >= end {
                break;
            }
            // windows that are not whole minutes still get their last instant sampled
            next = end;
        }
        if next > overrun_limit {
            // Never set within reach, close the pass at the last sample
            if let Some(aos) = pass_start {
                let tca = refine_maximum(&elevation_at, max_el_time, aos, cursor)?;
                passes.push(RawPass {
                    aos,
                    los: cursor,
                    max_elevation_time: tca,
                });
            }
            break;
        }

        let next_elevation = elevation_at(next)?;
        let visible = next_elevation >= HORIZON_ELEVATION;

        match pass_start {
            None if visible => {
                let aos = refine_crossing(&elevation_at, cursor, next, true)?;
                pass_start = Some(aos);
                max_el = next_elevation;
                max_el_time = next;
            }
            Some(_) if visible => {
                if next_elevation > max_el {
                    max_el = next_elevation;
                    max_el_time = next;
                }
            }
            Some(aos) => {
                let los = refine_crossing(&elevation_at, cursor, next, false)?;
                let tca = refine_maximum(&elevation_at, max_el_time, aos, los)?;
                passes.push(RawPass {
                    aos,
                    los,
                    max_elevation_time: tca,
                });
                pass_start = None;
            }
            None => {}
        }

        cursor = next;
        elevation = next_elevation;
    }

    log::debug!(
        "found {} passes between {} and {} (last elevation {:.1})",
        passes.len(),
        start,
        end,
        elevation
    );

    Ok(passes)
}

/// Binary search to find exact horizon crossing time
fn refine_crossing<F>(
    elevation_at: &F,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    rising: bool,
) -> Result<DateTime<Utc>, PropagationError>
where
    F: Fn(DateTime<Utc>) -> Result<f64, PropagationError>,
{
    let mut low = before;
    let mut high = after;

    while (high - low).num_seconds() > FINE_STEP_SECONDS {
        let mid = low + (high - low) / 2;
        let above = elevation_at(mid)? >= HORIZON_ELEVATION;
        if above == rising {
            high = mid;
        } else {
            low = mid;
        }
    }

    // AOS is the first instant above the horizon, LOS the last one
    Ok(if rising { high } else { low })
}

/// Ternary search for the culmination around the best coarse sample.
fn refine_maximum<F>(
    elevation_at: &F,
    coarse: DateTime<Utc>,
    aos: DateTime<Utc>,
    los: DateTime<Utc>,
) -> Result<DateTime<Utc>, PropagationError>
where
    F: Fn(DateTime<Utc>) -> Result<f64, PropagationError>,
{
    let step = Duration::seconds(COARSE_STEP_SECONDS);
    let mut low = (coarse - step).max(aos);
    let mut high = (coarse + step).min(los);
    if high < low {
        return Ok(aos);
    }

    while (high - low).num_seconds() > 2 * FINE_STEP_SECONDS {
        let third = (high - low) / 3;
        let m1 = low + third;
        let m2 = high - third;
        if elevation_at(m1)? < elevation_at(m2)? {
            low = m1;
        } else {
            high = m2;
        }
    }

    let mut best = low;
    let mut best_el = elevation_at(low)?;
    let mut t = low + Duration::seconds(FINE_STEP_SECONDS);
    while t <= high {
        let el = elevation_at(t)?;
        if el > best_el {
            best = t;
            best_el = el;
        }
        t += Duration::seconds(FINE_STEP_SECONDS);
    }

    Ok(best)
}
