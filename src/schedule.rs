use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::catalog::{resolve, CatalogIndex, ResolveError, Resolved, Thresholds};
use crate::predict::{
    classify_and_filter, AnnotatedPass, GroundStation, Hemisphere, OrbitSource, PropagationError,
};

/// Passes of every requested satellite, ordered by AOS.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    passes: Vec<AnnotatedPass>,
}

impl Schedule {
    pub fn passes(&self) -> &[AnnotatedPass] {
        &self.passes
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

/// Concatenate per-satellite passes and sort them by AOS. The sort is stable,
/// so equal AOS keep their per-satellite enumeration order.
pub fn merge<I>(per_satellite: I) -> Schedule
where
    I: IntoIterator<Item = Vec<AnnotatedPass>>,
{
    let mut passes: Vec<AnnotatedPass> = per_satellite.into_iter().flatten().collect();
    passes.sort_by_key(|p| p.aos);
    Schedule { passes }
}

/// Where, when and how strictly to look for passes.
#[derive(Debug, Clone, Copy)]
pub struct PassQuery {
    pub station: GroundStation,
    pub start: DateTime<Utc>,
    pub window: Duration,
    pub elevation_floor: f64,
    pub hemisphere: Option<Hemisphere>,
}

/// What happened to one requested satellite name.
#[derive(Debug)]
pub enum SatelliteOutcome {
    Scheduled {
        query: String,
        resolved: Resolved,
        passes: usize,
    },
    /// Resolved to a satellite that an earlier query already covered.
    Duplicate { query: String, name: String },
    /// The resolver error names the query.
    Unresolved(ResolveError),
    Failed {
        name: String,
        error: PropagationError,
    },
}

#[derive(Debug, Default)]
pub struct Plan {
    pub schedule: Schedule,
    pub outcomes: Vec<SatelliteOutcome>,
}

/// Resolve, propagate, filter and merge every query in turn. A satellite that
/// fails anywhere along the way is recorded and skipped; the rest carry on.
pub fn plan(
    queries: &[String],
    index: &CatalogIndex,
    orbits: &dyn OrbitSource,
    thresholds: &Thresholds,
    request: &PassQuery,
) -> Plan {
    let mut outcomes = Vec::with_capacity(queries.len());
    let mut per_satellite = Vec::with_capacity(queries.len());
    let mut seen = HashSet::new();

    for query in queries {
        let resolved = match resolve(query, index, thresholds) {
            Ok(resolved) => resolved,
            Err(error) => {
                log::info!("skipping '{}': {}", query, error);
                outcomes.push(SatelliteOutcome::Unresolved(error));
                continue;
            }
        };

        let name = resolved.name().to_string();
        if !seen.insert(name.clone()) {
            outcomes.push(SatelliteOutcome::Duplicate {
                query: query.clone(),
                name,
            });
            continue;
        }

        match passes_for(&name, orbits, request) {
            Ok(passes) => {
                log::info!("{}: {} matching passes", name, passes.len());
                outcomes.push(SatelliteOutcome::Scheduled {
                    query: query.clone(),
                    resolved,
                    passes: passes.len(),
                });
                per_satellite.push(passes);
            }
            Err(error) => {
                log::warn!("skipping {}: {}", name, error);
                outcomes.push(SatelliteOutcome::Failed { name, error });
            }
        }
    }

    Plan {
        schedule: merge(per_satellite),
        outcomes,
    }
}

fn passes_for(
    name: &str,
    orbits: &dyn OrbitSource,
    request: &PassQuery,
) -> Result<Vec<AnnotatedPass>, PropagationError> {
    let orbit = orbits.orbit(name)?;
    let raw = orbit.enumerate_passes(request.start, request.window, &request.station)?;
    classify_and_filter(
        &orbit,
        name,
        &raw,
        &request.station,
        request.elevation_floor,
        request.hemisphere,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::testing::{pass_at, t0, ScriptedOrbit, ScriptedSource};

    fn station() -> GroundStation {
        GroundStation::new(48.1, 11.6, 520.0)
    }

    fn request(elevation_floor: f64) -> PassQuery {
        PassQuery {
            station: station(),
            start: t0(),
            window: Duration::hours(24),
            elevation_floor,
            hemisphere: None,
        }
    }

    fn weather() -> CatalogIndex {
        CatalogIndex::from_names(["NOAA 18", "NOAA 19", "METOP-B", "GOES 16"])
    }

    fn source() -> ScriptedSource {
        ScriptedSource::new()
            .with(
                "NOAA 18",
                ScriptedOrbit::new()
                    .culminating(pass_at(1), 30.0, 100.0, 20.0)
                    .culminating(pass_at(6), 5.0, 250.0, 0.0),
            )
            .with(
                "NOAA 19",
                ScriptedOrbit::new()
                    .culminating(pass_at(0), 60.0, 200.0, 9.0)
                    .culminating(pass_at(4), 15.0, 80.0, 14.0),
            )
            .with("METOP-B", ScriptedOrbit::new())
            .unsupported("GOES 16")
    }

    fn queries(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn annotated(satellite: &str, index: i64) -> AnnotatedPass {
        let orbit = ScriptedOrbit::new()
            .culminating(pass_at(index), 20.0, 90.0, 0.0)
            .shared();
        classify_and_filter(&orbit, satellite, &[pass_at(index)], &station(), 0.0, None)
            .unwrap()
            .remove(0)
    }

    #[test]
    fn merge_sorts_by_aos() {
        let schedule = merge(vec![
            vec![annotated("A", 3), annotated("A", 5)],
            vec![],
            vec![annotated("B", 0), annotated("B", 4)],
        ]);
        let aos: Vec<_> = schedule.passes().iter().map(|p| p.aos).collect();
        let mut sorted = aos.clone();
        sorted.sort();
        assert_eq!(aos, sorted);
        assert_eq!(schedule.len(), 4);
    }

    #[test]
    fn merge_is_stable_for_equal_aos() {
        let schedule = merge(vec![vec![annotated("FIRST", 2)], vec![annotated("SECOND", 2)]]);
        let names: Vec<_> = schedule.passes().iter().map(|p| p.satellite.as_str()).collect();
        assert_eq!(names, vec!["FIRST", "SECOND"]);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        assert!(merge(Vec::<Vec<AnnotatedPass>>::new()).is_empty());
        assert!(merge(vec![Vec::<AnnotatedPass>::new(), Vec::new()]).is_empty());
    }

    #[test]
    fn plan_interleaves_satellites() {
        let plan = plan(
            &queries(&["NOAA 18", "NOAA 19"]),
            &weather(),
            &source(),
            &Thresholds::default(),
            &request(10.0),
        );

        let rows: Vec<_> = plan
            .schedule
            .passes()
            .iter()
            .map(|p| (p.satellite.as_str(), p.aos))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("NOAA 19", pass_at(0).aos),
                ("NOAA 18", pass_at(1).aos),
                ("NOAA 19", pass_at(4).aos),
            ]
        );
        assert!(plan
            .schedule
            .passes()
            .iter()
            .all(|p| p.max_elevation_deg >= 10.0));
    }

    #[test]
    fn failures_do_not_abort_the_batch() {
        let plan = plan(
            &queries(&["XYZZY", "GOES 16", "NOAA18", "METOP-B"]),
            &weather(),
            &source(),
            &Thresholds::default(),
            &request(0.0),
        );

        assert_eq!(plan.schedule.len(), 2);
        assert!(matches!(
            &plan.outcomes[0],
            SatelliteOutcome::Unresolved(ResolveError::NotFound(_))
        ));
        assert!(matches!(
            &plan.outcomes[1],
            SatelliteOutcome::Failed {
                error: PropagationError::UnsupportedOrbit { .. },
                ..
            }
        ));
        assert!(matches!(
            &plan.outcomes[2],
            SatelliteOutcome::Scheduled {
                resolved: Resolved::Substituted { .. },
                passes: 2,
                ..
            }
        ));
        assert!(matches!(
            &plan.outcomes[3],
            SatelliteOutcome::Scheduled { passes: 0, .. }
        ));
    }

    #[test]
    fn repeated_satellite_is_scheduled_once() {
        let plan = plan(
            &queries(&["NOAA 19", "noaa 19"]),
            &weather(),
            &source(),
            &Thresholds::default(),
            &request(0.0),
        );
        assert_eq!(plan.schedule.len(), 2);
        assert!(matches!(
            &plan.outcomes[1],
            SatelliteOutcome::Duplicate { name, .. } if name == "NOAA 19"
        ));
    }

    #[test]
    fn hemisphere_filter_applies_across_satellites() {
        let mut west_only = request(0.0);
        west_only.hemisphere = Some(Hemisphere::West);
        let plan = plan(
            &queries(&["NOAA 18", "NOAA 19"]),
            &weather(),
            &source(),
            &Thresholds::default(),
            &west_only,
        );
        assert!(plan
            .schedule
            .passes()
            .iter()
            .all(|p| p.longitude_deg < station().longitude_deg));
        assert_eq!(plan.schedule.len(), 2);
    }

    #[test]
    fn every_satellite_failing_yields_empty_schedule() {
        let plan = plan(
            &queries(&["XYZZY", "GOES 16"]),
            &weather(),
            &source(),
            &Thresholds::default(),
            &request(0.0),
        );
        assert!(plan.schedule.is_empty());
        assert_eq!(plan.outcomes.len(), 2);
    }
}
