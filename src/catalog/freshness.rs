use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::catalog::fetch::{store_catalog, CatalogFetcher};
use crate::catalog::FetchError;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Once per program start, before the catalog is read.
    Automatic,
    /// The user asked for an update.
    Explicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Fetch,
    /// Fetch only after the user confirms.
    Confirm,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub confirm_below: Duration,
    pub stale_after: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            confirm_below: 2 * DAY,
            stale_after: 7 * DAY,
        }
    }
}

impl FreshnessPolicy {
    /// `age` is `None` when there is no local catalog.
    ///
    /// A catalog exactly `stale_after` old is stale; one exactly
    /// `confirm_below` old no longer needs confirmation.
    pub fn decide(&self, trigger: Trigger, age: Option<Duration>) -> Decision {
        match (trigger, age) {
            (_, None) => Decision::Fetch,
            (Trigger::Automatic, Some(age)) if age >= self.stale_after => Decision::Fetch,
            (Trigger::Automatic, Some(_)) => Decision::Skip,
            (Trigger::Explicit, Some(age)) if age < self.confirm_below => Decision::Confirm,
            (Trigger::Explicit, Some(_)) => Decision::Fetch,
        }
    }
}

#[derive(Debug)]
pub enum RefreshOutcome {
    Updated,
    /// Local catalog is recent enough.
    Fresh,
    Declined,
    Failed(FetchError),
}

/// Age of the catalog from its modification time, `None` when it is missing.
/// Timestamps in the future count as brand new.
pub fn catalog_age(path: &Path, now: SystemTime) -> Option<Duration> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(now.duration_since(modified).unwrap_or(Duration::ZERO))
}

/// Apply the policy for `trigger` and fetch when it says so. Fetch problems
/// are reported in the outcome, never raised.
pub fn refresh<C>(
    policy: &FreshnessPolicy,
    trigger: Trigger,
    path: &Path,
    fetcher: &dyn CatalogFetcher,
    now: SystemTime,
    confirm: C,
) -> RefreshOutcome
where
    C: FnOnce(Duration) -> bool,
{
    let age = catalog_age(path, now);
    match policy.decide(trigger, age) {
        Decision::Skip => {
            log::debug!("catalog {} is fresh ({:?} old)", path.display(), age);
            return RefreshOutcome::Fresh;
        }
        Decision::Confirm => {
            if !confirm(age.unwrap_or(Duration::ZERO)) {
                log::info!("catalog update declined");
                return RefreshOutcome::Declined;
            }
        }
        Decision::Fetch => {}
    }

    log::info!("downloading latest TLE data from {}", fetcher.source());
    match fetcher.fetch().and_then(|body| store_catalog(path, &body)) {
        Ok(()) => RefreshOutcome::Updated,
        Err(e) => {
            log::warn!("catalog update from {} failed: {}", fetcher.source(), e);
            RefreshOutcome::Failed(e)
        }
    }
}
