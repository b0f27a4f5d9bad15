mod classify;
mod error;
mod ground_station;
mod orbit;
mod pass_finder;
mod propagation;
mod tle_loader;
mod types;

#[cfg(test)]
pub mod testing;

pub use classify::classify_and_filter;
pub use error::PropagationError;
pub use ground_station::GroundStation;
pub use orbit::{Orbit, Propagator};
pub use tle_loader::{OrbitSource, OrbitStore};
pub use types::{AnnotatedPass, Heading, Hemisphere};
