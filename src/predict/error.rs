use thiserror::Error;

/// Failures reported by the orbit propagation layer.
///
/// Callers treat every variant as a per-satellite failure: a batch of
/// satellites keeps going when one of them ends up here.
#[derive(Debug, Error)]
pub enum PropagationError {
    #[error("satellite '{0}' is not in the TLE data")]
    UnknownSatellite(String),
    #[error("satellite '{name}' has an unsupported orbit ({reason})")]
    UnsupportedOrbit { name: String, reason: String },
    #[error("invalid TLE for '{name}': {message}")]
    InvalidTle { name: String, message: String },
    #[error("propagation error: {0}")]
    Propagation(String),
}
