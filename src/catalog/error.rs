use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("TLE catalog {} is unavailable: {source} (run `satpasses update` to fetch it)", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("couldn't find satellite '{query}' in the TLE data, did you mean '{suggestion}'?")]
    NotFoundWithSuggestion { query: String, suggestion: String },
    #[error("couldn't find satellite '{0}' in the TLE data")]
    NotFound(String),
    #[error("'{query}' matches several satellites equally well: {}", candidates.join(", "))]
    Ambiguous {
        query: String,
        candidates: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP client error: {0}")]
    Client(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("downloaded data contains no TLE records")]
    NotTle,
    #[error("could not write catalog: {0}")]
    Write(#[from] std::io::Error),
}
