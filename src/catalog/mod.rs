mod error;
pub mod fetch;
pub mod freshness;
mod index;
mod resolver;

pub use error::{CatalogError, FetchError, ResolveError};
pub use fetch::{HttpFetcher, DEFAULT_CATALOG_URL};
pub use freshness::{refresh, FreshnessPolicy, RefreshOutcome, Trigger};
pub use index::{format_columns, read_catalog, CatalogIndex};
pub use resolver::{resolve, Resolved, Thresholds};
