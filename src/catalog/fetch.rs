use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;

use crate::catalog::FetchError;

pub const DEFAULT_CATALOG_URL: &str =
    "https://celestrak.org/NORAD/elements/gp.php?GROUP=weather&FORMAT=tle";

const FETCH_TIMEOUT_SECS: u64 = 30;

/// Retrieves the latest catalog text.
pub trait CatalogFetcher {
    fn source(&self) -> &str;
    fn fetch(&self) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    url: String,
    client: Client,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .user_agent(concat!("satpasses/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl CatalogFetcher for HttpFetcher {
    fn source(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<String, FetchError> {
        log::debug!("GET {}", self.url);
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        resp.text().map_err(|e| FetchError::Request(e.to_string()))
    }
}

/// Replace the catalog at `path` with `body`.
///
/// The body goes to a sibling temporary file first and is renamed into place,
/// so readers never see a partially written catalog.
pub fn store_catalog(path: &Path, body: &str) -> Result<(), FetchError> {
    if !looks_like_tle(body) {
        return Err(FetchError::NotTle);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path);
    fs::write(&staging, body)?;
    if let Err(e) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "catalog".to_string());
    path.with_file_name(format!(".{name}.part"))
}

fn looks_like_tle(body: &str) -> bool {
    let mut previous_was_line1 = false;
    for line in body.lines().map(str::trim_start) {
        if previous_was_line1 && line.starts_with("2 ") {
            return true;
        }
        previous_was_line1 = line.starts_with("1 ");
    }
    false
}
