use std::sync::Arc;

use crate::predict::{Orbit, PropagationError, Propagator};

/// Something that can hand out a propagator for a canonical catalog name.
pub trait OrbitSource {
    fn orbit(&self, name: &str) -> Result<Arc<dyn Propagator>, PropagationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TleRecord {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

/// Named TLE records from a catalog file, in file order.
#[derive(Debug, Clone, Default)]
pub struct OrbitStore {
    records: Vec<TleRecord>,
}

impl OrbitStore {
    pub fn parse(content: &str) -> Self {
        Self {
            records: parse_multi_tle(content),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record carrying exactly `name`.
    pub fn record(&self, name: &str) -> Option<&TleRecord> {
        self.records.iter().find(|r| r.name == name)
    }
}

impl OrbitSource for OrbitStore {
    fn orbit(&self, name: &str) -> Result<Arc<dyn Propagator>, PropagationError> {
        let record = self
            .record(name)
            .ok_or_else(|| PropagationError::UnknownSatellite(name.to_string()))?;
        let orbit = Orbit::from_tle(&record.name, &record.line1, &record.line2)?;
        Ok(Arc::new(orbit))
    }
}

/// Parse 3-line TLE content. Unnamed 2-line sets cannot be looked up by name
/// and are skipped.
fn parse_multi_tle(content: &str) -> Vec<TleRecord> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if i + 2 < lines.len()
            && !lines[i].starts_with(|c: char| c.is_ascii_digit())
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            result.push(TleRecord {
                name: lines[i].to_string(),
                line1: lines[i + 1].to_string(),
                line2: lines[i + 2].to_string(),
            });
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}
