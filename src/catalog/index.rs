use std::fs;
use std::path::Path;

use crate::catalog::CatalogError;

/// Sorted, duplicate-free satellite names of one catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogIndex {
    names: Vec<String>,
}

impl CatalogIndex {
    /// Every line that does not start with a digit is a name line; element
    /// lines always start with their line number.
    pub fn parse(content: &str) -> Self {
        let mut names: Vec<String> = content
            .lines()
            .filter(|line| !line.starts_with(|c: char| c.is_ascii_digit()))
            .map(|line| line.trim())
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    #[cfg(test)]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .is_ok()
    }
}

/// Read the raw catalog text, shared by the index and the orbit store.
pub fn read_catalog(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path).map_err(|source| CatalogError::Unavailable {
        path: path.to_path_buf(),
        source,
    })
}

/// Lay names out in rows separated by three spaces; a row is closed once it
/// grows past `width` characters.
pub fn format_columns(names: &[String], width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut row = String::new();
    for name in names {
        row.push_str(name);
        row.push_str("   ");
        if row.len() > width {
            rows.push(std::mem::take(&mut row));
        }
    }
    rows.push(row);
    rows.iter()
        .map(|row| row.trim_end().to_string())
        .filter(|row| !row.is_empty())
        .collect()
}
