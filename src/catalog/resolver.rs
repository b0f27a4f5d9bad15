use crate::catalog::{CatalogIndex, ResolveError};

pub const DEFAULT_MATCH_RATIO: f64 = 0.90;
pub const DEFAULT_SUGGEST_RATIO: f64 = 0.75;

/// Acceptance levels for approximate name matches.
///
/// Above `match_ratio` a name is substituted outright (with a notice);
/// above `suggest_ratio` it is only offered as a "did you mean".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub match_ratio: f64,
    pub suggest_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            match_ratio: DEFAULT_MATCH_RATIO,
            suggest_ratio: DEFAULT_SUGGEST_RATIO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Exact(String),
    /// Inexact match that cleared the match threshold.
    Substituted { name: String, ratio: f64 },
}

impl Resolved {
    pub fn name(&self) -> &str {
        match self {
            Resolved::Exact(name) => name,
            Resolved::Substituted { name, .. } => name,
        }
    }
}

/// Map a user query onto a canonical catalog name.
pub fn resolve(
    query: &str,
    index: &CatalogIndex,
    thresholds: &Thresholds,
) -> Result<Resolved, ResolveError> {
    if index.contains(query) {
        return Ok(Resolved::Exact(query.to_string()));
    }

    let query_lower = query.to_lowercase();
    let mut best_ratio = 0.0;
    let mut best: Vec<&str> = Vec::new();
    for name in index.names() {
        let ratio = similarity(&query_lower, &name.to_lowercase());
        if ratio > best_ratio {
            best_ratio = ratio;
            best.clear();
            best.push(name);
        } else if ratio == best_ratio && ratio > 0.0 {
            best.push(name);
        }
    }

    log::debug!("closest match for '{query}': {best:?} ({best_ratio:.3})");

    if best_ratio > thresholds.match_ratio {
        return match best.as_slice() {
            [name] => Ok(Resolved::Substituted {
                name: name.to_string(),
                ratio: best_ratio,
            }),
            _ => Err(ResolveError::Ambiguous {
                query: query.to_string(),
                candidates: best.iter().map(|n| n.to_string()).collect(),
            }),
        };
    }

    match best.first() {
        Some(suggestion) if best_ratio > thresholds.suggest_ratio => {
            Err(ResolveError::NotFoundWithSuggestion {
                query: query.to_string(),
                suggestion: suggestion.to_string(),
            })
        }
        _ => Err(ResolveError::NotFound(query.to_string())),
    }
}

/// Matching-blocks similarity: `2 * M / (len(a) + len(b))` where `M` counts
/// characters in the longest common block and, recursively, in the blocks
/// left and right of it. Identical strings score 1, disjoint ones 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let (i, j, k) = longest_common_block(a, b);
    if k == 0 {
        return 0;
    }
    k + matching_characters(&a[..i], &b[..j]) + matching_characters(&a[i + k..], &b[j + k..])
}

/// Longest common contiguous block as `(start in a, start in b, length)`,
/// earliest in `a` then earliest in `b` on ties.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            let k = cur[j + 1];
            if k > best.2 {
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    best
}
