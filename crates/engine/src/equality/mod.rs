//! Strict and structural equality over [`Value`](crate::Value)s.
//!
//! Both modes produce a [`Judgment`]: equal, or not equal together with a
//! [`Diff`] that lists where the two values diverge.

pub mod deep;
pub mod options;
pub mod strict;

use serde::Serialize;
use std::fmt;

pub use deep::deep_equal;
pub use options::{Comparator, Options};
pub use strict::strict_equal;

// ──────────────────────────────────────────────
// Differences
// ──────────────────────────────────────────────

/// A single point of divergence.
///
/// `expected` or `actual` is `None` when that side has nothing at `path`
/// (a missing element, field or map entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Difference {
    pub path: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl Difference {
    pub fn new(path: impl Into<String>, expected: Option<String>, actual: Option<String>) -> Self {
        Self {
            path: path.into(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.expected, &self.actual) {
            (Some(e), Some(a)) => write!(f, "{}: expected {}, got {}", self.path, e, a),
            (Some(e), None) => write!(f, "{}: expected {}, got nothing", self.path, e),
            (None, Some(a)) => write!(f, "{}: unexpected {}", self.path, a),
            (None, None) => write!(f, "{}: values differ", self.path),
        }
    }
}

/// A non-empty, ordered list of differences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diff {
    differences: Vec<Difference>,
}

impl Diff {
    /// Returns `None` for an empty list: an empty diff means equal.
    pub fn new(differences: Vec<Difference>) -> Option<Self> {
        if differences.is_empty() {
            None
        } else {
            Some(Self { differences })
        }
    }

    pub fn differences(&self) -> &[Difference] {
        &self.differences
    }

    pub fn first(&self) -> &Difference {
        &self.differences[0]
    }

    pub fn len(&self) -> usize {
        self.differences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    /// Serialize the diff to a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        let differences: Vec<serde_json::Value> = self
            .differences
            .iter()
            .map(|d| {
                serde_json::json!({
                    "actual": d.actual,
                    "expected": d.expected,
                    "path": d.path,
                })
            })
            .collect();
        serde_json::json!({ "differences": differences })
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Values differ:")?;
        for d in &self.differences {
            write!(f, "\n  {}", d)?;
        }
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Judgment
// ──────────────────────────────────────────────

/// Equal, or not equal with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judgment {
    diff: Option<Diff>,
}

impl Judgment {
    pub fn equal() -> Self {
        Self { diff: None }
    }

    pub fn differs(difference: Difference) -> Self {
        Self::from_differences(vec![difference])
    }

    pub fn from_differences(differences: Vec<Difference>) -> Self {
        Self {
            diff: Diff::new(differences),
        }
    }

    pub fn is_equal(&self) -> bool {
        self.diff.is_none()
    }

    pub fn diff(&self) -> Option<&Diff> {
        self.diff.as_ref()
    }

    pub fn into_diff(self) -> Option<Diff> {
        self.diff
    }
}

/// Path segment rendering shared by the comparators. The root is `.`.
pub(crate) fn display_path(path: &str) -> String {
    if path.is_empty() {
        ".".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_differences_mean_equal() {
        assert!(Judgment::from_differences(Vec::new()).is_equal());
        assert!(Diff::new(Vec::new()).is_none());
    }

    #[test]
    fn diff_renders_one_line_per_difference() {
        let diff = Diff::new(vec![
            Difference::new(".a", Some("1".into()), Some("2".into())),
            Difference::new("[3]", Some("4".into()), None),
            Difference::new(".b", None, Some("true".into())),
        ])
        .unwrap();
        assert_eq!(
            diff.to_string(),
            "Values differ:\n  .a: expected 1, got 2\n  [3]: expected 4, got nothing\n  .b: unexpected true"
        );
    }

    #[test]
    fn diff_to_json() {
        let diff = Diff::new(vec![Difference::new(".a", Some("1".into()), None)]).unwrap();
        assert_eq!(
            diff.to_json(),
            serde_json::json!({
                "differences": [{"path": ".a", "expected": "1", "actual": null}]
            })
        );
    }
}
