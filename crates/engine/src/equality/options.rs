use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::value::{Inspect, Value};

/// A custom equivalence for one dynamic type.
pub type Comparator = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Configuration for structural comparison.
///
/// Options only ever accumulate. Registering a second comparator for a type
/// requires both to agree, and a second float tolerance keeps the tighter
/// one, so adding an option cannot mask a mismatch an earlier option reports.
#[derive(Clone)]
pub struct Options {
    instants: bool,
    float_tolerance: Option<f64>,
    ignored: BTreeSet<String>,
    comparators: BTreeMap<&'static str, Vec<Comparator>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            instants: true,
            float_tolerance: None,
            ignored: BTreeSet::new(),
            comparators: BTreeMap::new(),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("instants", &self.instants)
            .field("float_tolerance", &self.float_tolerance)
            .field("ignored", &self.ignored)
            .field("comparators", &self.comparators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamps must also agree on their UTC offset, not only the instant.
    pub fn exact_timestamps(mut self) -> Self {
        self.instants = false;
        self
    }

    /// Skip a record field, either by bare name (`"updated_at"`) or by full
    /// path from the root (`".order.updated_at"`).
    ///
    /// Bare names only match named fields. Tuple positions (`"0"`, `"1"`)
    /// can only be ignored by full path, such as `".pair.0"`.
    pub fn ignore(mut self, field: impl Into<String>) -> Self {
        self.ignored.insert(field.into());
        self
    }

    /// Floats within `epsilon` of each other are equal.
    pub fn float_tolerance(mut self, epsilon: f64) -> Self {
        let epsilon = epsilon.abs();
        self.float_tolerance = Some(match self.float_tolerance {
            Some(current) => current.min(epsilon),
            None => epsilon,
        });
        self
    }

    /// Compare values of type `T` with `f` instead of structurally.
    ///
    /// The comparator applies to every type that inspects like `T`: a
    /// comparator for `Vec<i32>` also covers arrays and slices of `i32`.
    pub fn compare<T: Inspect + ?Sized>(
        self,
        f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.compare_type(T::type_key(), f)
    }

    /// Compare values whose dynamic type name is `ty` with `f`.
    pub fn compare_type(
        mut self,
        ty: &'static str,
        f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.comparators.entry(ty).or_default().push(Arc::new(f));
        self
    }

    pub(crate) fn instants(&self) -> bool {
        self.instants
    }

    pub(crate) fn ignores(&self, path: &str, name: &str) -> bool {
        let positional = name.bytes().all(|b| b.is_ascii_digit());
        self.ignored.contains(path) || (!positional && self.ignored.contains(name))
    }

    pub(crate) fn comparators_for(&self, ty: &str) -> &[Comparator] {
        self.comparators.get(ty).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn floats_equal(&self, a: f64, b: f64) -> bool {
        match self.float_tolerance {
            Some(epsilon) => a == b || (a - b).abs() <= epsilon,
            None => a == b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tighter_tolerance_wins() {
        let opts = Options::new().float_tolerance(0.5).float_tolerance(0.01);
        assert!(!opts.floats_equal(1.0, 1.1));
        let opts = Options::new().float_tolerance(0.01).float_tolerance(0.5);
        assert!(!opts.floats_equal(1.0, 1.1));
        assert!(opts.floats_equal(1.0, 1.005));
    }

    #[test]
    fn ignores_by_name_or_path() {
        let opts = Options::new().ignore("id").ignore(".order.total");
        assert!(opts.ignores(".user.id", "id"));
        assert!(opts.ignores(".order.total", "total"));
        assert!(!opts.ignores(".invoice.total", "total"));
    }

    #[test]
    fn bare_names_skip_tuple_positions() {
        let opts = Options::new().ignore("0").ignore(".pair.1");
        assert!(!opts.ignores(".pair.0", "0"));
        assert!(opts.ignores(".pair.1", "1"));
    }

    #[test]
    fn comparators_are_keyed_by_inspected_type() {
        let opts = Options::new()
            .compare::<String>(|_, _| true)
            .compare::<Vec<i32>>(|_, _| true)
            .compare::<std::collections::HashMap<u8, u8>>(|_, _| true);
        assert_eq!(opts.comparators_for("str").len(), 1);
        assert_eq!(opts.comparators_for("[i32]").len(), 1);
        assert_eq!(
            opts.comparators_for(std::any::type_name::<BTreeMap<u8, u8>>())
                .len(),
            1
        );
    }

    #[test]
    fn comparators_accumulate() {
        let opts = Options::new()
            .compare::<i32>(|_, _| true)
            .compare::<i32>(|_, _| false);
        assert_eq!(opts.comparators_for("i32").len(), 2);
        assert!(opts.comparators_for("u8").is_empty());
    }
}
