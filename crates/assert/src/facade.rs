//! The assertion facade bound to one test.

use std::fmt;
use std::panic::Location;

use verity_engine::{
    contains, deep_equal, inspect, is_absent, same_elements, strict_equal, Inspect, Options,
    UsageError, Value,
};

use crate::config::Config;
use crate::context::{HostError, TestContext};
use crate::log;
use crate::report::Reporter;

/// Assertions bound to a test context.
///
/// A failed predicate reports through the context and returns `false`; the
/// test keeps running.
///
/// ```
/// use verity_assert::{Assert, Recorder};
///
/// let t = Recorder::new();
/// let a = Assert::new(&t);
///
/// assert!(a.eq(&3, &3));
/// assert!(!a.with("after retry").eq(&3, &4));
///
/// let failure = t.last().unwrap();
/// assert_eq!(failure.label, "Expected 3, but got 4");
/// assert!(failure.message.contains("after retry"));
/// ```
pub struct Assert<'t, C: TestContext + ?Sized> {
    ctx: &'t C,
    reporter: Reporter,
    context: Option<String>,
    options: Options,
}

impl<C: TestContext + ?Sized> Clone for Assert<'_, C> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx,
            reporter: self.reporter,
            context: self.context.clone(),
            options: self.options.clone(),
        }
    }
}

impl<C: TestContext + ?Sized> fmt::Debug for Assert<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assert")
            .field("reporter", &self.reporter)
            .field("context", &self.context)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'t, C: TestContext + ?Sized> Assert<'t, C> {
    /// Binds to `ctx`, reading [`Config`] from the environment.
    pub fn new(ctx: &'t C) -> Self {
        let config = Config::from_env().unwrap_or_else(|e| {
            let fallback = Config::default();
            log::warn(fallback.log, &format!("{}; using defaults", e));
            fallback
        });
        Self::with_config(ctx, config)
    }

    pub fn with_config(ctx: &'t C, config: Config) -> Self {
        log::debug(config.log, &format!("assertions bound with {:?}", config));
        Self {
            ctx,
            reporter: Reporter::new(config),
            context: None,
            options: Options::default(),
        }
    }

    /// A copy whose failures carry `msg` after the predicate's own message.
    ///
    /// ```
    /// # use verity_assert::{Assert, Recorder};
    /// # let t = Recorder::new();
    /// # let a = Assert::new(&t);
    /// let id = 42;
    /// a.with(format_args!("order {}", id)).is_true(false);
    /// assert!(t.last().unwrap().message.contains("order 42"));
    /// ```
    pub fn with(&self, msg: impl fmt::Display) -> Self {
        Self {
            context: Some(msg.to_string()),
            ..self.clone()
        }
    }

    /// A copy whose structural comparisons use `options`.
    pub fn with_options(&self, options: Options) -> Self {
        Self {
            options,
            ..self.clone()
        }
    }

    /// Registers teardown work with the test context.
    pub fn cleanup(&self, f: impl FnOnce() + 'static) -> Result<(), HostError> {
        self.ctx.cleanup(Box::new(f))
    }

    // ──────────────────────────────────────────────
    // Booleans
    // ──────────────────────────────────────────────

    /// Fails with a generic message unless `ok` holds.
    #[track_caller]
    pub fn ok(&self, ok: bool) -> bool {
        let location = self.enter();
        self.check(ok, location, || "Assertion failed".to_string(), None)
    }

    #[track_caller]
    pub fn is_true(&self, actual: bool) -> bool {
        let location = self.enter();
        self.check(
            actual,
            location,
            || "Should be true, but it isn't".to_string(),
            None,
        )
    }

    #[track_caller]
    pub fn is_false(&self, actual: bool) -> bool {
        let location = self.enter();
        self.check(
            !actual,
            location,
            || "Should be false, but it isn't".to_string(),
            None,
        )
    }

    // ──────────────────────────────────────────────
    // Absence
    // ──────────────────────────────────────────────

    /// Passes for absent values: `None`, and nullable kinds without storage.
    #[track_caller]
    pub fn nil<T: Inspect + ?Sized>(&self, actual: &T) -> bool {
        let location = self.enter();
        let actual = inspect(actual);
        self.check(
            is_absent(&actual),
            location,
            || format!("Should be nil, but got {}", actual),
            None,
        )
    }

    #[track_caller]
    pub fn not_nil<T: Inspect + ?Sized>(&self, actual: &T) -> bool {
        let location = self.enter();
        let actual = inspect(actual);
        self.check(
            !is_absent(&actual),
            location,
            || "Should not be nil, but it is".to_string(),
            None,
        )
    }

    // ──────────────────────────────────────────────
    // Results
    // ──────────────────────────────────────────────

    #[track_caller]
    pub fn error<T, E>(&self, result: &Result<T, E>) -> bool {
        let location = self.enter();
        self.check(
            result.is_err(),
            location,
            || "Expected an error, but got nil".to_string(),
            None,
        )
    }

    #[track_caller]
    pub fn no_error<T, E: fmt::Debug>(&self, result: &Result<T, E>) -> bool {
        let location = self.enter();
        match result {
            Ok(_) => true,
            Err(e) => self.check(
                false,
                location,
                || format!("Expected no error, but got {:?}", e),
                None,
            ),
        }
    }

    // ──────────────────────────────────────────────
    // Strict comparisons
    // ──────────────────────────────────────────────

    /// Strict equality: same type and intrinsically equal.
    ///
    /// References compare by identity. Values without an intrinsic equality
    /// (sequences, maps, functions) are a usage error; use
    /// [`deep_eq`](Self::deep_eq) for those.
    #[track_caller]
    pub fn eq<E, A>(&self, expected: &E, actual: &A) -> bool
    where
        E: Inspect + ?Sized,
        A: Inspect + ?Sized,
    {
        let location = self.enter();
        let (expected, actual) = (inspect(expected), inspect(actual));
        match strict_equal(&expected, &actual) {
            Ok(judgment) => self.check(
                judgment.is_equal(),
                location,
                || mismatch(&expected, &actual),
                None,
            ),
            Err(e) => self.misuse(location, "eq", e),
        }
    }

    #[track_caller]
    pub fn ne<E, A>(&self, expected: &E, actual: &A) -> bool
    where
        E: Inspect + ?Sized,
        A: Inspect + ?Sized,
    {
        let location = self.enter();
        let (expected, actual) = (inspect(expected), inspect(actual));
        match strict_equal(&expected, &actual) {
            Ok(judgment) => self.check(
                !judgment.is_equal(),
                location,
                || format!("Should not be {}, but it is", expected),
                None,
            ),
            Err(e) => self.misuse(location, "ne", e),
        }
    }

    // ──────────────────────────────────────────────
    // Sequences
    // ──────────────────────────────────────────────

    /// Passes if `list` holds an element strictly equal to `needle`.
    #[track_caller]
    pub fn contains<N, L>(&self, needle: &N, list: &L) -> bool
    where
        N: Inspect + ?Sized,
        L: Inspect + ?Sized,
    {
        let location = self.enter();
        let (needle, list) = (inspect(needle), inspect(list));
        match contains(&needle, &list) {
            Ok(found) => self.check(
                found,
                location,
                || format!("Expected {} to be in {}, but it isn't", needle, list),
                None,
            ),
            Err(e) => self.misuse(location, "contains", e),
        }
    }

    /// Passes if both sequences hold the same elements, in any order.
    #[track_caller]
    pub fn same_elements<E, A>(&self, expected: &E, actual: &A) -> bool
    where
        E: Inspect + ?Sized,
        A: Inspect + ?Sized,
    {
        let location = self.enter();
        let (expected, actual) = (inspect(expected), inspect(actual));
        match same_elements(&expected, &actual) {
            Ok(judgment) => {
                let detail = judgment.diff().map(|d| d.to_string());
                self.check(
                    judgment.is_equal(),
                    location,
                    || {
                        format!(
                            "Expected elements of {} to match {}, but they don't",
                            expected, actual
                        )
                    },
                    detail.as_deref(),
                )
            }
            Err(e) => self.misuse(location, "same_elements", e),
        }
    }

    // ──────────────────────────────────────────────
    // Structural comparisons
    // ──────────────────────────────────────────────

    /// Structural equality with this facade's options.
    #[track_caller]
    pub fn deep_eq<E, A>(&self, expected: &E, actual: &A) -> bool
    where
        E: Inspect + ?Sized,
        A: Inspect + ?Sized,
    {
        let location = self.enter();
        self.deep(location, &inspect(expected), &inspect(actual), &self.options)
    }

    #[track_caller]
    pub fn deep_eq_with<E, A>(&self, expected: &E, actual: &A, options: &Options) -> bool
    where
        E: Inspect + ?Sized,
        A: Inspect + ?Sized,
    {
        let location = self.enter();
        self.deep(location, &inspect(expected), &inspect(actual), options)
    }

    #[track_caller]
    pub fn deep_ne<E, A>(&self, expected: &E, actual: &A) -> bool
    where
        E: Inspect + ?Sized,
        A: Inspect + ?Sized,
    {
        let location = self.enter();
        self.not_deep(location, &inspect(expected), &inspect(actual), &self.options)
    }

    #[track_caller]
    pub fn deep_ne_with<E, A>(&self, expected: &E, actual: &A, options: &Options) -> bool
    where
        E: Inspect + ?Sized,
        A: Inspect + ?Sized,
    {
        let location = self.enter();
        self.not_deep(location, &inspect(expected), &inspect(actual), options)
    }

    // ──────────────────────────────────────────────
    // Internals
    // ──────────────────────────────────────────────

    #[track_caller]
    fn enter(&self) -> &'static Location<'static> {
        let location = Location::caller();
        self.ctx.helper(location);
        location
    }

    fn check(
        &self,
        ok: bool,
        location: &'static Location<'static>,
        label: impl FnOnce() -> String,
        detail: Option<&str>,
    ) -> bool {
        if !ok {
            self.reporter.report(
                self.ctx,
                location,
                &label(),
                self.context.as_deref(),
                detail,
            );
        }
        ok
    }

    fn misuse(
        &self,
        location: &'static Location<'static>,
        predicate: &str,
        error: UsageError,
    ) -> bool {
        log::debug(
            self.reporter.config().log,
            &format!("assert::{} misused at {}: {:?}", predicate, location, error),
        );
        let label = format!("Invalid use of assert::{}: {}", predicate, error);
        self.check(false, location, || label, None)
    }

    fn deep(
        &self,
        location: &'static Location<'static>,
        expected: &Value,
        actual: &Value,
        options: &Options,
    ) -> bool {
        let judgment = deep_equal(expected, actual, options);
        match judgment.diff() {
            None => true,
            Some(diff) => self.check(false, location, || diff.to_string(), None),
        }
    }

    fn not_deep(
        &self,
        location: &'static Location<'static>,
        expected: &Value,
        actual: &Value,
        options: &Options,
    ) -> bool {
        let equal = deep_equal(expected, actual, options).is_equal();
        self.check(
            !equal,
            location,
            || format!("Should not be {}, but it is", expected),
            None,
        )
    }
}

fn mismatch(expected: &Value, actual: &Value) -> String {
    if expected.ty() == actual.ty() {
        format!("Expected {}, but got {}", expected, actual)
    } else {
        format!("Expected {}, but got {}", expected.typed(), actual.typed())
    }
}
