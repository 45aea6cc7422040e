//! The test host seam and two hosts: an in-memory [`Recorder`] and
//! [`LibTest`] for the built-in `#[test]` harness.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::Location;
use std::thread;

use thiserror::Error;

use crate::config::{Config, LogLevel};
use crate::log;

/// One reported assertion failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// The call site of the failing predicate.
    pub location: &'static Location<'static>,
    /// The predicate's default message, without context or detail.
    pub label: String,
    /// The full message as delivered to the host.
    pub message: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Errors raised by a host that cannot accept a report.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    #[error("test has already finished; failures can no longer be reported")]
    Finished,
    #[error("test context is already in use")]
    Busy,
}

/// What assertions need from the test host.
pub trait TestContext {
    /// Records a failure. The test keeps running.
    fn error(&self, failure: Failure) -> Result<(), HostError>;

    /// Marks `caller` as the call site to attribute failures to.
    fn helper(&self, _caller: &'static Location<'static>) {}

    /// Registers teardown work to run when the test finishes.
    fn cleanup(&self, f: Box<dyn FnOnce()>) -> Result<(), HostError>;
}

fn run_cleanups(cleanups: &RefCell<Vec<Box<dyn FnOnce()>>>) {
    let mut pending = cleanups.take();
    while let Some(f) = pending.pop() {
        f();
    }
}

// ──────────────────────────────────────────────
// Recorder
// ──────────────────────────────────────────────

/// A host that keeps failures in memory for later inspection.
#[derive(Default)]
pub struct Recorder {
    failures: RefCell<Vec<Failure>>,
    helpers: RefCell<Vec<&'static Location<'static>>>,
    cleanups: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl fmt::Debug for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("failures", &self.failures)
            .field("helpers", &self.helpers)
            .field("cleanups", &self.cleanups.borrow().len())
            .finish()
    }
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything was reported since the last call. Resets the record.
    pub fn got_error(&self) -> bool {
        let failures = self.failures.take();
        !failures.is_empty()
    }

    /// Removes and returns every recorded failure.
    pub fn take_failures(&self) -> Vec<Failure> {
        self.failures.take()
    }

    pub fn failures(&self) -> Vec<Failure> {
        self.failures.borrow().clone()
    }

    /// The most recent failure, if any.
    pub fn last(&self) -> Option<Failure> {
        self.failures.borrow().last().cloned()
    }

    /// Call sites passed to [`TestContext::helper`], oldest first.
    pub fn helpers(&self) -> Vec<&'static Location<'static>> {
        self.helpers.borrow().clone()
    }

    /// Runs registered cleanups now, most recent first.
    pub fn run_cleanups(&self) {
        run_cleanups(&self.cleanups);
    }
}

impl TestContext for Recorder {
    fn error(&self, failure: Failure) -> Result<(), HostError> {
        self.failures
            .try_borrow_mut()
            .map_err(|_| HostError::Busy)?
            .push(failure);
        Ok(())
    }

    fn helper(&self, caller: &'static Location<'static>) {
        if let Ok(mut helpers) = self.helpers.try_borrow_mut() {
            helpers.push(caller);
        }
    }

    fn cleanup(&self, f: Box<dyn FnOnce()>) -> Result<(), HostError> {
        self.cleanups
            .try_borrow_mut()
            .map_err(|_| HostError::Busy)?
            .push(f);
        Ok(())
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        run_cleanups(&self.cleanups);
    }
}

// ──────────────────────────────────────────────
// LibTest
// ──────────────────────────────────────────────

/// A host for the built-in `#[test]` harness.
///
/// Each failure is printed to stderr as soon as it is reported, and the test
/// keeps running. When the host is dropped (or [`finish`](Self::finish) is
/// called) cleanups run, most recent first, and then the test panics once
/// if any failure was reported.
///
/// ```should_panic
/// use verity_assert::{Assert, LibTest};
///
/// let t = LibTest::new();
/// {
///     let a = Assert::new(&t);
///     a.eq(&1, &2);
///     a.is_true(false);
/// }
/// t.finish(); // panics: "2 assertions failed"
/// ```
pub struct LibTest {
    log: LogLevel,
    failures: Cell<usize>,
    cleanups: RefCell<Vec<Box<dyn FnOnce()>>>,
    finished: Cell<bool>,
}

impl fmt::Debug for LibTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibTest")
            .field("failures", &self.failures.get())
            .field("cleanups", &self.cleanups.borrow().len())
            .field("finished", &self.finished.get())
            .finish()
    }
}

impl Default for LibTest {
    fn default() -> Self {
        Self::new()
    }
}

impl LibTest {
    pub fn new() -> Self {
        let log = match Config::from_env() {
            Ok(config) => config.log,
            Err(e) => {
                log::warn(LogLevel::default(), &format!("{}; using defaults", e));
                LogLevel::default()
            }
        };
        Self::with_log(log)
    }

    pub fn with_log(log: LogLevel) -> Self {
        Self {
            log,
            failures: Cell::new(0),
            cleanups: RefCell::new(Vec::new()),
            finished: Cell::new(false),
        }
    }

    /// Number of failures reported so far.
    pub fn failures(&self) -> usize {
        self.failures.get()
    }

    /// Runs cleanups and fails the test if anything was reported.
    pub fn finish(self) {
        self.finalize();
    }

    fn finalize(&self) {
        if self.finished.replace(true) {
            return;
        }
        run_cleanups(&self.cleanups);

        let failures = self.failures.get();
        log::debug(
            self.log,
            &format!("test finished with {} failure(s)", failures),
        );
        if failures > 0 && !thread::panicking() {
            if failures == 1 {
                panic!("1 assertion failed");
            }
            panic!("{} assertions failed", failures);
        }
    }
}

impl TestContext for LibTest {
    fn error(&self, failure: Failure) -> Result<(), HostError> {
        if self.finished.get() {
            return Err(HostError::Finished);
        }
        self.failures.set(self.failures.get() + 1);
        eprintln!("{}", failure);
        Ok(())
    }

    fn cleanup(&self, f: Box<dyn FnOnce()>) -> Result<(), HostError> {
        if self.finished.get() {
            return Err(HostError::Finished);
        }
        self.cleanups
            .try_borrow_mut()
            .map_err(|_| HostError::Busy)?
            .push(f);
        Ok(())
    }
}

impl Drop for LibTest {
    fn drop(&mut self) {
        self.finalize();
    }
}
