//! Test assertions that report and continue.
//!
//! An [`Assert`] is bound to a [`TestContext`], the seam to the test host.
//! A failing predicate delivers a message to the host and returns `false`;
//! the test keeps running, and the host decides when the test has failed.
//!
//! ```
//! use verity_assert::{Assert, Recorder};
//!
//! let t = Recorder::new();
//! let a = Assert::new(&t);
//!
//! a.same_elements(&[1, 2, 3], &vec![3, 1, 2]);
//! a.deep_eq(&vec![1, 2], &[1, 2]);
//! assert!(!t.got_error());
//!
//! a.nil(&Some(1));
//! assert!(t.got_error());
//! ```
//!
//! With the built-in harness, use [`LibTest`]: failures are printed as they
//! happen and the test panics once it ends.

pub mod config;
pub mod context;
pub mod facade;
mod log;
pub mod report;

pub use config::{ColorChoice, Config, ConfigError, LogLevel};
pub use context::{Failure, HostError, LibTest, Recorder, TestContext};
pub use facade::Assert;
pub use report::Reporter;

pub use verity_engine::{impl_inspect, Inspect, Inspector, Options, UsageError, Value};
