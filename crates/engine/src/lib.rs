//! Verity engine -- the comparison core behind Verity assertions.
//!
//! Test data of any shape is inspected into a [`Value`], then judged by:
//!
//! - [`strict_equal`]: same dynamic type, intrinsic equality
//! - [`deep_equal`]: recursive structural equality with a diff
//! - [`same_elements`] / [`contains`]: order-insensitive sequence checks
//! - [`is_absent`]: null-like values across nullable kinds
//!
//! None of these panic. Misuse (a non-sequence where a sequence is required,
//! strict equality on a sequence) is a [`UsageError`], never a "no".

pub mod absent;
pub mod equality;
pub mod error;
pub mod json;
pub mod multiset;
pub mod value;

pub use absent::is_absent;
pub use equality::{deep_equal, strict_equal, Diff, Difference, Judgment, Options};
pub use error::UsageError;
pub use json::{from_json, inspect_serialize};
pub use multiset::{contains, same_elements};
pub use value::{inspect, Field, Inspect, Inspector, Kind, Pointee, Target, Value};
