//! Absence checks across nullable kinds.

use crate::value::{Kind, Value};

/// Returns true for the absence marker and for any reference, sequence,
/// mapping, function or channel that has no backing storage.
///
/// Numbers, text, booleans, timestamps and records are never absent, whatever
/// their contents.
pub fn is_absent(value: &Value) -> bool {
    match value.kind() {
        Kind::Nil => true,
        Kind::Ref(pointee) => pointee.is_none(),
        Kind::Seq(items) => items.is_none(),
        Kind::Map(entries) => entries.is_none(),
        Kind::Func(addr) | Kind::Chan(addr) => addr.is_none(),
        _ => false,
    }
}
