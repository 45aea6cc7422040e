//! Strict equality: same dynamic type, then intrinsic equality.

use super::{Difference, Judgment};
use crate::error::UsageError;
use crate::value::{Kind, Value};

/// Compare two values strictly.
///
/// A type mismatch is always "not equal", reported with both types, and is
/// checked before anything else. With matching types, kinds without an
/// intrinsic equality are a [`UsageError::NotComparable`].
pub fn strict_equal(expected: &Value, actual: &Value) -> Result<Judgment, UsageError> {
    if expected.ty() != actual.ty() {
        return Ok(Judgment::differs(Difference::new(
            ".",
            Some(expected.typed()),
            Some(actual.typed()),
        )));
    }
    if intrinsic(expected, actual)? {
        Ok(Judgment::equal())
    } else {
        Ok(Judgment::differs(Difference::new(
            ".",
            Some(expected.to_string()),
            Some(actual.to_string()),
        )))
    }
}

/// Element-level strict equality: a type mismatch is simply `false`.
pub fn equal(a: &Value, b: &Value) -> Result<bool, UsageError> {
    if a.ty() != b.ty() {
        return Ok(false);
    }
    intrinsic(a, b)
}

/// Fails for values that have no intrinsic equality.
pub fn ensure_comparable(value: &Value) -> Result<(), UsageError> {
    match value.kind() {
        Kind::Seq(_) | Kind::Map(_) | Kind::Func(_) | Kind::Opaque(_) => {
            Err(UsageError::NotComparable {
                ty: value.type_label(),
            })
        }
        Kind::Record(fields) => fields
            .iter()
            .try_for_each(|field| ensure_comparable(&field.value))
            .map_err(|_| UsageError::NotComparable {
                ty: value.type_label(),
            }),
        _ => Ok(()),
    }
}

fn intrinsic(a: &Value, b: &Value) -> Result<bool, UsageError> {
    ensure_comparable(a)?;
    Ok(same(a, b))
}

// Both sides share a type and are known to be comparable.
fn same(a: &Value, b: &Value) -> bool {
    match (a.kind(), b.kind()) {
        (Kind::Nil, Kind::Nil) => true,
        (Kind::Bool(x), Kind::Bool(y)) => x == y,
        (Kind::Int(x), Kind::Int(y)) => x == y,
        (Kind::Float(x), Kind::Float(y)) => x == y,
        (Kind::Decimal(x), Kind::Decimal(y)) => x == y,
        (Kind::Text(x), Kind::Text(y)) => x == y,
        // Representation equality: the same instant in another offset differs.
        (Kind::Timestamp(x), Kind::Timestamp(y)) => x == y && x.offset() == y.offset(),
        (Kind::Ref(x), Kind::Ref(y)) => match (x, y) {
            (None, None) => true,
            (Some(px), Some(py)) => px.addr == py.addr,
            _ => false,
        },
        (Kind::Chan(x), Kind::Chan(y)) => x == y,
        (Kind::Record(xs), Kind::Record(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys)
                    .all(|(x, y)| x.name == y.name && same(&x.value, &y.value))
        }
        _ => false,
    }
}
