//! Order-insensitive sequence comparison and membership.

use crate::equality::{strict, Difference, Judgment};
use crate::error::UsageError;
use crate::value::Value;

fn elements<'v>(value: &'v Value, operation: &'static str) -> Result<&'v [Value], UsageError> {
    value.elements().ok_or_else(|| UsageError::NotASequence {
        operation,
        ty: value.type_label(),
    })
}

/// Compare two sequences ignoring order.
///
/// Each expected element consumes the first unconsumed actual element that
/// is strictly equal to it. Strict equality is an equivalence, so this
/// greedy matching is exact: duplicates must appear equally often on both
/// sides.
pub fn same_elements(expected: &Value, actual: &Value) -> Result<Judgment, UsageError> {
    let exp = elements(expected, "same_elements")?;
    let act = elements(actual, "same_elements")?;

    if exp.len() != act.len() {
        return Ok(Judgment::differs(Difference::new(
            ".",
            Some(format!("len {}", exp.len())),
            Some(format!("len {}", act.len())),
        )));
    }

    let mut consumed = vec![false; act.len()];
    let mut unmatched = Vec::new();
    for (i, e) in exp.iter().enumerate() {
        let mut hit = None;
        for (j, a) in act.iter().enumerate() {
            if !consumed[j] && strict::equal(e, a)? {
                hit = Some(j);
                break;
            }
        }
        match hit {
            Some(j) => consumed[j] = true,
            None => unmatched.push(Difference::new(
                format!("[{}]", i),
                Some(e.to_string()),
                None,
            )),
        }
    }

    Ok(Judgment::from_differences(unmatched))
}

/// Whether `list` holds an element strictly equal to `needle`.
pub fn contains(needle: &Value, list: &Value) -> Result<bool, UsageError> {
    for item in elements(list, "contains")? {
        if strict::equal(needle, item)? {
            return Ok(true);
        }
    }
    Ok(false)
}
