//! Structural equality: recursive, reference-transparent, diff-producing.

use super::{display_path, Difference, Judgment, Options};
use crate::value::{Field, Kind, Pointee, Target, Value};

/// Compare two values structurally.
///
/// References are followed, so separately allocated values with equal
/// contents are equal. Sequences compare in order, mappings by key, records
/// field by field. Every divergence is collected, in traversal order.
///
/// Cycles compare by shape: two back-edges are equal when they close the
/// same pair of references currently being compared.
pub fn deep_equal(expected: &Value, actual: &Value, options: &Options) -> Judgment {
    let mut walk = Walk {
        options,
        stack: Vec::new(),
        differences: Vec::new(),
    };
    walk.compare("", expected, actual);
    Judgment::from_differences(walk.differences)
}

struct Walk<'o> {
    options: &'o Options,
    /// Referent address pairs on the current comparison path.
    stack: Vec<(usize, usize)>,
    differences: Vec<Difference>,
}

impl Walk<'_> {
    fn compare(&mut self, path: &str, expected: &Value, actual: &Value) {
        if expected.ty() != actual.ty() {
            self.push(path, Some(expected.typed()), Some(actual.typed()));
            return;
        }

        let options = self.options;
        let custom = options.comparators_for(expected.ty());
        if !custom.is_empty() {
            if !custom.iter().all(|cmp| cmp(expected, actual)) {
                self.differ(path, expected, actual);
            }
            return;
        }

        match (expected.kind(), actual.kind()) {
            (Kind::Nil, Kind::Nil) => {}
            (Kind::Bool(e), Kind::Bool(a)) => self.check(e == a, path, expected, actual),
            (Kind::Int(e), Kind::Int(a)) => self.check(e == a, path, expected, actual),
            (Kind::Float(e), Kind::Float(a)) => {
                self.check(options.floats_equal(*e, *a), path, expected, actual)
            }
            (Kind::Decimal(e), Kind::Decimal(a)) => self.check(e == a, path, expected, actual),
            (Kind::Text(e), Kind::Text(a)) => self.check(e == a, path, expected, actual),
            (Kind::Timestamp(e), Kind::Timestamp(a)) => {
                // `OffsetDateTime` equality is by instant.
                let same = e == a && (options.instants() || e.offset() == a.offset());
                self.check(same, path, expected, actual)
            }
            (Kind::Ref(e), Kind::Ref(a)) => {
                self.compare_refs(path, expected, actual, e.as_ref(), a.as_ref())
            }
            (Kind::Seq(e), Kind::Seq(a)) => match (e, a) {
                (None, None) => {}
                (Some(e), Some(a)) => self.compare_seqs(path, e, a),
                _ => self.differ(path, expected, actual),
            },
            (Kind::Map(e), Kind::Map(a)) => match (e, a) {
                (None, None) => {}
                (Some(e), Some(a)) => self.compare_maps(path, e, a),
                _ => self.differ(path, expected, actual),
            },
            (Kind::Record(e), Kind::Record(a)) => self.compare_records(path, e, a),
            // Functions are only equal when both are absent.
            (Kind::Func(e), Kind::Func(a)) => {
                self.check(e.is_none() && a.is_none(), path, expected, actual)
            }
            (Kind::Chan(e), Kind::Chan(a)) => self.check(e == a, path, expected, actual),
            (Kind::Opaque(e), Kind::Opaque(a)) => self.check(e == a, path, expected, actual),
            _ => self.differ(path, expected, actual),
        }
    }

    fn compare_refs(
        &mut self,
        path: &str,
        expected: &Value,
        actual: &Value,
        e: Option<&Pointee>,
        a: Option<&Pointee>,
    ) {
        let (e, a) = match (e, a) {
            (None, None) => return,
            (Some(e), Some(a)) => (e, a),
            _ => return self.differ(path, expected, actual),
        };
        if e.addr == a.addr {
            return;
        }
        match (&e.target, &a.target) {
            (Target::Value(ev), Target::Value(av)) => {
                self.stack.push((e.addr, a.addr));
                self.compare(path, ev, av);
                self.stack.pop();
            }
            (Target::BackEdge, Target::BackEdge) if self.stack.contains(&(e.addr, a.addr)) => {}
            _ => self.differ(path, expected, actual),
        }
    }

    fn compare_seqs(&mut self, path: &str, expected: &[Value], actual: &[Value]) {
        for (i, (e, a)) in expected.iter().zip(actual).enumerate() {
            self.compare(&format!("{}[{}]", path, i), e, a);
        }
        for (i, e) in expected.iter().enumerate().skip(actual.len()) {
            self.push(&format!("{}[{}]", path, i), Some(e.to_string()), None);
        }
        for (i, a) in actual.iter().enumerate().skip(expected.len()) {
            self.push(&format!("{}[{}]", path, i), None, Some(a.to_string()));
        }
    }

    fn compare_maps(&mut self, path: &str, expected: &[(Value, Value)], actual: &[(Value, Value)]) {
        let options = self.options;
        let mut matched = vec![false; actual.len()];
        for (ek, ev) in expected {
            let entry_path = format!("{}[{}]", path, ek);
            let hit = actual
                .iter()
                .enumerate()
                .find(|(j, (ak, _))| !matched[*j] && deep_equal(ek, ak, options).is_equal());
            match hit {
                Some((j, (_, av))) => {
                    matched[j] = true;
                    self.compare(&entry_path, ev, av);
                }
                None => self.push(&entry_path, Some(ev.to_string()), None),
            }
        }
        for (j, (ak, av)) in actual.iter().enumerate() {
            if !matched[j] {
                self.push(&format!("{}[{}]", path, ak), None, Some(av.to_string()));
            }
        }
    }

    fn compare_records(&mut self, path: &str, expected: &[Field], actual: &[Field]) {
        for ef in expected {
            let field_path = format!("{}.{}", path, ef.name);
            if self.options.ignores(&field_path, ef.name) {
                continue;
            }
            match actual.iter().find(|af| af.name == ef.name) {
                Some(af) => self.compare(&field_path, &ef.value, &af.value),
                None => self.push(&field_path, Some(ef.value.to_string()), None),
            }
        }
        for af in actual {
            let field_path = format!("{}.{}", path, af.name);
            if self.options.ignores(&field_path, af.name) {
                continue;
            }
            if !expected.iter().any(|ef| ef.name == af.name) {
                self.push(&field_path, None, Some(af.value.to_string()));
            }
        }
    }

    fn check(&mut self, same: bool, path: &str, expected: &Value, actual: &Value) {
        if !same {
            self.differ(path, expected, actual);
        }
    }

    fn differ(&mut self, path: &str, expected: &Value, actual: &Value) {
        self.push(path, Some(expected.to_string()), Some(actual.to_string()));
    }

    fn push(&mut self, path: &str, expected: Option<String>, actual: Option<String>) {
        self.differences
            .push(Difference::new(display_path(path), expected, actual));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use time::macros::{datetime, offset};

    use super::*;
    use crate::inspect;

    struct Inner {
        value: i32,
    }
    crate::impl_inspect!(Inner { value });

    struct Outer {
        b: Option<Box<Inner>>,
    }
    crate::impl_inspect!(Outer { b });

    struct Stamped {
        at: time::OffsetDateTime,
    }
    crate::impl_inspect!(Stamped { at });

    struct Node {
        id: u32,
        next: Option<Rc<RefCell<Node>>>,
    }
    crate::impl_inspect!(Node { id, next });

    struct Pair {
        a: i32,
        b: (i32, i32),
    }
    crate::impl_inspect!(Pair { a, b });

    fn deep<E: crate::Inspect, A: crate::Inspect>(e: &E, a: &A) -> Judgment {
        deep_equal(&inspect(e), &inspect(a), &Options::default())
    }

    fn outer(v: Option<i32>) -> Outer {
        Outer {
            b: v.map(|value| Box::new(Inner { value })),
        }
    }

    #[test]
    fn separately_allocated_equal_contents_are_equal() {
        assert!(deep(&outer(Some(1)), &outer(Some(1))).is_equal());
    }

    #[test]
    fn differing_nested_field_names_its_path() {
        let j = deep(&outer(Some(1)), &outer(Some(2)));
        let diff = j.diff().unwrap();
        assert_eq!(diff.len(), 1);
        assert_eq!(
            diff.first(),
            &Difference::new(".b.value", Some("1".into()), Some("2".into()))
        );
    }

    #[test]
    fn present_versus_null_reference() {
        let j = deep(&outer(Some(1)), &outer(None));
        assert_eq!(j.diff().unwrap().first().path, ".b");
    }

    #[test]
    fn sequences_are_ordered() {
        assert!(deep(&vec![1, 2], &vec![1, 2]).is_equal());
        assert!(!deep(&vec![1, 2], &vec![2, 1]).is_equal());
        let j = deep(&vec![1, 2], &vec![1, 2, 3]);
        assert_eq!(
            j.diff().unwrap().first(),
            &Difference::new("[2]", None, Some("3".into()))
        );
    }

    #[test]
    fn absent_sequence_differs_from_empty() {
        assert!(!deep(&None::<Vec<i32>>, &Vec::<i32>::new()).is_equal());
        assert!(deep(&None::<Vec<i32>>, &None::<Vec<i32>>).is_equal());
    }

    #[test]
    fn maps_compare_by_key() {
        let a: HashMap<i32, i32> = [(1, 2), (3, 4)].into_iter().collect();
        let b: HashMap<i32, i32> = [(3, 4), (1, 2)].into_iter().collect();
        assert!(deep(&a, &b).is_equal());

        let c: HashMap<i32, i32> = [(1, 2), (3, 5)].into_iter().collect();
        let j = deep(&a, &c);
        assert_eq!(
            j.diff().unwrap().first(),
            &Difference::new("[3]", Some("4".into()), Some("5".into()))
        );

        let d: HashMap<i32, i32> = [(1, 2)].into_iter().collect();
        assert_eq!(
            deep(&a, &d).diff().unwrap().first(),
            &Difference::new("[3]", Some("4".into()), None)
        );
        assert!(!deep(&d, &a).is_equal());
    }

    #[test]
    fn timestamps_compare_by_instant() {
        let utc = datetime!(2024-05-01 10:00 UTC);
        let tokyo = utc.to_offset(offset!(+9));
        let amsterdam = utc.to_offset(offset!(+2));
        assert!(deep(&Stamped { at: utc }, &Stamped { at: tokyo }).is_equal());
        assert!(deep(&Stamped { at: tokyo }, &Stamped { at: amsterdam }).is_equal());

        let later = amsterdam + time::Duration::nanoseconds(1);
        assert!(!deep(&Stamped { at: tokyo }, &Stamped { at: later }).is_equal());
    }

    #[test]
    fn exact_timestamps_option_checks_offset() {
        let utc = datetime!(2024-05-01 10:00 UTC);
        let tokyo = utc.to_offset(offset!(+9));
        let j = deep_equal(
            &inspect(&utc),
            &inspect(&tokyo),
            &Options::new().exact_timestamps(),
        );
        assert!(!j.is_equal());
    }

    #[test]
    fn type_mismatch_is_reported_with_types() {
        let j = deep(&1i32, &1i64);
        let d = j.diff().unwrap().first();
        assert_eq!(d.expected.as_deref(), Some("i32(1)"));
        assert_eq!(d.actual.as_deref(), Some("i64(1)"));
    }

    #[test]
    fn ignored_fields_are_skipped() {
        let opts = Options::new().ignore("value");
        let j = deep_equal(&inspect(&outer(Some(1))), &inspect(&outer(Some(2))), &opts);
        assert!(j.is_equal());

        let opts = Options::new().ignore(".b.value");
        let j = deep_equal(&inspect(&outer(Some(1))), &inspect(&outer(Some(2))), &opts);
        assert!(j.is_equal());
    }

    #[test]
    fn later_comparator_cannot_hide_a_mismatch() {
        let lenient = Options::new().compare::<Inner>(|_, _| true);
        let j = deep_equal(&inspect(&outer(Some(1))), &inspect(&outer(Some(2))), &lenient);
        assert!(j.is_equal());

        let strict_then_lenient = Options::new()
            .compare::<Inner>(|e, a| e.to_string() == a.to_string())
            .compare::<Inner>(|_, _| true);
        let j = deep_equal(
            &inspect(&outer(Some(1))),
            &inspect(&outer(Some(2))),
            &strict_then_lenient,
        );
        assert!(!j.is_equal());
    }

    #[test]
    fn comparators_reach_text_and_containers() {
        let any_text = Options::new().compare::<String>(|_, _| true);
        assert!(deep_equal(&inspect("a"), &inspect("b"), &any_text).is_equal());

        let same_len = Options::new().compare::<Vec<i32>>(|e, a| {
            e.elements().map(<[Value]>::len) == a.elements().map(<[Value]>::len)
        });
        assert!(deep_equal(&inspect(&vec![1, 2]), &inspect(&[3, 4]), &same_len).is_equal());
        assert!(!deep_equal(&inspect(&vec![1, 2]), &inspect(&[3]), &same_len).is_equal());

        let any_map = Options::new().compare::<HashMap<u8, u8>>(|_, _| true);
        let (a, b) = (HashMap::from([(1u8, 2u8)]), HashMap::from([(3u8, 4u8)]));
        assert!(deep_equal(&inspect(&a), &inspect(&b), &any_map).is_equal());
    }

    #[test]
    fn tuple_positions_need_a_full_path_to_ignore() {
        let pair = |n: i32| Pair { a: 1, b: (n, n) };
        let bare = Options::new().ignore("0");
        assert!(!deep_equal(&inspect(&pair(1)), &inspect(&pair(2)), &bare).is_equal());

        let full = Options::new().ignore(".b.0").ignore(".b.1");
        assert!(deep_equal(&inspect(&pair(1)), &inspect(&pair(2)), &full).is_equal());
    }

    #[test]
    fn float_tolerance() {
        let opts = Options::new().float_tolerance(1e-9);
        assert!(deep_equal(&inspect(&0.1f64), &inspect(&(0.3f64 - 0.2)), &opts).is_equal());
        assert!(!deep(&0.1f64, &(0.3f64 - 0.2)).is_equal());
    }

    #[test]
    fn functions_only_equal_when_absent() {
        fn one() -> i32 {
            1
        }
        let f: fn() -> i32 = one;
        assert!(!deep(&f, &f).is_equal());
        assert!(deep(&None::<fn() -> i32>, &None::<fn() -> i32>).is_equal());
    }

    fn ring(ids: &[u32]) -> Rc<RefCell<Node>> {
        let head = Rc::new(RefCell::new(Node {
            id: ids[0],
            next: None,
        }));
        let mut tail = Rc::clone(&head);
        for &id in &ids[1..] {
            let node = Rc::new(RefCell::new(Node { id, next: None }));
            tail.borrow_mut().next = Some(Rc::clone(&node));
            tail = node;
        }
        tail.borrow_mut().next = Some(Rc::clone(&head));
        head
    }

    fn unlink(head: &Rc<RefCell<Node>>) {
        let mut cur = head.borrow_mut().next.take();
        while let Some(node) = cur {
            cur = node.borrow_mut().next.take();
        }
    }

    #[test]
    fn cycles_with_matching_structure_are_equal() {
        let (a, b) = (ring(&[1, 2]), ring(&[1, 2]));
        assert!(deep(&a, &b).is_equal());
        unlink(&a);
        unlink(&b);
    }

    #[test]
    fn cycles_with_different_structure_differ() {
        let (a, b) = (ring(&[1, 2]), ring(&[1, 2, 1, 2]));
        assert!(!deep(&a, &b).is_equal());
        let (c, d) = (ring(&[1, 2]), ring(&[1, 3]));
        let j = deep(&c, &d);
        assert_eq!(j.diff().unwrap().first().path, ".next.id");
        for r in [a, b, c, d] {
            unlink(&r);
        }
    }
}
