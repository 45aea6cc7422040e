use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use rust_decimal::Decimal;
use time::OffsetDateTime;

use super::{Field, Kind, Pointee, Target, Value};

/// Conversion of a concrete type into the tagged [`Value`] representation.
///
/// Record types implement this with [`impl_inspect!`](crate::impl_inspect).
pub trait Inspect {
    fn inspect(&self, cx: &mut Inspector) -> Value;

    /// The dynamic type name values of this type carry once inspected.
    ///
    /// Containers that share a representation report the shared name, so
    /// comparators registered through [`Options::compare`](crate::Options::compare)
    /// reach every value they were meant for.
    fn type_key() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The absence form of this type's kind. `Option::None` inspects as this.
    fn absent() -> Value
    where
        Self: Sized,
    {
        Value::nil()
    }
}

/// Inspection state for one conversion.
///
/// Tracks the referents currently being inspected so that a reference back
/// to one of them becomes a [`Target::BackEdge`] instead of recursing forever.
#[derive(Debug, Default)]
pub struct Inspector {
    path: Vec<usize>,
}

impl Inspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inspect<T: Inspect + ?Sized>(&mut self, value: &T) -> Value {
        value.inspect(self)
    }

    /// Inspects a reference of type `R` pointing at `target`.
    pub fn reference<R: ?Sized, T: Inspect + ?Sized>(&mut self, target: &T) -> Value {
        let addr = target as *const T as *const () as usize;
        let target = if self.path.contains(&addr) {
            Target::BackEdge
        } else {
            self.path.push(addr);
            let inner = target.inspect(self);
            self.path.pop();
            Target::Value(Box::new(inner))
        };
        Value::of::<R>(Kind::Ref(Some(Pointee { addr, target })))
    }
}

/// Inspects `value` with a fresh [`Inspector`].
pub fn inspect<T: Inspect + ?Sized>(value: &T) -> Value {
    Inspector::new().inspect(value)
}

/// Implements [`Inspect`] for a struct as a record of the listed fields.
///
/// ```
/// use verity_engine::{impl_inspect, inspect};
///
/// struct Account {
///     id: u64,
///     owner: String,
/// }
/// impl_inspect!(Account { id, owner });
///
/// let v = inspect(&Account { id: 7, owner: "ada".to_string() });
/// assert_eq!(v.to_string(), r#"Account { id: 7, owner: "ada" }"#);
/// ```
#[macro_export]
macro_rules! impl_inspect {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Inspect for $ty {
            #[allow(unused_variables)]
            fn inspect(&self, cx: &mut $crate::Inspector) -> $crate::Value {
                $crate::Value::record::<Self>(vec![
                    $($crate::Field::new(stringify!($field), cx.inspect(&self.$field)),)*
                ])
            }
        }
    };
}

// ──────────────────────────────────────────────
// Scalars
// ──────────────────────────────────────────────

macro_rules! inspect_int {
    ($($t:ty),*) => {
        $(
            impl Inspect for $t {
                fn inspect(&self, _cx: &mut Inspector) -> Value {
                    Value::of::<$t>(Kind::Int(*self as i128))
                }
            }
        )*
    };
}

inspect_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl Inspect for bool {
    fn inspect(&self, _cx: &mut Inspector) -> Value {
        Value::of::<bool>(Kind::Bool(*self))
    }
}

impl Inspect for f32 {
    fn inspect(&self, _cx: &mut Inspector) -> Value {
        Value::of::<f32>(Kind::Float(f64::from(*self)))
    }
}

impl Inspect for f64 {
    fn inspect(&self, _cx: &mut Inspector) -> Value {
        Value::of::<f64>(Kind::Float(*self))
    }
}

impl Inspect for char {
    fn inspect(&self, _cx: &mut Inspector) -> Value {
        Value::of::<char>(Kind::Text(self.to_string()))
    }
}

// `str` and `String` share one dynamic type so literals compare against owned text.
impl Inspect for str {
    fn inspect(&self, _cx: &mut Inspector) -> Value {
        Value::of::<str>(Kind::Text(self.to_string()))
    }
}

impl Inspect for String {
    fn inspect(&self, cx: &mut Inspector) -> Value {
        self.as_str().inspect(cx)
    }

    fn type_key() -> &'static str {
        <str as Inspect>::type_key()
    }
}

impl Inspect for Decimal {
    fn inspect(&self, _cx: &mut Inspector) -> Value {
        Value::of::<Decimal>(Kind::Decimal(*self))
    }
}

impl Inspect for OffsetDateTime {
    fn inspect(&self, _cx: &mut Inspector) -> Value {
        Value::of::<OffsetDateTime>(Kind::Timestamp(*self))
    }
}

impl Inspect for () {
    fn inspect(&self, _cx: &mut Inspector) -> Value {
        Value::record::<()>(Vec::new())
    }
}

impl Inspect for Value {
    fn inspect(&self, _cx: &mut Inspector) -> Value {
        self.clone()
    }
}

// ──────────────────────────────────────────────
// References and nullable wrappers
// ──────────────────────────────────────────────

impl<T: Inspect + ?Sized> Inspect for &T {
    fn inspect(&self, cx: &mut Inspector) -> Value {
        cx.reference::<Self, T>(*self)
    }

    fn absent() -> Value {
        Value::of::<Self>(Kind::Ref(None))
    }
}

macro_rules! inspect_pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: Inspect + ?Sized> Inspect for $ptr<T> {
                fn inspect(&self, cx: &mut Inspector) -> Value {
                    cx.reference::<Self, T>(&**self)
                }

                fn absent() -> Value {
                    Value::of::<Self>(Kind::Ref(None))
                }
            }
        )*
    };
}

inspect_pointer!(Box, Rc, Arc);

impl<T: Inspect> Inspect for Option<T> {
    fn inspect(&self, cx: &mut Inspector) -> Value {
        match self {
            Some(v) => v.inspect(cx),
            None => T::absent(),
        }
    }

    fn absent() -> Value {
        T::absent()
    }

    fn type_key() -> &'static str {
        T::type_key()
    }
}

impl<T: Inspect + ?Sized> Inspect for RefCell<T> {
    fn inspect(&self, cx: &mut Inspector) -> Value {
        match self.try_borrow() {
            Ok(inner) => inner.inspect(cx),
            Err(_) => Value::of::<Self>(Kind::Opaque("<mutably borrowed>".to_string())),
        }
    }

    fn type_key() -> &'static str {
        T::type_key()
    }
}

impl<T: Inspect + Copy> Inspect for Cell<T> {
    fn inspect(&self, cx: &mut Inspector) -> Value {
        self.get().inspect(cx)
    }

    fn type_key() -> &'static str {
        T::type_key()
    }
}

// ──────────────────────────────────────────────
// Sequences and mappings
// ──────────────────────────────────────────────

// Every sequence container reports the slice type, so a `Vec` and an array
// with equal elements compare equal.
fn sequence<'a, T, I>(cx: &mut Inspector, items: I) -> Value
where
    T: Inspect + 'a,
    I: IntoIterator<Item = &'a T>,
{
    Value::seq::<[T]>(Some(items.into_iter().map(|item| cx.inspect(item)).collect()))
}

impl<T: Inspect> Inspect for [T] {
    fn inspect(&self, cx: &mut Inspector) -> Value {
        sequence(cx, self)
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn inspect(&self, cx: &mut Inspector) -> Value {
        sequence(cx, self)
    }

    fn type_key() -> &'static str {
        <[T]>::type_key()
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn inspect(&self, cx: &mut Inspector) -> Value {
        sequence(cx, self)
    }

    fn absent() -> Value {
        Value::seq::<[T]>(None)
    }

    fn type_key() -> &'static str {
        <[T]>::type_key()
    }
}

impl<T: Inspect> Inspect for VecDeque<T> {
    fn inspect(&self, cx: &mut Inspector) -> Value {
        sequence(cx, self)
    }

    fn absent() -> Value {
        Value::seq::<[T]>(None)
    }

    fn type_key() -> &'static str {
        <[T]>::type_key()
    }
}

fn mapping<'a, K, V, I>(cx: &mut Inspector, entries: I) -> Value
where
    K: Inspect + 'a,
    V: Inspect + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let entries = entries
        .into_iter()
        .map(|(k, v)| (cx.inspect(k), cx.inspect(v)))
        .collect();
    Value::map::<BTreeMap<K, V>>(Some(entries))
}

impl<K: Inspect, V: Inspect, S> Inspect for HashMap<K, V, S> {
    fn inspect(&self, cx: &mut Inspector) -> Value {
        mapping(cx, self)
    }

    fn absent() -> Value {
        Value::map::<BTreeMap<K, V>>(None)
    }

    fn type_key() -> &'static str {
        std::any::type_name::<BTreeMap<K, V>>()
    }
}

impl<K: Inspect, V: Inspect> Inspect for BTreeMap<K, V> {
    fn inspect(&self, cx: &mut Inspector) -> Value {
        mapping(cx, self)
    }

    fn absent() -> Value {
        Value::map::<BTreeMap<K, V>>(None)
    }

    fn type_key() -> &'static str {
        std::any::type_name::<BTreeMap<K, V>>()
    }
}

fn set<'a, T, I>(cx: &mut Inspector, members: I) -> Value
where
    T: Inspect + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let entries = members
        .into_iter()
        .map(|m| (cx.inspect(m), cx.inspect(&())))
        .collect();
    Value::map::<BTreeSet<T>>(Some(entries))
}

impl<T: Inspect, S> Inspect for HashSet<T, S> {
    fn inspect(&self, cx: &mut Inspector) -> Value {
        set(cx, self)
    }

    fn absent() -> Value {
        Value::map::<BTreeSet<T>>(None)
    }

    fn type_key() -> &'static str {
        std::any::type_name::<BTreeSet<T>>()
    }
}

impl<T: Inspect> Inspect for BTreeSet<T> {
    fn inspect(&self, cx: &mut Inspector) -> Value {
        set(cx, self)
    }

    fn absent() -> Value {
        Value::map::<BTreeSet<T>>(None)
    }

    fn type_key() -> &'static str {
        std::any::type_name::<BTreeSet<T>>()
    }
}

macro_rules! inspect_tuple {
    ($(($($name:ident : $idx:tt),+))*) => {
        $(
            impl<$($name: Inspect),+> Inspect for ($($name,)+) {
                fn inspect(&self, cx: &mut Inspector) -> Value {
                    Value::record::<Self>(vec![
                        $(Field::new(stringify!($idx), cx.inspect(&self.$idx)),)+
                    ])
                }
            }
        )*
    };
}

inspect_tuple! {
    (A: 0)
    (A: 0, B: 1)
    (A: 0, B: 1, C: 2)
    (A: 0, B: 1, C: 2, D: 3)
}

// ──────────────────────────────────────────────
// Functions and channels
// ──────────────────────────────────────────────

macro_rules! inspect_fn {
    ($(($($arg:ident),*))*) => {
        $(
            impl<R, $($arg),*> Inspect for fn($($arg),*) -> R {
                fn inspect(&self, _cx: &mut Inspector) -> Value {
                    Value::of::<Self>(Kind::Func(Some(*self as usize)))
                }

                fn absent() -> Value {
                    Value::of::<Self>(Kind::Func(None))
                }
            }
        )*
    };
}

inspect_fn! {
    ()
    (A)
    (A, B)
    (A, B, C)
}

// A channel value is identified by the address of the handle it was
// inspected from, not by the channel behind it: two clones of one `Sender`
// are distinct, and a moved handle has a new identity.
macro_rules! inspect_chan {
    ($($end:ident),*) => {
        $(
            impl<T> Inspect for $end<T> {
                fn inspect(&self, _cx: &mut Inspector) -> Value {
                    Value::of::<Self>(Kind::Chan(Some(self as *const Self as usize)))
                }

                fn absent() -> Value {
                    Value::of::<Self>(Kind::Chan(None))
                }
            }
        )*
    };
}

inspect_chan!(Sender, Receiver);
