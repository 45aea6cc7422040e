//! Runtime representation of arbitrary test data.
//!
//! Assertions never compare caller types directly. Every argument is first
//! converted into a [`Value`] through [`Inspect`]: a closed, tagged tree that
//! records the dynamic type name of each node next to its data. The equality
//! engine, the multiset comparator and the absence checks all work on this
//! representation.

mod inspect;
mod render;

pub use inspect::{inspect, Inspect, Inspector};
pub use render::short_type_name;

use rust_decimal::Decimal;
use time::OffsetDateTime;

/// Type name carried by the untyped absence marker.
pub const NIL_TYPE: &str = "nil";

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

/// An inspected value: its dynamic type name plus its data.
#[derive(Debug, Clone)]
pub struct Value {
    ty: &'static str,
    kind: Kind,
}

/// The shape of an inspected value.
///
/// Reference-like kinds (`Ref`, `Seq`, `Map`, `Func`, `Chan`) use `None` for
/// "no backing storage", which is what [`crate::is_absent`] looks for.
#[derive(Debug, Clone)]
pub enum Kind {
    /// The untyped absence marker.
    Nil,
    Bool(bool),
    /// Every integer width widens to `i128`; the type name keeps them apart.
    Int(i128),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Timestamp(OffsetDateTime),
    Ref(Option<Pointee>),
    Seq(Option<Vec<Value>>),
    /// Entries are kept sorted by the rendering of their key.
    Map(Option<Vec<(Value, Value)>>),
    Record(Vec<Field>),
    /// Function pointer address.
    Func(Option<usize>),
    /// Address of the channel handle that was inspected. Identity is per
    /// handle: clones of one sender are different channels here.
    Chan(Option<usize>),
    /// Something that could not be inspected further, kept as text.
    Opaque(String),
}

/// The referent of a non-null reference.
#[derive(Debug, Clone)]
pub struct Pointee {
    /// Address of the referent; reference identity.
    pub addr: usize,
    pub target: Target,
}

#[derive(Debug, Clone)]
pub enum Target {
    Value(Box<Value>),
    /// The referent is already being inspected further up the tree.
    BackEdge,
}

/// A named record field.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub value: Value,
}

impl Field {
    pub fn new(name: &'static str, value: Value) -> Self {
        Self { name, value }
    }
}

impl Value {
    /// The untyped absence marker.
    pub fn nil() -> Self {
        Self {
            ty: NIL_TYPE,
            kind: Kind::Nil,
        }
    }

    pub fn new(ty: &'static str, kind: Kind) -> Self {
        Self { ty, kind }
    }

    /// A value whose dynamic type is `T`.
    pub fn of<T: ?Sized>(kind: Kind) -> Self {
        Self::new(std::any::type_name::<T>(), kind)
    }

    /// A record of type `T` with the given fields, in declaration order.
    pub fn record<T: ?Sized>(fields: Vec<Field>) -> Self {
        Self::of::<T>(Kind::Record(fields))
    }

    /// A sequence of type `T`; `None` is a sequence without storage.
    pub fn seq<T: ?Sized>(items: Option<Vec<Value>>) -> Self {
        Self::of::<T>(Kind::Seq(items))
    }

    /// A mapping of type `T`; `None` is a mapping without storage.
    ///
    /// Entries are sorted by rendered key so that hash-ordered maps render
    /// and diff deterministically.
    pub fn map<T: ?Sized>(entries: Option<Vec<(Value, Value)>>) -> Self {
        let entries = entries.map(|mut entries| {
            entries.sort_by_cached_key(|(key, _)| key.to_string());
            entries
        });
        Self::of::<T>(Kind::Map(entries))
    }

    /// The full dynamic type name.
    pub fn ty(&self) -> &'static str {
        self.ty
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// The type name with module paths stripped, for messages.
    pub fn type_label(&self) -> String {
        short_type_name(self.ty)
    }

    /// Returns a human-readable kind name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            Kind::Nil => "nil",
            Kind::Bool(_) => "bool",
            Kind::Int(_) => "int",
            Kind::Float(_) => "float",
            Kind::Decimal(_) => "decimal",
            Kind::Text(_) => "text",
            Kind::Timestamp(_) => "timestamp",
            Kind::Ref(_) => "reference",
            Kind::Seq(_) => "sequence",
            Kind::Map(_) => "mapping",
            Kind::Record(_) => "record",
            Kind::Func(_) => "function",
            Kind::Chan(_) => "channel",
            Kind::Opaque(_) => "opaque",
        }
    }

    pub fn is_absent(&self) -> bool {
        crate::absent::is_absent(self)
    }

    /// Elements of a sequence; an absent sequence has none.
    /// Returns `None` when the value is not a sequence.
    pub fn elements(&self) -> Option<&[Value]> {
        match &self.kind {
            Kind::Seq(Some(items)) => Some(items),
            Kind::Seq(None) => Some(&[]),
            _ => None,
        }
    }

    /// Renders the value prefixed with its type, e.g. `i32(1)`.
    /// The absence marker renders as plain `nil`.
    pub fn typed(&self) -> String {
        match self.kind {
            Kind::Nil => NIL_TYPE.to_string(),
            _ => format!("{}({})", self.type_label(), self),
        }
    }
}
