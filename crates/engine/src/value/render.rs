use std::fmt;

use time::format_description::well_known::Rfc3339;

use super::{Kind, Target, Value};

/// Strips module paths from a type name: `alloc::vec::Vec<i32>` becomes `Vec<i32>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            segment.clear();
        } else if c.is_alphanumeric() || c == '_' {
            segment.push(c);
        } else {
            out.push_str(&segment);
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(&segment);
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Nil
            | Kind::Ref(None)
            | Kind::Seq(None)
            | Kind::Map(None)
            | Kind::Func(None)
            | Kind::Chan(None) => f.write_str("nil"),
            Kind::Bool(b) => write!(f, "{}", b),
            Kind::Int(i) => write!(f, "{}", i),
            Kind::Float(x) => write!(f, "{:?}", x),
            Kind::Decimal(d) => write!(f, "{}", d),
            Kind::Text(s) => write!(f, "{:?}", s),
            Kind::Timestamp(t) => match t.format(&Rfc3339) {
                Ok(s) => f.write_str(&s),
                Err(_) => write!(f, "{}", t),
            },
            Kind::Ref(Some(pointee)) => match &pointee.target {
                Target::Value(v) => write!(f, "&{}", v),
                Target::BackEdge => write!(f, "&<cycle {:#x}>", pointee.addr),
            },
            Kind::Seq(Some(items)) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Kind::Map(Some(entries)) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Kind::Record(fields) => {
                f.write_str(&self.type_label())?;
                if fields.is_empty() {
                    return Ok(());
                }
                f.write_str(" { ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.value)?;
                }
                f.write_str(" }")
            }
            Kind::Func(Some(addr)) => write!(f, "fn@{:#x}", addr),
            Kind::Chan(Some(addr)) => write!(f, "chan@{:#x}", addr),
            Kind::Opaque(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{impl_inspect, inspect};

    struct Point {
        x: i32,
        y: i32,
    }
    impl_inspect!(Point { x, y });

    #[test]
    fn strips_module_paths() {
        assert_eq!(short_type_name("alloc::vec::Vec<i32>"), "Vec<i32>");
        assert_eq!(
            short_type_name("std::collections::hash::map::HashMap<alloc::string::String, u8>"),
            "HashMap<String, u8>"
        );
        assert_eq!(short_type_name("&str"), "&str");
        assert_eq!(short_type_name("[u8; 4]"), "[u8; 4]");
    }

    #[test]
    fn renders_nested_values() {
        let v = inspect(&vec![Some(Box::new(Point { x: 1, y: 2 })), None]);
        assert_eq!(v.to_string(), "[&Point { x: 1, y: 2 }, nil]");
    }

    #[test]
    fn renders_scalars() {
        assert_eq!(inspect(&1.0f64).to_string(), "1.0");
        assert_eq!(inspect("hi").to_string(), "\"hi\"");
        assert_eq!(inspect(&true).to_string(), "true");
        assert_eq!(inspect(&()).to_string(), "()");
    }

    #[test]
    fn renders_timestamps_as_rfc3339() {
        let t = time::macros::datetime!(2024-03-01 12:30 +01:00);
        assert_eq!(inspect(&t).to_string(), "2024-03-01T12:30:00+01:00");
    }
}
