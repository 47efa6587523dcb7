//! Dynamic value model for bound command arguments.
//!
//! Every type parser produces a [`Value`], and every container parser
//! consumes a sequence of them. The enum is closed by design: command
//! callbacks receive plain data they can match on, and the binder never
//! has to reason about open-ended user types.

use std::fmt;

use serde::Serialize;

/// A single bound argument value.
///
/// Produced by type parsers and container parsers, carried through the
/// binder, and handed to command callbacks.
///
/// # Examples
///
/// ```
/// use bosun_core::Value;
///
/// let v = Value::Int(3);
/// assert_eq!(v.as_int(), Some(3));
/// assert_eq!(v.as_str(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// An explicit "no value". Distinct from a parameter having no
    /// default at all, which is modeled as `Option<Value>::None`.
    None,
    /// Boolean, as produced by the boolean parser or presence flags.
    Bool(bool),
    /// Whole number.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// String token, passed through verbatim.
    Str(String),
    /// Ordered sequence produced by the sequence container parser.
    List(Vec<Value>),
    /// Insertion-ordered, deduplicated collection produced by the set
    /// container parser. Backed by a `Vec` because `Value` carries
    /// floats and therefore cannot implement `Eq`/`Hash`.
    Set(Vec<Value>),
}

impl Value {
    /// Returns the inner boolean, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the inner integer, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the inner float. An `Int` is widened, matching the
    /// `Int ⊑ Float` subkind rule used by override validation.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the inner string slice, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner items, if this is a `List` or `Set`.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }

    /// `true` for `Value::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => write_items(f, items, "[", "]"),
            Value::Set(items) => write_items(f, items, "{", "}"),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value], open: &str, close: &str) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// Semantic kind of the value a type parser produces.
///
/// Used by the schema override check: a replacement parser must produce
/// a subkind of what the original parser produced, so a command's
/// callback never sees a value shape it did not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueKind {
    Int,
    Float,
    Bool,
    Str,
    /// Produced by union parsers and other parsers without a single
    /// static kind. `Any` is the top of the subkind lattice.
    Any,
}

impl ValueKind {
    /// Subkind relation: reflexive, `Int ⊑ Float`, and everything is a
    /// subkind of `Any`.
    pub fn is_subkind_of(self, other: ValueKind) -> bool {
        self == other || other == ValueKind::Any || (self == ValueKind::Int && other == ValueKind::Float)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Str => "str",
            ValueKind::Any => "any",
        };
        write!(f, "{name}")
    }
}
