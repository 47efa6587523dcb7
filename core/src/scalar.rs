//! Type parsers: convert a single string token into a typed [`Value`].
//!
//! Each parser implements [`TypeParser`]. When conversion fails and a
//! default was supplied, the default is returned instead of the error.
//!
//! # Examples
//!
//! ```
//! use bosun_core::{BoolParser, NumberParser, TypeParser, Value};
//!
//! let float = NumberParser::float();
//! assert_eq!(float.parse("tau", None).unwrap(), Value::Float(std::f64::consts::TAU));
//!
//! let flag = BoolParser;
//! assert_eq!(flag.parse("YES", None).unwrap(), Value::Bool(true));
//! ```

use std::fmt;

use crate::error::ConversionError;
use crate::value::{Value, ValueKind};

/// Converts one string token into a typed [`Value`].
///
/// Implementations must be stateless with respect to parsing: parsing the
/// same token twice yields the same result. Custom parsers plug into a
/// command schema through
/// [`ParamSpec::with_parser`](crate::ParamSpec::with_parser) or an
/// override.
pub trait TypeParser: fmt::Debug + Send + Sync {
    /// Parses `token`, or returns `default` when conversion fails and a
    /// default is present.
    fn parse(&self, token: &str, default: Option<&Value>) -> Result<Value, ConversionError>;

    /// Semantic kind of the values this parser produces, for override
    /// compatibility checks.
    fn kind(&self) -> ValueKind;

    /// Target type name used in error messages.
    fn type_name(&self) -> &str;
}

/// Parses whole or decimal numbers.
///
/// Decimal mode recognizes the case-insensitive constants `pi`, `e`, and
/// `tau` before falling back to standard float parsing. With
/// `signed = false`, a successfully parsed negative value is reported as
/// a conversion error rather than accepted.
#[derive(Debug, Clone, Copy)]
pub struct NumberParser {
    pub signed: bool,
    pub decimal: bool,
}

impl NumberParser {
    /// Signed integer parser.
    pub fn int() -> Self {
        Self {
            signed: true,
            decimal: false,
        }
    }

    /// Unsigned integer parser: negative inputs are rejected.
    pub fn uint() -> Self {
        Self {
            signed: false,
            decimal: false,
        }
    }

    /// Signed float parser.
    pub fn float() -> Self {
        Self {
            signed: true,
            decimal: true,
        }
    }

    /// Unsigned float parser: negative inputs are rejected.
    pub fn ufloat() -> Self {
        Self {
            signed: false,
            decimal: true,
        }
    }

    fn parse_number(&self, token: &str) -> Result<Value, String> {
        if self.decimal {
            match token.to_ascii_lowercase().as_str() {
                "pi" => Ok(Value::Float(std::f64::consts::PI)),
                "e" => Ok(Value::Float(std::f64::consts::E)),
                "tau" => Ok(Value::Float(std::f64::consts::TAU)),
                _ => token
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|e| e.to_string()),
            }
        } else {
            token
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| e.to_string())
        }
    }
}

fn is_negative(value: &Value) -> bool {
    match value {
        Value::Int(i) => *i < 0,
        Value::Float(f) => *f < 0.0,
        _ => false,
    }
}

impl TypeParser for NumberParser {
    fn parse(&self, token: &str, default: Option<&Value>) -> Result<Value, ConversionError> {
        match self.parse_number(token) {
            Ok(value) => {
                if !self.signed && is_negative(&value) {
                    if let Some(default) = default {
                        return Ok(default.clone());
                    }
                    return Err(ConversionError::new(
                        token,
                        self.type_name(),
                        format!("'{value}' is not a valid unsigned number"),
                    ));
                }
                Ok(value)
            }
            Err(cause) => match default {
                Some(default) => Ok(default.clone()),
                None => Err(ConversionError::new(token, self.type_name(), cause)),
            },
        }
    }

    fn kind(&self) -> ValueKind {
        if self.decimal {
            ValueKind::Float
        } else {
            ValueKind::Int
        }
    }

    fn type_name(&self) -> &str {
        match (self.decimal, self.signed) {
            (false, true) => "int",
            (false, false) => "uint",
            (true, true) => "float",
            (true, false) => "ufloat",
        }
    }
}

/// Parses boolean tokens.
///
/// Accepts `yes`/`y`/`true`/`t`/`1` and `no`/`n`/`false`/`f`/`0`,
/// case-insensitively.
#[derive(Debug, Clone, Copy)]
pub struct BoolParser;

impl TypeParser for BoolParser {
    fn parse(&self, token: &str, default: Option<&Value>) -> Result<Value, ConversionError> {
        match token.to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "t" | "1" => Ok(Value::Bool(true)),
            "no" | "n" | "false" | "f" | "0" => Ok(Value::Bool(false)),
            _ => match default {
                Some(default) => Ok(default.clone()),
                None => Err(ConversionError::new(
                    token,
                    "bool",
                    format!("'{token}' is not a valid boolean"),
                )),
            },
        }
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Bool
    }

    fn type_name(&self) -> &str {
        "bool"
    }
}

/// Passes string tokens through verbatim. Never fails: an empty token
/// yields the default when present, else the empty string.
#[derive(Debug, Clone, Copy)]
pub struct StringParser;

impl TypeParser for StringParser {
    fn parse(&self, token: &str, default: Option<&Value>) -> Result<Value, ConversionError> {
        if !token.is_empty() {
            return Ok(Value::Str(token.to_string()));
        }
        match default {
            Some(default) => Ok(default.clone()),
            None => Ok(Value::Str(String::new())),
        }
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Str
    }

    fn type_name(&self) -> &str {
        "str"
    }
}

/// Tries an ordered list of sub-parsers, returning the first success.
///
/// On total failure the error names every attempted target type, e.g.
/// `int | str`.
#[derive(Debug)]
pub struct UnionParser {
    parsers: Vec<Box<dyn TypeParser>>,
    name: String,
}

impl UnionParser {
    /// Builds a union over `parsers`, tried in the given order.
    pub fn new(parsers: Vec<Box<dyn TypeParser>>) -> Self {
        let name = parsers
            .iter()
            .map(|p| p.type_name())
            .collect::<Vec<_>>()
            .join(" | ");
        Self { parsers, name }
    }
}

impl TypeParser for UnionParser {
    fn parse(&self, token: &str, default: Option<&Value>) -> Result<Value, ConversionError> {
        for parser in &self.parsers {
            if let Ok(value) = parser.parse(token, None) {
                return Ok(value);
            }
        }
        match default {
            Some(default) => Ok(default.clone()),
            None => Err(ConversionError::new(
                token,
                &self.name,
                format!("no member of '{}' accepted the token", self.name),
            )),
        }
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Any
    }

    fn type_name(&self) -> &str {
        &self.name
    }
}
