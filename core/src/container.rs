//! Container parsers: assemble already-typed values into one aggregate.
//!
//! A container parser receives the sequence of values a parameter
//! collected and produces the final bound value. The
//! [`UnpackParser`] sentinel means "no container": exactly one value is
//! expected and passed through.

use std::fmt;

use crate::error::ConversionError;
use crate::value::Value;

/// Converts a sequence of already-typed values into one aggregate
/// [`Value`].
pub trait ContainerParser: fmt::Debug + Send + Sync {
    /// Assembles `values`, or returns `default` where the variant's rules
    /// allow a default to stand in.
    fn parse(&self, values: Vec<Value>, default: Option<&Value>) -> Result<Value, ConversionError>;

    /// `true` for the "no container" sentinel. Parameters whose container
    /// is unpack bind exactly one value.
    fn is_unpack(&self) -> bool {
        false
    }

    /// Container name used in error messages.
    fn type_name(&self) -> &str;
}

fn render(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Wraps values into an ordered [`Value::List`].
#[derive(Debug, Clone, Copy)]
pub struct SequenceParser;

impl ContainerParser for SequenceParser {
    fn parse(&self, values: Vec<Value>, _default: Option<&Value>) -> Result<Value, ConversionError> {
        Ok(Value::List(values))
    }

    fn type_name(&self) -> &str {
        "list"
    }
}

/// Wraps values into a deduplicated, insertion-ordered [`Value::Set`].
#[derive(Debug, Clone, Copy)]
pub struct SetParser;

impl ContainerParser for SetParser {
    fn parse(&self, values: Vec<Value>, _default: Option<&Value>) -> Result<Value, ConversionError> {
        let mut items: Vec<Value> = Vec::with_capacity(values.len());
        for value in values {
            if !items.contains(&value) {
                items.push(value);
            }
        }
        Ok(Value::Set(items))
    }

    fn type_name(&self) -> &str {
        "set"
    }
}

/// The "no container" sentinel: requires exactly one value.
///
/// Zero values resolves to the default, or fails with an arity cause.
/// More than one value always fails; a default does not rescue that case.
#[derive(Debug, Clone, Copy)]
pub struct UnpackParser;

impl ContainerParser for UnpackParser {
    fn parse(&self, values: Vec<Value>, default: Option<&Value>) -> Result<Value, ConversionError> {
        let mut values = values;
        if values.len() > 1 {
            return Err(ConversionError::new(
                render(&values),
                self.type_name(),
                "more than 1 argument for a parameter without a container type",
            ));
        }
        match values.pop() {
            Some(value) => Ok(value),
            None => match default {
                Some(default) => Ok(default.clone()),
                None => Err(ConversionError::new(
                    "",
                    self.type_name(),
                    "0 arguments for required parameter",
                )),
            },
        }
    }

    fn is_unpack(&self) -> bool {
        true
    }

    fn type_name(&self) -> &str {
        "unpack"
    }
}

/// Joins string values with a separator into one [`Value::Str`].
///
/// All inputs must be strings; zero inputs yields the default or fails.
#[derive(Debug, Clone)]
pub struct JoinedParser {
    pub separator: String,
}

impl JoinedParser {
    /// Joins with the given separator.
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for JoinedParser {
    /// Joins with a single space.
    fn default() -> Self {
        Self::new(" ")
    }
}

impl ContainerParser for JoinedParser {
    fn parse(&self, values: Vec<Value>, default: Option<&Value>) -> Result<Value, ConversionError> {
        if values.is_empty() {
            return match default {
                Some(default) => Ok(default.clone()),
                None => Err(ConversionError::new(
                    "",
                    self.type_name(),
                    "0 arguments for required parameter",
                )),
            };
        }

        let mut parts: Vec<&str> = Vec::with_capacity(values.len());
        for value in &values {
            match value.as_str() {
                Some(s) => parts.push(s),
                None => {
                    return Err(ConversionError::new(
                        render(&values),
                        self.type_name(),
                        format!("joined strings require string segments, got '{value}'"),
                    ));
                }
            }
        }
        Ok(Value::Str(parts.join(&self.separator)))
    }

    fn type_name(&self) -> &str {
        "joined string"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_preserves_order() {
        let value = SequenceParser
            .parse(vec![Value::Int(2), Value::Int(1)], None)
            .unwrap();
        assert_eq!(value, Value::List(vec![Value::Int(2), Value::Int(1)]));
    }

    #[test]
    fn test_set_deduplicates_in_order() {
        let value = SetParser
            .parse(
                vec![Value::Int(1), Value::Int(2), Value::Int(1)],
                None,
            )
            .unwrap();
        assert_eq!(value, Value::Set(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_unpack_passes_single_value() {
        let value = UnpackParser.parse(vec![Value::Bool(true)], None).unwrap();
        assert_eq!(value, Value::Bool(true));
    }

    #[test]
    fn test_unpack_zero_values_needs_default() {
        let err = UnpackParser.parse(vec![], None).unwrap_err();
        assert!(err.cause.contains("0 arguments"));

        let value = UnpackParser.parse(vec![], Some(&Value::Int(9))).unwrap();
        assert_eq!(value, Value::Int(9));
    }

    #[test]
    fn test_unpack_rejects_multiple_even_with_default() {
        let err = UnpackParser
            .parse(
                vec![Value::Int(1), Value::Int(2)],
                Some(&Value::Int(9)),
            )
            .unwrap_err();
        assert!(err.cause.contains("more than 1 argument"));
    }

    #[test]
    fn test_joined_uses_separator() {
        let parser = JoinedParser::new(", ");
        let value = parser
            .parse(vec![Value::Str("a".into()), Value::Str("b".into())], None)
            .unwrap();
        assert_eq!(value, Value::Str("a, b".into()));
    }

    #[test]
    fn test_joined_default_separator_is_space() {
        let value = JoinedParser::default()
            .parse(vec![Value::Str("a".into()), Value::Str("b".into())], None)
            .unwrap();
        assert_eq!(value, Value::Str("a b".into()));
    }

    #[test]
    fn test_joined_rejects_non_strings() {
        let err = JoinedParser::default()
            .parse(vec![Value::Str("a".into()), Value::Int(1)], None)
            .unwrap_err();
        assert!(err.cause.contains("string segments"));
    }

    #[test]
    fn test_joined_zero_inputs() {
        assert!(JoinedParser::default().parse(vec![], None).is_err());
        let value = JoinedParser::default()
            .parse(vec![], Some(&Value::Str("fallback".into())))
            .unwrap();
        assert_eq!(value, Value::Str("fallback".into()));
    }
}
