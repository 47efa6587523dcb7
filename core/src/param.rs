//! Parameter schema: per-parameter metadata and its validation rules.
//!
//! A [`ParamSpec`] describes one declared command parameter: its type
//! parser, container parser, default, optional short alias, and the
//! greedy/flag bits. Specs are normally built from the closed
//! [`TypeTag`]/[`ContainerTag`] sets — the parser selection happens once,
//! when the command is built, never at invocation time — but custom
//! parser implementations can be plugged in directly.
//!
//! # Examples
//!
//! ```
//! use bosun_core::{ContainerTag, ParamSpec, TypeTag, Value};
//!
//! let count = ParamSpec::new("count", TypeTag::Int).default_value(Value::Int(1));
//! let tags = ParamSpec::new("tags", TypeTag::Str)
//!     .container(ContainerTag::List)
//!     .short('t');
//! assert!(tags.is_flag());
//! ```

use thiserror::Error;

use crate::container::{
    ContainerParser, JoinedParser, SequenceParser, SetParser, UnpackParser,
};
use crate::scalar::{BoolParser, NumberParser, StringParser, TypeParser, UnionParser};
use crate::value::{Value, ValueKind};

/// Closed set of semantic scalar types a parameter can declare.
///
/// Each tag maps to one built-in [`TypeParser`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    /// Signed whole number.
    Int,
    /// Whole number that rejects negative input.
    UInt,
    /// Signed floating-point number (with `pi`/`e`/`tau` constants).
    Float,
    /// Floating-point number that rejects negative input.
    UFloat,
    /// Boolean token.
    Bool,
    /// Verbatim string.
    Str,
    /// Ordered union of member types, tried left to right.
    Union(Vec<TypeTag>),
}

impl TypeTag {
    /// Builds the parser this tag stands for.
    pub fn into_parser(self) -> Box<dyn TypeParser> {
        match self {
            TypeTag::Int => Box::new(NumberParser::int()),
            TypeTag::UInt => Box::new(NumberParser::uint()),
            TypeTag::Float => Box::new(NumberParser::float()),
            TypeTag::UFloat => Box::new(NumberParser::ufloat()),
            TypeTag::Bool => Box::new(BoolParser),
            TypeTag::Str => Box::new(StringParser),
            TypeTag::Union(members) => Box::new(UnionParser::new(
                members.into_iter().map(TypeTag::into_parser).collect(),
            )),
        }
    }
}

/// Closed set of container shapes a parameter can declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerTag {
    /// No container: exactly one value.
    Unpack,
    /// Ordered list of values.
    List,
    /// Insertion-ordered, deduplicated set of values.
    Set,
    /// String segments joined with the given separator.
    Joined(String),
}

impl ContainerTag {
    /// Joined-string tag with the default single-space separator.
    pub fn joined() -> Self {
        ContainerTag::Joined(" ".to_string())
    }

    /// Builds the container parser this tag stands for.
    pub fn into_parser(self) -> Box<dyn ContainerParser> {
        match self {
            ContainerTag::Unpack => Box::new(UnpackParser),
            ContainerTag::List => Box::new(SequenceParser),
            ContainerTag::Set => Box::new(SetParser),
            ContainerTag::Joined(separator) => Box::new(JoinedParser::new(separator)),
        }
    }
}

/// Schema-definition errors.
///
/// These are programming errors surfaced when a command is built or a
/// parameter is overridden, never at invocation time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A greedy parameter was declared without a container.
    #[error("greedy parameter '{name}' must have a container type")]
    GreedyWithoutContainer { name: String },

    /// A flag parameter was declared greedy.
    #[error("flag parameter '{name}' cannot be greedy")]
    GreedyFlag { name: String },

    /// Two parameters share a name (or a short alias collides).
    #[error("duplicate parameter name '{name}'")]
    DuplicateParam { name: String },

    /// An override referenced a parameter that does not exist.
    #[error("no parameter named '{name}'")]
    UnknownParam { name: String },

    /// An override parser produces values the original did not declare.
    #[error(
        "override parser for '{name}' produces {found}, which is not a subkind of {expected}"
    )]
    IncompatibleParser {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// An override tried to remove an existing container.
    #[error("cannot override container parameter '{name}' to have no container")]
    IncompatibleContainer { name: String },

    /// An override supplied a default where one already exists.
    #[error("a default for '{name}' was already provided")]
    DefaultAlreadySet { name: String },

    /// An override tried to turn a flag back into a positional.
    #[error("cannot override flag parameter '{name}' to be positional")]
    FlagRevoked { name: String },

    /// An override tried to turn a greedy parameter non-greedy.
    #[error("cannot override greedy parameter '{name}' to be non-greedy")]
    GreedyRevoked { name: String },
}

/// Convenience alias for schema-definition results.
pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

/// Metadata for one declared command parameter.
#[derive(Debug)]
pub struct ParamSpec {
    pub(crate) name: String,
    pub(crate) parser: Box<dyn TypeParser>,
    pub(crate) container: Box<dyn ContainerParser>,
    pub(crate) default: Option<Value>,
    pub(crate) short: Option<char>,
    pub(crate) greedy: bool,
    pub(crate) flag: bool,
}

impl ParamSpec {
    /// Creates a positional, container-less parameter from a type tag.
    pub fn new(name: impl Into<String>, tag: TypeTag) -> Self {
        Self::with_parser(name, tag.into_parser())
    }

    /// Creates a parameter around a custom type parser.
    pub fn with_parser(name: impl Into<String>, parser: Box<dyn TypeParser>) -> Self {
        Self {
            name: name.into(),
            parser,
            container: Box::new(UnpackParser),
            default: None,
            short: None,
            greedy: false,
            flag: false,
        }
    }

    /// Sets the container shape.
    pub fn container(mut self, tag: ContainerTag) -> Self {
        self.container = tag.into_parser();
        self
    }

    /// Sets a custom container parser.
    pub fn container_parser(mut self, container: Box<dyn ContainerParser>) -> Self {
        self.container = container;
        self
    }

    /// Sets the default value used when no token reaches this parameter.
    pub fn default_value(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets a one-character alias and thereby makes this parameter a flag.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Marks this parameter greedy: it consumes tokens until the next
    /// parameter's parser accepts one.
    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    /// Marks this parameter a flag, bound by name rather than position.
    pub fn flag(mut self) -> Self {
        self.flag = true;
        self
    }

    /// The parameter's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The short alias, if any.
    pub fn short_name(&self) -> Option<char> {
        self.short
    }

    /// `true` when bound by name: explicitly flagged or given a short
    /// alias.
    pub fn is_flag(&self) -> bool {
        self.flag || self.short.is_some()
    }

    /// `true` when the parameter collects multiple values.
    pub fn has_container(&self) -> bool {
        !self.container.is_unpack()
    }

    /// Checks the declaration invariants: greedy needs a container, and
    /// flags cannot be greedy.
    pub(crate) fn validate(&self) -> SchemaResult<()> {
        if self.greedy && !self.has_container() {
            return Err(SchemaError::GreedyWithoutContainer {
                name: self.name.clone(),
            });
        }
        if self.greedy && self.is_flag() {
            return Err(SchemaError::GreedyFlag {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Applies an override set, enforcing the type-safety rules: the
    /// replacement parser must produce a subkind of the original's kind,
    /// a container cannot be removed, a signature default cannot be
    /// replaced, and the flag/greedy bits can only be strengthened.
    pub fn apply_overrides(&mut self, overrides: ParamOverrides) -> SchemaResult<()> {
        if let Some(parser) = overrides.parser {
            if !parser.kind().is_subkind_of(self.parser.kind()) {
                return Err(SchemaError::IncompatibleParser {
                    name: self.name.clone(),
                    expected: self.parser.kind(),
                    found: parser.kind(),
                });
            }
            self.parser = parser;
        }

        if let Some(container) = overrides.container {
            if self.has_container() && container.is_unpack() {
                return Err(SchemaError::IncompatibleContainer {
                    name: self.name.clone(),
                });
            }
            self.container = container;
        }

        if let Some(default) = overrides.default {
            if self.default.is_some() {
                return Err(SchemaError::DefaultAlreadySet {
                    name: self.name.clone(),
                });
            }
            self.default = Some(default);
        }

        if let Some(short) = overrides.short {
            self.short = Some(short);
        }

        if let Some(greedy) = overrides.greedy {
            if greedy && self.is_flag() {
                return Err(SchemaError::GreedyFlag {
                    name: self.name.clone(),
                });
            }
            if !greedy && self.greedy {
                return Err(SchemaError::GreedyRevoked {
                    name: self.name.clone(),
                });
            }
            self.greedy = greedy;
        }

        if let Some(flag) = overrides.flag {
            if !flag && self.is_flag() {
                return Err(SchemaError::FlagRevoked {
                    name: self.name.clone(),
                });
            }
            self.flag = flag;
        }

        self.validate()
    }
}

/// Explicit override set for one parameter.
///
/// All fields are optional; only the supplied ones are applied, each with
/// its own compatibility check. See [`ParamSpec::apply_overrides`].
#[derive(Debug, Default)]
pub struct ParamOverrides {
    pub parser: Option<Box<dyn TypeParser>>,
    pub container: Option<Box<dyn ContainerParser>>,
    pub default: Option<Value>,
    pub short: Option<char>,
    pub greedy: Option<bool>,
    pub flag: Option<bool>,
}

impl ParamOverrides {
    /// An empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the type parser (subject to the subkind check).
    pub fn parser(mut self, parser: Box<dyn TypeParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Replaces the container from a tag.
    pub fn container(mut self, tag: ContainerTag) -> Self {
        self.container = Some(tag.into_parser());
        self
    }

    /// Replaces the container with a custom parser.
    pub fn container_parser(mut self, container: Box<dyn ContainerParser>) -> Self {
        self.container = Some(container);
        self
    }

    /// Supplies a default (rejected when one already exists).
    pub fn default_value(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Adds a short alias (makes the parameter a flag).
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Sets the greedy bit.
    pub fn greedy(mut self, greedy: bool) -> Self {
        self.greedy = Some(greedy);
        self
    }

    /// Sets the flag bit.
    pub fn flag(mut self, flag: bool) -> Self {
        self.flag = Some(flag);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::TypeParser;

    #[test]
    fn test_greedy_requires_container() {
        let spec = ParamSpec::new("items", TypeTag::Int).greedy();
        assert_eq!(
            spec.validate(),
            Err(SchemaError::GreedyWithoutContainer {
                name: "items".into()
            })
        );

        let spec = ParamSpec::new("items", TypeTag::Int)
            .container(ContainerTag::List)
            .greedy();
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_flags_cannot_be_greedy() {
        let spec = ParamSpec::new("tags", TypeTag::Str)
            .container(ContainerTag::List)
            .short('t')
            .greedy();
        assert_eq!(
            spec.validate(),
            Err(SchemaError::GreedyFlag {
                name: "tags".into()
            })
        );
    }

    #[test]
    fn test_short_alias_implies_flag() {
        let spec = ParamSpec::new("verbose", TypeTag::Bool).short('v');
        assert!(spec.is_flag());
        let spec = ParamSpec::new("verbose", TypeTag::Bool);
        assert!(!spec.is_flag());
    }

    #[test]
    fn test_union_tag_builds_named_union() {
        let parser = TypeTag::Union(vec![TypeTag::Int, TypeTag::Str]).into_parser();
        assert_eq!(parser.type_name(), "int | str");
    }

    #[test]
    fn test_override_parser_subkind_check() {
        let mut spec = ParamSpec::new("level", TypeTag::Float);
        // Int is a subkind of Float: allowed.
        let ok = spec.apply_overrides(
            ParamOverrides::new().parser(TypeTag::Int.into_parser()),
        );
        assert!(ok.is_ok());

        let mut spec = ParamSpec::new("level", TypeTag::Int);
        let err = spec.apply_overrides(
            ParamOverrides::new().parser(TypeTag::Str.into_parser()),
        );
        assert_eq!(
            err,
            Err(SchemaError::IncompatibleParser {
                name: "level".into(),
                expected: ValueKind::Int,
                found: ValueKind::Str,
            })
        );
    }

    #[test]
    fn test_override_cannot_remove_container() {
        let mut spec = ParamSpec::new("items", TypeTag::Int).container(ContainerTag::List);
        let err = spec.apply_overrides(ParamOverrides::new().container(ContainerTag::Unpack));
        assert_eq!(
            err,
            Err(SchemaError::IncompatibleContainer {
                name: "items".into()
            })
        );
    }

    #[test]
    fn test_override_rejects_second_default() {
        let mut spec = ParamSpec::new("n", TypeTag::Int).default_value(Value::Int(1));
        let err = spec.apply_overrides(ParamOverrides::new().default_value(Value::Int(2)));
        assert_eq!(err, Err(SchemaError::DefaultAlreadySet { name: "n".into() }));
    }

    #[test]
    fn test_override_cannot_revoke_flag_or_greedy() {
        let mut spec = ParamSpec::new("v", TypeTag::Bool).short('v');
        assert_eq!(
            spec.apply_overrides(ParamOverrides::new().flag(false)),
            Err(SchemaError::FlagRevoked { name: "v".into() })
        );

        let mut spec = ParamSpec::new("items", TypeTag::Int)
            .container(ContainerTag::List)
            .greedy();
        assert_eq!(
            spec.apply_overrides(ParamOverrides::new().greedy(false)),
            Err(SchemaError::GreedyRevoked {
                name: "items".into()
            })
        );
    }
}
