//! Core invocation pipeline: tokenizer, type parsers, and signature
//! binder.
//!
//! This crate turns one raw chat message into typed call arguments:
//!
//! - [`tokenize`] — splits an invocation string into positional tokens
//!   and flag occurrences, honoring quoting and escaping.
//! - [`TypeParser`] — converts a single token into a typed [`Value`]
//!   ([`NumberParser`], [`BoolParser`], [`StringParser`],
//!   [`UnionParser`]).
//! - [`ContainerParser`] — assembles a parameter's collected values into
//!   one aggregate ([`SequenceParser`], [`SetParser`], [`JoinedParser`],
//!   or the no-container [`UnpackParser`]).
//! - [`ParamSpec`] — one declared parameter: parser, container, default,
//!   short alias, greedy/flag bits.
//! - [`SignatureBinder`] — walks a token stream against the declared
//!   parameters and produces [`BoundArgs`].
//!
//! Everything here is synchronous and CPU-only; command registration and
//! dispatch live in the `bosun-dispatch` crate.
//!
//! # Example
//!
//! ```
//! use bosun_core::{ContainerTag, ParamSpec, SignatureBinder, TypeTag, Value};
//!
//! let binder = SignatureBinder::new(vec![
//!     ParamSpec::new("sides", TypeTag::Int)
//!         .container(ContainerTag::List)
//!         .greedy(),
//!     ParamSpec::new("label", TypeTag::Str).default_value(Value::Str("roll".into())),
//!     ParamSpec::new("verbose", TypeTag::Bool).short('v'),
//! ])
//! .unwrap();
//!
//! let bound = binder.parse("6 20 lucky -v").unwrap();
//! assert_eq!(
//!     bound.args,
//!     vec![
//!         Value::List(vec![Value::Int(6), Value::Int(20)]),
//!         Value::Str("lucky".into()),
//!     ]
//! );
//! assert_eq!(bound.kwargs["verbose"], Value::Bool(true));
//! ```

mod bind;
mod container;
mod error;
mod param;
mod scalar;
mod tokenize;
mod value;

pub use bind::{BoundArgs, SignatureBinder};
pub use container::{ContainerParser, JoinedParser, SequenceParser, SetParser, UnpackParser};
pub use error::{BindError, BindResult, ConversionError, TokenizeError};
pub use param::{ContainerTag, ParamOverrides, ParamSpec, SchemaError, SchemaResult, TypeTag};
pub use scalar::{BoolParser, NumberParser, StringParser, TypeParser, UnionParser};
pub use tokenize::{TokenStream, TokenizeFn, tokenize};
pub use value::{Value, ValueKind};
