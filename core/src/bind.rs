//! Signature binder: allocates tokens to parameters.
//!
//! [`SignatureBinder`] holds a command's full parameter schema — the
//! ordered positional [`ParamSpec`]s plus the name-keyed flag specs — and
//! walks a token stream against it. One cursor is shared across the whole
//! positional pass; tokens are consumed exactly once, except a single
//! token of lookahead carried between adjacent parameters when a greedy
//! or multi-value run ends.
//!
//! # Examples
//!
//! ```
//! use bosun_core::{ContainerTag, ParamSpec, SignatureBinder, TypeTag, Value};
//!
//! let binder = SignatureBinder::new(vec![
//!     ParamSpec::new("numbers", TypeTag::Int)
//!         .container(ContainerTag::List)
//!         .greedy(),
//!     ParamSpec::new("loud", TypeTag::Bool),
//! ])
//! .unwrap();
//!
//! let bound = binder.parse("1 2 3 true").unwrap();
//! assert_eq!(
//!     bound.args,
//!     vec![
//!         Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
//!         Value::Bool(true),
//!     ]
//! );
//! ```

use std::collections::{HashMap, HashSet};
use std::mem;

use serde::Serialize;

use crate::error::{BindError, BindResult};
use crate::param::{ParamOverrides, ParamSpec, SchemaError, SchemaResult};
use crate::tokenize::{TokenStream, tokenize};
use crate::value::{Value, ValueKind};

/// The outcome of binding one token stream: concrete call arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoundArgs {
    /// Positional values, in parameter declaration order.
    pub args: Vec<Value>,
    /// Flag values, keyed by canonical parameter name.
    pub kwargs: HashMap<String, Value>,
}

/// A command's parameter schema plus the binding state machine.
///
/// Binding is pure: the binder carries no mutable state between
/// invocations, so binding the same tokens twice yields identical
/// results.
#[derive(Debug)]
pub struct SignatureBinder {
    pos_params: Vec<ParamSpec>,
    kw_params: Vec<ParamSpec>,
}

impl SignatureBinder {
    /// Builds a binder from declared parameters, splitting them into
    /// positional and flag groups and checking the schema invariants.
    pub fn new(params: Vec<ParamSpec>) -> SchemaResult<Self> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut pos_params = Vec::new();
        let mut kw_params = Vec::new();

        for param in params {
            param.validate()?;
            if !seen.insert(param.name().to_string()) {
                return Err(SchemaError::DuplicateParam {
                    name: param.name().to_string(),
                });
            }
            if let Some(short) = param.short_name() {
                if !seen.insert(short.to_string()) {
                    return Err(SchemaError::DuplicateParam {
                        name: short.to_string(),
                    });
                }
            }
            if param.is_flag() {
                kw_params.push(param);
            } else {
                pos_params.push(param);
            }
        }

        Ok(Self {
            pos_params,
            kw_params,
        })
    }

    /// Positional parameters, in declaration order.
    pub fn pos_params(&self) -> &[ParamSpec] {
        &self.pos_params
    }

    /// Flag parameters, in declaration order.
    pub fn kw_params(&self) -> &[ParamSpec] {
        &self.kw_params
    }

    /// Applies an override set to the named parameter.
    ///
    /// A positional parameter that gains a short alias or the flag bit
    /// moves to the flag group.
    pub fn update_param(&mut self, name: &str, overrides: ParamOverrides) -> SchemaResult<()> {
        if let Some(i) = self.kw_params.iter().position(|p| p.name() == name) {
            return self.kw_params[i].apply_overrides(overrides);
        }

        let Some(i) = self.pos_params.iter().position(|p| p.name() == name) else {
            return Err(SchemaError::UnknownParam {
                name: name.to_string(),
            });
        };
        self.pos_params[i].apply_overrides(overrides)?;
        if self.pos_params[i].is_flag() {
            let param = self.pos_params.remove(i);
            self.kw_params.push(param);
        }
        Ok(())
    }

    /// Every accepted flag spelling mapped to its canonical name.
    fn alias_map(&self) -> HashMap<String, String> {
        let mut aliases = HashMap::new();
        for param in &self.kw_params {
            aliases.insert(param.name().to_string(), param.name().to_string());
            if let Some(short) = param.short_name() {
                aliases.insert(short.to_string(), param.name().to_string());
            }
        }
        aliases
    }

    /// Tokenizes `invocation` with the default tokenizer and binds it.
    pub fn parse(&self, invocation: &str) -> BindResult<BoundArgs> {
        let tokens = tokenize(invocation)?;
        self.bind(&tokens)
    }

    /// Binds an already-tokenized stream against this schema.
    ///
    /// A conversion error raised mid-binding is augmented with the values
    /// already produced before re-propagating.
    pub fn bind(&self, tokens: &TokenStream) -> BindResult<BoundArgs> {
        let mut args = Vec::new();
        if let Err(err) = self.bind_positional(&tokens.args, &mut args) {
            return Err(attach_partial(err, args));
        }

        let mut kwargs = HashMap::new();
        if let Err(err) = self.bind_flags(&tokens.kwargs, &mut kwargs) {
            return Err(attach_partial(err, kwargs.into_values().collect()));
        }

        Ok(BoundArgs { args, kwargs })
    }

    /// The positional pass: walks the ordered parameter list with one
    /// shared token cursor, carrying at most one typed lookahead value
    /// between steps.
    fn bind_positional(&self, args: &[String], results: &mut Vec<Value>) -> BindResult<()> {
        let n_pos = self.pos_params.len();
        let mut cursor = 0usize;
        let mut carry: Vec<Value> = Vec::new();
        let mut idx = 0usize;

        while idx < n_pos {
            let param = &self.pos_params[idx];
            let next_param = self.pos_params.get(idx + 1);

            if param.greedy {
                match next_param {
                    None => {
                        results.push(self.consume_remaining(args, &mut cursor, param, &mut carry)?);
                        idx += 1;
                        break;
                    }
                    Some(next_param) => {
                        results.push(self.consume_greedy(
                            args,
                            &mut cursor,
                            param,
                            next_param,
                            &mut carry,
                        )?);
                    }
                }
            } else if param.has_container() {
                match next_param {
                    None => {
                        results.push(self.consume_remaining(args, &mut cursor, param, &mut carry)?);
                        idx += 1;
                        break;
                    }
                    Some(_) if cursor >= args.len() && carry.is_empty() => {
                        // Exhausted before this parameter: default fallback,
                        // and everything after it falls back too.
                        results.push(self.default_for(param)?);
                        idx += 1;
                        break;
                    }
                    Some(next_param) => {
                        results.push(self.consume_nongreedy(
                            args,
                            &mut cursor,
                            param,
                            next_param,
                            &mut carry,
                        )?);
                    }
                }
            } else if let Some(carried) = carry.first().cloned() {
                // A lookahead value from the previous step belongs to this
                // scalar parameter; no new token is consumed.
                results.push(carried);
                carry.clear();
            } else if cursor < args.len() {
                results.push(param.parser.parse(&args[cursor], None)?);
                cursor += 1;
            } else {
                results.push(self.default_for(param)?);
                idx += 1;
                break;
            }

            idx += 1;
        }

        // Parameters never reached resolve via their defaults or fail.
        for param in &self.pos_params[idx..] {
            results.push(self.default_for(param)?);
        }

        if cursor < args.len() {
            return Err(BindError::TooManyArguments {
                remainder: args[cursor..].join("', '"),
            });
        }
        Ok(())
    }

    /// Greedy step: accumulate while this parameter's parser accepts the
    /// token; the first rejected token must parse under the next
    /// parameter and is carried forward.
    fn consume_greedy(
        &self,
        args: &[String],
        cursor: &mut usize,
        param: &ParamSpec,
        next_param: &ParamSpec,
        carry: &mut Vec<Value>,
    ) -> BindResult<Value> {
        while *cursor < args.len() {
            let token = &args[*cursor];
            match param.parser.parse(token, None) {
                Ok(value) => {
                    carry.push(value);
                    *cursor += 1;
                }
                Err(_) => {
                    let values = mem::take(carry);
                    let result = param.container.parse(values, param.default.as_ref())?;
                    // The boundary token opens the next parameter; if it
                    // fails there too, that error propagates.
                    carry.push(next_param.parser.parse(token, None)?);
                    *cursor += 1;
                    return Ok(result);
                }
            }
        }

        let values = mem::take(carry);
        Ok(param.container.parse(values, param.default.as_ref())?)
    }

    /// Non-greedy multi-value step: the first token always belongs to
    /// this parameter; afterwards, stop as soon as the next parameter's
    /// parser accepts a token (carrying that parsed value forward).
    fn consume_nongreedy(
        &self,
        args: &[String],
        cursor: &mut usize,
        param: &ParamSpec,
        next_param: &ParamSpec,
        carry: &mut Vec<Value>,
    ) -> BindResult<Value> {
        if *cursor < args.len() {
            carry.push(param.parser.parse(&args[*cursor], None)?);
            *cursor += 1;
        }

        while *cursor < args.len() {
            let token = &args[*cursor];
            match next_param.parser.parse(token, None) {
                Ok(next_value) => {
                    let values = mem::take(carry);
                    let result = param.container.parse(values, param.default.as_ref())?;
                    carry.push(next_value);
                    *cursor += 1;
                    return Ok(result);
                }
                Err(_) => {
                    carry.push(param.parser.parse(token, None)?);
                    *cursor += 1;
                }
            }
        }

        let values = mem::take(carry);
        Ok(param.container.parse(values, param.default.as_ref())?)
    }

    /// Final container parameter: everything left belongs to it.
    fn consume_remaining(
        &self,
        args: &[String],
        cursor: &mut usize,
        param: &ParamSpec,
        carry: &mut Vec<Value>,
    ) -> BindResult<Value> {
        while *cursor < args.len() {
            carry.push(param.parser.parse(&args[*cursor], None)?);
            *cursor += 1;
        }
        let values = mem::take(carry);
        Ok(param.container.parse(values, param.default.as_ref())?)
    }

    /// Default fallback for a parameter that received no tokens: the
    /// default is wrapped through the container parser as a one-element
    /// sequence. No default means a fatal arity error.
    fn default_for(&self, param: &ParamSpec) -> BindResult<Value> {
        let Some(default) = &param.default else {
            return Err(BindError::MissingArgument {
                name: param.name().to_string(),
            });
        };
        Ok(param.container.parse(vec![default.clone()], None)?)
    }

    /// The flag pass: validate names, resolve aliases, then bind each
    /// declared flag. Boolean-typed flags are presence flags.
    fn bind_flags(
        &self,
        kwargs: &HashMap<String, Vec<String>>,
        results: &mut HashMap<String, Value>,
    ) -> BindResult<()> {
        let aliases = self.alias_map();

        let mut unknown: Vec<String> = kwargs
            .keys()
            .filter(|key| !aliases.contains_key(key.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(BindError::UnknownFlags(unknown));
        }

        // Resolve aliases; occurrences under both spellings merge.
        let mut unaliased: HashMap<&str, Vec<&str>> = HashMap::new();
        for (key, values) in kwargs {
            unaliased
                .entry(aliases[key.as_str()].as_str())
                .or_default()
                .extend(values.iter().map(String::as_str));
        }

        for param in &self.kw_params {
            let name = param.name();

            if param.parser.kind() == ValueKind::Bool {
                // Presence flag: value occurrences are ignored.
                results.insert(name.to_string(), Value::Bool(unaliased.contains_key(name)));
                continue;
            }

            let mut carry = Vec::new();
            if let Some(values) = unaliased.get(name) {
                for token in values {
                    carry.push(param.parser.parse(token, None)?);
                }
            }

            if param.has_container() {
                results.insert(
                    name.to_string(),
                    param.container.parse(carry, param.default.as_ref())?,
                );
            } else if carry.len() > 1 {
                return Err(BindError::TooManyValues {
                    name: name.to_string(),
                    target: param.parser.type_name().to_string(),
                });
            } else if let Some(value) = carry.pop() {
                results.insert(name.to_string(), value);
            } else {
                results.insert(name.to_string(), self.default_for(param)?);
            }
        }

        Ok(())
    }
}

fn attach_partial(err: BindError, partial: Vec<Value>) -> BindError {
    match err {
        BindError::Conversion(conversion) => {
            BindError::Conversion(conversion.with_partial(partial))
        }
        other => other,
    }
}
