//! Custom parser example.
//!
//! Demonstrates plugging a hand-written [`TypeParser`] (hexadecimal
//! integers) and a hand-written [`ContainerParser`] (averaging collected
//! numbers) into a command signature, plus overriding a declared
//! parameter's parser with a subkind-compatible replacement.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p bosun-demos --example custom_parsers
//! ```

use bosun_core::{
    ContainerParser, ConversionError, ParamOverrides, ParamSpec, TypeParser, TypeTag, Value,
    ValueKind,
};
use bosun_dispatch::{Command, Dispatcher, Message};

/// Parses hexadecimal integers, with or without a `0x` prefix.
#[derive(Debug)]
struct HexParser;

impl TypeParser for HexParser {
    fn parse(&self, token: &str, default: Option<&Value>) -> Result<Value, ConversionError> {
        let digits = token.strip_prefix("0x").unwrap_or(token);
        match i64::from_str_radix(digits, 16) {
            Ok(value) => Ok(Value::Int(value)),
            Err(err) => match default {
                Some(default) => Ok(default.clone()),
                None => Err(ConversionError::new(token, "hex", err.to_string())),
            },
        }
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Int
    }

    fn type_name(&self) -> &str {
        "hex"
    }
}

/// Averages the collected numbers into one float.
#[derive(Debug)]
struct Averaged;

impl ContainerParser for Averaged {
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
        let mut total = 0.0;
        for value in &values {
            match value.as_float() {
                Some(n) => total += n,
                None => {
                    return Err(ConversionError::new(
                        value.to_string(),
                        self.type_name(),
                        "average requires numeric values",
                    ));
                }
            }
        }
        Ok(Value::Float(total / values.len() as f64))
    }

    fn type_name(&self) -> &str {
        "average"
    }
}

#[tokio::main]
async fn main() {
    let dispatcher = Dispatcher::with_prefix(["!"]);

    dispatcher
        .register(
            Command::builder("hex", |ctx| async move {
                println!("  parsed: {:?}", ctx.arg(0));
                Ok(())
            })
            .description("Echoes a hexadecimal integer.")
            .param(ParamSpec::with_parser("value", Box::new(HexParser)))
            .build()
            .unwrap(),
        )
        .await
        .unwrap();

    dispatcher
        .register(
            Command::builder("avg", |ctx| async move {
                println!("  average: {:?}", ctx.arg(0));
                Ok(())
            })
            .description("Averages the given numbers.")
            // Declared as floats, then narrowed to ints by override: Int is
            // a subkind of Float, so the override passes the compatibility
            // check.
            .param(ParamSpec::new("numbers", TypeTag::Float).container_parser(Box::new(Averaged)))
            .override_param("numbers", ParamOverrides::new().parser(TypeTag::Int.into_parser()))
            .build()
            .unwrap(),
        )
        .await
        .unwrap();

    let script = [
        Message::new("alice", "!hex 0xff"),
        Message::new("alice", "!hex cafe"),
        Message::new("bob", "!avg 1 2 3 4"),
        Message::new("bob", "!avg 1 2.5"),
    ];

    for message in script {
        println!("<{}> {}", message.author, message.content);
        if let Err(err) = dispatcher.dispatch(message).await {
            println!("  !! {err}");
        }
    }
}
