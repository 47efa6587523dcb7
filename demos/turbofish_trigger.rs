//! Custom trigger strategy example.
//!
//! Demonstrates replacing the default prefix trigger with a regex-based
//! strategy: commands are addressed turbofish-style, `bot::<name> args`.
//! Any `Fn(&str) -> Option<Invocation>` closure is a [`TriggerStrategy`],
//! so no trait impl is needed.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p bosun-demos --example turbofish_trigger
//! ```

use bosun_core::{ParamSpec, TypeTag, Value};
use bosun_dispatch::{Command, Dispatcher, Invocation, Message};
use regex::Regex;

#[tokio::main]
async fn main() {
    let pattern = Regex::new(r"^bot::<(?P<command>\w+)>\s*(?P<invocation>.*)$")
        .expect("hardcoded pattern is valid");

    let turbofish = move |content: &str| {
        let captures = pattern.captures(content.trim())?;
        Some(Invocation {
            trigger: "bot::<>".to_string(),
            command: captures["command"].to_string(),
            invocation: captures["invocation"].to_string(),
        })
    };

    let dispatcher = Dispatcher::new(turbofish);
    dispatcher
        .register(
            Command::builder("double", |ctx| async move {
                let n = ctx.arg(0).and_then(Value::as_int).unwrap_or(0);
                println!("  {n} doubled is {}", n * 2);
                Ok(())
            })
            .description("Doubles an integer.")
            .param(ParamSpec::new("n", TypeTag::Int))
            .build()
            .unwrap(),
        )
        .await
        .unwrap();

    let script = [
        Message::new("alice", "bot::<double> 21"),
        Message::new("alice", "double 21"),
        Message::new("bob", "bot::<unknown> 1"),
    ];

    for message in script {
        println!("<{}> {}", message.author, message.content);
        if let Err(err) = dispatcher.dispatch(message).await {
            println!("  !! {err}");
        }
    }
}
