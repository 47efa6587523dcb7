//! Prefix-triggered bot example.
//!
//! Demonstrates the full path: a dispatcher with a `!` prefix, two
//! registered commands, a reply client, and a scripted stream of inbound
//! messages.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p bosun-demos --example prefix_bot
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use bosun_core::{ContainerTag, ParamSpec, TypeTag, Value};
use bosun_dispatch::{CallbackError, Command, Dispatcher, Message, ReplyClient};

/// Reply client that prints to stdout instead of a chat platform.
struct StdoutReplies;

#[async_trait]
impl ReplyClient for StdoutReplies {
    async fn send_message(&self, recipient: &str, content: &str) -> Result<(), CallbackError> {
        println!("  -> @{recipient}: {content}");
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let dispatcher = Dispatcher::with_prefix(["!"]);
    dispatcher.set_reply_client(Arc::new(StdoutReplies)).await;

    dispatcher
        .register(
            Command::builder("greet", |ctx| async move {
                let who = ctx.arg(0).and_then(Value::as_str).unwrap_or("stranger");
                let reply = format!("hello, {who}!");
                ctx.reply(&reply).await
            })
            .description("Greets someone by name.")
            .alias("hello")
            .param(ParamSpec::new("who", TypeTag::Str).default_value(Value::Str("stranger".into())))
            .build()
            .unwrap(),
        )
        .await
        .unwrap();

    dispatcher
        .register(
            Command::builder("sum", |ctx| async move {
                let total: i64 = match ctx.arg(0) {
                    Some(Value::List(items)) => items.iter().filter_map(Value::as_int).sum(),
                    _ => 0,
                };
                ctx.reply(&format!("total: {total}")).await
            })
            .description("Adds up every integer you give it.")
            .param(ParamSpec::new("numbers", TypeTag::Int).container(ContainerTag::List))
            .build()
            .unwrap(),
        )
        .await
        .unwrap();

    let script = [
        Message::new("alice", "!greet bob"),
        Message::new("bob", "!hello"),
        Message::new("carol", "!sum 1 2 3 4"),
        Message::new("carol", "no prefix here, ignored"),
        Message::new("dave", "!sum one two"),
    ];

    for message in script {
        println!("<{}> {}", message.author, message.content);
        if let Err(err) = dispatcher.dispatch(message).await {
            println!("  !! {err}");
        }
    }
}
