//! Per-command tokenizer override example.
//!
//! Demonstrates swapping the default tokenizer for one command only: a
//! `run` command that takes its invocation as a fenced code block and
//! tokenizes it line by line, while every other command keeps the normal
//! quoting rules.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p bosun-demos --example codeblock_tokenizer
//! ```

use bosun_core::{ContainerTag, ParamSpec, TokenStream, TokenizeError, TypeTag, Value};
use bosun_dispatch::{Command, Dispatcher, Message};

/// Tokenizes a fenced code block: one positional token per non-empty line.
fn codeblock_tokenizer(content: &str) -> Result<TokenStream, TokenizeError> {
    let body = content
        .trim()
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(content);

    let mut tokens = TokenStream::new();
    tokens.args = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    Ok(tokens)
}

#[tokio::main]
async fn main() {
    let dispatcher = Dispatcher::with_prefix(["!"]);

    dispatcher
        .register(
            Command::builder("run", |ctx| async move {
                if let Some(Value::List(lines)) = ctx.arg(0) {
                    for (i, line) in lines.iter().enumerate() {
                        println!("  step {}: {line}", i + 1);
                    }
                }
                Ok(())
            })
            .description("Runs each line of a code block as one step.")
            .tokenizer(codeblock_tokenizer)
            .param(ParamSpec::new("steps", TypeTag::Str).container(ContainerTag::List))
            .build()
            .unwrap(),
        )
        .await
        .unwrap();

    dispatcher
        .register(
            Command::builder("echo", |ctx| async move {
                println!("  {:?}", ctx.args());
                Ok(())
            })
            .description("Echoes with the default quoting rules.")
            .param(ParamSpec::new("text", TypeTag::Str).container(ContainerTag::joined()))
            .build()
            .unwrap(),
        )
        .await
        .unwrap();

    let script = [
        Message::new("alice", "!run ```\nstep one\nstep two\n\nstep three\n```"),
        Message::new("alice", "!echo \"quotes still work\" here"),
    ];

    for message in script {
        println!("<{}> {}", message.author, message.content.replace('\n', "\\n"));
        if let Err(err) = dispatcher.dispatch(message).await {
            println!("  !! {err}");
        }
    }
}
