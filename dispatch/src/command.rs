//! Commands: a named async callback behind a declared signature.
//!
//! A [`Command`] owns its [`SignatureBinder`] and an optional tokenizer
//! override, and is built through [`CommandBuilder`]. Invoking a command
//! tokenizes and binds the invocation text, wraps the bound values in a
//! [`Context`], and awaits the callback.
//!
//! # Examples
//!
//! ```
//! use bosun_core::{ParamSpec, TypeTag};
//! use bosun_dispatch::Command;
//!
//! let command = Command::builder("echo", |ctx| async move {
//!     println!("{:?}", ctx.args());
//!     Ok(())
//! })
//! .description("Repeats its argument back.")
//! .alias("say")
//! .param(ParamSpec::new("text", TypeTag::Str))
//! .build()
//! .unwrap();
//!
//! assert_eq!(command.name(), "echo");
//! assert_eq!(command.aliases(), ["say"]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bosun_core::{
    BindError, ParamOverrides, ParamSpec, SchemaResult, SignatureBinder, TokenizeFn, Value,
    tokenize,
};

use crate::error::{CallbackError, DispatchError, DispatchResult};
use crate::event::{Message, ReplyClient};

const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// Async callback invoked with the bound invocation context.
pub type CommandCallback = Arc<
    dyn Fn(Context) -> Pin<Box<dyn Future<Output = Result<(), CallbackError>> + Send>>
        + Send
        + Sync,
>;

/// Everything a callback gets about one invocation.
#[derive(Clone)]
pub struct Context {
    command: Arc<Command>,
    message: Message,
    trigger: String,
    invoked_with: String,
    args: Vec<Value>,
    kwargs: HashMap<String, Value>,
    reply: Option<Arc<dyn ReplyClient>>,
}

impl Context {
    /// The command being invoked.
    pub fn command(&self) -> &Arc<Command> {
        &self.command
    }

    /// The originating message.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Sender of the originating message.
    pub fn author(&self) -> &str {
        &self.message.author
    }

    /// Raw text of the originating message.
    pub fn content(&self) -> &str {
        &self.message.content
    }

    /// The trigger text that matched (e.g. the prefix).
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// The name or alias the command was invoked under.
    pub fn invoked_with(&self) -> &str {
        &self.invoked_with
    }

    /// Bound positional values, in parameter declaration order.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Bound flag values, keyed by canonical parameter name.
    pub fn kwargs(&self) -> &HashMap<String, Value> {
        &self.kwargs
    }

    /// Bound positional value by index.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// Bound flag value by canonical parameter name.
    pub fn kwarg(&self, name: &str) -> Option<&Value> {
        self.kwargs.get(name)
    }

    /// Sends `content` back to the message author through the configured
    /// reply client. A no-op when no reply client is attached.
    pub async fn reply(&self, content: &str) -> Result<(), CallbackError> {
        match &self.reply {
            Some(client) => client.send_message(self.author(), content).await,
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("command", &self.command.name())
            .field("message", &self.message)
            .field("trigger", &self.trigger)
            .field("invoked_with", &self.invoked_with)
            .field("args", &self.args)
            .field("kwargs", &self.kwargs)
            .finish_non_exhaustive()
    }
}

/// A registered command: name, aliases, signature, and async callback.
pub struct Command {
    name: String,
    description: String,
    aliases: Vec<String>,
    binder: SignatureBinder,
    tokenizer: TokenizeFn,
    callback: CommandCallback,
}

impl Command {
    /// Starts a builder for a command named `name` running `callback`.
    pub fn builder<F, Fut>(name: impl Into<String>, callback: F) -> CommandBuilder
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CallbackError>> + Send + 'static,
    {
        CommandBuilder::new(name, callback)
    }

    /// Canonical command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Alternate names this command answers to.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The command's signature binder.
    pub fn binder(&self) -> &SignatureBinder {
        &self.binder
    }

    /// Tokenizes and binds `invocation`, then awaits the callback.
    pub async fn invoke(
        self: &Arc<Self>,
        message: Message,
        trigger: &str,
        invoked_with: &str,
        invocation: &str,
        reply: Option<Arc<dyn ReplyClient>>,
    ) -> DispatchResult<()> {
        let tokens = (self.tokenizer)(invocation).map_err(BindError::from)?;
        let bound = self.binder.bind(&tokens)?;

        let context = Context {
            command: Arc::clone(self),
            message,
            trigger: trigger.to_string(),
            invoked_with: invoked_with.to_string(),
            args: bound.args,
            kwargs: bound.kwargs,
            reply,
        };

        (self.callback)(context)
            .await
            .map_err(DispatchError::Callback)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("aliases", &self.aliases)
            .field("binder", &self.binder)
            .finish_non_exhaustive()
    }
}

/// Accumulates a command definition, then validates it in [`build`].
///
/// [`build`]: CommandBuilder::build
pub struct CommandBuilder {
    name: String,
    description: Option<String>,
    aliases: Vec<String>,
    params: Vec<ParamSpec>,
    overrides: Vec<(String, ParamOverrides)>,
    tokenizer: TokenizeFn,
    callback: CommandCallback,
}

impl CommandBuilder {
    fn new<F, Fut>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CallbackError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            params: Vec::new(),
            overrides: Vec::new(),
            tokenizer: tokenize,
            callback: Arc::new(move |context| Box::pin(callback(context))),
        }
    }

    /// Sets the description shown in help output.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds one alternate name.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds several alternate names.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Declares the next parameter, in positional order.
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Queues an override applied to the named parameter at build time.
    pub fn override_param(mut self, name: impl Into<String>, overrides: ParamOverrides) -> Self {
        self.overrides.push((name.into(), overrides));
        self
    }

    /// Replaces the default tokenizer for this command only.
    pub fn tokenizer(mut self, tokenizer: TokenizeFn) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Validates the declared signature and produces the command.
    pub fn build(self) -> SchemaResult<Command> {
        let mut binder = SignatureBinder::new(self.params)?;
        for (name, overrides) in self.overrides {
            binder.update_param(&name, overrides)?;
        }

        Ok(Command {
            name: self.name,
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            aliases: self.aliases,
            binder,
            tokenizer: self.tokenizer,
            callback: self.callback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bosun_core::{ContainerTag, SchemaError, TokenStream, TokenizeError, TypeTag};
    use std::sync::Mutex;

    fn noop() -> impl Fn(Context) -> Pin<Box<dyn Future<Output = Result<(), CallbackError>> + Send>>
    + Send
    + Sync {
        |_ctx| Box::pin(async { Ok(()) })
    }

    #[test]
    fn test_description_defaults() {
        let command = Command::builder("ping", noop()).build().unwrap();
        assert_eq!(command.description(), "No description provided.");

        let command = Command::builder("ping", noop())
            .description("Measures latency.")
            .build()
            .unwrap();
        assert_eq!(command.description(), "Measures latency.");
    }

    #[test]
    fn test_build_rejects_invalid_schema() {
        let err = Command::builder("bad", noop())
            .param(ParamSpec::new("items", TypeTag::Int).greedy())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::GreedyWithoutContainer {
                name: "items".into()
            }
        );
    }

    #[test]
    fn test_override_applied_at_build() {
        let command = Command::builder("roll", noop())
            .param(ParamSpec::new("sides", TypeTag::Int))
            .override_param("sides", ParamOverrides::new().short('s'))
            .build()
            .unwrap();
        assert_eq!(command.binder().kw_params().len(), 1);
        assert!(command.binder().pos_params().is_empty());
    }

    #[tokio::test]
    async fn test_invoke_binds_and_runs_callback() {
        let seen: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let command = Arc::new(
            Command::builder("greet", move |ctx: Context| {
                let sink = Arc::clone(&sink);
                async move {
                    sink.lock().unwrap().extend(ctx.args().iter().cloned());
                    Ok(())
                }
            })
            .param(ParamSpec::new("who", TypeTag::Str))
            .build()
            .unwrap(),
        );

        command
            .invoke(Message::new("alice", "!greet bob"), "!", "greet", "bob", None)
            .await
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![Value::Str("bob".into())]);
    }

    #[tokio::test]
    async fn test_invoke_surfaces_bind_errors() {
        let command = Arc::new(
            Command::builder("take", noop())
                .param(ParamSpec::new("n", TypeTag::Int))
                .build()
                .unwrap(),
        );
        let err = command
            .invoke(Message::new("alice", "!take x"), "!", "take", "x", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Bind(BindError::Conversion(_))));
    }

    #[tokio::test]
    async fn test_custom_tokenizer_is_used() {
        fn comma_tokenizer(content: &str) -> Result<TokenStream, TokenizeError> {
            let mut tokens = TokenStream::new();
            tokens.args = content
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect();
            Ok(tokens)
        }

        let seen: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let command = Arc::new(
            Command::builder("pair", move |ctx: Context| {
                let sink = Arc::clone(&sink);
                async move {
                    sink.lock().unwrap().extend(ctx.args().iter().cloned());
                    Ok(())
                }
            })
            .tokenizer(comma_tokenizer)
            .param(ParamSpec::new("a", TypeTag::Str))
            .param(ParamSpec::new("b", TypeTag::Str))
            .build()
            .unwrap(),
        );

        command
            .invoke(
                Message::new("alice", "!pair left, right"),
                "!",
                "pair",
                "left, right",
                None,
            )
            .await
            .unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Value::Str("left".into()), Value::Str("right".into())]
        );
    }

    #[tokio::test]
    async fn test_context_reply_without_client_is_noop() {
        let command = Arc::new(
            Command::builder("quiet", |ctx: Context| async move {
                ctx.reply("nobody hears this").await
            })
            .param(
                ParamSpec::new("rest", TypeTag::Str)
                    .container(ContainerTag::joined())
                    .default_value(Value::Str(String::new())),
            )
            .build()
            .unwrap(),
        );
        command
            .invoke(Message::new("alice", "!quiet"), "!", "quiet", "", None)
            .await
            .unwrap();
    }
}
