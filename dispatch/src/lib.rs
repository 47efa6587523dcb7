//! Command registration and async dispatch for chat-bot invocations.
//!
//! This crate sits on top of `bosun-core`'s parsing pipeline and adds the
//! runtime surface:
//!
//! - [`Command`] / [`CommandBuilder`] — a named async callback behind a
//!   declared signature, with aliases and an optional per-command
//!   tokenizer.
//! - [`CommandRegistry`] — name/alias lookup with collision-free
//!   registration.
//! - [`TriggerStrategy`] / [`PrefixTrigger`] — decide which messages
//!   address the bot and split out the command name.
//! - [`Dispatcher`] — the cloneable handle tying it together: trigger
//!   match, lookup, invoke.
//! - [`EventManager`] / [`ReplyClient`] — the seams to the surrounding
//!   chat platform.
//! - [`Plugin`] — bundles of commands loaded and unloaded as a unit.
//!
//! # Example
//!
//! ```
//! use bosun_core::{ParamSpec, TypeTag, Value};
//! use bosun_dispatch::{Command, Dispatcher, Message};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let dispatcher = Dispatcher::with_prefix(["!"]);
//! dispatcher
//!     .register(
//!         Command::builder("add", |ctx| async move {
//!             let a = ctx.arg(0).and_then(Value::as_int).unwrap_or(0);
//!             let b = ctx.arg(1).and_then(Value::as_int).unwrap_or(0);
//!             println!("{}", a + b);
//!             Ok(())
//!         })
//!         .description("Adds two integers.")
//!         .param(ParamSpec::new("a", TypeTag::Int))
//!         .param(ParamSpec::new("b", TypeTag::Int))
//!         .build()
//!         .unwrap(),
//!     )
//!     .await
//!     .unwrap();
//!
//! dispatcher.dispatch(Message::new("alice", "!add 2 3")).await.unwrap();
//! # });
//! ```

mod command;
mod dispatcher;
mod error;
mod event;
mod plugin;
mod registry;
mod trigger;

pub use command::{Command, CommandBuilder, CommandCallback, Context};
pub use dispatcher::Dispatcher;
pub use error::{CallbackError, DispatchError, DispatchResult, RegistryError};
pub use event::{EventManager, Message, MessageCallback, ReplyClient, SubscriptionId};
pub use plugin::Plugin;
pub use registry::CommandRegistry;
pub use trigger::{Invocation, PrefixTrigger, TriggerStrategy};
