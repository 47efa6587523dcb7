//! The dispatcher: trigger matching, lookup, and invocation.
//!
//! [`Dispatcher`] is a cheaply cloneable handle over shared state: the
//! command registry, the active trigger strategy, and an optional reply
//! client. All of it sits behind `tokio::sync::RwLock`s; read guards are
//! dropped (the `Arc` cloned out) before any await, so a long-running
//! callback never blocks registration.
//!
//! # Examples
//!
//! ```
//! use bosun_core::{ContainerTag, ParamSpec, TypeTag};
//! use bosun_dispatch::{Command, Dispatcher, Message};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let dispatcher = Dispatcher::with_prefix(["!"]);
//! dispatcher
//!     .register(
//!         Command::builder("shout", |ctx| async move {
//!             println!("{}!", ctx.arg(0).and_then(|v| v.as_str()).unwrap_or(""));
//!             Ok(())
//!         })
//!         .param(ParamSpec::new("text", TypeTag::Str).container(ContainerTag::joined()))
//!         .build()
//!         .unwrap(),
//!     )
//!     .await
//!     .unwrap();
//!
//! dispatcher
//!     .dispatch(Message::new("alice", "!shout hello world"))
//!     .await
//!     .unwrap();
//! # });
//! ```

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::command::Command;
use crate::error::{DispatchResult, RegistryError};
use crate::event::{EventManager, Message, MessageCallback, ReplyClient, SubscriptionId};
use crate::plugin::Plugin;
use crate::registry::CommandRegistry;
use crate::trigger::{PrefixTrigger, TriggerStrategy};

struct DispatcherState {
    registry: RwLock<CommandRegistry>,
    strategy: RwLock<Arc<dyn TriggerStrategy>>,
    reply: RwLock<Option<Arc<dyn ReplyClient>>>,
}

/// Routes inbound messages to registered commands.
#[derive(Clone)]
pub struct Dispatcher {
    state: Arc<DispatcherState>,
}

impl Dispatcher {
    /// Creates a dispatcher with the given trigger strategy and an empty
    /// registry.
    pub fn new(strategy: impl TriggerStrategy + 'static) -> Self {
        Self {
            state: Arc::new(DispatcherState {
                registry: RwLock::new(CommandRegistry::new()),
                strategy: RwLock::new(Arc::new(strategy)),
                reply: RwLock::new(None),
            }),
        }
    }

    /// Creates a dispatcher triggered by literal message prefixes.
    pub fn with_prefix<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(PrefixTrigger::new(prefixes))
    }

    /// Swaps the trigger strategy. Messages already being dispatched keep
    /// the strategy they matched under.
    pub async fn set_trigger_strategy(&self, strategy: impl TriggerStrategy + 'static) {
        *self.state.strategy.write().await = Arc::new(strategy);
    }

    /// Attaches the reply client handed to command contexts.
    pub async fn set_reply_client(&self, client: Arc<dyn ReplyClient>) {
        *self.state.reply.write().await = Some(client);
    }

    /// Registers a command. See [`CommandRegistry::register`].
    pub async fn register(&self, command: Command) -> Result<Arc<Command>, RegistryError> {
        self.state.registry.write().await.register(command)
    }

    /// Unregisters the command known under `name` (canonical or alias).
    pub async fn unregister(&self, name: &str) -> Option<Arc<Command>> {
        self.state.registry.write().await.unregister(name)
    }

    /// Finds a command by name or alias.
    pub async fn lookup(&self, name: &str) -> Option<Arc<Command>> {
        self.state.registry.read().await.lookup(name)
    }

    /// Every registered command once.
    pub async fn commands(&self) -> Vec<Arc<Command>> {
        self.state.registry.read().await.commands()
    }

    /// Routes one message: trigger match, registry lookup, invocation.
    ///
    /// Unmatched messages and unknown command names are silent non-errors;
    /// everything the invocation itself produces is returned to the
    /// caller.
    pub async fn dispatch(&self, message: Message) -> DispatchResult<()> {
        let strategy = Arc::clone(&*self.state.strategy.read().await);
        let Some(invocation) = strategy.prepare(&message.content) else {
            return Ok(());
        };

        let command = self.state.registry.read().await.lookup(&invocation.command);
        let Some(command) = command else {
            trace!(name = %invocation.command, "no command under matched trigger");
            return Ok(());
        };

        let reply = self.state.reply.read().await.clone();
        debug!(
            command = command.name(),
            invoked_with = %invocation.command,
            author = %message.author,
            "dispatching command"
        );
        command
            .invoke(
                message,
                &invocation.trigger,
                &invocation.command,
                &invocation.invocation,
                reply,
            )
            .await
    }

    /// Subscribes this dispatcher to an event manager's message-created
    /// channel. Dispatch errors are logged, not propagated, since the
    /// event loop has no caller to hand them to.
    pub async fn bind_to_event_manager(&self, events: &dyn EventManager) -> SubscriptionId {
        let dispatcher = self.clone();
        let callback: MessageCallback = Arc::new(move |message| {
            let dispatcher = dispatcher.clone();
            Box::pin(async move {
                if let Err(err) = dispatcher.dispatch(message).await {
                    warn!(error = %err, "command invocation failed");
                }
            })
        });
        events.subscribe(callback).await
    }

    /// Runs a plugin's `load` hook against this dispatcher.
    pub async fn load_plugin(&self, plugin: &dyn Plugin) -> DispatchResult<()> {
        debug!(plugin = plugin.name(), "loading plugin");
        plugin.load(self).await
    }

    /// Runs a plugin's `unload` hook against this dispatcher.
    pub async fn unload_plugin(&self, plugin: &dyn Plugin) -> DispatchResult<()> {
        debug!(plugin = plugin.name(), "unloading plugin");
        plugin.unload(self).await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}
