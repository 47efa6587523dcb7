//! End-to-end dispatch tests: message in, bound callback out.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bosun_core::{BindError, ContainerTag, ParamSpec, TypeTag, Value};
use bosun_dispatch::{
    CallbackError, Command, Context, DispatchError, Dispatcher, EventManager, Message,
    MessageCallback, Plugin, ReplyClient, SubscriptionId,
};
use tokio::sync::Mutex as AsyncMutex;

/// Records every bound invocation a command receives.
#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<(Vec<Value>, HashMap<String, Value>)>>,
}

impl Recorder {
    fn calls(&self) -> Vec<(Vec<Value>, HashMap<String, Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

fn recording_command(name: &str, recorder: &Arc<Recorder>) -> Command {
    let recorder = Arc::clone(recorder);
    Command::builder(name, move |ctx: Context| {
        let recorder = Arc::clone(&recorder);
        async move {
            recorder
                .calls
                .lock()
                .unwrap()
                .push((ctx.args().to_vec(), ctx.kwargs().clone()));
            Ok(())
        }
    })
    .param(
        ParamSpec::new("words", TypeTag::Str)
            .container(ContainerTag::List)
            .default_value(Value::Str(String::new())),
    )
    .build()
    .unwrap()
}

/// In-memory message bus standing in for a chat platform.
#[derive(Default)]
struct TestBus {
    subscribers: AsyncMutex<HashMap<u64, MessageCallback>>,
    next_id: Mutex<u64>,
}

impl TestBus {
    async fn emit(&self, message: Message) {
        let callbacks: Vec<MessageCallback> =
            self.subscribers.lock().await.values().cloned().collect();
        for callback in callbacks {
            callback(message.clone()).await;
        }
    }
}

#[async_trait]
impl EventManager for TestBus {
    async fn subscribe(&self, callback: MessageCallback) -> SubscriptionId {
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        self.subscribers.lock().await.insert(id, callback);
        SubscriptionId(id)
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.lock().await.remove(&id.0).is_some()
    }
}

/// Captures outbound replies.
#[derive(Default)]
struct ReplySink {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ReplyClient for ReplySink {
    async fn send_message(&self, recipient: &str, content: &str) -> Result<(), CallbackError> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), content.to_string()));
        Ok(())
    }
}

#[tokio::test]
async fn test_dispatch_binds_and_invokes() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = Dispatcher::with_prefix(["!"]);
    dispatcher
        .register(recording_command("echo", &recorder))
        .await
        .unwrap();

    dispatcher
        .dispatch(Message::new("alice", "!echo one two"))
        .await
        .unwrap();

    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].0,
        vec![Value::List(vec![
            Value::Str("one".into()),
            Value::Str("two".into())
        ])]
    );
}

#[tokio::test]
async fn test_unmatched_and_unknown_messages_are_ignored() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = Dispatcher::with_prefix(["!"]);
    dispatcher
        .register(recording_command("echo", &recorder))
        .await
        .unwrap();

    // No prefix, bare prefix, and unknown command: all silent.
    dispatcher
        .dispatch(Message::new("alice", "just chatting"))
        .await
        .unwrap();
    dispatcher.dispatch(Message::new("alice", "!")).await.unwrap();
    dispatcher
        .dispatch(Message::new("alice", "!missing args"))
        .await
        .unwrap();

    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_bind_errors_surface_per_message() {
    let dispatcher = Dispatcher::with_prefix(["!"]);
    dispatcher
        .register(
            Command::builder("take", |_ctx: Context| async { Ok(()) })
                .param(ParamSpec::new("n", TypeTag::Int))
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

    let err = dispatcher
        .dispatch(Message::new("alice", "!take banana"))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Bind(BindError::Conversion(_))));
}

#[tokio::test]
async fn test_alias_invocation_reports_invoked_with() {
    let invoked: Arc<Mutex<Vec<(String, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&invoked);

    let dispatcher = Dispatcher::with_prefix(["!"]);
    dispatcher
        .register(
            Command::builder("greet", move |ctx: Context| {
                let sink = Arc::clone(&sink);
                async move {
                    sink.lock().unwrap().push((
                        ctx.command().name().to_string(),
                        ctx.invoked_with().to_string(),
                    ));
                    Ok(())
                }
            })
            .alias("hello")
            .build()
            .unwrap(),
        )
        .await
        .unwrap();

    dispatcher
        .dispatch(Message::new("alice", "!hello"))
        .await
        .unwrap();
    assert_eq!(
        *invoked.lock().unwrap(),
        vec![("greet".to_string(), "hello".to_string())]
    );
}

#[tokio::test]
async fn test_reply_goes_through_client() {
    let sink = Arc::new(ReplySink::default());
    let dispatcher = Dispatcher::with_prefix(["!"]);
    dispatcher.set_reply_client(Arc::clone(&sink) as _).await;
    dispatcher
        .register(
            Command::builder("ping", |ctx: Context| async move { ctx.reply("pong").await })
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

    dispatcher
        .dispatch(Message::new("alice", "!ping"))
        .await
        .unwrap();
    assert_eq!(
        *sink.sent.lock().unwrap(),
        vec![("alice".to_string(), "pong".to_string())]
    );
}

#[tokio::test]
async fn test_event_manager_binding_round_trip() {
    let recorder = Arc::new(Recorder::default());
    let bus = TestBus::default();
    let dispatcher = Dispatcher::with_prefix(["!"]);
    dispatcher
        .register(recording_command("echo", &recorder))
        .await
        .unwrap();

    let subscription = dispatcher.bind_to_event_manager(&bus).await;
    bus.emit(Message::new("alice", "!echo hi")).await;
    assert_eq!(recorder.calls().len(), 1);

    assert!(bus.unsubscribe(subscription).await);
    bus.emit(Message::new("alice", "!echo again")).await;
    assert_eq!(recorder.calls().len(), 1);
}

#[tokio::test]
async fn test_trigger_strategy_swap() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = Dispatcher::with_prefix(["!"]);
    dispatcher
        .register(recording_command("echo", &recorder))
        .await
        .unwrap();

    dispatcher
        .set_trigger_strategy(bosun_dispatch::PrefixTrigger::new(["$"]))
        .await;

    dispatcher
        .dispatch(Message::new("alice", "!echo old"))
        .await
        .unwrap();
    assert!(recorder.calls().is_empty());

    dispatcher
        .dispatch(Message::new("alice", "$echo new"))
        .await
        .unwrap();
    assert_eq!(recorder.calls().len(), 1);
}

struct GreetPlugin;

#[async_trait]
impl Plugin for GreetPlugin {
    fn name(&self) -> &str {
        "greetings"
    }

    async fn load(&self, dispatcher: &Dispatcher) -> bosun_dispatch::DispatchResult<()> {
        dispatcher
            .register(
                Command::builder("wave", |_ctx: Context| async { Ok(()) })
                    .alias("o7")
                    .build()?,
            )
            .await?;
        Ok(())
    }

    async fn unload(&self, dispatcher: &Dispatcher) -> bosun_dispatch::DispatchResult<()> {
        dispatcher.unregister("wave").await;
        Ok(())
    }
}

#[tokio::test]
async fn test_plugin_load_unload_round_trip() {
    let dispatcher = Dispatcher::with_prefix(["!"]);

    dispatcher.load_plugin(&GreetPlugin).await.unwrap();
    assert!(dispatcher.lookup("wave").await.is_some());
    assert!(dispatcher.lookup("o7").await.is_some());

    dispatcher.unload_plugin(&GreetPlugin).await.unwrap();
    assert!(dispatcher.lookup("wave").await.is_none());
    assert!(dispatcher.lookup("o7").await.is_none());
    assert!(dispatcher.commands().await.is_empty());
}

#[tokio::test]
async fn test_callback_error_propagates() {
    let dispatcher = Dispatcher::with_prefix(["!"]);
    dispatcher
        .register(
            Command::builder("fail", |_ctx: Context| async {
                Err("deliberate failure".into())
            })
            .build()
            .unwrap(),
        )
        .await
        .unwrap();

    let err = dispatcher
        .dispatch(Message::new("alice", "!fail"))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Callback(_)));
    assert!(err.to_string().contains("deliberate failure"));
}
