//! Plugins: bundles of commands loaded and unloaded as a unit.

use async_trait::async_trait;

use crate::dispatcher::Dispatcher;
use crate::error::DispatchResult;

/// A loadable bundle of commands.
///
/// `load` registers the plugin's commands through the dispatcher's public
/// surface; `unload` removes them again. Both hooks may fail, in which
/// case the dispatcher keeps whatever state the hook left behind — a
/// plugin that wants atomicity rolls back its own partial registrations.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Stable plugin name, used in logs.
    fn name(&self) -> &str;

    /// Registers this plugin's commands.
    async fn load(&self, dispatcher: &Dispatcher) -> DispatchResult<()>;

    /// Unregisters this plugin's commands.
    async fn unload(&self, dispatcher: &Dispatcher) -> DispatchResult<()>;
}
