//! Trigger strategies: decide whether a message addresses the bot.
//!
//! A [`TriggerStrategy`] inspects raw message text and, when it matches,
//! splits out the command name and the invocation remainder. The default
//! [`PrefixTrigger`] matches a set of literal prefixes; anything
//! implementing `Fn(&str) -> Option<Invocation>` works too, so regex or
//! mention-based strategies are plain closures.
//!
//! # Examples
//!
//! ```
//! use bosun_dispatch::{PrefixTrigger, TriggerStrategy};
//!
//! let trigger = PrefixTrigger::new(["!", "bot "]);
//! let hit = trigger.prepare("!roll 2 6").unwrap();
//! assert_eq!(hit.command, "roll");
//! assert_eq!(hit.invocation, "2 6");
//! ```

use serde::Serialize;

/// A matched trigger: how the message addressed the bot, which command it
/// named, and the remaining invocation text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// The matched trigger text (e.g. the prefix).
    pub trigger: String,
    /// The command name or alias as written.
    pub command: String,
    /// Everything after the command name; empty when the message was just
    /// the command.
    pub invocation: String,
}

/// Decides whether raw message text addresses the bot.
pub trait TriggerStrategy: Send + Sync {
    /// Returns the split invocation when the message matches, `None` when
    /// the message should be ignored.
    fn prepare(&self, content: &str) -> Option<Invocation>;
}

impl<F> TriggerStrategy for F
where
    F: Fn(&str) -> Option<Invocation> + Send + Sync,
{
    fn prepare(&self, content: &str) -> Option<Invocation> {
        self(content)
    }
}

/// Matches messages that start with one of a set of literal prefixes.
///
/// The message is trimmed first; prefixes are tried in declaration order.
/// A message consisting of a prefix alone names no command and does not
/// match.
#[derive(Debug, Clone)]
pub struct PrefixTrigger {
    prefixes: Vec<String>,
}

impl PrefixTrigger {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

impl TriggerStrategy for PrefixTrigger {
    fn prepare(&self, content: &str) -> Option<Invocation> {
        let content = content.trim();
        for prefix in &self.prefixes {
            let Some(rest) = content.strip_prefix(prefix.as_str()) else {
                continue;
            };
            let rest = rest.trim_start();
            if rest.is_empty() {
                return None;
            }
            let (command, invocation) = match rest.split_once(' ') {
                Some((command, invocation)) => (command, invocation),
                None => (rest, ""),
            };
            return Some(Invocation {
                trigger: prefix.clone(),
                command: command.to_string(),
                invocation: invocation.to_string(),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_splits_command_and_remainder() {
        let trigger = PrefixTrigger::new(["!"]);
        let hit = trigger.prepare("!greet alice bob").unwrap();
        assert_eq!(
            hit,
            Invocation {
                trigger: "!".into(),
                command: "greet".into(),
                invocation: "alice bob".into(),
            }
        );
    }

    #[test]
    fn test_command_without_arguments_has_empty_invocation() {
        let trigger = PrefixTrigger::new(["!"]);
        let hit = trigger.prepare("!ping").unwrap();
        assert_eq!(hit.command, "ping");
        assert_eq!(hit.invocation, "");
    }

    #[test]
    fn test_bare_prefix_does_not_match() {
        let trigger = PrefixTrigger::new(["!"]);
        assert_eq!(trigger.prepare("!"), None);
        assert_eq!(trigger.prepare("!   "), None);
    }

    #[test]
    fn test_unprefixed_message_is_ignored() {
        let trigger = PrefixTrigger::new(["!"]);
        assert_eq!(trigger.prepare("hello there"), None);
    }

    #[test]
    fn test_prefixes_tried_in_order() {
        let trigger = PrefixTrigger::new(["bot, ", "!"]);
        let hit = trigger.prepare("bot, ping now").unwrap();
        assert_eq!(hit.trigger, "bot, ");
        assert_eq!(hit.command, "ping");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let trigger = PrefixTrigger::new(["!"]);
        let hit = trigger.prepare("   !ping   ").unwrap();
        assert_eq!(hit.command, "ping");
    }

    #[test]
    fn test_closure_is_a_strategy() {
        let strategy = |content: &str| {
            content.strip_prefix("robot ").map(|rest| Invocation {
                trigger: "robot".into(),
                command: rest.to_string(),
                invocation: String::new(),
            })
        };
        assert_eq!(strategy.prepare("robot ping").unwrap().command, "ping");
        assert_eq!(strategy.prepare("nothing"), None);
    }
}
