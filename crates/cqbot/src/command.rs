//! Commands and the command registry
//!
//! Commands are looked up by head word or alias. The alias index is only ever
//! extended; a later registration under the same key shadows the earlier one.

use crate::bot::Bot;
use cqbot_core::{ChatTarget, MessageChain, MessageEvent, User};
use cqbot_gateway::GatewayResult;
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Future returned by a command handler
pub type CommandFuture = BoxFuture<'static, anyhow::Result<()>>;

/// A command handler
pub type CommandHandler = Arc<dyn Fn(CommandContext) -> CommandFuture + Send + Sync>;

/// Everything a handler gets for one invocation
#[derive(Clone)]
pub struct CommandContext {
    pub bot: Bot,
    /// Who sent the command
    pub sender: User,
    /// Tokens after the head word
    pub params: Vec<String>,
    /// Where the command was sent
    pub source: ChatTarget,
    /// The message that carried the command
    pub event: Arc<MessageEvent>,
}

impl CommandContext {
    /// Send text to where the command came from
    pub async fn send(&self, text: &str) -> GatewayResult<()> {
        self.bot
            .client()
            .send_message(&self.source, &MessageChain::from_text(text), None)
            .await
    }

    /// Reply to the command message
    pub async fn reply(&self, text: &str) -> GatewayResult<()> {
        self.bot
            .client()
            .reply_message(
                self.event.message_id,
                &self.source,
                &MessageChain::from_text(text),
                None,
            )
            .await
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("sender", &self.sender)
            .field("params", &self.params)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// A text command
pub struct Command {
    head: String,
    aliases: Vec<String>,
    description: String,
    usage: String,
    handler: CommandHandler,
}

impl Command {
    /// Create a command; usage defaults to the head word
    pub fn new<F, Fut>(head: impl Into<String>, handler: F) -> Self
    where
        F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let head = head.into();
        Self {
            usage: head.clone(),
            head,
            aliases: Vec::new(),
            description: String::new(),
            handler: Arc::new(move |ctx: CommandContext| handler(ctx).boxed()),
        }
    }

    /// Set the description line
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the usage text shown after the prefix
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Add an alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    #[must_use]
    pub fn head(&self) -> &str {
        &self.head
    }

    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Run the handler
    pub fn invoke(&self, ctx: CommandContext) -> CommandFuture {
        (self.handler)(ctx)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("head", &self.head)
            .field("aliases", &self.aliases)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct Commands {
    /// Registration order, which is also help order
    ordered: Vec<Arc<Command>>,
    /// Head words and aliases
    index: HashMap<String, Arc<Command>>,
}

/// Registered commands
pub struct CommandRegistry {
    prefix: String,
    commands: RwLock<Commands>,
}

impl CommandRegistry {
    /// Create an empty registry for a command prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            commands: RwLock::new(Commands::default()),
        }
    }

    /// Command prefix
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register a command under its head word and every alias
    pub fn add(&self, command: Command) -> Arc<Command> {
        let command = Arc::new(command);
        let mut commands = self.commands.write();

        for key in std::iter::once(&command.head).chain(&command.aliases) {
            if let Some(previous) = commands.index.insert(key.clone(), Arc::clone(&command)) {
                tracing::debug!(key = %key, previous = %previous.head, "Command key shadowed");
            }
        }
        commands.ordered.push(Arc::clone(&command));

        tracing::debug!(command = %command.head, aliases = ?command.aliases, "Command registered");
        command
    }

    /// Look up a command by head word or alias
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Command>> {
        self.commands.read().index.get(name).cloned()
    }

    /// Snapshot of all commands in registration order
    #[must_use]
    pub fn commands(&self) -> Vec<Arc<Command>> {
        self.commands.read().ordered.clone()
    }

    /// Number of registered commands
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.read().ordered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("prefix", &self.prefix)
            .field("commands", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(head: &str) -> Command {
        Command::new(head, |_| async { anyhow::Ok(()) })
    }

    #[test]
    fn test_defaults() {
        let command = noop("ping");
        assert_eq!(command.usage(), "ping");
        assert_eq!(command.description(), "");
        assert!(command.aliases().is_empty());
    }

    #[test]
    fn test_lookup_by_head_and_alias() {
        let registry = CommandRegistry::new(".");
        registry.add(noop("roll").with_alias("r").with_alias("dice"));

        assert_eq!(registry.get("roll").unwrap().head(), "roll");
        assert_eq!(registry.get("r").unwrap().head(), "roll");
        assert_eq!(registry.get("dice").unwrap().head(), "roll");
        assert!(registry.get("ro").is_none());
        assert!(registry.get("ROLL").is_none());
    }

    #[test]
    fn test_alias_last_write_wins() {
        let registry = CommandRegistry::new(".");
        registry.add(noop("first").with_alias("a"));
        assert_eq!(registry.get("a").unwrap().head(), "first");

        registry.add(noop("second").with_alias("a"));
        assert_eq!(registry.get("a").unwrap().head(), "second");
        assert_eq!(registry.get("first").unwrap().head(), "first");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registration_order() {
        let registry = CommandRegistry::new(".");
        for head in ["c", "a", "b"] {
            registry.add(noop(head));
        }

        let heads: Vec<String> = registry
            .commands()
            .iter()
            .map(|command| command.head().to_string())
            .collect();
        assert_eq!(heads, ["c", "a", "b"]);
    }
}
