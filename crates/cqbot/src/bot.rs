//! The bot
//!
//! Ties a gateway client to a command registry. The router is installed as a
//! message listener and the `help` command is registered on construction.

use crate::command::{Command, CommandRegistry};
use crate::help::help_command;
use crate::plugin::PluginRegistry;
use crate::router;
use cqbot_common::AppConfig;
use cqbot_core::EventType;
use cqbot_gateway::{Connector, GatewayClient, GatewayResult};
use std::fmt;
use std::sync::{Arc, Weak};

struct BotInner {
    client: GatewayClient,
    commands: CommandRegistry,
    plugins: PluginRegistry,
}

/// Handle to a running bot; clones share the same bot
#[derive(Clone)]
pub struct Bot {
    inner: Arc<BotInner>,
}

impl Bot {
    /// Build a bot from configuration
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(
            GatewayClient::new(&config.gateway),
            config.command.prefix.clone(),
        )
    }

    /// Build a bot around an existing client
    pub fn with_client(client: GatewayClient, prefix: impl Into<String>) -> Self {
        let inner = Arc::new(BotInner {
            client,
            commands: CommandRegistry::new(prefix),
            plugins: PluginRegistry::new(),
        });

        let weak: Weak<BotInner> = Arc::downgrade(&inner);
        inner.client.add_listener(EventType::Message, move |event| {
            let bot = weak.upgrade().map(|inner| Bot { inner });
            async move {
                match bot {
                    Some(bot) => router::route(bot, event).await,
                    None => Ok(()),
                }
            }
        });

        let bot = Self { inner };
        bot.add_command(help_command());
        bot
    }

    /// Connect to the gateway
    pub async fn start(&self, connector: &dyn Connector) -> GatewayResult<()> {
        self.inner.client.start(connector).await?;
        tracing::info!(
            prefix = %self.prefix(),
            commands = self.inner.commands.len(),
            "Bot started"
        );
        Ok(())
    }

    /// Register a command
    pub fn add_command(&self, command: Command) -> Arc<Command> {
        self.inner.commands.add(command)
    }

    /// Look up a command by head word or alias
    #[must_use]
    pub fn get_command(&self, name: &str) -> Option<Arc<Command>> {
        self.inner.commands.get(name)
    }

    #[must_use]
    pub fn client(&self) -> &GatewayClient {
        &self.inner.client
    }

    #[must_use]
    pub fn commands(&self) -> &CommandRegistry {
        &self.inner.commands
    }

    #[must_use]
    pub fn plugins(&self) -> &PluginRegistry {
        &self.inner.plugins
    }

    /// Command prefix
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.inner.commands.prefix()
    }

    /// Disconnect and unload every plugin
    pub fn close(&self) {
        self.inner.client.close();
        let unloaded = self.inner.plugins.unload_all();
        tracing::info!(plugins_unloaded = unloaded, "Bot closed");
    }
}

impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("client", &self.inner.client)
            .field("commands", &self.inner.commands)
            .field("plugins", &self.inner.plugins)
            .finish()
    }
}
