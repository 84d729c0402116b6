//! Command router
//!
//! Subscribed to message events. A message whose first segment is text
//! starting with the prefix is a command line.

use crate::bot::Bot;
use crate::command::CommandContext;
use cqbot_core::{Event, MessageChain};
use std::sync::Arc;

/// How a piece of text reads as a command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine<'a> {
    /// Does not start with the prefix
    NotCommand,
    /// Only the prefix, or the prefix and whitespace
    Empty,
    /// A head word and its parameters
    Invocation { head: &'a str, params: Vec<&'a str> },
}

/// Split text into a command line
#[must_use]
pub fn parse<'a>(prefix: &str, text: &'a str) -> CommandLine<'a> {
    let Some(rest) = text.strip_prefix(prefix) else {
        return CommandLine::NotCommand;
    };

    let mut tokens = rest.split_whitespace();
    match tokens.next() {
        Some(head) => CommandLine::Invocation {
            head,
            params: tokens.collect(),
        },
        None => CommandLine::Empty,
    }
}

pub(crate) fn hint_text(prefix: &str) -> String {
    format!("send {prefix}help for the command list")
}

pub(crate) fn unknown_command_text(prefix: &str) -> String {
    format!("unknown command, send {prefix}help for the command list")
}

/// Handle one message event
pub(crate) async fn route(bot: Bot, event: Arc<Event>) -> anyhow::Result<()> {
    let Some(message) = event.as_message() else {
        return Ok(());
    };
    let Some(text) = message.leading_text() else {
        return Ok(());
    };

    let prefix = bot.prefix();
    match parse(prefix, text) {
        CommandLine::NotCommand => Ok(()),
        CommandLine::Empty => {
            bot.client()
                .send_message(&message.source, &MessageChain::from_text(hint_text(prefix)), None)
                .await?;
            Ok(())
        }
        CommandLine::Invocation { head, params } => {
            let Some(command) = bot.commands().get(head) else {
                tracing::debug!(command = %head, sender = %message.sender.id(), "Unknown command");
                bot.client()
                    .reply_message(
                        message.message_id,
                        &message.source,
                        &MessageChain::from_text(unknown_command_text(prefix)),
                        None,
                    )
                    .await?;
                return Ok(());
            };

            tracing::debug!(
                command = %command.head(),
                sender = %message.sender.id(),
                source = %message.source,
                "Running command"
            );

            let ctx = CommandContext {
                bot: bot.clone(),
                sender: message.sender.clone(),
                params: params.into_iter().map(str::to_string).collect(),
                source: message.source.clone(),
                event: Arc::clone(message),
            };

            if let Err(e) = command.invoke(ctx).await {
                tracing::warn!(command = %command.head(), error = %e, "Command failed");
            }
            Ok(())
        }
    }
}
