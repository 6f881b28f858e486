//! Turns chat messages into command invocations.

use chat_argparse::{CommandMeta, ParseResult, parse_with_resolver, usage};

use crate::config::Config;
use crate::directory::Directory;
use crate::registry::{CommandRegistry, Context};
use crate::tickets::TicketService;

pub const FAILURE_REPLY: &str = "An error occurred while executing the command.";

/// One incoming chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub author_id: String,
    pub channel_id: String,
    pub content: String,
}

pub struct Dispatcher {
    config: Config,
    registry: CommandRegistry,
    directory: Directory,
    tickets: TicketService,
}

impl Dispatcher {
    pub fn new(
        config: Config,
        registry: CommandRegistry,
        directory: Directory,
        tickets: TicketService,
    ) -> Self {
        Self {
            config,
            registry,
            directory,
            tickets,
        }
    }

    /// Handle one message. Returns the reply, or `None` when the message is not
    /// a known command.
    pub fn handle(&mut self, message: &Message) -> Option<String> {
        let content = message.content.trim();
        let rest = content.strip_prefix(self.config.prefix.as_str())?;
        let (name, raw) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if name.is_empty() {
            return None;
        }

        let Some((meta, handler)) = self.registry.get(name) else {
            tracing::debug!(command = name, "ignoring unknown command");
            return None;
        };

        let invocation = parse_with_resolver(raw, &meta.args, &self.directory);
        if !invocation.is_ok() {
            tracing::warn!(
                command = %meta.name,
                errors = ?invocation.result.error_messages(),
                "rejected invocation"
            );
            return Some(rejection(&self.config.prefix, meta, &invocation.result));
        }

        tracing::debug!(command = %meta.name, author = %message.author_id, "executing command");
        let mut ctx = Context {
            config: &self.config,
            registry: &self.registry,
            tickets: &mut self.tickets,
            message,
        };
        match handler(&mut ctx, &invocation) {
            Ok(reply) => Some(reply),
            Err(e) => {
                tracing::error!(command = %meta.name, error = %format!("{e:#}"), "command failed");
                Some(FAILURE_REPLY.to_string())
            }
        }
    }
}

fn rejection(prefix: &str, meta: &CommandMeta, result: &ParseResult) -> String {
    let mut out = String::from("Invalid command usage:\n");
    for message in result.error_messages() {
        out.push_str(&format!("- {message}\n"));
    }
    out.push_str(&format!("Usage: {prefix}{}", usage(&meta.name, &meta.args)));
    out
}
