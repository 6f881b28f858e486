use anyhow::Result;
use std::collections::HashMap;

use chat_argparse::{CommandMeta, Resolved, SchemaError, resolve_command_name, validate_aliases};

use crate::config::Config;
use crate::directory::Entity;
use crate::dispatch::Message;
use crate::tickets::TicketService;

/// State a handler may use while running one invocation.
pub struct Context<'a> {
    pub config: &'a Config,
    pub registry: &'a CommandRegistry,
    pub tickets: &'a mut TicketService,
    pub message: &'a Message,
}

/// Runs a command whose arguments already parsed and resolved cleanly.
/// Returns the reply text.
pub type Handler = fn(&mut Context<'_>, &Resolved<Entity>) -> Result<String>;

#[derive(Default)]
pub struct CommandRegistry {
    metas: Vec<CommandMeta>,
    handlers: HashMap<String, Handler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. Fails if its name or aliases clash with an existing one.
    pub fn register(&mut self, meta: CommandMeta, handler: Handler) -> Result<(), SchemaError> {
        let mut metas = self.metas.clone();
        metas.push(meta.clone());
        validate_aliases(&metas)?;

        tracing::debug!(command = %meta.name, aliases = ?meta.aliases, "loaded command");
        self.handlers.insert(meta.name.clone(), handler);
        self.metas = metas;
        Ok(())
    }

    /// Look up a command by name or alias.
    pub fn get(&self, raw: &str) -> Option<(&CommandMeta, Handler)> {
        let name = resolve_command_name(&self.metas, raw)?;
        let meta = self.metas.iter().find(|m| m.name == name)?;
        let handler = *self.handlers.get(name)?;
        Some((meta, handler))
    }

    pub fn metas(&self) -> &[CommandMeta] {
        &self.metas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Context<'_>, _: &Resolved<Entity>) -> Result<String> {
        Ok(String::new())
    }

    #[test]
    fn lookup_by_name_and_alias() {
        let mut registry = CommandRegistry::new();
        registry
            .register(CommandMeta::new("close").alias("c"), noop)
            .unwrap();
        assert_eq!(registry.get("close").map(|(m, _)| m.name.as_str()), Some("close"));
        assert_eq!(registry.get("c").map(|(m, _)| m.name.as_str()), Some("close"));
        assert!(registry.get("open").is_none());
    }

    #[test]
    fn rejects_clashing_aliases() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandMeta::new("open"), noop).unwrap();
        let err = registry
            .register(CommandMeta::new("reopen").alias("open"), noop)
            .unwrap_err();
        assert!(matches!(err, SchemaError::AliasConflict(_)));
        assert_eq!(registry.metas().len(), 1);
    }
}
