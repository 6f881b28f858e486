//! Built-in bot commands.

use anyhow::Result;

use chat_argparse::{ArgDef, CommandMeta, Resolved, Schema, SchemaError, ValueType, help, usage};

use crate::directory::{Entity, EntityKind};
use crate::registry::{CommandRegistry, Context};
use crate::tickets::{OpenRequest, TicketError};

/// Registry with every built-in command.
pub fn registry() -> Result<CommandRegistry, SchemaError> {
    let mut registry = CommandRegistry::new();

    registry.register(
        CommandMeta::new("open")
            .summary("Open a ticket for a user")
            .example("open @someone --urgent")
            .args(Schema::new([
                ArgDef::positional("user", ValueType::Reference)
                    .required()
                    .help("User the ticket is for"),
                ArgDef::flag("urgent", ValueType::Boolean).help("Mark the ticket urgent"),
            ])?),
        open,
    )?;

    registry.register(
        CommandMeta::new("close")
            .alias("c")
            .summary("Close the ticket in this channel")
            .example("close resolved over DM")
            .args(Schema::new([
                ArgDef::positional("reason", ValueType::Rest).help("Why the ticket was closed")
            ])?),
        close,
    )?;

    registry.register(
        CommandMeta::new("help")
            .summary("List commands or show help for one")
            .args(Schema::new([ArgDef::positional(
                "command",
                ValueType::String,
            )])?),
        help_command,
    )?;

    Ok(registry)
}

fn open(ctx: &mut Context<'_>, inv: &Resolved<Entity>) -> Result<String> {
    let Some(user) = inv.entity("user") else {
        return Ok("Missing user".to_string());
    };
    if user.kind != EntityKind::User {
        return Ok(format!("{} is not a user", user.mention()));
    }
    let category_id = ctx
        .config
        .category_id
        .as_deref()
        .ok_or(TicketError::MissingCategory)?;

    let req = OpenRequest {
        user_id: &user.id,
        category_id,
        opened_by: Some(ctx.message.author_id.as_str()),
        urgent: inv.result.flag("urgent"),
    };
    match ctx.tickets.open(req) {
        Ok(ticket) => {
            let mut reply = format!("Opened ticket for {} in <#{}>", user.mention(), ticket.channel_id);
            if ticket.urgent {
                reply.push_str(" (urgent)");
            }
            Ok(reply)
        }
        Err(TicketError::ExistingTicket { channel_id }) => Ok(format!(
            "User {} already has an open ticket at <#{channel_id}>",
            user.mention()
        )),
        Err(e) => Err(e.into()),
    }
}

fn close(ctx: &mut Context<'_>, inv: &Resolved<Entity>) -> Result<String> {
    let reason = inv.result.get_str("reason");
    let ticket = match ctx
        .tickets
        .close(&ctx.message.channel_id, &ctx.message.author_id, reason)
    {
        Ok(ticket) => ticket,
        Err(TicketError::TicketNotFound) => {
            return Ok("No open ticket found for this channel".to_string());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(log_channel) = &ctx.config.log_channel_id {
        tracing::info!(
            log_channel = %log_channel,
            ticket = %ticket.id,
            user = %ticket.user_id,
            moderator = %ctx.message.author_id,
            "ticket closed notice"
        );
    }

    let mut reply = format!("Closed ticket {} for <@{}>", ticket.id, ticket.user_id);
    if let Some(reason) = &ticket.close_reason {
        reply.push_str(&format!(": {reason}"));
    }
    Ok(reply)
}

fn help_command(ctx: &mut Context<'_>, inv: &Resolved<Entity>) -> Result<String> {
    let prefix = &ctx.config.prefix;
    if let Some(name) = inv.result.get_str("command") {
        let name = name.strip_prefix(prefix.as_str()).unwrap_or(name);
        return Ok(match ctx.registry.get(name) {
            Some((meta, _)) => help(meta).trim_end().to_string(),
            None => format!("Unknown command: {name}"),
        });
    }

    let lines: Vec<String> = ctx
        .registry
        .metas()
        .iter()
        .map(|m| format!("{prefix}{} - {}", usage(&m.name, &m.args), m.summary))
        .collect();
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_schemas_are_valid() {
        let registry = registry().unwrap();
        let names: Vec<&str> = registry.metas().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["open", "close", "help"]);
        assert!(registry.get("c").is_some());
    }
}
