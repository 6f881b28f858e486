//! Usage and help rendering.

use crate::command::CommandMeta;
use crate::schema::{ArgDef, Schema};
use crate::value::ValueType;

fn positional_label(def: &ArgDef) -> String {
    let label = match def.value_type {
        ValueType::Rest => format!("{}...", def.name),
        _ => def.name.clone(),
    };
    if def.required {
        format!("<{label}>")
    } else {
        format!("[{label}]")
    }
}

fn flag_label(def: &ArgDef) -> String {
    match def.value_type {
        ValueType::Boolean => format!("--{}", def.name),
        ty => format!("--{}=<{ty}>", def.name),
    }
}

/// One-line usage, e.g. `open <user> [--urgent]`.
pub fn usage(name: &str, schema: &Schema) -> String {
    let mut out = name.to_string();
    for def in schema.positionals() {
        out.push(' ');
        out.push_str(&positional_label(def));
    }
    for def in schema.flags() {
        out.push_str(&format!(" [{}]", flag_label(def)));
    }
    out
}

fn format_arg_help(def: &ArgDef) -> String {
    let mut out = def.help.trim().to_string();
    if def.required {
        if out.is_empty() {
            out.push_str("required");
        } else {
            out.push_str(" (required)");
        }
    }
    if let Some(default_value) = &def.default {
        if out.is_empty() {
            out.push_str(&format!("[default: {default_value}]"));
        } else {
            out.push_str(&format!(" [default: {default_value}]"));
        }
    }
    out
}

fn push_table(out: &mut String, title: &str, rows: Vec<(String, String)>) {
    if rows.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title}:\n"));
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:width$}  {help}\n"));
        }
    }
}

/// Render a help message for a command.
pub fn help(meta: &CommandMeta) -> String {
    let mut out = String::new();
    if meta.summary.trim().is_empty() {
        out.push_str(&meta.name);
        out.push('\n');
    } else {
        out.push_str(&format!("{} - {}\n", meta.name, meta.summary.trim()));
    }

    out.push_str(&format!("\nUsage: {}\n", usage(&meta.name, &meta.args)));

    if !meta.description.trim().is_empty() {
        out.push('\n');
        out.push_str(meta.description.trim_end());
        out.push('\n');
    }

    let positionals = meta
        .args
        .positionals()
        .map(|d| (positional_label(d), format_arg_help(d)))
        .collect();
    push_table(&mut out, "Arguments", positionals);

    let flags = meta
        .args
        .flags()
        .map(|d| (flag_label(d), format_arg_help(d)))
        .collect();
    push_table(&mut out, "Options", flags);

    if !meta.aliases.is_empty() {
        out.push_str(&format!("\nAliases: {}\n", meta.aliases.join(", ")));
    }

    if !meta.examples.is_empty() {
        out.push_str("\nExamples:\n");
        for ex in &meta.examples {
            if ex.trim().is_empty() {
                continue;
            }
            out.push_str(&format!("  {}\n", ex.trim_end()));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close() -> CommandMeta {
        CommandMeta::new("close")
            .alias("c")
            .summary("Close the ticket in this channel")
            .example("close resolved over DM")
            .args(
                Schema::new([
                    ArgDef::positional("reason", ValueType::Rest).help("Why the ticket was closed"),
                    ArgDef::flag("silent", ValueType::Boolean).help("Skip the DM"),
                    ArgDef::flag("delay", ValueType::Number).default_value(0),
                ])
                .unwrap(),
            )
    }

    #[test]
    fn usage_marks_required_optional_and_rest() {
        let schema = Schema::new([
            ArgDef::positional("user", ValueType::Reference).required(),
            ArgDef::positional("reason", ValueType::Rest),
            ArgDef::flag("urgent", ValueType::Boolean),
        ])
        .unwrap();
        assert_eq!(usage("open", &schema), "open <user> [reason...] [--urgent]");
    }

    #[test]
    fn help_lists_arguments_options_and_aliases() {
        let text = help(&close());
        assert!(text.starts_with("close - Close the ticket in this channel\n"));
        assert!(text.contains("Usage: close [reason...] [--silent] [--delay=<number>]"));
        assert!(text.contains("Arguments:"));
        assert!(text.contains("Why the ticket was closed"));
        assert!(text.contains("Options:"));
        assert!(text.contains("[default: 0]"));
        assert!(text.contains("Aliases: c"));
        assert!(text.contains("  close resolved over DM"));
    }

    #[test]
    fn help_omits_empty_sections() {
        let text = help(&CommandMeta::new("ping"));
        assert_eq!(text, "ping\n\nUsage: ping\n");
    }
}
