//! Command metadata and name/alias lookup.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::SchemaError;
use crate::schema::Schema;

/// Everything a dispatcher needs to know about a command besides its handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default)]
    pub args: Schema,
}

impl CommandMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    pub fn args(mut self, args: Schema) -> Self {
        self.args = args;
        self
    }

    /// Whether `raw` is this command's name or one of its aliases.
    pub fn answers_to(&self, raw: &str) -> bool {
        self.name == raw || self.aliases.iter().any(|a| a == raw)
    }
}

/// Return the canonical command name for `raw`, matching either the command
/// name itself or an alias. Names win over aliases.
pub fn resolve_command_name<'a>(metas: &'a [CommandMeta], raw: &str) -> Option<&'a str> {
    if let Some(m) = metas.iter().find(|m| m.name == raw) {
        return Some(m.name.as_str());
    }
    metas
        .iter()
        .find(|m| m.aliases.iter().any(|a| a == raw))
        .map(|m| m.name.as_str())
}

/// Detect invalid alias configuration (duplicate aliases, an alias colliding
/// with a command name, or two commands with the same name).
pub fn validate_aliases(metas: &[CommandMeta]) -> Result<(), SchemaError> {
    let mut names: HashSet<&str> = HashSet::new();
    for m in metas {
        if m.name.trim().is_empty() {
            continue;
        }
        if !names.insert(m.name.as_str()) {
            return Err(SchemaError::AliasConflict(format!(
                "command '{}' is registered twice",
                m.name
            )));
        }
    }

    let mut alias_map: HashMap<&str, &str> = HashMap::new();
    for m in metas {
        for alias in &m.aliases {
            let alias = alias.trim();
            if alias.is_empty() || alias == m.name {
                continue;
            }
            if names.contains(alias) {
                return Err(SchemaError::AliasConflict(format!(
                    "'{alias}' is both a command name and an alias (command: {})",
                    m.name
                )));
            }
            if let Some(prev) = alias_map.insert(alias, m.name.as_str()) {
                if prev != m.name {
                    return Err(SchemaError::AliasConflict(format!(
                        "'{alias}' refers to both '{prev}' and '{}'",
                        m.name
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_names_then_aliases() {
        let metas = vec![
            CommandMeta::new("close").alias("c"),
            CommandMeta::new("open").alias("o"),
        ];
        assert_eq!(resolve_command_name(&metas, "close"), Some("close"));
        assert_eq!(resolve_command_name(&metas, "o"), Some("open"));
        assert_eq!(resolve_command_name(&metas, "x"), None);
    }

    #[test]
    fn validate_aliases_rejects_conflicts() {
        let a = CommandMeta::new("alpha").alias("beta");
        let b = CommandMeta::new("beta");
        let err = validate_aliases(&[a, b]).unwrap_err();
        match err {
            SchemaError::AliasConflict(msg) => assert!(msg.contains("both a command name")),
            other => panic!("expected AliasConflict, got: {other:?}"),
        }

        let a = CommandMeta::new("alpha").alias("x");
        let b = CommandMeta::new("beta").alias("x");
        assert!(validate_aliases(&[a, b]).is_err());
    }

    #[test]
    fn validate_aliases_rejects_duplicate_names() {
        let err = validate_aliases(&[CommandMeta::new("open"), CommandMeta::new("open")]);
        assert!(err.is_err());
    }

    #[test]
    fn deserializes_with_schema() {
        let meta: CommandMeta = serde_json::from_str(
            r#"{"name": "close", "aliases": ["c"], "args": [{"name": "reason", "type": "rest"}]}"#,
        )
        .unwrap();
        assert!(meta.answers_to("c"));
        assert_eq!(meta.args.len(), 1);
    }
}
