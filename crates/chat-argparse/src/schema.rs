//! Argument definitions and schema partitioning.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::coerce::parse_reference;
use crate::error::SchemaError;
use crate::value::{ArgKind, Value, ValueType};

/// One argument a command accepts.
///
/// JSON form (all keys but `name` optional):
/// `{"name": "count", "kind": "flag", "type": "number", "default": 1}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgDef {
    pub name: String,
    #[serde(default)]
    pub kind: ArgKind,
    #[serde(default, rename = "type")]
    pub value_type: ValueType,
    /// Ignored for flags.
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
}

impl ArgDef {
    pub fn positional(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, ArgKind::Positional, value_type)
    }

    pub fn flag(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, ArgKind::Flag, value_type)
    }

    fn new(name: impl Into<String>, kind: ArgKind, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            kind,
            value_type,
            required: false,
            default: None,
            help: String::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn is_flag(&self) -> bool {
        self.kind == ArgKind::Flag
    }
}

/// Definitions split by kind, each keyed by name.
///
/// `positionals` keeps declaration order; that order is the order tokens fill them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub positionals: IndexMap<String, ArgDef>,
    pub flags: IndexMap<String, ArgDef>,
}

impl Partition {
    /// Look up a dashed key. Flags shadow positionals of the same name.
    pub fn lookup(&self, key: &str) -> Option<&ArgDef> {
        self.flags.get(key).or_else(|| self.positionals.get(key))
    }
}

/// Route definitions by kind and check the schema invariants.
///
/// Flags are forced optional. Defaults are checked against the declared type.
pub fn partition(defs: impl IntoIterator<Item = ArgDef>) -> Result<Partition, SchemaError> {
    let mut out = Partition::default();
    let mut rest: Option<String> = None;

    for mut def in defs {
        if out.positionals.contains_key(&def.name) || out.flags.contains_key(&def.name) {
            return Err(SchemaError::DuplicateDefinition(def.name));
        }
        def.default = conform_default(&def)?;

        match def.kind {
            ArgKind::Flag => {
                def.required = false;
                out.flags.insert(def.name.clone(), def);
            }
            ArgKind::Positional => {
                if let Some(name) = &rest {
                    return Err(SchemaError::MisplacedRest(name.clone()));
                }
                if def.value_type == ValueType::Rest {
                    rest = Some(def.name.clone());
                }
                out.positionals.insert(def.name.clone(), def);
            }
        }
    }

    Ok(out)
}

fn conform_default(def: &ArgDef) -> Result<Option<Value>, SchemaError> {
    let Some(value) = &def.default else {
        return Ok(None);
    };
    let conformed = match (def.value_type, value) {
        (ValueType::String | ValueType::Rest, Value::String(_))
        | (ValueType::Boolean, Value::Boolean(_)) => Some(value.clone()),
        (ValueType::Number, Value::Number(n)) if n.is_finite() => Some(value.clone()),
        (ValueType::Reference, Value::String(s) | Value::Reference(s)) => {
            parse_reference(s).map(|id| Value::Reference(id.to_string()))
        }
        _ => None,
    };
    conformed
        .map(Some)
        .ok_or_else(|| SchemaError::InvalidDefault {
            name: def.name.clone(),
            expected: def.value_type,
        })
}

/// The validated argument schema of one command.
///
/// Immutable once built. Deserializing from a JSON array of [`ArgDef`] runs the
/// same validation as [`Schema::new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ArgDef>", into = "Vec<ArgDef>")]
pub struct Schema {
    partition: Partition,
}

impl Schema {
    pub fn new(defs: impl IntoIterator<Item = ArgDef>) -> Result<Self, SchemaError> {
        Ok(Self {
            partition: partition(defs)?,
        })
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn positionals(&self) -> impl Iterator<Item = &ArgDef> {
        self.partition.positionals.values()
    }

    pub fn flags(&self) -> impl Iterator<Item = &ArgDef> {
        self.partition.flags.values()
    }

    /// Positionals in order, then flags.
    pub fn iter(&self) -> impl Iterator<Item = &ArgDef> {
        self.positionals().chain(self.flags())
    }

    pub fn get(&self, name: &str) -> Option<&ArgDef> {
        self.partition.lookup(name)
    }

    pub fn len(&self) -> usize {
        self.partition.positionals.len() + self.partition.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TryFrom<Vec<ArgDef>> for Schema {
    type Error = SchemaError;

    fn try_from(defs: Vec<ArgDef>) -> Result<Self, Self::Error> {
        Self::new(defs)
    }
}

impl From<Schema> for Vec<ArgDef> {
    fn from(schema: Schema) -> Self {
        let Partition { positionals, flags } = schema.partition;
        positionals.into_values().chain(flags.into_values()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_definitions_by_kind() {
        let p = partition([
            ArgDef::positional("a", ValueType::String),
            ArgDef::flag("x", ValueType::Boolean),
            ArgDef::positional("b", ValueType::Number),
        ])
        .unwrap();

        let positional: Vec<&str> = p.positionals.keys().map(String::as_str).collect();
        assert_eq!(positional, vec!["a", "b"]);
        assert!(p.flags.contains_key("x"));
    }

    #[test]
    fn flags_are_never_required() {
        let p = partition([ArgDef::flag("force", ValueType::Boolean).required()]).unwrap();
        assert!(!p.flags["force"].required);
    }

    #[test]
    fn rejects_duplicate_names_across_kinds() {
        let err = Schema::new([
            ArgDef::positional("user", ValueType::Reference),
            ArgDef::flag("user", ValueType::String),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateDefinition("user".to_string()));
    }

    #[test]
    fn rest_must_be_last_positional() {
        let err = Schema::new([
            ArgDef::positional("reason", ValueType::Rest),
            ArgDef::positional("extra", ValueType::String),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::MisplacedRest("reason".to_string()));

        // Flags after a rest positional are fine.
        Schema::new([
            ArgDef::positional("reason", ValueType::Rest),
            ArgDef::flag("silent", ValueType::Boolean),
        ])
        .unwrap();
    }

    #[test]
    fn defaults_must_match_type() {
        let err = Schema::new([ArgDef::flag("count", ValueType::Number).default_value("three")])
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));

        let schema = Schema::new([
            ArgDef::positional("channel", ValueType::Reference).default_value("<#42>")
        ])
        .unwrap();
        assert_eq!(
            schema.get("channel").unwrap().default,
            Some(Value::Reference("42".to_string()))
        );
    }

    #[test]
    fn deserializes_and_validates_json() {
        let schema: Schema = serde_json::from_str(
            r#"[
                {"name": "user", "type": "reference", "required": true},
                {"name": "count", "kind": "flag", "type": "number", "default": 2}
            ]"#,
        )
        .unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.get("count").unwrap().default, Some(Value::Number(2.0)));

        let err = serde_json::from_str::<Schema>(r#"[{"name": "a"}, {"name": "a"}]"#);
        assert!(err.is_err());
    }
}
