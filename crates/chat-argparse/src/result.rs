use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::ArgError;
use crate::value::Value;

/// Typed outcome of parsing one invocation.
///
/// `errors` being empty means success. A slot that failed is absent from
/// `args`/`flags` and has an entry in `errors` instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseResult {
    pub args: IndexMap<String, Value>,
    pub flags: IndexMap<String, Value>,
    #[serde(serialize_with = "serialize_messages")]
    pub errors: Vec<ArgError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Value of a positional or flag by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.args.get(name).or_else(|| self.flags.get(name))
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_reference(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_reference)
    }

    /// Whether a flag is set to anything other than `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.flags
            .get(name)
            .is_some_and(|v| *v != Value::Boolean(false))
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

fn serialize_messages<S: Serializer>(errors: &[ArgError], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(errors.iter().map(ToString::to_string))
}
