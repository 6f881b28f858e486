use thiserror::Error;

use crate::value::{ArgKind, ValueType};

/// A defect in how a command declared its arguments.
///
/// These are raised while building a [`Schema`](crate::Schema) or registering
/// commands, never while parsing user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two definitions share a name.
    #[error("duplicate argument definition: {0}")]
    DuplicateDefinition(String),
    /// A rest positional is followed by another positional.
    #[error("rest argument '{0}' must be the last positional argument")]
    MisplacedRest(String),
    /// A default does not match the definition's value type.
    #[error("default value for '{name}' is not a valid {expected}")]
    InvalidDefault { name: String, expected: ValueType },
    /// Command names and aliases overlap.
    #[error("alias conflict: {0}")]
    AliasConflict(String),
}

/// A problem with one invocation's input.
///
/// Parsing collects every `ArgError` it finds instead of stopping at the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error("Unknown argument: {0}")]
    UnknownArgument(String),
    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
    #[error("Missing value for {0}")]
    MissingValue(String),
    #[error("Invalid number for {name}: {raw}")]
    InvalidNumber { name: String, raw: String },
    #[error("Invalid boolean for {name}: {raw}")]
    InvalidBoolean { name: String, raw: String },
    #[error("Invalid reference for {name}: {raw}")]
    InvalidReference { name: String, raw: String },
    #[error("Missing required {kind}: {name}")]
    MissingRequired { name: String, kind: ArgKind },
    #[error("Could not find entity for {name}: {id}")]
    EntityNotFound { name: String, id: String },
}
