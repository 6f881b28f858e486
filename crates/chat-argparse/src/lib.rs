//! Schema-driven argument parsing for chat commands.
//!
//! A command declares its arguments as a [`Schema`]; [`parse`] turns one line
//! of user text into a [`ParseResult`] holding typed positionals, flags, and
//! every problem found along the way:
//!
//! ```
//! use chat_argparse::{ArgDef, Schema, ValueType, parse};
//!
//! let schema = Schema::new([
//!     ArgDef::positional("user", ValueType::Reference).required(),
//!     ArgDef::positional("reason", ValueType::Rest),
//!     ArgDef::flag("urgent", ValueType::Boolean),
//! ])
//! .unwrap();
//!
//! let parsed = parse("<@!42> --urgent spamming links", &schema);
//! assert!(parsed.is_ok());
//! assert_eq!(parsed.get_reference("user"), Some("42"));
//! assert_eq!(parsed.get_str("reason"), Some("spamming links"));
//! assert!(parsed.flag("urgent"));
//! ```
//!
//! Parsing never fails on user input and performs no I/O. Turning a parsed
//! reference into a live entity goes through a caller-supplied
//! [`EntityResolver`] (see [`parse_with_resolver`]).

pub mod coerce;
pub mod command;
mod consume;
pub mod error;
pub mod help;
pub mod resolve;
pub mod result;
pub mod schema;
pub mod tokenize;
pub mod value;

pub use command::{CommandMeta, resolve_command_name, validate_aliases};
pub use error::{ArgError, SchemaError};
pub use help::{help, usage};
pub use resolve::{EntityResolver, NotFound, Resolved, parse_with_resolver};
pub use result::ParseResult;
pub use schema::{ArgDef, Partition, Schema, partition};
pub use tokenize::tokenize;
pub use value::{ArgKind, Value, ValueType};

/// Parse one line of input (without the command name) against `schema`.
pub fn parse(raw: &str, schema: &Schema) -> ParseResult {
    let tokens = tokenize(raw);
    let consumed = consume::consume(&tokens, schema.partition());
    let result = coerce::resolve(consumed, schema.partition());
    tracing::debug!(
        tokens = tokens.len(),
        args = result.args.len(),
        flags = result.flags.len(),
        errors = result.errors.len(),
        "parsed command arguments"
    );
    result
}
