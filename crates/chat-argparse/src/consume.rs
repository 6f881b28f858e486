//! Token classification: assign each token to a definition.
//!
//! This stage only decides *which* slot a token belongs to. Text values are
//! coerced later by [`crate::coerce::resolve`].

use indexmap::IndexMap;
use std::borrow::Cow;
use std::collections::HashSet;

use crate::error::ArgError;
use crate::schema::{ArgDef, Partition};
use crate::tokenize::{is_flag_like, split_flag};
use crate::value::{ArgKind, Value, ValueType};

/// What the scan captured for one slot.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Raw<'a> {
    /// Input text still to be coerced.
    Text(Cow<'a, str>),
    /// Named without a value and settled by default or presence.
    Settled(Value),
}

#[derive(Debug, Default)]
pub(crate) struct Consumed<'a> {
    pub positionals: IndexMap<String, Raw<'a>>,
    pub flags: IndexMap<String, Raw<'a>>,
    pub errors: Vec<ArgError>,
    /// Slots that already produced an error; they are not reported missing again.
    pub reported: HashSet<String>,
}

impl<'a> Consumed<'a> {
    fn slots(&mut self, kind: ArgKind) -> &mut IndexMap<String, Raw<'a>> {
        match kind {
            ArgKind::Positional => &mut self.positionals,
            ArgKind::Flag => &mut self.flags,
        }
    }

    /// Record a dashed definition, falling back when no value was found.
    fn settle(&mut self, def: &ArgDef, value: Option<Cow<'a, str>>) {
        let raw = match (value, &def.default, def.kind) {
            (Some(text), _, _) => Raw::Text(text),
            (None, Some(default), _) => Raw::Settled(default.clone()),
            (None, None, ArgKind::Flag) => Raw::Settled(Value::Boolean(true)),
            (None, None, ArgKind::Positional) => {
                if def.required {
                    self.errors.push(ArgError::MissingValue(def.name.clone()));
                    self.reported.insert(def.name.clone());
                }
                return;
            }
        };
        self.slots(def.kind).insert(def.name.clone(), raw);
    }
}

/// Walk `tokens` once, left to right.
///
/// Flags may appear anywhere between positionals. A rest positional ends the
/// scan and owns every remaining token, flag-like or not.
pub(crate) fn consume<'a>(tokens: &[&'a str], schema: &Partition) -> Consumed<'a> {
    let mut out = Consumed::default();
    let mut cursor = 0usize;
    let mut i = 0usize;

    while i < tokens.len() {
        let token = tokens[i];

        if is_flag_like(token) {
            let Some((key, inline)) = split_flag(token) else {
                i += 1;
                continue;
            };
            let Some(def) = schema.lookup(key) else {
                out.errors.push(ArgError::UnknownArgument(key.to_string()));
                i += 1;
                continue;
            };
            let (value, next) = named_value(tokens, i, inline, def);
            out.settle(def, value);
            i = next;
            continue;
        }

        // Skip positionals already filled by `--name value`.
        while schema
            .positionals
            .get_index(cursor)
            .is_some_and(|(name, _)| out.positionals.contains_key(name))
        {
            cursor += 1;
        }

        let Some((name, def)) = schema.positionals.get_index(cursor) else {
            out.errors
                .push(ArgError::UnexpectedArgument(token.to_string()));
            i += 1;
            continue;
        };

        if def.value_type == ValueType::Rest {
            let joined = tokens[i..].join(" ");
            out.positionals
                .insert(name.clone(), Raw::Text(Cow::Owned(joined)));
            break;
        }

        out.positionals
            .insert(name.clone(), Raw::Text(Cow::Borrowed(token)));
        cursor += 1;
        i += 1;
    }

    out
}

/// Find the value for the dashed token at `at`. Returns it with the index of
/// the next unread token.
fn named_value<'a>(
    tokens: &[&'a str],
    at: usize,
    inline: Option<&'a str>,
    def: &ArgDef,
) -> (Option<Cow<'a, str>>, usize) {
    let after = at + 1;

    if def.value_type == ValueType::Rest {
        let remainder = &tokens[after..];
        let value = match inline {
            Some(v) if remainder.is_empty() => Some(Cow::Borrowed(v)),
            Some(v) => Some(Cow::Owned(format!("{v} {}", remainder.join(" ")))),
            None if remainder.is_empty() => None,
            None => Some(Cow::Owned(remainder.join(" "))),
        };
        return (value, tokens.len());
    }

    if let Some(v) = inline {
        return (Some(Cow::Borrowed(v)), after);
    }

    // Flag definitions never take the following token; `--name value` only
    // works for positionals addressed by name.
    if def.kind == ArgKind::Positional {
        if let Some(next) = tokens.get(after).filter(|t| !is_flag_like(t)) {
            return (Some(Cow::Borrowed(*next)), after + 1);
        }
    }

    (None, after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::partition;
    use crate::tokenize::tokenize;

    fn text(s: &str) -> Raw<'_> {
        Raw::Text(Cow::Borrowed(s))
    }

    #[test]
    fn positional_tokens_fill_in_order() {
        let p = partition([
            ArgDef::positional("a", ValueType::String),
            ArgDef::positional("b", ValueType::String),
        ])
        .unwrap();
        let out = consume(&tokenize("one two three"), &p);
        assert_eq!(out.positionals["a"], text("one"));
        assert_eq!(out.positionals["b"], text("two"));
        assert_eq!(
            out.errors,
            vec![ArgError::UnexpectedArgument("three".to_string())]
        );
    }

    #[test]
    fn dashed_positional_takes_next_token_and_is_skipped_later() {
        let p = partition([
            ArgDef::positional("a", ValueType::String),
            ArgDef::positional("b", ValueType::String),
        ])
        .unwrap();
        let out = consume(&tokenize("--a first second"), &p);
        assert_eq!(out.positionals["a"], text("first"));
        assert_eq!(out.positionals["b"], text("second"));
        assert!(out.errors.is_empty());
    }

    #[test]
    fn flags_do_not_take_the_next_token() {
        let p = partition([
            ArgDef::positional("target", ValueType::String),
            ArgDef::flag("mode", ValueType::String),
        ])
        .unwrap();
        let out = consume(&tokenize("--mode fast"), &p);
        assert_eq!(out.flags["mode"], Raw::Settled(Value::Boolean(true)));
        assert_eq!(out.positionals["target"], text("fast"));
    }

    #[test]
    fn bare_flag_prefers_its_default() {
        let p = partition([ArgDef::flag("count", ValueType::Number).default_value(5)]).unwrap();
        let out = consume(&tokenize("--count"), &p);
        assert_eq!(out.flags["count"], Raw::Settled(Value::Number(5.0)));
    }

    #[test]
    fn dashed_required_positional_without_value_reports_missing_value() {
        let p = partition([
            ArgDef::positional("name", ValueType::String).required(),
            ArgDef::flag("v", ValueType::Boolean),
        ])
        .unwrap();
        let out = consume(&tokenize("--name -v"), &p);
        assert_eq!(out.errors, vec![ArgError::MissingValue("name".to_string())]);
        assert!(out.reported.contains("name"));
        assert!(!out.positionals.contains_key("name"));
        assert_eq!(out.flags["v"], Raw::Settled(Value::Boolean(true)));
    }

    #[test]
    fn rest_flag_joins_inline_value_with_remainder() {
        let p = partition([
            ArgDef::positional("a", ValueType::String),
            ArgDef::flag("note", ValueType::Rest),
        ])
        .unwrap();
        let out = consume(&tokenize("x --note=hello big -world"), &p);
        assert_eq!(out.positionals["a"], text("x"));
        assert_eq!(
            out.flags["note"],
            Raw::Text(Cow::Owned("hello big -world".to_string()))
        );
        assert!(out.errors.is_empty());
    }

    #[test]
    fn rest_flag_without_anything_after_is_presence() {
        let p = partition([ArgDef::flag("note", ValueType::Rest)]).unwrap();
        let out = consume(&tokenize("--note"), &p);
        assert_eq!(out.flags["note"], Raw::Settled(Value::Boolean(true)));
    }

    #[test]
    fn bare_dashes_are_ignored() {
        let p = partition([ArgDef::positional("a", ValueType::String)]).unwrap();
        let out = consume(&tokenize("-- - word"), &p);
        assert_eq!(out.positionals["a"], text("word"));
        assert!(out.errors.is_empty());
    }
}
