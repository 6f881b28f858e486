//! Coercion of raw text into typed values, plus default/required resolution.

use indexmap::IndexMap;
use std::collections::HashSet;

use crate::consume::{Consumed, Raw};
use crate::error::ArgError;
use crate::result::ParseResult;
use crate::schema::{ArgDef, Partition};
use crate::value::{Value, ValueType};

const TRUTHY: [&str; 4] = ["true", "1", "yes", "on"];
const FALSY: [&str; 4] = ["false", "0", "no", "off"];
const REFERENCE_PREFIXES: [&str; 4] = ["@!", "@&", "@", "#"];

/// Convert one raw token to the definition's declared type.
pub fn coerce(raw: &str, def: &ArgDef) -> Result<Value, ArgError> {
    let name = || def.name.clone();
    match def.value_type {
        ValueType::String | ValueType::Rest => Ok(Value::String(raw.to_string())),
        ValueType::Number => parse_number(raw)
            .map(Value::Number)
            .ok_or_else(|| ArgError::InvalidNumber {
                name: name(),
                raw: raw.to_string(),
            }),
        ValueType::Boolean => parse_bool(raw)
            .map(Value::Boolean)
            .ok_or_else(|| ArgError::InvalidBoolean {
                name: name(),
                raw: raw.to_string(),
            }),
        ValueType::Reference => parse_reference(raw)
            .map(|id| Value::Reference(id.to_string()))
            .ok_or_else(|| ArgError::InvalidReference {
                name: name(),
                raw: raw.to_string(),
            }),
    }
}

/// Decimal floating-point literal. Empty, `inf` and `NaN` are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    let normalized = raw.trim().to_ascii_lowercase();
    if TRUTHY.contains(&normalized.as_str()) {
        Some(true)
    } else if FALSY.contains(&normalized.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Extract the identifier from a mention (`<@123>`, `<@!123>`, `<@&123>`,
/// `<#123>`, `<123>`) or a bare id.
///
/// The id must be a strictly positive integer written canonically, so `0`,
/// `007` and `+7` are all rejected.
pub fn parse_reference(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    let id = match raw.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        Some(inner) => REFERENCE_PREFIXES
            .iter()
            .find_map(|prefix| inner.strip_prefix(prefix))
            .unwrap_or(inner),
        None => raw,
    };
    let canonical =
        !id.is_empty() && !id.starts_with('0') && id.bytes().all(|b| b.is_ascii_digit());
    canonical.then_some(id)
}

/// Turn the scan output into the final result.
///
/// Every definition ends up with a value, an error, or nothing (optional and
/// unmatched). Slots are emitted in schema order.
pub(crate) fn resolve(consumed: Consumed<'_>, schema: &Partition) -> ParseResult {
    let Consumed {
        positionals,
        flags,
        mut errors,
        reported,
    } = consumed;

    let args = resolve_slots(&schema.positionals, positionals, &reported, &mut errors);
    let flags = resolve_slots(&schema.flags, flags, &reported, &mut errors);

    ParseResult {
        args,
        flags,
        errors,
    }
}

fn resolve_slots(
    defs: &IndexMap<String, ArgDef>,
    mut raw: IndexMap<String, Raw<'_>>,
    reported: &HashSet<String>,
    errors: &mut Vec<ArgError>,
) -> IndexMap<String, Value> {
    let mut out = IndexMap::new();

    for (name, def) in defs {
        match raw.swap_remove(name) {
            Some(Raw::Settled(value)) => {
                out.insert(name.clone(), value);
            }
            Some(Raw::Text(text)) => match coerce(&text, def) {
                Ok(value) => {
                    out.insert(name.clone(), value);
                }
                Err(e) => errors.push(e),
            },
            None => {
                if let Some(default) = &def.default {
                    out.insert(name.clone(), default.clone());
                } else if def.required && !reported.contains(name) {
                    errors.push(ArgError::MissingRequired {
                        name: name.clone(),
                        kind: def.kind,
                    });
                }
            }
        }
    }

    out
}
