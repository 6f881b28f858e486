//! Whitespace tokenizer and flag-token helpers.

/// Split `raw` on runs of whitespace. There is no quoting or escaping.
pub fn tokenize(raw: &str) -> Vec<&str> {
    raw.split_whitespace().collect()
}

/// Whether a token names a flag (`-x`, `--x`, `--x=value`).
pub fn is_flag_like(token: &str) -> bool {
    token.starts_with('-')
}

/// Split a flag-like token into its key and optional inline value.
///
/// One `--` or one `-` is stripped. Returns `None` for a bare `-` or `--`.
pub fn split_flag(token: &str) -> Option<(&str, Option<&str>)> {
    let trimmed = token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))
        .unwrap_or(token);
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.split_once('=') {
        Some((key, value)) => Some((key, Some(value))),
        None => Some((trimmed, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace_runs() {
        assert_eq!(tokenize("  a\tb   c\n"), vec!["a", "b", "c"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\n ").is_empty());
    }

    #[test]
    fn quotes_are_ordinary_characters() {
        assert_eq!(tokenize("\"two words\""), vec!["\"two", "words\""]);
    }

    #[test]
    fn split_flag_handles_dashes_and_inline_values() {
        assert_eq!(split_flag("--count=3"), Some(("count", Some("3"))));
        assert_eq!(split_flag("-v"), Some(("v", None)));
        assert_eq!(split_flag("--a=b=c"), Some(("a", Some("b=c"))));
        assert_eq!(split_flag("--x="), Some(("x", Some(""))));
        assert_eq!(split_flag("--"), None);
        assert_eq!(split_flag("-"), None);
    }
}
