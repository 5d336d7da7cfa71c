//! List-response parsing.
//!
//! The knowledge base answers list-valued goals with text of the form
//! `[item1,item2,...]`, items optionally quoted. This is the only format
//! boundary in the system, so the rules here are exact:
//!
//! 1. Take the text between the first `[` and the last `]`.
//! 2. Blank content is the empty list.
//! 3. Otherwise split on `,`, trim each token and strip one matching pair of
//!    surrounding quotes (`'…'` or `"…"`).
//! 4. A response that lacks either bracket is a single item: the trimmed raw
//!    response.

use crate::query::{is_bare_atom, is_compound, quoted};
use thiserror::Error;

/// Why a response could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("closing `]` precedes opening `[` in {raw:?}")]
pub struct MalformedList {
    pub raw: String,
}

/// Parse a bracketed list response into its items.
pub fn parse_list(raw: &str) -> Result<Vec<String>, MalformedList> {
    let (Some(open), Some(close)) = (raw.find('['), raw.rfind(']')) else {
        return Ok(vec![raw.trim().to_string()]);
    };
    if close < open {
        return Err(MalformedList {
            raw: raw.to_string(),
        });
    }

    let content = &raw[open + 1..close];
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(content
        .split(',')
        .map(|item| strip_quotes(item.trim()).to_string())
        .collect())
}

/// Remove one matching pair of surrounding quote characters.
pub fn strip_quotes(token: &str) -> &str {
    for quote in ['\'', '"'] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return &token[1..token.len() - 1];
        }
    }
    token
}

/// Strip the quotes of a single quoted term and undo `\'` / `\\` escapes.
///
/// Used for scalar answers such as descriptions, which are free text rather
/// than list items.
pub fn unquote_text(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = strip_quotes(trimmed);
    if inner.len() == trimmed.len() {
        return inner.to_string();
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('\\' | '\'' | '"')) => out.push(next),
                Some('n') => out.push('\n'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Render items in the list format [`parse_list`] reads, quoting any item
/// that is not a bare atom or a compound term.
pub fn render_list<S: AsRef<str>>(items: &[S]) -> String {
    let rendered: Vec<String> = items
        .iter()
        .map(|item| {
            let item = item.as_ref();
            if is_bare_atom(item) || is_compound(item) {
                item.to_string()
            } else {
                quoted(item)
            }
        })
        .collect();
    format!("[{}]", rendered.join(","))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn identifier() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z][a-z0-9_]{0,8}",
            "[a-z]{1,6}\\([a-z0-9_]{1,6}\\)",
            "[a-z]{1,6}\\([0-9]{4}s\\)",
            "[A-Z][a-z]{0,5}( [a-z]{1,5})?",
        ]
    }

    proptest! {
        #[test]
        fn rendered_identifiers_read_back(items in prop::collection::vec(identifier(), 0..10)) {
            prop_assert_eq!(parse_list(&render_list(&items)).unwrap(), items);
        }

        #[test]
        fn text_outside_the_brackets_never_leaks(
            prefix in "[A-Za-z =]{0,12}",
            items in prop::collection::vec("[a-z]{1,6}", 1..5),
        ) {
            let raw = format!("{prefix}{}.", render_list(&items));
            prop_assert_eq!(parse_list(&raw).unwrap(), items);
        }
    }
}
