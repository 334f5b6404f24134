//! Sentinel tokenization of report markup.

/// A piece of report markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal markup, passed through unchanged.
    Text(&'a str),
    /// One full occurrence of the sentinel.
    Sentinel,
}

/// Split `markup` into text runs and exact sentinel occurrences.
///
/// Matching is on the full sentinel only; partial or unbalanced variants stay
/// in the surrounding text. An empty sentinel matches nothing.
#[must_use]
pub fn tokenize<'a>(markup: &'a str, sentinel: &str) -> Vec<Token<'a>> {
    if sentinel.is_empty() {
        return if markup.is_empty() {
            Vec::new()
        } else {
            vec![Token::Text(markup)]
        };
    }

    let mut tokens = Vec::new();
    let mut cursor = 0;
    for (start, matched) in markup.match_indices(sentinel) {
        if start > cursor {
            tokens.push(Token::Text(&markup[cursor..start]));
        }
        tokens.push(Token::Sentinel);
        cursor = start + matched.len();
    }
    if cursor < markup.len() {
        tokens.push(Token::Text(&markup[cursor..]));
    }
    tokens
}
