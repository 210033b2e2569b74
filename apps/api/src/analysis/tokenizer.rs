//! Tokenizer — turns raw text into normalized, comparable tokens.
//!
//! Normalization: lowercase, punctuation stripped except intra-word hyphens,
//! whitespace collapsed. Trailing `+`/`#` survive on short names so `C++` and `C#`
//! stay distinct from `C`; apostrophes are dropped in place (`bachelor's` → `bachelors`).
//!
//! Every token also carries a light suffix stem. Vocabulary phrases go through
//! the exact same pipeline, so matching is always stem-to-stem.

use serde::Serialize;

/// Longest multi-word phrase the matcher will consider.
pub const MAX_PHRASE_TOKENS: usize = 3;

/// A single normalized token with its byte span in the source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub text: String,
    pub stem: String,
    pub start: usize,
    pub end: usize,
    /// True when punctuation or a line break separates this token from the previous one.
    /// Phrases never span such a boundary.
    pub starts_clause: bool,
}

/// Splits `text` into normalized tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    let mut pending_break = true;

    let chars: Vec<(usize, char)> = text.char_indices().collect();

    for (i, &(offset, c)) in chars.iter().enumerate() {
        let next = chars.get(i + 1).map(|&(_, n)| n);
        let next_is_word = next.map(|n| n.is_alphanumeric()).unwrap_or(false);

        if c.is_alphanumeric() {
            if current.is_empty() {
                start = offset;
            }
            current.extend(c.to_lowercase());
            continue;
        }

        let in_word = !current.is_empty();
        match c {
            '\'' | '\u{2019}' if in_word && next_is_word => {}
            '-' if in_word && next_is_word => current.push('-'),
            '+' | '#' if in_word && !next_is_word && takes_suffix(&current) => current.push(c),
            // ES6+, Python3+: the qualifier is dropped, the word stays
            '+' | '#' if in_word && !next_is_word => {
                flush(&mut tokens, &mut current, start, offset, &mut pending_break);
            }
            // node.js, asp.net, CI/CD: split the word but keep the phrase intact
            '.' | '/' if in_word && next_is_word => {
                flush(&mut tokens, &mut current, start, offset, &mut pending_break);
            }
            ' ' | '\t' => {
                flush(&mut tokens, &mut current, start, offset, &mut pending_break);
            }
            _ => {
                flush(&mut tokens, &mut current, start, offset, &mut pending_break);
                pending_break = true;
            }
        }
    }
    flush(&mut tokens, &mut current, start, text.len(), &mut pending_break);

    tokens
}

/// Only one- or two-letter names carry a `+`/`#` suffix (`c++`, `c#`, `f#`).
fn takes_suffix(current: &str) -> bool {
    let base = current.trim_end_matches(['+', '#']);
    (1..=2).contains(&base.chars().count()) && base.chars().all(|c| c.is_alphabetic())
}

fn flush(
    tokens: &mut Vec<Token>,
    current: &mut String,
    start: usize,
    end: usize,
    pending_break: &mut bool,
) {
    if current.is_empty() {
        return;
    }
    let text = std::mem::take(current);
    let stem = stem(&text);
    tokens.push(Token {
        text,
        stem,
        start,
        end,
        starts_clause: *pending_break,
    });
    *pending_break = false;
}

/// Light suffix stemmer. Only plain alphabetic words longer than four characters
/// are touched, which keeps short acronyms (`aws`, `sql`, `css`) intact.
pub fn stem(word: &str) -> String {
    if word.chars().count() <= 4 || !word.chars().all(|c| c.is_alphabetic()) {
        return word.to_string();
    }
    if let Some(base) = word.strip_suffix("ies") {
        return format!("{base}y");
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(base) => base.to_string(),
        None => word.to_string(),
    }
}

/// Lookup key for a vocabulary phrase: the stems of its tokens joined by spaces.
/// Returns `None` when the phrase has no tokens.
pub fn normalize_phrase(phrase: &str) -> Option<(String, usize)> {
    let tokens = tokenize(phrase);
    if tokens.is_empty() {
        return None;
    }
    let key = tokens
        .iter()
        .map(|t| t.stem.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    Some((key, tokens.len()))
}

/// Key of the `len`-token window starting at `index`, or `None` when the window
/// runs past the end or crosses a clause boundary.
pub fn window_key(tokens: &[Token], index: usize, len: usize) -> Option<String> {
    if len == 0 || index + len > tokens.len() {
        return None;
    }
    let window = &tokens[index..index + len];
    if window.iter().skip(1).any(|t| t.starts_clause) {
        return None;
    }
    Some(
        window
            .iter()
            .map(|t| t.stem.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    )
}
