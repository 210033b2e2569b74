use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::tokenizer::{tokenize, Token};

/// Default upper bound on input size, in characters.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 200_000;

/// Share of control characters above which input is treated as binary.
const MAX_CONTROL_CHAR_RATIO: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    JobDescription,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Resume => write!(f, "resume"),
            DocumentKind::JobDescription => write!(f, "job description"),
        }
    }
}

/// Input rejected before any analysis runs. Never transient; retrying the same
/// input yields the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    #[error("{0} text is empty")]
    Empty(DocumentKind),

    #[error("{kind} text is {length} characters, limit is {limit}")]
    TooLong {
        kind: DocumentKind,
        length: usize,
        limit: usize,
    },

    #[error("{0} does not look like plain text")]
    NotText(DocumentKind),

    #[error("{0} is not valid UTF-8")]
    InvalidEncoding(DocumentKind),

    #[error("{0} contains no words")]
    NoWords(DocumentKind),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InputLimits {
    pub max_input_chars: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

/// Validated source text plus its token sequence. Immutable once created.
#[derive(Debug, Clone)]
pub struct Document {
    kind: DocumentKind,
    text: String,
    tokens: Vec<Token>,
}

impl Document {
    pub fn new(
        kind: DocumentKind,
        text: impl Into<String>,
        limits: &InputLimits,
    ) -> Result<Self, InvalidInputError> {
        let text = text.into();
        validate_text(kind, &text, limits)?;

        let tokens = tokenize(&text);
        if tokens.is_empty() {
            return Err(InvalidInputError::NoWords(kind));
        }

        Ok(Self { kind, text, tokens })
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

/// Decodes uploaded bytes as UTF-8 text. A leading byte-order mark is dropped.
pub fn decode_text(kind: DocumentKind, bytes: &[u8]) -> Result<&str, InvalidInputError> {
    let text = std::str::from_utf8(bytes).map_err(|_| InvalidInputError::InvalidEncoding(kind))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

fn validate_text(
    kind: DocumentKind,
    text: &str,
    limits: &InputLimits,
) -> Result<(), InvalidInputError> {
    if text.trim().is_empty() {
        return Err(InvalidInputError::Empty(kind));
    }

    let length = text.chars().count();
    if length > limits.max_input_chars {
        return Err(InvalidInputError::TooLong {
            kind,
            length,
            limit: limits.max_input_chars,
        });
    }

    if text.contains('\0') {
        return Err(InvalidInputError::NotText(kind));
    }

    let control = text
        .chars()
        .filter(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
        .count();
    if control as f64 / length as f64 > MAX_CONTROL_CHAR_RATIO {
        return Err(InvalidInputError::NotText(kind));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_document_is_tokenized() {
        let doc = Document::new(DocumentKind::Resume, "Rust engineer", &InputLimits::default())
            .unwrap();
        assert_eq!(doc.kind(), DocumentKind::Resume);
        assert_eq!(doc.tokens().len(), 2);
        assert_eq!(doc.text(), "Rust engineer");
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let err = Document::new(DocumentKind::Resume, " \n\t ", &InputLimits::default())
            .unwrap_err();
        assert_eq!(err, InvalidInputError::Empty(DocumentKind::Resume));
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        let limits = InputLimits { max_input_chars: 3 };
        assert!(Document::new(DocumentKind::JobDescription, "äöü", &limits).is_ok());

        let err = Document::new(DocumentKind::JobDescription, "abcd", &limits).unwrap_err();
        assert_eq!(
            err,
            InvalidInputError::TooLong {
                kind: DocumentKind::JobDescription,
                length: 4,
                limit: 3
            }
        );
    }

    #[test]
    fn test_nul_byte_is_not_text() {
        let err = Document::new(DocumentKind::Resume, "abc\0def", &InputLimits::default())
            .unwrap_err();
        assert_eq!(err, InvalidInputError::NotText(DocumentKind::Resume));
    }

    #[test]
    fn test_control_heavy_input_is_not_text() {
        let text = "ab\u{1}\u{2}\u{3}";
        let err = Document::new(DocumentKind::Resume, text, &InputLimits::default()).unwrap_err();
        assert_eq!(err, InvalidInputError::NotText(DocumentKind::Resume));
    }

    #[test]
    fn test_punctuation_only_has_no_words() {
        let err = Document::new(DocumentKind::Resume, "--- ***", &InputLimits::default())
            .unwrap_err();
        assert_eq!(err, InvalidInputError::NoWords(DocumentKind::Resume));
    }

    #[test]
    fn test_decode_text_rejects_invalid_utf8() {
        let err = decode_text(DocumentKind::JobDescription, &[0xff, 0xfe, 0x41]).unwrap_err();
        assert_eq!(err, InvalidInputError::InvalidEncoding(DocumentKind::JobDescription));
    }

    #[test]
    fn test_decode_text_strips_byte_order_mark() {
        let text = decode_text(DocumentKind::Resume, "\u{feff}Rust".as_bytes()).unwrap();
        assert_eq!(text, "Rust");
    }

    #[test]
    fn test_error_messages_name_the_document() {
        let err = InvalidInputError::Empty(DocumentKind::JobDescription);
        assert_eq!(err.to_string(), "job description text is empty");
    }
}
