//! Lexeme recognizers.
//!
//! Expressions are evaluated by splitting substrings, not by walking a token
//! stream, so this module only answers "is this whole piece of text an
//! identifier / an integer literal?".

use winnow::prelude::*;
use winnow::token::{any, take_while};

fn identifier<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (
        any.verify(|c: &char| c.is_ascii_alphabetic() || *c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn digits<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)
}

/// True when the entire text matches `[a-zA-Z_][a-zA-Z0-9_]*`.
pub fn is_identifier(text: &str) -> bool {
    identifier.parse(text).is_ok()
}

/// True when the entire text is one or more ASCII decimal digits.
pub fn is_integer_literal(text: &str) -> bool {
    digits.parse(text).is_ok()
}
