use crate::error::EvalError;
use crate::scanner;

/// One `identifier = expression` assignment, borrowed from the program text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement<'a> {
    pub identifier: &'a str,
    pub expression: &'a str,
}

impl<'a> Statement<'a> {
    /// Split a trimmed statement on its single `=` and validate the target.
    pub fn parse(text: &'a str) -> Result<Self, EvalError> {
        let mut parts = text.split('=');
        let (Some(lhs), Some(rhs), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(EvalError::malformed_statement());
        };

        let identifier = lhs.trim();
        if !scanner::is_identifier(identifier) {
            return Err(EvalError::invalid_identifier(identifier));
        }

        Ok(Self {
            identifier,
            expression: rhs.trim(),
        })
    }
}
