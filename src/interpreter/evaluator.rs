use std::fmt;

use tracing::trace;

use crate::error::EvalError;
use crate::interpreter::store::VariableStore;
use crate::scanner;

/// Deepest parenthesis nesting accepted before a factor is rejected.
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Multiply,
}

impl BinaryOp {
    fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Multiply => '*',
        }
    }

    /// Arithmetic wraps at `i32` width.
    fn apply(self, left: i32, right: i32) -> i32 {
        match self {
            Self::Add => left.wrapping_add(right),
            Self::Multiply => left.wrapping_mul(right),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Evaluates expression text against a read-only view of the store.
///
/// There is no tree: each precedence level splits its text on the level's
/// operator and hands the pieces to the next level down.
///
/// ```text
/// sum     := product ('+' product)*
/// product := factor ('*' factor)*
/// factor  := '(' sum ')' | '-' factor | digits | identifier
/// ```
///
/// Parentheses nest at most [`MAX_NESTING`] deep.
pub struct Evaluator<'s> {
    store: &'s VariableStore,
}

impl<'s> Evaluator<'s> {
    pub fn new(store: &'s VariableStore) -> Self {
        Self { store }
    }

    pub fn evaluate(&self, expression: &str) -> Result<i32, EvalError> {
        self.sum(expression, 0)
    }

    fn sum(&self, text: &str, depth: usize) -> Result<i32, EvalError> {
        self.fold(text, BinaryOp::Add, |term| self.product(term, depth))
    }

    fn product(&self, text: &str, depth: usize) -> Result<i32, EvalError> {
        self.fold(text, BinaryOp::Multiply, |factor| self.factor(factor, depth))
    }

    /// Left fold of `op` over the top-level segments of `text`.
    ///
    /// The first segment is always evaluated; later blank segments are
    /// skipped, so `1++2` is 3 and `1+` is 1.
    fn fold(
        &self,
        text: &str,
        op: BinaryOp,
        mut operand: impl FnMut(&str) -> Result<i32, EvalError>,
    ) -> Result<i32, EvalError> {
        let segments = split_top_level(text, op.symbol());
        trace!(%op, segments = segments.len(), "split");
        let (first, rest) = segments
            .split_first()
            .ok_or_else(|| EvalError::invalid_expression(text.trim()))?;

        let mut result = operand(first)?;
        for segment in rest {
            if segment.trim().is_empty() {
                continue;
            }
            result = op.apply(result, operand(segment)?);
        }
        Ok(result)
    }

    /// Leading `-` signs are peeled off in a loop, so `---x` is `-x` at any
    /// chain length.
    fn factor(&self, text: &str, depth: usize) -> Result<i32, EvalError> {
        let mut operand = text.trim();
        let mut negate = false;
        while let Some(rest) = operand.strip_prefix('-') {
            negate = !negate;
            operand = rest.trim();
        }

        let value = self.unsigned_factor(operand, depth)?;
        Ok(if negate { value.wrapping_neg() } else { value })
    }

    fn unsigned_factor(&self, text: &str, depth: usize) -> Result<i32, EvalError> {
        // Only the outer characters are checked; a mismatched interior fails
        // further down as an invalid expression.
        if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
            if depth >= MAX_NESTING {
                return Err(EvalError::invalid_expression(text));
            }
            return self.sum(inner, depth + 1);
        }

        if scanner::is_integer_literal(text) {
            return text
                .parse::<i32>()
                .map_err(|_| EvalError::invalid_expression(text));
        }

        match self.store.get(text) {
            Some(value) => {
                trace!(name = text, value, "resolved variable");
                Ok(value)
            }
            None => Err(EvalError::invalid_expression(text)),
        }
    }
}

/// Split on `separator` wherever the parenthesis depth is zero.
///
/// Splitting stops at the first `)` without a matching `(`; the rest of the
/// text becomes the last segment.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    break;
                }
            }
            c if c == separator && depth == 0 => {
                segments.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    segments.push(&text[start..]);
    segments
}
