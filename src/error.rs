use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

// ============= Statement errors =============

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("{message}")]
    #[diagnostic(code(tally::syntax))]
    Syntax { message: String },

    /// Reserved for a declaration form that binds a name without a value.
    /// The store never holds such an entry, so nothing raises this today.
    #[error("Variable {name} is uninitialized")]
    #[diagnostic(code(tally::uninitialized))]
    Uninitialized { name: String },

    #[error("Invalid expression: {text}")]
    #[diagnostic(code(tally::invalid_expression))]
    InvalidExpression { text: String },
}

impl EvalError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    /// A statement that does not contain exactly one `=`.
    pub fn malformed_statement() -> Self {
        Self::syntax("Syntax error in statement")
    }

    pub fn invalid_identifier(identifier: &str) -> Self {
        Self::syntax(format!("Invalid identifier: {identifier}"))
    }

    pub fn uninitialized(name: impl Into<String>) -> Self {
        Self::Uninitialized { name: name.into() }
    }

    pub fn invalid_expression(text: impl Into<String>) -> Self {
        Self::InvalidExpression { text: text.into() }
    }
}

// ============= Program errors (with miette diagnostics) =============

#[derive(Error, Debug, Diagnostic)]
pub enum ProgramError {
    #[error("{error}")]
    #[diagnostic(code(tally::statement))]
    Statement {
        error: EvalError,
        /// Zero-based position of the failing statement among the non-empty ones.
        index: usize,
        #[label("this statement")]
        span: SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl ProgramError {
    pub fn statement(error: EvalError, index: usize, offset: usize, len: usize) -> Self {
        Self::Statement {
            error,
            index,
            span: SourceSpan::new(offset.into(), len),
            src: miette::NamedSource::new("input", String::new()),
        }
    }

    /// Attach source code for fancy miette diagnostics
    pub fn with_source_code(self, name: impl Into<String>, source: impl Into<String>) -> Self {
        match self {
            Self::Statement {
                error, index, span, ..
            } => Self::Statement {
                error,
                index,
                span,
                src: miette::NamedSource::new(name.into(), source.into()),
            },
            other => other,
        }
    }

    /// The statement-level error, if this failure came from executing a statement.
    pub fn eval_error(&self) -> Option<&EvalError> {
        match self {
            Self::Statement { error, .. } => Some(error),
            Self::Output(_) => None,
        }
    }

    /// The line reported on the output channel.
    pub fn report_line(&self) -> String {
        format!("Error: {self}")
    }
}

// ============= Tests =============
