pub mod evaluator;
pub mod statement;
pub mod store;

use std::io::Write;

use serde::Serialize;
use tracing::debug;

use crate::error::{EvalError, ProgramError};
use crate::interpreter::evaluator::Evaluator;
use crate::interpreter::statement::Statement;
use crate::interpreter::store::VariableStore;

/// How a successful program reports the final store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DumpFormat {
    /// One `name = value` line per variable.
    #[default]
    Text,
    /// A single line holding a JSON array of `{"name", "value"}` objects.
    Json,
}

#[derive(Serialize)]
struct Binding<'a> {
    name: &'a str,
    value: i32,
}

pub struct Executor {
    store: VariableStore,
    format: DumpFormat,
    /// Reported lines, kept only by capturing executors
    output: Option<Vec<String>>,
    /// Writer for reported lines (allows testing without stdout)
    writer: Box<dyn Write>,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }

    pub fn with_writer(writer: impl Write + 'static) -> Self {
        Self {
            store: VariableStore::new(),
            format: DumpFormat::default(),
            output: None,
            writer: Box::new(writer),
        }
    }

    /// An executor that writes nowhere and keeps every reported line
    /// (for tests and embedding).
    pub fn capturing() -> Self {
        Self {
            output: Some(Vec::new()),
            ..Self::with_writer(std::io::sink())
        }
    }

    pub fn set_format(&mut self, format: DumpFormat) {
        self.format = format;
    }

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    /// Every line reported so far, in order. Empty unless capturing.
    pub fn output(&self) -> &[String] {
        self.output.as_deref().unwrap_or_default()
    }

    /// Run one statement and commit its value.
    pub fn execute_statement(&mut self, text: &str) -> Result<(), EvalError> {
        let statement = Statement::parse(text.trim())?;
        let value = Evaluator::new(&self.store).evaluate(statement.expression)?;
        let created = self.store.assign(statement.identifier, value);
        debug!(name = statement.identifier, value, created, "committed");
        Ok(())
    }

    /// Run every statement in order, stopping at the first failure.
    ///
    /// Assignments made before the failing statement stay committed.
    pub fn execute(&mut self, program: &str) -> Result<(), ProgramError> {
        for (index, (offset, text)) in statements(program).enumerate() {
            self.execute_statement(text).map_err(|error| {
                debug!(index, %error, "program aborted");
                ProgramError::statement(error, index, offset, text.len())
            })?;
        }
        Ok(())
    }

    /// Run a program and report the outcome: the store dump on success, or a
    /// single `Error: <message>` line.
    pub fn execute_program(&mut self, program: &str) -> Result<(), ProgramError> {
        match self.execute(program) {
            Ok(()) => {
                let lines = match self.format {
                    DumpFormat::Text => self.dump_lines(),
                    DumpFormat::Json => vec![self.dump_json().map_err(std::io::Error::from)?],
                };
                for line in lines {
                    self.emit(line)?;
                }
                Ok(())
            }
            Err(err) => {
                self.emit(err.report_line())?;
                Err(err)
            }
        }
    }

    pub fn dump_lines(&self) -> Vec<String> {
        self.store
            .iter()
            .map(|(name, value)| format!("{name} = {value}"))
            .collect()
    }

    pub fn dump_json(&self) -> serde_json::Result<String> {
        let bindings: Vec<Binding<'_>> = self
            .store
            .iter()
            .map(|(name, value)| Binding { name, value })
            .collect();
        serde_json::to_string(&bindings)
    }

    fn emit(&mut self, line: String) -> Result<(), ProgramError> {
        writeln!(self.writer, "{line}")?;
        if let Some(lines) = &mut self.output {
            lines.push(line);
        }
        Ok(())
    }
}

/// Non-empty `;`-separated statements, trimmed, with their byte offsets.
fn statements(program: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    program.split(';').filter_map(move |raw| {
        let start = offset;
        offset += raw.len() + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let leading = raw.len() - raw.trim_start().len();
        Some((start + leading, trimmed))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn capturing() -> Executor {
        Executor::capturing()
    }

    fn run(program: &str) -> Vec<String> {
        let mut exec = capturing();
        exec.execute_program(program).expect("program should succeed");
        exec.output().to_vec()
    }

    fn run_err(program: &str) -> (ProgramError, Vec<String>) {
        let mut exec = capturing();
        let err = exec.execute_program(program).unwrap_err();
        (err, exec.output().to_vec())
    }

    #[rstest]
    #[case("x = 001;", &["x = 1"])]
    #[case("x_2 = 0;", &["x_2 = 0"])]
    #[case("x = 0; y = x; z = ---(x+y);", &["x = 0", "y = 0", "z = 0"])]
    #[case("x = 1; y = 2; z = ---(x+y)*(x+-y);", &["x = 1", "y = 2", "z = 3"])]
    #[case("x = (1+2)*3;", &["x = 9"])]
    #[case("x = 1+2*3;", &["x = 7"])]
    #[case("x = 1; x = 2;", &["x = 2"])]
    #[case("x = 1++2;", &["x = 3"])]
    fn dumps_final_state(#[case] program: &str, #[case] expected: &[&str]) {
        assert_eq!(run(program), expected);
    }

    #[rstest]
    #[case("a == 1;", "Error: Syntax error in statement")]
    #[case("x = q;", "Error: Invalid expression: q")]
    #[case("1x = 2;", "Error: Invalid identifier: 1x")]
    #[case("x = ;", "Error: Invalid expression: ")]
    fn reports_single_error_line(#[case] program: &str, #[case] expected: &str) {
        let (_, output) = run_err(program);
        assert_eq!(output, vec![expected]);
    }

    #[test]
    fn dump_uses_first_assignment_order() {
        let output = run("b = 1; a = 2; c = 3; b = 4;");
        assert_eq!(output, vec!["b = 4", "a = 2", "c = 3"]);
    }

    #[test]
    fn empty_statements_are_ignored() {
        assert_eq!(run(";; x = 1;;  ; y = x ;"), vec!["x = 1", "y = 1"]);
        assert!(run("").is_empty());
        assert!(run(" ; ; ").is_empty());
    }

    #[test]
    fn trailing_semicolon_is_optional() {
        assert_eq!(run("x = 5"), vec!["x = 5"]);
    }

    #[test]
    fn later_statements_see_earlier_commits() {
        assert_eq!(run("x = 2; x = x * x; x = x * x;"), vec!["x = 16"]);
    }

    #[test]
    fn self_reference_before_definition_is_invalid() {
        let (err, _) = run_err("x = x + 1;");
        assert_eq!(err.eval_error(), Some(&EvalError::invalid_expression("x")));
    }

    #[test]
    fn first_error_aborts_but_keeps_earlier_commits() {
        let mut exec = capturing();
        let err = exec.execute_program("x = 1; y = q; z = 3;").unwrap_err();
        assert_eq!(exec.output(), ["Error: Invalid expression: q"]);
        assert_eq!(exec.store().get("x"), Some(1));
        assert!(!exec.store().contains("y"));
        assert!(!exec.store().contains("z"));

        let ProgramError::Statement { index, span, .. } = err else {
            panic!("expected a statement error");
        };
        assert_eq!(index, 1);
        assert_eq!(span.offset(), 7);
        assert_eq!(span.len(), 5);
    }

    #[test]
    fn failing_statement_index_skips_empty_segments() {
        let (err, _) = run_err(";;x = 1;; a == b;");
        let ProgramError::Statement { index, span, .. } = err else {
            panic!("expected a statement error");
        };
        assert_eq!(index, 1);
        assert_eq!(span.offset(), 10);
    }

    #[test]
    fn writer_executors_do_not_retain_lines() {
        let mut exec = Executor::with_writer(Vec::<u8>::new());
        for _ in 0..3 {
            exec.execute_program("x = 1; y = x + 1;").expect("should succeed");
        }
        assert!(exec.output().is_empty());
    }

    #[test]
    fn execute_does_not_report() {
        let mut exec = capturing();
        exec.execute("x = 1;").expect("should succeed");
        assert!(exec.output().is_empty());
        assert_eq!(exec.dump_lines(), vec!["x = 1"]);
    }

    #[test]
    fn executor_state_persists_across_programs() {
        let mut exec = capturing();
        exec.execute_program("x = 4;").expect("first program");
        exec.execute_program("y = x * 2;").expect("second program");
        assert_eq!(exec.output(), ["x = 4", "x = 4", "y = 8"]);
    }

    #[test]
    fn independent_executors_do_not_share_state() {
        let mut first = capturing();
        let mut second = capturing();
        first.execute("x = 1;").expect("should succeed");
        assert!(second.execute("y = x;").is_err());
    }

    #[test]
    fn execute_statement_directly() {
        let mut exec = capturing();
        exec.execute_statement("  n = 6 * 7  ").expect("should succeed");
        assert_eq!(exec.store().get("n"), Some(42));
        assert_eq!(
            exec.execute_statement("n"),
            Err(EvalError::malformed_statement())
        );
    }

    #[test]
    fn json_dump() {
        let mut exec = capturing();
        exec.set_format(DumpFormat::Json);
        exec.execute_program("y = 2; x = -1;").expect("should succeed");
        assert_eq!(
            exec.output(),
            [r#"[{"name":"y","value":2},{"name":"x","value":-1}]"#]
        );
    }

    #[test]
    fn json_format_still_reports_plain_errors() {
        let mut exec = capturing();
        exec.set_format(DumpFormat::Json);
        assert!(exec.execute_program("a == 1;").is_err());
        assert_eq!(exec.output(), ["Error: Syntax error in statement"]);
    }

    #[rstest]
    #[case("text", DumpFormat::Text)]
    #[case("json", DumpFormat::Json)]
    fn dump_format_from_str(#[case] text: &str, #[case] expected: DumpFormat) {
        assert_eq!(text.parse::<DumpFormat>(), Ok(expected));
        assert_eq!(expected.to_string(), text);
    }

    #[test]
    fn statement_offsets() {
        let found: Vec<_> = statements(" a = 1 ;; b=2;").collect();
        assert_eq!(found, vec![(1, "a = 1"), (10, "b=2")]);
    }
}
