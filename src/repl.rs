use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::ProgramError;
use crate::interpreter::{DumpFormat, Executor};

/// Run the interactive REPL. The store persists across lines.
pub fn run_repl(format: DumpFormat) -> Result<(), ReadlineError> {
    let mut editor = DefaultEditor::new()?;
    let mut executor = Executor::new();
    executor.set_format(format);

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                editor.add_history_entry(input)?;
                eval_line(&mut executor, input)?;
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Execute one line as a program. A failed statement has already been
/// reported, so only output failures end the session.
fn eval_line(executor: &mut Executor, line: &str) -> std::io::Result<()> {
    match executor.execute_program(line) {
        Ok(()) | Err(ProgramError::Statement { .. }) => Ok(()),
        Err(ProgramError::Output(e)) => Err(e),
    }
}
