pub mod error;
pub mod interpreter;
pub mod logging;
pub mod repl;
pub mod scanner;

// Re-export the types most callers need
pub use error::{EvalError, ProgramError};
pub use interpreter::{DumpFormat, Executor};
