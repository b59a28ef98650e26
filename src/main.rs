use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use tally::{DumpFormat, Executor, ProgramError, logging, repl};

/// The sample programs run by `--demo`.
const DEMO_PROGRAMS: [&str; 4] = [
    "x = 001;",
    "x_2 = 0;",
    "x = 0; y = x; z = ---(x+y);",
    "x = 1; y = 2; z = ---(x+y)*(x+-y);",
];

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    about = "Evaluate programs of semicolon-separated integer assignments"
)]
struct Cli {
    /// Program file to run (omit for REPL)
    file: Option<PathBuf>,

    /// Program text to run instead of a file
    #[arg(short, long, value_name = "PROGRAM", conflicts_with = "file")]
    eval: Option<String>,

    /// Run the built-in sample programs
    #[arg(long, conflicts_with_all = ["file", "eval"])]
    demo: bool,

    /// Output format for the final variable dump
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Also render a failing statement as a labelled diagnostic on stderr
    #[arg(long)]
    diagnostics: bool,
}

fn read_source(cli: &Cli) -> Result<Option<(String, String)>> {
    if let Some(ref program) = cli.eval {
        return Ok(Some(("<eval>".to_string(), program.clone())));
    }
    match &cli.file {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("read source file '{}'", path.display()))?;
            Ok(Some((path.display().to_string(), source)))
        }
        None => Ok(None),
    }
}

/// Run one program on a fresh executor. Returns whether it succeeded.
fn run_source(name: &str, source: &str, cli: &Cli, format: DumpFormat) -> Result<bool> {
    let mut executor = Executor::new();
    executor.set_format(format);
    match executor.execute_program(source) {
        Ok(()) => Ok(true),
        Err(err @ ProgramError::Statement { .. }) => {
            if cli.diagnostics {
                let report = miette::Report::new(err.with_source_code(name, source));
                eprintln!("{report:?}");
            }
            Ok(false)
        }
        Err(err) => Err(err).context("report program output"),
    }
}

fn run_demo(cli: &Cli, format: DumpFormat) -> Result<bool> {
    let mut all_ok = true;
    for (i, program) in DEMO_PROGRAMS.iter().enumerate() {
        println!("Input {}", i + 1);
        println!("{program}");
        println!("Output {}", i + 1);
        all_ok &= run_source(&format!("demo {}", i + 1), program, cli, format)?;
        println!();
    }
    Ok(all_ok)
}

fn main() -> Result<ExitCode> {
    logging::init();
    let cli = Cli::parse();
    let format: DumpFormat = cli
        .format
        .parse()
        .with_context(|| format!("unknown dump format '{}'", cli.format))?;

    let succeeded = if cli.demo {
        run_demo(&cli, format)?
    } else {
        match read_source(&cli)? {
            Some((name, source)) => run_source(&name, &source, &cli, format)?,
            None => {
                repl::run_repl(format).context("interactive session")?;
                true
            }
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
