//! `tinycpp <path>`: reads a source file, runs it through the frontend and
//! evaluator against real stdin/stdout, and exits with the error
//! taxonomy's numeric code.

use std::env;
use std::fs;
use std::process::ExitCode;

fn read_source(path: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("could not read '{path}': {err}"))
}

fn main() -> ExitCode {
    let mut args = env::args();
    let program_name = args.next().unwrap_or_else(|| "tinycpp".to_string());
    let Some(path) = args.next() else {
        eprintln!("usage: {program_name} <path>");
        return ExitCode::from(99);
    };

    let source = match read_source(&path) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::from(99);
        }
    };

    match tinycpp::run_source(&source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
