#![warn(clippy::uninlined_format_args)]

mod bootstrap;
mod console;
mod session;
#[cfg(test)]
mod test_utils;

use std::{env, path::PathBuf, process::ExitCode};

fn main() -> ExitCode {
    let script = env::args_os().nth(1).map(PathBuf::from);
    bootstrap::run(script)
}
