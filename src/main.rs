//! blockatlas - Command-line texture atlas packer

use std::process::ExitCode;

use blockatlas::cli;

fn main() -> ExitCode {
    cli::run()
}
