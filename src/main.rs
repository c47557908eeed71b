//! depsat CLI entry point
//!
//! Parses arguments, runs the command and maps the outcome onto the process
//! exit code: 0 when satisfied, 1 when not, 2 on error.

use clap::Parser;
use depsat_cli::cli;
use depsat_cli::core::user_friendly_error;

fn main() {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(2);
        }
    }
}
