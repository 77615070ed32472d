//! chroma-backup - timestamped zip backups of a Chroma database directory
//!
//! Main binary entry point for the command-line interface.

use clap::Parser;
use chroma_backup::cli::{self, Cli};
use chroma_backup::{logging, Console};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Cli::parse();

    if let Err(e) = logging::init_logging(args.verbose) {
        eprintln!("{:#}", e);
    }

    let mut console = Console::stdout(!args.no_color);

    let code = match cli::run(&args, &mut console) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            console.error(format!("{:#}", err));
            console.error(format!("Details: {:?}", err));
            ExitCode::FAILURE
        }
    };

    if args.interactive {
        cli::wait_for_enter(&mut console, io::stdin().lock());
    }

    code
}
