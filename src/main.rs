use std::process::ExitCode;

use clap::error::ErrorKind;
use pincopy::errors::{CopyError, EXIT_FAILURE};
use pincopy::{cli, output as out};

mod app;
mod logging;

fn main() -> ExitCode {
    let args = match cli::try_parse() {
        Ok(a) => a,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            out::print_usage(env!("CARGO_PKG_NAME"));
            return ExitCode::from(CopyError::ArgumentCount.exit_code());
        }
    };

    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = match e.downcast_ref::<CopyError>() {
                Some(ce) => {
                    out::print_error(&ce.diagnostic());
                    ce.exit_code()
                }
                None => {
                    out::print_error(&format!("{e:#}"));
                    EXIT_FAILURE
                }
            };
            ExitCode::from(code)
        }
    }
}
