//! timeline - validate, normalize and lay out timeline documents

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = timeline_doc::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
