//! Fixture executable: exits successfully when run without arguments.
//!
//! Any argument makes it fail, so the harness is known to invoke it bare.

use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        println!("binary2: ok");
        ExitCode::SUCCESS
    } else {
        eprintln!("binary2: unexpected arguments {args:?}");
        ExitCode::FAILURE
    }
}
