use std::process::ExitCode;

fn main() -> ExitCode {
    linequote_cli::run()
}
