use std::process::ExitCode;

fn main() -> ExitCode {
    dealiq_cli::run()
}
