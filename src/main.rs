use std::process::ExitCode;

fn main() -> ExitCode {
    goscribe::cli::run()
}
