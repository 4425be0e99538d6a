use std::process::ExitCode;

fn main() -> ExitCode {
    csvdeck_lib::run()
}
