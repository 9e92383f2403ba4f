use std::process::ExitCode;

fn main() -> ExitCode {
    dashboard_core::init();
    match dashboard_core::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
