use std::process::ExitCode;

mod app;

fn main() -> ExitCode {
    match app::bootstrap::build_app() {
        Ok(wiring) => app::loop_runner::run(wiring),
        Err(error) => {
            tracing::error!(error = %error, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
