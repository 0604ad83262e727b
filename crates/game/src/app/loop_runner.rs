use std::process::ExitCode;

use canvas_lord::run_app;
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    if let Err(err) = run_app(app.config, app.assets, app.root) {
        error!(error = %err, "game_loop_failed");
        return ExitCode::FAILURE;
    }

    info!("shutdown_complete");
    ExitCode::SUCCESS
}
