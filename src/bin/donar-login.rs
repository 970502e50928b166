use anyhow::Result;
use donar_login::cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let action = cli::start()?;

    let code = action.execute().await;

    cli::telemetry::shutdown_tracer();

    code
}
