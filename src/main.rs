mod app;
mod domain;
mod infra;
mod util;

use std::io;
use std::process::ExitCode;

use crate::app::{run_session, AppError};
use crate::infra::weather::WeatherClient;
use crate::util::{
    console::Console,
    logging,
    settings::AppSettings,
    version::{version_label, APP_NAME},
};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    tracing::info!("starting {APP_NAME} {}", version_label());

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("session aborted: {err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let settings = AppSettings::load()?;
    if settings.weather.api_key.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY is not set, weather lookups will fail");
    }
    let weather = WeatherClient::new(&settings.weather)?;

    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());
    run_session(&mut console, &weather, &settings.classifier).await
}
