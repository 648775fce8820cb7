use std::io::{BufRead, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::{
    domain::{analyze, recommend, SoilReading},
    infra::{
        classifier::{identify_disease, ClassifierError},
        weather::{WeatherClient, WeatherClientError},
    },
    util::{
        console::{Console, ConsoleError},
        settings::{ClassifierSettings, SettingsError},
        version::Banner,
    },
};

pub const WEATHER_FAILURE: &str =
    "Failed to fetch weather data. Please check your location or API key.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Console(#[from] ConsoleError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to set up weather client: {0}")]
    Weather(#[from] WeatherClientError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// One pass through soil, crops, weather and the optional disease check.
pub async fn run_session<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    weather: &WeatherClient,
    classifier: &ClassifierSettings,
) -> Result<(), AppError> {
    console.line(Banner)?;

    let reading = read_soil(console)?;
    console.line("\nSoil Analysis Results:")?;
    for advisory in analyze(&reading) {
        console.line(format_args!("- {advisory}"))?;
    }

    let soil_type = console.ask("\nEnter Soil Type (Loamy/Clay/Sandy): ")?;
    let climate = console.ask("Enter Climate (Warm/Cool): ")?;
    let season = console.ask("Enter Season (Summer/Winter): ")?;
    console.line("\nRecommended Crops for Your Soil and Climate:")?;
    for crop in recommend(&soil_type, &climate, &season) {
        console.line(format_args!("- {crop}"))?;
    }

    let location = console.ask("\nEnter your location for weather forecast: ")?;
    match weather.fetch_weather(&location).await {
        Ok(report) => {
            console.line(format_args!("\nWeather Forecast for {location}:"))?;
            console.line(format_args!("- Temperature: {}°C", decimal(report.temperature)))?;
            console.line(format_args!("- Weather: {}", report.description))?;
            console.line(format_args!("- Humidity: {}%", report.humidity))?;
        }
        Err(err) => {
            tracing::warn!("weather lookup failed: {err}");
            console.line(WEATHER_FAILURE)?;
        }
    }

    let answer =
        console.ask("\nDo you want to identify a crop disease from an image? (yes/no): ")?;
    if answer.to_lowercase() == "yes" {
        let image_path = PathBuf::from(console.ask("Enter the path to the crop image: ")?);
        let settings = classifier.clone();
        let predictions =
            tokio::task::spawn_blocking(move || identify_disease(&image_path, &settings))
                .await
                .map_err(ClassifierError::from)??;

        console.line("\nDisease Identification Results:")?;
        for prediction in predictions {
            console.line(format_args!(
                "- {}: {}%",
                prediction.label,
                decimal(prediction.confidence)
            ))?;
        }
    }

    Ok(())
}

/// Shortest round-trip form that always keeps a fractional part (`80.0`, `12.35`).
fn decimal(value: f64) -> String {
    format!("{value:?}")
}

fn read_soil<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> Result<SoilReading, ConsoleError> {
    Ok(SoilReading {
        nitrogen: console.ask_number("Enter Nitrogen content (ppm): ")?,
        phosphorus: console.ask_number("Enter Phosphorus content (ppm): ")?,
        potassium: console.ask_number("Enter Potassium content (ppm): ")?,
        ph: console.ask_number("Enter Soil pH: ")?,
        moisture: console.ask_number("Enter Soil Moisture content (%): ")?,
    })
}
