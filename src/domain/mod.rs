//! Soil and crop decision logic lives here.

pub mod crops;
pub mod entities;
pub mod soil;

#[allow(unused_imports)]
pub use crops::{crops_for, recommend, Climate, Season, SoilType, NO_MATCH};
#[allow(unused_imports)]
pub use entities::{DiseasePrediction, SoilReading, WeatherReport};
#[allow(unused_imports)]
pub use soil::{analyze, analyze_soil, Advisory, Level, SoilAttribute};
