/// One soil sample as entered by the grower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoilReading {
    /// Nitrogen concentration in ppm.
    pub nitrogen: f64,
    /// Phosphorus concentration in ppm.
    pub phosphorus: f64,
    /// Potassium concentration in ppm.
    pub potassium: f64,
    pub ph: f64,
    /// Moisture in percent.
    pub moisture: f64,
}

impl SoilReading {
    pub fn new(nitrogen: f64, phosphorus: f64, potassium: f64, ph: f64, moisture: f64) -> Self {
        Self {
            nitrogen,
            phosphorus,
            potassium,
            ph,
            moisture,
        }
    }
}

/// Current conditions for a location, metric units.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherReport {
    pub temperature: f64,
    pub description: String,
    pub humidity: f64,
}

/// A single ranked label from the disease classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct DiseasePrediction {
    pub label: String,
    /// Percentage in [0, 100], rounded to two decimals.
    pub confidence: f64,
}
