//! Threshold-based soil advice.

use std::fmt;

use super::entities::SoilReading;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoilAttribute {
    Nitrogen,
    Phosphorus,
    Potassium,
    Ph,
    Moisture,
}

impl SoilAttribute {
    /// Fixed evaluation order of the checks.
    pub const ALL: [SoilAttribute; 5] = [
        SoilAttribute::Nitrogen,
        SoilAttribute::Phosphorus,
        SoilAttribute::Potassium,
        SoilAttribute::Ph,
        SoilAttribute::Moisture,
    ];

    /// Exclusive (low, high) bounds of the nominal band.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Self::Nitrogen => (50.0, 200.0),
            Self::Phosphorus => (20.0, 100.0),
            Self::Potassium => (150.0, 400.0),
            Self::Ph => (5.5, 7.5),
            Self::Moisture => (30.0, 70.0),
        }
    }

    pub fn value_in(&self, reading: &SoilReading) -> f64 {
        match self {
            Self::Nitrogen => reading.nitrogen,
            Self::Phosphorus => reading.phosphorus,
            Self::Potassium => reading.potassium,
            Self::Ph => reading.ph,
            Self::Moisture => reading.moisture,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// One triggered check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Advisory {
    pub attribute: SoilAttribute,
    pub level: Level,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match (self.attribute, self.level) {
            (SoilAttribute::Nitrogen, Level::Low) => {
                "Low Nitrogen: Consider adding organic compost or nitrogen-rich fertilizers."
            }
            (SoilAttribute::Nitrogen, Level::High) => {
                "High Nitrogen: Monitor plant growth for excessive foliage."
            }
            (SoilAttribute::Phosphorus, Level::Low) => {
                "Low Phosphorus: Consider adding bone meal or rock phosphate."
            }
            (SoilAttribute::Phosphorus, Level::High) => {
                "High Phosphorus: Excessive phosphorus may lock out other nutrients."
            }
            (SoilAttribute::Potassium, Level::Low) => {
                "Low Potassium: Use potash fertilizers like wood ash or greensand."
            }
            (SoilAttribute::Potassium, Level::High) => {
                "High Potassium: May affect the uptake of magnesium and calcium."
            }
            (SoilAttribute::Ph, Level::Low) => "Acidic soil: Consider adding lime to raise pH.",
            (SoilAttribute::Ph, Level::High) => {
                "Alkaline soil: Add sulfur or organic matter to lower pH."
            }
            (SoilAttribute::Moisture, Level::Low) => {
                "Low moisture: Ensure regular watering or use mulch to retain moisture."
            }
            (SoilAttribute::Moisture, Level::High) => {
                "High moisture: Improve drainage to prevent root rot."
            }
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Runs every check in order and collects the triggered advisories.
/// Values are not range-checked; NaN triggers nothing.
pub fn analyze(reading: &SoilReading) -> Vec<Advisory> {
    SoilAttribute::ALL
        .iter()
        .filter_map(|attribute| classify(*attribute, attribute.value_in(reading)))
        .collect()
}

pub fn analyze_soil(
    nitrogen: f64,
    phosphorus: f64,
    potassium: f64,
    ph: f64,
    moisture: f64,
) -> Vec<Advisory> {
    analyze(&SoilReading::new(nitrogen, phosphorus, potassium, ph, moisture))
}

fn classify(attribute: SoilAttribute, value: f64) -> Option<Advisory> {
    let (low, high) = attribute.bounds();
    let level = if value < low {
        Level::Low
    } else if value > high {
        Level::High
    } else {
        return None;
    };
    Some(Advisory { attribute, level })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn messages(advisories: &[Advisory]) -> Vec<&'static str> {
        advisories.iter().map(Advisory::message).collect()
    }

    fn nominal() -> SoilReading {
        SoilReading::new(100.0, 50.0, 200.0, 6.5, 50.0)
    }

    fn with_value(attribute: SoilAttribute, value: f64) -> SoilReading {
        let mut reading = nominal();
        match attribute {
            SoilAttribute::Nitrogen => reading.nitrogen = value,
            SoilAttribute::Phosphorus => reading.phosphorus = value,
            SoilAttribute::Potassium => reading.potassium = value,
            SoilAttribute::Ph => reading.ph = value,
            SoilAttribute::Moisture => reading.moisture = value,
        }
        reading
    }

    #[test]
    fn nominal_reading_has_no_advice() {
        assert!(analyze(&nominal()).is_empty());
        assert!(analyze_soil(100.0, 50.0, 200.0, 6.5, 50.0).is_empty());
    }

    #[test]
    fn bounds_themselves_are_nominal() {
        for attribute in SoilAttribute::ALL {
            let (low, high) = attribute.bounds();
            assert!(analyze(&with_value(attribute, low)).is_empty(), "{attribute:?} low");
            assert!(analyze(&with_value(attribute, high)).is_empty(), "{attribute:?} high");
        }
    }

    #[test]
    fn everything_low_follows_check_order() {
        let advice = analyze_soil(10.0, 5.0, 100.0, 4.0, 10.0);
        assert_eq!(
            messages(&advice),
            vec![
                "Low Nitrogen: Consider adding organic compost or nitrogen-rich fertilizers.",
                "Low Phosphorus: Consider adding bone meal or rock phosphate.",
                "Low Potassium: Use potash fertilizers like wood ash or greensand.",
                "Acidic soil: Consider adding lime to raise pH.",
                "Low moisture: Ensure regular watering or use mulch to retain moisture.",
            ]
        );
    }

    #[test]
    fn everything_high_follows_check_order() {
        let advice = analyze_soil(250.0, 150.0, 500.0, 8.0, 90.0);
        let attributes: Vec<_> = advice.iter().map(|a| a.attribute).collect();
        assert_eq!(attributes, SoilAttribute::ALL.to_vec());
        assert!(advice.iter().all(|a| a.level == Level::High));
        assert_eq!(
            advice[3].to_string(),
            "Alkaline soil: Add sulfur or organic matter to lower pH."
        );
    }

    #[test]
    fn out_of_domain_values_use_the_same_thresholds() {
        let advice = analyze_soil(100.0, 50.0, 200.0, 6.5, -5.0);
        assert_eq!(
            advice,
            vec![Advisory {
                attribute: SoilAttribute::Moisture,
                level: Level::Low
            }]
        );
    }

    #[test]
    fn nan_triggers_nothing() {
        assert!(analyze(&with_value(SoilAttribute::Ph, f64::NAN)).is_empty());
    }

    fn check_attribute(attribute: SoilAttribute, value: f64) {
        let (low, high) = attribute.bounds();
        let advice = analyze(&with_value(attribute, value));
        let expected = if value < low {
            vec![Advisory { attribute, level: Level::Low }]
        } else if value > high {
            vec![Advisory { attribute, level: Level::High }]
        } else {
            Vec::new()
        };
        assert_eq!(advice, expected, "{attribute:?} = {value}");
    }

    proptest! {
        #[test]
        fn nitrogen_thresholds(value in -100.0f64..500.0) {
            check_attribute(SoilAttribute::Nitrogen, value);
        }

        #[test]
        fn phosphorus_thresholds(value in -50.0f64..300.0) {
            check_attribute(SoilAttribute::Phosphorus, value);
        }

        #[test]
        fn potassium_thresholds(value in -100.0f64..1000.0) {
            check_attribute(SoilAttribute::Potassium, value);
        }

        #[test]
        fn ph_thresholds(value in 0.0f64..14.0) {
            check_attribute(SoilAttribute::Ph, value);
        }

        #[test]
        fn moisture_thresholds(value in -10.0f64..110.0) {
            check_attribute(SoilAttribute::Moisture, value);
        }

        #[test]
        fn at_most_one_advisory_per_attribute(
            n in -100.0f64..500.0,
            p in -50.0f64..300.0,
            k in -100.0f64..1000.0,
            ph in 0.0f64..14.0,
            m in -10.0f64..110.0,
        ) {
            let advice = analyze_soil(n, p, k, ph, m);
            prop_assert!(advice.len() <= 5);
            let order: Vec<_> = advice.iter().map(|a| a.attribute).collect();
            let expected: Vec<_> = SoilAttribute::ALL
                .iter()
                .copied()
                .filter(|attribute| order.contains(attribute))
                .collect();
            prop_assert_eq!(order, expected);
        }
    }
}
