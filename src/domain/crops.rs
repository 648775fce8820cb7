//! Static crop table keyed by soil type, climate and season.

pub const NO_MATCH: &[&str] = &["No suitable crops found."];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoilType {
    Loamy,
    Clay,
    Sandy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Climate {
    Warm,
    Cool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Season {
    Summer,
    Winter,
}

// Parsing is an exact, case-sensitive match on the display name.

impl SoilType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Loamy" => Some(Self::Loamy),
            "Clay" => Some(Self::Clay),
            "Sandy" => Some(Self::Sandy),
            _ => None,
        }
    }
}

impl Climate {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Warm" => Some(Self::Warm),
            "Cool" => Some(Self::Cool),
            _ => None,
        }
    }
}

impl Season {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Summer" => Some(Self::Summer),
            "Winter" => Some(Self::Winter),
            _ => None,
        }
    }
}

pub fn crops_for(soil: SoilType, climate: Climate, season: Season) -> &'static [&'static str] {
    use Climate::*;
    use Season::*;
    use SoilType::*;

    match (soil, climate, season) {
        (Loamy, Warm, Summer) => &["Tomatoes", "Corn"],
        (Loamy, Warm, Winter) => &["Wheat", "Barley"],
        (Loamy, Cool, Summer) => &["Lettuce", "Peas"],
        (Loamy, Cool, Winter) => &["Broccoli", "Cabbage"],
        (Clay, Warm, Summer) => &["Rice", "Soybeans"],
        (Clay, Warm, Winter) => &["Carrots", "Beets"],
        (Clay, Cool, Summer) => &["Spinach", "Kale"],
        (Clay, Cool, Winter) => &["Garlic", "Onions"],
        (Sandy, Warm, Summer) => &["Melons", "Peppers"],
        (Sandy, Warm, Winter) => &["Radishes", "Turnips"],
        (Sandy, Cool, Summer) => &["Potatoes", "Zucchini"],
        (Sandy, Cool, Winter) => &["Leeks", "Brussels Sprouts"],
    }
}

/// Looks up crops from raw user text; any unknown key yields [`NO_MATCH`].
pub fn recommend(soil_type: &str, climate: &str, season: &str) -> &'static [&'static str] {
    match (
        SoilType::parse(soil_type),
        Climate::parse(climate),
        Season::parse(season),
    ) {
        (Some(soil), Some(climate), Some(season)) => crops_for(soil, climate, season),
        _ => NO_MATCH,
    }
}
