//! Household profile derived from quiz answers.
//!
//! Every answer is normalized into a closed enum with an explicit `Unknown`
//! variant. Unrecognized strings never fail; only missing mandatory answers do.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::product::{MountingType, normalize_key};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdSize {
    One,
    Two,
    ThreeToFour,
    FivePlus,
    Unknown,
}

impl HouseholdSize {
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "1" | "one" | "single" => Self::One,
            "2" | "two" => Self::Two,
            "3" | "4" | "3_4" | "3to4" | "three_to_four" => Self::ThreeToFour,
            "5" | "5+" | "5_plus" | "five_plus" => Self::FivePlus,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::One => "1 person",
            Self::Two => "2 people",
            Self::ThreeToFour => "3-4 people",
            Self::FivePlus => "5+ people",
            Self::Unknown => "unknown household size",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingType {
    RentedApartment,
    OwnedApartment,
    House,
    Unknown,
}

impl HousingType {
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "rented_apartment" | "rent" | "rented" | "apartment" => Self::RentedApartment,
            "owned_apartment" | "owned" | "condo" => Self::OwnedApartment,
            "house" | "detached" | "terraced" => Self::House,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::RentedApartment => "rented apartment",
            Self::OwnedApartment => "owned apartment",
            Self::House => "house",
            Self::Unknown => "unknown housing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeBucket {
    Small,
    Medium,
    Large,
    Unknown,
}

impl SizeBucket {
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "small" | "s" => Self::Small,
            "medium" | "m" => Self::Medium,
            "large" | "l" => Self::Large,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Unknown => "unknown",
        }
    }
}

/// Compass direction the modules would face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Unknown,
}

impl Orientation {
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "n" | "north" => Self::North,
            "ne" | "northeast" | "north_east" => Self::NorthEast,
            "e" | "east" => Self::East,
            "se" | "southeast" | "south_east" => Self::SouthEast,
            "s" | "south" => Self::South,
            "sw" | "southwest" | "south_west" => Self::SouthWest,
            "w" | "west" => Self::West,
            "nw" | "northwest" | "north_west" => Self::NorthWest,
            _ => Self::Unknown,
        }
    }

    /// Azimuth in degrees using the PVGIS convention (south = 0, west = 90).
    pub fn azimuth_deg(self) -> f64 {
        match self {
            Self::South | Self::Unknown => 0.0,
            Self::SouthWest => 45.0,
            Self::West => 90.0,
            Self::NorthWest => 135.0,
            Self::North => 180.0,
            Self::NorthEast => -135.0,
            Self::East => -90.0,
            Self::SouthEast => -45.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::NorthEast => "north-east",
            Self::East => "east",
            Self::SouthEast => "south-east",
            Self::South => "south",
            Self::SouthWest => "south-west",
            Self::West => "west",
            Self::NorthWest => "north-west",
            Self::Unknown => "unknown orientation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shading {
    None,
    Light,
    Moderate,
    /// Worst level; blocks a positive recommendation.
    Heavy,
    Unknown,
}

impl Shading {
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "none" | "no" | "no_shading" => Self::None,
            "light" | "little" | "partial" => Self::Light,
            "moderate" | "medium" => Self::Moderate,
            "heavy" | "strong" | "full" => Self::Heavy,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "no shading",
            Self::Light => "light shading",
            Self::Moderate => "moderate shading",
            Self::Heavy => "heavy shading",
            Self::Unknown => "unknown shading",
        }
    }
}

/// Yearly budget ceiling chosen in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Budget {
    UpTo500,
    UpTo800,
    UpTo1200,
    UpTo2000,
    NoLimit,
    Unknown,
}

impl Budget {
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "up_to_500" | "500" => Self::UpTo500,
            "up_to_800" | "800" => Self::UpTo800,
            "up_to_1200" | "1200" => Self::UpTo1200,
            "up_to_2000" | "2000" => Self::UpTo2000,
            "no_limit" | "unlimited" => Self::NoLimit,
            _ => Self::Unknown,
        }
    }

    /// Price ceiling in €, `None` when the catalog is not filtered by price.
    pub fn ceiling_eur(self) -> Option<f64> {
        match self {
            Self::UpTo500 => Some(500.0),
            Self::UpTo800 => Some(800.0),
            Self::UpTo1200 => Some(1200.0),
            Self::UpTo2000 => Some(2000.0),
            Self::NoLimit | Self::Unknown => None,
        }
    }

    pub fn label(self) -> String {
        match self.ceiling_eur() {
            Some(c) => format!("up to {c:.0} €"),
            None if self == Self::NoLimit => "no budget limit".to_string(),
            None => "unknown budget".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EcoImportance {
    Low,
    Medium,
    High,
    VeryHigh,
    Unknown,
}

impl EcoImportance {
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "low" | "1" => Self::Low,
            "medium" | "2" => Self::Medium,
            "high" | "3" => Self::High,
            "very_high" | "4" => Self::VeryHigh,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very high",
            Self::Unknown => "unknown",
        }
    }
}

/// Household appliances that raise the consumption estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Appliance {
    Dishwasher,
    WashingMachine,
    Dryer,
    ElectricWaterHeater,
    HomeOffice,
    Other,
}

impl Appliance {
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "dishwasher" => Self::Dishwasher,
            "washing_machine" | "washer" => Self::WashingMachine,
            "dryer" | "tumble_dryer" => Self::Dryer,
            "electric_water_heater" | "water_heater" | "boiler" => Self::ElectricWaterHeater,
            "home_office" | "office" => Self::HomeOffice,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Rejects non-finite or out-of-range coordinates.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Consumption answer as typed into the form: a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConsumptionAnswer {
    Number(f64),
    Text(String),
}

impl ConsumptionAnswer {
    /// Positive finite kWh value, if one can be read.
    pub fn kwh(&self) -> Option<f64> {
        let v = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
        };
        (v.is_finite() && v > 0.0).then_some(v)
    }
}

/// Raw quiz answers keyed by question identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizAnswers {
    pub location: Option<Coordinates>,
    pub household_size: Option<String>,
    pub housing_type: Option<String>,
    pub apartment_size: Option<String>,
    pub mounting_location: Option<String>,
    pub orientation: Option<String>,
    pub balcony_size: Option<String>,
    pub shading: Option<String>,
    pub appliances: Vec<String>,
    pub consumption: Option<ConsumptionAnswer>,
    pub budget: Option<String>,
    pub eco_importance: Option<String>,
}

/// Errors for structurally incomplete answer sets.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("missing answer for question `{0}`")]
    MissingAnswer(&'static str),
}

/// Normalized household profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub household_size: HouseholdSize,
    pub housing_type: HousingType,
    pub apartment_size: SizeBucket,
    pub mounting: MountingType,
    pub orientation: Orientation,
    pub balcony_size: SizeBucket,
    pub shading: Shading,
    pub budget: Budget,
    pub eco_importance: EcoImportance,
    pub appliances: Vec<Appliance>,
    pub declared_consumption_kwh: Option<f64>,
    pub coordinates: Option<Coordinates>,
}

impl Profile {
    /// Builds a profile from quiz answers.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::MissingAnswer` when a mandatory question
    /// (household size, mounting location, orientation, shading, budget) has
    /// no answer at all. Unrecognized values are not errors.
    pub fn from_answers(answers: &QuizAnswers) -> Result<Self, ProfileError> {
        let household = required(&answers.household_size, "household_size")?;
        let mounting = required(&answers.mounting_location, "mounting_location")?;
        let orientation = required(&answers.orientation, "orientation")?;
        let shading = required(&answers.shading, "shading")?;
        let budget = required(&answers.budget, "budget")?;

        Ok(Self {
            household_size: HouseholdSize::parse(household),
            housing_type: optional(&answers.housing_type, HousingType::parse, HousingType::Unknown),
            apartment_size: optional(&answers.apartment_size, SizeBucket::parse, SizeBucket::Unknown),
            mounting: MountingType::parse(mounting),
            orientation: Orientation::parse(orientation),
            balcony_size: optional(&answers.balcony_size, SizeBucket::parse, SizeBucket::Unknown),
            shading: Shading::parse(shading),
            budget: Budget::parse(budget),
            eco_importance: optional(
                &answers.eco_importance,
                EcoImportance::parse,
                EcoImportance::Unknown,
            ),
            appliances: answers.appliances.iter().map(|a| Appliance::parse(a)).collect(),
            declared_consumption_kwh: answers.consumption.as_ref().and_then(ConsumptionAnswer::kwh),
            coordinates: answers.location.filter(Coordinates::is_valid),
        })
    }

    /// One-line human readable summary of the profile.
    pub fn summary(&self) -> String {
        let mut parts = vec![
            self.household_size.label().to_string(),
            self.housing_type.label().to_string(),
            format!("{} mounting", self.mounting.label()),
            format!("facing {}", self.orientation.label()),
            self.shading.label().to_string(),
            self.budget.label(),
            format!("ecological importance {}", self.eco_importance.label()),
        ];
        if let Some(kwh) = self.declared_consumption_kwh {
            parts.push(format!("{kwh:.0} kWh/year declared"));
        }
        parts.join(", ")
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

fn required<'a>(value: &'a Option<String>, key: &'static str) -> Result<&'a str, ProfileError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ProfileError::MissingAnswer(key)),
    }
}

fn optional<T>(value: &Option<String>, parse: fn(&str) -> T, fallback: T) -> T {
    value.as_deref().map_or(fallback, parse)
}
