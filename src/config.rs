//! TOML-based assumption tables and preset definitions.
//!
//! Every tariff, lookup table and scoring breakpoint used by the calculators
//! lives here and is passed into the engine explicitly.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    Appliance, EcoImportance, HouseholdSize, ManufacturingOrigin, Orientation, Shading,
    SizeBucket,
};

/// Top-level assumption set parsed from TOML.
///
/// All fields have defaults matching the German market. Load from TOML with
/// [`Assumptions::from_toml_file`] or use [`Assumptions::germany`] for the
/// built-in default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Assumptions {
    /// Electricity price, feed-in tariff and grid carbon intensity.
    #[serde(default)]
    pub tariffs: TariffConfig,
    /// Yield model constants.
    #[serde(default)]
    pub yield_model: YieldModelConfig,
    /// Orientation factor table.
    #[serde(default)]
    pub orientation: OrientationFactors,
    /// Shading factor table.
    #[serde(default)]
    pub shading: ShadingFactors,
    /// Self-consumption rates and bonuses.
    #[serde(default)]
    pub self_consumption: SelfConsumptionConfig,
    /// Household consumption estimate.
    #[serde(default)]
    pub consumption: ConsumptionConfig,
    /// Manufacturing footprint model.
    #[serde(default)]
    pub ecology: EcologyConfig,
    /// Scoring curves and ranking weights.
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Thresholds for reasons and warnings.
    #[serde(default)]
    pub explain: ExplainConfig,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::germany()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Retail electricity price (€/kWh).
    pub electricity_price_eur_per_kwh: f64,
    /// Feed-in compensation (€/kWh).
    pub feed_in_tariff_eur_per_kwh: f64,
    /// Grid carbon intensity (g CO₂/kWh).
    pub grid_co2_g_per_kwh: f64,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            electricity_price_eur_per_kwh: 0.35,
            feed_in_tariff_eur_per_kwh: 0.082,
            grid_co2_g_per_kwh: 380.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct YieldModelConfig {
    /// Annual yield per Wp for an unshaded south-facing system (kWh/Wp).
    pub base_yield_kwh_per_wp: f64,
    /// Legal AC feed-in ceiling (W).
    pub legal_ac_limit_w: f64,
    /// Extra yield of bifacial modules (fraction).
    pub bifacial_gain: f64,
    /// Battery round-trip efficiency (0.0–1.0).
    pub battery_round_trip_efficiency: f64,
}

impl Default for YieldModelConfig {
    fn default() -> Self {
        Self {
            base_yield_kwh_per_wp: 0.95,
            legal_ac_limit_w: 800.0,
            bifacial_gain: 0.08,
            battery_round_trip_efficiency: 0.90,
        }
    }
}

/// Yield multipliers by compass orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrientationFactors {
    pub south: f64,
    pub south_east_west: f64,
    pub east_west: f64,
    pub north_east_west: f64,
    pub north: f64,
    pub unknown: f64,
}

impl Default for OrientationFactors {
    fn default() -> Self {
        Self {
            south: 1.0,
            south_east_west: 0.95,
            east_west: 0.80,
            north_east_west: 0.60,
            north: 0.55,
            unknown: 0.85,
        }
    }
}

impl OrientationFactors {
    pub fn factor(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::South => self.south,
            Orientation::SouthEast | Orientation::SouthWest => self.south_east_west,
            Orientation::East | Orientation::West => self.east_west,
            Orientation::NorthEast | Orientation::NorthWest => self.north_east_west,
            Orientation::North => self.north,
            Orientation::Unknown => self.unknown,
        }
    }

    fn values(&self) -> [(&'static str, f64); 6] {
        [
            ("south", self.south),
            ("south_east_west", self.south_east_west),
            ("east_west", self.east_west),
            ("north_east_west", self.north_east_west),
            ("north", self.north),
            ("unknown", self.unknown),
        ]
    }
}

/// Yield multipliers by shading level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadingFactors {
    pub none: f64,
    pub light: f64,
    pub moderate: f64,
    pub heavy: f64,
    pub unknown: f64,
}

impl Default for ShadingFactors {
    fn default() -> Self {
        Self {
            none: 1.0,
            light: 0.85,
            moderate: 0.65,
            heavy: 0.40,
            unknown: 0.85,
        }
    }
}

impl ShadingFactors {
    pub fn factor(&self, shading: Shading) -> f64 {
        match shading {
            Shading::None => self.none,
            Shading::Light => self.light,
            Shading::Moderate => self.moderate,
            Shading::Heavy => self.heavy,
            Shading::Unknown => self.unknown,
        }
    }

    fn values(&self) -> [(&'static str, f64); 5] {
        [
            ("none", self.none),
            ("light", self.light),
            ("moderate", self.moderate),
            ("heavy", self.heavy),
            ("unknown", self.unknown),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelfConsumptionConfig {
    pub one_person: f64,
    pub two_people: f64,
    pub three_to_four_people: f64,
    pub five_plus_people: f64,
    pub unknown_household: f64,
    /// Added when the product has a battery.
    pub storage_bonus: f64,
    /// Added for east or west facing modules.
    pub east_west_bonus: f64,
    /// Added for the four diagonal orientations.
    pub diagonal_bonus: f64,
    /// Upper clamp of the resulting rate.
    pub max_rate: f64,
}

impl Default for SelfConsumptionConfig {
    fn default() -> Self {
        Self {
            one_person: 0.30,
            two_people: 0.35,
            three_to_four_people: 0.40,
            five_plus_people: 0.45,
            unknown_household: 0.35,
            storage_bonus: 0.25,
            east_west_bonus: 0.05,
            diagonal_bonus: 0.02,
            max_rate: 0.75,
        }
    }
}

impl SelfConsumptionConfig {
    pub fn base_rate(&self, household: HouseholdSize) -> f64 {
        match household {
            HouseholdSize::One => self.one_person,
            HouseholdSize::Two => self.two_people,
            HouseholdSize::ThreeToFour => self.three_to_four_people,
            HouseholdSize::FivePlus => self.five_plus_people,
            HouseholdSize::Unknown => self.unknown_household,
        }
    }
}

/// Annual household consumption estimate (kWh).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumptionConfig {
    pub one_person_kwh: f64,
    pub two_people_kwh: f64,
    pub three_to_four_people_kwh: f64,
    pub five_plus_people_kwh: f64,
    pub unknown_household_kwh: f64,
    pub small_apartment_kwh: f64,
    pub large_apartment_kwh: f64,
    pub dishwasher_kwh: f64,
    pub washing_machine_kwh: f64,
    pub dryer_kwh: f64,
    pub electric_water_heater_kwh: f64,
    pub home_office_kwh: f64,
    /// Lower bound of the estimate.
    pub minimum_kwh: f64,
}

impl Default for ConsumptionConfig {
    fn default() -> Self {
        Self {
            one_person_kwh: 1500.0,
            two_people_kwh: 2500.0,
            three_to_four_people_kwh: 3500.0,
            five_plus_people_kwh: 4500.0,
            unknown_household_kwh: 2500.0,
            small_apartment_kwh: -200.0,
            large_apartment_kwh: 400.0,
            dishwasher_kwh: 250.0,
            washing_machine_kwh: 200.0,
            dryer_kwh: 400.0,
            electric_water_heater_kwh: 800.0,
            home_office_kwh: 300.0,
            minimum_kwh: 500.0,
        }
    }
}

impl ConsumptionConfig {
    pub fn household_kwh(&self, household: HouseholdSize) -> f64 {
        match household {
            HouseholdSize::One => self.one_person_kwh,
            HouseholdSize::Two => self.two_people_kwh,
            HouseholdSize::ThreeToFour => self.three_to_four_people_kwh,
            HouseholdSize::FivePlus => self.five_plus_people_kwh,
            HouseholdSize::Unknown => self.unknown_household_kwh,
        }
    }

    pub fn apartment_adjustment_kwh(&self, size: SizeBucket) -> f64 {
        match size {
            SizeBucket::Small => self.small_apartment_kwh,
            SizeBucket::Large => self.large_apartment_kwh,
            SizeBucket::Medium | SizeBucket::Unknown => 0.0,
        }
    }

    pub fn appliance_kwh(&self, appliance: Appliance) -> f64 {
        match appliance {
            Appliance::Dishwasher => self.dishwasher_kwh,
            Appliance::WashingMachine => self.washing_machine_kwh,
            Appliance::Dryer => self.dryer_kwh,
            Appliance::ElectricWaterHeater => self.electric_water_heater_kwh,
            Appliance::HomeOffice => self.home_office_kwh,
            Appliance::Other => 0.0,
        }
    }
}

/// Shipping distance by manufacturing origin (km).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OriginDistances {
    pub domestic: f64,
    pub europe: f64,
    pub china: f64,
    pub other_asia: f64,
    /// Used when the origin is unknown.
    pub unknown: f64,
}

impl Default for OriginDistances {
    fn default() -> Self {
        Self {
            domestic: 300.0,
            europe: 1500.0,
            china: 20000.0,
            other_asia: 18000.0,
            unknown: 15000.0,
        }
    }
}

impl OriginDistances {
    pub fn km(&self, origin: ManufacturingOrigin) -> f64 {
        match origin {
            ManufacturingOrigin::Domestic => self.domestic,
            ManufacturingOrigin::Europe => self.europe,
            ManufacturingOrigin::China => self.china,
            ManufacturingOrigin::OtherAsia => self.other_asia,
            ManufacturingOrigin::Unknown => self.unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EcologyConfig {
    /// Module manufacturing emissions (kg CO₂/Wp).
    pub module_co2_kg_per_wp: f64,
    /// Inverter manufacturing emissions (kg CO₂/W of AC rating).
    pub inverter_co2_kg_per_w: f64,
    /// Battery manufacturing emissions (kg CO₂/kWh).
    pub battery_co2_kg_per_kwh: f64,
    /// Module mass (kg/Wp).
    pub module_weight_kg_per_wp: f64,
    /// Inverter mass (kg).
    pub inverter_weight_kg: f64,
    /// Battery mass (kg/kWh).
    pub battery_weight_kg_per_kwh: f64,
    /// Freight emissions (kg CO₂ per tonne-km).
    pub transport_co2_kg_per_tkm: f64,
    /// Lifecycle period used when a product has no warranty period.
    pub default_lifetime_years: u32,
    pub origin_distance_km: OriginDistances,
}

impl Default for EcologyConfig {
    fn default() -> Self {
        Self {
            module_co2_kg_per_wp: 0.45,
            inverter_co2_kg_per_w: 0.05,
            battery_co2_kg_per_kwh: 100.0,
            module_weight_kg_per_wp: 0.055,
            inverter_weight_kg: 3.0,
            battery_weight_kg_per_kwh: 10.0,
            transport_co2_kg_per_tkm: 0.015,
            default_lifetime_years: 20,
            origin_distance_km: OriginDistances::default(),
        }
    }
}

/// Heuristic scoring curves. Product policy, pinned by tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// CO₂ payback at or below this earns full marks (years).
    pub payback_full_marks_years: f64,
    /// Knee of the payback curve (years).
    pub payback_knee_years: f64,
    /// Payback score at the knee.
    pub payback_knee_score: f64,
    /// Payback at or above this scores zero (years).
    pub payback_zero_years: f64,
    /// Footprint at or below this earns full marks (kg CO₂).
    pub footprint_full_marks_kg: f64,
    /// Footprint at or above this scores zero (kg CO₂).
    pub footprint_zero_kg: f64,
    pub payback_weight: f64,
    pub footprint_weight: f64,
    /// Amortization at or below this earns full economic marks (years).
    pub amortization_full_marks_years: f64,
    /// Amortization at or above this scores zero (years).
    pub amortization_zero_years: f64,
    pub eco_weight_low: f64,
    pub eco_weight_medium: f64,
    pub eco_weight_high: f64,
    pub eco_weight_very_high: f64,
    pub eco_weight_unknown: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            payback_full_marks_years: 3.0,
            payback_knee_years: 5.0,
            payback_knee_score: 70.0,
            payback_zero_years: 15.0,
            footprint_full_marks_kg: 150.0,
            footprint_zero_kg: 650.0,
            payback_weight: 0.6,
            footprint_weight: 0.4,
            amortization_full_marks_years: 4.0,
            amortization_zero_years: 20.0,
            eco_weight_low: 0.2,
            eco_weight_medium: 0.4,
            eco_weight_high: 0.6,
            eco_weight_very_high: 0.75,
            eco_weight_unknown: 0.4,
        }
    }
}

impl ScoringConfig {
    /// Weight of the ecological score in the composite.
    pub fn eco_weight(&self, importance: EcoImportance) -> f64 {
        match importance {
            EcoImportance::Low => self.eco_weight_low,
            EcoImportance::Medium => self.eco_weight_medium,
            EcoImportance::High => self.eco_weight_high,
            EcoImportance::VeryHigh => self.eco_weight_very_high,
            EcoImportance::Unknown => self.eco_weight_unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplainConfig {
    pub short_amortization_years: f64,
    pub no_amortization_years: f64,
    pub strong_eco_score: f64,
    pub long_warranty_years: u32,
    pub long_payback_years: f64,
    pub high_footprint_kg: f64,
    pub short_warranty_years: u32,
    /// Share of raw yield lost to clipping that triggers a warning.
    pub clipping_loss_share: f64,
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            short_amortization_years: 6.0,
            no_amortization_years: 20.0,
            strong_eco_score: 70.0,
            long_warranty_years: 20,
            long_payback_years: 8.0,
            high_footprint_kg: 500.0,
            short_warranty_years: 10,
            clipping_loss_share: 0.15,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"tariffs.electricity_price_eur_per_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Assumptions {
    /// German market defaults.
    pub fn germany() -> Self {
        Self {
            tariffs: TariffConfig::default(),
            yield_model: YieldModelConfig::default(),
            orientation: OrientationFactors::default(),
            shading: ShadingFactors::default(),
            self_consumption: SelfConsumptionConfig::default(),
            consumption: ConsumptionConfig::default(),
            ecology: EcologyConfig::default(),
            scoring: ScoringConfig::default(),
            explain: ExplainConfig::default(),
        }
    }

    /// Expensive retail electricity with a low feed-in tariff.
    pub fn high_tariff() -> Self {
        Self {
            tariffs: TariffConfig {
                electricity_price_eur_per_kwh: 0.45,
                feed_in_tariff_eur_per_kwh: 0.0,
                ..TariffConfig::default()
            },
            ..Self::germany()
        }
    }

    /// Low-carbon grid mix, which stretches every CO₂ payback period.
    pub fn green_grid() -> Self {
        Self {
            tariffs: TariffConfig {
                grid_co2_g_per_kwh: 120.0,
                ..TariffConfig::default()
            },
            ..Self::germany()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["germany", "high_tariff", "green_grid"];

    /// Loads assumptions from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "germany" => Ok(Self::germany()),
            "high_tariff" => Ok(Self::high_tariff()),
            "green_grid" => Ok(Self::green_grid()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses assumptions from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("assumptions", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses assumptions from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the assumptions are valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let t = &self.tariffs;
        non_negative(&mut errors, "tariffs.electricity_price_eur_per_kwh", t.electricity_price_eur_per_kwh);
        non_negative(&mut errors, "tariffs.feed_in_tariff_eur_per_kwh", t.feed_in_tariff_eur_per_kwh);
        non_negative(&mut errors, "tariffs.grid_co2_g_per_kwh", t.grid_co2_g_per_kwh);

        let y = &self.yield_model;
        positive(&mut errors, "yield_model.base_yield_kwh_per_wp", y.base_yield_kwh_per_wp);
        positive(&mut errors, "yield_model.legal_ac_limit_w", y.legal_ac_limit_w);
        non_negative(&mut errors, "yield_model.bifacial_gain", y.bifacial_gain);
        unit_interval(&mut errors, "yield_model.battery_round_trip_efficiency", y.battery_round_trip_efficiency);

        for (name, v) in self.orientation.values() {
            unit_interval(&mut errors, &format!("orientation.{name}"), v);
        }
        for (name, v) in self.shading.values() {
            unit_interval(&mut errors, &format!("shading.{name}"), v);
        }

        let sc = &self.self_consumption;
        unit_interval(&mut errors, "self_consumption.max_rate", sc.max_rate);
        for (name, v) in [
            ("one_person", sc.one_person),
            ("two_people", sc.two_people),
            ("three_to_four_people", sc.three_to_four_people),
            ("five_plus_people", sc.five_plus_people),
            ("unknown_household", sc.unknown_household),
            ("storage_bonus", sc.storage_bonus),
            ("east_west_bonus", sc.east_west_bonus),
            ("diagonal_bonus", sc.diagonal_bonus),
        ] {
            unit_interval(&mut errors, &format!("self_consumption.{name}"), v);
        }

        positive(&mut errors, "consumption.minimum_kwh", self.consumption.minimum_kwh);

        let e = &self.ecology;
        non_negative(&mut errors, "ecology.module_co2_kg_per_wp", e.module_co2_kg_per_wp);
        non_negative(&mut errors, "ecology.inverter_co2_kg_per_w", e.inverter_co2_kg_per_w);
        non_negative(&mut errors, "ecology.battery_co2_kg_per_kwh", e.battery_co2_kg_per_kwh);
        non_negative(&mut errors, "ecology.transport_co2_kg_per_tkm", e.transport_co2_kg_per_tkm);
        if e.default_lifetime_years == 0 {
            errors.push(ConfigError::new("ecology.default_lifetime_years", "must be > 0"));
        }

        let s = &self.scoring;
        if !(s.payback_full_marks_years < s.payback_knee_years
            && s.payback_knee_years < s.payback_zero_years)
        {
            errors.push(ConfigError::new(
                "scoring.payback_knee_years",
                "must satisfy payback_full_marks_years < payback_knee_years < payback_zero_years",
            ));
        }
        if !(0.0..=100.0).contains(&s.payback_knee_score) {
            errors.push(ConfigError::new("scoring.payback_knee_score", "must be in [0, 100]"));
        }
        if s.footprint_full_marks_kg >= s.footprint_zero_kg {
            errors.push(ConfigError::new(
                "scoring.footprint_full_marks_kg",
                "must be < scoring.footprint_zero_kg",
            ));
        }
        if s.amortization_full_marks_years >= s.amortization_zero_years {
            errors.push(ConfigError::new(
                "scoring.amortization_full_marks_years",
                "must be < scoring.amortization_zero_years",
            ));
        }
        if (s.payback_weight + s.footprint_weight - 1.0).abs() > 1e-9 {
            errors.push(ConfigError::new(
                "scoring.payback_weight",
                "payback_weight + footprint_weight must equal 1.0",
            ));
        }
        for (name, v) in [
            ("eco_weight_low", s.eco_weight_low),
            ("eco_weight_medium", s.eco_weight_medium),
            ("eco_weight_high", s.eco_weight_high),
            ("eco_weight_very_high", s.eco_weight_very_high),
            ("eco_weight_unknown", s.eco_weight_unknown),
        ] {
            unit_interval(&mut errors, &format!("scoring.{name}"), v);
        }

        errors
    }
}

fn positive(errors: &mut Vec<ConfigError>, field: &str, v: f64) {
    if !(v.is_finite() && v > 0.0) {
        errors.push(ConfigError::new(field, "must be > 0"));
    }
}

fn non_negative(errors: &mut Vec<ConfigError>, field: &str, v: f64) {
    if !(v.is_finite() && v >= 0.0) {
        errors.push(ConfigError::new(field, "must be >= 0"));
    }
}

fn unit_interval(errors: &mut Vec<ConfigError>, field: &str, v: f64) {
    if !(0.0..=1.0).contains(&v) {
        errors.push(ConfigError::new(field, "must be in [0.0, 1.0]"));
    }
}
