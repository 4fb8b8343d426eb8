//! Catalog product entity and its closed attribute sets.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a product can be mounted.
///
/// Shared between the product catalog (supported set) and the household
/// profile (chosen location). The profile additionally allows `Unknown`.
/// Deserialization goes through [`MountingType::parse`], so aliases and
/// unrecognized values never fail a catalog load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum MountingType {
    /// Hooked onto a balcony railing.
    Railing,
    /// Fixed to a facade or balcony wall.
    Wall,
    /// Elevated stand on a flat roof or terrace.
    FlatRoof,
    /// Free-standing in a garden.
    Ground,
    /// Location not given.
    Unknown,
}

impl MountingType {
    /// Normalizes a quiz answer; anything unrecognized becomes `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "railing" | "balcony" | "balcony_railing" => Self::Railing,
            "wall" | "facade" => Self::Wall,
            "flat_roof" | "roof" | "terrace" => Self::FlatRoof,
            "ground" | "garden" => Self::Ground,
            _ => Self::Unknown,
        }
    }

    /// Panel tilt in degrees assumed for irradiance lookups.
    pub fn tilt_deg(self) -> f64 {
        match self {
            Self::Railing | Self::Wall => 90.0,
            Self::FlatRoof | Self::Ground => 30.0,
            Self::Unknown => 60.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Railing => "balcony railing",
            Self::Wall => "wall",
            Self::FlatRoof => "flat roof",
            Self::Ground => "garden",
            Self::Unknown => "unknown location",
        }
    }
}

impl From<String> for MountingType {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

/// Manufacturing origin of a product.
///
/// Closed set: domestic, regional (Europe), two distant regions, unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManufacturingOrigin {
    Domestic,
    Europe,
    China,
    OtherAsia,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ManufacturingOrigin {
    /// Whether the origin counts as regional manufacturing.
    pub fn is_regional(self) -> bool {
        match self {
            Self::Domestic | Self::Europe => true,
            Self::China | Self::OtherAsia | Self::Unknown => false,
        }
    }

    /// Whether the origin implies intercontinental shipping.
    pub fn is_distant(self) -> bool {
        match self {
            Self::China | Self::OtherAsia => true,
            Self::Domestic | Self::Europe | Self::Unknown => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Domestic => "Germany",
            Self::Europe => "Europe",
            Self::China => "China",
            Self::OtherAsia => "Asia",
            Self::Unknown => "unknown origin",
        }
    }
}

/// A balcony power plant as supplied by the catalog.
///
/// Immutable once loaded. Optional fields carry documented defaults that the
/// accessor methods apply, so calculators never inspect raw `Option`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub brand: String,
    pub name: String,
    /// DC nameplate power of all modules combined (Wp).
    pub wattage_wp: f64,
    #[serde(default = "default_module_count")]
    pub module_count: u32,
    pub price_eur: f64,
    #[serde(default = "default_true")]
    pub has_inverter: bool,
    /// Inverter AC rating (W). Absent means the legal ceiling applies.
    #[serde(default)]
    pub inverter_power_w: Option<f64>,
    #[serde(default)]
    pub has_storage: bool,
    #[serde(default)]
    pub storage_capacity_kwh: Option<f64>,
    #[serde(default)]
    pub mounting_types: BTreeSet<MountingType>,
    #[serde(default)]
    pub bifacial: bool,
    /// Module efficiency (%).
    #[serde(default)]
    pub module_efficiency_pct: f64,
    #[serde(default)]
    pub warranty_years: u32,
    #[serde(default)]
    pub origin: ManufacturingOrigin,
    /// Pre-computed manufacturing footprint (kg CO₂), replaces the bottom-up model.
    #[serde(default)]
    pub manufacturing_co2_kg: Option<f64>,
    #[serde(default)]
    pub description: String,
}

fn default_module_count() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Usable storage capacity in kWh, zero when the product has no battery.
    pub fn storage_kwh(&self) -> f64 {
        if !self.has_storage {
            return 0.0;
        }
        match self.storage_capacity_kwh {
            Some(c) if c.is_finite() && c > 0.0 => c,
            _ => 0.0,
        }
    }

    /// True when a battery with positive capacity is present.
    pub fn has_usable_storage(&self) -> bool {
        self.storage_kwh() > 0.0
    }

    /// Inverter nameplate rating in W; absent or invalid means `legal_limit_w`.
    pub fn inverter_rating_w(&self, legal_limit_w: f64) -> f64 {
        match self.inverter_power_w {
            Some(p) if p.is_finite() && p > 0.0 => p,
            _ => legal_limit_w,
        }
    }

    /// Effective AC output limit in W, capped at `legal_limit_w`.
    pub fn ac_power_w(&self, legal_limit_w: f64) -> f64 {
        if self.has_inverter {
            self.inverter_rating_w(legal_limit_w).min(legal_limit_w)
        } else {
            legal_limit_w
        }
    }

    /// Whether the product can be installed at `mounting`.
    ///
    /// `Unknown` matches everything since nothing can be ruled out.
    pub fn supports_mounting(&self, mounting: MountingType) -> bool {
        match mounting {
            MountingType::Unknown => true,
            MountingType::Railing
            | MountingType::Wall
            | MountingType::FlatRoof
            | MountingType::Ground => self.mounting_types.contains(&mounting),
        }
    }

    /// `brand name` for display.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.name)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} Wp, {:.2} €)",
            self.display_name(),
            self.wattage_wp,
            self.price_eur
        )
    }
}

/// Lowercases and unifies separators so `"Flat-Roof"` and `"flat roof"` match.
pub(crate) fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: "p1".to_string(),
            brand: "Sun".to_string(),
            name: "Duo".to_string(),
            wattage_wp: 800.0,
            module_count: 2,
            price_eur: 499.0,
            has_inverter: true,
            inverter_power_w: Some(600.0),
            has_storage: false,
            storage_capacity_kwh: None,
            mounting_types: [MountingType::Railing].into_iter().collect(),
            bifacial: false,
            module_efficiency_pct: 21.0,
            warranty_years: 12,
            origin: ManufacturingOrigin::China,
            manufacturing_co2_kg: None,
            description: String::new(),
        }
    }

    #[test]
    fn ac_power_uses_inverter_rating_below_limit() {
        assert_eq!(product().ac_power_w(800.0), 600.0);
    }

    #[test]
    fn ac_power_is_capped_at_legal_limit() {
        let mut p = product();
        p.inverter_power_w = Some(2000.0);
        assert_eq!(p.ac_power_w(800.0), 800.0);
    }

    #[test]
    fn missing_inverter_rating_assumes_legal_limit() {
        let mut p = product();
        p.inverter_power_w = None;
        assert_eq!(p.ac_power_w(800.0), 800.0);
        p.inverter_power_w = Some(600.0);
        p.has_inverter = false;
        assert_eq!(p.ac_power_w(800.0), 800.0);
    }

    #[test]
    fn storage_requires_flag_and_positive_capacity() {
        let mut p = product();
        p.storage_capacity_kwh = Some(1.6);
        assert_eq!(p.storage_kwh(), 0.0);
        p.has_storage = true;
        assert_eq!(p.storage_kwh(), 1.6);
        p.storage_capacity_kwh = Some(0.0);
        assert!(!p.has_usable_storage());
    }

    #[test]
    fn unknown_mounting_matches_any_product() {
        let p = product();
        assert!(p.supports_mounting(MountingType::Unknown));
        assert!(p.supports_mounting(MountingType::Railing));
        assert!(!p.supports_mounting(MountingType::FlatRoof));
    }

    #[test]
    fn mounting_parse_normalizes_separators() {
        assert_eq!(MountingType::parse("Flat-Roof"), MountingType::FlatRoof);
        assert_eq!(MountingType::parse(" garden "), MountingType::Ground);
        assert_eq!(MountingType::parse("chimney"), MountingType::Unknown);
    }

    #[test]
    fn product_deserializes_with_defaults() {
        let json = r#"{"id":"x","brand":"B","name":"N","wattage_wp":400,"price_eur":299}"#;
        let p: Product = serde_json::from_str(json).expect("minimal product should parse");
        assert!(p.has_inverter);
        assert_eq!(p.module_count, 1);
        assert_eq!(p.origin, ManufacturingOrigin::Unknown);
        assert!(p.mounting_types.is_empty());
    }

    #[test]
    fn unrecognized_catalog_values_fall_back_to_unknown() {
        let json = r#"{"id":"x","brand":"B","name":"N","wattage_wp":400,"price_eur":299,
            "origin":"japan","mounting_types":["Flat-Roof","balcony","balcony_floor"]}"#;
        let p: Product = serde_json::from_str(json).expect("lenient product should parse");
        assert_eq!(p.origin, ManufacturingOrigin::Unknown);
        assert!(p.supports_mounting(MountingType::FlatRoof));
        assert!(p.supports_mounting(MountingType::Railing));
        assert!(p.mounting_types.contains(&MountingType::Unknown));
    }

    #[test]
    fn mounting_serializes_as_snake_case() {
        let json = serde_json::to_string(&MountingType::FlatRoof).expect("serialize");
        assert_eq!(json, r#""flat_roof""#);
        let back: MountingType = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, MountingType::FlatRoof);
    }
}
