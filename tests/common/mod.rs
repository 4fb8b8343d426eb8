//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;

use balcony_advisor::irradiance::IrradianceData;
use balcony_advisor::model::{ManufacturingOrigin, MountingType, Product, QuizAnswers};

/// Railing-mountable product without storage, manufactured in Europe.
pub fn product(id: &str, wattage_wp: f64, inverter_w: f64, price_eur: f64) -> Product {
    Product {
        id: id.to_string(),
        brand: "Test".to_string(),
        name: id.to_string(),
        wattage_wp,
        module_count: 2,
        price_eur,
        has_inverter: true,
        inverter_power_w: Some(inverter_w),
        has_storage: false,
        storage_capacity_kwh: None,
        mounting_types: BTreeSet::from([MountingType::Railing, MountingType::Wall]),
        bifacial: false,
        module_efficiency_pct: 21.0,
        warranty_years: 15,
        origin: ManufacturingOrigin::Europe,
        manufacturing_co2_kg: None,
        description: String::new(),
    }
}

/// Same as [`product`] with a battery of `capacity_kwh`.
pub fn storage_product(
    id: &str,
    wattage_wp: f64,
    inverter_w: f64,
    capacity_kwh: f64,
    price_eur: f64,
) -> Product {
    Product {
        has_storage: true,
        storage_capacity_kwh: Some(capacity_kwh),
        ..product(id, wattage_wp, inverter_w, price_eur)
    }
}

/// Two-person household, south-facing railing, no shading, no budget limit.
pub fn answers() -> QuizAnswers {
    QuizAnswers {
        household_size: Some("2".to_string()),
        mounting_location: Some("railing".to_string()),
        orientation: Some("south".to_string()),
        shading: Some("none".to_string()),
        budget: Some("no_limit".to_string()),
        eco_importance: Some("medium".to_string()),
        ..QuizAnswers::default()
    }
}

/// Site data with the given annual yield per kWp.
pub fn irradiance(kwh_per_kwp: f64) -> IrradianceData {
    IrradianceData {
        annual_yield_kwh_per_kwp: kwh_per_kwp,
        monthly_yield_kwh_per_kwp: Vec::new(),
        system_loss_pct: 14.0,
        tilt_deg: 90.0,
        azimuth_deg: 0.0,
        coordinates: None,
    }
}
