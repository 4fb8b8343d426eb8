//! Manufacturing footprint, CO₂ payback, lifecycle balance and the
//! ecological score.

use serde::{Deserialize, Serialize};

use super::economics::Economics;
use super::{round_int, round_years};
use crate::config::{EcologyConfig, ScoringConfig};
use crate::model::Product;

/// Share of the manufacturing footprint attributed to raw material extraction.
pub const EXTRACTION_SHARE: f64 = 0.60;
/// Share attributed to module production.
pub const PRODUCTION_SHARE: f64 = 0.35;
/// Share attributed to base module transport.
pub const TRANSPORT_SHARE: f64 = 0.05;

/// Manufacturing emissions breakdown (kg CO₂).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManufacturingFootprint {
    pub extraction_kg: f64,
    pub production_kg: f64,
    pub transport_kg: f64,
    pub total_kg: f64,
    /// True when the catalog supplied the total.
    pub from_override: bool,
}

/// Ecological metrics for one product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ecological {
    pub manufacturing: ManufacturingFootprint,
    /// Years until avoided emissions cover manufacturing; `+∞` without savings.
    pub co2_payback_years: f64,
    /// Period the lifecycle balance is computed over.
    pub lifecycle_years: u32,
    /// Manufacturing minus avoided emissions over `lifecycle_years` (kg CO₂).
    /// Negative means the system is a net saving; positive means it has not
    /// yet offset its manufacturing debt.
    pub lifecycle_net_kg: f64,
    /// 0–100, higher is better.
    pub score: f64,
}

/// Computes the manufacturing footprint of a product.
///
/// An inverter without a rating is costed at `legal_ac_limit_w`.
pub fn manufacturing_footprint(
    product: &Product,
    legal_ac_limit_w: f64,
    cfg: &EcologyConfig,
) -> ManufacturingFootprint {
    if let Some(total) = product
        .manufacturing_co2_kg
        .filter(|v| v.is_finite() && *v >= 0.0)
    {
        return ManufacturingFootprint {
            extraction_kg: round_int(total * EXTRACTION_SHARE),
            production_kg: round_int(total * PRODUCTION_SHARE),
            transport_kg: round_int(total * TRANSPORT_SHARE),
            total_kg: round_int(total),
            from_override: true,
        };
    }

    let wattage = product.wattage_wp.max(0.0);
    let base = wattage * cfg.module_co2_kg_per_wp;

    let (inverter_co2, inverter_weight) = if product.has_inverter {
        (
            product.inverter_rating_w(legal_ac_limit_w) * cfg.inverter_co2_kg_per_w,
            cfg.inverter_weight_kg,
        )
    } else {
        (0.0, 0.0)
    };
    let storage_kwh = product.storage_kwh();
    let battery_co2 = storage_kwh * cfg.battery_co2_kg_per_kwh;
    let battery_weight = storage_kwh * cfg.battery_weight_kg_per_kwh;

    let weight_kg = wattage * cfg.module_weight_kg_per_wp + inverter_weight + battery_weight;
    let distance_km = cfg.origin_distance_km.km(product.origin);
    let freight = weight_kg * distance_km / 1000.0 * cfg.transport_co2_kg_per_tkm;

    let extraction = base * EXTRACTION_SHARE;
    let production = base * PRODUCTION_SHARE + inverter_co2 + battery_co2;
    let transport = base * TRANSPORT_SHARE + freight;

    ManufacturingFootprint {
        extraction_kg: round_int(extraction),
        production_kg: round_int(production),
        transport_kg: round_int(transport),
        total_kg: round_int(extraction + production + transport),
        from_override: false,
    }
}

/// Computes ecological metrics from a product and its economics.
pub fn calculate_ecology(
    product: &Product,
    economics: &Economics,
    legal_ac_limit_w: f64,
    cfg: &EcologyConfig,
    scoring: &ScoringConfig,
) -> Ecological {
    let manufacturing = manufacturing_footprint(product, legal_ac_limit_w, cfg);
    let annual = economics.co2_savings_kg_per_year;

    let payback = round_years(if annual > 0.0 {
        manufacturing.total_kg / annual
    } else {
        f64::INFINITY
    });

    let lifecycle_years = lifecycle_years(product, cfg);
    let lifecycle_net = manufacturing.total_kg - annual.max(0.0) * f64::from(lifecycle_years);

    Ecological {
        manufacturing,
        co2_payback_years: payback,
        lifecycle_years,
        lifecycle_net_kg: round_int(lifecycle_net),
        score: ecological_score(payback, manufacturing.total_kg, scoring),
    }
}

/// Warranty period of the product, or the configured default when the
/// catalog has none.
pub fn lifecycle_years(product: &Product, cfg: &EcologyConfig) -> u32 {
    if product.warranty_years > 0 {
        product.warranty_years
    } else {
        cfg.default_lifetime_years
    }
}

/// Payback curve: full marks up to the first breakpoint, linear to the knee,
/// then linear to zero.
pub fn payback_score(payback_years: f64, s: &ScoringConfig) -> f64 {
    if payback_years.is_nan() || payback_years >= s.payback_zero_years {
        return 0.0;
    }
    if payback_years <= s.payback_full_marks_years {
        return 100.0;
    }
    if payback_years <= s.payback_knee_years {
        let t = (payback_years - s.payback_full_marks_years)
            / (s.payback_knee_years - s.payback_full_marks_years);
        return 100.0 - t * (100.0 - s.payback_knee_score);
    }
    let t = (payback_years - s.payback_knee_years) / (s.payback_zero_years - s.payback_knee_years);
    s.payback_knee_score * (1.0 - t)
}

/// Footprint curve: full marks up to the lower bound, linear to zero.
pub fn footprint_score(footprint_kg: f64, s: &ScoringConfig) -> f64 {
    let span = s.footprint_zero_kg - s.footprint_full_marks_kg;
    (100.0 * (1.0 - (footprint_kg - s.footprint_full_marks_kg) / span)).clamp(0.0, 100.0)
}

/// Weighted blend of the payback and footprint curves, in `[0, 100]`.
pub fn ecological_score(payback_years: f64, footprint_kg: f64, s: &ScoringConfig) -> f64 {
    let blended = s.payback_weight * payback_score(payback_years, s)
        + s.footprint_weight * footprint_score(footprint_kg, s);
    round_int(blended.clamp(0.0, 100.0))
}
