//! Savings, feed-in revenue, amortization and multi-year totals.

use serde::{Deserialize, Serialize};

use super::{round_currency, round_int, round_years};
use crate::config::TariffConfig;

/// Per-product economics. Currency rounded to cents, energy and CO₂ to whole
/// units, periods to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Economics {
    /// Usable annual yield (kWh).
    pub annual_yield_kwh: f64,
    /// Energy used on-site (kWh/year).
    pub self_consumption_kwh: f64,
    /// Energy exported (kWh/year).
    pub feed_in_kwh: f64,
    /// Avoided purchases plus feed-in revenue (€/year).
    pub annual_savings_eur: f64,
    /// Years until savings cover the price; `+∞` without positive savings.
    pub amortization_years: f64,
    /// Net position after 10 years (€).
    pub total_savings_10y_eur: f64,
    /// Net position after 20 years (€).
    pub total_savings_20y_eur: f64,
    /// Avoided grid emissions (kg CO₂/year).
    pub co2_savings_kg_per_year: f64,
}

/// Computes economics for a usable annual yield.
///
/// # Arguments
///
/// * `price_eur` - Purchase price
/// * `yield_kwh` - Usable annual yield
/// * `self_consumption_rate` - Share of yield used on-site (0.0–1.0)
/// * `annual_consumption_kwh` - Household consumption, declared or estimated
/// * `tariffs` - Electricity price, feed-in tariff, grid intensity
///
/// Self-consumption is capped by both `annual_consumption_kwh * rate` and the
/// yield itself. Never panics; all divisions are guarded.
pub fn calculate_economics(
    price_eur: f64,
    yield_kwh: f64,
    self_consumption_rate: f64,
    annual_consumption_kwh: f64,
    tariffs: &TariffConfig,
) -> Economics {
    let yield_kwh = yield_kwh.max(0.0);
    let rate = self_consumption_rate.clamp(0.0, 1.0);

    let theoretical = yield_kwh * rate;
    let self_consumption = theoretical
        .min(annual_consumption_kwh.max(0.0) * rate)
        .min(yield_kwh);
    let feed_in = (yield_kwh - self_consumption).max(0.0);

    // Amortization is decided on the reported cent value.
    let savings = round_currency(
        self_consumption * tariffs.electricity_price_eur_per_kwh
            + feed_in * tariffs.feed_in_tariff_eur_per_kwh,
    );
    let amortization = if savings > 0.0 {
        price_eur / savings
    } else {
        f64::INFINITY
    };

    Economics {
        annual_yield_kwh: round_int(yield_kwh),
        self_consumption_kwh: round_int(self_consumption),
        feed_in_kwh: round_int(feed_in),
        annual_savings_eur: savings,
        amortization_years: round_years(amortization),
        total_savings_10y_eur: round_currency(savings * 10.0 - price_eur),
        total_savings_20y_eur: round_currency(savings * 20.0 - price_eur),
        co2_savings_kg_per_year: round_int(yield_kwh * tariffs.grid_co2_g_per_kwh / 1000.0),
    }
}
