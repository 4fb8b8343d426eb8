//! Annual AC yield under inverter clipping, with bifacial gain and
//! battery-assisted recovery of clipped energy.

use serde::{Deserialize, Serialize};

use crate::config::Assumptions;
use crate::config::YieldModelConfig;
use crate::irradiance::IrradianceData;
use crate::model::{Orientation, Product, Shading};

/// Site-level yield inputs resolved once per request.
///
/// `yield_basis_kwh_per_wp` is the unshaded annual yield per installed Wp:
/// either the irradiance provider's figure or the base yield scaled by the
/// orientation factor. Shading is applied on top by the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteFactors {
    pub yield_basis_kwh_per_wp: f64,
    pub orientation_factor: f64,
    pub shading_factor: f64,
    pub irradiance_used: bool,
}

impl SiteFactors {
    /// Resolves site factors from irradiance data when usable, otherwise from
    /// the static orientation and shading tables.
    pub fn resolve(
        assumptions: &Assumptions,
        orientation: Orientation,
        shading: Shading,
        irradiance: Option<&IrradianceData>,
    ) -> Self {
        let orientation_factor = assumptions.orientation.factor(orientation);
        let shading_factor = assumptions.shading.factor(shading);
        match irradiance.filter(|d| d.is_usable()) {
            Some(data) => Self {
                yield_basis_kwh_per_wp: data.yield_kwh_per_wp(),
                orientation_factor,
                shading_factor,
                irradiance_used: true,
            },
            None => Self {
                yield_basis_kwh_per_wp: assumptions.yield_model.base_yield_kwh_per_wp
                    * orientation_factor,
                orientation_factor,
                shading_factor,
                irradiance_used: false,
            },
        }
    }

    /// Shaded annual yield per Wp.
    pub fn effective_kwh_per_wp(&self) -> f64 {
        self.yield_basis_kwh_per_wp * self.shading_factor
    }
}

/// Breakdown of one product's annual yield (kWh).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldEstimate {
    /// DC-side yield including bifacial gain.
    pub raw_dc_kwh: f64,
    /// Maximum the inverter may deliver over the year.
    pub ac_ceiling_kwh: f64,
    /// Energy above the ceiling.
    pub clipped_kwh: f64,
    /// Clipped energy the battery could shift per year.
    pub max_recoverable_kwh: f64,
    /// Clipped energy actually recovered through storage.
    pub recovered_kwh: f64,
    /// Annual usable yield.
    pub usable_kwh: f64,
}

impl YieldEstimate {
    /// Clipped energy that was not recovered.
    pub fn lost_kwh(&self) -> f64 {
        self.clipped_kwh - self.recovered_kwh
    }
}

/// [`estimate_yield`] for a catalog product.
pub fn estimate_product_yield(
    product: &Product,
    site: &SiteFactors,
    cfg: &YieldModelConfig,
) -> YieldEstimate {
    estimate_yield(
        product.wattage_wp,
        product.ac_power_w(cfg.legal_ac_limit_w),
        product.bifacial,
        product.storage_kwh(),
        site,
        cfg,
    )
}

/// Estimates the annual usable yield of a product at a site.
///
/// # Arguments
///
/// * `wattage_wp` - DC nameplate power
/// * `ac_power_w` - Effective AC limit, already capped at the legal ceiling
/// * `bifacial` - Whether the bifacial gain applies
/// * `storage_kwh` - Usable battery capacity, zero without storage
/// * `site` - Resolved site factors
/// * `cfg` - Yield model constants
///
/// # Returns
///
/// A non-negative estimate with `usable_kwh <= ac_ceiling_kwh + max_recoverable_kwh`.
pub fn estimate_yield(
    wattage_wp: f64,
    ac_power_w: f64,
    bifacial: bool,
    storage_kwh: f64,
    site: &SiteFactors,
    cfg: &YieldModelConfig,
) -> YieldEstimate {
    let per_wp = site.effective_kwh_per_wp().max(0.0);
    let gain = if bifacial { 1.0 + cfg.bifacial_gain } else { 1.0 };
    let raw = wattage_wp.max(0.0) * per_wp * gain;

    let ac_power = ac_power_w.max(0.0).min(cfg.legal_ac_limit_w);
    let ceiling = ac_power * per_wp;
    let clipped = (raw - ceiling).max(0.0);
    let delivered = raw.min(ceiling);

    if storage_kwh > 0.0 {
        let max_recoverable = storage_kwh * 365.0 * cfg.battery_round_trip_efficiency;
        let recovered = clipped.min(max_recoverable);
        YieldEstimate {
            raw_dc_kwh: raw,
            ac_ceiling_kwh: ceiling,
            clipped_kwh: clipped,
            max_recoverable_kwh: max_recoverable,
            recovered_kwh: recovered,
            usable_kwh: delivered + recovered,
        }
    } else {
        YieldEstimate {
            raw_dc_kwh: raw,
            ac_ceiling_kwh: ceiling,
            clipped_kwh: clipped,
            max_recoverable_kwh: 0.0,
            recovered_kwh: 0.0,
            usable_kwh: delivered,
        }
    }
}
