//! Pure calculators. Each function maps (product, profile, site, assumptions)
//! to derived values without I/O or shared state.

pub mod consumption;
pub mod ecology;
pub mod economics;
pub mod explain;
pub mod ranking;
pub mod self_consumption;
pub mod yield_estimate;

pub use consumption::{ConsumptionEstimate, estimate_consumption};
pub use ecology::{Ecological, ManufacturingFootprint, calculate_ecology};
pub use economics::{Economics, calculate_economics};
pub use ranking::{ProductRanking, composite_score, filter_catalog, rank_products};
pub use self_consumption::self_consumption_rate;
pub use yield_estimate::{SiteFactors, YieldEstimate, estimate_product_yield, estimate_yield};

/// Rounds to cents.
pub(crate) fn round_currency(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Rounds to the nearest whole unit.
pub(crate) fn round_int(v: f64) -> f64 {
    v.round()
}

/// Rounds a period to one decimal, leaving `+∞` untouched.
pub(crate) fn round_years(v: f64) -> f64 {
    if v.is_finite() {
        (v * 10.0).round() / 10.0
    } else {
        v
    }
}
