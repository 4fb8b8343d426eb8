//! Annual household consumption: declared by the user or estimated.

use serde::{Deserialize, Serialize};

use crate::config::ConsumptionConfig;
use crate::model::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionEstimate {
    pub annual_kwh: f64,
    /// True when the user's own figure was used.
    pub declared: bool,
}

/// Returns the declared consumption when present, otherwise an estimate from
/// household size, apartment size and appliances.
pub fn estimate_consumption(profile: &Profile, cfg: &ConsumptionConfig) -> ConsumptionEstimate {
    if let Some(kwh) = profile.declared_consumption_kwh.filter(|v| v.is_finite() && *v > 0.0) {
        return ConsumptionEstimate {
            annual_kwh: kwh,
            declared: true,
        };
    }

    let appliances: f64 = profile
        .appliances
        .iter()
        .map(|a| cfg.appliance_kwh(*a))
        .sum();
    let estimate = cfg.household_kwh(profile.household_size)
        + cfg.apartment_adjustment_kwh(profile.apartment_size)
        + appliances;

    ConsumptionEstimate {
        annual_kwh: estimate.max(cfg.minimum_kwh),
        declared: false,
    }
}
