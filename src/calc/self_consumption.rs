//! Share of the yield used directly in the household.

use crate::config::SelfConsumptionConfig;
use crate::model::{HouseholdSize, Orientation};

/// Self-consumption rate in `[0, max_rate]`.
///
/// Base rate by household size, plus a storage bonus, plus an orientation
/// bonus for east/west (morning and evening production) or a smaller one for
/// the diagonals.
pub fn self_consumption_rate(
    household: HouseholdSize,
    has_storage: bool,
    orientation: Orientation,
    cfg: &SelfConsumptionConfig,
) -> f64 {
    let storage = if has_storage { cfg.storage_bonus } else { 0.0 };
    let orientation_bonus = match orientation {
        Orientation::East | Orientation::West => cfg.east_west_bonus,
        Orientation::NorthEast
        | Orientation::SouthEast
        | Orientation::SouthWest
        | Orientation::NorthWest => cfg.diagonal_bonus,
        Orientation::North | Orientation::South | Orientation::Unknown => 0.0,
    };
    (cfg.base_rate(household) + storage + orientation_bonus).clamp(0.0, cfg.max_rate)
}
