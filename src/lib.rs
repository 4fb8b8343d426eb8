//! Balcony solar product advisor: yield, economics and carbon footprint
//! estimates for a household, with a ranked and explained catalog.

#[cfg(feature = "api")]
pub mod api;
/// Yield, self-consumption, economics, ecology and ranking calculators.
pub mod calc;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod io {
    //! File export.
    pub mod export;
}
pub mod irradiance;
pub mod model;
pub mod report;
