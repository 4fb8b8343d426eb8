//! Catalog filtering, composite scoring and ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::ecology::Ecological;
use super::economics::Economics;
use super::yield_estimate::YieldEstimate;
use crate::config::ScoringConfig;
use crate::model::{Product, Profile};

/// One evaluated catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRanking {
    pub product: Product,
    pub yield_estimate: YieldEstimate,
    pub economics: Economics,
    pub ecological: Ecological,
    /// Economic score from amortization (0–100).
    pub economic_score: f64,
    /// Composite score (0–100, one decimal).
    pub score: f64,
    /// 1-based position after sorting.
    pub rank: usize,
    pub reasons: Vec<String>,
    pub warnings: Vec<String>,
}

/// Whether the product's price is within the profile's budget ceiling.
pub fn within_budget(product: &Product, profile: &Profile) -> bool {
    profile
        .budget
        .ceiling_eur()
        .is_none_or(|ceiling| product.price_eur <= ceiling)
}

/// Keeps products that fit the budget and the chosen mounting location.
pub fn filter_catalog<'a>(catalog: &'a [Product], profile: &Profile) -> Vec<&'a Product> {
    catalog
        .iter()
        .filter(|p| within_budget(p, profile) && p.supports_mounting(profile.mounting))
        .collect()
}

/// Economic score: full marks up to the first breakpoint, linear to zero.
/// `+∞` amortization scores zero.
pub fn amortization_score(amortization_years: f64, s: &ScoringConfig) -> f64 {
    if !amortization_years.is_finite() || amortization_years >= s.amortization_zero_years {
        return 0.0;
    }
    if amortization_years <= s.amortization_full_marks_years {
        return 100.0;
    }
    let span = s.amortization_zero_years - s.amortization_full_marks_years;
    100.0 * (1.0 - (amortization_years - s.amortization_full_marks_years) / span)
}

/// `(1 - w) * economic + w * ecological`, rounded to one decimal.
pub fn composite_score(economic: f64, ecological: f64, eco_weight: f64) -> f64 {
    let w = eco_weight.clamp(0.0, 1.0);
    let composite = (1.0 - w) * economic + w * ecological;
    (composite * 10.0).round() / 10.0
}

/// Sorts by composite score descending, then amortization ascending, then
/// product id, and assigns ranks from 1.
pub fn rank_products(mut rankings: Vec<ProductRanking>) -> Vec<ProductRanking> {
    rankings.sort_by(compare);
    for (i, r) in rankings.iter_mut().enumerate() {
        r.rank = i + 1;
    }
    rankings
}

fn compare(a: &ProductRanking, b: &ProductRanking) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| {
            a.economics
                .amortization_years
                .total_cmp(&b.economics.amortization_years)
        })
        .then_with(|| a.product.id.cmp(&b.product.id))
}
