//! Recommendation engine: filters the catalog, evaluates every remaining
//! product and produces the ranked, explained response.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calc::explain::{Evaluation, explain};
use crate::calc::ranking::{
    ProductRanking, amortization_score, composite_score, filter_catalog, rank_products,
};
use crate::calc::{
    SiteFactors, calculate_ecology, calculate_economics, estimate_consumption,
    estimate_product_yield, self_consumption_rate,
};
use crate::config::Assumptions;
use crate::irradiance::{IrradianceData, IrradianceProvider, resolve_irradiance};
use crate::model::{Budget, Product, Profile, QuizAnswers, Shading};

/// Assumptions actually applied to a request.
///
/// Together with the profile this is enough to recompute every number in
/// the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssumptionsUsed {
    pub assumptions: Assumptions,
    /// Resolved site factors; absent when the profile could not be built.
    pub site: Option<SiteFactors>,
    /// Annual household consumption (kWh), declared or estimated.
    pub annual_consumption_kwh: Option<f64>,
    pub used_irradiance: bool,
    pub used_declared_consumption: bool,
}

/// Outcome of one recommendation request.
///
/// Non-finite periods serialize as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResponse {
    pub recommended: bool,
    pub reason: String,
    pub rankings: Vec<ProductRanking>,
    pub assumptions: AssumptionsUsed,
    pub profile_summary: String,
    pub filtered_out_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecommendationResponse {
    /// Top ranked product, if any product survived filtering.
    pub fn top(&self) -> Option<&ProductRanking> {
        self.rankings.first()
    }
}

/// Stateless engine over an immutable assumption set.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    assumptions: Assumptions,
}

impl RecommendationEngine {
    pub fn new(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Normalizes quiz answers and recommends.
    ///
    /// An incomplete answer set produces a negative response carrying the
    /// error message instead of failing.
    pub fn recommend_answers(
        &self,
        answers: &QuizAnswers,
        catalog: &[Product],
        irradiance: Option<&IrradianceData>,
    ) -> RecommendationResponse {
        match Profile::from_answers(answers) {
            Ok(profile) => self.recommend(&profile, catalog, irradiance),
            Err(e) => self.invalid_profile(e.to_string()),
        }
    }

    /// Like [`recommend_answers`](Self::recommend_answers), but asks
    /// `provider` for irradiance data for the profile's site first.
    pub fn recommend_with_provider(
        &self,
        answers: &QuizAnswers,
        catalog: &[Product],
        provider: &dyn IrradianceProvider,
    ) -> RecommendationResponse {
        match Profile::from_answers(answers) {
            Ok(profile) => {
                let irradiance = resolve_irradiance(provider, &profile);
                self.recommend(&profile, catalog, irradiance.as_ref())
            }
            Err(e) => self.invalid_profile(e.to_string()),
        }
    }

    /// Ranks `catalog` for `profile`.
    ///
    /// # Arguments
    ///
    /// * `profile` - Normalized household profile
    /// * `catalog` - Full product catalog
    /// * `irradiance` - Site data resolved once by the caller; `None` selects
    ///   the static orientation tables
    ///
    /// # Returns
    ///
    /// A response with every product that passed the budget and mounting
    /// filters ranked from 1. Rankings are included even when the overall
    /// recommendation is negative.
    pub fn recommend(
        &self,
        profile: &Profile,
        catalog: &[Product],
        irradiance: Option<&IrradianceData>,
    ) -> RecommendationResponse {
        let a = &self.assumptions;
        let site = SiteFactors::resolve(a, profile.orientation, profile.shading, irradiance);
        let consumption = estimate_consumption(profile, &a.consumption);

        let candidates = filter_catalog(catalog, profile);
        let filtered_out_count = catalog.len() - candidates.len();

        let rankings = rank_products(
            candidates
                .into_iter()
                .map(|p| self.evaluate_product(p, profile, &site, consumption.annual_kwh))
                .collect(),
        );

        let (recommended, reason) = decide(profile, &rankings);
        info!(
            recommended,
            candidates = rankings.len(),
            filtered_out = filtered_out_count,
            irradiance = site.irradiance_used,
            "{reason}"
        );

        RecommendationResponse {
            recommended,
            reason,
            rankings,
            assumptions: AssumptionsUsed {
                assumptions: a.clone(),
                site: Some(site),
                annual_consumption_kwh: Some(consumption.annual_kwh),
                used_irradiance: site.irradiance_used,
                used_declared_consumption: consumption.declared,
            },
            profile_summary: profile.summary(),
            filtered_out_count,
            error: None,
        }
    }

    /// Evaluates one product. The returned ranking has `rank == 0` until it
    /// is sorted with the rest of the catalog.
    pub fn evaluate_product(
        &self,
        product: &Product,
        profile: &Profile,
        site: &SiteFactors,
        annual_consumption_kwh: f64,
    ) -> ProductRanking {
        let a = &self.assumptions;
        let yield_estimate = estimate_product_yield(product, site, &a.yield_model);
        let rate = self_consumption_rate(
            profile.household_size,
            product.has_usable_storage(),
            profile.orientation,
            &a.self_consumption,
        );
        let economics = calculate_economics(
            product.price_eur,
            yield_estimate.usable_kwh,
            rate,
            annual_consumption_kwh,
            &a.tariffs,
        );
        let ecological = calculate_ecology(
            product,
            &economics,
            a.yield_model.legal_ac_limit_w,
            &a.ecology,
            &a.scoring,
        );

        let economic_score = amortization_score(economics.amortization_years, &a.scoring);
        let score = composite_score(
            economic_score,
            ecological.score,
            a.scoring.eco_weight(profile.eco_importance),
        );

        let explanation = explain(
            &Evaluation {
                product,
                yield_estimate: &yield_estimate,
                economics: &economics,
                ecological: &ecological,
            },
            profile,
            &a.explain,
        );

        debug!(
            product = %product.id,
            usable_kwh = yield_estimate.usable_kwh,
            amortization_years = economics.amortization_years,
            eco_score = ecological.score,
            score,
            "product evaluated"
        );

        ProductRanking {
            product: product.clone(),
            yield_estimate,
            economics,
            ecological,
            economic_score,
            score,
            rank: 0,
            reasons: explanation.reasons,
            warnings: explanation.warnings,
        }
    }

    fn invalid_profile(&self, message: String) -> RecommendationResponse {
        info!(error = %message, "profile rejected");
        RecommendationResponse {
            recommended: false,
            reason: "We need a few more answers before we can recommend a product.".to_string(),
            rankings: Vec::new(),
            assumptions: AssumptionsUsed {
                assumptions: self.assumptions.clone(),
                site: None,
                annual_consumption_kwh: None,
                used_irradiance: false,
                used_declared_consumption: false,
            },
            profile_summary: String::new(),
            filtered_out_count: 0,
            error: Some(message),
        }
    }
}

/// Decision gate, checked in order: heavy shading, unknown budget, empty
/// candidate set.
fn decide(profile: &Profile, rankings: &[ProductRanking]) -> (bool, String) {
    if profile.shading == Shading::Heavy {
        return (
            false,
            "Heavy shading leaves too little sunlight for a balcony power plant to pay off."
                .to_string(),
        );
    }
    if profile.budget == Budget::Unknown {
        return (
            false,
            "Without a budget we cannot pick a product. Tell us how much you want to spend."
                .to_string(),
        );
    }
    match rankings.first() {
        None => (
            false,
            "No product in the catalog fits your budget and mounting location.".to_string(),
        ),
        Some(top) => (
            true,
            format!(
                "{} is the best match for your household.",
                top.product.display_name()
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::model::{ManufacturingOrigin, MountingType};

    fn product(id: &str, price: f64) -> Product {
        Product {
            id: id.to_string(),
            brand: "Brand".to_string(),
            name: id.to_uppercase(),
            wattage_wp: 800.0,
            module_count: 2,
            price_eur: price,
            has_inverter: true,
            inverter_power_w: Some(800.0),
            has_storage: false,
            storage_capacity_kwh: None,
            mounting_types: BTreeSet::from([MountingType::Railing]),
            bifacial: false,
            module_efficiency_pct: 21.0,
            warranty_years: 12,
            origin: ManufacturingOrigin::China,
            manufacturing_co2_kg: None,
            description: String::new(),
        }
    }

    fn answers() -> QuizAnswers {
        QuizAnswers {
            household_size: Some("2".to_string()),
            mounting_location: Some("railing".to_string()),
            orientation: Some("south".to_string()),
            shading: Some("none".to_string()),
            budget: Some("up_to_800".to_string()),
            ..QuizAnswers::default()
        }
    }

    #[test]
    fn cheaper_identical_product_ranks_first() {
        let engine = RecommendationEngine::default();
        let catalog = vec![product("dear", 700.0), product("cheap", 400.0)];
        let resp = engine.recommend_answers(&answers(), &catalog, None);
        assert!(resp.recommended);
        assert_eq!(resp.rankings[0].product.id, "cheap");
        assert_eq!(resp.rankings[0].rank, 1);
        assert_eq!(resp.rankings[1].rank, 2);
        assert!(resp.reason.contains("Brand CHEAP"));
        assert!(resp.error.is_none());
    }

    #[test]
    fn missing_answer_yields_error_response() {
        let engine = RecommendationEngine::default();
        let mut a = answers();
        a.budget = None;
        let resp = engine.recommend_answers(&a, &[product("p", 400.0)], None);
        assert!(!resp.recommended);
        assert!(resp.rankings.is_empty());
        assert_eq!(
            resp.error.as_deref(),
            Some("missing answer for question `budget`")
        );
    }

    #[test]
    fn unknown_budget_is_negative_but_still_ranked() {
        let engine = RecommendationEngine::default();
        let mut a = answers();
        a.budget = Some("not sure".to_string());
        let resp = engine.recommend_answers(&a, &[product("p", 4000.0)], None);
        assert!(!resp.recommended);
        assert!(resp.reason.contains("budget"));
        assert_eq!(resp.rankings.len(), 1);
        assert_eq!(resp.filtered_out_count, 0);
    }

    #[test]
    fn heavy_shading_checked_before_budget() {
        let engine = RecommendationEngine::default();
        let mut a = answers();
        a.shading = Some("heavy".to_string());
        a.budget = Some("not sure".to_string());
        let resp = engine.recommend_answers(&a, &[product("p", 400.0)], None);
        assert!(!resp.recommended);
        assert!(resp.reason.starts_with("Heavy shading"));
    }

    #[test]
    fn assumptions_report_static_tables_and_estimate() {
        let engine = RecommendationEngine::default();
        let resp = engine.recommend_answers(&answers(), &[product("p", 400.0)], None);
        let used = &resp.assumptions;
        assert!(!used.used_irradiance);
        assert!(!used.used_declared_consumption);
        assert_eq!(used.annual_consumption_kwh, Some(2500.0));
        assert_eq!(used.site.map(|s| s.orientation_factor), Some(1.0));
    }

    #[test]
    fn usable_irradiance_is_reported() {
        let engine = RecommendationEngine::default();
        let data = IrradianceData {
            annual_yield_kwh_per_kwp: 1000.0,
            monthly_yield_kwh_per_kwp: Vec::new(),
            system_loss_pct: 14.0,
            tilt_deg: 90.0,
            azimuth_deg: 0.0,
            coordinates: None,
        };
        let resp = engine.recommend_answers(&answers(), &[product("p", 400.0)], Some(&data));
        assert!(resp.assumptions.used_irradiance);
        assert_eq!(resp.rankings[0].yield_estimate.usable_kwh, 800.0);
    }
}
