//! End-to-end tests of the recommendation engine.

mod common;

use balcony_advisor::calc::SiteFactors;
use balcony_advisor::catalog::{CatalogSource, JsonFileCatalog, builtin_catalog, load_catalog};
use balcony_advisor::config::Assumptions;
use balcony_advisor::engine::{AssumptionsUsed, RecommendationEngine};
use balcony_advisor::model::{Profile, QuizAnswers};

#[test]
fn clipping_scenario_caps_yield_at_inverter_ceiling() {
    let engine = RecommendationEngine::default();
    let catalog = vec![common::product("oversized", 1200.0, 800.0, 700.0)];
    let site = common::irradiance(1200.0);

    let resp = engine.recommend_answers(&common::answers(), &catalog, Some(&site));
    let r = &resp.rankings[0];

    assert!((r.yield_estimate.raw_dc_kwh - 1440.0).abs() < 1e-9);
    assert!((r.yield_estimate.ac_ceiling_kwh - 960.0).abs() < 1e-9);
    assert!((r.yield_estimate.usable_kwh - 960.0).abs() < 1e-9);
    assert_eq!(r.economics.annual_yield_kwh, 960.0);
    assert_eq!(r.economics.co2_savings_kg_per_year, 365.0);
    assert!(resp.assumptions.used_irradiance);
}

#[test]
fn heavy_shading_is_never_recommended() {
    let engine = RecommendationEngine::default();
    let catalog = builtin_catalog();
    for budget in ["up_to_500", "up_to_2000", "no_limit"] {
        let answers = QuizAnswers {
            shading: Some("heavy".to_string()),
            budget: Some(budget.to_string()),
            ..common::answers()
        };
        let resp = engine.recommend_answers(&answers, &catalog, None);
        assert!(!resp.recommended, "budget {budget}");
        assert!(resp.error.is_none());
    }
}

#[test]
fn budget_below_every_price_empties_the_candidate_set() {
    let engine = RecommendationEngine::default();
    let catalog = vec![
        common::product("a", 800.0, 800.0, 520.0),
        common::product("b", 600.0, 600.0, 501.0),
        common::product("c", 900.0, 800.0, 999.0),
    ];
    let answers = QuizAnswers {
        budget: Some("up_to_500".to_string()),
        ..common::answers()
    };

    let resp = engine.recommend_answers(&answers, &catalog, None);

    assert!(!resp.recommended);
    assert!(resp.rankings.is_empty());
    assert_eq!(resp.filtered_out_count, catalog.len());
}

#[test]
fn storage_recovers_clipped_energy() {
    let engine = RecommendationEngine::default();
    let catalog = vec![common::storage_product("stored", 2000.0, 800.0, 1.0, 1500.0)];
    let site = common::irradiance(1200.0);

    let resp = engine.recommend_answers(&common::answers(), &catalog, Some(&site));
    let y = &resp.rankings[0].yield_estimate;

    // clipped = 2400 - 960 = 1440, recoverable = 1 * 365 * 0.9
    assert!((y.clipped_kwh - 1440.0).abs() < 1e-9);
    assert!((y.usable_kwh - (960.0 + 328.5)).abs() < 1e-9);
    assert_eq!(y.usable_kwh, y.ac_ceiling_kwh + y.clipped_kwh.min(y.max_recoverable_kwh));
}

#[test]
fn identical_inputs_produce_identical_responses() {
    let engine = RecommendationEngine::default();
    let catalog = builtin_catalog();
    let site = common::irradiance(1010.0);

    let first = engine.recommend_answers(&common::answers(), &catalog, Some(&site));
    let second = engine.recommend_answers(&common::answers(), &catalog, Some(&site));

    assert_eq!(first, second);
    let json_first = serde_json::to_string(&first).expect("serialize");
    let json_second = serde_json::to_string(&second).expect("serialize");
    assert_eq!(json_first, json_second);
}

#[test]
fn emitted_assumptions_reproduce_every_ranking() {
    let answers = QuizAnswers {
        household_size: Some("5+".to_string()),
        orientation: Some("south_east".to_string()),
        shading: Some("moderate".to_string()),
        appliances: vec!["dryer".to_string(), "electric_water_heater".to_string()],
        eco_importance: Some("very_high".to_string()),
        ..common::answers()
    };
    let resp = RecommendationEngine::new(Assumptions::green_grid()).recommend_answers(
        &answers,
        &builtin_catalog(),
        None,
    );
    assert!(!resp.rankings.is_empty());

    let json = serde_json::to_string(&resp.assumptions).expect("serialize assumptions");
    let used: AssumptionsUsed = serde_json::from_str(&json).expect("deserialize assumptions");
    let profile = Profile::from_answers(&answers).expect("profile");
    let site = used.site.expect("site factors present");
    let consumption = used.annual_consumption_kwh.expect("consumption present");

    let resolved = SiteFactors::resolve(&used.assumptions, profile.orientation, profile.shading, None);
    assert!((resolved.effective_kwh_per_wp() - site.effective_kwh_per_wp()).abs() < 1e-12);

    let replay = RecommendationEngine::new(used.assumptions);
    for r in &resp.rankings {
        let again = replay.evaluate_product(&r.product, &profile, &site, consumption);
        assert_eq!(again.economics, r.economics, "economics of {}", r.product.id);
        assert_eq!(again.ecological, r.ecological, "ecology of {}", r.product.id);
        assert_eq!(again.score, r.score, "score of {}", r.product.id);
    }
}

#[test]
fn invariants_hold_across_profiles_and_catalog() {
    let engine = RecommendationEngine::default();
    let catalog = builtin_catalog();

    for household in ["1", "2", "3-4", "5+", "?"] {
        for orientation in ["north", "east", "south_west", "south", "somewhere"] {
            for shading in ["none", "moderate", "heavy"] {
                let answers = QuizAnswers {
                    household_size: Some(household.to_string()),
                    mounting_location: Some("unknown".to_string()),
                    orientation: Some(orientation.to_string()),
                    shading: Some(shading.to_string()),
                    ..common::answers()
                };
                let resp = engine.recommend_answers(&answers, &catalog, None);
                let consumption = resp
                    .assumptions
                    .annual_consumption_kwh
                    .expect("consumption present");
                assert_eq!(resp.rankings.len(), catalog.len());

                for (i, r) in resp.rankings.iter().enumerate() {
                    let y = &r.yield_estimate;
                    let e = &r.economics;
                    assert_eq!(r.rank, i + 1);
                    assert!(y.usable_kwh <= y.ac_ceiling_kwh + y.max_recoverable_kwh + 1e-9);
                    if !r.product.has_usable_storage() {
                        assert!(y.usable_kwh <= y.ac_ceiling_kwh + 1e-9);
                    }
                    assert!(e.self_consumption_kwh >= 0.0);
                    assert!(e.self_consumption_kwh <= e.annual_yield_kwh.min(consumption) + 0.5);
                    assert!(e.feed_in_kwh >= 0.0);
                    assert!(e.annual_savings_eur >= 0.0);
                    assert!(e.co2_savings_kg_per_year >= 0.0);
                    assert_eq!(e.amortization_years.is_infinite(), e.annual_savings_eur <= 0.0);
                    assert_eq!(
                        r.ecological.co2_payback_years.is_infinite(),
                        e.co2_savings_kg_per_year <= 0.0
                    );
                    assert!((0.0..=100.0).contains(&r.ecological.score));
                    assert!((0.0..=100.0).contains(&r.score));
                }
                for pair in resp.rankings.windows(2) {
                    assert!(pair[0].score >= pair[1].score);
                }
            }
        }
    }
}

#[test]
fn eco_importance_reorders_the_catalog() {
    let engine = RecommendationEngine::default();
    let catalog = builtin_catalog();
    let answers_with = |importance: &str| QuizAnswers {
        eco_importance: Some(importance.to_string()),
        ..common::answers()
    };

    let low = engine.recommend_answers(&answers_with("low"), &catalog, None);
    let very_high = engine.recommend_answers(&answers_with("very_high"), &catalog, None);

    let position = |resp: &balcony_advisor::engine::RecommendationResponse, id: &str| {
        resp.rankings
            .iter()
            .position(|r| r.product.id == id)
            .expect("product ranked")
    };
    // The German-made kit is the most expensive railing product but pays
    // back its manufacturing CO₂ fastest.
    assert!(position(&very_high, "heimat-800") < position(&low, "heimat-800"));
}

#[test]
fn sample_catalog_file_loads() {
    let loaded = load_catalog(&JsonFileCatalog::new("data/catalog.json"));
    assert_eq!(loaded.source, CatalogSource::Provider);
    assert_eq!(loaded.products.len(), 6);

    let missing = load_catalog(&JsonFileCatalog::new("data/does-not-exist.json"));
    assert_eq!(missing.source, CatalogSource::Builtin);
    assert_eq!(missing.products, builtin_catalog());
}
