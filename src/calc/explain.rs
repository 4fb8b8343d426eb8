//! Match reasons and warnings from threshold rules.
//!
//! Every rule looks at the computed values on its own; the output order
//! follows the rule order below and carries no meaning.

use serde::{Deserialize, Serialize};

use super::ecology::Ecological;
use super::economics::Economics;
use super::yield_estimate::YieldEstimate;
use crate::config::ExplainConfig;
use crate::model::{ManufacturingOrigin, MountingType, Product, Profile, SizeBucket};

/// Reasons and warnings for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub reasons: Vec<String>,
    pub warnings: Vec<String>,
}

/// Evaluated values the rules read.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation<'a> {
    pub product: &'a Product,
    pub yield_estimate: &'a YieldEstimate,
    pub economics: &'a Economics,
    pub ecological: &'a Ecological,
}

pub fn explain(eval: &Evaluation<'_>, profile: &Profile, cfg: &ExplainConfig) -> Explanation {
    Explanation {
        reasons: reasons(eval, profile, cfg),
        warnings: warnings(eval, profile, cfg),
    }
}

fn reasons(eval: &Evaluation<'_>, profile: &Profile, cfg: &ExplainConfig) -> Vec<String> {
    let p = eval.product;
    let mut out = Vec::new();

    match profile.budget.ceiling_eur() {
        Some(ceiling) if p.price_eur <= ceiling => {
            out.push(format!("Fits your budget of up to {ceiling:.0} €"));
        }
        _ => {}
    }
    if profile.mounting != MountingType::Unknown && p.supports_mounting(profile.mounting) {
        out.push(format!("Suitable for {} mounting", profile.mounting.label()));
    }
    let amortization = eval.economics.amortization_years;
    if amortization <= cfg.short_amortization_years {
        out.push(format!("Pays for itself in {amortization:.1} years"));
    }
    if p.origin.is_regional() {
        out.push(format!("Manufactured in {}", p.origin.label()));
    }
    if p.bifacial {
        out.push("Bifacial modules also harvest reflected light".to_string());
    }
    if p.has_usable_storage() {
        out.push(format!(
            "{:.1} kWh battery raises self-consumption",
            p.storage_kwh()
        ));
    }
    if eval.ecological.score >= cfg.strong_eco_score {
        out.push(format!(
            "Strong ecological score ({:.0}/100)",
            eval.ecological.score
        ));
    }
    if p.warranty_years >= cfg.long_warranty_years {
        out.push(format!("Long warranty of {} years", p.warranty_years));
    }

    out
}

fn warnings(eval: &Evaluation<'_>, profile: &Profile, cfg: &ExplainConfig) -> Vec<String> {
    let p = eval.product;
    let eco = eval.ecological;
    let mut out = Vec::new();

    if eco.co2_payback_years.is_infinite() {
        out.push("Manufacturing CO₂ is never paid back at this site".to_string());
    } else if eco.co2_payback_years > cfg.long_payback_years {
        out.push(format!(
            "Long CO₂ payback of {:.1} years",
            eco.co2_payback_years
        ));
    }
    if eco.manufacturing.total_kg > cfg.high_footprint_kg {
        out.push(format!(
            "High manufacturing footprint of {:.0} kg CO₂",
            eco.manufacturing.total_kg
        ));
    }
    if p.origin.is_distant() {
        out.push(format!(
            "Shipped from {}, transport adds emissions",
            p.origin.label()
        ));
    }
    if p.origin == ManufacturingOrigin::Unknown {
        out.push("Manufacturing origin is not disclosed".to_string());
    }
    if p.warranty_years == 0 {
        out.push("No warranty period stated".to_string());
    } else if p.warranty_years < cfg.short_warranty_years {
        out.push(format!("Short warranty of {} years", p.warranty_years));
    }
    if eval.economics.amortization_years > cfg.no_amortization_years {
        out.push(format!(
            "Does not pay for itself within {:.0} years",
            cfg.no_amortization_years
        ));
    }
    let y = eval.yield_estimate;
    if y.raw_dc_kwh > 0.0 {
        let lost_share = y.lost_kwh() / y.raw_dc_kwh;
        if lost_share > cfg.clipping_loss_share {
            out.push(format!(
                "Inverter limit clips {:.0} % of the module yield",
                lost_share * 100.0
            ));
        }
    }
    if p.module_count >= 2 && profile.balcony_size == SizeBucket::Small {
        out.push(format!(
            "{} modules may not fit a small balcony",
            p.module_count
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::calc::ecology::ManufacturingFootprint;
    use crate::model::QuizAnswers;

    fn product() -> Product {
        Product {
            id: "x".to_string(),
            brand: "B".to_string(),
            name: "N".to_string(),
            wattage_wp: 800.0,
            module_count: 2,
            price_eur: 600.0,
            has_inverter: true,
            inverter_power_w: Some(800.0),
            has_storage: false,
            storage_capacity_kwh: None,
            mounting_types: BTreeSet::from([MountingType::Railing]),
            bifacial: false,
            module_efficiency_pct: 21.0,
            warranty_years: 12,
            origin: ManufacturingOrigin::Europe,
            manufacturing_co2_kg: None,
            description: String::new(),
        }
    }

    fn profile() -> Profile {
        Profile::from_answers(&QuizAnswers {
            household_size: Some("2".to_string()),
            mounting_location: Some("railing".to_string()),
            orientation: Some("south".to_string()),
            shading: Some("none".to_string()),
            budget: Some("up_to_800".to_string()),
            balcony_size: Some("medium".to_string()),
            ..QuizAnswers::default()
        })
        .expect("profile")
    }

    fn yield_estimate(raw: f64, ceiling: f64) -> YieldEstimate {
        YieldEstimate {
            raw_dc_kwh: raw,
            ac_ceiling_kwh: ceiling,
            clipped_kwh: (raw - ceiling).max(0.0),
            max_recoverable_kwh: 0.0,
            recovered_kwh: 0.0,
            usable_kwh: raw.min(ceiling),
        }
    }

    fn economics(amortization: f64) -> Economics {
        Economics {
            annual_yield_kwh: 760.0,
            self_consumption_kwh: 266.0,
            feed_in_kwh: 494.0,
            annual_savings_eur: 133.61,
            amortization_years: amortization,
            total_savings_10y_eur: 736.1,
            total_savings_20y_eur: 2072.2,
            co2_savings_kg_per_year: 289.0,
        }
    }

    fn ecological(payback: f64, total: f64, score: f64) -> Ecological {
        Ecological {
            manufacturing: ManufacturingFootprint {
                extraction_kg: total * 0.6,
                production_kg: total * 0.35,
                transport_kg: total * 0.05,
                total_kg: total,
                from_override: true,
            },
            co2_payback_years: payback,
            lifecycle_years: 12,
            lifecycle_net_kg: total - 289.0 * 12.0,
            score,
        }
    }

    fn run(p: &Product, y: &YieldEstimate, e: &Economics, eco: &Ecological, pr: &Profile) -> Explanation {
        explain(
            &Evaluation {
                product: p,
                yield_estimate: y,
                economics: e,
                ecological: eco,
            },
            pr,
            &ExplainConfig::default(),
        )
    }

    #[test]
    fn favourable_product_gets_reasons_only() {
        let mut p = product();
        p.bifacial = true;
        p.warranty_years = 25;
        let x = run(
            &p,
            &yield_estimate(760.0, 760.0),
            &economics(4.5),
            &ecological(1.2, 300.0, 88.0),
            &profile(),
        );
        assert_eq!(
            x.reasons,
            vec![
                "Fits your budget of up to 800 €",
                "Suitable for balcony railing mounting",
                "Pays for itself in 4.5 years",
                "Manufactured in Europe",
                "Bifacial modules also harvest reflected light",
                "Strong ecological score (88/100)",
                "Long warranty of 25 years",
            ]
        );
        assert!(x.warnings.is_empty(), "{:?}", x.warnings);
    }

    #[test]
    fn unfavourable_product_collects_warnings() {
        let mut p = product();
        p.origin = ManufacturingOrigin::China;
        p.warranty_years = 5;
        let x = run(
            &p,
            &yield_estimate(1440.0, 960.0),
            &economics(f64::INFINITY),
            &ecological(f64::INFINITY, 700.0, 10.0),
            &profile(),
        );
        assert_eq!(
            x.warnings,
            vec![
                "Manufacturing CO₂ is never paid back at this site",
                "High manufacturing footprint of 700 kg CO₂",
                "Shipped from China, transport adds emissions",
                "Short warranty of 5 years",
                "Does not pay for itself within 20 years",
                "Inverter limit clips 33 % of the module yield",
            ]
        );
        assert!(!x.reasons.iter().any(|r| r.starts_with("Pays for itself")));
    }

    #[test]
    fn payback_warning_threshold_is_exclusive() {
        let p = product();
        let y = yield_estimate(760.0, 760.0);
        let at = run(&p, &y, &economics(4.0), &ecological(8.0, 300.0, 60.0), &profile());
        assert!(!at.warnings.iter().any(|w| w.contains("CO₂ payback")));
        let above = run(&p, &y, &economics(4.0), &ecological(8.1, 300.0, 60.0), &profile());
        assert!(above.warnings.contains(&"Long CO₂ payback of 8.1 years".to_string()));
    }

    #[test]
    fn unknown_origin_and_missing_warranty_are_flagged() {
        let mut p = product();
        p.origin = ManufacturingOrigin::Unknown;
        p.warranty_years = 0;
        let x = run(
            &p,
            &yield_estimate(760.0, 760.0),
            &economics(4.0),
            &ecological(1.0, 300.0, 90.0),
            &profile(),
        );
        assert!(x.warnings.contains(&"Manufacturing origin is not disclosed".to_string()));
        assert!(x.warnings.contains(&"No warranty period stated".to_string()));
        assert!(!x.warnings.iter().any(|w| w.starts_with("Shipped from")));
    }

    #[test]
    fn recovered_clipping_is_not_a_loss() {
        let p = product();
        let mut y = yield_estimate(1440.0, 960.0);
        y.max_recoverable_kwh = 657.0;
        y.recovered_kwh = 480.0;
        y.usable_kwh = 1440.0;
        let x = run(&p, &y, &economics(4.0), &ecological(1.0, 300.0, 90.0), &profile());
        assert!(!x.warnings.iter().any(|w| w.contains("clips")));
    }

    #[test]
    fn two_modules_on_small_balcony() {
        let p = product();
        let mut pr = profile();
        pr.balcony_size = SizeBucket::Small;
        let x = run(
            &p,
            &yield_estimate(760.0, 760.0),
            &economics(4.0),
            &ecological(1.0, 300.0, 90.0),
            &pr,
        );
        assert!(x.warnings.contains(&"2 modules may not fit a small balcony".to_string()));
    }

    #[test]
    fn no_budget_reason_without_ceiling() {
        let p = product();
        let mut pr = profile();
        pr.budget = crate::model::Budget::NoLimit;
        pr.mounting = MountingType::Unknown;
        let x = run(
            &p,
            &yield_estimate(760.0, 760.0),
            &economics(7.0),
            &ecological(1.0, 300.0, 50.0),
            &pr,
        );
        assert_eq!(x.reasons, vec!["Manufactured in Europe"]);
    }

    #[test]
    fn only_regional_origins_give_a_reason() {
        let mut p = product();
        let mut pr = profile();
        pr.budget = crate::model::Budget::NoLimit;
        pr.mounting = MountingType::Unknown;
        let mut reasons = |origin| {
            p.origin = origin;
            run(
                &p,
                &yield_estimate(760.0, 760.0),
                &economics(7.0),
                &ecological(1.0, 300.0, 50.0),
                &pr,
            )
            .reasons
        };
        assert_eq!(reasons(ManufacturingOrigin::Domestic), vec!["Manufactured in Germany"]);
        assert!(reasons(ManufacturingOrigin::OtherAsia).is_empty());
    }
}
