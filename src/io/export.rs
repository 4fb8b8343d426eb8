//! CSV export for product rankings.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::calc::ranking::ProductRanking;

/// Column header for CSV ranking export.
const HEADER: &str = "rank,product_id,brand,name,price_eur,wattage_wp,score,economic_score,\
                      eco_score,usable_kwh,clipped_kwh,recovered_kwh,self_consumption_kwh,\
                      feed_in_kwh,annual_savings_eur,amortization_years,savings_10y_eur,\
                      savings_20y_eur,co2_savings_kg,manufacturing_co2_kg,co2_payback_years,\
                      lifecycle_net_kg,reasons,warnings";

/// Exports rankings to a CSV file at the given path.
///
/// Writes a header row followed by one row per ranking, in rank order.
/// Infinite periods are written as `inf`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rankings: &[ProductRanking], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rankings, buf)
}

/// Writes rankings as CSV to any writer.
///
/// # Arguments
///
/// * `rankings` - Ranked products
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rankings: &[ProductRanking], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in rankings {
        let e = &r.economics;
        let eco = &r.ecological;
        let y = &r.yield_estimate;
        wtr.write_record(&[
            r.rank.to_string(),
            r.product.id.clone(),
            r.product.brand.clone(),
            r.product.name.clone(),
            format!("{:.2}", r.product.price_eur),
            format!("{:.0}", r.product.wattage_wp),
            format!("{:.1}", r.score),
            format!("{:.1}", r.economic_score),
            format!("{:.0}", eco.score),
            format!("{:.1}", y.usable_kwh),
            format!("{:.1}", y.clipped_kwh),
            format!("{:.1}", y.recovered_kwh),
            format!("{:.0}", e.self_consumption_kwh),
            format!("{:.0}", e.feed_in_kwh),
            format!("{:.2}", e.annual_savings_eur),
            period(e.amortization_years),
            format!("{:.2}", e.total_savings_10y_eur),
            format!("{:.2}", e.total_savings_20y_eur),
            format!("{:.0}", e.co2_savings_kg_per_year),
            format!("{:.0}", eco.manufacturing.total_kg),
            period(eco.co2_payback_years),
            format!("{:.0}", eco.lifecycle_net_kg),
            r.reasons.join("; "),
            r.warnings.join("; "),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn period(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.1}")
    } else {
        "inf".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_catalog;
    use crate::engine::RecommendationEngine;
    use crate::model::QuizAnswers;

    fn rankings() -> Vec<ProductRanking> {
        let answers = QuizAnswers {
            household_size: Some("2".to_string()),
            mounting_location: Some("unknown".to_string()),
            orientation: Some("south_west".to_string()),
            shading: Some("none".to_string()),
            budget: Some("no_limit".to_string()),
            ..QuizAnswers::default()
        };
        RecommendationEngine::default()
            .recommend_answers(&answers, &builtin_catalog(), None)
            .rankings
    }

    fn render(rankings: &[ProductRanking]) -> String {
        let mut buf = Vec::new();
        write_csv(rankings, &mut buf).expect("write to vec");
        String::from_utf8(buf).expect("utf-8")
    }

    #[test]
    fn header_is_fixed() {
        let output = render(&[]);
        let first = output.lines().next().unwrap_or("");
        assert!(first.starts_with("rank,product_id,brand,name,price_eur"));
        assert!(first.ends_with("lifecycle_net_kg,reasons,warnings"));
    }

    #[test]
    fn one_row_per_ranking_in_rank_order() {
        let rankings = rankings();
        let output = render(&rankings);

        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        assert_eq!(rdr.headers().map(csv::StringRecord::len).ok(), Some(24));

        let ranks: Vec<usize> = rdr
            .records()
            .map(|rec| rec.expect("row parses")[0].parse().expect("rank is usize"))
            .collect();
        assert_eq!(ranks, (1..=rankings.len()).collect::<Vec<_>>());
    }

    #[test]
    fn deterministic_output() {
        let rankings = rankings();
        assert_eq!(render(&rankings), render(&rankings));
    }

    #[test]
    fn infinite_periods_written_as_inf() {
        assert_eq!(period(f64::INFINITY), "inf");
        assert_eq!(period(3.64), "3.6");
    }
}
