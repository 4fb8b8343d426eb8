//! Plain-text rendering of recommendation results.

use std::fmt;

use crate::calc::ranking::ProductRanking;
use crate::engine::RecommendationResponse;

/// Formats a period in years, `never` for `+∞`.
fn years(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.1} y")
    } else {
        "never".to_string()
    }
}

impl fmt::Display for ProductRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<2} {:<32} score {:>5.1} | {:>5.0} kWh/yr | {:>7.2} €/yr | amortization {:>6} | CO₂ payback {:>6} | eco {:>3.0}",
            self.rank,
            self.product.display_name(),
            self.score,
            self.economics.annual_yield_kwh,
            self.economics.annual_savings_eur,
            years(self.economics.amortization_years),
            years(self.ecological.co2_payback_years),
            self.ecological.score,
        )
    }
}

impl fmt::Display for RecommendationResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Recommendation ---")?;
        writeln!(
            f,
            "Recommended:           {}",
            if self.recommended { "yes" } else { "no" }
        )?;
        writeln!(f, "Reason:                {}", self.reason)?;
        if let Some(ref e) = self.error {
            writeln!(f, "Error:                 {e}")?;
        }
        if !self.profile_summary.is_empty() {
            writeln!(f, "Profile:               {}", self.profile_summary)?;
        }
        let used = &self.assumptions;
        if let Some(kwh) = used.annual_consumption_kwh {
            writeln!(
                f,
                "Annual consumption:    {kwh:.0} kWh ({})",
                if used.used_declared_consumption {
                    "declared"
                } else {
                    "estimated"
                }
            )?;
        }
        if let Some(site) = used.site {
            writeln!(
                f,
                "Yield basis:           {:.3} kWh/Wp x {:.2} shading ({})",
                site.yield_basis_kwh_per_wp,
                site.shading_factor,
                if used.used_irradiance {
                    "irradiance data"
                } else {
                    "static tables"
                }
            )?;
        }
        writeln!(f, "Candidates:            {}", self.rankings.len())?;
        write!(f, "Filtered out:          {}", self.filtered_out_count)?;

        for r in &self.rankings {
            write!(f, "\n{r}")?;
            for reason in &r.reasons {
                write!(f, "\n    + {reason}")?;
            }
            for warning in &r.warnings {
                write!(f, "\n    ! {warning}")?;
            }
        }
        Ok(())
    }
}
