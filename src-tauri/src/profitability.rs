//! Monthly revenue and profit estimates per rental platform.
//!
//! Inputs are taken as given: negative rates or occupancy above 100% are
//! not clamped.

use serde::Serialize;

use crate::models::{Platform, ProfitabilityData};

pub const DAYS_PER_MONTH: f64 = 30.0;

/// Minimum profit margin, in percent of the rent, for an address to count as profitable.
pub const PROFITABLE_MARGIN: f64 = 50.0;

pub fn days_occupied(occupancy_rate: f64) -> f64 {
    (occupancy_rate / 100.0) * DAYS_PER_MONTH
}

/// JSON has no representation for infinities or NaN; overflowing results
/// are reported as 0.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Platform with its revenue and profit derived from rate, occupancy and rent.
pub fn estimate(platform: &Platform, monthly_rent: f64) -> Platform {
    let monthly_revenue =
        finite_or_zero(platform.nightly_rate * days_occupied(platform.occupancy_rate));

    Platform {
        monthly_revenue,
        profit: Some(finite_or_zero(monthly_revenue - monthly_rent)),
        ..platform.clone()
    }
}

pub fn recompute(data: &ProfitabilityData) -> Vec<Platform> {
    data.platforms
        .iter()
        .map(|platform| estimate(platform, data.monthly_rent))
        .collect()
}

/// Recomputes every derived field. Returns true only if at least one value
/// differs from what was there before, so callers can skip the write.
pub fn refresh(data: &mut ProfitabilityData) -> bool {
    let updated = recompute(data);

    let changed = updated
        .iter()
        .zip(data.platforms.iter())
        .any(|(new, old)| new.monthly_revenue != old.monthly_revenue || new.profit != old.profit);

    if changed {
        data.platforms = updated;
    }
    changed
}

/// Highest monthly revenue; the first platform wins ties.
pub fn best_platform(platforms: &[Platform]) -> Option<&Platform> {
    platforms.iter().reduce(|best, current| {
        if current.monthly_revenue > best.monthly_revenue {
            current
        } else {
            best
        }
    })
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilitySummary {
    pub best_platform: String,
    pub best_revenue: f64,
    pub profit: f64,
    pub profit_margin: f64,
    pub is_profitable: bool,
}

/// `None` when there are no platforms to compare.
pub fn summarize(data: &ProfitabilityData) -> Option<ProfitabilitySummary> {
    let platforms = recompute(data);
    let best = best_platform(&platforms)?;

    let profit = finite_or_zero(best.monthly_revenue - data.monthly_rent);
    let profit_margin = if data.monthly_rent > 0.0 {
        finite_or_zero((profit / data.monthly_rent) * 100.0)
    } else {
        0.0
    };

    Some(ProfitabilitySummary {
        best_platform: best.name.clone(),
        best_revenue: best.monthly_revenue,
        profit,
        profit_margin,
        is_profitable: profit_margin >= PROFITABLE_MARGIN,
    })
}
