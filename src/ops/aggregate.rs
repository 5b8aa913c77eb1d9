use chrono::Datelike;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::mileage::MileageEntry;
use crate::model::service::ServiceRecord;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Plain left fold. `Iterator::sum` over an empty f64 sequence is `-0.0`,
/// which would render as "-0.00".
fn add_all<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

/// Cost figures for a set of service records
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostSummary {
    pub count: usize,
    pub total: f64,
    /// Subtotal per service category, in first-seen order
    pub by_category: IndexMap<String, f64>,
}

impl CostSummary {
    /// Each category with its subtotal and its percentage of the total.
    pub fn shares(&self) -> Vec<(&str, f64, f64)> {
        self.by_category
            .iter()
            .map(|(category, cost)| (category.as_str(), *cost, share(*cost, self.total)))
            .collect()
    }
}

/// Sum costs over `records`. The total is the sum of the category
/// subtotals, so the subtotals always add up to it exactly.
pub fn summarize<'a, I>(records: I) -> CostSummary
where
    I: IntoIterator<Item = &'a ServiceRecord>,
{
    let mut count = 0;
    let mut by_category: IndexMap<String, f64> = IndexMap::new();
    for record in records {
        count += 1;
        *by_category.entry(record.service.clone()).or_insert(0.0) += record.cost;
    }
    let total = add_all(by_category.values().copied());
    CostSummary {
        count,
        total,
        by_category,
    }
}

/// `part` as a percentage of `total`, clamped to `[0, 100]`. Zero when
/// the total is zero or either value is not finite.
pub fn share(part: f64, total: f64) -> f64 {
    if total == 0.0 || !total.is_finite() || !part.is_finite() {
        return 0.0;
    }
    (part / total * 100.0).clamp(0.0, 100.0)
}

/// Total cost per vehicle ID, in first-seen order.
pub fn by_vehicle<'a, I>(records: I) -> IndexMap<String, f64>
where
    I: IntoIterator<Item = &'a ServiceRecord>,
{
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for record in records {
        *totals.entry(record.vehicle_id.clone()).or_insert(0.0) += record.cost;
    }
    totals
}

/// One point of the monthly cost series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month: u32,
    pub label: &'static str,
    pub total: f64,
}

/// Twelve monthly totals for `year`, January first. Months without
/// services are zero.
pub fn by_month<'a, I>(records: I, year: i32) -> Vec<MonthTotal>
where
    I: IntoIterator<Item = &'a ServiceRecord>,
{
    let mut totals = [0.0_f64; 12];
    for record in records {
        if record.date.year() == year {
            totals[record.date.month0() as usize] += record.cost;
        }
    }
    totals
        .iter()
        .enumerate()
        .map(|(i, total)| MonthTotal {
            month: i as u32 + 1,
            label: MONTH_LABELS[i],
            total: *total,
        })
        .collect()
}

/// Years that have at least one service, most recent first.
pub fn years<'a, I>(records: I) -> Vec<i32>
where
    I: IntoIterator<Item = &'a ServiceRecord>,
{
    let mut years: Vec<i32> = records.into_iter().map(|r| r.date.year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Odometer readings for one vehicle, oldest first.
pub fn mileage_series<'a, I>(entries: I, vehicle_id: &str) -> Vec<&'a MileageEntry>
where
    I: IntoIterator<Item = &'a MileageEntry>,
{
    let mut points: Vec<&MileageEntry> = entries
        .into_iter()
        .filter(|e| e.vehicle_id == vehicle_id)
        .collect();
    points.sort_by_key(|e| (e.date, e.mileage));
    points
}
