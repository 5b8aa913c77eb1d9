use chrono::{Months, NaiveDate};
use indexmap::IndexSet;

use crate::model::reminder::{Reminder, TriggerKind};
use crate::model::service::ServiceRecord;
use crate::model::vehicle::Vehicle;

/// A drop-down style filter value: everything, or one exact value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// `"all"` and the empty string select everything.
    pub fn parse(s: &str) -> Selection {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Only(s.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

/// How far back from today a record's date may be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateWindow {
    #[default]
    AllTime,
    LastMonth,
    LastThreeMonths,
    LastYear,
}

impl DateWindow {
    pub fn parse(s: &str) -> Option<DateWindow> {
        match s {
            "all" | "all-time" => Some(DateWindow::AllTime),
            "last-month" => Some(DateWindow::LastMonth),
            "last-3-months" => Some(DateWindow::LastThreeMonths),
            "last-year" => Some(DateWindow::LastYear),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DateWindow::AllTime => "all",
            DateWindow::LastMonth => "last-month",
            DateWindow::LastThreeMonths => "last-3-months",
            DateWindow::LastYear => "last-year",
        }
    }

    fn months(self) -> Option<u32> {
        match self {
            DateWindow::AllTime => None,
            DateWindow::LastMonth => Some(1),
            DateWindow::LastThreeMonths => Some(3),
            DateWindow::LastYear => Some(12),
        }
    }

    /// First day inside the window, or `None` for all time.
    pub fn start(self, today: NaiveDate) -> Option<NaiveDate> {
        let months = self.months()?;
        Some(
            today
                .checked_sub_months(Months::new(months))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    /// `today - window <= date <= today`. All time admits every date,
    /// including future ones.
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.start(today) {
            None => true,
            Some(start) => start <= date && date <= today,
        }
    }
}

/// Case-insensitive substring test; `needle` must already be lowercase.
fn contains_lower(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// Active filters on the service history. The default filter admits
/// every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    /// Free text matched against service name, shop and notes
    pub query: String,
    /// Vehicle ID
    pub vehicle: Selection,
    /// Service category
    pub service: Selection,
    pub window: DateWindow,
}

impl ServiceFilter {
    pub fn is_unfiltered(&self) -> bool {
        self.query.trim().is_empty()
            && self.vehicle == Selection::All
            && self.service == Selection::All
            && self.window == DateWindow::AllTime
    }

    pub fn matches(&self, record: &ServiceRecord, today: NaiveDate) -> bool {
        self.matches_lowered(record, &self.query.trim().to_lowercase(), today)
    }

    fn matches_lowered(&self, record: &ServiceRecord, query: &str, today: NaiveDate) -> bool {
        let text = contains_lower(&record.service, query)
            || contains_lower(&record.shop, query)
            || contains_lower(&record.notes, query);
        text && self.vehicle.matches(&record.vehicle_id)
            && self.service.matches(&record.service)
            && self.window.contains(record.date, today)
    }

    /// The visible subset, in source order.
    pub fn apply<'a, I>(&self, records: I, today: NaiveDate) -> Vec<&'a ServiceRecord>
    where
        I: IntoIterator<Item = &'a ServiceRecord>,
    {
        let query = self.query.trim().to_lowercase();
        records
            .into_iter()
            .filter(|r| self.matches_lowered(r, &query, today))
            .collect()
    }
}

/// Distinct service categories in first-seen order.
pub fn service_types<'a, I>(records: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a ServiceRecord>,
{
    records
        .into_iter()
        .map(|r| r.service.as_str())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct vehicle IDs referenced by the records, in first-seen order.
pub fn vehicle_ids<'a, I>(records: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a ServiceRecord>,
{
    records
        .into_iter()
        .map(|r| r.vehicle_id.as_str())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Vehicles
// ---------------------------------------------------------------------------

/// Free-text search over vehicles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleFilter {
    pub query: String,
}

impl VehicleFilter {
    pub fn apply<'a, I>(&self, vehicles: I) -> Vec<&'a Vehicle>
    where
        I: IntoIterator<Item = &'a Vehicle>,
    {
        let query = self.query.trim().to_lowercase();
        vehicles
            .into_iter()
            .filter(|v| {
                contains_lower(&v.name, &query)
                    || contains_lower(&v.make, &query)
                    || contains_lower(&v.model, &query)
                    || v.license_plate
                        .as_deref()
                        .is_some_and(|p| contains_lower(p, &query))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Reminders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderFilter {
    pub enabled_only: bool,
    pub kind: Option<TriggerKind>,
}

impl ReminderFilter {
    pub fn apply<'a, I>(&self, reminders: I) -> Vec<&'a Reminder>
    where
        I: IntoIterator<Item = &'a Reminder>,
    {
        reminders
            .into_iter()
            .filter(|r| !self.enabled_only || r.enabled)
            .filter(|r| self.kind.is_none_or(|k| r.trigger.kind() == k))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::reminder::Trigger;
    use crate::model::seed::sample_data;
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ids<'a>(records: &[&'a ServiceRecord]) -> Vec<&'a str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn all_sentinels_return_everything_in_order() {
        let data = sample_data();
        let filter = ServiceFilter {
            query: String::new(),
            vehicle: Selection::parse("all"),
            service: Selection::parse("all"),
            window: DateWindow::parse("all").unwrap(),
        };
        assert!(filter.is_unfiltered());
        let visible = filter.apply(&data.services, d(2024, 1, 10));
        assert_eq!(ids(&visible), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn empty_collection_yields_empty() {
        let filter = ServiceFilter::default();
        let empty: Vec<ServiceRecord> = Vec::new();
        assert!(filter.apply(&empty, d(2024, 1, 10)).is_empty());
    }

    #[test]
    fn text_search_is_case_insensitive_across_fields() {
        let data = sample_data();
        let today = d(2024, 1, 10);
        let by_service = ServiceFilter {
            query: "OIL".into(),
            ..Default::default()
        };
        assert_eq!(ids(&by_service.apply(&data.services, today)), vec!["1", "4"]);

        let by_shop = ServiceFilter {
            query: "discount".into(),
            ..Default::default()
        };
        assert_eq!(ids(&by_shop.apply(&data.services, today)), vec!["2"]);

        let by_notes = ServiceFilter {
            query: "all-season".into(),
            ..Default::default()
        };
        assert_eq!(ids(&by_notes.apply(&data.services, today)), vec!["5"]);
    }

    #[test]
    fn predicates_compose_with_and() {
        let data = sample_data();
        let filter = ServiceFilter {
            query: "oil".into(),
            vehicle: Selection::Only("2".into()),
            service: Selection::Only("Oil Change".into()),
            window: DateWindow::AllTime,
        };
        assert_eq!(ids(&filter.apply(&data.services, d(2024, 1, 10))), vec!["4"]);
    }

    #[test]
    fn filtered_result_is_always_a_subset() {
        let data = sample_data();
        let today = d(2023, 12, 20);
        let queries = ["", "oil", "tire", "zzz"];
        let vehicles = [Selection::All, Selection::Only("1".into()), Selection::Only("9".into())];
        let services = [Selection::All, Selection::Only("Oil Change".into())];
        let windows = [
            DateWindow::AllTime,
            DateWindow::LastMonth,
            DateWindow::LastThreeMonths,
            DateWindow::LastYear,
        ];
        for q in queries {
            for v in &vehicles {
                for s in &services {
                    for w in windows {
                        let filter = ServiceFilter {
                            query: q.into(),
                            vehicle: v.clone(),
                            service: s.clone(),
                            window: w,
                        };
                        let visible = filter.apply(&data.services, today);
                        assert!(visible.len() <= data.services.len());
                        for r in visible {
                            assert!(data.services.iter().any(|src| src.id == r.id));
                            assert!(filter.matches(r, today));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn date_windows_use_calendar_months() {
        let today = d(2023, 12, 20);
        assert_eq!(DateWindow::LastMonth.start(today), Some(d(2023, 11, 20)));
        assert_eq!(DateWindow::LastThreeMonths.start(today), Some(d(2023, 9, 20)));
        assert_eq!(DateWindow::LastYear.start(today), Some(d(2022, 12, 20)));
        assert_eq!(DateWindow::AllTime.start(today), None);

        assert!(DateWindow::LastMonth.contains(d(2023, 11, 20), today));
        assert!(DateWindow::LastMonth.contains(today, today));
        assert!(!DateWindow::LastMonth.contains(d(2023, 11, 19), today));
        assert!(!DateWindow::LastMonth.contains(d(2023, 12, 21), today));
        assert!(DateWindow::AllTime.contains(d(2030, 1, 1), today));
    }

    #[test]
    fn month_end_window_clamps() {
        let today = d(2024, 3, 31);
        assert_eq!(DateWindow::LastMonth.start(today), Some(d(2024, 2, 29)));
    }

    #[test]
    fn last_three_months_on_sample() {
        let data = sample_data();
        let filter = ServiceFilter {
            window: DateWindow::LastThreeMonths,
            ..Default::default()
        };
        // Tire replacement on 2023-09-15 falls just outside
        let visible = filter.apply(&data.services, d(2023, 12, 20));
        assert_eq!(ids(&visible), vec!["1", "2", "4"]);
    }

    #[test]
    fn unknown_window_is_rejected_not_empty() {
        assert_eq!(DateWindow::parse("last-decade"), None);
        assert_eq!(Selection::parse(""), Selection::All);
        assert_eq!(Selection::parse(" ALL "), Selection::All);
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let data = sample_data();
        assert_eq!(
            service_types(&data.services),
            vec!["Oil Change", "Tire Rotation", "Brake Inspection", "Tire Replacement"]
        );
        assert_eq!(vehicle_ids(&data.services), vec!["1", "2"]);
    }

    #[test]
    fn vehicle_search_matches_plate_and_make() {
        let data = sample_data();
        let by_plate = VehicleFilter {
            query: "xyz".into(),
        };
        let hits: Vec<_> = by_plate.apply(&data.vehicles).iter().map(|v| v.id.clone()).collect();
        assert_eq!(hits, vec!["2"]);

        let everything = VehicleFilter::default();
        assert_eq!(everything.apply(&data.vehicles).len(), 2);
    }

    #[test]
    fn reminder_filter_by_kind_and_enabled() {
        let mut data = sample_data();
        data.reminders[0].enabled = false;
        let filter = ReminderFilter {
            enabled_only: true,
            kind: Some(TriggerKind::Mileage),
        };
        let hits = filter.apply(&data.reminders);
        assert_eq!(hits.len(), 1);
        assert!(matches!(hits[0].trigger, Trigger::Mileage { at: 50000, .. }));
    }
}
