use chrono::NaiveDate;

use crate::model::garage::Garage;
use crate::model::vehicle::Vehicle;
use crate::ops::aggregate::{CostSummary, summarize};
use crate::ops::due::{DueState, DueThresholds, Upcoming, upcoming};

/// Dashboard figures for the whole garage or a single vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct Overview<'a> {
    pub summary: CostSummary,
    /// Each vehicle in scope with its current odometer reading
    pub mileage: Vec<(&'a Vehicle, Option<u32>)>,
    /// Enabled reminders in scope, most urgent first
    pub upcoming: Vec<Upcoming<'a>>,
}

impl<'a> Overview<'a> {
    pub fn count(&self, state: DueState) -> usize {
        self.upcoming.iter().filter(|u| u.state == state).count()
    }

    /// The most urgent enabled reminder.
    pub fn next(&self) -> Option<&Upcoming<'a>> {
        self.upcoming.first()
    }
}

/// Collect the overview. With `vehicle_id`, only that vehicle's services
/// and reminders count; garage-wide reminders are left out.
pub fn overview<'a>(
    garage: &'a Garage,
    vehicle_id: Option<&str>,
    today: NaiveDate,
    thresholds: &DueThresholds,
) -> Overview<'a> {
    let in_scope = |id: &str| vehicle_id.is_none_or(|v| v == id);

    let summary = summarize(garage.services.iter().filter(|s| in_scope(s.vehicle_id.as_str())));
    let mileage = garage
        .vehicles
        .iter()
        .filter(|v| in_scope(v.id.as_str()))
        .map(|v| (v, garage.current_mileage(&v.id)))
        .collect();
    let items = upcoming(
        garage.reminders.iter().filter(|r| match vehicle_id {
            None => true,
            Some(v) => r.vehicle_id.as_deref() == Some(v),
        }),
        today,
        |r| r.vehicle_id.as_deref().and_then(|v| garage.current_mileage(v)),
        thresholds,
    );

    Overview {
        summary,
        mileage,
        upcoming: items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed::sample_data;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn garage() -> Garage {
        Garage::from_data(sample_data(), Duration::from_secs(10)).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn whole_garage() {
        let g = garage();
        let o = overview(&g, None, d(2024, 1, 10), &DueThresholds::default());
        assert_eq!(o.summary.count, 5);
        assert_eq!(o.summary.total, 950.0);
        let mileage: Vec<(&str, Option<u32>)> =
            o.mileage.iter().map(|(v, m)| (v.id.as_str(), *m)).collect();
        assert_eq!(mileage, vec![("1", Some(45289)), ("2", Some(25000))]);
        assert_eq!(o.upcoming.len(), 4);
        assert_eq!(o.count(DueState::Scheduled), 4);
        assert_eq!(o.next().unwrap().reminder.title, "Oil Change");
    }

    #[test]
    fn single_vehicle() {
        let g = garage();
        let o = overview(&g, Some("2"), d(2024, 1, 10), &DueThresholds::default());
        assert_eq!(o.summary.count, 2);
        assert_eq!(o.summary.total, 735.0);
        assert_eq!(o.mileage.len(), 1);
        assert!(o.upcoming.is_empty());
        assert!(o.next().is_none());
    }

    #[test]
    fn next_is_most_urgent() {
        let g = garage();
        let o = overview(&g, None, d(2024, 4, 12), &DueThresholds::default());
        assert_eq!(o.count(DueState::Overdue), 1);
        assert_eq!(o.next().unwrap().reminder.title, "Insurance Renewal");
    }
}
