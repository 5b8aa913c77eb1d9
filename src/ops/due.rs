use std::fmt;

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::model::config::ReminderConfig;
use crate::model::reminder::{Reminder, Trigger};

/// How urgent an enabled reminder is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DueState {
    Overdue,
    DueSoon,
    Scheduled,
}

impl DueState {
    pub fn as_str(self) -> &'static str {
        match self {
            DueState::Overdue => "overdue",
            DueState::DueSoon => "due-soon",
            DueState::Scheduled => "scheduled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DueState::Overdue => "Overdue",
            DueState::DueSoon => "Due soon",
            DueState::Scheduled => "Scheduled",
        }
    }
}

impl fmt::Display for DueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Window inside which a reminder counts as due soon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueThresholds {
    pub soon_days: i64,
    pub soon_miles: u32,
}

impl Default for DueThresholds {
    fn default() -> Self {
        DueThresholds::from(&ReminderConfig::default())
    }
}

impl From<&ReminderConfig> for DueThresholds {
    fn from(config: &ReminderConfig) -> Self {
        DueThresholds {
            soon_days: config.soon_days,
            soon_miles: config.soon_miles,
        }
    }
}

/// What "now" means for one classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueContext {
    pub today: NaiveDate,
    /// Current odometer reading of the reminder's vehicle, if known
    pub current_mileage: Option<u32>,
}

/// Days from `today` until `on`; negative once it has passed.
pub fn days_left(on: NaiveDate, today: NaiveDate) -> i64 {
    (on - today).num_days()
}

/// Miles from `current` until `at`; negative once it has passed.
pub fn miles_left(at: u32, current: u32) -> i64 {
    i64::from(at) - i64::from(current)
}

pub fn classify_trigger(trigger: &Trigger, ctx: &DueContext, thresholds: &DueThresholds) -> DueState {
    match trigger {
        Trigger::Date { on, .. } => {
            let left = days_left(*on, ctx.today);
            if left < 0 {
                DueState::Overdue
            } else if left <= thresholds.soon_days {
                DueState::DueSoon
            } else {
                DueState::Scheduled
            }
        }
        Trigger::Mileage { at, .. } => match ctx.current_mileage {
            None => DueState::Scheduled,
            Some(current) => {
                let left = miles_left(*at, current);
                if left < 0 {
                    DueState::Overdue
                } else if left <= i64::from(thresholds.soon_miles) {
                    DueState::DueSoon
                } else {
                    DueState::Scheduled
                }
            }
        },
    }
}

/// Due state of a reminder; `None` when it is disabled.
pub fn classify(reminder: &Reminder, ctx: &DueContext, thresholds: &DueThresholds) -> Option<DueState> {
    if !reminder.enabled {
        return None;
    }
    Some(classify_trigger(&reminder.trigger, ctx, thresholds))
}

/// An enabled reminder with its due state and distance to the trigger
#[derive(Debug, Clone, PartialEq)]
pub struct Upcoming<'a> {
    pub reminder: &'a Reminder,
    pub state: DueState,
    pub days_left: Option<i64>,
    pub miles_left: Option<i64>,
}

/// Classify every enabled reminder, most urgent first. Order within a
/// state follows the input order.
pub fn upcoming<'a, I, F>(
    reminders: I,
    today: NaiveDate,
    mileage_for: F,
    thresholds: &DueThresholds,
) -> Vec<Upcoming<'a>>
where
    I: IntoIterator<Item = &'a Reminder>,
    F: Fn(&Reminder) -> Option<u32>,
{
    let mut items: Vec<Upcoming<'a>> = reminders
        .into_iter()
        .filter_map(|reminder| {
            let ctx = DueContext {
                today,
                current_mileage: mileage_for(reminder),
            };
            let state = classify(reminder, &ctx, thresholds)?;
            let (days, miles) = match reminder.trigger {
                Trigger::Date { on, .. } => (Some(days_left(on, today)), None),
                Trigger::Mileage { at, .. } => {
                    (None, ctx.current_mileage.map(|current| miles_left(at, current)))
                }
            };
            Some(Upcoming {
                reminder,
                state,
                days_left: days,
                miles_left: miles,
            })
        })
        .collect();
    items.sort_by_key(|item| item.state);
    items
}

/// Enabled date reminders that fall on `date`. Mileage reminders have no
/// calendar day and never appear.
pub fn due_on<'a, I>(reminders: I, date: NaiveDate) -> Vec<&'a Reminder>
where
    I: IntoIterator<Item = &'a Reminder>,
{
    reminders
        .into_iter()
        .filter(|r| r.enabled && matches!(r.trigger, Trigger::Date { on, .. } if on == date))
        .collect()
}

/// Days of the given month with at least one enabled date reminder,
/// earliest first.
pub fn scheduled_days<'a, I>(reminders: I, year: i32, month: u32) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = &'a Reminder>,
{
    let mut days: Vec<NaiveDate> = reminders
        .into_iter()
        .filter(|r| r.enabled)
        .filter_map(|r| match r.trigger {
            Trigger::Date { on, .. } if on.year() == year && on.month() == month => Some(on),
            _ => None,
        })
        .collect();
    days.sort_unstable();
    days.dedup();
    days
}

/// The trigger after one more interval, or `None` for one-shot reminders.
pub fn next_trigger(trigger: &Trigger) -> Option<Trigger> {
    match *trigger {
        Trigger::Mileage { at, every } => {
            let step = every?;
            Some(Trigger::Mileage {
                at: at.saturating_add(step),
                every,
            })
        }
        Trigger::Date { on, every } => {
            let period = every?;
            Some(Trigger::Date {
                on: on
                    .checked_add_months(Months::new(period.months()))
                    .unwrap_or(NaiveDate::MAX),
                every,
            })
        }
    }
}
