use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::store::Record;

/// Recurrence period for date-based reminders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    Month,
    Quarter,
    HalfYear,
    Year,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Month, Period::Quarter, Period::HalfYear, Period::Year];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::HalfYear => "half-year",
            Period::Year => "year",
        }
    }

    pub fn parse(s: &str) -> Option<Period> {
        match s {
            "month" => Some(Period::Month),
            "quarter" => Some(Period::Quarter),
            "half-year" => Some(Period::HalfYear),
            "year" => Some(Period::Year),
            _ => None,
        }
    }

    /// Length of the period in calendar months
    pub fn months(self) -> u32 {
        match self {
            Period::Month => 1,
            Period::Quarter => 3,
            Period::HalfYear => 6,
            Period::Year => 12,
        }
    }

    /// Adverb shown next to the trigger date
    pub fn label(self) -> &'static str {
        match self {
            Period::Month => "monthly",
            Period::Quarter => "quarterly",
            Period::HalfYear => "every 6 months",
            Period::Year => "yearly",
        }
    }
}

/// Discriminant of a [`Trigger`], used for filtering and form input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    Mileage,
    Date,
}

impl TriggerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerKind::Mileage => "mileage",
            TriggerKind::Date => "date",
        }
    }

    pub fn parse(s: &str) -> Option<TriggerKind> {
        match s {
            "mileage" => Some(TriggerKind::Mileage),
            "date" => Some(TriggerKind::Date),
            _ => None,
        }
    }
}

/// When a reminder fires. `every` is the recurrence interval; `None` means one-shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trigger {
    Mileage {
        at: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        every: Option<u32>,
    },
    Date {
        on: NaiveDate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        every: Option<Period>,
    },
}

impl Trigger {
    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::Mileage { .. } => TriggerKind::Mileage,
            Trigger::Date { .. } => TriggerKind::Date,
        }
    }

    pub fn is_recurring(&self) -> bool {
        match self {
            Trigger::Mileage { every, .. } => every.is_some(),
            Trigger::Date { every, .. } => every.is_some(),
        }
    }
}

/// A maintenance reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Vehicle this reminder is for, if any. Mileage triggers compare
    /// against this vehicle's latest odometer reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    pub trigger: Trigger,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Record for Reminder {
    fn id(&self) -> &str {
        &self.id
    }
}
