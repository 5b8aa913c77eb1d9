use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use regex::Regex;

use crate::model::garage::Garage;
use crate::model::reminder::{Period, Reminder, Trigger, TriggerKind};
use crate::model::service::ServiceRecord;
use crate::model::vehicle::Vehicle;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("year pattern is valid"));

pub const EARLIEST_YEAR: i32 = 1900;

/// Validation failures for one form submission, keyed by field name in
/// the order the fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(IndexMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors(IndexMap::new())
    }

    /// Record a message for `field`. The first message per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(|m| m.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// `Ok(value)` when no errors were recorded.
    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "invalid input ({})", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

fn required<'a>(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &'a str,
    message: &str,
) -> Option<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, message);
        None
    } else {
        Some(value)
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn parse_positive(s: &str) -> Option<u32> {
    s.trim().replace(',', "").parse::<u32>().ok().filter(|n| *n > 0)
}

fn parse_cost(s: &str) -> Option<f64> {
    s.trim()
        .trim_start_matches('$')
        .parse::<f64>()
        .ok()
        .filter(|c| c.is_finite() && *c >= 0.0)
}

/// Resolve a vehicle reference to an ID. `kept` is the ID an edited record
/// already points at; it stays valid after that vehicle is deleted.
fn resolve_vehicle(
    garage: &Garage,
    errors: &mut FieldErrors,
    reference: &str,
    kept: Option<&str>,
) -> Option<String> {
    match garage.resolve_vehicle(reference) {
        Some(vehicle) => Some(vehicle.id.clone()),
        None if kept == Some(reference) => Some(reference.to_string()),
        None => {
            errors.add("vehicle", format!("Unknown vehicle '{}'", reference));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Vehicle form
// ---------------------------------------------------------------------------

/// Raw vehicle form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleForm {
    pub name: String,
    pub make: String,
    pub model: String,
    pub year: String,
    pub license_plate: String,
    pub vin: String,
    pub purchase_date: String,
}

/// A validated vehicle without an ID
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDraft {
    pub name: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub purchase_date: Option<NaiveDate>,
}

impl VehicleDraft {
    pub fn into_vehicle(self, id: String) -> Vehicle {
        Vehicle {
            id,
            name: self.name,
            make: self.make,
            model: self.model,
            year: self.year,
            license_plate: self.license_plate,
            vin: self.vin,
            purchase_date: self.purchase_date,
        }
    }
}

impl VehicleForm {
    /// Prefill from an existing vehicle, for editing.
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        VehicleForm {
            name: vehicle.name.clone(),
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year.to_string(),
            license_plate: vehicle.license_plate.clone().unwrap_or_default(),
            vin: vehicle.vin.clone().unwrap_or_default(),
            purchase_date: vehicle
                .purchase_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
        }
    }

    /// Valid years run from 1900 through next calendar year.
    pub fn validate(&self, today: NaiveDate) -> Result<VehicleDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required(&mut errors, "name", &self.name, "Name is required");
        let make = required(&mut errors, "make", &self.make, "Make is required");
        let model = required(&mut errors, "model", &self.model, "Model is required");

        let latest = today.year() + 1;
        let year = required(&mut errors, "year", &self.year, "Year is required").and_then(|y| {
            let parsed = YEAR_RE
                .is_match(y)
                .then(|| y.parse::<i32>().ok())
                .flatten()
                .filter(|y| (EARLIEST_YEAR..=latest).contains(y));
            if parsed.is_none() {
                errors.add(
                    "year",
                    format!("Year must be between {} and {}", EARLIEST_YEAR, latest),
                );
            }
            parsed
        });

        let purchase_date = match optional(&self.purchase_date) {
            None => None,
            Some(raw) => {
                let parsed = parse_date(&raw);
                if parsed.is_none() {
                    errors.add("purchase_date", "Purchase date must be YYYY-MM-DD");
                }
                parsed
            }
        };

        errors.finish(|| VehicleDraft {
            name: name.unwrap_or_default().to_string(),
            make: make.unwrap_or_default().to_string(),
            model: model.unwrap_or_default().to_string(),
            year: year.unwrap_or_default(),
            license_plate: optional(&self.license_plate),
            vin: optional(&self.vin).map(|v| v.to_uppercase()),
            purchase_date,
        })
    }
}

// ---------------------------------------------------------------------------
// Service form
// ---------------------------------------------------------------------------

/// Raw service form input. `vehicle` is an ID or a vehicle name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceForm {
    pub vehicle: String,
    pub service: String,
    pub date: String,
    pub mileage: String,
    pub cost: String,
    pub shop: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDraft {
    pub vehicle_id: String,
    pub service: String,
    pub date: NaiveDate,
    pub mileage: u32,
    pub cost: f64,
    pub shop: String,
    pub notes: String,
}

impl ServiceDraft {
    pub fn into_record(self, id: String) -> ServiceRecord {
        ServiceRecord {
            id,
            vehicle_id: self.vehicle_id,
            service: self.service,
            date: self.date,
            mileage: self.mileage,
            cost: self.cost,
            shop: self.shop,
            notes: self.notes,
        }
    }
}

impl ServiceForm {
    pub fn from_record(record: &ServiceRecord) -> Self {
        ServiceForm {
            vehicle: record.vehicle_id.clone(),
            service: record.service.clone(),
            date: record.date.to_string(),
            mileage: record.mileage.to_string(),
            cost: record.cost.to_string(),
            shop: record.shop.clone(),
            notes: record.notes.clone(),
        }
    }

    pub fn validate(&self, garage: &Garage) -> Result<ServiceDraft, FieldErrors> {
        self.check(garage, None)
    }

    /// Validate changes to `existing`. Its vehicle ID is accepted even
    /// when that vehicle no longer exists.
    pub fn validate_edit(
        &self,
        garage: &Garage,
        existing: &ServiceRecord,
    ) -> Result<ServiceDraft, FieldErrors> {
        self.check(garage, Some(&existing.vehicle_id))
    }

    fn check(&self, garage: &Garage, kept: Option<&str>) -> Result<ServiceDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let vehicle_id = required(&mut errors, "vehicle", &self.vehicle, "Please select a vehicle")
            .and_then(|v| resolve_vehicle(garage, &mut errors, v, kept));
        let service = required(&mut errors, "service", &self.service, "Service type is required");
        let date = required(&mut errors, "date", &self.date, "Date is required").and_then(|d| {
            let parsed = parse_date(d);
            if parsed.is_none() {
                errors.add("date", "Date must be YYYY-MM-DD");
            }
            parsed
        });
        let mileage =
            required(&mut errors, "mileage", &self.mileage, "Mileage is required").and_then(|m| {
                let parsed = parse_positive(m);
                if parsed.is_none() {
                    errors.add("mileage", "Mileage must be a positive number");
                }
                parsed
            });
        let cost = required(&mut errors, "cost", &self.cost, "Cost is required").and_then(|c| {
            let parsed = parse_cost(c);
            if parsed.is_none() {
                errors.add("cost", "Cost must be a valid number");
            }
            parsed
        });
        let shop = required(&mut errors, "shop", &self.shop, "Shop name is required");

        errors.finish(|| ServiceDraft {
            vehicle_id: vehicle_id.unwrap_or_default(),
            service: service.unwrap_or_default().to_string(),
            date: date.unwrap_or_default(),
            mileage: mileage.unwrap_or_default(),
            cost: cost.unwrap_or_default(),
            shop: shop.unwrap_or_default().to_string(),
            notes: self.notes.trim().to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Reminder form
// ---------------------------------------------------------------------------

/// Raw reminder form input. `kind` is "mileage" or "date"; `interval` is a
/// mile count for mileage reminders and a period name for date reminders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderForm {
    pub title: String,
    pub description: String,
    pub vehicle: String,
    pub kind: String,
    pub mileage: String,
    pub date: String,
    pub recurring: bool,
    pub interval: String,
}

impl Default for ReminderForm {
    fn default() -> Self {
        ReminderForm {
            title: String::new(),
            description: String::new(),
            vehicle: String::new(),
            kind: TriggerKind::Mileage.as_str().to_string(),
            mileage: String::new(),
            date: String::new(),
            recurring: false,
            interval: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderDraft {
    pub title: String,
    pub description: String,
    pub vehicle_id: Option<String>,
    pub trigger: Trigger,
}

impl ReminderDraft {
    pub fn into_reminder(self, id: String, enabled: bool) -> Reminder {
        Reminder {
            id,
            title: self.title,
            description: self.description,
            vehicle_id: self.vehicle_id,
            trigger: self.trigger,
            enabled,
        }
    }
}

impl ReminderForm {
    pub fn from_reminder(reminder: &Reminder) -> Self {
        let (kind, mileage, date, interval) = match reminder.trigger {
            Trigger::Mileage { at, every } => (
                TriggerKind::Mileage,
                at.to_string(),
                String::new(),
                every.map(|n| n.to_string()).unwrap_or_default(),
            ),
            Trigger::Date { on, every } => (
                TriggerKind::Date,
                String::new(),
                on.to_string(),
                every.map(|p| p.as_str().to_string()).unwrap_or_default(),
            ),
        };
        ReminderForm {
            title: reminder.title.clone(),
            description: reminder.description.clone(),
            vehicle: reminder.vehicle_id.clone().unwrap_or_default(),
            kind: kind.as_str().to_string(),
            mileage,
            date,
            recurring: reminder.trigger.is_recurring(),
            interval,
        }
    }

    /// The interval is dropped for non-recurring reminders.
    pub fn validate(&self, garage: &Garage) -> Result<ReminderDraft, FieldErrors> {
        self.check(garage, None)
    }

    /// Validate changes to `existing`, keeping its vehicle ID valid even
    /// when that vehicle no longer exists.
    pub fn validate_edit(
        &self,
        garage: &Garage,
        existing: &Reminder,
    ) -> Result<ReminderDraft, FieldErrors> {
        self.check(garage, existing.vehicle_id.as_deref())
    }

    fn check(&self, garage: &Garage, kept: Option<&str>) -> Result<ReminderDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = required(&mut errors, "title", &self.title, "Title is required");
        let vehicle_id =
            optional(&self.vehicle).and_then(|v| resolve_vehicle(garage, &mut errors, &v, kept));

        let kind = TriggerKind::parse(self.kind.trim());
        let interval = if self.recurring {
            required(
                &mut errors,
                "interval",
                &self.interval,
                "Interval is required for recurring reminders",
            )
        } else {
            None
        };

        let trigger = match kind {
            None => {
                errors.add("type", "Reminder type must be 'mileage' or 'date'");
                None
            }
            Some(TriggerKind::Mileage) => {
                let at = required(
                    &mut errors,
                    "mileage",
                    &self.mileage,
                    "Mileage is required for mileage-based reminders",
                )
                .and_then(|m| {
                    let parsed = parse_positive(m);
                    if parsed.is_none() {
                        errors.add("mileage", "Mileage must be a positive number");
                    }
                    parsed
                });
                let every = interval.and_then(|i| {
                    let parsed = parse_positive(i);
                    if parsed.is_none() {
                        errors.add("interval", "Mileage interval must be a positive number");
                    }
                    parsed
                });
                at.map(|at| Trigger::Mileage { at, every })
            }
            Some(TriggerKind::Date) => {
                let on = required(
                    &mut errors,
                    "date",
                    &self.date,
                    "Date is required for date-based reminders",
                )
                .and_then(|d| {
                    let parsed = parse_date(d);
                    if parsed.is_none() {
                        errors.add("date", "Date must be YYYY-MM-DD");
                    }
                    parsed
                });
                let every = interval.and_then(|i| {
                    let parsed = Period::parse(i);
                    if parsed.is_none() {
                        errors.add(
                            "interval",
                            "Interval must be one of: month, quarter, half-year, year",
                        );
                    }
                    parsed
                });
                on.map(|on| Trigger::Date { on, every })
            }
        };

        match trigger {
            Some(trigger) => errors.finish(|| ReminderDraft {
                title: title.unwrap_or_default().to_string(),
                description: self.description.trim().to_string(),
                vehicle_id,
                trigger,
            }),
            None => Err(errors),
        }
    }
}

// ---------------------------------------------------------------------------
// Mileage form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MileageForm {
    pub vehicle: String,
    pub mileage: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MileageDraft {
    pub vehicle_id: String,
    pub date: NaiveDate,
    pub mileage: u32,
}

impl MileageForm {
    /// A new reading must exceed the vehicle's latest known reading.
    pub fn validate(&self, garage: &Garage) -> Result<MileageDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let vehicle_id = required(&mut errors, "vehicle", &self.vehicle, "Please select a vehicle")
            .and_then(|v| resolve_vehicle(garage, &mut errors, v, None));
        let mileage =
            required(&mut errors, "mileage", &self.mileage, "Mileage is required").and_then(|m| {
                let parsed = parse_positive(m);
                if parsed.is_none() {
                    errors.add("mileage", "Mileage must be a positive number");
                }
                parsed
            });
        let date = required(&mut errors, "date", &self.date, "Date is required").and_then(|d| {
            let parsed = parse_date(d);
            if parsed.is_none() {
                errors.add("date", "Date must be YYYY-MM-DD");
            }
            parsed
        });

        if let (Some(vehicle_id), Some(mileage)) = (&vehicle_id, mileage)
            && let Some(last) = garage.current_mileage(vehicle_id)
            && mileage <= last
        {
            errors.add(
                "mileage",
                format!(
                    "New mileage must be greater than the last recorded mileage ({})",
                    last
                ),
            );
        }

        errors.finish(|| MileageDraft {
            vehicle_id: vehicle_id.unwrap_or_default(),
            date: date.unwrap_or_default(),
            mileage: mileage.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed::sample_data;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn garage() -> Garage {
        Garage::from_data(sample_data(), Duration::from_secs(10)).unwrap()
    }

    fn vehicle_form(year: &str) -> VehicleForm {
        VehicleForm {
            name: "Weekend Car".into(),
            make: "Mazda".into(),
            model: "MX-5".into(),
            year: year.into(),
            ..Default::default()
        }
    }

    #[test]
    fn vehicle_year_bounds() {
        assert!(vehicle_form("1900").validate(today()).is_ok());
        assert!(vehicle_form("2025").validate(today()).is_ok());

        let errors = vehicle_form("1899").validate(today()).unwrap_err();
        assert_eq!(errors.get("year"), Some("Year must be between 1900 and 2025"));
        assert!(vehicle_form("2026").validate(today()).is_err());
        assert!(vehicle_form("19a9").validate(today()).is_err());
        assert!(vehicle_form("02019").validate(today()).is_err());
    }

    #[test]
    fn vehicle_required_fields_all_reported() {
        let errors = VehicleForm::default().validate(today()).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["name", "make", "model", "year"]);
    }

    #[test]
    fn vehicle_optional_fields() {
        let mut form = vehicle_form("2020");
        form.license_plate = "  ".into();
        form.vin = "jm1nd".into();
        form.purchase_date = "2020-05-01".into();
        let draft = form.validate(today()).unwrap();
        assert_eq!(draft.license_plate, None);
        assert_eq!(draft.vin.as_deref(), Some("JM1ND"));
        assert_eq!(draft.purchase_date, NaiveDate::from_ymd_opt(2020, 5, 1));

        form.purchase_date = "05/01/2020".into();
        let errors = form.validate(today()).unwrap_err();
        assert!(errors.get("purchase_date").is_some());
    }

    #[test]
    fn vehicle_form_round_trips_existing() {
        let data = sample_data();
        let form = VehicleForm::from_vehicle(&data.vehicles[0]);
        let draft = form.validate(today()).unwrap();
        assert_eq!(draft.into_vehicle("1".into()), data.vehicles[0]);
    }

    fn service_form() -> ServiceForm {
        ServiceForm {
            vehicle: "My Honda Civic".into(),
            service: "Oil Change".into(),
            date: "2024-01-05".into(),
            mileage: "46,000".into(),
            cost: "$45.99".into(),
            shop: "Quick Lube".into(),
            notes: " synthetic ".into(),
        }
    }

    #[test]
    fn service_form_valid() {
        let draft = service_form().validate(&garage()).unwrap();
        assert_eq!(draft.vehicle_id, "1");
        assert_eq!(draft.mileage, 46000);
        assert_eq!(draft.cost, 45.99);
        assert_eq!(draft.notes, "synthetic");
    }

    #[test]
    fn service_form_rules() {
        let g = garage();
        let mut form = service_form();
        form.mileage = "0".into();
        form.cost = "-5".into();
        form.vehicle = "Tractor".into();
        form.shop = String::new();
        let errors = form.validate(&g).unwrap_err();
        assert_eq!(errors.get("mileage"), Some("Mileage must be a positive number"));
        assert_eq!(errors.get("cost"), Some("Cost must be a valid number"));
        assert_eq!(errors.get("vehicle"), Some("Unknown vehicle 'Tractor'"));
        assert_eq!(errors.get("shop"), Some("Shop name is required"));
        assert_eq!(errors.len(), 4);

        form = service_form();
        form.cost = "0".into();
        assert!(form.validate(&g).is_ok());
    }

    fn reminder_form() -> ReminderForm {
        ReminderForm {
            title: "Oil Change".into(),
            mileage: "48000".into(),
            ..Default::default()
        }
    }

    #[test]
    fn reminder_mileage_one_shot() {
        let draft = reminder_form().validate(&garage()).unwrap();
        assert_eq!(
            draft.trigger,
            Trigger::Mileage {
                at: 48000,
                every: None
            }
        );
    }

    #[test]
    fn reminder_non_recurring_drops_interval() {
        let mut form = reminder_form();
        form.interval = "3000".into();
        let draft = form.validate(&garage()).unwrap();
        assert!(!draft.trigger.is_recurring());
    }

    #[test]
    fn reminder_recurring_requires_interval() {
        let mut form = reminder_form();
        form.recurring = true;
        let errors = form.validate(&garage()).unwrap_err();
        assert_eq!(
            errors.get("interval"),
            Some("Interval is required for recurring reminders")
        );

        form.interval = "year".into();
        let errors = form.validate(&garage()).unwrap_err();
        assert_eq!(
            errors.get("interval"),
            Some("Mileage interval must be a positive number")
        );
    }

    #[test]
    fn reminder_date_kind() {
        let form = ReminderForm {
            title: "Inspection".into(),
            kind: "date".into(),
            date: "2024-06-15".into(),
            recurring: true,
            interval: "half-year".into(),
            ..Default::default()
        };
        let draft = form.validate(&garage()).unwrap();
        assert_eq!(
            draft.trigger,
            Trigger::Date {
                on: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
                every: Some(Period::HalfYear)
            }
        );

        let missing = ReminderForm {
            kind: "date".into(),
            ..form
        };
        let missing = ReminderForm {
            date: String::new(),
            ..missing
        };
        let errors = missing.validate(&garage()).unwrap_err();
        assert_eq!(
            errors.get("date"),
            Some("Date is required for date-based reminders")
        );
    }

    #[test]
    fn reminder_unknown_type() {
        let form = ReminderForm {
            kind: "weather".into(),
            ..reminder_form()
        };
        let errors = form.validate(&garage()).unwrap_err();
        assert!(errors.get("type").is_some());
    }

    #[test]
    fn reminder_form_round_trips_existing() {
        let data = sample_data();
        let g = garage();
        for reminder in &data.reminders {
            let draft = ReminderForm::from_reminder(reminder).validate(&g).unwrap();
            assert_eq!(draft.into_reminder(reminder.id.clone(), true), *reminder);
        }
    }

    #[test]
    fn mileage_must_increase() {
        let g = garage();
        let form = MileageForm {
            vehicle: "1".into(),
            mileage: "45289".into(),
            date: "2024-01-10".into(),
        };
        let errors = form.validate(&g).unwrap_err();
        assert_eq!(
            errors.get("mileage"),
            Some("New mileage must be greater than the last recorded mileage (45289)")
        );

        let form = MileageForm {
            mileage: "45290".into(),
            ..form
        };
        let draft = form.validate(&g).unwrap();
        assert_eq!(draft.mileage, 45290);
    }

    #[test]
    fn display_lists_every_field() {
        let errors = VehicleForm::default().validate(today()).unwrap_err();
        let text = errors.to_string();
        assert!(text.starts_with("invalid input (name: Name is required;"));
        assert!(text.contains("year: Year is required"));
    }
}
