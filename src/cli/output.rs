use chrono::NaiveDate;
use serde::Serialize;

use crate::model::garage::Garage;
use crate::model::mileage::MileageEntry;
use crate::model::reminder::Reminder;
use crate::model::service::ServiceRecord;
use crate::model::vehicle::Vehicle;
use crate::ops::aggregate::{CostSummary, MonthTotal};
use crate::ops::due::{DueState, Upcoming};
use crate::ops::overview::Overview;
use crate::util::format::{
    days_phrase, format_currency, format_date, format_miles, format_percent, miles_phrase,
    trigger_label,
};
use crate::util::unicode::{pad_left_to_width, pad_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct VehicleJson<'a> {
    #[serde(flatten)]
    pub vehicle: &'a Vehicle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_mileage: Option<u32>,
}

#[derive(Serialize)]
pub struct ServiceJson<'a> {
    #[serde(flatten)]
    pub record: &'a ServiceRecord,
    pub vehicle_name: &'a str,
}

#[derive(Serialize)]
pub struct ServiceListJson<'a> {
    pub services: Vec<ServiceJson<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<CostSummary>,
}

#[derive(Serialize)]
pub struct ReminderJson<'a> {
    #[serde(flatten)]
    pub reminder: &'a Reminder,
    pub schedule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_name: Option<&'a str>,
}

#[derive(Serialize)]
pub struct UpcomingJson<'a> {
    #[serde(flatten)]
    pub reminder: ReminderJson<'a>,
    pub state: DueState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_left: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miles_left: Option<i64>,
}

#[derive(Serialize)]
pub struct VehicleDetailJson<'a> {
    #[serde(flatten)]
    pub vehicle: VehicleJson<'a>,
    pub services: Vec<ServiceJson<'a>>,
    pub summary: CostSummary,
    pub reminders: Vec<UpcomingJson<'a>>,
}

#[derive(Serialize)]
pub struct VehicleTotalJson<'a> {
    pub vehicle_id: &'a str,
    pub vehicle_name: &'a str,
    pub total: f64,
}

#[derive(Serialize)]
pub struct ReportJson<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub years: Vec<i32>,
    pub monthly: Vec<MonthTotal>,
    pub summary: CostSummary,
    pub by_vehicle: Vec<VehicleTotalJson<'a>>,
}

#[derive(Serialize)]
pub struct MileageJson<'a> {
    pub vehicle_id: &'a str,
    pub vehicle_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_mileage: Option<u32>,
    pub entries: Vec<&'a MileageEntry>,
}

#[derive(Serialize)]
pub struct OverviewJson<'a> {
    pub services: usize,
    pub total_cost: f64,
    pub vehicles: Vec<VehicleJson<'a>>,
    pub overdue: usize,
    pub due_soon: usize,
    pub scheduled: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<UpcomingJson<'a>>,
}

#[derive(Serialize)]
pub struct ScheduleJson<'a> {
    pub date: NaiveDate,
    pub reminders: Vec<ReminderJson<'a>>,
    /// Days of the same month with something scheduled
    pub scheduled_days: Vec<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn vehicle_to_json<'a>(garage: &Garage, vehicle: &'a Vehicle) -> VehicleJson<'a> {
    VehicleJson {
        vehicle,
        current_mileage: garage.current_mileage(&vehicle.id),
    }
}

pub fn service_to_json<'a>(garage: &'a Garage, record: &'a ServiceRecord) -> ServiceJson<'a> {
    ServiceJson {
        record,
        vehicle_name: garage.vehicle_name(&record.vehicle_id),
    }
}

pub fn reminder_to_json<'a>(garage: &'a Garage, reminder: &'a Reminder) -> ReminderJson<'a> {
    ReminderJson {
        reminder,
        schedule: trigger_label(&reminder.trigger),
        vehicle_name: reminder
            .vehicle_id
            .as_deref()
            .map(|id| garage.vehicle_name(id)),
    }
}

pub fn upcoming_to_json<'a>(garage: &'a Garage, item: &Upcoming<'a>) -> UpcomingJson<'a> {
    UpcomingJson {
        reminder: reminder_to_json(garage, item.reminder),
        state: item.state,
        days_left: item.days_left,
        miles_left: item.miles_left,
    }
}

pub fn overview_to_json<'a>(garage: &'a Garage, overview: &Overview<'a>) -> OverviewJson<'a> {
    OverviewJson {
        services: overview.summary.count,
        total_cost: overview.summary.total,
        vehicles: overview
            .mileage
            .iter()
            .map(|(vehicle, current)| VehicleJson {
                vehicle: *vehicle,
                current_mileage: *current,
            })
            .collect(),
        overdue: overview.count(DueState::Overdue),
        due_soon: overview.count(DueState::DueSoon),
        scheduled: overview.count(DueState::Scheduled),
        next: overview.next().map(|item| upcoming_to_json(garage, item)),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

const BAR_WIDTH: usize = 20;

/// Horizontal bar for a percentage share, `BAR_WIDTH` cells at 100%.
pub fn share_bar(share: f64) -> String {
    let filled = ((share.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "·".repeat(BAR_WIDTH - filled))
}

pub fn format_vehicle_line(vehicle: &Vehicle, current_mileage: Option<u32>) -> String {
    let plate = vehicle.license_plate.as_deref().unwrap_or("-");
    let miles = current_mileage
        .map(|m| format!("{} mi", format_miles(m)))
        .unwrap_or_default();
    format!(
        "{}  {}  {}  {}  {}",
        pad_to_width(&vehicle.id, 3),
        pad_to_width(&vehicle.name, 18),
        pad_to_width(&vehicle.description(), 22),
        pad_to_width(plate, 10),
        miles
    )
    .trim_end()
    .to_string()
}

pub fn format_vehicle_detail(vehicle: &Vehicle, current_mileage: Option<u32>) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", vehicle.name, vehicle.id)];
    lines.push(vehicle.description());
    if let Some(plate) = &vehicle.license_plate {
        lines.push(format!("plate: {}", plate));
    }
    if let Some(vin) = &vehicle.vin {
        lines.push(format!("vin: {}", vin));
    }
    if let Some(date) = vehicle.purchase_date {
        lines.push(format!("purchased: {}", format_date(date)));
    }
    if let Some(miles) = current_mileage {
        lines.push(format!("mileage: {}", format_miles(miles)));
    }
    lines
}

pub fn format_service_line(record: &ServiceRecord, vehicle_name: &str, currency: &str) -> String {
    format!(
        "{}  {}  {}  {}  {}  {}  {}",
        pad_to_width(&record.id, 3),
        pad_to_width(&format_date(record.date), 12),
        pad_to_width(&record.service, 22),
        pad_to_width(vehicle_name, 16),
        pad_left_to_width(&format!("{} mi", format_miles(record.mileage)), 10),
        pad_left_to_width(&format_currency(currency, record.cost), 10),
        record.shop
    )
}

pub fn format_service_detail(record: &ServiceRecord, vehicle_name: &str, currency: &str) -> Vec<String> {
    let mut lines = vec![
        format!("{} ({})", record.service, record.id),
        format!("vehicle: {}", vehicle_name),
        format!("date: {}", format_date(record.date)),
        format!("mileage: {}", format_miles(record.mileage)),
        format!("cost: {}", format_currency(currency, record.cost)),
        format!("shop: {}", record.shop),
    ];
    if !record.notes.is_empty() {
        lines.push("notes:".to_string());
        for line in record.notes.lines() {
            lines.push(format!("  {}", line));
        }
    }
    lines
}

/// Total line plus one line per category with its share of the total.
pub fn format_cost_summary(summary: &CostSummary, currency: &str) -> Vec<String> {
    let noun = if summary.count == 1 { "service" } else { "services" };
    let mut lines = vec![format!(
        "Total: {} ({} {})",
        format_currency(currency, summary.total),
        summary.count,
        noun
    )];
    for (category, cost, share) in summary.shares() {
        lines.push(format!(
            "  {}  {}  {}  {}",
            pad_to_width(category, 22),
            pad_left_to_width(&format_currency(currency, cost), 10),
            share_bar(share),
            pad_left_to_width(&format_percent(share), 6)
        ));
    }
    lines
}

pub fn format_month_line(month: &MonthTotal, currency: &str, max: f64) -> String {
    let share = if max > 0.0 { month.total / max * 100.0 } else { 0.0 };
    format!(
        "  {}  {}  {}",
        month.label,
        pad_left_to_width(&format_currency(currency, month.total), 10),
        share_bar(share)
    )
}

pub fn format_reminder_line(reminder: &Reminder, vehicle_name: Option<&str>) -> String {
    let check = if reminder.enabled { 'x' } else { ' ' };
    let scope = vehicle_name.unwrap_or("all vehicles");
    format!(
        "[{}] {}  {}  {}  {}",
        check,
        pad_to_width(&reminder.id, 3),
        pad_to_width(&reminder.title, 20),
        pad_to_width(&trigger_label(&reminder.trigger), 40),
        scope
    )
}

/// How far off the trigger is, in days or miles.
fn distance_phrase(item: &Upcoming<'_>) -> String {
    match (item.days_left, item.miles_left) {
        (Some(days), _) => days_phrase(days),
        (None, Some(miles)) => miles_phrase(miles),
        (None, None) => "no mileage recorded".to_string(),
    }
}

pub fn format_upcoming_line(item: &Upcoming<'_>, vehicle_name: Option<&str>) -> String {
    let distance = distance_phrase(item);
    let scope = vehicle_name
        .map(|n| format!("  [{}]", n))
        .unwrap_or_default();
    format!(
        "{}  {}  {}  {}{}",
        pad_to_width(item.state.label(), 9),
        pad_to_width(&item.reminder.id, 3),
        pad_to_width(&item.reminder.title, 20),
        distance,
        scope
    )
}

pub fn format_overview(overview: &Overview<'_>, currency: &str) -> Vec<String> {
    let mut lines = vec![
        format!("Services:  {}", overview.summary.count),
        format!("Expenses:  {}", format_currency(currency, overview.summary.total)),
        format!(
            "Upcoming:  {} ({} overdue, {} due soon)",
            overview.upcoming.len(),
            overview.count(DueState::Overdue),
            overview.count(DueState::DueSoon)
        ),
    ];
    if let Some(next) = overview.next() {
        lines.push(format!(
            "Next:      {} - {}",
            next.reminder.title,
            distance_phrase(next)
        ));
    }
    lines.push("Mileage:".to_string());
    for (vehicle, current) in &overview.mileage {
        let miles = current
            .map(|m| format!("{} mi", format_miles(m)))
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!("  {}  {}", pad_to_width(&vehicle.name, 18), miles));
    }
    lines
}

pub fn format_mileage_line(entry: &MileageEntry, previous: Option<u32>) -> String {
    let delta = previous
        .map(|p| format!("  (+{})", format_miles(entry.mileage.saturating_sub(p))))
        .unwrap_or_default();
    format!(
        "{}  {}  {}{}",
        pad_to_width(&entry.id, 3),
        pad_to_width(&format_date(entry.date), 12),
        pad_left_to_width(&format_miles(entry.mileage), 9),
        delta
    )
}
