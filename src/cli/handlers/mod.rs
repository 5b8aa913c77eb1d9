use std::time::Instant;

use chrono::Datelike;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::cli::session::{Session, run_shell};
use crate::io::{config_io, garage_io};
use crate::model::garage::{Garage, Restored};
use crate::model::reminder::{Reminder, TriggerKind};
use crate::model::service::ServiceRecord;
use crate::model::store::StoreError;
use crate::ops::aggregate::{self, by_month, by_vehicle, mileage_series, summarize, years};
use crate::ops::due::{Upcoming, due_on, scheduled_days, upcoming};
use crate::ops::filter::{DateWindow, ReminderFilter, Selection, ServiceFilter, VehicleFilter};
use crate::ops::overview::overview;
use crate::ops::validate::{MileageForm, ReminderForm, ServiceForm, VehicleForm};
use crate::ops::{OpError, mileage_ops, reminder_ops, service_ops, undo, vehicle_ops};
use crate::util::format::{format_currency, format_date, format_miles, trigger_label};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let mut session = Session::open(cli.config.as_deref(), cli.data.as_deref(), cli.today)?;
    match cli.command {
        Commands::Shell => {
            let failures = run_shell(&mut session, std::io::stdin().lock(), cli.json)?;
            if failures > 0 {
                return Err(format!("{} command(s) failed", failures).into());
            }
            Ok(())
        }
        cmd => execute(&mut session, cmd, cli.json),
    }
}

/// Run one command against the session.
pub fn execute(session: &mut Session, cmd: Commands, json: bool) -> CmdResult {
    match cmd {
        Commands::Overview(args) => cmd_overview(session, args, json),

        // Vehicles
        Commands::Vehicles(args) => cmd_vehicles(session, args, json),
        Commands::Vehicle(args) => cmd_vehicle(session, args, json),
        Commands::VehicleAdd(fields) => cmd_vehicle_add(session, fields, json),
        Commands::VehicleEdit(args) => cmd_vehicle_edit(session, args, json),
        Commands::VehicleDelete(args) => cmd_vehicle_delete(session, args, json),

        // Services
        Commands::Services(args) => cmd_services(session, args, json),
        Commands::Service(args) => cmd_service(session, args, json),
        Commands::ServiceAdd(fields) => cmd_service_add(session, fields, json),
        Commands::ServiceEdit(args) => cmd_service_edit(session, args, json),
        Commands::ServiceDelete(args) => cmd_service_delete(session, args, json),

        // Reminders
        Commands::Reminders(args) => cmd_reminders(session, args, json),
        Commands::ReminderAdd(fields) => cmd_reminder_add(session, fields, json),
        Commands::ReminderEdit(args) => cmd_reminder_edit(session, args, json),
        Commands::ReminderDelete(args) => cmd_reminder_delete(session, args, json),
        Commands::ReminderToggle(args) => cmd_reminder_toggle(session, args, json),
        Commands::ReminderComplete(args) => cmd_reminder_complete(session, args, json),
        Commands::Upcoming(args) => cmd_upcoming(session, args, json),
        Commands::Schedule(args) => cmd_schedule(session, args, json),

        // Mileage
        Commands::Mileage(args) => cmd_mileage(session, args, json),
        Commands::MileageLog(args) => cmd_mileage_log(session, args, json),
        Commands::MileageDelete(args) => cmd_mileage_delete(session, args, json),

        // Session
        Commands::Report(args) => cmd_report(session, args, json),
        Commands::Undo => cmd_undo(session, json),
        Commands::Export => cmd_export(session),
        Commands::Config => cmd_config(session),
        Commands::Shell => Err("already in a shell".into()),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Unwrap an operation result. Validation failures print one
/// `field: message` line each to stderr.
fn checked<T>(result: Result<T, OpError>) -> Result<T, Box<dyn std::error::Error>> {
    match result {
        Ok(value) => Ok(value),
        Err(OpError::Invalid(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("{}: {}", field, message);
            }
            Err("validation failed".into())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Overwrite `target` when a value was given.
fn set(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn resolve_vehicle_id(garage: &Garage, reference: &str) -> Result<String, Box<dyn std::error::Error>> {
    garage
        .resolve_vehicle(reference)
        .map(|v| v.id.clone())
        .ok_or_else(|| format!("vehicle not found: {}", reference).into())
}

fn undo_hint(session: &Session) -> String {
    format!("(undo within {}s)", session.config.undo.window_secs)
}

fn reminder_upcoming<'a, I>(session: &'a Session, reminders: I) -> Vec<Upcoming<'a>>
where
    I: IntoIterator<Item = &'a Reminder>,
{
    let garage = &session.garage;
    upcoming(
        reminders,
        session.today,
        |r| r.vehicle_id.as_deref().and_then(|v| garage.current_mileage(v)),
        &session.thresholds(),
    )
}

fn reminder_vehicle_name<'a>(garage: &'a Garage, reminder: &'a Reminder) -> Option<&'a str> {
    reminder
        .vehicle_id
        .as_deref()
        .map(|id| garage.vehicle_name(id))
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

fn cmd_overview(session: &mut Session, args: OverviewArgs, json: bool) -> CmdResult {
    let session = &*session;
    let garage = &session.garage;
    let vehicle_id = args
        .vehicle
        .as_deref()
        .map(|v| resolve_vehicle_id(garage, v))
        .transpose()?;
    let dashboard = overview(
        garage,
        vehicle_id.as_deref(),
        session.today,
        &session.thresholds(),
    );

    if json {
        return print_json(&overview_to_json(garage, &dashboard));
    }
    print_lines(&format_overview(&dashboard, session.currency()));
    Ok(())
}

// ---------------------------------------------------------------------------
// Vehicle handlers
// ---------------------------------------------------------------------------

fn cmd_vehicles(session: &mut Session, args: VehiclesArgs, json: bool) -> CmdResult {
    let garage = &session.garage;
    let filter = VehicleFilter {
        query: args.search.unwrap_or_default(),
    };
    let vehicles = filter.apply(garage.vehicles.iter());

    if json {
        let out: Vec<VehicleJson> = vehicles.iter().map(|v| vehicle_to_json(garage, v)).collect();
        return print_json(&out);
    }
    if vehicles.is_empty() {
        println!("no vehicles");
    }
    for vehicle in vehicles {
        println!("{}", format_vehicle_line(vehicle, garage.current_mileage(&vehicle.id)));
    }
    Ok(())
}

fn cmd_vehicle(session: &mut Session, args: VehicleArg, json: bool) -> CmdResult {
    let session = &*session;
    let garage = &session.garage;
    let vehicle = garage
        .resolve_vehicle(&args.vehicle)
        .ok_or_else(|| StoreError::NotFound(args.vehicle.clone()))?;
    let current = garage.current_mileage(&vehicle.id);

    let mut services: Vec<_> = garage
        .services
        .iter()
        .filter(|s| s.vehicle_id == vehicle.id)
        .collect();
    services.sort_by(|a, b| b.date.cmp(&a.date));
    let summary = summarize(services.iter().copied());
    let reminders = reminder_upcoming(
        session,
        garage
            .reminders
            .iter()
            .filter(|r| r.vehicle_id.as_deref() == Some(vehicle.id.as_str())),
    );

    if json {
        return print_json(&VehicleDetailJson {
            vehicle: vehicle_to_json(garage, vehicle),
            services: services.iter().map(|s| service_to_json(garage, s)).collect(),
            summary,
            reminders: reminders.iter().map(|r| upcoming_to_json(garage, r)).collect(),
        });
    }

    print_lines(&format_vehicle_detail(vehicle, current));
    println!();
    println!("services:");
    for record in &services {
        println!("  {}", format_service_line(record, &vehicle.name, session.currency()));
    }
    print_lines(&format_cost_summary(&summary, session.currency()));
    if !reminders.is_empty() {
        println!();
        println!("reminders:");
        for item in &reminders {
            println!("  {}", format_upcoming_line(item, None));
        }
    }
    Ok(())
}

fn vehicle_form(fields: VehicleFields, mut form: VehicleForm) -> VehicleForm {
    set(&mut form.name, fields.name);
    set(&mut form.make, fields.make);
    set(&mut form.model, fields.model);
    set(&mut form.year, fields.year);
    set(&mut form.license_plate, fields.plate);
    set(&mut form.vin, fields.vin);
    set(&mut form.purchase_date, fields.purchased);
    form
}

fn cmd_vehicle_add(session: &mut Session, fields: VehicleFields, json: bool) -> CmdResult {
    let form = vehicle_form(fields, VehicleForm::default());
    let vehicle = checked(vehicle_ops::add_vehicle(&mut session.garage, &form, session.today))?;
    if json {
        return print_json(&vehicle);
    }
    println!("added vehicle {}: {}", vehicle.id, vehicle.name);
    Ok(())
}

fn cmd_vehicle_edit(session: &mut Session, args: VehicleEditArgs, json: bool) -> CmdResult {
    let existing = session
        .garage
        .resolve_vehicle(&args.vehicle)
        .ok_or_else(|| StoreError::NotFound(args.vehicle.clone()))?;
    let id = existing.id.clone();
    let form = vehicle_form(args.fields, VehicleForm::from_vehicle(existing));
    let vehicle = checked(vehicle_ops::edit_vehicle(
        &mut session.garage,
        &id,
        &form,
        session.today,
    ))?;
    if json {
        return print_json(&vehicle);
    }
    println!("updated vehicle {}: {}", vehicle.id, vehicle.name);
    Ok(())
}

fn cmd_vehicle_delete(session: &mut Session, args: VehicleArg, json: bool) -> CmdResult {
    let id = session
        .garage
        .resolve_vehicle(&args.vehicle)
        .map(|v| v.id.clone())
        .ok_or_else(|| StoreError::NotFound(args.vehicle.clone()))?;
    let vehicle = checked(vehicle_ops::delete_vehicle(
        &mut session.garage,
        &id,
        Instant::now(),
    ))?;
    if json {
        return print_json(&vehicle);
    }
    println!("deleted vehicle {}: {} {}", vehicle.id, vehicle.name, undo_hint(session));
    Ok(())
}

// ---------------------------------------------------------------------------
// Service handlers
// ---------------------------------------------------------------------------

fn cmd_services(session: &mut Session, args: ServicesArgs, json: bool) -> CmdResult {
    let garage = &session.garage;
    let vehicle = match args.vehicle.as_deref().map(Selection::parse) {
        None | Some(Selection::All) => Selection::All,
        Some(Selection::Only(reference)) => Selection::Only(resolve_vehicle_id(garage, &reference)?),
    };
    let window = DateWindow::parse(&args.range).ok_or_else(|| {
        format!(
            "unknown range '{}' (expected: all, last-month, last-3-months, last-year)",
            args.range
        )
    })?;
    let filter = ServiceFilter {
        query: args.search.unwrap_or_default(),
        vehicle,
        service: args.service.as_deref().map(Selection::parse).unwrap_or_default(),
        window,
    };
    let records = filter.apply(garage.services.iter(), session.today);
    let summary = args.analysis.then(|| summarize(records.iter().copied()));

    if json {
        return print_json(&ServiceListJson {
            services: records.iter().map(|r| service_to_json(garage, r)).collect(),
            summary,
        });
    }
    if records.is_empty() {
        println!("no service records");
    }
    for record in &records {
        println!(
            "{}",
            format_service_line(record, garage.vehicle_name(&record.vehicle_id), session.currency())
        );
    }
    if let Some(summary) = summary {
        println!();
        print_lines(&format_cost_summary(&summary, session.currency()));
        if filter.vehicle == Selection::All {
            for (vehicle_id, total) in by_vehicle(records.iter().copied()) {
                println!(
                    "  {}: {}",
                    garage.vehicle_name(&vehicle_id),
                    format_currency(session.currency(), total)
                );
            }
        }
    }
    Ok(())
}

fn cmd_service(session: &mut Session, args: IdArg, json: bool) -> CmdResult {
    let garage = &session.garage;
    let record = garage
        .services
        .get(&args.id)
        .ok_or_else(|| StoreError::NotFound(args.id.clone()))?;
    if json {
        return print_json(&service_to_json(garage, record));
    }
    print_lines(&format_service_detail(
        record,
        garage.vehicle_name(&record.vehicle_id),
        session.currency(),
    ));
    Ok(())
}

fn service_form(fields: ServiceFields, mut form: ServiceForm) -> ServiceForm {
    set(&mut form.vehicle, fields.vehicle);
    set(&mut form.service, fields.service);
    set(&mut form.date, fields.date);
    set(&mut form.mileage, fields.mileage);
    set(&mut form.cost, fields.cost);
    set(&mut form.shop, fields.shop);
    set(&mut form.notes, fields.notes);
    form
}

fn cmd_service_add(session: &mut Session, fields: ServiceFields, json: bool) -> CmdResult {
    let prefill = ServiceForm {
        date: session.today.to_string(),
        ..ServiceForm::default()
    };
    let form = service_form(fields, prefill);
    let record = checked(service_ops::add_service(&mut session.garage, &form))?;
    if json {
        return print_json(&service_to_json(&session.garage, &record));
    }
    println!(
        "added service {}: {} for {} ({})",
        record.id,
        record.service,
        session.garage.vehicle_name(&record.vehicle_id),
        format_currency(session.currency(), record.cost)
    );
    Ok(())
}

fn cmd_service_edit(session: &mut Session, args: ServiceEditArgs, json: bool) -> CmdResult {
    let existing = session
        .garage
        .services
        .get(&args.id)
        .ok_or_else(|| StoreError::NotFound(args.id.clone()))?;
    let form = service_form(args.fields, ServiceForm::from_record(existing));
    let record = checked(service_ops::edit_service(&mut session.garage, &args.id, &form))?;
    if json {
        return print_json(&service_to_json(&session.garage, &record));
    }
    println!("updated service {}: {}", record.id, record.service);
    Ok(())
}

fn cmd_service_delete(session: &mut Session, args: IdArg, json: bool) -> CmdResult {
    let record = checked(service_ops::delete_service(
        &mut session.garage,
        &args.id,
        Instant::now(),
    ))?;
    if json {
        return print_json(&record);
    }
    println!("deleted service {}: {} {}", record.id, record.service, undo_hint(session));
    Ok(())
}

// ---------------------------------------------------------------------------
// Reminder handlers
// ---------------------------------------------------------------------------

fn parse_kind(kind: Option<&str>) -> Result<Option<TriggerKind>, Box<dyn std::error::Error>> {
    match kind {
        None => Ok(None),
        Some(k) => match TriggerKind::parse(k) {
            Some(kind) => Ok(Some(kind)),
            None => Err(format!("unknown reminder type '{}' (expected: mileage, date)", k).into()),
        },
    }
}

fn cmd_reminders(session: &mut Session, args: RemindersArgs, json: bool) -> CmdResult {
    let garage = &session.garage;
    let filter = ReminderFilter {
        enabled_only: args.enabled,
        kind: parse_kind(args.kind.as_deref())?,
    };
    let reminders = filter.apply(garage.reminders.iter());

    if json {
        let out: Vec<ReminderJson> = reminders.iter().map(|r| reminder_to_json(garage, r)).collect();
        return print_json(&out);
    }
    if reminders.is_empty() {
        println!("no reminders");
    }
    for reminder in reminders {
        println!(
            "{}",
            format_reminder_line(reminder, reminder_vehicle_name(garage, reminder))
        );
    }
    Ok(())
}

fn reminder_form(fields: ReminderFields, mut form: ReminderForm) -> ReminderForm {
    set(&mut form.title, fields.title);
    set(&mut form.description, fields.description);
    set(&mut form.vehicle, fields.vehicle);
    set(&mut form.kind, fields.kind);
    set(&mut form.mileage, fields.mileage);
    set(&mut form.date, fields.date);
    if fields.once {
        form.recurring = false;
        form.interval.clear();
    }
    if fields.recurring {
        form.recurring = true;
    }
    if let Some(every) = fields.every {
        form.recurring = true;
        form.interval = every;
    }
    form
}

fn print_reminder(session: &Session, verb: &str, reminder: &Reminder, json: bool) -> CmdResult {
    if json {
        return print_json(&reminder_to_json(&session.garage, reminder));
    }
    println!(
        "{} reminder {}: {} - {}",
        verb,
        reminder.id,
        reminder.title,
        trigger_label(&reminder.trigger)
    );
    Ok(())
}

fn cmd_reminder_add(session: &mut Session, fields: ReminderFields, json: bool) -> CmdResult {
    let form = reminder_form(fields, ReminderForm::default());
    let reminder = checked(reminder_ops::add_reminder(&mut session.garage, &form))?;
    print_reminder(session, "added", &reminder, json)
}

fn cmd_reminder_edit(session: &mut Session, args: ReminderEditArgs, json: bool) -> CmdResult {
    let existing = session
        .garage
        .reminders
        .get(&args.id)
        .ok_or_else(|| StoreError::NotFound(args.id.clone()))?;
    let form = reminder_form(args.fields, ReminderForm::from_reminder(existing));
    let reminder = checked(reminder_ops::edit_reminder(&mut session.garage, &args.id, &form))?;
    print_reminder(session, "updated", &reminder, json)
}

fn cmd_reminder_delete(session: &mut Session, args: IdArg, json: bool) -> CmdResult {
    let reminder = checked(reminder_ops::delete_reminder(
        &mut session.garage,
        &args.id,
        Instant::now(),
    ))?;
    if json {
        return print_json(&reminder);
    }
    println!("deleted reminder {}: {} {}", reminder.id, reminder.title, undo_hint(session));
    Ok(())
}

fn cmd_reminder_toggle(session: &mut Session, args: ToggleArgs, json: bool) -> CmdResult {
    let enabled = args.state == Switch::On;
    let reminder = checked(reminder_ops::set_enabled(&mut session.garage, &args.id, enabled))?;
    let verb = if enabled { "enabled" } else { "disabled" };
    print_reminder(session, verb, &reminder, json)
}

fn cmd_reminder_complete(session: &mut Session, args: IdArg, json: bool) -> CmdResult {
    let completion = checked(reminder_ops::complete_reminder(&mut session.garage, &args.id))?;
    let verb = match completion {
        reminder_ops::Completion::Rescheduled(_) => "rescheduled",
        reminder_ops::Completion::Disabled(_) => "completed and disabled",
    };
    print_reminder(session, verb, completion.reminder(), json)
}

fn cmd_upcoming(session: &mut Session, args: UpcomingArgs, json: bool) -> CmdResult {
    let session = &*session;
    let garage = &session.garage;
    let vehicle_id = args
        .vehicle
        .as_deref()
        .map(|v| resolve_vehicle_id(garage, v))
        .transpose()?;
    let items = reminder_upcoming(
        session,
        garage.reminders.iter().filter(|r| {
            vehicle_id
                .as_deref()
                .is_none_or(|v| r.vehicle_id.as_deref() == Some(v))
        }),
    );

    if json {
        let out: Vec<UpcomingJson> = items.iter().map(|i| upcoming_to_json(garage, i)).collect();
        return print_json(&out);
    }
    if items.is_empty() {
        println!("no enabled reminders");
    }
    for item in &items {
        println!(
            "{}",
            format_upcoming_line(item, reminder_vehicle_name(garage, item.reminder))
        );
    }
    Ok(())
}

fn cmd_schedule(session: &mut Session, args: ScheduleArgs, json: bool) -> CmdResult {
    let garage = &session.garage;
    let date = args.on.unwrap_or(session.today);
    let reminders = due_on(garage.reminders.iter(), date);
    let days = scheduled_days(garage.reminders.iter(), date.year(), date.month());

    if json {
        return print_json(&ScheduleJson {
            date,
            reminders: reminders.iter().map(|r| reminder_to_json(garage, r)).collect(),
            scheduled_days: days,
        });
    }
    if reminders.is_empty() {
        println!("nothing scheduled on {}", format_date(date));
    } else {
        println!("{}:", format_date(date));
        for reminder in &reminders {
            println!(
                "  {}",
                format_reminder_line(reminder, reminder_vehicle_name(garage, reminder))
            );
        }
    }
    if !days.is_empty() {
        let listed: Vec<String> = days.iter().map(|d| format_date(*d)).collect();
        println!("scheduled this month: {}", listed.join("; "));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Mileage handlers
// ---------------------------------------------------------------------------

fn cmd_mileage(session: &mut Session, args: MileageArgs, json: bool) -> CmdResult {
    let garage = &session.garage;
    let vehicle = garage
        .resolve_vehicle(&args.vehicle)
        .ok_or_else(|| StoreError::NotFound(args.vehicle.clone()))?;
    let entries = mileage_series(garage.mileage.iter(), &vehicle.id);
    let current = garage.current_mileage(&vehicle.id);

    if json {
        return print_json(&MileageJson {
            vehicle_id: &vehicle.id,
            vehicle_name: &vehicle.name,
            current_mileage: current,
            entries,
        });
    }
    println!("{} ({})", vehicle.name, vehicle.id);
    let mut previous = None;
    for entry in &entries {
        println!("  {}", format_mileage_line(entry, previous));
        previous = Some(entry.mileage);
    }
    match current {
        Some(miles) => println!("current: {} miles", format_miles(miles)),
        None => println!("no mileage recorded"),
    }
    Ok(())
}

fn cmd_mileage_log(session: &mut Session, args: MileageLogArgs, json: bool) -> CmdResult {
    let form = MileageForm {
        vehicle: args.vehicle,
        mileage: args.miles,
        date: args.date.unwrap_or_else(|| session.today.to_string()),
    };
    let entry = checked(mileage_ops::log_mileage(&mut session.garage, &form))?;
    if json {
        return print_json(&entry);
    }
    println!(
        "logged {} miles for {} (entry {})",
        format_miles(entry.mileage),
        session.garage.vehicle_name(&entry.vehicle_id),
        entry.id
    );
    Ok(())
}

fn cmd_mileage_delete(session: &mut Session, args: IdArg, json: bool) -> CmdResult {
    let entry = checked(mileage_ops::delete_entry(
        &mut session.garage,
        &args.id,
        Instant::now(),
    ))?;
    if json {
        return print_json(&entry);
    }
    println!(
        "deleted mileage entry {}: {} miles {}",
        entry.id,
        format_miles(entry.mileage),
        undo_hint(session)
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Session handlers
// ---------------------------------------------------------------------------

fn cmd_report(session: &mut Session, args: ReportArgs, json: bool) -> CmdResult {
    let garage = &session.garage;
    let vehicle_id = args
        .vehicle
        .as_deref()
        .map(|v| resolve_vehicle_id(garage, v))
        .transpose()?;
    let records: Vec<&ServiceRecord> = garage
        .services
        .iter()
        .filter(|s| vehicle_id.as_deref().is_none_or(|v| s.vehicle_id == v))
        .collect();
    let years = years(records.iter().copied());
    let year = args.year.or_else(|| years.first().copied());
    let monthly = year
        .map(|y| by_month(records.iter().copied(), y))
        .unwrap_or_default();
    let summary = summarize(records.iter().copied());
    let per_vehicle = by_vehicle(records.iter().copied());

    if json {
        return print_json(&ReportJson {
            vehicle_id: vehicle_id.as_deref(),
            year,
            years,
            monthly,
            by_vehicle: per_vehicle
                .iter()
                .map(|(id, total)| VehicleTotalJson {
                    vehicle_id: id,
                    vehicle_name: garage.vehicle_name(id),
                    total: *total,
                })
                .collect(),
            summary,
        });
    }

    if let Some(id) = &vehicle_id {
        println!("{} ({})", garage.vehicle_name(id), id);
        println!();
    }
    let currency = session.currency();
    if let Some(year) = year {
        println!("Monthly costs {}:", year);
        let max = monthly.iter().map(|m| m.total).fold(0.0, f64::max);
        for month in &monthly {
            println!("{}", format_month_line(month, currency, max));
        }
        println!();
    }
    println!("By category:");
    print_lines(&format_cost_summary(&summary, currency));
    if vehicle_id.is_some() {
        return Ok(());
    }
    println!();
    println!("By vehicle:");
    for (id, total) in &per_vehicle {
        println!(
            "  {}  {}  {}",
            garage.vehicle_name(id),
            format_currency(currency, *total),
            share_bar(aggregate::share(*total, summary.total))
        );
    }
    Ok(())
}

fn cmd_undo(session: &mut Session, json: bool) -> CmdResult {
    let restored = checked(undo::undo_last(&mut session.garage, Instant::now()))?;
    if json {
        return match &restored {
            Restored::Vehicle(v) => print_json(v),
            Restored::Service(s) => print_json(s),
            Restored::Reminder(r) => print_json(r),
            Restored::Mileage(m) => print_json(m),
        };
    }
    let what = match &restored {
        Restored::Vehicle(v) => format!("vehicle {}: {}", v.id, v.name),
        Restored::Service(s) => format!("service {}: {}", s.id, s.service),
        Restored::Reminder(r) => format!("reminder {}: {}", r.id, r.title),
        Restored::Mileage(m) => format!("mileage entry {}", m.id),
    };
    println!("restored {}", what);
    Ok(())
}

fn cmd_export(session: &mut Session) -> CmdResult {
    println!("{}", garage_io::export_json(&session.garage)?);
    Ok(())
}

fn cmd_config(session: &mut Session) -> CmdResult {
    print!("{}", config_io::config_to_toml(&session.config)?);
    Ok(())
}
