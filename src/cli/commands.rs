use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "pit", about = concat!("pitstop v", env!("CARGO_PKG_VERSION"), " - vehicle maintenance tracker"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Config file (default: $PITSTOP_CONFIG, then ./pitstop.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seed the session from a JSON file instead of the sample garage
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// One line of `pit shell` input
#[derive(Parser)]
#[command(name = "pit", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Dashboard: service count, expenses, mileage and reminders at a glance
    Overview(OverviewArgs),

    /// List vehicles
    Vehicles(VehiclesArgs),
    /// Show a vehicle with its history, costs and reminders
    Vehicle(VehicleArg),
    /// Add a vehicle
    VehicleAdd(VehicleFields),
    /// Edit a vehicle; omitted fields keep their value
    VehicleEdit(VehicleEditArgs),
    /// Delete a vehicle
    VehicleDelete(VehicleArg),

    /// List service records
    Services(ServicesArgs),
    /// Show a service record
    Service(IdArg),
    /// Log a completed service
    ServiceAdd(ServiceFields),
    /// Edit a service record; omitted fields keep their value
    ServiceEdit(ServiceEditArgs),
    /// Delete a service record
    ServiceDelete(IdArg),

    /// List reminders
    Reminders(RemindersArgs),
    /// Add a reminder
    ReminderAdd(ReminderFields),
    /// Edit a reminder; omitted fields keep their value
    ReminderEdit(ReminderEditArgs),
    /// Delete a reminder
    ReminderDelete(IdArg),
    /// Turn a reminder on or off
    ReminderToggle(ToggleArgs),
    /// Mark a reminder done: recurring ones move forward, others turn off
    ReminderComplete(IdArg),
    /// Enabled reminders by urgency
    Upcoming(UpcomingArgs),
    /// Date reminders falling on one day, and the month's scheduled days
    Schedule(ScheduleArgs),

    /// Show a vehicle's odometer history
    Mileage(MileageArgs),
    /// Record an odometer reading
    MileageLog(MileageLogArgs),
    /// Delete an odometer reading
    MileageDelete(IdArg),

    /// Cost report: monthly, by category, by vehicle
    Report(ReportArgs),
    /// Restore the most recent deletion
    Undo,
    /// Print the session data as JSON
    Export,
    /// Read commands from stdin against one session
    Shell,
    /// Print the effective configuration
    Config,
}

// ---------------------------------------------------------------------------
// Shared args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IdArg {
    /// Record ID
    pub id: String,
}

#[derive(Args)]
pub struct OverviewArgs {
    /// Only this vehicle (ID or name)
    #[arg(long)]
    pub vehicle: Option<String>,
}

// ---------------------------------------------------------------------------
// Vehicle args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct VehiclesArgs {
    /// Match name, make, model or license plate
    #[arg(long, short)]
    pub search: Option<String>,
}

#[derive(Args, Default)]
pub struct VehicleFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub make: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
    /// License plate
    #[arg(long)]
    pub plate: Option<String>,
    #[arg(long)]
    pub vin: Option<String>,
    /// Purchase date (YYYY-MM-DD)
    #[arg(long)]
    pub purchased: Option<String>,
}

/// A vehicle by ID or name
#[derive(Args)]
pub struct VehicleArg {
    /// Vehicle ID or name
    pub vehicle: String,
}

#[derive(Args)]
pub struct VehicleEditArgs {
    /// Vehicle ID or name
    pub vehicle: String,
    #[command(flatten)]
    pub fields: VehicleFields,
}

// ---------------------------------------------------------------------------
// Service args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ServicesArgs {
    /// Match service type, shop or notes
    #[arg(long, short)]
    pub search: Option<String>,
    /// Vehicle ID or name ("all" for every vehicle)
    #[arg(long)]
    pub vehicle: Option<String>,
    /// Service type ("all" for every type)
    #[arg(long)]
    pub service: Option<String>,
    /// Date range: all, last-month, last-3-months, last-year
    #[arg(long, default_value = "all")]
    pub range: String,
    /// Also show cost analysis for the listed records
    #[arg(long)]
    pub analysis: bool,
}

#[derive(Args, Default)]
pub struct ServiceFields {
    /// Vehicle ID or name
    #[arg(long)]
    pub vehicle: Option<String>,
    /// Service type, e.g. "Oil Change"
    #[arg(long)]
    pub service: Option<String>,
    /// Service date (YYYY-MM-DD, default today on add)
    #[arg(long)]
    pub date: Option<String>,
    /// Odometer reading
    #[arg(long)]
    pub mileage: Option<String>,
    #[arg(long)]
    pub cost: Option<String>,
    #[arg(long)]
    pub shop: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct ServiceEditArgs {
    /// Service record ID
    pub id: String,
    #[command(flatten)]
    pub fields: ServiceFields,
}

// ---------------------------------------------------------------------------
// Reminder args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RemindersArgs {
    /// Only enabled reminders
    #[arg(long)]
    pub enabled: bool,
    /// Only reminders of this type (mileage, date)
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,
}

#[derive(Args, Default)]
pub struct ReminderFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Vehicle ID or name; omit for a garage-wide reminder
    #[arg(long)]
    pub vehicle: Option<String>,
    /// Trigger type: mileage or date
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,
    /// Odometer reading that triggers a mileage reminder
    #[arg(long)]
    pub mileage: Option<String>,
    /// Date that triggers a date reminder (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
    /// Repeat interval: miles, or month / quarter / half-year / year
    #[arg(long)]
    pub every: Option<String>,
    /// Mark as recurring (requires --every)
    #[arg(long, conflicts_with = "once")]
    pub recurring: bool,
    /// Make a recurring reminder one-shot
    #[arg(long)]
    pub once: bool,
}

#[derive(Args)]
pub struct ReminderEditArgs {
    /// Reminder ID
    pub id: String,
    #[command(flatten)]
    pub fields: ReminderFields,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Reminder ID
    pub id: String,
    pub state: Switch,
}

#[derive(Args)]
pub struct UpcomingArgs {
    /// Only reminders for this vehicle (ID or name)
    #[arg(long)]
    pub vehicle: Option<String>,
}

#[derive(Args)]
pub struct ScheduleArgs {
    /// Day to show (YYYY-MM-DD, default today)
    #[arg(long, value_name = "DATE")]
    pub on: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Mileage and report args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct MileageArgs {
    /// Vehicle ID or name
    pub vehicle: String,
}

#[derive(Args)]
pub struct MileageLogArgs {
    /// Vehicle ID or name
    pub vehicle: String,
    /// Odometer reading
    pub miles: String,
    /// Reading date (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Year for the monthly breakdown (default: latest year with services)
    #[arg(long)]
    pub year: Option<i32>,
    /// Only this vehicle's services (ID or name)
    #[arg(long)]
    pub vehicle: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
        ShellLine::command().debug_assert();
    }

    #[test]
    fn shell_line_parses_without_binary_name() {
        let line = ShellLine::try_parse_from(["vehicle-delete", "Family SUV"]).unwrap();
        assert!(
            matches!(line.command, Commands::VehicleDelete(VehicleArg { ref vehicle }) if vehicle == "Family SUV")
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pit", "upcoming", "--today", "2024-01-10", "-vv"]).unwrap();
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn schedule_parses_date() {
        let cli = Cli::try_parse_from(["pit", "schedule", "--on", "2024-04-10"]).unwrap();
        let Commands::Schedule(args) = cli.command else {
            panic!("expected schedule");
        };
        assert_eq!(args.on, NaiveDate::from_ymd_opt(2024, 4, 10));
        assert!(Cli::try_parse_from(["pit", "schedule", "--on", "April 10"]).is_err());
    }

    #[test]
    fn recurring_conflicts_with_once() {
        let result = Cli::try_parse_from(["pit", "reminder-add", "--recurring", "--once"]);
        assert!(result.is_err());
    }
}
