mod chart;
mod table;
mod tui;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use parklog_core::model::{Condition, RequestStatus, Urgency};
use parklog_core::{
    expand_prefix, parse_date, parse_month, AggregationEngine, Clock, Config, CsvSink, FileRecordStore, FuelLog,
    Identified, Inspection, MaintenanceRequest, OverviewService, RecordStore, ReportFilter, ReportKind,
    ReportService, ReportSink, SystemClock, VisitorSessionRecorder,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "parklog")]
#[command(about = "Daily operations log for a theme park", long_about = None)]
struct Cli {
    /// Directory holding the JSON collections (default: ~/.parklog)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured attractions
    Attractions,
    /// Park-wide numbers: inspections, open and completed requests, visitors, fuel
    Overview,
    /// Preoperative inspections
    #[command(subcommand)]
    Inspection(InspectionCommand),
    /// Maintenance requests
    #[command(subcommand)]
    Request(RequestCommand),
    /// Fuel consumption logs
    #[command(subcommand)]
    Fuel(FuelCommand),
    /// Visitor sessions
    #[command(subcommand)]
    Visitors(VisitorsCommand),
    /// Visitor statistics for a month
    Stats {
        /// Show the daily series of one attraction instead of the park summary
        #[arg(short, long)]
        attraction: Option<String>,
        /// YYYY-MM, "this" or "last"
        #[arg(short, long, default_value = "this")]
        month: String,
        /// Open an interactive bar chart (needs --attraction)
        #[arg(long)]
        chart: bool,
    },
    /// Build a report (inspections, requests, visitors, fuel, statistics, summary)
    Report {
        kind: String,
        #[arg(short, long)]
        attraction: Option<String>,
        #[arg(short, long)]
        month: Option<String>,
        /// Also write the report as CSV into this directory
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Open the visitor register
    Tui,
}

#[derive(Subcommand)]
enum InspectionCommand {
    /// Record an inspection (usage: inspection add Karts --by Ana --fail Brakes:worn)
    Add {
        attraction: String,
        #[arg(long)]
        by: String,
        #[arg(long, default_value = "today")]
        date: String,
        #[arg(long)]
        cleaned: bool,
        #[arg(long, default_value = "good")]
        condition: String,
        #[arg(long, default_value = "")]
        notes: String,
        /// Failing checklist item, optionally "item:notes". Repeatable.
        #[arg(long = "fail")]
        failed: Vec<String>,
    },
    List {
        #[arg(short, long)]
        attraction: Option<String>,
        /// Match attraction, date or inspector (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
enum RequestCommand {
    /// Open a maintenance request
    Add {
        attraction: String,
        description: String,
        #[arg(long)]
        by: String,
        #[arg(long, default_value = "medium")]
        urgency: String,
        #[arg(long, default_value = "today")]
        date: String,
    },
    List {
        #[arg(short, long)]
        attraction: Option<String>,
        /// Match attraction, date, requester, description or status (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Move a request to pending, in-progress, completed or cancelled
    Status { id: String, status: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum FuelCommand {
    Add {
        attraction: String,
        gallons: f64,
        #[arg(long, default_value = "gasoline")]
        fuel_type: String,
        #[arg(long)]
        by: String,
        #[arg(long, default_value = "today")]
        date: String,
    },
    List {
        #[arg(short, long)]
        attraction: Option<String>,
        #[arg(short, long)]
        month: Option<String>,
    },
}

#[derive(Subcommand)]
enum VisitorsCommand {
    /// Record today's session, one count per timeslot (usage: visitors record Karts 12 30 18)
    Record {
        attraction: String,
        #[arg(required = true, allow_negative_numbers = true)]
        counts: Vec<i64>,
    },
    List {
        #[arg(short, long)]
        attraction: Option<String>,
        #[arg(short, long)]
        month: Option<String>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Accepts the configured spelling in any case, or a unique prefix of it.
fn resolve_attraction(config: &Config, input: &str) -> Result<String> {
    if let Some(name) = config.find_attraction(input) {
        return Ok(name.to_string());
    }
    Ok(expand_prefix(input, &config.attractions)
        .with_context(|| format!("'{}' is not a configured attraction", input))?
        .to_string())
}

/// Accepts a full id or the short prefix shown in listings.
fn resolve_id<T: Identified>(store: &FileRecordStore, input: &str) -> Result<Uuid> {
    let ids: Vec<String> = store.read_all::<T>()?.iter().map(|r| r.id().to_string()).collect();
    let full = expand_prefix(input, &ids).with_context(|| format!("No record matches id '{}'", input))?;
    Ok(Uuid::parse_str(full)?)
}

fn resolve_month(input: Option<&str>) -> Result<Option<String>> {
    Ok(input.map(|m| parse_month(m, &SystemClock)).transpose()?)
}

fn resolve_date(input: &str) -> Result<NaiveDate> {
    Ok(parse_date(input, &SystemClock)?)
}

fn print_report(store: &FileRecordStore, kind: ReportKind, filter: &ReportFilter) -> Result<()> {
    let report = ReportService::new(store).build(kind, filter)?;
    table::print_report(&report);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let store = FileRecordStore::new(cli.data_dir.clone().or_else(|| config.data_dir.clone()))?;

    let command = cli.command.unwrap_or(Commands::Tui);
    if !matches!(command, Commands::Tui) {
        init_logging();
        debug!("data directory: {}", store.base_dir().display());
    }

    match command {
        Commands::Attractions => {
            for name in &config.attractions {
                println!("{}", name);
            }
        }
        Commands::Overview => {
            let today = SystemClock.today();
            let overview = OverviewService::new(&store).build(today)?;
            table::print_overview(today, &overview);
        }
        Commands::Inspection(cmd) => match cmd {
            InspectionCommand::Add { attraction, by, date, cleaned, condition, notes, failed } => {
                let attraction = resolve_attraction(&config, &attraction)?;
                let mut inspection = Inspection::new(attraction, by, resolve_date(&date)?);
                inspection.cleaned = cleaned;
                inspection.condition = condition.parse::<Condition>()?;
                inspection.notes = notes;
                for item in &failed {
                    match item.split_once(':') {
                        Some((name, note)) => inspection.flag_item(name.trim(), Some(note.trim().to_string())),
                        None => inspection.flag_item(item.trim(), None),
                    }
                }
                store.append(inspection.clone())?;
                println!("Inspection recorded: {} on {} (ID: {})", inspection.attraction, inspection.date, inspection.id);
                let failures: Vec<&str> = inspection.failed_items().map(|i| i.name.as_str()).collect();
                if !failures.is_empty() {
                    println!("  Failed items: {}", failures.join(", "));
                }
            }
            InspectionCommand::List { attraction, search } => {
                let filter = ReportFilter {
                    attraction: attraction.map(|a| resolve_attraction(&config, &a)).transpose()?,
                    month: None,
                    search,
                };
                print_report(&store, ReportKind::Inspections, &filter)?;
            }
            InspectionCommand::Delete { id } => {
                let id = resolve_id::<Inspection>(&store, &id)?;
                if store.delete_by_id::<Inspection>(&id)? {
                    println!("Inspection {} deleted.", id);
                }
            }
        },
        Commands::Request(cmd) => match cmd {
            RequestCommand::Add { attraction, description, by, urgency, date } => {
                if description.trim().is_empty() {
                    bail!("A request needs a description");
                }
                let attraction = resolve_attraction(&config, &attraction)?;
                let mut request = MaintenanceRequest::new(attraction, by, description, resolve_date(&date)?);
                request.urgency = urgency.parse::<Urgency>()?;
                store.append(request.clone())?;
                println!("Request opened: {} (ID: {})", request.attraction, request.id);
                println!("  Urgency: {}", request.urgency);
            }
            RequestCommand::List { attraction, search } => {
                let filter = ReportFilter {
                    attraction: attraction.map(|a| resolve_attraction(&config, &a)).transpose()?,
                    month: None,
                    search,
                };
                print_report(&store, ReportKind::MaintenanceRequests, &filter)?;
            }
            RequestCommand::Status { id, status } => {
                let id = resolve_id::<MaintenanceRequest>(&store, &id)?;
                let status = status.parse::<RequestStatus>()?;
                let Some(mut request) = store.find_by_id::<MaintenanceRequest>(&id)? else {
                    bail!("Request {} disappeared while updating", id);
                };
                request.transition(status, resolve_date("today")?);
                store.replace_by_id(request.clone())?;
                println!("Request {} is now {}", id, request.status);
                if let Some(d) = request.resolved_on {
                    println!("  Resolved on: {}", d);
                }
            }
            RequestCommand::Delete { id } => {
                let id = resolve_id::<MaintenanceRequest>(&store, &id)?;
                if store.delete_by_id::<MaintenanceRequest>(&id)? {
                    println!("Request {} deleted.", id);
                }
            }
        },
        Commands::Fuel(cmd) => match cmd {
            FuelCommand::Add { attraction, gallons, fuel_type, by, date } => {
                let attraction = resolve_attraction(&config, &attraction)?;
                let log = FuelLog::new(attraction, resolve_date(&date)?, gallons, fuel_type, by)?;
                store.append(log.clone())?;
                println!("Fuel logged: {:.2} gal for {} on {} (ID: {})", log.gallons, log.attraction, log.date, log.id);
            }
            FuelCommand::List { attraction, month } => {
                let filter = ReportFilter {
                    attraction: attraction.map(|a| resolve_attraction(&config, &a)).transpose()?,
                    month: resolve_month(month.as_deref())?,
                    search: None,
                };
                print_report(&store, ReportKind::FuelLogs, &filter)?;
            }
        },
        Commands::Visitors(cmd) => match cmd {
            VisitorsCommand::Record { attraction, counts } => {
                let attraction = resolve_attraction(&config, &attraction)?;
                let mut recorder =
                    VisitorSessionRecorder::new(&store, SystemClock).with_slot_minutes(config.slot_minutes);
                recorder.select_attraction(&attraction)?;
                for count in counts {
                    recorder.add_timeslot(count)?;
                }
                let session = recorder.commit()?;
                println!(
                    "Recorded {} visitors for {} on {} ({} timeslots)",
                    session.total_visitors,
                    session.attraction,
                    session.date,
                    session.timeslots.len()
                );
                if let Some(daily) = AggregationEngine::new(&store).query_daily(&session.attraction, session.date)? {
                    println!("  Today so far: {}", daily.count);
                }
            }
            VisitorsCommand::List { attraction, month } => {
                let filter = ReportFilter {
                    attraction: attraction.map(|a| resolve_attraction(&config, &a)).transpose()?,
                    month: resolve_month(month.as_deref())?,
                    search: None,
                };
                print_report(&store, ReportKind::VisitorSessions, &filter)?;
            }
        },
        Commands::Stats { attraction, month, chart } => {
            let month = parse_month(&month, &SystemClock)?;
            let engine = AggregationEngine::new(&store);
            match attraction {
                Some(a) => {
                    let attraction = resolve_attraction(&config, &a)?;
                    if chart {
                        chart::run(&store, attraction, &month)?;
                    } else {
                        let series = engine.query_daily_series(&attraction, &month)?;
                        table::print_series(&attraction, &month, &series);
                    }
                }
                None => {
                    if chart {
                        bail!("--chart needs --attraction");
                    }
                    let counters = engine.query_all_attractions_for_month(&month)?;
                    table::print_month_summary(&month, &counters);
                }
            }
        }
        Commands::Report { kind, attraction, month, csv } => {
            let kind = kind.parse::<ReportKind>()?;
            let filter = ReportFilter {
                attraction: attraction.map(|a| resolve_attraction(&config, &a)).transpose()?,
                month: resolve_month(month.as_deref())?,
                search: None,
            };
            let report = ReportService::new(&store).build(kind, &filter)?;
            table::print_report(&report);
            if let Some(dir) = csv {
                let path = CsvSink::new(dir).export(&report, &report.file_name(&filter))?;
                println!("Exported to {}", path.display());
            }
        }
        Commands::Tui => {
            tui::run(&store, &config)?;
        }
    }
    Ok(())
}
