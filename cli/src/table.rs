use chrono::NaiveDate;
use parklog_core::{MonthlyCounter, Overview, Report};
use tabled::builder::Builder;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

// Helper struct for the daily series rows
#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Visitors")]
    visitors: u64,
    #[tabled(rename = "Share")]
    share: String,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Attraction")]
    attraction: String,
    #[tabled(rename = "Visitors")]
    total: u64,
    #[tabled(rename = "Days open")]
    days: usize,
    #[tabled(rename = "Best day")]
    best: String,
}

fn styled(mut table: Table) -> Table {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color
    table
}

pub fn print_report(report: &Report) {
    if report.is_empty() {
        println!("No {} found.", report.kind);
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(report.columns.iter().cloned());
    for row in &report.rows {
        builder.push_record(row.iter().cloned());
    }
    println!("{}", styled(builder.build()));
    println!("{} row(s)", report.rows.len());
}

pub fn print_series(attraction: &str, month: &str, series: &[(String, u64)]) {
    if series.is_empty() {
        println!("No visitors recorded for {} in {}.", attraction, month);
        return;
    }

    let total: u64 = series.iter().map(|(_, n)| n).sum();
    let rows: Vec<SeriesRow> = series
        .iter()
        .map(|(date, visitors)| SeriesRow {
            date: date.clone(),
            visitors: *visitors,
            share: format!("{:.1}%", *visitors as f64 * 100.0 / total.max(1) as f64),
        })
        .collect();

    println!("\n\x1b[1;36m{} {}\x1b[0m (Total: {})", attraction, month, total);
    println!("{}", styled(Table::new(rows)));
}

pub fn print_month_summary(month: &str, counters: &[MonthlyCounter]) {
    if counters.is_empty() {
        println!("No visitors recorded in {}.", month);
        return;
    }

    let rows: Vec<SummaryRow> = counters
        .iter()
        .map(|c| {
            let best = c
                .days
                .iter()
                .max_by_key(|(_, n)| **n)
                .map(|(d, n)| format!("{} ({})", d, n))
                .unwrap_or_else(|| "-".to_string());
            SummaryRow {
                attraction: c.attraction.clone(),
                total: c.total,
                days: c.days.len(),
                best,
            }
        })
        .collect();

    let park_total: u64 = counters.iter().map(|c| c.total).sum();
    println!("\n\x1b[1;36mPark visitors {}\x1b[0m (Total: {})", month, park_total);
    println!("{}", styled(Table::new(rows)));
}

pub fn print_overview(today: NaiveDate, overview: &Overview) {
    let mut builder = Builder::default();
    builder.push_record(["Metric", "Value"]);
    builder.push_record(["Inspections".to_string(), overview.inspections.to_string()]);
    builder.push_record(["Open requests".to_string(), overview.open_requests.to_string()]);
    builder.push_record(["Completed requests".to_string(), overview.completed_requests.to_string()]);
    builder.push_record([format!("Visitors {}", today), overview.visitors_today.to_string()]);
    builder.push_record(["Visitors (all time)".to_string(), overview.visitors_total.to_string()]);
    builder.push_record(["Fuel (gal)".to_string(), format!("{:.2}", overview.fuel_gallons)]);

    println!("\n\x1b[1;36mPark overview\x1b[0m");
    println!("{}", styled(builder.build()));
}
