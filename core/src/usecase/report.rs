use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::{
    AnyRecord, Collection, DailyCounter, FuelLog, Inspection, MaintenanceRequest, MonthlyCounter, Tabular,
    VisitorSession,
};
use crate::repository::RecordStore;
use crate::service::aggregation::AggregationEngine;
use crate::time::month_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Inspections,
    MaintenanceRequests,
    VisitorSessions,
    FuelLogs,
    /// Per-day visitors of one attraction in one month.
    Statistics,
    /// Monthly totals of every attraction.
    MonthlySummary,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::Inspections,
        ReportKind::MaintenanceRequests,
        ReportKind::VisitorSessions,
        ReportKind::FuelLogs,
        ReportKind::Statistics,
        ReportKind::MonthlySummary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Inspections => "inspections",
            ReportKind::MaintenanceRequests => "requests",
            ReportKind::VisitorSessions => "visitors",
            ReportKind::FuelLogs => "fuel",
            ReportKind::Statistics => "statistics",
            ReportKind::MonthlySummary => "summary",
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ReportKind::Inspections => Inspection::COLUMNS,
            ReportKind::MaintenanceRequests => MaintenanceRequest::COLUMNS,
            ReportKind::VisitorSessions => VisitorSession::COLUMNS,
            ReportKind::FuelLogs => FuelLog::COLUMNS,
            ReportKind::Statistics => DailyCounter::COLUMNS,
            ReportKind::MonthlySummary => MonthlyCounter::COLUMNS,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.to_lowercase();
        ReportKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::invalid(format!("Unknown report kind: '{}'", s)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub attraction: Option<String>,
    pub month: Option<String>, // YYYY-MM
    /// Case-insensitive text matched against inspections and maintenance requests.
    pub search: Option<String>,
}

impl ReportFilter {
    fn attraction_matches(&self, attraction: &str) -> bool {
        self.attraction.as_deref().map_or(true, |a| a == attraction)
    }

    fn month_matches(&self, date: NaiveDate) -> bool {
        self.month.as_deref().map_or(true, |m| month_of(date) == m)
    }

    /// True when any of `haystack` contains the search term. An empty term matches everything.
    fn text_matches(&self, haystack: &[&str]) -> bool {
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                haystack.iter().any(|h| h.to_lowercase().contains(&term))
            }
        }
    }

    fn inspection_matches(&self, r: &Inspection) -> bool {
        self.attraction_matches(&r.attraction)
            && self.text_matches(&[r.attraction.as_str(), r.date.to_string().as_str(), r.performed_by.as_str()])
    }

    fn request_matches(&self, r: &MaintenanceRequest) -> bool {
        self.attraction_matches(&r.attraction)
            && self.text_matches(&[
                r.attraction.as_str(),
                r.requested_on.to_string().as_str(),
                r.requested_by.as_str(),
                r.description.as_str(),
                r.status.to_string().as_str(),
            ])
    }
}

/// Homogeneous rows ready for a table or an export sink.
#[derive(Debug, Clone)]
pub struct Report {
    pub kind: ReportKind,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    pub fn from_records(kind: ReportKind, records: &[AnyRecord]) -> Self {
        let columns = kind.columns().iter().map(|c| c.to_string()).collect();
        let rows = records
            .iter()
            .map(|r| r.fields().into_iter().map(|(_, v)| v).collect())
            .collect();
        Self { kind, columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `report_<kind>[_<attraction>][_<month>]`, whitespace in the attraction replaced by `_`.
    pub fn file_name(&self, filter: &ReportFilter) -> String {
        let mut name = format!("report_{}", self.kind);
        if let Some(a) = &filter.attraction {
            name.push('_');
            name.push_str(&a.split_whitespace().collect::<Vec<_>>().join("_"));
        }
        if let Some(m) = &filter.month {
            name.push('_');
            name.push_str(m);
        }
        name
    }
}

/// Read-only view over raw collections and counter queries for reporting.
pub struct ReportService<'a, S: RecordStore> {
    store: &'a S,
}

impl<'a, S: RecordStore> ReportService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Inspections and requests filter on attraction and search text; dated logs on
    /// attraction and month. Statistics need both filters and yield nothing otherwise.
    pub fn records(&self, kind: ReportKind, filter: &ReportFilter) -> Result<Vec<AnyRecord>> {
        let records = match kind {
            ReportKind::Inspections => self.collect::<Inspection>(|r| filter.inspection_matches(r))?,
            ReportKind::MaintenanceRequests => self.collect::<MaintenanceRequest>(|r| filter.request_matches(r))?,
            ReportKind::VisitorSessions => self.collect::<VisitorSession>(|r| {
                filter.attraction_matches(&r.attraction) && filter.month_matches(r.date)
            })?,
            ReportKind::FuelLogs => {
                self.collect::<FuelLog>(|r| filter.attraction_matches(&r.attraction) && filter.month_matches(r.date))?
            }
            ReportKind::Statistics => match (&filter.attraction, &filter.month) {
                (Some(attraction), Some(month)) => AggregationEngine::new(self.store)
                    .query_daily_series(attraction, month)?
                    .into_iter()
                    .filter_map(|(day, count)| {
                        let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d").ok()?;
                        Some(AnyRecord::DailyCounter(DailyCounter {
                            attraction: attraction.clone(),
                            date,
                            count,
                        }))
                    })
                    .collect(),
                _ => Vec::new(),
            },
            ReportKind::MonthlySummary => match &filter.month {
                Some(month) => AggregationEngine::new(self.store)
                    .query_all_attractions_for_month(month)?
                    .into_iter()
                    .filter(|m| filter.attraction_matches(&m.attraction))
                    .map(AnyRecord::from)
                    .collect(),
                None => Vec::new(),
            },
        };
        Ok(records)
    }

    pub fn build(&self, kind: ReportKind, filter: &ReportFilter) -> Result<Report> {
        let records = self.records(kind, filter)?;
        Ok(Report::from_records(kind, &records))
    }

    fn collect<T>(&self, keep: impl Fn(&T) -> bool) -> Result<Vec<AnyRecord>>
    where
        T: Collection + Into<AnyRecord>,
    {
        Ok(self
            .store
            .read_all::<T>()?
            .into_iter()
            .filter(|r| keep(r))
            .map(Into::into)
            .collect())
    }
}
