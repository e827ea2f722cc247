pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::Config;
pub use error::{Error, Result};
pub use input::expand_prefix;
pub use model::{
    AnyRecord, Collection, DailyCounter, FuelLog, Identified, Inspection, MaintenanceRequest, MonthlyCounter,
    Namespace, Tabular, TimeslotEntry, VisitorSession,
};
pub use repository::{FileRecordStore, MemoryRecordStore, RecordStore};
pub use service::aggregation::AggregationEngine;
pub use service::export::{CsvSink, ReportSink};
pub use service::recorder::VisitorSessionRecorder;
pub use time::{parse_date, parse_month, Clock, FixedClock, SystemClock};
pub use usecase::overview::{Overview, OverviewService};
pub use usecase::report::{Report, ReportFilter, ReportKind, ReportService};
