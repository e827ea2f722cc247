use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use super::counter::{DailyCounter, MonthlyCounter};
use super::fuel::FuelLog;
use super::inspection::Inspection;
use super::maintenance::MaintenanceRequest;
use super::visitor::VisitorSession;

/// Identifier of one persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    Inspections,
    MaintenanceRequests,
    FuelLogs,
    VisitorSessions,
    DailyCounters,
    MonthlyCounters,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Inspections => "inspections",
            Namespace::MaintenanceRequests => "maintenance-requests",
            Namespace::FuelLogs => "fuel-logs",
            Namespace::VisitorSessions => "visitor-sessions",
            Namespace::DailyCounters => "daily-counters",
            Namespace::MonthlyCounters => "monthly-counters",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record type stored as one whole collection under its namespace.
pub trait Collection: Serialize + DeserializeOwned + Clone {
    const NAMESPACE: Namespace;
}

/// Collections whose elements carry a unique id and can be replaced or deleted by it.
pub trait Identified: Collection {
    fn id(&self) -> Uuid;
}

/// Flat, ordered column/value view of a record for tables and exports.
pub trait Tabular {
    const COLUMNS: &'static [&'static str];

    fn values(&self) -> Vec<String>;

    fn fields(&self) -> Vec<(&'static str, String)> {
        Self::COLUMNS.iter().copied().zip(self.values()).collect()
    }
}

/// Any persisted record, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyRecord {
    Inspection(Inspection),
    MaintenanceRequest(MaintenanceRequest),
    FuelLog(FuelLog),
    VisitorSession(VisitorSession),
    DailyCounter(DailyCounter),
    MonthlyCounter(MonthlyCounter),
}

impl AnyRecord {
    pub fn attraction(&self) -> &str {
        match self {
            AnyRecord::Inspection(r) => &r.attraction,
            AnyRecord::MaintenanceRequest(r) => &r.attraction,
            AnyRecord::FuelLog(r) => &r.attraction,
            AnyRecord::VisitorSession(r) => &r.attraction,
            AnyRecord::DailyCounter(r) => &r.attraction,
            AnyRecord::MonthlyCounter(r) => &r.attraction,
        }
    }

    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            AnyRecord::Inspection(r) => r.fields(),
            AnyRecord::MaintenanceRequest(r) => r.fields(),
            AnyRecord::FuelLog(r) => r.fields(),
            AnyRecord::VisitorSession(r) => r.fields(),
            AnyRecord::DailyCounter(r) => r.fields(),
            AnyRecord::MonthlyCounter(r) => r.fields(),
        }
    }
}

macro_rules! impl_from_record {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for AnyRecord {
                fn from(r: $variant) -> Self {
                    AnyRecord::$variant(r)
                }
            }
        )*
    };
}

impl_from_record!(Inspection, MaintenanceRequest, FuelLog, VisitorSession, DailyCounter, MonthlyCounter);

pub(crate) fn short_id(id: &Uuid) -> String {
    id.to_string()[..8].to_string()
}
