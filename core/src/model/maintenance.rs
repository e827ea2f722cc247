use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::record::{short_id, Collection, Identified, Namespace, Tabular};
use crate::error::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Medium
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Urgency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "l" | "low" => Ok(Urgency::Low),
            "m" | "med" | "medium" => Ok(Urgency::Medium),
            "h" | "high" => Ok(Urgency::High),
            "c" | "crit" | "critical" => Ok(Urgency::Critical),
            _ => Err(Error::invalid(format!("Unknown urgency: '{}'", s))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl Default for RequestStatus {
    fn default() -> Self {
        RequestStatus::Pending
    }
}

impl RequestStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::InProgress => "In progress",
            RequestStatus::Completed => "Completed",
            RequestStatus::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

impl FromStr for RequestStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "inprogress" | "started" => Ok(RequestStatus::InProgress),
            "completed" | "done" => Ok(RequestStatus::Completed),
            "cancelled" | "canceled" => Ok(RequestStatus::Cancelled),
            _ => Err(Error::invalid(format!("Unknown status: '{}'", s))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceRequest {
    pub id: Uuid,
    pub attraction: String,
    pub requested_on: NaiveDate,
    pub requested_by: String,
    pub urgency: Urgency,
    pub description: String,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_on: Option<NaiveDate>,
}

impl MaintenanceRequest {
    pub fn new(attraction: String, requested_by: String, description: String, requested_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            attraction,
            requested_on,
            requested_by,
            urgency: Urgency::default(),
            description,
            status: RequestStatus::default(),
            resolved_on: None,
        }
    }

    /// Moves the request to `status`. Closing stamps the resolution date, reopening clears it.
    pub fn transition(&mut self, status: RequestStatus, today: NaiveDate) {
        self.status = status;
        self.resolved_on = if status.is_closed() { Some(today) } else { None };
    }
}

impl Collection for MaintenanceRequest {
    const NAMESPACE: Namespace = Namespace::MaintenanceRequests;
}

impl Identified for MaintenanceRequest {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Tabular for MaintenanceRequest {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Attraction", "Requested", "Requested by", "Urgency", "Status", "Resolved", "Description"];

    fn values(&self) -> Vec<String> {
        vec![
            short_id(&self.id),
            self.attraction.clone(),
            self.requested_on.to_string(),
            self.requested_by.clone(),
            self.urgency.to_string(),
            self.status.to_string(),
            self.resolved_on.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            self.description.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_stamps_resolution() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 5, 4).unwrap();
        let mut req = MaintenanceRequest::new("Rapids".into(), "Luis".into(), "Pump noise".into(), day);
        assert_eq!(req.status, RequestStatus::Pending);
        assert_eq!(req.urgency, Urgency::Medium);

        req.transition(RequestStatus::InProgress, later);
        assert_eq!(req.resolved_on, None);
        req.transition(RequestStatus::Completed, later);
        assert_eq!(req.resolved_on, Some(later));
        req.transition(RequestStatus::Pending, later);
        assert_eq!(req.resolved_on, None);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("in-progress".parse::<RequestStatus>().unwrap(), RequestStatus::InProgress);
        assert_eq!("Done".parse::<RequestStatus>().unwrap(), RequestStatus::Completed);
        assert!("lost".parse::<RequestStatus>().is_err());
    }
}
