use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::{short_id, Collection, Identified, Namespace, Tabular};
use crate::error::{Error, Result};

/// One manually entered visitor count for a sub-interval of the day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TimeslotEntry {
    pub start_time: String, // HH:MM
    pub end_time: String,   // HH:MM, label only
    pub count: u64,
}

/// A committed day of visitor counts for one attraction. Never updated after commit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VisitorSession {
    pub id: Uuid,
    pub attraction: String,
    pub date: NaiveDate,
    pub total_visitors: u64,
    pub timeslots: Vec<TimeslotEntry>,
}

impl VisitorSession {
    pub fn new(attraction: String, date: NaiveDate, timeslots: Vec<TimeslotEntry>) -> Result<Self> {
        let total_visitors = timeslots
            .iter()
            .try_fold(0u64, |acc, t| acc.checked_add(t.count))
            .ok_or_else(|| Error::invalid("Session total exceeds the counter range"))?;
        Ok(Self {
            id: Uuid::new_v4(),
            attraction,
            date,
            total_visitors,
            timeslots,
        })
    }
}

impl Collection for VisitorSession {
    const NAMESPACE: Namespace = Namespace::VisitorSessions;
}

impl Identified for VisitorSession {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Tabular for VisitorSession {
    const COLUMNS: &'static [&'static str] = &["ID", "Attraction", "Date", "Visitors", "Timeslots"];

    fn values(&self) -> Vec<String> {
        let slots = self
            .timeslots
            .iter()
            .map(|t| format!("{}-{} {}", t.start_time, t.end_time, t.count))
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            short_id(&self.id),
            self.attraction.clone(),
            self.date.to_string(),
            self.total_visitors.to_string(),
            slots,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(count: u64) -> TimeslotEntry {
        TimeslotEntry {
            start_time: "10:00".to_string(),
            end_time: "10:15".to_string(),
            count,
        }
    }

    #[test]
    fn test_total_is_sum_of_slots() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let session = VisitorSession::new("Yippe".into(), day, vec![slot(4), slot(6)]).unwrap();
        assert_eq!(session.total_visitors, 10);

        let err = VisitorSession::new("Yippe".into(), day, vec![slot(u64::MAX), slot(1)]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
