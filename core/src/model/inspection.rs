use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::record::{short_id, Collection, Identified, Namespace, Tabular};
use crate::error::Error;

/// Checklist every new inspection starts from.
pub const DEFAULT_CHECKLIST: [&str; 10] = [
    "Safety systems",
    "Braking systems",
    "Anchors and restraints",
    "Hydraulic systems",
    "Electrical systems",
    "Pneumatic systems",
    "Emergency devices",
    "Seats and harnesses",
    "Lubrication points",
    "General structure",
];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Good,
    Fair,
    Poor,
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Good
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::Poor => "Poor",
        };
        f.write_str(s)
    }
}

impl FromStr for Condition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "g" | "good" => Ok(Condition::Good),
            "f" | "fair" | "regular" => Ok(Condition::Fair),
            "p" | "poor" | "bad" => Ok(Condition::Poor),
            _ => Err(Error::invalid(format!("Unknown condition: '{}'", s))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Ok,
    NotOk,
    NotApplicable,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemStatus::Ok => "OK",
            ItemStatus::NotOk => "Not OK",
            ItemStatus::NotApplicable => "N/A",
        };
        f.write_str(s)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckedItem {
    pub name: String,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Preoperative safety inspection of one attraction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub id: Uuid,
    pub attraction: String,
    pub date: NaiveDate,
    pub performed_by: String,
    pub cleaned: bool,
    pub condition: Condition,
    pub notes: String,
    pub checked_items: Vec<CheckedItem>,
}

impl Inspection {
    pub fn new(attraction: String, performed_by: String, date: NaiveDate) -> Self {
        let checked_items = DEFAULT_CHECKLIST
            .iter()
            .map(|name| CheckedItem {
                name: name.to_string(),
                status: ItemStatus::Ok,
                notes: None,
            })
            .collect();
        Self {
            id: Uuid::new_v4(),
            attraction,
            date,
            performed_by,
            cleaned: false,
            condition: Condition::default(),
            notes: String::new(),
            checked_items,
        }
    }

    /// Marks a checklist item as failing. Unknown names are appended.
    pub fn flag_item(&mut self, name: &str, notes: Option<String>) {
        match self.checked_items.iter_mut().find(|i| i.name.eq_ignore_ascii_case(name)) {
            Some(item) => {
                item.status = ItemStatus::NotOk;
                item.notes = notes;
            }
            None => self.checked_items.push(CheckedItem {
                name: name.to_string(),
                status: ItemStatus::NotOk,
                notes,
            }),
        }
    }

    pub fn failed_items(&self) -> impl Iterator<Item = &CheckedItem> {
        self.checked_items.iter().filter(|i| i.status == ItemStatus::NotOk)
    }
}

impl Collection for Inspection {
    const NAMESPACE: Namespace = Namespace::Inspections;
}

impl Identified for Inspection {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Tabular for Inspection {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Attraction", "Date", "Performed by", "Cleaned", "Condition", "Failed items", "Notes"];

    fn values(&self) -> Vec<String> {
        let failed = self.failed_items().map(|i| i.name.as_str()).collect::<Vec<_>>().join(", ");
        vec![
            short_id(&self.id),
            self.attraction.clone(),
            self.date.to_string(),
            self.performed_by.clone(),
            if self.cleaned { "yes" } else { "no" }.to_string(),
            self.condition.to_string(),
            failed,
            self.notes.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_inspection_starts_from_checklist() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut insp = Inspection::new("Karts".to_string(), "Ana".to_string(), date);
        assert_eq!(insp.checked_items.len(), DEFAULT_CHECKLIST.len());
        assert_eq!(insp.failed_items().count(), 0);

        insp.flag_item("braking systems", Some("worn pads".to_string()));
        insp.flag_item("Paint", None);
        let failed: Vec<_> = insp.failed_items().map(|i| i.name.clone()).collect();
        assert_eq!(failed, vec!["Braking systems".to_string(), "Paint".to_string()]);
    }

    #[test]
    fn test_condition_from_str() {
        assert_eq!("g".parse::<Condition>().unwrap(), Condition::Good);
        assert_eq!("Regular".parse::<Condition>().unwrap(), Condition::Fair);
        assert!("awful".parse::<Condition>().is_err());
    }
}
