use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::record::{Collection, Namespace, Tabular};
use crate::error::{Error, Result};
use crate::time::month_of;

fn overflow(attraction: &str) -> Error {
    Error::invalid(format!("Visitor count for {} exceeds the counter range", attraction))
}

/// Running visitor count for one attraction on one date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DailyCounter {
    pub attraction: String,
    pub date: NaiveDate,
    pub count: u64,
}

impl DailyCounter {
    pub fn new(attraction: &str, date: NaiveDate) -> Self {
        Self {
            attraction: attraction.to_string(),
            date,
            count: 0,
        }
    }

    pub fn matches(&self, attraction: &str, date: NaiveDate) -> bool {
        self.attraction == attraction && self.date == date
    }

    /// Fails without changing the counter if the sum would not fit.
    pub fn add(&mut self, count: u64) -> Result<()> {
        self.count = self.count.checked_add(count).ok_or_else(|| overflow(&self.attraction))?;
        Ok(())
    }
}

impl Collection for DailyCounter {
    const NAMESPACE: Namespace = Namespace::DailyCounters;
}

impl Tabular for DailyCounter {
    const COLUMNS: &'static [&'static str] = &["Attraction", "Date", "Visitors"];

    fn values(&self) -> Vec<String> {
        vec![self.attraction.clone(), self.date.to_string(), self.count.to_string()]
    }
}

/// Visitor totals for one attraction over one month, broken down per day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCounter {
    pub month: String, // YYYY-MM
    pub attraction: String,
    pub total: u64,
    pub days: BTreeMap<String, u64>, // Key: "YYYY-MM-DD"
}

impl MonthlyCounter {
    pub fn new(attraction: &str, month: &str) -> Self {
        Self {
            month: month.to_string(),
            attraction: attraction.to_string(),
            total: 0,
            days: BTreeMap::new(),
        }
    }

    pub fn matches(&self, attraction: &str, month: &str) -> bool {
        self.attraction == attraction && self.month == month
    }

    /// Folds `count` into the day bucket and the month total together.
    /// On overflow neither is touched.
    pub fn add(&mut self, date: NaiveDate, count: u64) -> Result<()> {
        debug_assert_eq!(month_of(date), self.month);
        let key = date.to_string();
        let day = self.days.get(&key).copied().unwrap_or(0);
        let (Some(day), Some(total)) = (day.checked_add(count), self.total.checked_add(count)) else {
            return Err(overflow(&self.attraction));
        };
        self.days.insert(key, day);
        self.total = total;
        Ok(())
    }

    pub fn is_consistent(&self) -> bool {
        self.total == self.days.values().sum::<u64>()
    }

    /// Days of this month in ascending order. Keys from other months are skipped.
    pub fn daily_series(&self) -> Vec<(String, u64)> {
        let prefix = format!("{}-", self.month);
        self.days
            .iter()
            .filter(|(day, _)| day.starts_with(&prefix))
            .map(|(day, count)| (day.clone(), *count))
            .collect()
    }
}

impl Collection for MonthlyCounter {
    const NAMESPACE: Namespace = Namespace::MonthlyCounters;
}

impl Tabular for MonthlyCounter {
    const COLUMNS: &'static [&'static str] = &["Month", "Attraction", "Total", "Days"];

    fn values(&self) -> Vec<String> {
        vec![
            self.month.clone(),
            self.attraction.clone(),
            self.total.to_string(),
            self.days.len().to_string(),
        ]
    }
}
