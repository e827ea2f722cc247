use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::{short_id, Collection, Identified, Namespace, Tabular};
use crate::error::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FuelLog {
    pub id: Uuid,
    pub attraction: String,
    pub date: NaiveDate,
    pub gallons: f64,
    pub fuel_type: String,
    pub responsible: String,
}

impl FuelLog {
    pub fn new(
        attraction: String,
        date: NaiveDate,
        gallons: f64,
        fuel_type: String,
        responsible: String,
    ) -> Result<Self> {
        if !(gallons.is_finite() && gallons > 0.0) {
            return Err(Error::invalid("Gallons must be a positive number"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            attraction,
            date,
            gallons,
            fuel_type,
            responsible,
        })
    }
}

impl Collection for FuelLog {
    const NAMESPACE: Namespace = Namespace::FuelLogs;
}

impl Identified for FuelLog {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Tabular for FuelLog {
    const COLUMNS: &'static [&'static str] = &["ID", "Attraction", "Date", "Gallons", "Fuel", "Responsible"];

    fn values(&self) -> Vec<String> {
        vec![
            short_id(&self.id),
            self.attraction.clone(),
            self.date.to_string(),
            format!("{:.2}", self.gallons),
            self.fuel_type.clone(),
            self.responsible.clone(),
        ]
    }
}
