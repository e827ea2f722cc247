use chrono::NaiveDate;

use crate::error::Result;
use crate::model::{FuelLog, Inspection, MaintenanceRequest, RequestStatus, VisitorSession};
use crate::repository::RecordStore;

/// Park-wide headline numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overview {
    pub inspections: usize,
    /// Pending or in progress.
    pub open_requests: usize,
    pub completed_requests: usize,
    pub visitors_today: u64,
    pub visitors_total: u64,
    pub fuel_gallons: f64,
}

pub struct OverviewService<'a, S: RecordStore> {
    store: &'a S,
}

impl<'a, S: RecordStore> OverviewService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Visitor figures come from the stored sessions. Sums saturate at `u64::MAX`.
    pub fn build(&self, today: NaiveDate) -> Result<Overview> {
        let requests = self.store.read_all::<MaintenanceRequest>()?;
        let sessions = self.store.read_all::<VisitorSession>()?;
        let fuel = self.store.read_all::<FuelLog>()?;

        let open_requests = requests
            .iter()
            .filter(|r| matches!(r.status, RequestStatus::Pending | RequestStatus::InProgress))
            .count();
        let completed_requests = requests
            .iter()
            .filter(|r| r.status == RequestStatus::Completed)
            .count();

        let visitors_today = sessions
            .iter()
            .filter(|s| s.date == today)
            .fold(0u64, |acc, s| acc.saturating_add(s.total_visitors));
        let visitors_total = sessions
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.total_visitors));

        Ok(Overview {
            inspections: self.store.read_all::<Inspection>()?.len(),
            open_requests,
            completed_requests,
            visitors_today,
            visitors_total,
            fuel_gallons: fuel.iter().map(|f| f.gallons).sum(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRecordStore;
    use crate::service::recorder::VisitorSessionRecorder;
    use crate::time::FixedClock;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn record(store: &MemoryRecordStore, attraction: &str, day: u32, counts: &[i64]) {
        let mut rec = VisitorSessionRecorder::new(store, FixedClock::at(date(day), 14, 0));
        rec.select_attraction(attraction).unwrap();
        for &c in counts {
            rec.add_timeslot(c).unwrap();
        }
        rec.commit().unwrap();
    }

    #[test]
    fn test_empty_store() {
        let store = MemoryRecordStore::new();
        let overview = OverviewService::new(&store).build(date(1)).unwrap();
        assert_eq!(overview, Overview::default());
    }

    #[test]
    fn test_counts_and_totals() {
        let store = MemoryRecordStore::new();
        store
            .append(Inspection::new("Karts".into(), "Ana".into(), date(2)))
            .unwrap();
        store
            .append(Inspection::new("Rapids".into(), "Ana".into(), date(3)))
            .unwrap();

        let statuses = [
            RequestStatus::Pending,
            RequestStatus::InProgress,
            RequestStatus::Completed,
            RequestStatus::Cancelled,
        ];
        for status in statuses {
            let mut req = MaintenanceRequest::new("Karts".into(), "Eva".into(), "Check".into(), date(1));
            req.transition(status, date(2));
            store.append(req).unwrap();
        }

        store
            .append(FuelLog::new("Karts".into(), date(2), 4.5, "Gasoline".into(), "Rosa".into()).unwrap())
            .unwrap();
        store
            .append(FuelLog::new("Teleférico".into(), date(3), 2.25, "Diesel".into(), "Juan".into()).unwrap())
            .unwrap();

        record(&store, "Karts", 3, &[10, 5]);
        record(&store, "Rapids", 3, &[7]);
        record(&store, "Karts", 2, &[40]);

        let overview = OverviewService::new(&store).build(date(3)).unwrap();
        assert_eq!(overview.inspections, 2);
        assert_eq!(overview.open_requests, 2);
        assert_eq!(overview.completed_requests, 1);
        assert_eq!(overview.visitors_today, 22);
        assert_eq!(overview.visitors_total, 62);
        assert!((overview.fuel_gallons - 6.75).abs() < f64::EPSILON);
    }
}
