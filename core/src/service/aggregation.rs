use chrono::NaiveDate;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::model::{DailyCounter, MonthlyCounter, VisitorSession};
use crate::repository::RecordStore;
use crate::time::month_of;

/// Folds visitor totals into the daily and monthly counter indices and answers
/// queries over them.
///
/// Both indices are derived from the same accumulation event and are written
/// back in one store commit, so for every attraction and month
/// `total == Σ days` and `days[d] == daily(d).count`.
pub struct AggregationEngine<'a, S: RecordStore> {
    store: &'a S,
}

/// Both indices with one event folded in, not yet written.
struct Folded {
    daily: Vec<DailyCounter>,
    monthly: Vec<MonthlyCounter>,
    day_entry: DailyCounter,
    month_entry: MonthlyCounter,
}

impl<'a, S: RecordStore> AggregationEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    fn fold(&self, attraction: &str, date: NaiveDate, count: u64) -> Result<Folded> {
        if attraction.trim().is_empty() {
            return Err(Error::invalid("Attraction is required"));
        }

        let mut daily = self.store.read_all::<DailyCounter>()?;
        let pos = match daily.iter().position(|c| c.matches(attraction, date)) {
            Some(pos) => pos,
            None => {
                daily.push(DailyCounter::new(attraction, date));
                daily.len() - 1
            }
        };
        daily[pos].add(count)?;
        let day_entry = daily[pos].clone();

        let month = month_of(date);
        let mut monthly = self.store.read_all::<MonthlyCounter>()?;
        let pos = match monthly.iter().position(|c| c.matches(attraction, &month)) {
            Some(pos) => pos,
            None => {
                monthly.push(MonthlyCounter::new(attraction, &month));
                monthly.len() - 1
            }
        };
        monthly[pos].add(date, count)?;
        let month_entry = monthly[pos].clone();

        Ok(Folded {
            daily,
            monthly,
            day_entry,
            month_entry,
        })
    }

    /// Adds `count` visitors for `attraction` on `date` to both indices.
    ///
    /// Counts only grow. Applying the same event twice counts it twice. A count
    /// that would overflow either index is rejected before anything is written.
    pub fn accumulate(&self, attraction: &str, date: NaiveDate, count: u64) -> Result<(DailyCounter, MonthlyCounter)> {
        let folded = self.fold(attraction, date, count)?;

        if let Err(e) = self.store.write_pair(&folded.daily, &folded.monthly) {
            error!(
                attraction,
                %date,
                count,
                "visitor counters not updated: {}",
                e
            );
            return Err(e);
        }

        info!(
            attraction,
            %date,
            count,
            day_total = folded.day_entry.count,
            month_total = folded.month_entry.total,
            "accumulated visitors"
        );
        Ok((folded.day_entry, folded.month_entry))
    }

    /// Appends `session` and accumulates its total in the same store commit:
    /// either the session and both indices change, or none of them does.
    pub fn record_session(&self, session: &VisitorSession) -> Result<(DailyCounter, MonthlyCounter)> {
        let folded = self.fold(&session.attraction, session.date, session.total_visitors)?;
        let mut sessions = self.store.read_all::<VisitorSession>()?;
        sessions.push(session.clone());

        if let Err(e) = self.store.write_triple(&folded.daily, &folded.monthly, &sessions) {
            error!(
                session = %session.id,
                attraction = %session.attraction,
                total = session.total_visitors,
                "visitor session not saved: {}",
                e
            );
            return Err(e);
        }

        info!(
            session = %session.id,
            day_total = folded.day_entry.count,
            month_total = folded.month_entry.total,
            "accumulated visitor session"
        );
        Ok((folded.day_entry, folded.month_entry))
    }

    /// `None` when nothing was ever accumulated for the pair.
    pub fn query_monthly(&self, attraction: &str, month: &str) -> Result<Option<MonthlyCounter>> {
        let monthly = self.store.read_all::<MonthlyCounter>()?;
        Ok(monthly.into_iter().find(|c| c.matches(attraction, month)))
    }

    pub fn query_daily(&self, attraction: &str, date: NaiveDate) -> Result<Option<DailyCounter>> {
        let daily = self.store.read_all::<DailyCounter>()?;
        Ok(daily.into_iter().find(|c| c.matches(attraction, date)))
    }

    /// Per-day counts of the month in ascending date order. Empty if no record exists.
    pub fn query_daily_series(&self, attraction: &str, month: &str) -> Result<Vec<(String, u64)>> {
        Ok(self
            .query_monthly(attraction, month)?
            .map(|m| m.daily_series())
            .unwrap_or_default())
    }

    /// Every attraction's record for `month`, in store order.
    pub fn query_all_attractions_for_month(&self, month: &str) -> Result<Vec<MonthlyCounter>> {
        let monthly = self.store.read_all::<MonthlyCounter>()?;
        Ok(monthly.into_iter().filter(|c| c.month == month).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRecordStore;

    const COASTER: &str = "Montaña Rusa";

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_accumulate_same_day_adds_up() {
        let store = MemoryRecordStore::new();
        let engine = AggregationEngine::new(&store);

        engine.accumulate(COASTER, day(1), 50).unwrap();
        engine.accumulate(COASTER, day(1), 30).unwrap();

        let daily = engine.query_daily(COASTER, day(1)).unwrap().unwrap();
        assert_eq!(daily.count, 80);

        let monthly = engine.query_monthly(COASTER, "2024-05").unwrap().unwrap();
        assert_eq!(monthly.total, 80);
        assert_eq!(monthly.days.len(), 1);
        assert_eq!(monthly.days.get("2024-05-01"), Some(&80));
    }

    #[test]
    fn test_accumulate_next_day_extends_month() {
        let store = MemoryRecordStore::new();
        let engine = AggregationEngine::new(&store);

        engine.accumulate(COASTER, day(1), 50).unwrap();
        engine.accumulate(COASTER, day(1), 30).unwrap();
        engine.accumulate(COASTER, day(2), 20).unwrap();

        let monthly = engine.query_monthly(COASTER, "2024-05").unwrap().unwrap();
        assert_eq!(monthly.total, 100);
        assert_eq!(monthly.days.get("2024-05-01"), Some(&80));
        assert_eq!(monthly.days.get("2024-05-02"), Some(&20));
        assert_eq!(engine.query_daily(COASTER, day(1)).unwrap().unwrap().count, 80);
        assert_eq!(engine.query_daily(COASTER, day(2)).unwrap().unwrap().count, 20);
    }

    #[test]
    fn test_query_monthly_missing_is_none() {
        let store = MemoryRecordStore::new();
        let engine = AggregationEngine::new(&store);
        engine.accumulate(COASTER, day(1), 5).unwrap();

        assert!(engine.query_monthly("Carrusel", "2024-05").unwrap().is_none());
        assert!(engine.query_monthly(COASTER, "2024-06").unwrap().is_none());
        assert!(engine.query_daily_series("Carrusel", "2024-05").unwrap().is_empty());
    }

    #[test]
    fn test_daily_series_sorted_within_month() {
        let store = MemoryRecordStore::new();
        let engine = AggregationEngine::new(&store);
        for (d, n) in [(17, 4), (3, 9), (30, 1), (3, 1)] {
            engine.accumulate(COASTER, day(d), n).unwrap();
        }
        engine.accumulate(COASTER, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 99).unwrap();

        let series = engine.query_daily_series(COASTER, "2024-05").unwrap();
        assert_eq!(
            series,
            vec![
                ("2024-05-03".to_string(), 10),
                ("2024-05-17".to_string(), 4),
                ("2024-05-30".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_indices_stay_consistent() {
        let store = MemoryRecordStore::new();
        let engine = AggregationEngine::new(&store);
        let events = [
            ("Karts", 1, 12),
            ("Karts", 2, 3),
            ("Rapids", 1, 40),
            ("Karts", 1, 7),
            ("Rapids", 28, 2),
        ];
        for (a, d, n) in events {
            engine.accumulate(a, day(d), n).unwrap();
        }

        for monthly in engine.query_all_attractions_for_month("2024-05").unwrap() {
            assert!(monthly.is_consistent());
            for (date, count) in monthly.daily_series() {
                let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").unwrap();
                let daily = engine.query_daily(&monthly.attraction, date).unwrap().unwrap();
                assert_eq!(daily.count, count);
            }
        }
        assert_eq!(engine.query_daily("Karts", day(1)).unwrap().unwrap().count, 19);
    }

    #[test]
    fn test_replayed_event_double_counts() {
        let store = MemoryRecordStore::new();
        let engine = AggregationEngine::new(&store);
        engine.accumulate(COASTER, day(5), 25).unwrap();
        engine.accumulate(COASTER, day(5), 25).unwrap();
        assert_eq!(engine.query_monthly(COASTER, "2024-05").unwrap().unwrap().total, 50);
    }

    #[test]
    fn test_all_attractions_for_month_in_insertion_order() {
        let store = MemoryRecordStore::new();
        let engine = AggregationEngine::new(&store);
        engine.accumulate("Yippe", day(1), 1).unwrap();
        engine.accumulate("Krater", day(2), 2).unwrap();
        engine.accumulate("Yippe", NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(), 3).unwrap();

        let names: Vec<_> = engine
            .query_all_attractions_for_month("2024-05")
            .unwrap()
            .into_iter()
            .map(|m| m.attraction)
            .collect();
        assert_eq!(names, vec!["Yippe".to_string(), "Krater".to_string()]);
    }

    #[test]
    fn test_failed_write_changes_neither_index() {
        let store = MemoryRecordStore::new();
        let engine = AggregationEngine::new(&store);
        engine.accumulate(COASTER, day(1), 10).unwrap();

        store.fail_writes(true);
        assert!(matches!(engine.accumulate(COASTER, day(1), 5), Err(Error::Storage(_))));
        store.fail_writes(false);

        assert_eq!(engine.query_daily(COASTER, day(1)).unwrap().unwrap().count, 10);
        assert_eq!(engine.query_monthly(COASTER, "2024-05").unwrap().unwrap().total, 10);
    }

    #[test]
    fn test_overflowing_count_is_rejected_before_write() {
        let store = MemoryRecordStore::new();
        let engine = AggregationEngine::new(&store);
        engine.accumulate(COASTER, day(1), u64::MAX - 5).unwrap();
        let writes = store.writes();

        assert!(matches!(engine.accumulate(COASTER, day(2), 10), Err(Error::InvalidInput(_))));
        assert_eq!(store.writes(), writes);
        assert!(engine.query_daily(COASTER, day(2)).unwrap().is_none());
        assert_eq!(engine.query_monthly(COASTER, "2024-05").unwrap().unwrap().total, u64::MAX - 5);
    }

    #[test]
    fn test_record_session_writes_session_and_counters_together() {
        let store = MemoryRecordStore::new();
        let engine = AggregationEngine::new(&store);
        let slots = vec![crate::model::TimeslotEntry {
            start_time: "11:00".into(),
            end_time: "11:15".into(),
            count: 9,
        }];
        let session = VisitorSession::new("Rapids".into(), day(8), slots).unwrap();

        let (daily, monthly) = engine.record_session(&session).unwrap();
        assert_eq!(daily.count, 9);
        assert_eq!(monthly.total, 9);
        assert_eq!(store.writes(), 1);
        assert_eq!(store.read_all::<VisitorSession>().unwrap(), vec![session.clone()]);

        store.fail_writes(true);
        assert!(engine.record_session(&session).is_err());
        store.fail_writes(false);
        assert_eq!(store.read_all::<VisitorSession>().unwrap().len(), 1);
        assert_eq!(engine.query_daily("Rapids", day(8)).unwrap().unwrap().count, 9);
    }
}
