//! Integration tests for the JSON file store and the flows built on it.

use chrono::NaiveDate;
use parklog_core::model::{Condition, RequestStatus};
use parklog_core::{
    AggregationEngine, CsvSink, DailyCounter, FileRecordStore, FixedClock, Inspection, MaintenanceRequest,
    MonthlyCounter, Namespace, RecordStore, ReportFilter, ReportKind, ReportService, ReportSink,
    VisitorSession, VisitorSessionRecorder,
};
use std::fs;
use tempfile::TempDir;

fn may(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

#[test]
fn test_unwritten_namespace_reads_empty_and_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let store = FileRecordStore::new(Some(dir.path().to_path_buf())).unwrap();

    let sessions: Vec<VisitorSession> = store.read_all().unwrap();
    assert!(sessions.is_empty());
    assert!(!store.path_for(Namespace::VisitorSessions).exists());
}

#[test]
fn test_each_namespace_gets_its_own_file() {
    let dir = TempDir::new().unwrap();
    let store = FileRecordStore::new(Some(dir.path().to_path_buf())).unwrap();

    let mut insp = Inspection::new("Barco Vikingo".into(), "Marta".into(), may(1));
    insp.condition = Condition::Fair;
    store.append(insp.clone()).unwrap();
    store
        .append(MaintenanceRequest::new("Rapids".into(), "Luis".into(), "Pump".into(), may(2)))
        .unwrap();

    assert!(dir.path().join("inspections.json").exists());
    assert!(dir.path().join("maintenance-requests.json").exists());

    // A fresh handle sees the same data.
    let reopened = FileRecordStore::new(Some(dir.path().to_path_buf())).unwrap();
    let inspections: Vec<Inspection> = reopened.read_all().unwrap();
    assert_eq!(inspections, vec![insp]);
}

#[test]
fn test_replace_and_delete_by_id_on_disk() {
    let dir = TempDir::new().unwrap();
    let store = FileRecordStore::new(Some(dir.path().to_path_buf())).unwrap();

    let mut req = MaintenanceRequest::new("Karts".into(), "Eva".into(), "Brakes".into(), may(3));
    store.append(req.clone()).unwrap();
    req.transition(RequestStatus::Completed, may(6));
    assert!(store.replace_by_id(req.clone()).unwrap());

    let found = store.find_by_id::<MaintenanceRequest>(&req.id).unwrap().unwrap();
    assert_eq!(found.resolved_on, Some(may(6)));

    assert!(store.delete_by_id::<MaintenanceRequest>(&req.id).unwrap());
    assert!(!store.delete_by_id::<MaintenanceRequest>(&req.id).unwrap());
    assert!(store.read_all::<MaintenanceRequest>().unwrap().is_empty());
}

#[test]
fn test_counters_persist_as_plain_json() {
    let dir = TempDir::new().unwrap();
    let store = FileRecordStore::new(Some(dir.path().to_path_buf())).unwrap();
    let engine = AggregationEngine::new(&store);

    engine.accumulate("Montaña Rusa", may(1), 50).unwrap();
    engine.accumulate("Montaña Rusa", may(1), 30).unwrap();
    engine.accumulate("Montaña Rusa", may(2), 20).unwrap();

    let raw = fs::read_to_string(dir.path().join("monthly-counters.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["month"], "2024-05");
    assert_eq!(json[0]["total"], 100);
    assert_eq!(json[0]["days"]["2024-05-01"], 80);
    assert_eq!(json[0]["days"]["2024-05-02"], 20);

    let daily: Vec<DailyCounter> = store.read_all().unwrap();
    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0].date, may(1));
    assert_eq!(daily[0].count, 80);

    // Nothing staged is left behind after a commit.
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_recorded_day_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = FileRecordStore::new(Some(dir.path().to_path_buf())).unwrap();
        let mut rec = VisitorSessionRecorder::new(&store, FixedClock::at(may(4), 9, 0));
        rec.select_attraction("Carrusel").unwrap();
        rec.add_timeslot(12).unwrap();
        rec.add_timeslot(8).unwrap();
        rec.commit().unwrap();
    }

    let store = FileRecordStore::new(Some(dir.path().to_path_buf())).unwrap();
    let engine = AggregationEngine::new(&store);
    let monthly: MonthlyCounter = engine.query_monthly("Carrusel", "2024-05").unwrap().unwrap();
    assert_eq!(monthly.total, 20);
    assert_eq!(engine.query_daily_series("Carrusel", "2024-05").unwrap(), vec![("2024-05-04".to_string(), 20)]);

    let sessions: Vec<VisitorSession> = store.read_all().unwrap();
    assert_eq!(sessions[0].timeslots[0].start_time, "09:00");
    assert_eq!(sessions[0].timeslots[0].end_time, "09:15");
}

#[test]
fn test_csv_export() {
    let dir = TempDir::new().unwrap();
    let store = FileRecordStore::new(Some(dir.path().to_path_buf())).unwrap();
    let engine = AggregationEngine::new(&store);
    engine.accumulate("Rueda de Chicago", may(10), 42).unwrap();

    let filter = ReportFilter {
        attraction: Some("Rueda de Chicago".into()),
        month: Some("2024-05".into()),
        search: None,
    };
    let report = ReportService::new(&store).build(ReportKind::Statistics, &filter).unwrap();
    let sink = CsvSink::new(dir.path().join("exports"));
    let path = sink.export(&report, &report.file_name(&filter)).unwrap();

    assert!(path.ends_with("report_statistics_Rueda_de_Chicago_2024-05.csv"));
    let content = fs::read_to_string(path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines, vec!["Attraction,Date,Visitors", "Rueda de Chicago,2024-05-10,42"]);
}

fn staged_files(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("tmp"))
        .collect()
}

#[test]
fn test_failed_staging_changes_neither_counter_file() {
    let dir = TempDir::new().unwrap();
    let store = FileRecordStore::new(Some(dir.path().to_path_buf())).unwrap();
    let engine = AggregationEngine::new(&store);
    engine.accumulate("Karts", may(1), 10).unwrap();

    let daily_before = fs::read_to_string(store.path_for(Namespace::DailyCounters)).unwrap();
    let monthly_before = fs::read_to_string(store.path_for(Namespace::MonthlyCounters)).unwrap();

    // A directory where the monthly staging file goes makes the second stage fail.
    let blocker = dir.path().join("monthly-counters.json.tmp");
    fs::create_dir(&blocker).unwrap();
    let err = engine.accumulate("Karts", may(2), 5).unwrap_err();
    assert!(matches!(err, parklog_core::Error::Storage(_)));

    assert_eq!(fs::read_to_string(store.path_for(Namespace::DailyCounters)).unwrap(), daily_before);
    assert_eq!(fs::read_to_string(store.path_for(Namespace::MonthlyCounters)).unwrap(), monthly_before);
    assert!(!dir.path().join("daily-counters.json.tmp").exists());
    assert!(staged_files(dir.path()).is_empty());

    fs::remove_dir(&blocker).unwrap();
    engine.accumulate("Karts", may(2), 5).unwrap();
    assert_eq!(engine.query_monthly("Karts", "2024-05").unwrap().unwrap().total, 15);
}

#[test]
fn test_failed_commit_writes_no_session() {
    let dir = TempDir::new().unwrap();
    let store = FileRecordStore::new(Some(dir.path().to_path_buf())).unwrap();
    let mut rec = VisitorSessionRecorder::new(&store, FixedClock::at(may(7), 16, 30));
    rec.select_attraction("Yippe").unwrap();
    rec.add_timeslot(7).unwrap();

    let blocker = dir.path().join("monthly-counters.json.tmp");
    fs::create_dir(&blocker).unwrap();
    assert!(rec.commit().is_err());
    assert!(!store.path_for(Namespace::VisitorSessions).exists());
    assert!(!store.path_for(Namespace::DailyCounters).exists());
    assert!(staged_files(dir.path()).is_empty());

    fs::remove_dir(&blocker).unwrap();
    rec.commit().unwrap();
    let sessions: Vec<VisitorSession> = store.read_all().unwrap();
    assert_eq!(sessions.len(), 1);
    let monthly = AggregationEngine::new(&store).query_monthly("Yippe", "2024-05").unwrap().unwrap();
    assert_eq!(monthly.total, sessions[0].total_visitors);
}
