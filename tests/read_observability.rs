use std::fs;
use std::sync::{Arc, Mutex};

use delimited_dataset::dataset::Dataset;
use delimited_dataset::ingestion::{
    BatchStats, CompositeObserver, FileObserver, LineParser, LogObserver, ReadContext, ReadObserver, ReadOptions,
    ReadSeverity, ReadStatus, Reader, ReaderConfig,
};
use delimited_dataset::types::{DataType, Metadata, Mode, Schema};
use delimited_dataset::{DatasetError, LineError, LineErrorKind};

#[derive(Default)]
struct RecordingObserver {
    rejects: Mutex<Vec<(usize, LineErrorKind)>>,
    batches: Mutex<Vec<BatchStats>>,
    failures: Mutex<Vec<ReadSeverity>>,
    alerts: Mutex<Vec<ReadSeverity>>,
}

impl ReadObserver for RecordingObserver {
    fn on_reject(&self, ctx: &ReadContext, error: &LineError) {
        self.rejects.lock().unwrap().push((ctx.line, error.kind.clone()));
    }

    fn on_batch(&self, _ctx: &ReadContext, stats: BatchStats) {
        self.batches.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _ctx: &ReadContext, severity: ReadSeverity, _error: &DatasetError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &ReadContext, severity: ReadSeverity, _error: &DatasetError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn two_field_parser() -> LineParser {
    LineParser::new(Schema::new(vec![
        Metadata::new("id", DataType::Integer).with_separator(","),
        Metadata::new("name", DataType::String),
    ]))
}

#[test]
fn observer_sees_each_reject_and_the_batch() {
    let obs = Arc::new(RecordingObserver::default());
    let options = ReadOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };
    let mut ds = Dataset::new(Mode::Rows, vec![DataType::Integer, DataType::String]);
    let mut reader = Reader::new(
        "1,a\nb\n2,c\nx,d\n".as_bytes(),
        Vec::new(),
        two_field_parser(),
        options,
    );

    assert_eq!(reader.read(&mut ds).unwrap(), (2, ReadStatus::Eof));

    let rejects = obs.rejects.lock().unwrap().clone();
    assert_eq!(rejects.len(), 2);
    assert_eq!(rejects[0], (2, LineErrorKind::MissingSeparator));
    assert_eq!(rejects[1].0, 4);
    assert!(matches!(rejects[1].1, LineErrorKind::TypeConversion { .. }));

    assert_eq!(
        obs.batches.lock().unwrap().clone(),
        vec![BatchStats {
            rows: 2,
            rejected: 2,
            status: ReadStatus::Eof
        }]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let obs = Arc::new(RecordingObserver::default());
    let mut cfg = ReaderConfig::new(dir.path().join("does_not_exist.dat"), Schema::new(Vec::new()));
    cfg.rejected = dir.path().join("rejects.dat");

    let observer: Arc<dyn ReadObserver> = obs.clone();
    let _ = Reader::open(&cfg, Some(observer)).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![ReadSeverity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![ReadSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_non_critical_error() {
    let obs = Arc::new(RecordingObserver::default());
    let options = ReadOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: ReadSeverity::Critical,
        ..Default::default()
    };
    // One declared column against a two-field parser: the push fails.
    let mut ds = Dataset::new(Mode::Rows, vec![DataType::Integer]);
    let mut reader = Reader::new("1,a\n".as_bytes(), Vec::new(), two_field_parser(), options);

    let err = reader.read(&mut ds).unwrap_err();
    assert!(matches!(err, DatasetError::ShapeMismatch { .. }));

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![ReadSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn composite_fans_out_to_file_and_log_observers() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("read.log");
    let recording = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![
        Arc::new(FileObserver::new(&log_path)),
        Arc::new(LogObserver),
        recording.clone(),
    ]);
    let options = ReadOptions {
        source: "inline".to_string(),
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };
    let mut ds = Dataset::new(Mode::Rows, vec![DataType::Integer, DataType::String]);
    let mut reader = Reader::new("1,a\nbad\n".as_bytes(), Vec::new(), two_field_parser(), options);

    reader.read(&mut ds).unwrap();

    assert_eq!(recording.rejects.lock().unwrap().len(), 1);
    let logged = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = logged.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("reject source=inline line=2 field=0 kind=missing separator"));
    assert!(lines[1].contains("ok source=inline rows=1 rejected=1 status=Eof"));
}
