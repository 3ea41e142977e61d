//! Filesystem faults leave the current file in place

use std::path::Path;
use std::sync::Arc;

use ionlog_core::filesystem::Filesystem;
use ionlog_core::{MemoryFilesystem, RotationEngine, RotationError, RotationPeriod, Sink, KB};
use tests::diagnostics::init_tracing;
use tests::fixtures::date;
use tests::FlakyFilesystem;

fn engine(fs: &FlakyFilesystem, max: u64) -> RotationEngine {
    RotationEngine::with_filesystem("/logs", RotationPeriod::Daily, max, Arc::new(fs.clone()))
}

#[test]
fn test_failed_rotation_keeps_previous_file() {
    init_tracing();
    let fs = FlakyFilesystem::new(MemoryFilesystem::new());
    let engine = engine(&fs, 0);

    engine.rotate_at(date(2024, 6, 1)).unwrap();
    fs.fail_create(true);

    let err = engine.rotate_at(date(2024, 6, 2)).unwrap_err();
    assert!(matches!(err, RotationError::CreateFile { .. }));
    assert_eq!(engine.active_file_name().as_deref(), Some("logfile-2024-06-01.log"));

    engine.write(b"still here\n").unwrap();
    assert_eq!(
        fs.memory().read_to_string("/logs/logfile-2024-06-01.log").unwrap(),
        "still here\n"
    );

    fs.fail_create(false);
    engine.rotate_at(date(2024, 6, 2)).unwrap();
    assert_eq!(engine.active_file_name().as_deref(), Some("logfile-2024-06-02.log"));
}

#[test]
fn test_unreadable_folder_is_reported() {
    let memory = MemoryFilesystem::new().with_file("/logs/logfile-2024-06-01.log", "");
    let fs = FlakyFilesystem::new(memory);
    let engine = engine(&fs, 0);
    fs.fail_read_dir(true);

    let err = engine.rotate_at(date(2024, 6, 1)).unwrap_err();
    assert!(matches!(err, RotationError::ReadFolder { .. }));
    assert!(!engine.is_open());

    // auto checks log the failure instead of returning it
    engine.auto_checks_at(date(2024, 6, 1));
    assert!(!engine.is_open());
}

#[test]
fn test_folder_status_failure() {
    let fs = FlakyFilesystem::new(MemoryFilesystem::new());
    fs.fail_stat(true);
    let engine = engine(&fs, 0);

    let err = engine.rotate_at(date(2024, 6, 1)).unwrap_err();
    assert!(matches!(err, RotationError::CheckFolder { .. }));
    assert!(!fs.memory().exists("/logs"));
}

#[test]
fn test_failed_eviction_keeps_files() {
    let fs = FlakyFilesystem::new(
        MemoryFilesystem::new()
            .with_file("/logs/logfile-2024-06-01.log", vec![b'x'; 2048])
            .with_file("/logs/logfile-2024-06-02.log", ""),
    );
    let engine = engine(&fs, KB);
    engine.rotate_at(date(2024, 6, 2)).unwrap();
    fs.fail_remove(true);

    let err = engine.enforce_folder_size_at(date(2024, 6, 2)).unwrap_err();
    assert!(matches!(err, RotationError::RemoveFile { .. }));
    assert!(fs.memory().exists("/logs/logfile-2024-06-01.log"));
    assert!(engine.is_open());
}

#[test]
fn test_folder_path_that_is_a_file() {
    let fs = FlakyFilesystem::new(MemoryFilesystem::new().with_file("/logs", "not a folder"));
    let engine = engine(&fs, 0);

    let err = engine.rotate_at(date(2024, 6, 1)).unwrap_err();
    assert!(matches!(err, RotationError::CheckFolder { .. }));
    assert!(fs.stat(Path::new("/logs")).is_ok());
}

#[test]
fn test_future_dated_file_does_not_reopen_today_every_tick() {
    let memory = MemoryFilesystem::new().with_file("/logs/logfile-2030-01-01.log", "");
    let fs = FlakyFilesystem::new(memory);
    let engine = engine(&fs, 0);

    engine.rotate_at(date(2024, 6, 1)).unwrap();
    assert_eq!(engine.active_file_name().as_deref(), Some("logfile-2024-06-01.log"));

    // a second create would fail; the open file must be kept instead
    fs.fail_create(true);
    engine.rotate_at(date(2024, 6, 1)).unwrap();
    assert_eq!(engine.active_file_name().as_deref(), Some("logfile-2024-06-01.log"));
    assert!(engine.is_open());
}
