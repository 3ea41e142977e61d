//! Rotation against the real filesystem

use chrono::Local;
use ionlog::{info, IonLogger, LoggerConfig, RotationConfig, RotationPeriod};
use ionlog_core::rotation::naming::file_name_for;
use pretty_assertions::assert_eq;
use tests::diagnostics::init_tracing;
use tests::lines;

#[tokio::test]
async fn test_logger_writes_todays_file() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("logs");
    let logger = IonLogger::new(
        LoggerConfig::default()
            .with_targets([])
            .with_static_field("service", "rotation-test")
            .with_rotation(RotationConfig::new(&folder, RotationPeriod::Daily)),
    );

    logger.start().unwrap();
    info!(logger, "persisted");
    logger.stop().await.unwrap();

    let today = file_name_for(Local::now().date_naive());
    let text = std::fs::read_to_string(folder.join(&today)).unwrap();
    let parsed = lines::parse_text(&text);
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].msg, "persisted");
    assert_eq!(parsed[0].extra["service"], "rotation-test");
}

#[tokio::test]
async fn test_stale_file_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let stale = dir.path().join("logfile-2000-01-01.log");
    std::fs::write(&stale, "{\"msg\":\"old\"}\n").unwrap();

    let logger = IonLogger::new(
        LoggerConfig::default()
            .with_targets([])
            .with_rotation(RotationConfig::new(dir.path(), RotationPeriod::Daily)),
    );
    logger.start().unwrap();
    info!(logger, "fresh");
    logger.stop().await.unwrap();

    assert_eq!(std::fs::read_to_string(&stale).unwrap(), "{\"msg\":\"old\"}\n");
    let today = dir.path().join(file_name_for(Local::now().date_naive()));
    assert!(std::fs::read_to_string(today).unwrap().contains("\"msg\":\"fresh\""));
}

#[tokio::test]
async fn test_restart_appends_to_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let logger = IonLogger::new(
        LoggerConfig::default()
            .with_targets([])
            .with_rotation(RotationConfig::new(dir.path(), RotationPeriod::Monthly)),
    );

    logger.start().unwrap();
    info!(logger, "first run");
    logger.stop().await.unwrap();

    logger.start().unwrap();
    info!(logger, "second run");
    logger.stop().await.unwrap();

    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
    let engine = logger.rotation_engine().unwrap();
    assert!(!engine.is_open());
}
