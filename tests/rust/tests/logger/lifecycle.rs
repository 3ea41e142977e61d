//! Start, stop and reconfiguration

use std::sync::Arc;
use std::time::Duration;

use ionlog::{
    info, IonLogger, LoggerConfig, LoggerError, RotationConfig, RotationPeriod, ServiceStatus,
};
use ionlog_core::MemoryFilesystem;
use pretty_assertions::assert_eq;
use tests::fixtures::memory_logger;
use tests::{lines, wait};

#[tokio::test]
async fn test_status_transitions() {
    let (logger, _sink) = memory_logger();
    assert_eq!(logger.status(), ServiceStatus::Stopped);
    assert_eq!(logger.rotation_status(), None);

    logger.start().unwrap();
    assert_eq!(logger.status(), ServiceStatus::Running);
    assert_eq!(logger.rotation_status(), None);

    logger.stop().await.unwrap();
    assert_eq!(logger.status(), ServiceStatus::Stopped);
}

#[tokio::test]
async fn test_rotation_status_follows_logger() {
    let logger = IonLogger::with_filesystem(
        LoggerConfig::default()
            .with_targets([])
            .with_rotation(RotationConfig::new("/logs", RotationPeriod::Weekly)),
        Arc::new(MemoryFilesystem::new()),
    );

    logger.start().unwrap();
    assert_eq!(logger.rotation_status(), Some(ServiceStatus::Running));
    logger.stop().await.unwrap();
    assert_eq!(logger.rotation_status(), None);
}

#[tokio::test]
async fn test_consumer_writes_without_flush() {
    let (logger, sink) = memory_logger();
    logger.start().unwrap();
    info!(logger, "eventually");

    assert!(wait::until(Duration::from_secs(2), || sink.lines().len() == 1).await);
    logger.stop().await.unwrap();
}

#[tokio::test]
async fn test_clones_share_the_logger() {
    let (logger, sink) = memory_logger();
    let clone = logger.clone();
    logger.start().unwrap();

    info!(clone, "from clone");
    assert_eq!(clone.status(), ServiceStatus::Running);
    logger.stop().await.unwrap();

    assert_eq!(lines::messages(&sink), vec!["from clone"]);
}

#[tokio::test]
async fn test_configuration_is_locked_while_running() {
    let (logger, _sink) = memory_logger();
    logger.start().unwrap();

    assert!(matches!(
        logger.set_queue_capacity(5),
        Err(LoggerError::AlreadyRunning)
    ));
    assert!(matches!(
        logger.add_static_fields([("k".to_string(), "v".to_string())]),
        Err(LoggerError::AlreadyRunning)
    ));
    assert!(logger.static_fields().is_empty());

    logger.stop().await.unwrap();
    logger.set_queue_capacity(5).unwrap();
    assert_eq!(logger.config().queue_capacity, 5);
}

#[test]
fn test_rotate_now_without_rotation() {
    let (logger, _sink) = memory_logger();
    assert!(matches!(
        logger.rotate_now(),
        Err(LoggerError::RotationNotConfigured)
    ));
}

#[test]
fn test_start_outside_runtime() {
    let (logger, _sink) = memory_logger();
    assert!(matches!(logger.start(), Err(LoggerError::NoRuntime)));
}
