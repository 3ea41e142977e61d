//! A panicking sink ends the consumer without taking the process down

use std::sync::Arc;
use std::time::Duration;

use ionlog::{info, IonLogger, LoggerConfig, ServiceStatus, SharedSink};
use tests::diagnostics::init_tracing;
use tests::{wait, PanickingSink};

#[tokio::test]
async fn test_consumer_panic_is_contained() {
    init_tracing();
    let logger = IonLogger::new(
        LoggerConfig::default().with_targets([Arc::new(PanickingSink) as SharedSink]),
    );
    logger.start().unwrap();

    info!(logger, "this write panics");

    let stopped = wait::until(Duration::from_secs(2), || {
        logger.status() == ServiceStatus::Stopped
    })
    .await;
    assert!(stopped, "consumer should stop after the panic");

    // Further async reports are rejected rather than queued forever
    info!(logger, "ignored");
    logger.stop().await.unwrap();
    assert_eq!(logger.dropped_reports(), 0);
}
