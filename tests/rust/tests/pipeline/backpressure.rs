//! A full queue drops records instead of blocking callers

use std::sync::Arc;
use std::time::{Duration, Instant};

use ionlog::{info, IonLogger, LoggerConfig, SharedSink};
use tests::diagnostics::init_tracing;
use tests::fixtures::memory_logger_with;
use tests::{lines, SlowSink};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_sink_causes_drops_not_blocking() {
    init_tracing();
    let sink = Arc::new(SlowSink::new(Duration::from_millis(20)));
    let logger = IonLogger::new(
        LoggerConfig::default()
            .with_targets([Arc::clone(&sink) as SharedSink])
            .with_queue_capacity(1)
            .with_backpressure_timeout(Duration::from_millis(1)),
    );
    logger.start().unwrap();

    let started = Instant::now();
    for i in 0..50 {
        info!(logger, "burst {}", i);
    }
    let elapsed = started.elapsed();
    logger.stop().await.unwrap();

    assert!(logger.dropped_reports() > 0);
    assert_eq!(sink.written() as u64 + logger.dropped_reports(), 50);
    // 50 calls at a 1ms timeout each stay far below 50 sink writes of 20ms
    assert!(elapsed < Duration::from_millis(50 * 20), "callers blocked for {elapsed:?}");
}

#[tokio::test]
async fn test_consumer_runs_beside_a_current_thread_runtime() {
    init_tracing();
    let (logger, sink) = memory_logger_with(
        LoggerConfig::default()
            .with_queue_capacity(10)
            .with_backpressure_timeout(Duration::from_millis(200)),
    );
    logger.start().unwrap();

    for i in 0..50 {
        info!(logger, "record {}", i);
    }
    logger.stop().await.unwrap();

    assert_eq!(logger.dropped_reports(), 0);
    let expected: Vec<String> = (0..50).map(|i| format!("record {i}")).collect();
    assert_eq!(lines::messages(&sink), expected);
}

#[test]
fn test_queue_capacity_only_changes_while_stopped() {
    let logger = IonLogger::new(LoggerConfig::default().with_targets([]));
    logger.set_queue_capacity(8).unwrap();
    assert_eq!(logger.config().queue_capacity, 8);

    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        logger.start().unwrap();
        assert!(matches!(
            logger.set_queue_capacity(16),
            Err(ionlog::LoggerError::AlreadyRunning)
        ));
        logger.stop().await.unwrap();
    });
    assert_eq!(logger.config().queue_capacity, 8);
}
