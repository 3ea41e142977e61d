//! Records come out in the order they went in

use std::thread;

use ionlog::{info, Level};
use pretty_assertions::assert_eq;
use tests::diagnostics::init_tracing;
use tests::fixtures::memory_logger;
use tests::lines;

#[tokio::test]
async fn test_single_producer_fifo() {
    init_tracing();
    let (logger, sink) = memory_logger();
    logger.start().unwrap();

    for i in 0..500 {
        info!(logger, "record {}", i);
    }
    logger.stop().await.unwrap();

    let expected: Vec<String> = (0..500).map(|i| format!("record {i}")).collect();
    assert_eq!(lines::messages(&sink), expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_each_producer_keeps_its_order() {
    init_tracing();
    let (logger, sink) = memory_logger();
    logger.start().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|producer| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    info!(logger, "p{}-{}", producer, i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.stop().await.unwrap();

    let messages = lines::messages(&sink);
    assert_eq!(messages.len() as u64 + logger.dropped_reports(), 400);

    for producer in 0..4 {
        let prefix = format!("p{producer}-");
        let seq: Vec<u32> = messages
            .iter()
            .filter_map(|m| m.strip_prefix(&prefix))
            .map(|n| n.parse().unwrap())
            .collect();
        assert!(seq.windows(2).all(|w| w[0] < w[1]), "producer {producer} out of order");
    }
}

#[tokio::test]
async fn test_flush_writes_without_stopping() {
    let (logger, sink) = memory_logger();
    logger.start().unwrap();

    logger.log(Level::Warn, ionlog::caller!(), "flushed");
    logger.flush();

    assert!(lines::messages(&sink).contains(&"flushed".to_string()));
    assert_eq!(logger.status(), ionlog::ServiceStatus::Running);
    logger.stop().await.unwrap();
}

#[tokio::test]
async fn test_records_queued_before_start_are_written() {
    let (logger, sink) = memory_logger();
    info!(logger, "early");

    logger.start().unwrap();
    logger.stop().await.unwrap();

    assert_eq!(lines::messages(&sink), vec!["early"]);
}

#[tokio::test]
async fn test_reports_after_stop_are_ignored() {
    let (logger, sink) = memory_logger();
    logger.start().unwrap();
    logger.stop().await.unwrap();

    info!(logger, "late");
    logger.flush();

    assert!(sink.lines().is_empty());
}
