//! "Log once" and "log on change" from real call sites

use std::sync::Arc;
use std::thread;

use ionlog::{error_on_change, info_once, warn_once, warn_on_change, CallerInfo, Level};
use ionlog_core::{log_once, RecordHistory};
use pretty_assertions::assert_eq;
use tests::fixtures::memory_logger;
use tests::lines;

#[test]
fn test_once_macro_in_a_loop_logs_once() {
    let (logger, sink) = memory_logger();

    for i in 0..5 {
        info_once!(logger, "iteration {}", i);
    }
    logger.flush();

    assert_eq!(lines::messages(&sink), vec!["iteration 0"]);
}

#[test]
fn test_identical_text_at_two_sites_is_logged_twice() {
    let (logger, sink) = memory_logger();

    warn_once!(logger, "disk nearly full");
    warn_once!(logger, "disk nearly full");
    logger.flush();

    assert_eq!(sink.lines().len(), 2);
}

#[test]
fn test_on_change_macro_sequence() {
    let (logger, sink) = memory_logger();

    for state in ["up", "up", "down", "down", "up"] {
        warn_on_change!(logger, "link {}", state);
    }
    logger.flush();

    assert_eq!(lines::messages(&sink), vec!["link up", "link down", "link up"]);
}

#[test]
fn test_on_change_keeps_level() {
    let (logger, sink) = memory_logger();

    error_on_change!(logger, "failing");
    logger.flush();

    let line = &lines::parse(&sink)[0];
    assert_eq!(line.level, Level::Error);
}

#[test]
fn test_concurrent_once_from_one_site_logs_once() {
    let history = Arc::new(RecordHistory::new());
    let site = CallerInfo::new("worker", "run", "worker.rs", 12);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let history = Arc::clone(&history);
            let site = site.clone();
            thread::spawn(move || log_once(&history, &site, &format!("from {i}")))
        })
        .collect();

    let allowed = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|allowed| *allowed)
        .count();
    assert_eq!(allowed, 1);
}

#[test]
fn test_logger_history_is_per_instance() {
    let (first, _) = memory_logger();
    let (second, _) = memory_logger();
    let site = CallerInfo::new("app", "main", "main.rs", 1);

    assert!(first.log_once(Level::Info, site.clone(), "hi"));
    assert!(second.log_once(Level::Info, site.clone(), "hi"));
    assert!(!first.log_once(Level::Info, site, "hi"));
    assert_eq!(first.history().len(), 1);
}
