//! Call-site capture and formatting through the macros

use ionlog::{debug, error, info, log_panic, trace, warn, Level, LoggerConfig};
use pretty_assertions::assert_eq;
use tests::fixtures::{memory_logger, memory_logger_with};
use tests::lines;

fn log_from_helper(logger: &ionlog::IonLogger) {
    info!(logger, "from helper");
}

#[test]
fn test_macros_capture_call_site() {
    let (logger, sink) = memory_logger();
    let line = line!() + 1;
    warn!(logger, "disk at {}%", 91);
    logger.flush();

    let parsed = lines::parse(&sink);
    assert_eq!(parsed.len(), 1);
    let record = &parsed[0];
    assert_eq!(record.msg, "disk at 91%");
    assert_eq!(record.level, Level::Warn);
    assert_eq!(record.function, "test_macros_capture_call_site");
    assert_eq!(record.package, "macros");
    assert_eq!(record.file, "macros.rs");
    assert_eq!(record.line_number(), Some(line));
}

#[test]
fn test_helper_function_is_reported() {
    let (logger, sink) = memory_logger();
    log_from_helper(&logger);
    logger.flush();

    let parsed = lines::parse(&sink);
    assert_eq!(parsed[0].function, "log_from_helper");
}

#[test]
fn test_levels_in_order() {
    let (logger, sink) = memory_logger();
    debug!(logger, "d");
    info!(logger, "i");
    warn!(logger, "w");
    error!(logger, "e");
    logger.flush();

    let levels: Vec<Level> = lines::parse(&sink).into_iter().map(|l| l.level).collect();
    assert_eq!(levels, vec![Level::Debug, Level::Info, Level::Warn, Level::Error]);
}

#[test]
fn test_static_fields_on_every_line() {
    let (logger, sink) = memory_logger_with(
        LoggerConfig::default()
            .with_static_field("service", "billing")
            .with_static_field("region", "eu-west"),
    );
    info!(logger, "one");
    error!(logger, "two");
    logger.flush();

    let parsed = lines::parse(&sink);
    assert_eq!(parsed.len(), 2);
    for line in &parsed {
        assert_eq!(line.extra["service"], "billing");
        assert_eq!(line.extra["region"], "eu-west");
    }
    assert!(sink.lines()[0].starts_with("{\"region\":\"eu-west\",\"service\":\"billing\","));
}

#[test]
fn test_trace_mode_toggles_immediately() {
    let (logger, sink) = memory_logger();
    trace!(logger, "hidden");
    assert!(sink.lines().is_empty());

    logger.set_trace_mode(true);
    // trace lines are written synchronously
    trace!(logger, "visible");
    assert_eq!(lines::messages(&sink), vec!["visible"]);

    logger.log(Level::Trace, ionlog::caller!(), "through log");
    assert_eq!(lines::messages(&sink), vec!["visible", "through log"]);

    logger.set_trace_mode(false);
    trace!(logger, "hidden again");
    assert_eq!(sink.lines().len(), 2);
}

#[test]
fn test_trace_mode_from_config() {
    let (logger, sink) = memory_logger_with(LoggerConfig::default().with_trace_mode(true));
    assert!(logger.trace_mode());
    trace!(logger, "on from the start");
    assert_eq!(lines::messages(&sink), vec!["on from the start"]);
}

#[test]
fn test_log_panic_flushes_queue_first() {
    let (logger, sink) = memory_logger();
    info!(logger, "before");

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        log_panic!(logger, "invariant broken: {}", "x < 0");
    }));
    assert!(result.is_err());

    let parsed = lines::parse(&sink);
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].msg, "before");
    assert_eq!(parsed[1].msg, "invariant broken: x < 0");
    assert_eq!(parsed[1].level, Level::Panic);
}

#[test]
#[should_panic(expected = "unrecoverable")]
fn test_log_panic_panics() {
    let (logger, _sink) = memory_logger();
    log_panic!(logger, "unrecoverable");
}
