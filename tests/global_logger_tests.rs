//! Tests of the process-wide logger, the free-function entry points and the
//! formatting macros.
//!
//! There is one global logger per process, so every check that touches it
//! lives in a single test to keep them ordered.

use std::sync::Arc;

use regex::Regex;
use vsdk_log::{
    CaptureSink, Channel, ENTRY_POINT_DEPTH, Level, LogError, Logger, LoggerConfig,
    MemorySettings, SurfaceCapabilities, VERBOSITY_KEY,
};

const PROJECT_ROOT: &str = "/root-of-project";

fn linked_config() -> LoggerConfig {
    LoggerConfig {
        capabilities: Some(SurfaceCapabilities {
            supports_timestamp_prefix: true,
            supports_clickable_links: true,
            supports_color: false,
        }),
        project_root: Some(PROJECT_ROOT.into()),
        ..LoggerConfig::default()
    }
}

fn link_to(line: u32) -> String {
    format!("\x1b]8;;file://{PROJECT_ROOT}/tests/global_logger_tests.rs#{line}\x1b\\")
}

/// Records with their OSC 8 link wrappers removed.
fn unlinked(records: Vec<(Channel, String)>) -> Vec<(Channel, String)> {
    let osc8 = Regex::new(r"\x1b\]8;;[^\x1b]*\x1b\\").unwrap();
    records
        .into_iter()
        .map(|(channel, text)| (channel, osc8.replace_all(&text, "").into_owned()))
        .collect()
}

fn install() -> Arc<CaptureSink> {
    let sink = Arc::new(CaptureSink::new());
    let config = linked_config();
    let settings = Arc::new(MemorySettings::with_value(VERBOSITY_KEY, "Info"));
    vsdk_log::init(Logger::new(&config, sink.clone(), settings)).expect("first init succeeds");
    sink
}

#[test]
fn test_global_logger_entry_points() {
    let sink = install();

    // A second init is rejected.
    let again = Logger::new(
        &LoggerConfig::default(),
        Arc::new(CaptureSink::new()),
        Arc::new(MemorySettings::new()),
    );
    assert!(matches!(
        vsdk_log::init(again),
        Err(LogError::AlreadyInitialized)
    ));

    // Free functions infer the category from this file.
    vsdk_log::warn("disk almost full");
    vsdk_log::info_in("Net", "heartbeat");
    vsdk_log::debug("tick");
    vsdk_log::error_with("Store", "save failed", "permission denied");
    vsdk_log::log(Level::Log, "", None, None);

    assert_eq!(
        unlinked(sink.take()),
        vec![
            (
                Channel::Warning,
                "[WARNING] [VSDK global_logger_tests] disk almost full".to_string()
            ),
            (Channel::Standard, "[INFO] [VSDK Net] heartbeat".to_string()),
            (
                Channel::Standard,
                "[LOG] [VSDK global_logger_tests] tick".to_string()
            ),
            (
                Channel::Error,
                "[ERROR] [VSDK Store] save failed\npermission denied".to_string()
            ),
            (
                Channel::Standard,
                "[LOG] [VSDK global_logger_tests] ".to_string()
            ),
        ]
    );

    // Macros use the module path and format lazily.
    vsdk_log::vsdk_warn!("retrying in {}s", 5);
    vsdk_log::vsdk_error!(category: "Net", "socket closed: {}", "EOF");
    vsdk_log::vsdk_log!(Level::Info, "level {}", "explicit");
    assert_eq!(
        unlinked(sink.take()),
        vec![
            (
                Channel::Warning,
                "[WARNING] [VSDK global_logger_tests] retrying in 5s".to_string()
            ),
            (
                Channel::Error,
                "[ERROR] [VSDK Net] socket closed: EOF".to_string()
            ),
            (
                Channel::Standard,
                "[INFO] [VSDK global_logger_tests] level explicit".to_string()
            ),
        ]
    );

    // Filtered macro calls never evaluate their arguments.
    vsdk_log::logger().set_verbosity(Level::Error).unwrap();
    let mut evaluated = false;
    vsdk_log::vsdk_info!("{}", {
        evaluated = true;
        "x"
    });
    assert!(!evaluated);
    assert!(sink.is_empty());
    vsdk_log::logger().set_verbosity(Level::Info).unwrap();

    // The free function, three `#[track_caller]` layers deep, links the
    // line that called it.
    let expected_line = line!() + 1;
    vsdk_log::info("where am I");
    let records = sink.take();
    assert_eq!(records.len(), 1);
    assert!(records[0].1.contains(&link_to(expected_line)), "{:?}", records[0].1);

    // The hook sees the record produced through the deepest entry point.
    let hook = vsdk_log::logger().hooks().register(|record, _, _| {
        let line = record.as_str().to_string();
        record.text_mut().clear();
        record.push_str(&line.replace("[VSDK ", "[HOOKED "));
    });
    vsdk_log::warn("via hook");
    vsdk_log::logger().hooks().unregister(hook);
    assert_eq!(
        unlinked(sink.take()),
        vec![(
            Channel::Warning,
            "[WARNING] [HOOKED global_logger_tests] via hook".to_string()
        )]
    );
}

#[test]
fn test_entry_point_depth_matches_call_chain() {
    // free function -> Logger shorthand -> CallSite::caller
    assert_eq!(ENTRY_POINT_DEPTH, 3);

    // Two layers: the Logger shorthand called directly.
    let sink = Arc::new(CaptureSink::new());
    let logger = Logger::new(
        &linked_config(),
        sink.clone(),
        Arc::new(MemorySettings::with_value(VERBOSITY_KEY, "Info")),
    );

    let expected_line = line!() + 1;
    logger.info("where am I");

    let text = &sink.records()[0].1;
    assert!(text.contains(&link_to(expected_line)), "{text:?}");
    assert!(text.contains("[VSDK global_logger_tests]"));
}
