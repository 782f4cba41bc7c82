//! Tests for the logging system

use super::*;
use tempfile::TempDir;

#[test]
fn test_log_level_display() {
    assert_eq!(LogLevel::Trace.to_string(), "trace");
    assert_eq!(LogLevel::Debug.to_string(), "debug");
    assert_eq!(LogLevel::Info.to_string(), "info");
    assert_eq!(LogLevel::Warn.to_string(), "warn");
    assert_eq!(LogLevel::Error.to_string(), "error");
    assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
}

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, LogLevel::Info);
    assert_eq!(config.format, LogFormat::Text);
    assert_eq!(config.output, LogOutput::Console);
    assert_eq!(config.rotation, RotationStrategy::Daily);
    assert_eq!(config.file_name, "vector-router.log");
    assert!(config.log_directory.is_none());
    assert!(config.include_target);
    assert!(!config.include_thread_id);
    assert!(!config.include_file_info);
}

#[test]
fn test_logging_config_builder() {
    let config = LoggingConfig::new()
        .with_level(LogLevel::Debug)
        .with_format(LogFormat::Json)
        .with_output(LogOutput::File)
        .with_target(false)
        .with_thread_id(true)
        .with_file_info(true)
        .with_rotation(RotationStrategy::Hourly)
        .with_module_level("vector_router::router", LogLevel::Trace);

    assert_eq!(config.level, LogLevel::Debug);
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.output, LogOutput::File);
    assert_eq!(config.rotation, RotationStrategy::Hourly);
    assert!(!config.include_target);
    assert!(config.include_thread_id);
    assert!(config.include_file_info);
    assert_eq!(
        config.module_levels.get("vector_router::router"),
        Some(&LogLevel::Trace)
    );
}

#[test]
fn test_logging_presets() {
    let dev = LoggingConfig::development();
    assert_eq!(dev.level, LogLevel::Debug);
    assert_eq!(dev.output, LogOutput::Console);
    assert!(dev.include_file_info);
    assert!(!dev.output.writes_file());

    let prod = LoggingConfig::production();
    assert_eq!(prod.format, LogFormat::Json);
    assert_eq!(prod.output, LogOutput::Both);
    assert!(prod.output.writes_file());
    assert!(prod.log_directory.is_some());
}

#[test]
fn test_filter_directives() {
    let config = LoggingConfig::new()
        .with_level(LogLevel::Warn)
        .with_module_level("vector_router", LogLevel::Debug)
        .with_module_level("reqwest", LogLevel::Error);

    assert_eq!(
        LoggingSystem::filter_directives(&config),
        "warn,reqwest=error,vector_router=debug"
    );
    assert_eq!(LoggingSystem::filter_directives(&LoggingConfig::default()), "info");
}

#[test]
fn test_logging_config_from_partial_json() {
    let config: LoggingConfig =
        serde_json::from_str(r#"{"level": "debug", "format": "json", "rotation": "never"}"#)
            .unwrap();
    assert_eq!(config.level, LogLevel::Debug);
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.rotation, RotationStrategy::Never);
    assert_eq!(config.output, LogOutput::Console);
    assert!(config.include_target);

    let err = serde_json::from_str::<LoggingConfig>(r#"{"level": "verbose"}"#);
    assert!(err.is_err());
}

#[test]
fn test_init_creates_directory_and_rejects_second_init() {
    let temp_dir = TempDir::new().unwrap();
    let log_dir = temp_dir.path().join("nested").join("logs");

    let config = LoggingConfig::new()
        .with_output(LogOutput::File)
        .with_rotation(RotationStrategy::Never)
        .with_log_directory(log_dir.clone());

    let system = LoggingSystem::init(config.clone()).unwrap();
    assert!(log_dir.is_dir());
    assert_eq!(system.log_directory(), Some(log_dir.as_path()));
    assert_eq!(system.log_level(), LogLevel::Info);

    tracing::info!("written to file");

    let err = LoggingSystem::init(config).err().unwrap();
    assert!(matches!(err, LoggingError::InitializationError(_)));
}
