//! Loading configuration from disk and starting a service from it.

use std::io::Write;

use corral_config::{ConfigError, CorralConfig};
use corral_service::Service;
use corral_types::StoreMode;

#[tokio::test]
async fn test_service_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[pool]\nsize = 2\nwork_delay_ms = 0\nstore = \"per_batch\"\n[service]\nrequest_timeout_ms = 5000"
    )
    .unwrap();

    let config = CorralConfig::load_from(file.path()).unwrap();
    assert_eq!(config.pool_size().get(), 2);
    assert_eq!(config.store_mode(), StoreMode::PerBatch);

    let service = Service::start(&config);
    let response = service.handle_process(br#"["x","y","z"]"#).await.unwrap();
    assert_eq!(response.processed.len(), 3);
    // Only two executors exist.
    assert!(
        response
            .processed
            .iter()
            .all(|r| r.starts_with("worker-1 ") || r.starts_with("worker-2 "))
    );
}

#[test]
fn test_bad_config_file_is_reported_with_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[pool\nsize = ").unwrap();

    let err = CorralConfig::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains(&file.path().display().to_string()));
}
