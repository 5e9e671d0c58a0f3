//! Offline tests for suplink-db pool configuration.
//! These tests do not require a live database connection.

use suplink_core::{AppConfig, Environment};
use suplink_db::PoolConfig;

fn app_config(database_url: Option<&str>) -> AppConfig {
    AppConfig {
        api_base_url: None,
        database_url: database_url.map(str::to_string),
        env: Environment::Test,
        log_level: "info".to_string(),
        user_id: None,
        request_timeout_secs: 30,
        user_agent: "ua".to_string(),
        advisory_interval_ms: 10_000,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config(Some("postgres://example")));
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[tokio::test]
async fn connect_pool_from_config_requires_database_url() {
    let err = suplink_db::connect_pool_from_config(&app_config(None))
        .await
        .unwrap_err();
    assert!(matches!(err, suplink_db::DbError::MissingDatabaseUrl));
}
