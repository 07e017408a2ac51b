//! Connection integration tests.
//!
//! Tests database connectivity and error handling.

use super::common::TestDatabase;
use sqlout::config::{ConnectionConfig, OutputConfig};
use sqlout::db::{self, DatabaseBackend, PostgresClient};
use sqlout::error::SqloutError;
use sqlout::output::{OutputSink, OutputTarget};
use sqlout::runner::connect_and_run;

/// Builds a PostgreSQL config from DATABASE_URL, if set.
fn get_test_config() -> Option<ConnectionConfig> {
    let url = url::Url::parse(&std::env::var("DATABASE_URL").ok()?).ok()?;
    Some(ConnectionConfig {
        backend: DatabaseBackend::Postgres,
        host: url.host_str()?.to_string(),
        port: url.port(),
        database: url.path().strip_prefix('/').map(String::from),
        user: url.username().to_string(),
        password: url.password().unwrap_or_default().to_string(),
    })
}

#[tokio::test]
async fn test_connect_with_valid_credentials() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let client = db::connect(&config).await.unwrap();
    client.close().await.unwrap();
}

#[tokio::test]
async fn test_postgres_query_to_file() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let output = OutputSink::open(OutputTarget::File(path.clone())).unwrap();
    let output_config = OutputConfig::resolve(Some("csv"), None, true);

    let report = connect_and_run(
        &config,
        "select 1 as id, 'Alice' as name union all select 2, null order by 1",
        &output_config,
        output,
    )
    .await
    .unwrap();

    assert!(report.succeeded());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "id,name\n1,Alice\n2,\n"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_with_wrong_password() {
    let Some(mut config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    config.password = "definitely-not-the-password".to_string();

    let error = PostgresClient::connect(&config).await.err().unwrap();
    assert!(matches!(error, SqloutError::Connection(_)));
}

#[tokio::test]
async fn test_sqlite_missing_file_is_connection_error() {
    let db = TestDatabase::new();
    let config = ConnectionConfig {
        host: db.path("missing.db").display().to_string(),
        ..db.config.clone()
    };

    let error = db::connect(&config).await.err().unwrap();
    assert!(matches!(error, SqloutError::Connection(_)));
    assert_eq!(error.exit_code(), 1);
    assert!(!db.path("missing.db").exists());
}

#[tokio::test]
async fn test_sqlite_connect_and_close() {
    let db = TestDatabase::new();

    let mut client = db::connect(&db.config).await.unwrap();
    let result = client.execute_query("select 42 as answer").await.unwrap();
    assert_eq!(result.columns, vec!["answer"]);
    assert_eq!(result.rows, vec![vec![Some("42".to_string())]]);
    client.close().await.unwrap();
}
