//! Statement execution tests.
//!
//! Run full statements through the runner against a real SQLite file and
//! check the exact bytes written to the output.

use super::common::{read, TestDatabase};
use pretty_assertions::assert_eq;
use sqlout::config::OutputConfig;
use sqlout::error::SqloutError;
use sqlout::output::{OutputSink, OutputTarget};
use sqlout::runner::{connect_and_run, RunReport};

async fn run_to_file(db: &TestDatabase, sql: &str, config: &OutputConfig) -> (RunReport, String) {
    let path = db.path("out.txt");
    let output = OutputSink::open(OutputTarget::File(path.clone())).unwrap();
    let report = connect_and_run(&db.config, sql, config, output)
        .await
        .unwrap();
    (report, read(&path))
}

async fn seed(db: &TestDatabase) {
    let config = OutputConfig::default();
    for sql in [
        "create table people (id integer primary key, name text)",
        "insert into people (id, name) values (1, 'Alice'), (2, NULL)",
    ] {
        let (report, _) = run_to_file(db, sql, &config).await;
        assert!(report.succeeded(), "seeding failed: {sql}");
    }
}

#[tokio::test]
async fn test_csv_with_header() {
    let db = TestDatabase::new();
    seed(&db).await;

    let config = OutputConfig::resolve(Some("csv"), None, true);
    let (report, output) =
        run_to_file(&db, "select id, name from people order by id", &config).await;

    assert_eq!(report.lines_written, 3);
    assert_eq!(output, "id,name\n1,Alice\n2,\n");
}

#[tokio::test]
async fn test_text_without_header() {
    let db = TestDatabase::new();
    seed(&db).await;

    let config = OutputConfig::resolve(Some("text"), None, false);
    let (_, output) = run_to_file(&db, "select id, name from people order by id", &config).await;

    assert_eq!(output, "1\tAlice\n2\t\n");
}

#[tokio::test]
async fn test_explicit_delimiter_overrides_format() {
    let db = TestDatabase::new();
    seed(&db).await;

    let config = OutputConfig::resolve(Some("csv"), Some("|"), true);
    let (_, output) = run_to_file(&db, "select id, name from people order by id", &config).await;

    assert_eq!(output, "id|name\n1|Alice\n2|\n");
}

#[tokio::test]
async fn test_empty_result_without_header() {
    let db = TestDatabase::new();
    seed(&db).await;

    let config = OutputConfig::resolve(Some("csv"), None, false);
    let (report, output) =
        run_to_file(&db, "select id, name from people where id > 100", &config).await;

    assert!(report.succeeded());
    assert_eq!(report.lines_written, 0);
    assert_eq!(output, "");
}

#[tokio::test]
async fn test_empty_result_with_header() {
    let db = TestDatabase::new();
    seed(&db).await;

    let config = OutputConfig::resolve(Some("csv"), None, true);
    let (_, output) =
        run_to_file(&db, "select id, name from people where id > 100", &config).await;

    assert_eq!(output, "id,name\n");
}

#[tokio::test]
async fn test_mutating_statements_report_affected_rows() {
    let db = TestDatabase::new();
    seed(&db).await;
    let config = OutputConfig::resolve(Some("csv"), None, true);

    let (_, output) = run_to_file(&db, "UPDATE people SET name = 'Bob' WHERE id = 2", &config).await;
    assert_eq!(output, "update is executed. 1 rows affected.\n");

    let (_, output) = run_to_file(&db, "Delete from people", &config).await;
    assert_eq!(output, "delete is executed. 2 rows affected.\n");

    let (_, output) = run_to_file(&db, "drop table people", &config).await;
    assert_eq!(output, "drop is executed. 0 rows affected.\n");
}

#[tokio::test]
async fn test_column_aliases_used_as_header() {
    let db = TestDatabase::new();

    let config = OutputConfig::resolve(None, None, true);
    let (_, output) = run_to_file(&db, "select 1 as one, 'x' as letter", &config).await;

    assert_eq!(output, "one\tletter\n1\tx\n");
}

#[tokio::test]
async fn test_statement_error_is_reported_not_fatal() {
    let db = TestDatabase::new();

    let config = OutputConfig::default();
    let (report, output) = run_to_file(&db, "select * from nonexistent_table_xyz", &config).await;

    let error = report.statement_error.expect("statement error");
    assert!(matches!(error, SqloutError::Statement { .. }));
    assert_eq!(error.exit_code(), 0);
    assert!(error.report().contains("nonexistent_table_xyz"));
    assert_eq!(output, "");
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let db = TestDatabase::new();
    seed(&db).await;

    let config = OutputConfig::resolve(Some("csv"), None, true);
    let sql = "select id, name from people order by id";
    let (_, first) = run_to_file(&db, sql, &config).await;
    let (_, second) = run_to_file(&db, sql, &config).await;

    assert_eq!(first, second);
}
