//! CLI command flows over a realistic CRM export.

use std::io::Write;

use tempfile::TempDir;

fn write_crm_csv(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("pipeline.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Deal ID,Deal Name,Deal Amount,Stage,Close_Date,Created_Date,Owner").unwrap();
    writeln!(file, "D-1,Acme renewal,\"$12,000\",closed won,2024-03-01,2024-01-01,Ann").unwrap();
    writeln!(file, "D-2,Globex pilot,\"$8,500\",closed lost,2024-02-15,2024-01-10,Bo").unwrap();
    writeln!(file, "D-3,Initech expansion,\"$20,000\",negotiation,,2024-02-01,Ann").unwrap();
    writeln!(file, "D-3,Initech expansion,\"$20,000\",negotiation,,2024-02-01,Ann").unwrap();
    path
}

#[test]
fn analyze_runs_the_full_pipeline() {
    let dir = TempDir::new().unwrap();
    let path = write_crm_csv(&dir);

    let result = dealiq_cli::commands::analyze::run(&path);
    assert_eq!(result.exit_code, 0);

    let json: serde_json::Value = serde_json::from_str(&result.output).unwrap();
    assert_eq!(json["command"], "analyze");
    assert_eq!(json["status"], "ok");

    let data = &json["data"];
    assert_eq!(data["rows_loaded"], 4);
    // the duplicated D-3 row is removed by cleaning
    assert_eq!(data["rows_after_cleaning"], 3);
    assert_eq!(data["schema"]["amount"], "Deal Amount");
    assert_eq!(data["schema"]["stage"], "Stage");
    assert_eq!(data["metrics"]["total_pipeline_value"], 40500.0);
    assert_eq!(data["metrics"]["win_rate"], 0.5);
    assert_eq!(data["metrics"]["deals_by_stage"]["Negotiation"], 1);
    assert_eq!(data["profile"]["total_rows"], 3);
}

#[test]
fn schema_command_reports_mapped_columns() {
    let dir = TempDir::new().unwrap();
    let path = write_crm_csv(&dir);

    let result = dealiq_cli::commands::schema::run(&path);
    assert_eq!(result.exit_code, 0);

    let json: serde_json::Value = serde_json::from_str(&result.output).unwrap();
    assert_eq!(json["data"]["schema"]["owner"], "Owner");
    assert_eq!(json["data"]["schema"]["close_date"], "Close_Date");
}

#[test]
fn analyze_of_missing_file_fails_with_typed_error() {
    let result = dealiq_cli::commands::analyze::run(std::path::Path::new("no/such/file.csv"));
    assert_eq!(result.exit_code, 1);

    let json: serde_json::Value = serde_json::from_str(&result.output).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["error_class"], "ingest");
}
