mod common;

use assert_cmd::Command;
use common::{TestWorkspace, fixture_path};
use predicates::str::contains;

fn bin() -> Command {
    Command::cargo_bin("table-continuity").expect("binary exists")
}

#[test]
fn compare_prints_the_analysis_sections() {
    bin()
        .args(["compare", "-a"])
        .arg(fixture_path("fire_policies.csv"))
        .arg("-b")
        .arg(fixture_path("property_policies.csv"))
        .assert()
        .success()
        .stdout(contains("=== Table Comparison Overview ==="))
        .stdout(contains("Tables Match"))
        .stdout(contains("86%"))
        .stdout(contains("=== Numerical Range Comparison ==="));
}

#[test]
fn compare_emits_json() {
    let output = bin()
        .args(["compare", "--json", "-a"])
        .arg(fixture_path("fire_policies.csv"))
        .arg("-b")
        .arg(fixture_path("property_policies.csv"))
        .output()
        .expect("run compare");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["matches"], true);
    assert_eq!(json["result"]["match_percentage"], 86);
    assert_eq!(json["analysis"]["table_comparison"]["total_columns"], 9);
}

#[test]
fn threshold_flag_overrides_config_file() {
    let workspace = TestWorkspace::new();
    let config = workspace.write("options.yaml", "match_threshold: 50\n");
    let output = bin()
        .args(["compare", "--json", "--threshold", "95", "-c"])
        .arg(&config)
        .arg("-a")
        .arg(fixture_path("fire_policies.csv"))
        .arg("-b")
        .arg(fixture_path("property_policies.csv"))
        .output()
        .expect("run compare");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["matches"], false);
}

#[test]
fn aggregation_flag_counts_every_dimension() {
    let output = bin()
        .args(["compare", "--json", "--aggregation", "all-dimensions", "-a"])
        .arg(fixture_path("fire_policies.csv"))
        .arg("-b")
        .arg(fixture_path("property_policies.csv"))
        .output()
        .expect("run compare");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["result"]["header_in_table2"], false);
    let total = json["result"]["factors"]["total"].as_u64().expect("factor total");
    assert!(total > 29, "expected extra factors, got {total}");

    bin()
        .args(["compare", "--aggregation", "everything", "-a", "a.csv", "-b", "b.csv"])
        .assert()
        .failure()
        .stderr(contains("everything"));
}

#[test]
fn invalid_config_is_reported() {
    let workspace = TestWorkspace::new();
    let config = workspace.write("options.yaml", "match_treshold: 50\n");
    bin()
        .args(["compare", "-c"])
        .arg(&config)
        .arg("-a")
        .arg(fixture_path("fire_policies.csv"))
        .arg("-b")
        .arg(fixture_path("property_policies.csv"))
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn compare_reports_repeated_header() {
    let workspace = TestWorkspace::new();
    let first = workspace.write(
        "patients.csv",
        "John Doe,30,1993-05-15,john@example.com,ID123/123\n\
         Jane Smith,25,1998-09-22,jane@example.com,ID123/124\n",
    );
    bin()
        .args(["compare", "-a"])
        .arg(&first)
        .arg("-b")
        .arg(fixture_path("more_patients.csv"))
        .assert()
        .success()
        .stdout(contains("Header mismatch in table 2"));
}

#[test]
fn ragged_input_fails_with_shape_error() {
    let workspace = TestWorkspace::new();
    let ragged = workspace.write("ragged.csv", "a,b\nc\n");
    bin()
        .args(["compare", "-a"])
        .arg(&ragged)
        .arg("-b")
        .arg(&ragged)
        .assert()
        .failure()
        .stderr(contains("not rectangular"));
}

#[test]
fn header_command_classifies_first_row() {
    bin()
        .args(["header", "-i"])
        .arg(fixture_path("more_patients.csv"))
        .assert()
        .success()
        .stdout("header\n");
    bin()
        .args(["header", "-i"])
        .arg(fixture_path("property_policies.csv"))
        .assert()
        .success()
        .stdout("data\n");
}

#[test]
fn strict_command_reads_tab_separated_input() {
    let workspace = TestWorkspace::new();
    let first = workspace.write("a.tsv", "EM1\t28\nEM2\t31\n");
    let second = workspace.write("b.tsv", "EM3\t40\nEM4\t22\n");
    let dates = workspace.write("c.tsv", "EM5\t1995-03-20\nEM6\t1991-07-15\n");
    bin()
        .arg("strict")
        .arg("-a")
        .arg(&first)
        .arg("-b")
        .arg(&second)
        .assert()
        .success()
        .stdout("continuation\n");
    bin()
        .arg("strict")
        .arg("-a")
        .arg(&first)
        .arg("-b")
        .arg(&dates)
        .assert()
        .success()
        .stdout("distinct\n");
}

#[test]
fn detect_prints_type_tags() {
    bin().args(["detect", "15/04/2025"]).assert().success().stdout("date\n");
    bin()
        .args(["detect", "Jane Doe", "--taxonomy", "field"])
        .assert()
        .success()
        .stdout("name\n");
    bin()
        .args(["detect", "555-987-6543", "--taxonomy", "field"])
        .assert()
        .success()
        .stdout("phone_number\n");
}

#[test]
fn stdin_is_accepted_for_a_table() {
    bin()
        .args(["compare", "--json", "-a", "-", "-b"])
        .arg(fixture_path("fire_policies.csv"))
        .write_stdin(std::fs::read_to_string(fixture_path("fire_policies.csv")).expect("fixture"))
        .assert()
        .success()
        .stdout(contains("\"match_percentage\": 100"));
}
