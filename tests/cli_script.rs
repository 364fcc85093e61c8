use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn script(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("smart_budget_cli").expect("binary built");
    cmd.env("SMART_BUDGET_CLI_SCRIPT", "1")
        .env("SMART_BUDGET_HOME", home.path())
        .env("NO_COLOR", "1")
        .current_dir(home.path());
    cmd
}

#[test]
fn script_mode_records_lists_and_totals() {
    let home = TempDir::new().expect("temp dir");
    script(&home)
        .write_stdin(
            "add expense 1000 Housing 2024-05-01 rent\n\
             add income 500 Salary 2024-05-02\n\
             list\n\
             exit\n",
        )
        .assert()
        .success()
        .stdout(contains("Expense added successfully!"))
        .stdout(contains("-$1,000.00"))
        .stdout(contains("Balance: -$500.00"));

    assert!(home.path().join("data").join("expenses.json").exists());
}

#[test]
fn validation_failures_are_reported_without_aborting() {
    let home = TempDir::new().expect("temp dir");
    script(&home)
        .write_stdin("add expense abc \"\" 2024-05-01\nlist\n")
        .assert()
        .success()
        .stdout(contains("Please enter a valid amount."))
        .stdout(contains("Please select a category."))
        .stdout(contains("No history found."));
}

#[test]
fn burst_of_searches_applies_only_the_last() {
    let home = TempDir::new().expect("temp dir");
    script(&home)
        .write_stdin(
            "add expense 5 Food 2024-05-01 coffee\n\
             search c\nsearch co\nsearch coffee\n\
             list\n",
        )
        .assert()
        .success()
        .stdout(contains("Search: `coffee`"))
        .stdout(contains("Search: `co`").not());
}

#[test]
fn edit_flow_replaces_the_staged_entry() {
    let home = TempDir::new().expect("temp dir");
    script(&home)
        .write_stdin(
            "add income 100 Gift 2024-05-01\n\
             edit income 0\n\
             submit income 150 Gift 2024-05-01 birthday\n\
             list\n",
        )
        .assert()
        .success()
        .stdout(contains("Income updated successfully!"))
        .stdout(contains("+$150.00"))
        .stdout(contains("+$100.00").not());
}

#[test]
fn report_export_writes_month_named_file() {
    let home = TempDir::new().expect("temp dir");
    script(&home)
        .write_stdin(
            "add expense 20 Food 2024-05-01\n\
             add expense 30 Food 2024-05-09\n\
             month 2024-05\n\
             export report\n\
             export history history.csv\n",
        )
        .assert()
        .success()
        .stdout(contains("Exported 1 rows"));

    let report = std::fs::read_to_string(home.path().join("smart-budget-report-2024-05.csv"))
        .expect("report file");
    assert_eq!(report, "Category,Expenses,Income\nFood,50.00,0.00");

    let history = std::fs::read_to_string(home.path().join("history.csv")).expect("history file");
    assert!(history.starts_with("Date,Category,Note,Amount,Type\n2024-05-01,Food,,20.00,expense"));
}

#[test]
fn history_export_ignores_the_list_filters() {
    let home = TempDir::new().expect("temp dir");
    script(&home)
        .write_stdin(
            "add income 500 Salary 2024-05-02\n\
             add expense 20 Food 2024-05-01\n\
             type expense\n\
             search nothing-matches\n\
             list\n\
             export history\n",
        )
        .assert()
        .success()
        .stdout(contains("No history found."))
        .stdout(contains("Exported 2 rows"));

    let history = std::fs::read_to_string(home.path().join("smart-budget-history.csv"))
        .expect("history file");
    assert_eq!(
        history,
        "Date,Category,Note,Amount,Type\n\
         2024-05-01,Food,,20.00,expense\n\
         2024-05-02,Salary,,500.00,income"
    );
}

#[test]
fn dashboard_shows_totals_and_the_five_newest_entries() {
    let home = TempDir::new().expect("temp dir");
    script(&home)
        .write_stdin("dashboard\n")
        .assert()
        .success()
        .stdout(contains("No entries yet."));

    script(&home)
        .write_stdin(
            "add expense 1 Food 2024-05-01\n\
             add expense 2 Food 2024-05-02\n\
             add expense 3 Food 2024-05-03\n\
             add income 40 Gift 2024-05-04\n\
             add expense 5 Food 2024-05-05\n\
             add expense 6 Food 2024-05-06\n\
             dashboard\n",
        )
        .assert()
        .success()
        .stdout(contains("Recent activity"))
        .stdout(contains("Balance: $23.00"))
        .stdout(contains("2024-05-06"))
        .stdout(contains("+$40.00"))
        .stdout(contains("2024-05-01").not());
}

#[test]
fn report_search_filters_categories_only() {
    let home = TempDir::new().expect("temp dir");
    script(&home)
        .write_stdin(
            "add expense 10 Food 2024-05-01\n\
             add expense 20 Transport 2024-05-02 food run\n\
             month 2024-05\n\
             report-search foo\n\
             report\n",
        )
        .assert()
        .success()
        .stdout(contains("Report search: `foo`"))
        .stdout(contains("Food"))
        .stdout(contains("Transport").not());
}

#[test]
fn empty_exports_are_declined() {
    let home = TempDir::new().expect("temp dir");
    script(&home)
        .write_stdin("export history\n")
        .assert()
        .success()
        .stdout(contains("Nothing to export"));
    assert!(!home.path().join("smart-budget-history.csv").exists());
}

#[test]
fn clear_all_requires_confirmation_flag_in_scripts() {
    let home = TempDir::new().expect("temp dir");
    script(&home)
        .write_stdin("add expense 5 Food 2024-05-01\nclear-all\nclear-all --yes\nlist\n")
        .assert()
        .success()
        .stdout(contains("clear-all needs `--yes`"))
        .stdout(contains("All history cleared."))
        .stdout(contains("No history found."));
}
