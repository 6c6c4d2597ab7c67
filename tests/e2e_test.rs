/// End-to-end tests for the CLI
///
/// Each test builds a throwaway SQLite relation table with `tempfile` and runs
/// the binary against it with `assert_cmd`.
use assert_cmd::cargo::cargo_bin_cmd;
use bom_trace::adapters::outbound::persistence::{insert_article, insert_relation, install_schema};
use bom_trace::prelude::*;
use chrono::NaiveDate;
use predicates::prelude::*;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn edge(parent: &str, child: &str, quantity: &str, sequence: i64) -> RelationEdge {
    RelationEdge::new(
        ArticleCode::new(parent).unwrap(),
        ArticleCode::new(child).unwrap(),
        Quantity::parse(Some(quantity)),
        sequence,
    )
}

/// Relation table: A→B(2), A→C(1), B→D(3), E→D(1), X→Y, X→Z, plus a retired A→OLD
fn create_database(dir: &Path) -> PathBuf {
    let path = dir.join("relations.sqlite");
    let conn = Connection::open(&path).unwrap();
    install_schema(&conn).unwrap();

    for relation in [
        edge("A", "B", "2", 10),
        edge("A", "C", "1", 20),
        edge("B", "D", "3", 10),
        edge("E", "D", "1", 10),
        edge("X", "Y", "1", 10),
        edge("X", "Z", "1", 20),
    ] {
        insert_relation(&conn, &relation).unwrap();
    }
    let retired = edge("A", "OLD", "1", 30).retired_on(NaiveDate::from_ymd_opt(2021, 6, 30).unwrap());
    insert_relation(&conn, &retired).unwrap();

    insert_article(
        &conn,
        &ArticleCode::new("A").unwrap(),
        &ArticleAttributes::new("Frame assembly", "C"),
    )
    .unwrap();
    insert_article(
        &conn,
        &ArticleCode::new("D").unwrap(),
        &ArticleAttributes::new("Hex bolt M8", "A"),
    )
    .unwrap();

    path
}

fn database_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// Exit code tests for CLI
mod exit_code_tests {
    use super::*;

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        cargo_bin_cmd!("bom-trace").arg("--help").assert().code(0);
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        cargo_bin_cmd!("bom-trace").arg("--version").assert().code(0);
    }

    /// Exit code 2: invalid arguments
    #[test]
    fn test_exit_code_invalid_format() {
        cargo_bin_cmd!("bom-trace")
            .args(["resolve", "A", "--format", "xml"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Invalid format"));
    }

    /// Exit code 2: missing subcommand
    #[test]
    fn test_exit_code_missing_subcommand() {
        cargo_bin_cmd!("bom-trace").assert().code(2);
    }

    /// Exit code 3: database missing
    #[test]
    fn test_exit_code_database_not_found() {
        let dir = TempDir::new().unwrap();
        cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args(["resolve", "A", "--database", "missing.sqlite"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Relation database not found"));
    }

    /// Exit code 3: no database configured anywhere
    #[test]
    fn test_exit_code_no_database() {
        let dir = TempDir::new().unwrap();
        cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args(["resolve", "A"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("No relation database given"));
    }

    /// Exit code 3: unknown article
    #[test]
    fn test_exit_code_not_found() {
        let dir = TempDir::new().unwrap();
        let db = create_database(dir.path());
        cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args(["resolve", "NOPE", "--database", database_arg(&db)])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Article not found: NOPE"));
    }

    /// Exit code 1: compared structures differ
    #[test]
    fn test_exit_code_differences() {
        let dir = TempDir::new().unwrap();
        let db = create_database(dir.path());
        cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args(["compare", "A", "X", "--database", database_arg(&db)])
            .assert()
            .code(1);
    }

    /// Exit code 0: identical structures
    #[test]
    fn test_exit_code_identical_structures() {
        let dir = TempDir::new().unwrap();
        let db = create_database(dir.path());
        cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args(["compare", "A", "a", "--database", database_arg(&db)])
            .assert()
            .code(0);
    }
}

mod resolve_tests {
    use super::*;

    #[test]
    fn test_resolve_json() {
        let dir = TempDir::new().unwrap();
        let db = create_database(dir.path());

        let output = cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args(["resolve", " a ", "--database", database_arg(&db)])
            .output()
            .unwrap();

        assert!(output.status.success());
        let json = json_stdout(&output);
        assert_eq!(json["tool"], "bom-trace");
        assert_eq!(json["report"], "structure");
        assert_eq!(json["origin_code"], "A");

        let root = &json["roots"][0];
        assert_eq!(root["code"], "A");
        assert_eq!(root["description"], "Frame assembly");
        let children = root["children"].as_array().unwrap();
        assert_eq!(children.len(), 2, "retired relations are not listed");
        assert_eq!(children[0]["code"], "B");
        assert_eq!(children[0]["quantity"], "2");
        assert_eq!(children[0]["children"][0]["code"], "D");
        assert_eq!(children[0]["children"][0]["quantity"], "3");
        assert_eq!(children[1]["code"], "C");
    }

    #[test]
    fn test_resolve_markdown_to_file() {
        let dir = TempDir::new().unwrap();
        let db = create_database(dir.path());
        let report = dir.path().join("bom.md");

        cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args([
                "resolve",
                "A",
                "-f",
                "markdown",
                "-o",
                report.to_str().unwrap(),
                "--database",
                database_arg(&db),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let markdown = fs::read_to_string(&report).unwrap();
        assert!(markdown.starts_with("# Bill of Materials: A"));
        assert!(markdown.contains("| 2 | ..D | 3 | Hex bolt M8 | A |"));
    }
}

mod cycle_tests {
    use super::*;

    #[test]
    fn test_resolve_logs_cycle_warning_and_succeeds() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("cyclic.sqlite");
        let conn = Connection::open(&db).unwrap();
        install_schema(&conn).unwrap();
        insert_relation(&conn, &edge("P", "Q", "1", 10)).unwrap();
        insert_relation(&conn, &edge("Q", "P", "1", 10)).unwrap();
        drop(conn);

        cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .env_remove("RUST_LOG")
            .args(["resolve", "P", "--database", database_arg(&db)])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"repeated\": \"P\""))
            .stderr(predicate::str::contains("WARN"))
            .stderr(predicate::str::contains("Cycle in relation table"))
            .stderr(predicate::str::contains("repeated=P"));
    }
}

mod ancestor_tests {
    use super::*;

    #[test]
    fn test_parents() {
        let dir = TempDir::new().unwrap();
        let db = create_database(dir.path());

        let output = cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args(["parents", "d", "--database", database_arg(&db)])
            .output()
            .unwrap();

        assert!(output.status.success());
        let json = json_stdout(&output);
        assert_eq!(json["report"], "ancestors");
        assert_eq!(json["kind"], "direct_parents");
        let mut parents: Vec<&str> = json["ancestors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        parents.sort();
        assert_eq!(parents, vec!["B", "E"]);
    }

    #[test]
    fn test_terminal_ancestors() {
        let dir = TempDir::new().unwrap();
        let db = create_database(dir.path());

        let output = cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args(["terminal-ancestors", "D", "--database", database_arg(&db)])
            .output()
            .unwrap();

        assert!(output.status.success());
        let json = json_stdout(&output);
        assert_eq!(json["kind"], "terminal_ancestors");
        assert_eq!(json["ancestors"], serde_json::json!(["A", "E"]));
    }

    #[test]
    fn test_terminal_ancestors_markdown() {
        let dir = TempDir::new().unwrap();
        let db = create_database(dir.path());

        cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args([
                "terminal-ancestors",
                "C",
                "--format",
                "md",
                "--database",
                database_arg(&db),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("# Terminal Ancestors of C"))
            .stdout(predicate::str::contains("- A\n"));
    }
}

mod compare_tests {
    use super::*;

    #[test]
    fn test_compare_reports_differences_and_unresolved() {
        let dir = TempDir::new().unwrap();
        let db = create_database(dir.path());

        let output = cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args(["compare", "A", "E", "NOPE", "--database", database_arg(&db)])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let json = json_stdout(&output);
        assert_eq!(json["report"], "comparison");
        assert_eq!(json["compared"], serde_json::json!(["A", "E", "NOPE"]));
        assert_eq!(json["unresolved"], serde_json::json!(["NOPE"]));

        let differences = json["differences"].as_array().unwrap();
        let d = differences.iter().find(|entry| entry["code"] == "D").unwrap();
        assert_eq!(d["present_in"], serde_json::json!(["A", "E"]));
        assert_eq!(d["missing_in"], serde_json::json!(["NOPE"]));

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Article not found: NOPE"));
    }

    #[test]
    fn test_compare_needs_two_structures() {
        let dir = TempDir::new().unwrap();
        let db = create_database(dir.path());

        cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args(["compare", "A", "--database", database_arg(&db)])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("At least two structures"));
    }

    #[test]
    fn test_compare_with_report_file() {
        let dir = TempDir::new().unwrap();
        let db = create_database(dir.path());
        let report = dir.path().join("printed.tsv");
        fs::write(
            &report,
            "Code\tQty\tDescription\n10 A\t\tFrame assembly\n20 .B\t2\tSide panel\n30 ..D\t3\tHex bolt M8\n40 .W\t1\tWasher\n",
        )
        .unwrap();

        cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args([
                "compare",
                "A",
                "--report",
                &format!("A-PRINTED={}", report.display()),
                "--database",
                database_arg(&db),
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("\"A-PRINTED\""));
    }
}

mod reconcile_tests {
    use super::*;

    #[test]
    fn test_reconcile_matching_document() {
        let dir = TempDir::new().unwrap();
        let db = create_database(dir.path());
        let codes = dir.path().join("ocr.txt");
        fs::write(&codes, "# page 1\nB\nb\nC\n\nD\nD\nD\n").unwrap();

        let output = cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args([
                "reconcile",
                "A",
                "--codes",
                codes.to_str().unwrap(),
                "--database",
                database_arg(&db),
            ])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(0));
        let json = json_stdout(&output);
        assert_eq!(json["report"], "document_check");
        assert_eq!(json["main_code"], "A");
        assert_eq!(json["quantity_mode"], "per_instance");
        assert_eq!(json["total_expected"], 6);
        assert_eq!(json["matched"]["D"], 3);
        assert!(json["analysis_id"].as_str().is_some());
    }

    #[test]
    fn test_reconcile_discrepancies_compounded() {
        let dir = TempDir::new().unwrap();
        let db = create_database(dir.path());
        let codes = dir.path().join("ocr.txt");
        fs::write(&codes, "B\nB\nC\nC\nD\nD\nD\n").unwrap();

        let output = cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args([
                "reconcile",
                "A",
                "--codes",
                codes.to_str().unwrap(),
                "--quantity-mode",
                "compounded",
                "--database",
                database_arg(&db),
            ])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let json = json_stdout(&output);
        assert_eq!(json["quantity_mode"], "compounded");
        assert_eq!(json["missing"]["D"], 3);
        assert_eq!(json["extra"]["C"], 1);
        assert_eq!(json["matched"]["B"], 2);
    }

    #[test]
    fn test_reconcile_missing_codes_file() {
        let dir = TempDir::new().unwrap();
        let db = create_database(dir.path());

        cargo_bin_cmd!("bom-trace")
            .current_dir(dir.path())
            .args([
                "reconcile",
                "A",
                "--codes",
                "nowhere.txt",
                "--database",
                database_arg(&db),
            ])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to read file"));
    }
}
