//! CLI integration tests for coursa commands.
//!
//! These tests focus on exit codes and basic behavioral verification,
//! not specific output formatting which may change.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to run `coursa` with HOME isolated to the provided directory.
fn coursa_with_home(home: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("coursa").unwrap();
    cmd.env("HOME", home);
    cmd.env_remove("COURSA_LOG");
    cmd
}

/// Runs `coursa` inside `dir` with HOME set to an empty sibling.
fn coursa_in(dir: &Path) -> Command {
    let mut cmd = coursa_with_home(&dir.join("home"));
    cmd.current_dir(dir);
    cmd
}

/// Sample catalog with three courses.
const CATALOG: &str = r#"[
  {
    "url": "https://example.com/ml",
    "title": "Intro to Machine Learning",
    "description": "Supervised models, regression and classification.",
    "platform": "Coursera",
    "level": "Beginner",
    "duration": 12.0,
    "instructor": "Andrew Ng",
    "rating": 4.8,
    "category": "data science",
    "last_scraped": "2024-05-01T00:00:00Z"
  },
  {
    "url": "https://example.com/stats",
    "title": "Statistics at Scale",
    "description": "Applied machine learning pipelines and statistics.",
    "platform": "edX",
    "level": "Avanzado",
    "duration": 30.0,
    "rating": 3.0,
    "category": "Data Science"
  },
  {
    "url": "https://example.com/paint",
    "title": "Watercolor Basics",
    "description": "Brushes, paper and color mixing.",
    "platform": "Udemy",
    "level": "beginner",
    "duration": 3.5,
    "rating": 4.5,
    "category": "Art"
  },
  {
    "title": "Missing URL"
  }
]"#;

/// Initializes a project and ingests the sample catalog.
fn seeded_project() -> tempfile::TempDir {
    let dir = temp_dir();
    coursa_in(dir.path()).arg("init").assert().success();
    fs::write(dir.path().join("catalog.json"), CATALOG).unwrap();
    coursa_in(dir.path())
        .args(["ingest", "catalog.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ingested 3 of 4 records"))
        .stdout(predicate::str::contains("Skipped 1"));
    dir
}

/// Parses stdout of a `--json` invocation.
fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let dir = temp_dir();
        coursa_in(dir.path()).arg("init").assert().success();

        let contents = fs::read_to_string(dir.path().join(".coursa.toml")).unwrap();
        assert!(contents.contains("# [search]"));
    }

    #[test]
    fn fails_if_config_exists() {
        let dir = temp_dir();
        fs::write(dir.path().join(".coursa.toml"), "").unwrap();

        coursa_in(dir.path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn force_overwrites() {
        let dir = temp_dir();
        fs::write(dir.path().join(".coursa.toml"), "").unwrap();
        coursa_in(dir.path())
            .args(["init", "--force"])
            .assert()
            .success();
    }

    #[test]
    fn appends_data_dir_to_gitignore() {
        let dir = temp_dir();
        fs::write(dir.path().join(".gitignore"), "target/").unwrap();
        coursa_in(dir.path()).arg("init").assert().success();

        let gitignore = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(gitignore, "target/\n.coursa/\n");
    }
}

mod check {
    use super::*;

    #[test]
    fn valid_config_passes() {
        let dir = temp_dir();
        coursa_in(dir.path()).arg("init").assert().success();
        coursa_in(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No issues found."));
    }

    #[test]
    fn warnings_fail() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".coursa.toml"),
            "[search]\ntitle_weight = 0.0\n",
        )
        .unwrap();
        coursa_in(dir.path())
            .arg("check")
            .assert()
            .failure()
            .stdout(predicate::str::contains("title"));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = temp_dir();
        fs::write(dir.path().join(".coursa.toml"), "[search\n").unwrap();
        coursa_in(dir.path())
            .arg("check")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error:"));
    }
}

mod data {
    use super::*;

    #[test]
    fn commands_need_a_config() {
        let dir = temp_dir();
        coursa_in(dir.path())
            .arg("popular")
            .assert()
            .failure()
            .stderr(predicate::str::contains("coursa init"));
    }

    #[test]
    fn ingest_rejects_malformed_json() {
        let dir = temp_dir();
        coursa_in(dir.path()).arg("init").assert().success();
        fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        coursa_in(dir.path())
            .args(["ingest", "bad.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to parse"));
    }

    #[test]
    fn status_reports_catalog_and_index() {
        let dir = seeded_project();
        coursa_in(dir.path())
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("3 courses"))
            .stdout(predicate::str::contains("current"));
    }

    #[test]
    fn reindex_and_precompute_succeed() {
        let dir = seeded_project();
        coursa_in(dir.path())
            .arg("reindex")
            .assert()
            .success()
            .stdout(predicate::str::contains("Indexed 3 courses"));
        coursa_in(dir.path())
            .arg("precompute")
            .assert()
            .success()
            .stdout(predicate::str::contains("Cached features for 3 courses"));
        assert!(dir.path().join(".coursa/cache/course_features.json").exists());
    }
}

mod search {
    use super::*;

    #[test]
    fn title_match_ranks_first() {
        let dir = seeded_project();
        let results = json_output(
            coursa_in(dir.path()).args(["search", "machine", "learning", "--json"]),
        );
        assert_eq!(results["total"], 2);
        assert_eq!(results["courses"][0]["url"], "https://example.com/ml");
    }

    #[test]
    fn facet_filters_are_case_insensitive() {
        let dir = seeded_project();
        let results = json_output(coursa_in(dir.path()).args([
            "search",
            "--category",
            "art",
            "--json",
        ]));
        assert_eq!(results["total"], 1);
        assert_eq!(results["courses"][0]["category"], "Art");
    }

    #[test]
    fn rating_order_and_range() {
        let dir = seeded_project();
        let results = json_output(coursa_in(dir.path()).args([
            "search",
            "--min-rating",
            "4",
            "--order",
            "rating",
            "--json",
        ]));
        let urls: Vec<&str> = results["courses"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["url"].as_str().unwrap())
            .collect();
        assert_eq!(urls, ["https://example.com/ml", "https://example.com/paint"]);
    }

    #[test]
    fn needs_terms_or_filters() {
        let dir = seeded_project();
        coursa_in(dir.path())
            .arg("search")
            .assert()
            .failure()
            .stderr(predicate::str::contains("search terms"));
    }

    #[test]
    fn table_output_lists_urls() {
        let dir = seeded_project();
        coursa_in(dir.path())
            .args(["search", "watercolor"])
            .assert()
            .success()
            .stdout(predicate::str::contains("https://example.com/paint"));
    }
}

mod recommend {
    use super::*;

    #[test]
    fn popular_orders_by_rating() {
        let dir = seeded_project();
        let views = json_output(coursa_in(dir.path()).args(["popular", "-n", "2", "--json"]));
        let urls: Vec<&str> = views
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["url"].as_str().unwrap())
            .collect();
        assert_eq!(urls, ["https://example.com/ml", "https://example.com/paint"]);
    }

    #[test]
    fn like_toggles() {
        let dir = seeded_project();
        coursa_in(dir.path())
            .args(["interact", "-u", "ana", "-c", "https://example.com/ml", "like"])
            .assert()
            .success()
            .stdout(predicate::str::contains("liked=true"));
        coursa_in(dir.path())
            .args(["interact", "-u", "ana", "-c", "https://example.com/ml", "like"])
            .assert()
            .success()
            .stdout(predicate::str::contains("liked=false"));
    }

    #[test]
    fn unknown_course_is_rejected() {
        let dir = seeded_project();
        coursa_in(dir.path())
            .args(["interact", "-u", "ana", "-c", "https://nowhere", "view"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown course"));
    }

    #[test]
    fn cold_start_user_gets_popular_courses_they_have_not_seen() {
        let dir = seeded_project();
        coursa_in(dir.path())
            .args(["interact", "-u", "ana", "-c", "https://example.com/ml", "view"])
            .assert()
            .success();

        let views = json_output(coursa_in(dir.path()).args([
            "recommend",
            "-u",
            "ana",
            "-n",
            "5",
            "--json",
        ]));
        let urls: Vec<&str> = views
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["url"].as_str().unwrap())
            .collect();
        assert_eq!(
            urls,
            ["https://example.com/paint", "https://example.com/stats"]
        );
    }

    #[test]
    fn search_marks_viewer_likes() {
        let dir = seeded_project();
        coursa_in(dir.path())
            .args(["interact", "-u", "ana", "-c", "https://example.com/paint", "like"])
            .assert()
            .success();
        let results = json_output(coursa_in(dir.path()).args([
            "search",
            "watercolor",
            "--user",
            "ana",
            "--json",
        ]));
        assert_eq!(results["courses"][0]["liked"], true);
    }
}
