//! Integration tests for the kitbag binary

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn kitbag() -> Command {
        cargo_bin_cmd!("kitbag")
    }

    #[test]
    fn help_displays() {
        kitbag()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("content cache"));
    }

    #[test]
    fn version_displays() {
        kitbag()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("kitbag"));
    }

    #[test]
    fn config_path_displays() {
        kitbag()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_reflects_cache_root_flag() {
        let temp = TempDir::new().unwrap();
        kitbag()
            .args(["config", "show", "--cache-root"])
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"))
            .stdout(predicate::str::contains(temp.path().to_str().unwrap()));
    }

    #[test]
    fn stat_empty_store() {
        let temp = TempDir::new().unwrap();
        kitbag()
            .args(["stat", "--cache-root"])
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("(empty)"));
    }

    #[test]
    fn stat_missing_entry_fails() {
        let temp = TempDir::new().unwrap();
        kitbag()
            .args(["stat", "no-such-entry", "--cache-root"])
            .arg(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("no cache entry"));
    }

    #[test]
    fn purge_missing_entry_succeeds() {
        let temp = TempDir::new().unwrap();
        kitbag()
            .args(["purge", "ghost", "--cache-root"])
            .arg(temp.path())
            .assert()
            .success();
    }

    #[test]
    fn show_missing_entry_fails() {
        let temp = TempDir::new().unwrap();
        kitbag()
            .args(["show", "ghost", "--cache-root"])
            .arg(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("no readable cache entry"));
    }

    #[test]
    fn fetch_rejects_malformed_header() {
        let temp = TempDir::new().unwrap();
        kitbag()
            .args([
                "fetch",
                "http://127.0.0.1:9/x",
                "entry",
                "-H",
                "not-a-header",
                "--cache-root",
            ])
            .arg(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("expected KEY=VALUE"));
    }

    #[test]
    fn fetch_escaping_name_shows_hint() {
        let temp = TempDir::new().unwrap();
        kitbag()
            .args([
                "fetch",
                "http://127.0.0.1:9/x",
                "../../escape",
                "--cache-root",
            ])
            .arg(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("cache directory"));
    }
}
