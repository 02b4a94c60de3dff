use std::fs;

use battinfo_config::{SourceKind, load_file, load_toml};
use rstest::rstest;
use tempfile::tempdir;

#[test]
fn accepts_full_config() {
    let toml = r#"
[source]
kind = "ioreg"
ioreg_path = "/usr/sbin/ioreg"
class = "AppleSmartBattery"
timeout_ms = 1500

[watch]
interval_ms = 1000
count = 5

[logging]
file = "battinfo.log"
level = "debug"
rotation = "daily"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.watch.count, 5);
    assert_eq!(cfg.source.timeout_ms, 1500);
}

#[test]
fn accepts_fixture_with_path() {
    let cfg = load_toml("[source]\nkind = \"fixture\"\nfixture = \"bag.toml\"\n").unwrap();
    assert_eq!(cfg.source.kind, SourceKind::Fixture);
    cfg.validate().expect("fixture with path is valid");
}

#[test]
fn simulated_ignores_ioreg_fields() {
    let cfg = load_toml("[source]\nkind = \"simulated\"\nclass = \"\"\n").unwrap();
    cfg.validate().expect("class unused for simulated source");
}

#[rstest]
#[case("[source]\nkind = \"fixture\"\n", "source.fixture is required")]
#[case("[source]\nkind = \"fixture\"\nfixture = \"\"\n", "source.fixture must not be empty")]
#[case("[source]\nclass = \"  \"\n", "source.class must not be empty")]
#[case("[source]\nioreg_path = \"\"\n", "source.ioreg_path must not be empty")]
#[case("[source]\ntimeout_ms = 0\n", "source.timeout_ms must be >= 1")]
#[case("[source]\ntimeout_ms = 600000\n", "source.timeout_ms is unreasonably large")]
#[case("[watch]\ninterval_ms = 0\n", "watch.interval_ms must be >= 1")]
#[case("[watch]\ninterval_ms = 3600001\n", "watch.interval_ms is unreasonably large")]
#[case("[logging]\nlevel = \"loud\"\n", "logging.level must be one of")]
#[case("[logging]\nrotation = \"weekly\"\n", "logging.rotation must be one of")]
fn rejects_invalid(#[case] toml: &str, #[case] expected: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    let msg = format!("{err}");
    assert!(msg.contains(expected), "{msg}");
}

#[rstest]
#[case("INFO")]
#[case("warn")]
fn level_is_case_insensitive(#[case] level: &str) {
    let cfg = load_toml(&format!("[logging]\nlevel = \"{level}\"\n")).unwrap();
    cfg.validate().unwrap();
}

#[test]
fn interval_at_one_hour_is_allowed() {
    let cfg = load_toml("[watch]\ninterval_ms = 3600000\n").unwrap();
    cfg.validate().unwrap();
}

#[test]
fn load_file_missing_default_yields_defaults() {
    let dir = tempdir().unwrap();
    let cfg = load_file(&dir.path().join("absent.toml"), true).unwrap();
    assert_eq!(cfg.source.kind, SourceKind::Ioreg);
}

#[test]
fn load_file_missing_explicit_is_error() {
    let dir = tempdir().unwrap();
    let err = load_file(&dir.path().join("absent.toml"), false).unwrap_err();
    assert!(format!("{err}").contains("read config"));
}

#[test]
fn load_file_reports_parse_error_with_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[watch]\ninterval_ms = \"soon\"\n").unwrap();
    let err = load_file(&path, true).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("parse config"), "{msg}");
    assert!(msg.contains("bad.toml"), "{msg}");
}
