//! Tests for utils.rs shared utilities

use chainkit_cli::utils::{hex0x, read_file, report_rows, OutputFormat};
use chainkit_cli::CliError;
use serde_json::json;

#[test]
fn test_output_format_default() {
    assert_eq!(OutputFormat::default(), OutputFormat::Text);
}

#[test]
fn test_hex0x() {
    assert_eq!(hex0x([0xdeu8, 0xad]), "0xdead");
    assert_eq!(hex0x(Vec::<u8>::new()), "0x");
}

#[test]
fn test_report_rows_flatten_nested_objects() {
    let report = json!({
        "b": {"inner": "x", "count": 3},
        "a": null,
    });
    let mut rows = report_rows(&report);
    rows.sort();
    assert_eq!(
        rows,
        vec![
            ("a".to_string(), "-".to_string()),
            ("b.count".to_string(), "3".to_string()),
            ("b.inner".to_string(), "x".to_string()),
        ]
    );
}

#[test]
fn test_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.txt");
    std::fs::write(&path, "hello").unwrap();
    assert_eq!(read_file(&path).unwrap(), "hello");

    assert!(matches!(
        read_file(&dir.path().join("missing.txt")),
        Err(CliError::FileNotFound(_))
    ));
}
