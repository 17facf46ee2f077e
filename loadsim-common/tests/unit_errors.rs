use loadsim_common::FormatError;

#[test]
fn test_missing_header_display() {
    assert_eq!(FormatError::MissingHeader.to_string(), "Output is missing the header row");
}

#[test]
fn test_missing_column_display() {
    let err = FormatError::MissingColumn("Latency (ms)".to_string());
    assert_eq!(err.to_string(), "Header has no \"Latency (ms)\" column");
}

#[test]
fn test_malformed_row_display() {
    let err = FormatError::MalformedRow { line: 3, reason: "missing \"Latency (ms)\" value".to_string() };
    assert_eq!(err.to_string(), "Malformed row 3: missing \"Latency (ms)\" value");
}

#[test]
fn test_error_equality() {
    let a = FormatError::MissingColumn("x".to_string());
    let b = FormatError::MissingColumn("x".to_string());
    let c = FormatError::MissingColumn("y".to_string());
    assert_eq!(a, b);
    assert_ne!(a, c);
}
