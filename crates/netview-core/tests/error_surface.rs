use netview_core::errors::{ErrorInfo, NetError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("rank", "0")
        .with_context("step", "example")
}

#[test]
fn config_error_surface() {
    let err = NetError::Config(sample_info("shared-tmp", "temporary directory is not shared"));
    assert_eq!(err.info().code, "shared-tmp");
    assert!(err.info().context.contains_key("rank"));
}

#[test]
fn context_and_hint_attach_to_any_family() {
    let err = NetError::External(ErrorInfo::new("viewer-exit", "viewer script failed"))
        .with_context("status", 3)
        .with_hint("run the script by hand");
    assert_eq!(err.info().context.get("status").map(String::as_str), Some("3"));
    assert_eq!(err.info().hint.as_deref(), Some("run the script by hand"));
    let rendered = err.to_string();
    assert!(rendered.starts_with("external tool error: viewer script failed"));
    assert!(rendered.contains("status=3"));
}

#[test]
fn errors_survive_json_transport() {
    let err = NetError::Cleanup(sample_info("tmpfile-remove", "failed to delete temporary file"));
    let json = serde_json::to_string(&err).expect("serialize");
    let decoded: NetError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
    assert!(json.contains("\"family\":\"Cleanup\""));
}
