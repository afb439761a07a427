use super::*;
use descriptor_engine::DescriptorError;

#[test]
fn test_boot_errors_pass_through_transparently() {
    let inner = BootError::from(DescriptorError::MissingInput {
        reason: "the component descriptor file is not defined".to_string(),
    });
    let expected = inner.to_string();
    let error = Error::from(inner);
    assert_eq!(error.to_string(), expected);
}

#[test]
fn test_render_error_display() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error = Error::from(json_error);
    assert!(error
        .to_string()
        .starts_with("Failed to render the resolved configuration:"));
}
