use super::*;

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DescriptorError>();
}

#[test]
fn test_missing_input_display() {
    let error = DescriptorError::MissingInput {
        reason: "the descriptor file is not defined".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Descriptor input missing: the descriptor file is not defined"
    );
}

#[test]
fn test_unresolved_reference_display_names_location_and_placeholder() {
    let error = DescriptorError::UnresolvedReference {
        location: "Element \"entry\"".to_string(),
        placeholder: "${repo-path}".to_string(),
        reason: "no declaration, parameter, property or environment entry provides it".to_string(),
    };
    let rendered = error.to_string();
    assert!(rendered.contains("Element \"entry\""));
    assert!(rendered.contains("${repo-path}"));
}

#[test]
fn test_cyclic_reference_display() {
    let error = DescriptorError::CyclicReference {
        context: "element content".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Variable resolution did not reach a fixed point while resolving element content"
    );
}

#[test]
fn test_ambiguous_shape_display() {
    let error = DescriptorError::AmbiguousShape {
        reason: "configuration item entries have improper attributes".to_string(),
    };
    assert!(error.to_string().starts_with("Configuration structure is ambiguous"));
}
