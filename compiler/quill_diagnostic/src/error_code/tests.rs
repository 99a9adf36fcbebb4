use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E0001.to_string(), "E0001");
    assert_eq!(ErrorCode::E2004.to_string(), "E2004");
    assert_eq!(ErrorCode::E9001.to_string(), "E9001");
}

#[test]
fn test_phase_classification() {
    assert!(ErrorCode::E1001.is_compile_time());
    assert!(ErrorCode::E2003.is_compile_time());
    assert!(ErrorCode::E3002.is_runtime());
    assert!(ErrorCode::E9001.is_runtime());
    assert!(!ErrorCode::E0003.is_runtime());
}

#[test]
fn test_arity_codes_share_description() {
    assert_eq!(
        ErrorCode::E2003.description(),
        ErrorCode::E3002.description()
    );
}
