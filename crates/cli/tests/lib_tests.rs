//! Tests for lib.rs constants

use chainkit_cli::{APP_NAME, VERSION};

#[test]
fn test_constants() {
    assert_eq!(APP_NAME, "chainkit");
    assert!(!VERSION.is_empty());
}
