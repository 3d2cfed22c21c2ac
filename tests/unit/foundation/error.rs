use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LumaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LumaError::discovery("x")
            .to_string()
            .contains("discovery error:")
    );
    assert!(LumaError::connect("x").to_string().contains("connect error:"));
    assert!(
        LumaError::source_not_found("Studio-Cam")
            .to_string()
            .contains("source not found: Studio-Cam")
    );
    assert!(LumaError::decode("x").to_string().contains("decode error:"));
    assert!(LumaError::config("x").to_string().contains("config error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LumaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
