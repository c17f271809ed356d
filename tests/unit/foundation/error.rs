use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TilemuxError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(TilemuxError::render("x").to_string().contains("render error:"));
    assert!(
        TilemuxError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        TilemuxError::GpuUnavailable("vp".to_string())
            .to_string()
            .contains("'vp'")
    );
}

#[test]
fn fatal_classification() {
    assert!(TilemuxError::Destroyed.is_fatal());
    assert!(TilemuxError::UnsupportedViewportKind("x".into()).is_fatal());
    assert!(TilemuxError::GpuUnavailable("x".into()).is_fatal());
    assert!(!TilemuxError::render("boom").is_fatal());
    assert!(!TilemuxError::ViewportNotFound("x".into()).is_fatal());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TilemuxError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
