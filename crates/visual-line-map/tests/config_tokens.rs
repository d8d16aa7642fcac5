use visual_line_map::{ConfigError, WrapBoundary, WrapConfig, WrapMode};

#[test]
fn test_wrap_mode_tokens() {
    for mode in [WrapMode::NoWrap, WrapMode::Word, WrapMode::Letter] {
        assert_eq!(mode.to_string().parse::<WrapMode>(), Ok(mode));
        assert_eq!(WrapMode::from_token(mode.as_token()), mode);
    }
    assert_eq!(" Word ".parse::<WrapMode>(), Ok(WrapMode::Word));
    assert_eq!(
        "soft".parse::<WrapMode>(),
        Err(ConfigError::UnknownWrapMode("soft".to_string()))
    );
    assert_eq!(WrapMode::from_token("soft"), WrapMode::NoWrap);
}

#[test]
fn test_wrap_boundary_tokens() {
    assert_eq!(WrapBoundary::LineBreakingColumn.to_string(), "line_breaking_column");
    assert_eq!(
        "VIEWPORT".parse::<WrapBoundary>(),
        Ok(WrapBoundary::Viewport)
    );
    assert!(matches!(
        "column".parse::<WrapBoundary>(),
        Err(ConfigError::UnknownWrapBoundary(_))
    ));
    assert_eq!(WrapBoundary::from_token("column"), WrapBoundary::Viewport);
}

#[test]
fn test_error_messages() {
    let err = "soft".parse::<WrapMode>().unwrap_err();
    assert!(err.to_string().contains("soft"));
}

#[test]
fn test_wrap_boundary_max_width() {
    assert_eq!(WrapBoundary::Viewport.max_width(640.0, 80, 8.0), 640.0);
    assert_eq!(WrapBoundary::LineBreakingColumn.max_width(640.0, 40, 8.0), 320.0);
    assert_eq!(WrapBoundary::LineBreakingColumn.max_width(640.0, 0, 8.0), 640.0);
}

#[test]
fn test_config_serde_round_trip() {
    let config = WrapConfig {
        mode: WrapMode::Letter,
        boundary: WrapBoundary::LineBreakingColumn,
        tab_width: 8,
        keep_indentation: false,
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(
        json,
        r#"{"mode":"letter","boundary":"line_breaking_column","tab_width":8,"keep_indentation":false}"#
    );
    let parsed: WrapConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_config_serde_defaults_missing_fields() {
    let parsed: WrapConfig = serde_json::from_str(r#"{"mode":"word"}"#).unwrap();
    assert_eq!(parsed, WrapConfig::with_mode(WrapMode::Word));
    assert_eq!(parsed.tab_width, 4);
    assert!(parsed.keep_indentation);

    assert!(serde_json::from_str::<WrapConfig>(r#"{"mode":"soft"}"#).is_err());
}
