use super::{Config, DEFAULT_MAX_DELETE_LINES, DEFAULT_VIEW_MAX_LINES};

#[test]
fn test_empty_toml_gives_defaults() {
    let config = Config::from_toml("");
    assert_eq!(config.max_delete_lines, DEFAULT_MAX_DELETE_LINES);
    assert_eq!(config.view_max_lines, 0);
}

#[test]
fn test_partial_toml_overrides_one_field() {
    let config = Config::from_toml("max_delete_lines = 250\n");
    assert_eq!(config.max_delete_lines, 250);
    assert_eq!(config.view_max_lines, 0);
}

#[test]
fn test_invalid_toml_falls_back_to_defaults() {
    let config = Config::from_toml("max_delete_lines = \"lots\"");
    assert_eq!(config.max_delete_lines, DEFAULT_MAX_DELETE_LINES);
}

#[test]
fn test_parsed_defaults_match_default_impl() {
    let parsed = Config::from_toml("");
    let built = Config::default();
    assert_eq!(parsed.max_delete_lines, built.max_delete_lines);
    assert_eq!(parsed.view_max_lines, built.view_max_lines);
    assert_eq!(built.view_max_lines, DEFAULT_VIEW_MAX_LINES);
}
