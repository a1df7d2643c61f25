//! Configuration loading tests.

use std::io::Write;

use conversion_sync::config::Config;
use conversion_sync::mapping::MissPolicy;

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[warehouse]
project = "my-project"
dataset = "coop_analytics"
table = "BrandConversions"

[sheet]
spreadsheet_id = "sheet123"

[import]
on_unmapped = "raw"

[import.conversion_map]
PURCHASE = "Revenue"
"#
    )
    .unwrap();

    let config = Config::load_from_file(file.path()).unwrap();

    assert_eq!(config.warehouse.project, Some("my-project".to_string()));
    assert_eq!(config.import.on_unmapped, MissPolicy::Raw);
    assert_eq!(config.import.conversion_map.len(), 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_invalid_toml_names_the_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[warehouse\nproject = ").unwrap();

    let error = Config::load_from_file(file.path()).unwrap_err();

    assert_eq!(error.category(), "Configuration Error");
    assert!(error
        .to_string()
        .contains(file.path().display().to_string().as_str()));
}

#[test]
fn test_validation_fails_before_any_network_call() {
    // A default config has no identifiers; validation must reject it.
    let config = Config::default();
    let error = config.validate().unwrap_err();
    assert_eq!(error.category(), "Configuration Error");
}

#[test]
fn test_default_conversion_map_matches_shipped_entries() {
    let config = Config::default();
    let map = config.conversion_map();

    assert_eq!(map.display_name("PURCHASE"), Some("Revenue"));
    assert_eq!(map.display_name("ADD_TO_BASKET"), Some("Add to basket"));
    assert_eq!(
        map.display_name("PRODUCT_DETAILS_VIEW"),
        Some("Landing page view")
    );
}
