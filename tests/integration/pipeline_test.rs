//! End-to-end pipeline tests.
//!
//! Exercises the full extract → prepare → map/write flow against the
//! in-memory clients.

use pretty_assertions::assert_eq;

use conversion_sync::config::Config;
use conversion_sync::import::{Importer, ImportSummary};
use conversion_sync::load::header_row;
use conversion_sync::mapping::MissPolicy;
use conversion_sync::sheet::{CellValue, MockSheetClient, SheetOp};
use conversion_sync::warehouse::{ConversionRow, MockWarehouseClient};

/// Helper to build a validated config pointing at mock identifiers.
fn test_config() -> Config {
    let mut config: Config = toml::from_str(
        r#"
[warehouse]
project = "my-project"
dataset = "coop_analytics"
table = "BrandConversions"

[sheet]
spreadsheet_id = "sheet123"
worksheet = "Sheet1"
range = "A:D"
"#,
    )
    .unwrap();
    config.poll.initial_ms = 1;
    config.validate().unwrap();
    config
}

#[tokio::test]
async fn test_single_purchase_row_end_to_end() {
    let warehouse = MockWarehouseClient::with_rows(vec![ConversionRow::new(
        "CLICK1",
        "2020-01-01 10:00:00",
        12.5,
        "PURCHASE",
    )]);
    let sheet = MockSheetClient::new();
    let config = test_config();

    let summary = Importer::new(&warehouse, &sheet, &config)
        .run()
        .await
        .unwrap();

    assert_eq!(
        summary,
        ImportSummary {
            fetched: 1,
            written: 1,
            skipped: 0
        }
    );

    let rows = sheet.rows();
    assert_eq!(
        rows,
        vec![
            vec![
                CellValue::from("Google Click ID"),
                CellValue::from("Conversion Name"),
                CellValue::from("Conversion Time"),
                CellValue::from("Conversion value"),
            ],
            vec![
                CellValue::from("CLICK1"),
                CellValue::from("Revenue"),
                CellValue::from("2020-01-01 10:00:00"),
                CellValue::from(12.5),
            ],
        ]
    );
}

#[tokio::test]
async fn test_all_default_categories_map() {
    let warehouse = MockWarehouseClient::with_rows(vec![
        ConversionRow::new("C1", "2020-01-01 10:00:00", 1.0, "PURCHASE"),
        ConversionRow::new("C2", "2020-01-01 11:00:00", 2.0, "ADD_TO_BASKET"),
        ConversionRow::new("C3", "2020-01-01 12:00:00", 3.0, "PRODUCT_DETAILS_VIEW"),
    ]);
    let sheet = MockSheetClient::new();
    let config = test_config();

    Importer::new(&warehouse, &sheet, &config)
        .run()
        .await
        .unwrap();

    let rows = sheet.rows();
    assert_eq!(rows[1][1], CellValue::from("Revenue"));
    assert_eq!(rows[2][1], CellValue::from("Add to basket"));
    assert_eq!(rows[3][1], CellValue::from("Landing page view"));
}

#[tokio::test]
async fn test_output_count_matches_input_count() {
    let input: Vec<ConversionRow> = (0..25)
        .map(|i| ConversionRow::new(format!("CLICK{i}"), "2020-01-01 10:00:00", i as f64, "PURCHASE"))
        .collect();
    let warehouse = MockWarehouseClient::with_rows(input.clone());
    let sheet = MockSheetClient::new();
    let config = test_config();

    let summary = Importer::new(&warehouse, &sheet, &config)
        .run()
        .await
        .unwrap();

    // No drops, no duplicates; header accounts for the extra sheet row.
    assert_eq!(summary.written, input.len());
    assert_eq!(sheet.rows().len(), input.len() + 1);

    let gclids: Vec<String> = sheet.rows()[1..]
        .iter()
        .map(|r| r[0].to_string())
        .collect();
    let expected: Vec<String> = input.iter().map(|r| r.gclid.clone()).collect();
    assert_eq!(gclids, expected);
}

#[tokio::test]
async fn test_header_written_once_after_clear_before_data() {
    let warehouse = MockWarehouseClient::with_rows(vec![ConversionRow::new(
        "CLICK1",
        "2020-01-01 10:00:00",
        1.0,
        "PURCHASE",
    )]);
    let sheet = MockSheetClient::new();
    let config = test_config();

    Importer::new(&warehouse, &sheet, &config)
        .run()
        .await
        .unwrap();

    assert_eq!(
        sheet.ops(),
        vec![
            SheetOp::Clear("Sheet1!A:D".to_string()),
            SheetOp::Append(1),
            SheetOp::Append(1),
        ]
    );
    assert_eq!(sheet.rows()[0], header_row());
}

#[tokio::test]
async fn test_rerun_replaces_previous_content() {
    let warehouse = MockWarehouseClient::with_rows(vec![ConversionRow::new(
        "CLICK1",
        "2020-01-01 10:00:00",
        1.0,
        "PURCHASE",
    )]);
    let sheet = MockSheetClient::new();
    let config = test_config();

    Importer::new(&warehouse, &sheet, &config)
        .run()
        .await
        .unwrap();

    let warehouse = MockWarehouseClient::with_rows(vec![ConversionRow::new(
        "CLICK2",
        "2020-01-02 10:00:00",
        2.0,
        "PURCHASE",
    )]);
    Importer::new(&warehouse, &sheet, &config)
        .run()
        .await
        .unwrap();

    // Second run cleared the first run's output.
    let rows = sheet.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], CellValue::from("CLICK2"));
}

#[tokio::test]
async fn test_skip_policy_drops_only_unmapped_rows() {
    let warehouse = MockWarehouseClient::with_rows(vec![
        ConversionRow::new("C1", "2020-01-01 10:00:00", 1.0, "PURCHASE"),
        ConversionRow::new("C2", "2020-01-01 11:00:00", 2.0, "NEWSLETTER_SIGNUP"),
        ConversionRow::new("C3", "2020-01-01 12:00:00", 3.0, "ADD_TO_BASKET"),
    ]);
    let sheet = MockSheetClient::new();
    let mut config = test_config();
    config.import.on_unmapped = MissPolicy::Skip;

    let summary = Importer::new(&warehouse, &sheet, &config)
        .run()
        .await
        .unwrap();

    assert_eq!(
        summary,
        ImportSummary {
            fetched: 3,
            written: 2,
            skipped: 1
        }
    );

    let gclids: Vec<String> = sheet.rows()[1..]
        .iter()
        .map(|r| r[0].to_string())
        .collect();
    assert_eq!(gclids, vec!["C1", "C3"]);
}

#[tokio::test]
async fn test_raw_policy_passes_category_through() {
    let warehouse = MockWarehouseClient::with_rows(vec![ConversionRow::new(
        "C1",
        "2020-01-01 10:00:00",
        1.0,
        "NEWSLETTER_SIGNUP",
    )]);
    let sheet = MockSheetClient::new();
    let mut config = test_config();
    config.import.on_unmapped = MissPolicy::Raw;

    let summary = Importer::new(&warehouse, &sheet, &config)
        .run()
        .await
        .unwrap();

    assert_eq!(summary.skipped, 0);
    assert_eq!(sheet.rows()[1][1], CellValue::from("NEWSLETTER_SIGNUP"));
}
