// ==========================================
// 订单导入核心 - OrderImporter 集成测试
// ==========================================
// 覆盖: 文件读取、落库报告（新增/重复）、批量导入、空文件
// ==========================================


use marketplace_order_import::repository::OrderRepository;
use marketplace_order_import::{
    logging, ImportConfig, ImportError, InMemoryOrderRepository, OrderImporter,
};
use std::io::Write;
use tempfile::NamedTempFile;
use test_helpers::{dec, export_text, ExportRow, HEADER};

// ==========================================
// 辅助函数: 创建测试导出文件
// ==========================================
fn create_export_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().expect("创建临时文件失败");
    temp_file
        .write_all(content.as_bytes())
        .expect("写入导出文件失败");
    temp_file.flush().expect("刷新导出文件失败");
    temp_file
}

fn sample_export() -> String {
    export_text(&[
        ExportRow::new("PKG-1", "ORD-1").billed("100,00"),
        ExportRow::new("PKG-1", "ORD-1").billed("50,00").item("Tabak", "T1"),
        ExportRow::new("PKG-2", "ORD-2").billed("1.999,90"),
        ExportRow::new("", "ORD-3").billed("5,00"),
    ])
}

#[test]
fn test_parse_file_success() {
    logging::init_test();
    let file = create_export_file(&sample_export());
    let importer = OrderImporter::new(ImportConfig::default());

    let outcome = importer.parse_file(file.path()).expect("解析失败");

    assert_eq!(outcome.summary.data_rows, 4);
    assert_eq!(outcome.summary.orders, 3);
    assert_eq!(outcome.orders[0].total_amount, dec("150"));
    assert_eq!(outcome.orders[1].total_amount, dec("1999.90"));
}

#[test]
fn test_importer_uses_given_config() {
    let config = ImportConfig::from_json_str(r#"{ "delimiter": "|", "min_fields": 2 }"#)
        .expect("配置解析失败");
    let importer = OrderImporter::new(config);

    assert_eq!(importer.config().delimiter, '|');
    assert_eq!(importer.config().min_fields, 2);

    let outcome = importer.parse_text("Paket Numarası|Faturalanacak Tutar\nP1|3,50\n");
    assert_eq!(outcome.orders.len(), 1);
    assert_eq!(outcome.orders[0].total_amount, dec("3.5"));
}

#[test]
fn test_parse_file_with_bom_and_crlf() {
    let content = format!("\u{feff}{}", sample_export().replace('\n', "\r\n"));
    let file = create_export_file(&content);
    let importer = OrderImporter::new(ImportConfig::default());

    let outcome = importer.parse_file(file.path()).expect("解析失败");

    assert_eq!(outcome.orders.len(), 3);
    assert_eq!(outcome.orders[0].grouping_key, "PKG-1");
}

#[test]
fn test_parse_file_missing() {
    let importer = OrderImporter::new(ImportConfig::default());
    let result = importer.parse_file("/nonexistent/dir/export.csv");
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));
}

#[tokio::test]
async fn test_import_reports_new_and_duplicate_orders() {
    let importer = OrderImporter::new(ImportConfig::default());
    let repo = InMemoryOrderRepository::new();

    let first = importer
        .import_text(&sample_export(), &repo)
        .await
        .expect("首次导入失败");
    assert_eq!(first.store.inserted, 3);
    assert_eq!(first.store.duplicates, 0);
    assert!(first.store.errors.is_empty());

    // 同一文件再次导入: 全部计为重复
    let second = importer
        .import_text(&sample_export(), &repo)
        .await
        .expect("二次导入失败");
    assert_eq!(second.store.inserted, 0);
    assert_eq!(second.store.duplicates, 3);
    assert_eq!(repo.count_orders().await.unwrap(), 3);

    let stored = repo
        .find_by_grouping_key("PKG-1")
        .await
        .unwrap()
        .expect("PKG-1 应已落库");
    assert_eq!(stored.items.len(), 2);
}

#[tokio::test]
async fn test_import_file_into_repository() {
    let file = create_export_file(&sample_export());
    let importer = OrderImporter::new(ImportConfig::default());
    let repo = InMemoryOrderRepository::new();

    let report = importer
        .import_file(file.path(), &repo)
        .await
        .expect("导入失败");

    assert_eq!(report.store.inserted, 3);
    assert_eq!(report.outcome.summary.line_items, 4);
}

#[tokio::test]
async fn test_header_only_file_yields_empty_report() {
    let importer = OrderImporter::new(ImportConfig::default());
    let repo = InMemoryOrderRepository::new();

    let report = importer
        .import_text(&format!("{}\n\n", HEADER), &repo)
        .await
        .expect("空文件不应报错");

    assert!(report.outcome.is_empty());
    assert_eq!(report.store.inserted, 0);
    assert_eq!(repo.count_orders().await.unwrap(), 0);
}

#[tokio::test]
async fn test_batch_import_independent_files() {
    let importer = OrderImporter::new(ImportConfig::default());
    let repo = InMemoryOrderRepository::new();

    let texts = vec![
        export_text(&[ExportRow::new("PKG-A", "ORD-A")]),
        export_text(&[ExportRow::new("PKG-B", "ORD-B"), ExportRow::new("PKG-C", "ORD-C")]),
        String::new(),
    ];

    let results = importer.batch_import(texts, &repo).await;

    assert_eq!(results.len(), 3);
    let inserted: usize = results
        .iter()
        .map(|r| r.as_ref().expect("单个文件导入失败").store.inserted)
        .sum();
    assert_eq!(inserted, 3);
    assert!(results[2].as_ref().unwrap().outcome.is_empty());
    assert_eq!(repo.count_orders().await.unwrap(), 3);
}

#[tokio::test]
async fn test_report_serializes_to_json() {
    let importer = OrderImporter::new(ImportConfig::default());
    let repo = InMemoryOrderRepository::new();

    let report = importer
        .import_text(&sample_export(), &repo)
        .await
        .expect("导入失败");
    let json = serde_json::to_value(&report).expect("序列化失败");

    assert_eq!(json["store"]["inserted"], 3);
    assert_eq!(json["outcome"]["orders"][0]["external_id"], "ORD-1");
    assert_eq!(json["outcome"]["orders"][0]["total_amount"], "150.00");
}
