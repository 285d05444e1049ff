// ==========================================
// 订单导入核心 - 命令行宿主
// ==========================================
// 用法:
//   marketplace-order-import <export_file> [config.json]
//
// 解析导出文件，写入内存仓储，以 JSON 输出导入报告。
// 未解析出任何订单时退出码为 2。
// ==========================================

use marketplace_order_import::{logging, ImportConfig, InMemoryOrderRepository, OrderImporter};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let file_path = args
        .next()
        .ok_or("用法: marketplace-order-import <export_file> [config.json]")?;

    let config = match args.next() {
        Some(path) => ImportConfig::load(&path)?,
        None => ImportConfig::from_env()?,
    };

    tracing::info!(
        version = marketplace_order_import::VERSION,
        file_path = %file_path,
        "开始导入"
    );

    let importer = OrderImporter::new(config);
    let repo = InMemoryOrderRepository::new();
    let report = importer.import_file(&file_path, &repo).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.outcome.is_empty() {
        tracing::warn!(file_path = %file_path, "文件中未找到有效订单");
        return Ok(ExitCode::from(2));
    }
    if report.outcome.summary.skipped_lines > 0 {
        tracing::warn!(
            skipped = report.outcome.summary.skipped_lines,
            "部分行因字段数不足被跳过"
        );
    }

    Ok(ExitCode::SUCCESS)
}
