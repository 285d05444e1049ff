// ==========================================
// 订单导入核心 - 核心库
// ==========================================
// 职责: 市场平台订单导出文件 → 规范化订单（含明细、金额、修复后的标识符）
// 红线: 不丢弃任何数据行（字段数不足的结构性跳过除外，且计数上报）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 订单与导入过程模型
pub mod domain;

// 导入层 - 解析与聚合
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据仓储层 - 落库接口
pub mod repository;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ColumnNames, ImportConfig};
pub use domain::{
    FieldIssue, ImportReport, LineItem, Order, ParseOutcome, ParseSummary, SkippedLine,
    StoreError, StoreReport,
};
pub use importer::{ImportError, ImportResult, OrderAggregator, OrderImporter};
pub use repository::{InMemoryOrderRepository, OrderRepository, RepositoryError};

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "marketplace-order-import";
