// ==========================================
// 订单导入核心 - 领域模型层
// ==========================================
// 职责: 定义订单实体与导入过程模型
// 红线: 不含解析逻辑，不含数据访问逻辑
// ==========================================

pub mod import;
pub mod order;

// 重导出核心类型
pub use import::{
    FieldIssue, ImportReport, ParseOutcome, ParseSummary, SkippedLine, StoreError, StoreReport,
};
pub use order::{LineItem, Order, EXTERNAL_ID_SEPARATOR};
