// ==========================================
// 订单导入核心 - 导入过程模型
// ==========================================
// 用途: 解析统计、结构性跳过、字段降级、落库报告
// 生命周期: 单次导入
// ==========================================

use crate::domain::order::Order;
use serde::{Deserialize, Serialize};

// ==========================================
// SkippedLine - 结构性跳过的行
// ==========================================
// 唯一允许丢弃原始行的情形：字段数不足
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    pub line_number: u64,   // 源文件行号
    pub field_count: usize, // 实际字段数
    pub reason: String,     // 跳过原因
}

// ==========================================
// FieldIssue - 字段级降级记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub row_index: usize,      // 数据行序号
    pub line_number: u64,      // 源文件行号
    pub grouping_key: String,  // 所属分组键
    pub field: String,         // 表头列名
    pub raw_value: String,     // 原始值
    pub fallback: String,      // 降级后的取值
}

// ==========================================
// ParseSummary - 解析汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseSummary {
    pub total_lines: usize,     // 非空数据行（不含表头）
    pub data_rows: usize,       // 参与聚合的行
    pub skipped_lines: usize,   // 结构性跳过
    pub orders: usize,          // 重建的订单数
    pub line_items: usize,      // 明细总数（== data_rows）
    pub degraded_fields: usize, // 降级字段数
}

// ==========================================
// ParseOutcome - 单次解析结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub batch_id: String,
    pub orders: Vec<Order>,
    pub summary: ParseSummary,
    pub skipped: Vec<SkippedLine>,
    pub issues: Vec<FieldIssue>,
    pub elapsed_time: std::time::Duration,
}

impl ParseOutcome {
    /// 未解析出任何订单（由调用方决定是否提示操作员）
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

// ==========================================
// StoreReport - 落库报告（外部协作方契约）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreReport {
    pub inserted: usize,         // 新增订单数
    pub duplicates: usize,       // 已存在（重复）订单数
    pub errors: Vec<StoreError>, // 行级落库错误（不中断批次）
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreError {
    pub external_id: String,
    pub grouping_key: String,
    pub message: String,
}

// ==========================================
// ImportReport - 解析 + 落库
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub outcome: ParseOutcome,
    pub store: StoreReport,
}
