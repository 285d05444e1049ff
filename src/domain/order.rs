// ==========================================
// 订单导入核心 - 订单领域模型
// ==========================================
// 用途: 聚合器输出，交给外部落库方
// 金额: rust_decimal::Decimal（序列化为字符串）
// ==========================================

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 多个订单号拼接分隔符
pub const EXTERNAL_ID_SEPARATOR: &str = ",";

// ==========================================
// Order - 重建后的订单
// ==========================================
// 不变量: items 非空；total_amount = 各来源行"应开票金额"之和
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    // ===== 标识 =====
    pub external_id: String,        // 对外订单标识（多个订单号逗号拼接）
    pub external_ids: Vec<String>,  // 去重后的订单号（出现顺序）
    pub grouping_key: String,       // 分组键（包裹号 / 订单号 / 合成键）

    // ===== 收件信息 =====
    pub recipient: String,
    pub address: String,
    pub city: String,
    pub district: String,

    // ===== 物流与状态 =====
    pub carrier: String,
    pub tracking_number: String,    // 已做科学计数法修复
    pub delivery_type: String,
    pub package_status: String,
    pub currency: String,
    pub customer_type: String,
    pub logistics_flag: String,
    pub return_flag: String,

    // ===== 时间 =====
    pub order_date: NaiveDateTime,
    pub delivery_date: Option<NaiveDateTime>,

    // ===== 金额与明细 =====
    pub total_amount: Decimal,
    pub items: Vec<LineItem>,
}

impl Order {
    /// 明细行数
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// 明细数量合计
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// 是否带有订单号（否则 external_id 退化为分组键）
    pub fn has_external_id(&self) -> bool {
        !self.external_ids.is_empty()
    }
}

// ==========================================
// LineItem - 订单明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub sku: String,
    pub option1: String,
    pub option2: String,
    pub quantity: u32,            // >= 1，解析失败默认 1
    pub unit_price: Decimal,
    pub listing_price: Decimal,
    pub billed_price: Decimal,
    pub commission_rate: Decimal,
    pub tax_rate: Decimal,
    pub category: String,
    pub barcode: String,          // 已做科学计数法修复
    pub item_number: String,
    pub line_number: u64,         // 源文件行号
}
