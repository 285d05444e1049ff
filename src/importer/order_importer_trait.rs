// ==========================================
// 订单导入核心 - 导入阶段 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 读取 → 映射 → 聚合（聚合阶段调用数值编解码与标识符修复）
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::field_mapper::RawRow;
use rust_decimal::Decimal;

// ==========================================
// NumberCodec Trait
// ==========================================
// 用途: 本地化数值编解码
// 实现者: LocaleNumberCodec
pub trait NumberCodec: Send + Sync {
    /// 解析数值文本
    ///
    /// # 返回
    /// - Ok(Decimal): 解析成功（空值返回 0）
    /// - Err(NumberFormat): 非空但无法解析
    fn try_decode(&self, text: &str) -> ImportResult<Decimal>;

    /// 解析数值文本，失败降级为 0
    fn decode(&self, text: &str) -> Decimal;

    /// 格式化为两位小数的本地化文本（如 1.234,56）
    fn encode(&self, value: Decimal) -> String;
}

// ==========================================
// IdentifierNormalizer Trait
// ==========================================
// 用途: 修复被表格软件改写的长数字标识符
// 实现者: ScientificIdNormalizer
pub trait IdentifierNormalizer: Send + Sync {
    /// 是否为科学计数法形式
    fn is_scientific(&self, text: &str) -> bool;

    /// 还原为纯数字串；不匹配时返回 TRIM 后的原值
    fn normalize(&self, text: &str) -> String;
}

// ==========================================
// RowMapper Trait
// ==========================================
// 用途: 按表头位置映射行字段
// 实现者: FieldMapper
pub trait RowMapper: Send + Sync {
    /// 将一行位置字段映射为 RawRow
    ///
    /// # 参数
    /// - header: 表头字段
    /// - fields: 行字段（可能短于表头）
    /// - line_number: 源文件行号（从 1 开始）
    /// - row_index: 数据行序号（从 0 开始，不含表头与跳过行）
    fn map_row(
        &self,
        header: &[String],
        fields: Vec<String>,
        line_number: u64,
        row_index: usize,
    ) -> RawRow;
}
