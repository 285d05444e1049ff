// ==========================================
// 订单导入核心 - 字段映射器实现
// ==========================================
// 职责: 表头列名 × 行字段（按位置）→ RawRow
// 规则: 缺失的尾部字段视为空串；值仅 TRIM，不做数值/标识符转换
// ==========================================

use crate::importer::order_importer_trait::RowMapper;
use std::collections::HashMap;

// ==========================================
// RawRow - 映射后的原始行
// ==========================================
// 生命周期: 单步聚合内创建并丢弃
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub line_number: u64,  // 源文件行号
    pub row_index: usize,  // 数据行序号（合成分组键使用）
    values: HashMap<String, String>,
}

impl RawRow {
    /// 取列值；列不存在时返回空串
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }

    /// 列值非空时返回 Some
    pub fn get_non_empty(&self, column: &str) -> Option<&str> {
        let value = self.get(column);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn column_count(&self) -> usize {
        self.values.len()
    }
}

pub struct FieldMapper;

impl RowMapper for FieldMapper {
    fn map_row(
        &self,
        header: &[String],
        fields: Vec<String>,
        line_number: u64,
        row_index: usize,
    ) -> RawRow {
        let mut values = HashMap::with_capacity(header.len());
        let mut fields = fields.into_iter();

        for name in header {
            let value = fields
                .next()
                .map(|v| v.trim().to_string())
                .unwrap_or_default();
            // 重复列名: 首次出现生效
            values.entry(name.clone()).or_insert(value);
        }

        RawRow {
            line_number,
            row_index,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_field_mapper_basic() {
        let row = FieldMapper.map_row(
            &header(&["Paket Numarası", "Adet", "Ürün Adı"]),
            fields(&["P1", "2", "Kalem"]),
            2,
            0,
        );

        assert_eq!(row.get("Paket Numarası"), "P1");
        assert_eq!(row.get("Adet"), "2");
        assert_eq!(row.line_number, 2);
        assert_eq!(row.row_index, 0);
    }

    #[test]
    fn test_field_mapper_trim_whitespace() {
        let row = FieldMapper.map_row(&header(&["A", "B", "C"]), fields(&["  x  ", "\ty", "z "]), 2, 0);
        assert_eq!(row.get("A"), "x");
        assert_eq!(row.get("B"), "y");
        assert_eq!(row.get("C"), "z");
    }

    #[test]
    fn test_field_mapper_short_row_defaults_to_empty() {
        let row = FieldMapper.map_row(&header(&["A", "B", "C", "D"]), fields(&["1", "2", "3"]), 5, 3);

        assert_eq!(row.get("C"), "3");
        assert_eq!(row.get("D"), "");
        assert!(row.contains_column("D"));
        assert_eq!(row.get_non_empty("D"), None);
        assert_eq!(row.column_count(), 4);
    }

    #[test]
    fn test_field_mapper_unknown_and_surplus() {
        let row = FieldMapper.map_row(&header(&["A", "Extra"]), fields(&["1", "keep", "surplus"]), 2, 0);

        // 未知列保留在行内
        assert_eq!(row.get("Extra"), "keep");
        // 超出表头的字段丢弃
        assert_eq!(row.column_count(), 2);
        // 不存在的列返回空串
        assert_eq!(row.get("Missing"), "");
    }

    #[test]
    fn test_field_mapper_duplicate_header_first_wins() {
        let row = FieldMapper.map_row(&header(&["A", "A", "B"]), fields(&["first", "second", "b"]), 2, 0);
        assert_eq!(row.get("A"), "first");
    }
}
