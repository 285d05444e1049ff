// ==========================================
// 订单导入核心 - 导入层
// ==========================================
// 职责: 市场平台导出文件 → 订单列表
// 管道: 分隔符读取 → 字段映射 → 订单聚合（数值解码 + 标识符修复）
// ==========================================

// 模块声明
pub mod error;
pub mod field_mapper;
pub mod identifier;
pub mod locale_number;
pub mod order_aggregator;
pub mod order_importer;
pub mod order_importer_trait;
pub mod record_reader;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, RawRow};
pub use identifier::ScientificIdNormalizer;
pub use locale_number::LocaleNumberCodec;
pub use order_aggregator::{AggregationResult, OrderAggregator, OrderGroup};
pub use order_importer::OrderImporter;
pub use record_reader::{RecordLine, RecordReader};

// 重导出 Trait 接口
pub use order_importer_trait::{IdentifierNormalizer, NumberCodec, RowMapper};
