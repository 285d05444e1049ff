// ==========================================
// 订单导入核心 - 配置层
// ==========================================
// 职责: 导入配置加载与校验
// 存储: JSON 文件（可选），默认值内置
// ==========================================

pub mod import_config;

// 重导出核心配置
pub use import_config::{ColumnNames, ImportConfig, CONFIG_PATH_ENV};
