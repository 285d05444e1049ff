// ==========================================
// 订单导入核心 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 单行问题在模块内部吸收（降级/跳过），只有文件、配置、落库问题向上传播
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 字段解析错误（由聚合器降级为默认值）=====
    #[error("数值格式错误: {value}")]
    NumberFormat { value: String },

    // ===== 配置错误 =====
    #[error("配置读取失败 (path: {path}): {message}")]
    ConfigReadError { path: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 落库错误 =====
    #[error("订单落库失败: {0}")]
    Store(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<crate::repository::error::RepositoryError> for ImportError {
    fn from(err: crate::repository::error::RepositoryError) -> Self {
        ImportError::Store(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
