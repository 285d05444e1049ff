// ==========================================
// 订单导入核心 - 数据仓储层
// ==========================================
// 红线: Repository 不含解析逻辑
// 职责: 订单落库接口 + 内存实现
// ==========================================

pub mod error;
pub mod in_memory_order_repo;
pub mod order_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use in_memory_order_repo::InMemoryOrderRepository;
pub use order_repo::OrderRepository;
