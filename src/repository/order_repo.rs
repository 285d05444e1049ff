// ==========================================
// 订单导入核心 - 订单仓储 Trait
// ==========================================
// 职责: 定义订单落库接口（外部协作方契约，不包含实现）
// 契约: 接收订单列表，返回新增/重复数量与行级错误，单条失败不中断批次
// ==========================================

use crate::domain::import::StoreReport;
use crate::domain::order::Order;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// OrderRepository Trait
// ==========================================
// 实现者: InMemoryOrderRepository；宿主可接入自己的持久化实现
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 批量落库
    ///
    /// # 返回
    /// - Ok(StoreReport): inserted / duplicates / 行级 errors
    /// - Err: 存储整体不可用
    async fn store_orders(&self, orders: Vec<Order>) -> RepositoryResult<StoreReport>;

    /// 已存储订单数
    async fn count_orders(&self) -> RepositoryResult<usize>;

    /// 按分组键查询
    async fn find_by_grouping_key(&self, grouping_key: &str) -> RepositoryResult<Option<Order>>;
}
