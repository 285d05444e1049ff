// ==========================================
// 订单导入核心 - 内存订单仓储
// ==========================================
// 唯一键: grouping_key（已存在即计为重复，不覆盖）
// 行级错误: 无明细的订单拒绝写入，其余订单继续
// ==========================================

use crate::domain::import::{StoreError, StoreReport};
use crate::domain::order::Order;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::order_repo::OrderRepository;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<HashMap<String, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(order: &Order) -> RepositoryResult<()> {
        if order.items.is_empty() {
            return Err(RepositoryError::ValidationError(format!(
                "订单 {} 没有明细行",
                order.external_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn store_orders(&self, orders: Vec<Order>) -> RepositoryResult<StoreReport> {
        let mut stored = self.orders.lock()?;
        let mut report = StoreReport::default();

        for order in orders {
            if let Err(e) = Self::validate(&order) {
                report.errors.push(StoreError {
                    external_id: order.external_id.clone(),
                    grouping_key: order.grouping_key.clone(),
                    message: e.to_string(),
                });
                continue;
            }

            if stored.contains_key(&order.grouping_key) {
                debug!(grouping_key = %order.grouping_key, "订单已存在，计为重复");
                report.duplicates += 1;
                continue;
            }

            stored.insert(order.grouping_key.clone(), order);
            report.inserted += 1;
        }

        Ok(report)
    }

    async fn count_orders(&self) -> RepositoryResult<usize> {
        Ok(self.orders.lock()?.len())
    }

    async fn find_by_grouping_key(&self, grouping_key: &str) -> RepositoryResult<Option<Order>> {
        Ok(self.orders.lock()?.get(grouping_key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn order(key: &str, with_item: bool) -> Order {
        let items = if with_item {
            vec![crate::domain::order::LineItem {
                name: "Kalem".to_string(),
                sku: "SKU1".to_string(),
                option1: String::new(),
                option2: String::new(),
                quantity: 1,
                unit_price: Decimal::ONE,
                listing_price: Decimal::ONE,
                billed_price: Decimal::ONE,
                commission_rate: Decimal::ZERO,
                tax_rate: Decimal::ZERO,
                category: String::new(),
                barcode: String::new(),
                item_number: "1".to_string(),
                line_number: 2,
            }]
        } else {
            Vec::new()
        };

        Order {
            external_id: format!("O-{}", key),
            external_ids: vec![format!("O-{}", key)],
            grouping_key: key.to_string(),
            recipient: String::new(),
            address: String::new(),
            city: String::new(),
            district: String::new(),
            carrier: String::new(),
            tracking_number: String::new(),
            delivery_type: String::new(),
            package_status: String::new(),
            currency: "TRY".to_string(),
            customer_type: String::new(),
            logistics_flag: String::new(),
            return_flag: String::new(),
            order_date: NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            delivery_date: None,
            total_amount: Decimal::ONE,
            items,
        }
    }

    #[tokio::test]
    async fn test_store_counts_new_and_duplicates() {
        let repo = InMemoryOrderRepository::new();

        let report = repo
            .store_orders(vec![order("P1", true), order("P2", true)])
            .await
            .unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.duplicates, 0);

        let report = repo
            .store_orders(vec![order("P2", true), order("P3", true)])
            .await
            .unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(repo.count_orders().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_row_level_error_does_not_abort_batch() {
        let repo = InMemoryOrderRepository::new();

        let report = repo
            .store_orders(vec![order("P1", false), order("P2", true)])
            .await
            .unwrap();

        assert_eq!(report.inserted, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].grouping_key, "P1");
        assert!(repo.find_by_grouping_key("P1").await.unwrap().is_none());
        assert!(repo.find_by_grouping_key("P2").await.unwrap().is_some());
    }
}
