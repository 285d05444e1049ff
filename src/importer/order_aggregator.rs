// ==========================================
// 订单导入核心 - 订单聚合器
// ==========================================
// 职责: 逐行折叠 RawRow → 订单分组 → 订单列表
// 分组键: 包裹号 → 订单号 → 合成键（row-<行序号>）
// 规则:
//   1. 每个数据行恰好产生一条明细，归入恰好一个分组
//   2. 订单级标量字段由建组首行写入，之后不覆盖
//   3. total_amount = 各来源行"应开票金额"之和（不是明细价格之和）
//   4. 同一分组出现新的订单号时追加到 external_ids
//   5. 单行字段解析失败降级为默认值，聚合器本身不报错
// ==========================================

use crate::config::ImportConfig;
use crate::domain::import::FieldIssue;
use crate::domain::order::{LineItem, Order, EXTERNAL_ID_SEPARATOR};
use crate::importer::field_mapper::RawRow;
use crate::importer::identifier::ScientificIdNormalizer;
use crate::importer::locale_number::LocaleNumberCodec;
use crate::importer::order_importer_trait::{IdentifierNormalizer, NumberCodec};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, info, warn};

// ==========================================
// OrderGroup - 分组累加器
// ==========================================
#[derive(Debug, Clone)]
pub struct OrderGroup {
    pub grouping_key: String,
    pub external_ids: Vec<String>,
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,

    // 建组首行写入
    recipient: String,
    address: String,
    city: String,
    district: String,
    carrier: String,
    tracking_number: String,
    delivery_type: String,
    package_status: String,
    currency: String,
    customer_type: String,
    logistics_flag: String,
    return_flag: String,
    order_date: NaiveDateTime,
    delivery_date: Option<NaiveDateTime>,
}

impl OrderGroup {
    fn add_external_id(&mut self, order_id: &str) {
        if !order_id.is_empty() && !self.external_ids.iter().any(|id| id == order_id) {
            self.external_ids.push(order_id.to_string());
        }
    }

    /// 转换为输出订单
    pub fn into_order(self) -> Order {
        let external_id = if self.external_ids.is_empty() {
            self.grouping_key.clone()
        } else {
            self.external_ids.join(EXTERNAL_ID_SEPARATOR)
        };

        Order {
            external_id,
            external_ids: self.external_ids,
            grouping_key: self.grouping_key,
            recipient: self.recipient,
            address: self.address,
            city: self.city,
            district: self.district,
            carrier: self.carrier,
            tracking_number: self.tracking_number,
            delivery_type: self.delivery_type,
            package_status: self.package_status,
            currency: self.currency,
            customer_type: self.customer_type,
            logistics_flag: self.logistics_flag,
            return_flag: self.return_flag,
            order_date: self.order_date,
            delivery_date: self.delivery_date,
            total_amount: self.total_amount,
            items: self.items,
        }
    }
}

// ==========================================
// AggregationResult - 聚合输出
// ==========================================
#[derive(Debug, Clone)]
pub struct AggregationResult {
    pub orders: Vec<Order>,      // 首次出现顺序
    pub issues: Vec<FieldIssue>, // 字段降级记录
}

/// 计算分组键
pub fn grouping_key(primary: &str, secondary: &str, row_index: usize, prefix: &str) -> String {
    GroupKey::resolve(primary, secondary, row_index).render(prefix)
}

// ==========================================
// GroupKey - 分组索引键
// ==========================================
// 合成键与真实包裹号/订单号分属不同命名空间，
// 即使某个包裹号恰好是 "row-1" 也不会吸收无键行
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Real(String),
    Synthetic(usize),
}

impl GroupKey {
    fn resolve(primary: &str, secondary: &str, row_index: usize) -> Self {
        if !primary.is_empty() {
            GroupKey::Real(primary.to_string())
        } else if !secondary.is_empty() {
            GroupKey::Real(secondary.to_string())
        } else {
            GroupKey::Synthetic(row_index)
        }
    }

    fn render(&self, prefix: &str) -> String {
        match self {
            GroupKey::Real(key) => key.clone(),
            GroupKey::Synthetic(row_index) => format!("{}{}", prefix, row_index),
        }
    }
}

// ==========================================
// OrderAggregator
// ==========================================
pub struct OrderAggregator<'a> {
    config: &'a ImportConfig,
    codec: Box<dyn NumberCodec>,
    normalizer: Box<dyn IdentifierNormalizer>,
    now: NaiveDateTime,

    index: HashMap<GroupKey, usize>,
    groups: Vec<OrderGroup>,
    issues: Vec<FieldIssue>,
    rows: usize,
}

impl<'a> OrderAggregator<'a> {
    /// 创建聚合器
    ///
    /// # 参数
    /// - config: 导入配置（列名、日期格式、合成键前缀）
    /// - now: 日期无法解析时的默认值
    pub fn new(config: &'a ImportConfig, now: NaiveDateTime) -> Self {
        Self::with_components(
            config,
            now,
            Box::new(LocaleNumberCodec),
            Box::new(ScientificIdNormalizer),
        )
    }

    pub fn with_components(
        config: &'a ImportConfig,
        now: NaiveDateTime,
        codec: Box<dyn NumberCodec>,
        normalizer: Box<dyn IdentifierNormalizer>,
    ) -> Self {
        Self {
            config,
            codec,
            normalizer,
            now,
            index: HashMap::new(),
            groups: Vec::new(),
            issues: Vec::new(),
            rows: 0,
        }
    }

    /// 折叠一行
    pub fn push(&mut self, row: RawRow) {
        let config = self.config;
        let columns = &config.columns;
        let primary = row.get(&columns.package_id).to_string();
        let secondary = row.get(&columns.order_id).to_string();
        let index_key = GroupKey::resolve(&primary, &secondary, row.row_index);
        let key = index_key.render(&config.synthetic_key_prefix);

        let billed = self.decode_money(&row, &key, &columns.billed_price);
        let item = self.build_line_item(&row, &key, billed);
        self.rows += 1;

        if let Some(&idx) = self.index.get(&index_key) {
            match self.groups[idx].total_amount.checked_add(billed) {
                Some(total) => self.groups[idx].total_amount = total,
                None => {
                    let kept = self.groups[idx].total_amount;
                    warn!(
                        grouping_key = %key,
                        line = row.line_number,
                        "订单总额溢出，保留原总额"
                    );
                    self.record_issue(&row, &key, &columns.billed_price, &kept.to_string());
                }
            }

            let group = &mut self.groups[idx];
            group.items.push(item);

            let known = group.external_ids.iter().any(|id| *id == secondary);
            if !secondary.is_empty() && !known {
                debug!(
                    grouping_key = %key,
                    order_id = %secondary,
                    "同一包裹出现新的订单号，追加到 external_ids"
                );
            }
            group.add_external_id(&secondary);
            return;
        }

        let mut group = self.open_group(&row, &key);
        group.total_amount = billed;
        group.items.push(item);
        group.add_external_id(&secondary);

        debug!(grouping_key = %key, line = row.line_number, "新建订单分组");
        self.index.insert(index_key, self.groups.len());
        self.groups.push(group);
    }

    /// 折叠全部行
    pub fn extend<I: IntoIterator<Item = RawRow>>(&mut self, rows: I) {
        for row in rows {
            self.push(row);
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// 按首次出现顺序输出订单
    pub fn finish(self) -> AggregationResult {
        info!(
            rows = self.rows,
            orders = self.groups.len(),
            degraded_fields = self.issues.len(),
            "订单聚合完成"
        );

        AggregationResult {
            orders: self.groups.into_iter().map(OrderGroup::into_order).collect(),
            issues: self.issues,
        }
    }

    // ==========================================
    // 建组（首行写入标量字段）
    // ==========================================
    fn open_group(&mut self, row: &RawRow, key: &str) -> OrderGroup {
        let config = self.config;
        let columns = &config.columns;
        let tracking_number = self.normalizer.normalize(row.get(&columns.tracking_number));
        let order_date = self
            .parse_date(row, key, &columns.order_date)
            .unwrap_or(self.now);
        let delivery_date = self.parse_date(row, key, &columns.delivery_date);

        OrderGroup {
            grouping_key: key.to_string(),
            external_ids: Vec::new(),
            items: Vec::new(),
            total_amount: Decimal::ZERO,
            recipient: row.get(&columns.recipient).to_string(),
            address: row.get(&columns.address).to_string(),
            city: row.get(&columns.city).to_string(),
            district: row.get(&columns.district).to_string(),
            carrier: row.get(&columns.carrier).to_string(),
            tracking_number,
            delivery_type: row.get(&columns.delivery_type).to_string(),
            package_status: row.get(&columns.package_status).to_string(),
            currency: row.get(&columns.currency).to_string(),
            customer_type: row.get(&columns.customer_type).to_string(),
            logistics_flag: row.get(&columns.logistics_flag).to_string(),
            return_flag: row.get(&columns.return_flag).to_string(),
            order_date,
            delivery_date,
        }
    }

    fn build_line_item(&mut self, row: &RawRow, key: &str, billed: Decimal) -> LineItem {
        let config = self.config;
        let columns = &config.columns;

        LineItem {
            name: row.get(&columns.item_name).to_string(),
            sku: row.get(&columns.sku).to_string(),
            option1: row.get(&columns.option1).to_string(),
            option2: row.get(&columns.option2).to_string(),
            quantity: self.parse_quantity(row, key, &columns.quantity),
            unit_price: self.decode_money(row, key, &columns.unit_price),
            listing_price: self.decode_money(row, key, &columns.listing_price),
            billed_price: billed,
            commission_rate: self.decode_money(row, key, &columns.commission),
            tax_rate: self.decode_money(row, key, &columns.tax_rate),
            category: row.get(&columns.category).to_string(),
            barcode: self.normalizer.normalize(row.get(&columns.barcode)),
            item_number: row.get(&columns.item_number).to_string(),
            line_number: row.line_number,
        }
    }

    // ==========================================
    // 字段解析（失败降级 + 记录）
    // ==========================================

    fn decode_money(&mut self, row: &RawRow, key: &str, column: &str) -> Decimal {
        match self.codec.try_decode(row.get(column)) {
            Ok(value) => value,
            Err(e) => {
                debug!(line = row.line_number, field = column, error = %e, "数值解析失败，降级为 0");
                self.record_issue(row, key, column, "0");
                Decimal::ZERO
            }
        }
    }

    /// 数量: 整数且 >= 1，否则为 1
    fn parse_quantity(&mut self, row: &RawRow, key: &str, column: &str) -> u32 {
        let raw = row.get(column);
        if raw.is_empty() {
            return 1;
        }
        match raw.parse::<u32>() {
            Ok(q) if q >= 1 => q,
            _ => {
                debug!(line = row.line_number, field = column, value = raw, "数量解析失败，降级为 1");
                self.record_issue(row, key, column, "1");
                1
            }
        }
    }

    /// 空值返回 None；非空但无法解析时返回 now
    fn parse_date(&mut self, row: &RawRow, key: &str, column: &str) -> Option<NaiveDateTime> {
        let raw = row.get(column);
        if raw.is_empty() {
            return None;
        }
        let config = self.config;
        if let Some(parsed) = parse_datetime(raw, &config.date_formats) {
            return Some(parsed);
        }

        debug!(line = row.line_number, field = column, value = raw, "日期解析失败，降级为当前时间");
        let fallback = self.now.format("%d-%m-%Y %H:%M:%S").to_string();
        self.record_issue(row, key, column, &fallback);
        Some(self.now)
    }

    fn record_issue(&mut self, row: &RawRow, key: &str, column: &str, fallback: &str) {
        self.issues.push(FieldIssue {
            row_index: row.row_index,
            line_number: row.line_number,
            grouping_key: key.to_string(),
            field: column.to_string(),
            raw_value: row.get(column).to_string(),
            fallback: fallback.to_string(),
        });
    }
}

/// 按配置的格式依次尝试；仅含日期的格式补 00:00:00
pub fn parse_datetime(raw: &str, formats: &[String]) -> Option<NaiveDateTime> {
    formats.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(raw, fmt).ok().or_else(|| {
            NaiveDate::parse_from_str(raw, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
    })
}
