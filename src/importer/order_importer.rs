// ==========================================
// 订单导入核心 - 订单导入器实现
// ==========================================
// 职责: 整合导入流程，从原始文本到订单列表（可选落库）
// 流程: 读取 → 映射 → 聚合 → 汇总 → 落库
// 说明: 解析阶段为纯同步折叠；只有文件读取与落库可能返回错误
// ==========================================

use crate::config::ImportConfig;
use crate::domain::import::{ImportReport, ParseOutcome, ParseSummary};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::order_aggregator::{AggregationResult, OrderAggregator};
use crate::importer::order_importer_trait::RowMapper;
use crate::importer::record_reader::{RecordLine, RecordReader};
use crate::repository::OrderRepository;
use chrono::{Local, NaiveDateTime};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// OrderImporter - 订单导入器
// ==========================================
pub struct OrderImporter {
    config: ImportConfig,
    field_mapper: Box<dyn RowMapper>,
}

impl OrderImporter {
    pub fn new(config: ImportConfig) -> Self {
        Self::with_mapper(config, Box::new(FieldMapper))
    }

    pub fn with_mapper(config: ImportConfig, field_mapper: Box<dyn RowMapper>) -> Self {
        Self {
            config,
            field_mapper,
        }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// 解析原始文本（日期默认值取当前本地时间）
    pub fn parse_text(&self, text: &str) -> ParseOutcome {
        self.parse_text_at(text, Local::now().naive_local())
    }

    /// 解析原始文本
    ///
    /// # 参数
    /// - text: 导出文件全文
    /// - now: 日期无法解析时的默认值
    ///
    /// # 返回
    /// - ParseOutcome: 订单列表 + 跳过行 + 字段降级记录；空输入返回空订单列表
    #[instrument(skip(self, text, now), fields(bytes = text.len()))]
    pub fn parse_text_at(&self, text: &str, now: NaiveDateTime) -> ParseOutcome {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        info!(batch_id = %batch_id, "开始解析订单导出文件");

        // === 步骤 1: 读取表头 ===
        let reader = RecordReader::new(&self.config);
        let (header, lines) = reader.read(text).into_parts();
        if header.is_empty() {
            warn!(batch_id = %batch_id, "输入为空，未找到表头");
        } else {
            self.warn_missing_key_columns(&header);
        }

        // === 步骤 2: 逐行映射 + 聚合 ===
        let mut aggregator = OrderAggregator::new(&self.config, now);
        let mut skipped = Vec::new();
        let mut total_lines = 0usize;
        let mut row_index = 0usize;

        for line in lines {
            total_lines += 1;
            match line {
                RecordLine::Data {
                    line_number,
                    fields,
                } => {
                    let row = self
                        .field_mapper
                        .map_row(&header, fields, line_number, row_index);
                    row_index += 1;
                    aggregator.push(row);
                }
                RecordLine::Skipped(skip) => {
                    warn!(
                        line = skip.line_number,
                        field_count = skip.field_count,
                        reason = %skip.reason,
                        "结构性跳过"
                    );
                    skipped.push(skip);
                }
            }
        }

        // === 步骤 3: 输出 ===
        let AggregationResult { orders, issues } = aggregator.finish();
        let summary = ParseSummary {
            total_lines,
            data_rows: row_index,
            skipped_lines: skipped.len(),
            orders: orders.len(),
            line_items: orders.iter().map(|o| o.items.len()).sum(),
            degraded_fields: issues.len(),
        };

        let elapsed_time = start_time.elapsed();
        info!(
            batch_id = %batch_id,
            data_rows = summary.data_rows,
            skipped = summary.skipped_lines,
            orders = summary.orders,
            degraded_fields = summary.degraded_fields,
            elapsed_ms = elapsed_time.as_millis() as u64,
            "订单导出文件解析完成"
        );

        ParseOutcome {
            batch_id,
            orders,
            summary,
            skipped,
            issues,
            elapsed_time,
        }
    }

    /// 从文件解析（文件须为 UTF-8 文本）
    pub fn parse_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ParseOutcome> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let text = std::fs::read_to_string(path)?;
        debug!(file_path = %path.display(), bytes = text.len(), "文件读取完成");
        Ok(self.parse_text(&text))
    }

    /// 解析并落库
    ///
    /// # 返回
    /// - Ok(ImportReport): 解析结果 + 新增/重复/行级错误统计
    /// - Err(Store): 落库方整体失败
    #[instrument(skip(self, text, repo))]
    pub async fn import_text(
        &self,
        text: &str,
        repo: &dyn OrderRepository,
    ) -> ImportResult<ImportReport> {
        let outcome = self.parse_text(text);
        self.store(outcome, repo).await
    }

    /// 从文件解析并落库
    pub async fn import_file<P: AsRef<Path>>(
        &self,
        file_path: P,
        repo: &dyn OrderRepository,
    ) -> ImportResult<ImportReport> {
        let outcome = self.parse_file(file_path)?;
        self.store(outcome, repo).await
    }

    /// 批量导入多个文本（并发执行，互不影响）
    pub async fn batch_import(
        &self,
        texts: Vec<String>,
        repo: &dyn OrderRepository,
    ) -> Vec<ImportResult<ImportReport>> {
        let tasks = texts.iter().map(|text| self.import_text(text, repo));
        futures::future::join_all(tasks).await
    }

    async fn store(
        &self,
        outcome: ParseOutcome,
        repo: &dyn OrderRepository,
    ) -> ImportResult<ImportReport> {
        if outcome.is_empty() {
            warn!(batch_id = %outcome.batch_id, "未解析出任何订单，跳过落库");
            return Ok(ImportReport {
                outcome,
                store: Default::default(),
            });
        }

        let store = repo.store_orders(outcome.orders.clone()).await?;
        info!(
            batch_id = %outcome.batch_id,
            inserted = store.inserted,
            duplicates = store.duplicates,
            errors = store.errors.len(),
            "订单落库完成"
        );
        for err in &store.errors {
            warn!(external_id = %err.external_id, message = %err.message, "订单落库失败");
        }

        Ok(ImportReport { outcome, store })
    }

    fn warn_missing_key_columns(&self, header: &[String]) {
        let columns = &self.config.columns;
        for name in [&columns.package_id, &columns.order_id, &columns.billed_price] {
            if !header.iter().any(|h| h == name) {
                warn!(column = %name, "表头缺少关键列，相关字段按空值处理");
            }
        }
    }
}
