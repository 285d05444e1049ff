// ==========================================
// 订单导入核心 - 导入配置
// ==========================================
// 职责: 分隔符、最少字段数、日期格式、表头列名
// 来源: JSON 文件（可选），缺省字段使用默认值
// 环境变量: MARKETPLACE_IMPORT_CONFIG 指向配置文件路径
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "MARKETPLACE_IMPORT_CONFIG";

// ==========================================
// ImportConfig - 导入配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub delimiter: char,              // 字段分隔符（单字节）
    pub min_fields: usize,            // 少于该字段数的行视为结构性跳过
    pub quoting: bool,                // 是否识别双引号包裹字段
    pub date_formats: Vec<String>,    // 日期格式（按顺序尝试）
    pub synthetic_key_prefix: String, // 合成分组键前缀
    pub columns: ColumnNames,         // 表头列名
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            min_fields: 3,
            quoting: false,
            date_formats: vec!["%d-%m-%Y %H:%M:%S".to_string(), "%d-%m-%Y".to_string()],
            synthetic_key_prefix: "row-".to_string(),
            columns: ColumnNames::default(),
        }
    }
}

impl ImportConfig {
    /// 从 JSON 文本读取配置
    pub fn from_json_str(raw: &str) -> ImportResult<Self> {
        let config: ImportConfig =
            serde_json::from_str(raw).map_err(|e| ImportError::ConfigReadError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件读取配置
    pub fn load<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: ImportConfig =
            serde_json::from_str(&raw).map_err(|e| ImportError::ConfigReadError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 按环境变量加载；未设置时使用默认配置
    pub fn from_env() -> ImportResult<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    /// 校验配置值
    pub fn validate(&self) -> ImportResult<()> {
        if !self.delimiter.is_ascii() {
            return Err(ImportError::ConfigValueError {
                key: "delimiter".to_string(),
                value: self.delimiter.to_string(),
                message: "分隔符必须为单字节 ASCII 字符".to_string(),
            });
        }
        if self.min_fields == 0 {
            return Err(ImportError::ConfigValueError {
                key: "min_fields".to_string(),
                value: self.min_fields.to_string(),
                message: "最少字段数必须大于 0".to_string(),
            });
        }
        if self.date_formats.is_empty() {
            return Err(ImportError::ConfigValueError {
                key: "date_formats".to_string(),
                value: "[]".to_string(),
                message: "至少需要一个日期格式".to_string(),
            });
        }
        Ok(())
    }

    /// 分隔符字节；未经 validate 的非 ASCII 分隔符回退为 ';' 并告警
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            warn!(
                delimiter = %self.delimiter,
                "分隔符不是单字节 ASCII 字符，回退为 ';'"
            );
            b';'
        }
    }
}

// ==========================================
// ColumnNames - 表头列名（精确匹配，大小写/变音符敏感）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    // ===== 分组键 =====
    pub order_id: String,   // 订单号（次分组键）
    pub package_id: String, // 包裹号（主分组键）

    // ===== 收件信息 =====
    pub recipient: String,
    pub address: String,
    pub city: String,
    pub district: String,

    // ===== 商品行 =====
    pub item_name: String,
    pub sku: String,
    pub option1: String,
    pub option2: String,
    pub quantity: String,
    pub billed_price: String,
    pub listing_price: String,
    pub unit_price: String,
    pub commission: String,
    pub tax_rate: String,
    pub category: String,
    pub barcode: String,
    pub item_number: String,

    // ===== 物流与状态 =====
    pub carrier: String,
    pub tracking_number: String,
    pub order_date: String,
    pub delivery_date: String,
    pub delivery_type: String,
    pub package_status: String,
    pub currency: String,
    pub customer_type: String,
    pub logistics_flag: String,
    pub return_flag: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            order_id: "Sipariş Numarası".to_string(),
            package_id: "Paket Numarası".to_string(),
            recipient: "Alıcı".to_string(),
            address: "Teslimat Adresi".to_string(),
            city: "İl".to_string(),
            district: "İlçe".to_string(),
            item_name: "Ürün Adı".to_string(),
            sku: "Stok Kodu".to_string(),
            option1: "Seçenek 1".to_string(),
            option2: "Seçenek 2".to_string(),
            quantity: "Adet".to_string(),
            billed_price: "Faturalanacak Tutar".to_string(),
            listing_price: "Liste Fiyatı".to_string(),
            unit_price: "Birim Fiyatı".to_string(),
            commission: "Komisyon Oranı".to_string(),
            tax_rate: "KDV Oranı".to_string(),
            category: "Kategori".to_string(),
            barcode: "Barkod".to_string(),
            item_number: "Kalem No".to_string(),
            carrier: "Kargo Firması".to_string(),
            tracking_number: "Kargo Takip Numarası".to_string(),
            order_date: "Sipariş Tarihi".to_string(),
            delivery_date: "Teslim Tarihi".to_string(),
            delivery_type: "Teslimat Tipi".to_string(),
            package_status: "Paket Durumu".to_string(),
            currency: "Para Birimi".to_string(),
            customer_type: "Müşteri Tipi".to_string(),
            logistics_flag: "Lojistik".to_string(),
            return_flag: "İade".to_string(),
        }
    }
}
