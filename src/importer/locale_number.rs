// ==========================================
// 订单导入核心 - 本地化数值编解码
// ==========================================
// 格式: ',' 为小数分隔符，'.' 为千分位分隔符（如 1.234,56）
// 规则: 空值解析为 0；无法解析时降级为 0，不阻断批次
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::order_importer_trait::NumberCodec;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

pub struct LocaleNumberCodec;

impl NumberCodec for LocaleNumberCodec {
    fn try_decode(&self, text: &str) -> ImportResult<Decimal> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let candidate = match trimmed.rsplit_once(',') {
            Some((int_part, frac_part)) => {
                let int_part = strip_thousands(int_part);
                let int_part = match int_part.as_str() {
                    "" => "0".to_string(),
                    "-" | "+" => format!("{}0", int_part),
                    _ => int_part,
                };
                if frac_part.is_empty() {
                    int_part
                } else {
                    format!("{}.{}", int_part, frac_part)
                }
            }
            None => strip_thousands(trimmed),
        };

        Decimal::from_str(&candidate).map_err(|_| ImportError::NumberFormat {
            value: trimmed.to_string(),
        })
    }

    fn decode(&self, text: &str) -> Decimal {
        self.try_decode(text).unwrap_or(Decimal::ZERO)
    }

    fn encode(&self, value: Decimal) -> String {
        let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);

        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let plain = rounded.abs().to_string();
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut out = String::with_capacity(plain.len() + plain.len() / 3 + 1);
        if negative {
            out.push('-');
        }
        out.push_str(&group_thousands(int_part));
        out.push(',');
        out.push_str(frac_part);
        out
    }
}

/// 去除千分位分隔符
fn strip_thousands(part: &str) -> String {
    part.chars().filter(|c| *c != '.').collect()
}

/// 整数部分从右往左每三位插入 '.'
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
