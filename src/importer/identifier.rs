// ==========================================
// 订单导入核心 - 标识符修复（科学计数法还原）
// ==========================================
// 场景: 表格软件把长数字条码改写成 6,25541E+13 这类科学计数法
// 规则: 仅在模式明确匹配时修复，其他输入原样返回（仅 TRIM）
// 计算: 基于数字串移位，结果精确，不经过浮点
// ==========================================

use crate::importer::order_importer_trait::IdentifierNormalizer;
use once_cell::sync::Lazy;
use regex::Regex;

/// 尾数（ASCII 数字 + 可选分隔符 + 数字）+ E/e + 可选符号 + 指数
static SCIENTIFIC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+)(?:[.,]([0-9]+))?[eE]([+-]?[0-9]+)$").expect("scientific pattern is valid")
});

/// 超过该指数的值不视为被改写的条码
const MAX_EXPONENT: i64 = 64;

pub struct ScientificIdNormalizer;

impl IdentifierNormalizer for ScientificIdNormalizer {
    fn is_scientific(&self, text: &str) -> bool {
        SCIENTIFIC_PATTERN.is_match(text.trim())
    }

    fn normalize(&self, text: &str) -> String {
        let trimmed = text.trim();
        let caps = match SCIENTIFIC_PATTERN.captures(trimmed) {
            Some(caps) => caps,
            None => return trimmed.to_string(),
        };

        let int_digits = caps.get(1).map_or("", |m| m.as_str());
        let frac_digits = caps.get(2).map_or("", |m| m.as_str());
        let exponent = match caps.get(3).and_then(|m| m.as_str().parse::<i64>().ok()) {
            Some(e) if e.abs() <= MAX_EXPONENT => e,
            _ => return trimmed.to_string(),
        };

        let digits = format!("{}{}", int_digits, frac_digits);
        let shift = exponent - frac_digits.len() as i64;

        if shift >= 0 {
            let mut whole = digits;
            whole.push_str(&"0".repeat(shift as usize));
            strip_leading_zeros(&whole)
        } else {
            render_fraction(&digits, (-shift) as usize)
        }
    }
}

fn strip_leading_zeros(digits: &str) -> String {
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// 小数点左移 places 位后渲染（去掉多余的 0）
fn render_fraction(digits: &str, places: usize) -> String {
    let (int_part, frac_part) = if places >= digits.len() {
        (
            "0".to_string(),
            format!("{}{}", "0".repeat(places - digits.len()), digits),
        )
    } else {
        let split = digits.len() - places;
        (digits[..split].to_string(), digits[split..].to_string())
    };

    let int_part = strip_leading_zeros(&int_part);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part
    } else {
        format!("{}.{}", int_part, frac_part)
    }
}
