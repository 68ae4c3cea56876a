// ==========================================
// 仓库变更导入系统 - 数值/编码标准化
// ==========================================
// 职责: 区域格式不明的数字解析 + 科学计数法物料号还原
// 红线: 不返回错误；无法解析的数值降级为 0（由行校验标记）
// ==========================================

use once_cell::sync::Lazy;
use regex::Regex;

// <整数>[.<小数>]E[+]<指数>，大小写不敏感
static SCIENTIFIC_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(\d+)(?:\.(\d+))?e\+?(\d+)\s*$").expect("科学计数法正则非法")
});

/// 解析区域格式不明的数字
///
/// # 规则
/// - 仅保留数字、`.`、`,`、`-`
/// - `.` 与 `,` 同时出现 → 最右侧者为小数点，另一者为千分位（删除）
/// - 仅出现 `,` → 视为小数点
/// - 空串/无法解析 → 0
///
/// # 示例
/// ```
/// use warehouse_intake::importer::normalizer::parse_ambiguous_number;
/// assert_eq!(parse_ambiguous_number("1.234,56"), 1234.56);
/// assert_eq!(parse_ambiguous_number("1,234.56"), 1234.56);
/// assert_eq!(parse_ambiguous_number(""), 0.0);
/// ```
pub fn parse_ambiguous_number(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if dot > comma => cleaned.replace(',', ""),
        (Some(_), Some(_)) => cleaned.replace('.', "").replace(',', "."),
        (None, Some(_)) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// 展开后的最大位数
pub const MAX_EXPANDED_DIGITS: usize = 64;

/// 还原科学计数法表示的物料号
///
/// 表格软件会把长数字物料号显示成 `1.7805E+13`，这里恢复成精确数字串。
/// 小数点右移后仍有小数部分 → 原样返回。
///
/// # 示例
/// ```
/// use warehouse_intake::importer::normalizer::expand_scientific_code;
/// assert_eq!(expand_scientific_code("1.7805E+13"), "17805000000000");
/// assert_eq!(expand_scientific_code("SKU-001"), "SKU-001");
/// ```
pub fn expand_scientific_code(text: &str) -> String {
    let Some(caps) = SCIENTIFIC_CODE.captures(text) else {
        return text.to_string();
    };

    let integer = &caps[1];
    let fraction = caps.get(2).map_or("", |m| m.as_str()).trim_end_matches('0');
    let Ok(exponent) = caps[3].parse::<usize>() else {
        return text.to_string();
    };

    if exponent < fraction.len() {
        return text.to_string();
    }
    // 超长结果不是物料号，原样返回
    match integer.len().checked_add(exponent) {
        Some(len) if len <= MAX_EXPANDED_DIGITS => {}
        _ => return text.to_string(),
    }

    let mut digits = String::with_capacity(integer.len() + exponent);
    digits.push_str(integer);
    digits.push_str(fraction);
    digits.push_str(&"0".repeat(exponent - fraction.len()));

    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
