// ==========================================
// 仓库变更导入系统 - 每日紧急时间窗
// ==========================================
// 规则: 本地时间 <= 截止时刻（含）→ 紧急
// 只取 `:` 分隔的前两段（"HH:mm:ss" 的秒被忽略）
// 解析失败（非数字时/分）→ 非紧急
// ==========================================

use crate::config::IntakeRules;

/// 解析 "HH:mm[:ss]"
///
/// 返回 (时, 分)；缺少分钟段时分钟为 None。时或分非数字 → None。
pub fn parse_time_of_day(value: &str) -> Option<(u32, Option<u32>)> {
    let mut parts = value.trim().split(':');
    let hour = parts.next()?.trim().parse::<u32>().ok()?;
    let minute = match parts.next() {
        None => None,
        Some(minute) => Some(minute.trim().parse::<u32>().ok()?),
    };
    Some((hour, minute))
}

/// 是否处于每日紧急时间窗
///
/// 缺少分钟时，只有早于截止小时才算紧急。
pub fn is_daily_emergency(local_time: &str, rules: &IntakeRules) -> bool {
    match parse_time_of_day(local_time) {
        Some((hour, _)) if hour < rules.emergency_cutoff_hour => true,
        Some((hour, Some(minute))) if hour == rules.emergency_cutoff_hour => {
            minute <= rules.emergency_cutoff_minute
        }
        _ => false,
    }
}
