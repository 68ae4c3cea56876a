// ==========================================
// 仓库变更导入系统 - 准入过滤
// ==========================================
// 规则: 行项目类别 == 必须类别 且 来源库位 ∈ 允许列表 且 5 个阻断标记全空
// 说明: 在行校验之前执行，不相关的行不会以"错误"形式出现
// ==========================================

use crate::config::IntakeRules;
use crate::domain::order_line::OrderLine;
use tracing::{debug, instrument};

// ==========================================
// IntakeFilter - 准入过滤器
// ==========================================
pub struct IntakeFilter<'a> {
    rules: &'a IntakeRules,
}

impl<'a> IntakeFilter<'a> {
    pub fn new(rules: &'a IntakeRules) -> Self {
        Self { rules }
    }

    /// 单行是否满足准入条件
    pub fn accepts(&self, line: &OrderLine) -> bool {
        let category_ok = line
            .item_category
            .as_deref()
            .map_or(false, |c| c.trim() == self.rules.required_item_category);
        let storage_ok = self.rules.is_allowed_origin(&line.origin_location);

        category_ok && storage_ok && line.block_flags.is_clear()
    }

    /// 过滤订单行（保持原顺序）
    #[instrument(skip(self, lines), fields(input = lines.len()))]
    pub fn apply(&self, lines: Vec<OrderLine>) -> Vec<OrderLine> {
        let kept: Vec<OrderLine> = lines.into_iter().filter(|l| self.accepts(l)).collect();
        debug!(kept = kept.len(), "准入过滤完成");
        kept
    }

    /// 过滤结果为空时的全局观察信息
    pub fn empty_observation(&self) -> String {
        format!(
            "No rows matched the upload filter ({} + allowed storage + blank blocks).",
            self.rules.required_item_category
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_line::BlockFlags;

    fn ztan_line(origin: &str) -> OrderLine {
        OrderLine::new("4500", "10", "SKU1", 1.0, origin, "PT15").with_item_category("ZTAN")
    }

    #[test]
    fn test_accepts_eligible_line() {
        let rules = IntakeRules::default();
        let filter = IntakeFilter::new(&rules);

        assert!(filter.accepts(&ztan_line("1000")));
        assert!(filter.accepts(&ztan_line(" PT11 ")));
    }

    #[test]
    fn test_rejects_wrong_category_or_storage() {
        let rules = IntakeRules::default();
        let filter = IntakeFilter::new(&rules);

        assert!(!filter.accepts(&ztan_line("PT99")));
        assert!(!filter.accepts(&OrderLine::new("4500", "10", "SKU1", 1.0, "1000", "PT15")));
        assert!(!filter.accepts(
            &OrderLine::new("4500", "10", "SKU1", 1.0, "1000", "PT15").with_item_category("ZTAK")
        ));
    }

    #[test]
    fn test_rejects_any_block_flag() {
        let rules = IntakeRules::default();
        let filter = IntakeFilter::new(&rules);

        let blocked = ztan_line("1000").with_block_flags(BlockFlags {
            reason_for_rejection: Some("Z5".to_string()),
            ..BlockFlags::default()
        });
        assert!(!filter.accepts(&blocked));
    }

    #[test]
    fn test_order_only_row_passes() {
        // 仅有订单号（无 SKU）的行同样进入后续校验
        let rules = IntakeRules::default();
        let filter = IntakeFilter::new(&rules);
        let line = OrderLine::new("4500", "", "", 0.0, "PT15", "").with_item_category("ZTAN");

        assert_eq!(filter.apply(vec![line.clone()]), vec![line]);
    }

    #[test]
    fn test_empty_observation_mentions_category() {
        let rules = IntakeRules::default();
        assert_eq!(
            IntakeFilter::new(&rules).empty_observation(),
            "No rows matched the upload filter (ZTAN + allowed storage + blank blocks)."
        );
    }
}
