// ==========================================
// 仓库变更导入系统 - 订单行校验与分类
// ==========================================
// 职责: 必填字段/数量校验 + 基于库位代码的操作建议
// 红线: 纯函数，同一输入恒得同一建议，无副作用
// ==========================================

use crate::config::IntakeRules;
use crate::domain::order_line::{OrderLine, ValidatedLine};
use std::fmt;
use tracing::{debug, instrument};

// ==========================================
// LineObservation - 行级问题
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineObservation {
    MissingOrderOrLineItem,
    MissingSku,
    InvalidQuantity,
}

impl fmt::Display for LineObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineObservation::MissingOrderOrLineItem => write!(f, "Missing order or line item"),
            LineObservation::MissingSku => write!(f, "Missing SKU"),
            LineObservation::InvalidQuantity => write!(f, "Quantity must be a number > 0"),
        }
    }
}

// ==========================================
// Recommendation - 操作建议
// ==========================================
// 判定顺序: 无效 → 仅分配库位 → 需审批库位 → 无仓库变更 → 允许
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    Flagged(Vec<String>),
    AllocationOnlyNoTicket,
    ApprovalRequired,
    AllocationOnlyNoChange,
    Allowed,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Flagged(reasons) => write!(f, "Flagged: {}", reasons.join("; ")),
            Recommendation::AllocationOnlyNoTicket => {
                write!(f, "Allocation only: do not create approval ticket")
            }
            Recommendation::ApprovalRequired => write!(
                f,
                "Approval required: create approval ticket + allocation ticket"
            ),
            Recommendation::AllocationOnlyNoChange => {
                write!(f, "Allocation only: no warehouse change requested")
            }
            Recommendation::Allowed => write!(
                f,
                "Allowed: warehouse change / allocation, open ticket with Stock Management"
            ),
        }
    }
}

/// 收集单行的问题（按固定顺序）
pub fn collect_observations(line: &OrderLine) -> Vec<LineObservation> {
    let mut observations = Vec::new();
    if line.order_number.trim().is_empty() || line.line_item.trim().is_empty() {
        observations.push(LineObservation::MissingOrderOrLineItem);
    }
    if line.sku.trim().is_empty() {
        observations.push(LineObservation::MissingSku);
    }
    if !line.quantity.is_finite() || line.quantity <= 0.0 {
        observations.push(LineObservation::InvalidQuantity);
    }
    observations
}

/// 根据问题与库位代码给出操作建议（库位比较去空白、大小写不敏感）
pub fn classify_line(line: &OrderLine, observations: &[String], rules: &IntakeRules) -> Recommendation {
    if !observations.is_empty() {
        return Recommendation::Flagged(observations.to_vec());
    }

    let origin = line.origin_location.trim().to_uppercase();
    let destination = line.destination_location.trim().to_uppercase();
    let allocation_only = rules.allocation_only_code.trim().to_uppercase();
    let approval_required = rules.approval_required_code.trim().to_uppercase();

    if origin == allocation_only || destination == allocation_only {
        Recommendation::AllocationOnlyNoTicket
    } else if origin == approval_required || destination == approval_required {
        Recommendation::ApprovalRequired
    } else if destination.is_empty() || destination == origin {
        Recommendation::AllocationOnlyNoChange
    } else {
        Recommendation::Allowed
    }
}

// ==========================================
// LineValidator - 行校验器
// ==========================================
pub struct LineValidator<'a> {
    rules: &'a IntakeRules,
}

impl<'a> LineValidator<'a> {
    pub fn new(rules: &'a IntakeRules) -> Self {
        Self { rules }
    }

    /// 校验单行
    pub fn validate_line(&self, line: OrderLine) -> ValidatedLine {
        let observations: Vec<String> = collect_observations(&line)
            .iter()
            .map(ToString::to_string)
            .collect();
        let recommendation = classify_line(&line, &observations, self.rules).to_string();

        ValidatedLine {
            line,
            is_valid: observations.is_empty(),
            observations,
            recommendation,
        }
    }

    /// 批量校验（保持原顺序）
    #[instrument(skip(self, lines), fields(count = lines.len()))]
    pub fn validate(&self, lines: Vec<OrderLine>) -> Vec<ValidatedLine> {
        let validated: Vec<ValidatedLine> =
            lines.into_iter().map(|l| self.validate_line(l)).collect();
        debug!(
            valid = validated.iter().filter(|l| l.is_valid).count(),
            "行校验完成"
        );
        validated
    }
}
