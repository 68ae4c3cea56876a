// ==========================================
// 仓库变更导入系统 - 领域类型定义
// ==========================================
// 依据: 审批请求数据契约（状态 / 优先级 / 建议动作）
// 序列化格式: PascalCase（与下游审批存储一致）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 请求状态 (Request Status)
// ==========================================
// 由外部审批流驱动，导入层只创建 Pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,          // 待处理
    UnderReview,      // 审核中
    ChangesRequested, // 需修改
    Approved,         // 已批准
    Rejected,         // 已驳回
}

impl RequestStatus {
    /// 该状态是否要求审批人填写意见
    pub fn requires_comment(&self) -> bool {
        matches!(self, RequestStatus::ChangesRequested | RequestStatus::Rejected)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "Pending"),
            RequestStatus::UnderReview => write!(f, "Under review"),
            RequestStatus::ChangesRequested => write!(f, "Changes requested"),
            RequestStatus::Approved => write!(f, "Approved"),
            RequestStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

// ==========================================
// 优先级 (Priority)
// ==========================================
// 紧急时间窗内 → High，否则 → Medium；Low 仅由审批人手动设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_emergency(is_daily_emergency: bool) -> Self {
        if is_daily_emergency {
            Priority::High
        } else {
            Priority::Medium
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

// ==========================================
// 建议动作 (Suggested Action)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuggestedAction {
    WarehouseChange, // 仅变更仓库
    Allocation,      // 仅分配
    Both,            // 变更仓库 + 分配
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestedAction::WarehouseChange => write!(f, "WarehouseChange"),
            SuggestedAction::Allocation => write!(f, "Allocation"),
            SuggestedAction::Both => write!(f, "Both"),
        }
    }
}
