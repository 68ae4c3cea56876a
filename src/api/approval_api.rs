// ==========================================
// 仓库变更导入系统 - 审批操作 API
// ==========================================
// 职责: 审批人状态流转 + 申请人通知文本 + 按状态筛选
// 红线: 驳回 / 需修改 必须附带审批意见
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::request::Request;
use crate::domain::types::RequestStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, instrument};

pub const DEFAULT_APPROVER: &str = "Approver";

// ==========================================
// 通知
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationRecipient {
    Approver,
    Requester,
}

impl fmt::Display for NotificationRecipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationRecipient::Approver => write!(f, "approver"),
            NotificationRecipient::Requester => write!(f, "requester"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: NotificationRecipient,
    pub message: String,
}

impl Notification {
    /// 格式: `<recipient> | <id>: <detail>`
    pub fn new(recipient: NotificationRecipient, request: &Request, detail: &str) -> Self {
        Self {
            recipient,
            message: format!("{} | {}: {}", recipient, request.id, detail),
        }
    }
}

// ==========================================
// 审批决定
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalDecision {
    pub status: RequestStatus,
    pub actor: String,
    pub comment: Option<String>,
}

impl ApprovalDecision {
    pub fn new(status: RequestStatus) -> Self {
        Self {
            status,
            actor: DEFAULT_APPROVER.to_string(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn by(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }
}

// ==========================================
// ApprovalApi
// ==========================================
#[derive(Debug, Default)]
pub struct ApprovalApi;

impl ApprovalApi {
    pub fn new() -> Self {
        Self
    }

    /// 应用审批决定，返回给申请人的通知
    #[instrument(skip(self, request, decision), fields(request_id = %request.id, status = %decision.status))]
    pub fn apply_decision(
        &self,
        request: &mut Request,
        decision: ApprovalDecision,
    ) -> ApiResult<Notification> {
        let comment = decision
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        if decision.status.requires_comment() && comment.is_none() {
            return Err(ApiError::CommentRequired {
                status: decision.status,
            });
        }

        let detail = comment
            .clone()
            .unwrap_or_else(|| decision.status.to_string());
        request.update_status(decision.status, decision.actor, comment);
        info!("审批状态已更新");

        Ok(Notification::new(
            NotificationRecipient::Requester,
            request,
            &detail,
        ))
    }

    /// 新请求提交时通知审批人
    pub fn notify_submission(&self, request: &Request) -> Notification {
        Notification::new(
            NotificationRecipient::Approver,
            request,
            &format!("New request from {}", request.requester),
        )
    }

    /// 按状态筛选请求（保持原顺序）
    pub fn filter_by_status<'a>(
        &self,
        requests: &'a [Request],
        status: RequestStatus,
    ) -> Vec<&'a Request> {
        requests.iter().filter(|r| r.status == status).collect()
    }
}
