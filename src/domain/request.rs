// ==========================================
// 仓库变更导入系统 - 审批请求领域模型
// ==========================================
// 依据: 数据模型 Request（唯一由 RequestBuilder 创建）
// 依据: 审批流契约（状态 / 历史流转）
// ==========================================

use crate::domain::order_line::OrderLine;
use crate::domain::types::{Priority, RequestStatus, SuggestedAction};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// RequestLine - 请求中的行摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLine {
    pub order_number: String,
    pub line_item: String,
    pub sku: String,
    pub quantity: f64,
    pub origin_location: String,
    pub destination_location: String,
}

impl From<&OrderLine> for RequestLine {
    fn from(line: &OrderLine) -> Self {
        Self {
            order_number: line.order_number.clone(),
            line_item: line.line_item.clone(),
            sku: line.sku.clone(),
            quantity: line.quantity,
            origin_location: line.origin_location.clone(),
            destination_location: line.destination_location.clone(),
        }
    }
}

// ==========================================
// HistoryEntry - 历史记录
// ==========================================
// 红线: 只追加，不修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ==========================================
// Attachment - 附件引用
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

// ==========================================
// Request - 审批请求
// ==========================================
// 红线: lines 非空（全部无效时不创建 Request）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: String,
    pub customer: String,
    pub country: String,
    pub local_time_of_day: String, // HH:mm
    pub is_daily_emergency: bool,
    pub lines: Vec<RequestLine>,
    pub suggested_action: SuggestedAction,
    pub status: RequestStatus,
    pub priority: Priority,
    pub requester: String,
    pub sent_at: DateTime<Utc>,
    pub sla_hours: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_comments: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_of_hours_justification: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_changes: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    pub history: Vec<HistoryEntry>,
}

impl Request {
    /// 审批状态流转（追加历史记录）
    pub fn update_status(
        &mut self,
        status: RequestStatus,
        actor: impl Into<String>,
        comment: Option<String>,
    ) {
        self.status = status;
        self.suggested_changes = comment.clone();
        self.history.push(HistoryEntry {
            timestamp: Utc::now(),
            actor: actor.into(),
            event: format!("Status: {}", status),
            note: comment,
        });
    }

    pub fn update_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn append_history(
        &mut self,
        event: impl Into<String>,
        actor: impl Into<String>,
        note: Option<String>,
    ) {
        self.history.push(HistoryEntry {
            timestamp: Utc::now(),
            actor: actor.into(),
            event: event.into(),
            note,
        });
    }

    /// 非紧急时间窗提交的请求需要说明原因
    pub fn requires_out_of_hours_justification(&self) -> bool {
        !self.is_daily_emergency
    }

    /// SLA 截止时间
    pub fn sla_deadline(&self) -> DateTime<Utc> {
        self.sent_at + Duration::hours(i64::from(self.sla_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> Request {
        let sent_at = Utc::now();
        Request {
            id: "SOL-TEST0001".to_string(),
            customer: "Cliente X".to_string(),
            country: "Chile".to_string(),
            local_time_of_day: "12:00".to_string(),
            is_daily_emergency: false,
            lines: vec![RequestLine::from(&OrderLine::new(
                "4500", "10", "SKU1", 10.0, "1000", "PT15",
            ))],
            suggested_action: SuggestedAction::Both,
            status: RequestStatus::Pending,
            priority: Priority::Medium,
            requester: "Solicitante".to_string(),
            sent_at,
            sla_hours: 2,
            requester_comments: Some("Standard allocation".to_string()),
            out_of_hours_justification: None,
            suggested_changes: None,
            attachments: vec![],
            history: vec![HistoryEntry {
                timestamp: sent_at,
                actor: "System".to_string(),
                event: "Request created".to_string(),
                note: None,
            }],
        }
    }

    #[test]
    fn test_update_status_appends_history() {
        let mut request = sample_request();
        request.update_status(
            RequestStatus::ChangesRequested,
            "Approver",
            Some("Split line 10".to_string()),
        );

        assert_eq!(request.status, RequestStatus::ChangesRequested);
        assert_eq!(request.suggested_changes.as_deref(), Some("Split line 10"));
        assert_eq!(request.history.len(), 2);
        let last = request.history.last().unwrap();
        assert_eq!(last.event, "Status: Changes requested");
        assert_eq!(last.actor, "Approver");
        assert_eq!(last.note.as_deref(), Some("Split line 10"));
    }

    #[test]
    fn test_sla_deadline() {
        let request = sample_request();
        assert_eq!(request.sla_deadline() - request.sent_at, Duration::hours(2));
    }

    #[test]
    fn test_out_of_hours_justification() {
        let mut request = sample_request();
        assert!(request.requires_out_of_hours_justification());
        request.is_daily_emergency = true;
        assert!(!request.requires_out_of_hours_justification());
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(sample_request()).unwrap();
        assert_eq!(value["localTimeOfDay"], "12:00");
        assert_eq!(value["isDailyEmergency"], false);
        assert_eq!(value["suggestedAction"], "Both");
        assert_eq!(value["slaHours"], 2);
        assert!(value.get("attachments").is_none());
    }
}
