// ==========================================
// 仓库变更导入系统 - 审批请求构建
// ==========================================
// 输入: 校验后的订单行 + 本地时间 + 客户 + 申请人
// 输出: RuleOutcome（行列表 + 全局观察 + 可选 Request）
// 红线: 无有效行时不创建 Request
// ==========================================

use crate::config::IntakeRules;
use crate::domain::order_line::ValidatedLine;
use crate::domain::request::{HistoryEntry, Request, RequestLine};
use crate::domain::types::{Priority, RequestStatus, SuggestedAction};
use crate::engine::emergency::is_daily_emergency;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

pub const SYSTEM_ACTOR: &str = "System";
pub const EVENT_REQUEST_CREATED: &str = "Request created";
pub const NOTE_EMERGENCY_WINDOW: &str = "Marked emergency due to time window";
pub const COMMENT_DAILY_EMERGENCY: &str = "Daily emergency";
pub const COMMENT_STANDARD: &str = "Standard allocation";
pub const COMMENT_APPROVAL_REQUIRED: &str = "lines require approval ticket";
pub const OBSERVATION_NO_VALID_LINES: &str =
    "No valid lines remain after filtering and validation.";

// ==========================================
// RequestContext - 提交上下文
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub customer: String,
    pub requester: String,
    pub local_time: String, // HH:mm
}

// ==========================================
// RuleOutcome - 规则执行结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOutcome {
    pub validated_lines: Vec<ValidatedLine>,
    pub global_observations: Vec<String>,
    pub request: Option<Request>,
}

impl RuleOutcome {
    /// 无任何行的结果（仅含全局观察）
    pub fn observations_only(global_observations: Vec<String>) -> Self {
        Self {
            validated_lines: Vec::new(),
            global_observations,
            request: None,
        }
    }
}

/// 生成请求编号: SOL- + 8 位大写十六进制
pub fn generate_request_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("SOL-{}", uuid[..8].to_uppercase())
}

/// 审批请求编号: SOL-APR- + 毫秒时间戳（大写十六进制）
pub fn generate_approval_request_id() -> String {
    format!("SOL-APR-{:X}", Utc::now().timestamp_millis())
}

/// 有效行的建议动作
///
/// 进入此处的行均已通过校验，数量必然 > 0，因此"需分配"条件恒为真，
/// WarehouseChange 分支实际不可达。保留三值输出供下游兼容。
pub fn suggest_action(valid_lines: &[&ValidatedLine]) -> SuggestedAction {
    let needs_change = valid_lines.iter().any(|l| l.line.requests_warehouse_change());
    let needs_allocation = valid_lines.iter().any(|l| l.line.quantity > 0.0);

    match (needs_change, needs_allocation) {
        (true, true) => SuggestedAction::Both,
        (true, false) => SuggestedAction::WarehouseChange,
        _ => SuggestedAction::Allocation,
    }
}

// ==========================================
// RequestBuilder - 请求构建器
// ==========================================
pub struct RequestBuilder<'a> {
    rules: &'a IntakeRules,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(rules: &'a IntakeRules) -> Self {
        Self { rules }
    }

    /// 被排除行的全局观察（表头 + 前 N 条示例 + "+N more"）
    pub fn exclusion_observations(&self, invalid: &[&ValidatedLine]) -> Vec<String> {
        if invalid.is_empty() {
            return Vec::new();
        }

        let limit = self.rules.invalid_preview_limit;
        let mut observations = Vec::with_capacity(limit.min(invalid.len()) + 2);
        observations.push(format!(
            "Excluded {} line(s) due to validation errors:",
            invalid.len()
        ));
        for line in invalid.iter().take(limit) {
            let reasons = if line.observations.is_empty() {
                "Unknown validation error".to_string()
            } else {
                line.observations.join("; ")
            };
            observations.push(format!("- {}: {}", line.display_id(), reasons));
        }
        if invalid.len() > limit {
            observations.push(format!("+{} more", invalid.len() - limit));
        }
        observations
    }

    /// 构建结果
    #[instrument(skip(self, validated_lines, context), fields(lines = validated_lines.len()))]
    pub fn build(&self, validated_lines: Vec<ValidatedLine>, context: &RequestContext) -> RuleOutcome {
        let (valid, invalid): (Vec<&ValidatedLine>, Vec<&ValidatedLine>) =
            validated_lines.iter().partition(|l| l.is_valid);

        let mut global_observations = self.exclusion_observations(&invalid);

        if valid.is_empty() {
            global_observations.push(OBSERVATION_NO_VALID_LINES.to_string());
            info!(invalid = invalid.len(), "无有效行，不创建请求");
            return RuleOutcome {
                validated_lines,
                global_observations,
                request: None,
            };
        }

        let request = self.assemble(&valid, context);
        info!(
            request_id = %request.id,
            valid = valid.len(),
            invalid = invalid.len(),
            emergency = request.is_daily_emergency,
            "审批请求已创建"
        );

        RuleOutcome {
            validated_lines,
            global_observations,
            request: Some(request),
        }
    }

    /// 需审批库位行（来源或目标，去空白、大小写不敏感）
    pub fn approval_lines<'l>(&self, lines: &'l [ValidatedLine]) -> Vec<&'l ValidatedLine> {
        let code = self.rules.approval_required_code.trim().to_uppercase();
        let matches = |value: &str| value.trim().to_uppercase() == code;
        lines
            .iter()
            .filter(|l| matches(&l.line.origin_location) || matches(&l.line.destination_location))
            .collect()
    }

    /// 由需审批库位行生成独立的审批请求
    ///
    /// 沿用原请求的客户 / 时间 / 优先级等字段；无此类行时返回 None。
    pub fn approval_request_for(&self, base: &Request, lines: &[ValidatedLine]) -> Option<Request> {
        let approval_lines = self.approval_lines(lines);
        if approval_lines.is_empty() {
            return None;
        }

        let code = &self.rules.approval_required_code;
        let mut request = base.clone();
        request.id = generate_approval_request_id();
        request.suggested_action = SuggestedAction::Both;
        request.status = RequestStatus::Pending;
        request.requester_comments = Some(format!("{} {}", code, COMMENT_APPROVAL_REQUIRED));
        request.lines = approval_lines
            .iter()
            .map(|l| RequestLine::from(&l.line))
            .collect();
        request.history = vec![HistoryEntry {
            timestamp: Utc::now(),
            actor: SYSTEM_ACTOR.to_string(),
            event: format!("Approval request created from {} lines", code),
            note: Some(format!("{} lines: {}", code, approval_lines.len())),
        }];

        info!(
            request_id = %request.id,
            base_id = %base.id,
            lines = request.lines.len(),
            "审批请求已生成"
        );
        Some(request)
    }

    fn assemble(&self, valid: &[&ValidatedLine], context: &RequestContext) -> Request {
        let emergency = is_daily_emergency(&context.local_time, self.rules);
        let sent_at = Utc::now();

        Request {
            id: generate_request_id(),
            customer: context.customer.clone(),
            country: self.rules.country.clone(),
            local_time_of_day: context.local_time.clone(),
            is_daily_emergency: emergency,
            lines: valid.iter().map(|l| RequestLine::from(&l.line)).collect(),
            suggested_action: suggest_action(valid),
            status: RequestStatus::Pending,
            priority: Priority::from_emergency(emergency),
            requester: context.requester.clone(),
            sent_at,
            sla_hours: self.rules.sla_hours,
            requester_comments: Some(
                if emergency {
                    COMMENT_DAILY_EMERGENCY
                } else {
                    COMMENT_STANDARD
                }
                .to_string(),
            ),
            out_of_hours_justification: None,
            suggested_changes: None,
            attachments: Vec::new(),
            history: vec![HistoryEntry {
                timestamp: sent_at,
                actor: SYSTEM_ACTOR.to_string(),
                event: EVENT_REQUEST_CREATED.to_string(),
                note: emergency.then(|| NOTE_EMERGENCY_WINDOW.to_string()),
            }],
        }
    }
}
