// ==========================================
// 仓库变更导入系统 - 推荐请求组装
// ==========================================
// 职责: 将有效订单行渲染为推荐请求文本；解析模型回复
// 说明: 不发起网络调用，调用方负责传输
// ==========================================

use crate::api::error::ApiResult;
use crate::config::IntakeRules;
use crate::domain::order_line::ValidatedLine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

const TASK_INSTRUCTION: &str = "You are validating warehouse change/allocation lines. \
Apply the business rules and produce recommendations/insights.";

const REPLY_SCHEMA: &str = r#"{"summary":"...","lines":[{"sales_order":"...","line_item":"...","recommendation":"...","insights":"..."}]}"#;

const REPLY_RULES: &str =
    "Rules: include every input line exactly once; keep values short; no markdown; no surrounding text.";

// ==========================================
// 请求载荷
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptLine {
    pub sales_order: String,
    pub line_item: String,
    pub material: String,
    pub storage_location: String,
    pub new_storage_location: String,
    pub qty: f64,
}

impl From<&ValidatedLine> for PromptLine {
    fn from(validated: &ValidatedLine) -> Self {
        let line = &validated.line;
        Self {
            sales_order: line.order_number.clone(),
            line_item: line.line_item.clone(),
            material: line.sku.clone(),
            storage_location: line.origin_location.clone(),
            new_storage_location: line.destination_location.clone(),
            qty: line.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptPayload {
    pub customer: String,
    pub local_time: String,
    pub lines: Vec<PromptLine>,
}

// ==========================================
// AgentPrompt - 渲染后的推荐请求
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct AgentPrompt {
    pub payload: PromptPayload,
    pub text: String,
}

impl AgentPrompt {
    /// 组装推荐请求（仅包含有效行）
    pub fn compose(
        lines: &[ValidatedLine],
        customer: &str,
        local_time: &str,
        rules: &IntakeRules,
    ) -> ApiResult<Self> {
        let payload = PromptPayload {
            customer: customer.to_string(),
            local_time: local_time.to_string(),
            lines: lines
                .iter()
                .filter(|l| l.is_valid)
                .map(PromptLine::from)
                .collect(),
        };

        let text = [
            TASK_INSTRUCTION.to_string(),
            business_rules(rules),
            "Input payload (json):".to_string(),
            serde_json::to_string(&payload)?,
            "Return a single json object with exactly this shape:".to_string(),
            REPLY_SCHEMA.to_string(),
            REPLY_RULES.to_string(),
        ]
        .join("\n\n");

        Ok(Self { payload, text })
    }
}

/// 业务规则说明（库位代码与时间窗取自当前规则配置）
pub fn business_rules(rules: &IntakeRules) -> String {
    format!(
        "Business rules (concise, mandatory):
1) Single allocation ticket; assign to Stock Management.
2) Warehouse change: classify as order validation; after execution, verify warehouse updated and stock available.
3) SLA target: {sla}h for Stock Management; mention window and monitoring.
4) Attach line file only if high volume.
5) Daily emergency: if local time <= {hour:02}:{minute:02} mark \"Daily emergency\"; else justify and notify planning.
6) Ticket fields: customer, order number(s), comments (\"Allocate and Plan\" or \"Allocate\"), date, time, expected owner.
7) After allocation confirmation: validate deliveries and record delivery numbers.
8) Destination rules:
  - If new_storage_location == \"{alloc}\": DO NOT create an approval ticket. Only the single allocation ticket applies.
  - If new_storage_location == \"{approval}\": an approval ticket IS REQUIRED (in addition to the allocation ticket).

Allocation-only rule:
  - If new_storage_location is blank OR equals storage_location: treat as allocation-only (do not reject the line).

Per-line validations: must have order, line_item, sku, qty>0; if inconsistent, exclude the line and return observations.",
        sla = rules.sla_hours,
        hour = rules.emergency_cutoff_hour,
        minute = rules.emergency_cutoff_minute,
        alloc = rules.allocation_only_code,
        approval = rules.approval_required_code,
    )
}

// ==========================================
// 模型回复
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentLineRecommendation {
    pub sales_order: String,
    pub line_item: String,
    pub recommendation: String,
    pub insights: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    pub summary: String,
    pub lines: Vec<AgentLineRecommendation>,
}

/// 从模型文本中取出第一个 `{` 到最后一个 `}` 之间的 JSON 对象
///
/// summary 必须为字符串、lines 必须为数组，否则返回 None。
/// 缺少订单号或行号的推荐行被丢弃。
pub fn parse_agent_reply(text: &str) -> Option<AgentReply> {
    let trimmed = text.trim();
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }

    let value: Value = serde_json::from_str(&trimmed[start..=end]).ok()?;
    let summary = value.get("summary")?.as_str()?.to_string();
    let lines = value
        .get("lines")?
        .as_array()?
        .iter()
        .filter(|l| l.is_object())
        .map(|l| AgentLineRecommendation {
            sales_order: field_text(l, "sales_order"),
            line_item: field_text(l, "line_item"),
            recommendation: field_text(l, "recommendation"),
            insights: field_text(l, "insights"),
        })
        .filter(|l| !l.sales_order.is_empty() && !l.line_item.is_empty())
        .collect();

    Some(AgentReply { summary, lines })
}

/// 将推荐合并到校验行（按 订单号::行号 匹配）
///
/// 推荐为空时保留原建议。返回更新的行数。
pub fn apply_agent_reply(lines: &mut [ValidatedLine], reply: &AgentReply) -> usize {
    let by_key: HashMap<String, &AgentLineRecommendation> = reply
        .lines
        .iter()
        .map(|l| (format!("{}::{}", l.sales_order, l.line_item), l))
        .collect();

    let mut updated = 0;
    for line in lines.iter_mut() {
        let key = format!("{}::{}", line.line.order_number, line.line.line_item);
        match by_key.get(&key) {
            Some(hit) if !hit.recommendation.is_empty() => {
                line.recommendation = hit.recommendation.clone();
                updated += 1;
            }
            _ => {}
        }
    }
    updated
}

/// 处理模型原始回复：可解析时合并推荐并返回 summary，否则返回原文
pub fn merge_agent_text(lines: &mut [ValidatedLine], raw_text: &str) -> String {
    match parse_agent_reply(raw_text) {
        Some(reply) => {
            apply_agent_reply(lines, &reply);
            reply.summary
        }
        None => raw_text.to_string(),
    }
}

fn field_text(object: &Value, key: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_line::OrderLine;
    use crate::engine::LineValidator;

    fn lines() -> Vec<ValidatedLine> {
        let rules = IntakeRules::default();
        LineValidator::new(&rules).validate(vec![
            OrderLine::new("309440525", "152", "27501056344096", 4.0, "1000", "PT15"),
            OrderLine::new("309440525", "153", "", 4.0, "1000", "PT15"),
        ])
    }

    #[test]
    fn test_compose_includes_valid_lines_only() {
        let rules = IntakeRules::default();
        let prompt = AgentPrompt::compose(&lines(), "Cliente Demo", "10:15", &rules).unwrap();

        assert_eq!(prompt.payload.lines.len(), 1);
        assert_eq!(prompt.payload.lines[0].material, "27501056344096");
        assert!(prompt.text.contains(r#""sales_order":"309440525""#));
        assert!(prompt.text.contains(r#""new_storage_location":"PT15""#));
        assert!(prompt.text.contains(r#""customer":"Cliente Demo""#));
        assert!(prompt.text.contains("local time <= 11:00"));
        assert!(prompt.text.ends_with(REPLY_RULES));
    }

    #[test]
    fn test_parse_reply_with_surrounding_text() {
        let text = r#"Sure! {"summary":"ok","lines":[
            {"sales_order":"309440525","line_item":152,"recommendation":"Approve","insights":"PT15"},
            {"sales_order":"","line_item":"1"},
            "noise"
        ]} thanks"#;

        let reply = parse_agent_reply(text).unwrap();
        assert_eq!(reply.summary, "ok");
        assert_eq!(reply.lines.len(), 1);
        assert_eq!(reply.lines[0].line_item, "152");
        assert_eq!(reply.lines[0].recommendation, "Approve");
    }

    #[test]
    fn test_parse_reply_rejects_bad_shapes() {
        assert!(parse_agent_reply("").is_none());
        assert!(parse_agent_reply("no json here").is_none());
        assert!(parse_agent_reply(r#"{"summary":1,"lines":[]}"#).is_none());
        assert!(parse_agent_reply(r#"{"summary":"s","lines":{}}"#).is_none());
        assert!(parse_agent_reply("} {").is_none());
    }

    #[test]
    fn test_apply_agent_reply() {
        let mut validated = lines();
        let original = validated[1].recommendation.clone();
        let reply = AgentReply {
            summary: "s".to_string(),
            lines: vec![
                AgentLineRecommendation {
                    sales_order: "309440525".to_string(),
                    line_item: "152".to_string(),
                    recommendation: "Open approval ticket".to_string(),
                    insights: String::new(),
                },
                AgentLineRecommendation {
                    sales_order: "309440525".to_string(),
                    line_item: "153".to_string(),
                    recommendation: String::new(),
                    insights: "blank".to_string(),
                },
                AgentLineRecommendation {
                    sales_order: "999".to_string(),
                    line_item: "1".to_string(),
                    recommendation: "Unknown line".to_string(),
                    insights: String::new(),
                },
            ],
        };

        assert_eq!(apply_agent_reply(&mut validated, &reply), 1);
        assert_eq!(validated[0].recommendation, "Open approval ticket");
        assert_eq!(validated[1].recommendation, original);
    }

    #[test]
    fn test_merge_agent_text_falls_back_to_raw() {
        let mut validated = lines();
        let before = validated.clone();

        assert_eq!(merge_agent_text(&mut validated, "service unavailable"), "service unavailable");
        assert_eq!(validated, before);

        let summary = merge_agent_text(
            &mut validated,
            r#"{"summary":"done","lines":[{"sales_order":"309440525","line_item":"152","recommendation":"Escalate"}]}"#,
        );
        assert_eq!(summary, "done");
        assert_eq!(validated[0].recommendation, "Escalate");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let reply =
            parse_agent_reply(r#"{"summary":"s","lines":[{"sales_order":"1","line_item":"2"}]}"#)
                .unwrap();
        assert_eq!(reply.lines[0].insights, "");
        assert_eq!(reply.lines[0].recommendation, "");
    }
}
