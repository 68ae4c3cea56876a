// ==========================================
// 仓库变更导入系统 - 上传 API
// ==========================================
// 职责: 上传文件 → 规则模拟结果；批量模拟；请求导出
// ==========================================

use crate::api::agent_prompt::AgentPrompt;
use crate::api::error::{ApiError, ApiResult};
use crate::config::{IntakeConfigReader, IntakeRules};
use crate::domain::request::Request;
use crate::engine::{IntakePipeline, RequestBuilder, RequestContext, RuleOutcome};
use crate::importer::{ExtractionSource, FileSource};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, instrument};

/// 模拟请求参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationPayload {
    pub customer: String,
    pub requester: String,
    /// 本地时间 HH:mm
    pub local_time: String,
}

impl From<SimulationPayload> for RequestContext {
    fn from(payload: SimulationPayload) -> Self {
        Self {
            customer: payload.customer,
            requester: payload.requester,
            local_time: payload.local_time,
        }
    }
}

/// 模拟响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResponse {
    /// 实际生效的解析路径
    pub source: ExtractionSource,
    #[serde(flatten)]
    pub outcome: RuleOutcome,
    /// 耗时（毫秒）
    pub elapsed_ms: u64,
}

// ==========================================
// UploadApi
// ==========================================
pub struct UploadApi {
    pipeline: IntakePipeline,
}

impl Default for UploadApi {
    fn default() -> Self {
        Self::new(IntakeRules::default())
    }
}

impl UploadApi {
    pub fn new(rules: IntakeRules) -> Self {
        Self {
            pipeline: IntakePipeline::new(rules),
        }
    }

    /// 从配置读取规则后创建
    pub async fn from_config(reader: &dyn IntakeConfigReader) -> ApiResult<Self> {
        Ok(Self::new(IntakeRules::load(reader).await?))
    }

    pub fn rules(&self) -> &IntakeRules {
        self.pipeline.rules()
    }

    /// 规则模拟（单文件）
    #[instrument(skip_all, fields(customer = %payload.customer))]
    pub async fn simulate_rules(
        &self,
        file: &dyn FileSource,
        payload: SimulationPayload,
    ) -> SimulationResponse {
        let start = Instant::now();
        let context = RequestContext::from(payload);
        let (source, outcome) = self.pipeline.run(file, &context).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        info!(
            ?source,
            lines = outcome.validated_lines.len(),
            created = outcome.request.is_some(),
            elapsed_ms,
            "规则模拟完成"
        );

        SimulationResponse {
            source,
            outcome,
            elapsed_ms,
        }
    }

    /// 批量模拟（各文件相互独立，并发执行，结果顺序与输入一致）
    pub async fn simulate_batch(
        &self,
        files: &[&dyn FileSource],
        payload: &SimulationPayload,
    ) -> Vec<SimulationResponse> {
        info!(files = files.len(), "开始批量模拟");
        join_all(
            files
                .iter()
                .map(|file| self.simulate_rules(*file, payload.clone())),
        )
        .await
    }

    /// 为模拟结果组装推荐请求
    pub fn compose_agent_prompt(
        &self,
        response: &SimulationResponse,
        payload: &SimulationPayload,
    ) -> ApiResult<AgentPrompt> {
        AgentPrompt::compose(
            &response.outcome.validated_lines,
            &payload.customer,
            &payload.local_time,
            self.rules(),
        )
    }

    /// 由模拟结果中的需审批库位行生成审批请求
    pub fn create_approval_request(&self, response: &SimulationResponse) -> ApiResult<Request> {
        let base = response.outcome.request.as_ref().ok_or_else(|| {
            ApiError::InvalidInput("模拟结果中没有审批请求".to_string())
        })?;

        RequestBuilder::new(self.rules())
            .approval_request_for(base, &response.outcome.validated_lines)
            .ok_or_else(|| {
                ApiError::InvalidInput(format!(
                    "No {} lines found",
                    self.rules().approval_required_code
                ))
            })
    }

    /// 导出请求为 JSON（camelCase 字段）
    pub fn export_request_json(&self, request: &Request) -> ApiResult<String> {
        if request.lines.is_empty() {
            return Err(ApiError::InvalidInput(format!(
                "请求 {} 不包含任何订单行",
                request.id
            )));
        }
        Ok(serde_json::to_string_pretty(request)?)
    }
}
