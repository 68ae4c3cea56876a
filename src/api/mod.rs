// ==========================================
// 仓库变更导入系统 - API 层
// ==========================================
// 职责: 对外业务接口（上传模拟 / 审批操作 / 推荐请求）
// ==========================================

pub mod agent_prompt;
pub mod approval_api;
pub mod error;
pub mod upload_api;

// 重导出核心类型
pub use agent_prompt::{
    apply_agent_reply, merge_agent_text, parse_agent_reply, AgentLineRecommendation, AgentPrompt,
    AgentReply,
};
pub use approval_api::{ApprovalApi, ApprovalDecision, Notification, NotificationRecipient};
pub use error::{ApiError, ApiResult};
pub use upload_api::{SimulationPayload, SimulationResponse, UploadApi};
