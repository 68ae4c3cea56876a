// ==========================================
// 仓库变更导入系统 - 规则引擎层
// ==========================================
// 职责: 准入过滤 / 行校验 / 紧急时间窗 / 请求构建
// 红线: 业务问题一律输出观察信息，不抛错误
// ==========================================

pub mod emergency;
pub mod intake_filter;
pub mod line_validator;
pub mod pipeline;
pub mod request_builder;

// 重导出核心引擎
pub use emergency::{is_daily_emergency, parse_time_of_day};
pub use intake_filter::IntakeFilter;
pub use line_validator::{classify_line, collect_observations, LineObservation, LineValidator, Recommendation};
pub use pipeline::IntakePipeline;
pub use request_builder::{
    generate_approval_request_id, generate_request_id, suggest_action, RequestBuilder, RequestContext, RuleOutcome,
};
