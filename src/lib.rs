// ==========================================
// 仓库变更导入系统 - 核心库
// ==========================================
// 流程: 上传文件 → 订单行提取 → 准入过滤 → 行校验 → 审批请求
// 系统定位: 规则模拟（最终审批由人工完成）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 文件解析与字段映射
pub mod importer;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 规则配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Priority, RequestStatus, SuggestedAction};

// 领域实体
pub use domain::{OrderLine, RawLine, Request, RequestLine, ValidatedLine};

// 导入
pub use importer::{FileSource, InMemoryFile, LocalFile, TabularExtractor};

// 引擎
pub use engine::{IntakePipeline, RequestContext, RuleOutcome};

// 配置
pub use config::{ConfigManager, IntakeRules};

// API
pub use api::{ApiError, ApiResult, ApprovalApi, SimulationPayload, UploadApi};

// ==========================================
// 系统常量
// ==========================================

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 系统名称
pub const APP_NAME: &str = "仓库变更导入系统";
