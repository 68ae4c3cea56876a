// ==========================================
// 仓库变更导入系统 - API层错误类型
// ==========================================
// 职责: 定义外围（配置 / 导出 / 审批操作）错误类型
// 说明: 业务数据问题不走错误类型，以观察信息字符串返回
// ==========================================

use crate::domain::types::RequestStatus;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 驳回 / 需修改 必须填写意见
    #[error("状态 {status} 需要填写审批意见")]
    CommentRequired { status: RequestStatus },

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("配置错误 (key: {key}): {message}")]
    ConfigError { key: String, message: String },

    // ==========================================
    // 文件 / 序列化错误
    // ==========================================
    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("序列化失败: {0}")]
    SerializationError(String),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::FileReadError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::SerializationError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
