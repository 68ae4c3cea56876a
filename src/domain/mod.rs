// ==========================================
// 仓库变更导入系统 - 领域层
// ==========================================
// 职责: 订单行 / 审批请求 实体与枚举
// ==========================================

pub mod order_line;
pub mod request;
pub mod types;

// 重导出核心实体
pub use order_line::{BlockFlags, OrderLine, RawLine, ValidatedLine};
pub use request::{Attachment, HistoryEntry, Request, RequestLine};
pub use types::{Priority, RequestStatus, SuggestedAction};
