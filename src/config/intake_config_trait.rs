// ==========================================
// 仓库变更导入系统 - 准入配置读取 Trait
// ==========================================
// 职责: 定义导入流程所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::api::error::ApiResult;
use async_trait::async_trait;

// ==========================================
// IntakeConfigReader Trait
// ==========================================
// 实现者: ConfigManager
#[async_trait]
pub trait IntakeConfigReader: Send + Sync {
    /// 必须的行项目类别
    ///
    /// # 默认值
    /// - "ZTAN"
    async fn get_required_item_category(&self) -> ApiResult<String>;

    /// 允许的来源库位
    ///
    /// # 默认值
    /// - ["PT11", "PT15", "1000"]
    async fn get_allowed_origin_locations(&self) -> ApiResult<Vec<String>>;

    /// 仅分配库位
    ///
    /// # 默认值
    /// - "PT11"
    async fn get_allocation_only_code(&self) -> ApiResult<String>;

    /// 需审批库位
    ///
    /// # 默认值
    /// - "PT15"
    async fn get_approval_required_code(&self) -> ApiResult<String>;

    /// 每日紧急时间窗截止（小时, 分钟），含截止时刻
    ///
    /// # 默认值
    /// - (11, 0)
    async fn get_emergency_cutoff(&self) -> ApiResult<(u32, u32)>;

    /// SLA 小时数
    ///
    /// # 默认值
    /// - 2
    async fn get_sla_hours(&self) -> ApiResult<u32>;

    /// 国家
    ///
    /// # 默认值
    /// - "Chile"
    async fn get_country(&self) -> ApiResult<String>;

    /// 无效行示例数量
    ///
    /// # 默认值
    /// - 3
    async fn get_invalid_preview_limit(&self) -> ApiResult<usize>;
}
