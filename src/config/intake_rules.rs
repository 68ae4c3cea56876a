// ==========================================
// 仓库变更导入系统 - 准入与分类规则快照
// ==========================================
// 职责: 同步核心使用的固定代码 / 时间窗 / 请求默认值
// 说明: 由 IntakeConfigReader 一次性加载，核心流程不再访问配置存储
// ==========================================

use crate::api::error::ApiResult;
use crate::config::intake_config_trait::IntakeConfigReader;
use serde::{Deserialize, Serialize};

/// 准入与分类规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeRules {
    /// 必须的行项目类别
    pub required_item_category: String,

    /// 允许的来源库位
    pub allowed_origin_locations: Vec<String>,

    /// 仅分配库位（不创建审批工单）
    pub allocation_only_code: String,

    /// 需审批库位（审批工单 + 分配工单）
    pub approval_required_code: String,

    /// 每日紧急时间窗截止（含）
    pub emergency_cutoff_hour: u32,
    pub emergency_cutoff_minute: u32,

    /// Stock Management SLA（小时）
    pub sla_hours: u32,

    /// 请求所属国家
    pub country: String,

    /// 全局观察信息中无效行示例数量
    pub invalid_preview_limit: usize,
}

impl Default for IntakeRules {
    fn default() -> Self {
        Self {
            required_item_category: "ZTAN".to_string(),
            allowed_origin_locations: vec![
                "PT11".to_string(),
                "PT15".to_string(),
                "1000".to_string(),
            ],
            allocation_only_code: "PT11".to_string(),
            approval_required_code: "PT15".to_string(),
            emergency_cutoff_hour: 11,
            emergency_cutoff_minute: 0,
            sla_hours: 2,
            country: "Chile".to_string(),
            invalid_preview_limit: 3,
        }
    }
}

impl IntakeRules {
    /// 从配置读取器加载规则快照
    pub async fn load(reader: &dyn IntakeConfigReader) -> ApiResult<Self> {
        let (emergency_cutoff_hour, emergency_cutoff_minute) =
            reader.get_emergency_cutoff().await?;

        Ok(Self {
            required_item_category: reader.get_required_item_category().await?,
            allowed_origin_locations: reader.get_allowed_origin_locations().await?,
            allocation_only_code: reader.get_allocation_only_code().await?,
            approval_required_code: reader.get_approval_required_code().await?,
            emergency_cutoff_hour,
            emergency_cutoff_minute,
            sla_hours: reader.get_sla_hours().await?,
            country: reader.get_country().await?,
            invalid_preview_limit: reader.get_invalid_preview_limit().await?,
        })
    }

    /// 来源库位是否在允许列表中（去首尾空白后精确匹配）
    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        let origin = origin.trim();
        self.allowed_origin_locations.iter().any(|code| code == origin)
    }
}
