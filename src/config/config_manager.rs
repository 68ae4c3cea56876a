// ==========================================
// 仓库变更导入系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询，缺省回退到内置默认值
// 存储: 扁平 key-value（JSON 对象文件或键值对）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::intake_config_trait::IntakeConfigReader;
use crate::config::intake_rules::IntakeRules;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "WAREHOUSE_INTAKE_CONFIG";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: HashMap<String, String>,
    defaults: IntakeRules,
}

impl ConfigManager {
    /// 创建空配置（全部使用默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从键值对创建
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            defaults: IntakeRules::default(),
        }
    }

    /// 从 JSON 对象文件加载
    ///
    /// # 格式
    /// `{"intake.sla_hours": 4, "intake.allowed_origin_locations": ["PT11", "1000"]}`
    /// 数组值按逗号拼接存储
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ApiResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&raw)?;

        let Value::Object(map) = value else {
            return Err(ApiError::ConfigError {
                key: path.display().to_string(),
                message: "配置文件顶层必须是 JSON 对象".to_string(),
            });
        };

        let pairs: Vec<(String, String)> = map
            .into_iter()
            .filter_map(|(key, value)| json_to_config_value(&value).map(|v| (key, v)))
            .collect();
        info!(path = %path.display(), keys = pairs.len(), "配置文件加载完成");

        Ok(Self::from_pairs(pairs))
    }

    /// 按环境变量加载（未设置 → 默认配置）
    pub fn from_env() -> ApiResult<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_json_file(path.trim()),
            _ => {
                debug!("未指定配置文件，使用默认配置");
                Ok(Self::new())
            }
        }
    }

    /// 读取配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// 获取所有配置的快照（JSON格式，按 key 排序）
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        let sorted: std::collections::BTreeMap<_, _> = self.values.iter().collect();
        Ok(serde_json::to_string(&sorted)?)
    }

    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_global_config_value(key)
            .unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T: std::str::FromStr>(&self, key: &str, default: T) -> ApiResult<T> {
        match self.get_global_config_value(key) {
            None => Ok(default),
            Some(raw) => raw.parse::<T>().map_err(|_| ApiError::ConfigError {
                key: key.to_string(),
                message: format!("无法解析配置值: {}", raw),
            }),
        }
    }
}

/// JSON 标量/数组 → 配置字符串（null 视为未配置）
fn json_to_config_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(json_to_config_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl IntakeConfigReader for ConfigManager {
    async fn get_required_item_category(&self) -> ApiResult<String> {
        Ok(self.get_string_or(
            config_keys::REQUIRED_ITEM_CATEGORY,
            &self.defaults.required_item_category,
        ))
    }

    async fn get_allowed_origin_locations(&self) -> ApiResult<Vec<String>> {
        match self.get_global_config_value(config_keys::ALLOWED_ORIGIN_LOCATIONS) {
            None => Ok(self.defaults.allowed_origin_locations.clone()),
            Some(raw) => Ok(raw
                .split(',')
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty())
                .collect()),
        }
    }

    async fn get_allocation_only_code(&self) -> ApiResult<String> {
        Ok(self.get_string_or(
            config_keys::ALLOCATION_ONLY_CODE,
            &self.defaults.allocation_only_code,
        ))
    }

    async fn get_approval_required_code(&self) -> ApiResult<String> {
        Ok(self.get_string_or(
            config_keys::APPROVAL_REQUIRED_CODE,
            &self.defaults.approval_required_code,
        ))
    }

    async fn get_emergency_cutoff(&self) -> ApiResult<(u32, u32)> {
        let Some(raw) = self.get_global_config_value(config_keys::EMERGENCY_CUTOFF) else {
            return Ok((
                self.defaults.emergency_cutoff_hour,
                self.defaults.emergency_cutoff_minute,
            ));
        };

        let invalid = || ApiError::ConfigError {
            key: config_keys::EMERGENCY_CUTOFF.to_string(),
            message: format!("期望 HH:mm，实际 {}", raw),
        };
        let (hour, minute) = raw.split_once(':').ok_or_else(invalid)?;
        let hour: u32 = hour.trim().parse().map_err(|_| invalid())?;
        let minute: u32 = minute.trim().parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        Ok((hour, minute))
    }

    async fn get_sla_hours(&self) -> ApiResult<u32> {
        self.parse_or(config_keys::SLA_HOURS, self.defaults.sla_hours)
    }

    async fn get_country(&self) -> ApiResult<String> {
        Ok(self.get_string_or(config_keys::COUNTRY, &self.defaults.country))
    }

    async fn get_invalid_preview_limit(&self) -> ApiResult<usize> {
        self.parse_or(
            config_keys::INVALID_PREVIEW_LIMIT,
            self.defaults.invalid_preview_limit,
        )
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 准入过滤
    pub const REQUIRED_ITEM_CATEGORY: &str = "intake.required_item_category";
    pub const ALLOWED_ORIGIN_LOCATIONS: &str = "intake.allowed_origin_locations";

    // 库位分类
    pub const ALLOCATION_ONLY_CODE: &str = "intake.allocation_only_code";
    pub const APPROVAL_REQUIRED_CODE: &str = "intake.approval_required_code";

    // 请求构建
    pub const EMERGENCY_CUTOFF: &str = "intake.emergency_cutoff"; // HH:mm
    pub const SLA_HOURS: &str = "intake.sla_hours";
    pub const COUNTRY: &str = "intake.country";
    pub const INVALID_PREVIEW_LIMIT: &str = "intake.invalid_preview_limit";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_defaults_when_empty() {
        let manager = ConfigManager::new();
        let rules = IntakeRules::load(&manager).await.unwrap();
        assert_eq!(rules, IntakeRules::default());
    }

    #[tokio::test]
    async fn test_overrides_from_pairs() {
        let manager = ConfigManager::from_pairs([
            (config_keys::SLA_HOURS, "4"),
            (config_keys::EMERGENCY_CUTOFF, "10:30"),
            (config_keys::ALLOWED_ORIGIN_LOCATIONS, "PT11, 2000,"),
            (config_keys::COUNTRY, "  "),
        ]);

        let rules = IntakeRules::load(&manager).await.unwrap();

        assert_eq!(rules.sla_hours, 4);
        assert_eq!((rules.emergency_cutoff_hour, rules.emergency_cutoff_minute), (10, 30));
        assert_eq!(rules.allowed_origin_locations, vec!["PT11", "2000"]);
        // 空白值视为未配置
        assert_eq!(rules.country, "Chile");
    }

    #[tokio::test]
    async fn test_malformed_values() {
        let manager = ConfigManager::from_pairs([(config_keys::SLA_HOURS, "two")]);
        let err = manager.get_sla_hours().await.unwrap_err();
        assert!(matches!(err, ApiError::ConfigError { .. }));

        let manager = ConfigManager::from_pairs([(config_keys::EMERGENCY_CUTOFF, "25:00")]);
        assert!(manager.get_emergency_cutoff().await.is_err());

        let manager = ConfigManager::from_pairs([(config_keys::EMERGENCY_CUTOFF, "11")]);
        assert!(manager.get_emergency_cutoff().await.is_err());
    }

    #[tokio::test]
    async fn test_from_json_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"{{"intake.sla_hours": 3, "intake.allowed_origin_locations": ["PT11", "1000"], "intake.country": null}}"#
        )
        .unwrap();

        let manager = ConfigManager::from_json_file(temp_file.path()).unwrap();

        assert_eq!(manager.get_sla_hours().await.unwrap(), 3);
        assert_eq!(
            manager.get_allowed_origin_locations().await.unwrap(),
            vec!["PT11", "1000"]
        );
        assert_eq!(manager.get_country().await.unwrap(), "Chile");
    }

    #[test]
    fn test_from_json_file_rejects_non_object() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[1, 2]").unwrap();

        let result = ConfigManager::from_json_file(temp_file.path());
        assert!(matches!(result, Err(ApiError::ConfigError { .. })));
    }

    #[test]
    fn test_config_snapshot_sorted() {
        let manager = ConfigManager::from_pairs([("b", "2"), ("a", "1")]);
        assert_eq!(manager.get_config_snapshot().unwrap(), r#"{"a":"1","b":"2"}"#);
    }
}
