// ==========================================
// 仓库变更导入系统 - 配置层
// ==========================================
// 职责: 准入/分类规则的加载与默认值
// 存储: JSON 对象文件 / 键值对
// ==========================================

pub mod config_manager;
pub mod intake_config_trait;
pub mod intake_rules;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, CONFIG_PATH_ENV};
pub use intake_config_trait::IntakeConfigReader;
pub use intake_rules::IntakeRules;
