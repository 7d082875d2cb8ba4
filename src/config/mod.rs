// ==========================================
// 外呼预测生成系统 - 配置层
// ==========================================
// 职责: 配置文件加载、键值查询与快照
// 存储: 内存键值表
// ==========================================

pub mod config_manager;
pub mod forecast_config;
pub mod forecast_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use forecast_config::{
    default_config_path, BusinessUnitConfig, ForecastConfig, ForecastOptions, ForecastParameters,
    NotificationSettings,
};
pub use forecast_config_trait::{ConfigResult, ForecastConfigReader};
