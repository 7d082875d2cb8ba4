// ==========================================
// 外呼预测生成系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写、快照与恢复
// 存储: 内存键值表（由 JSON 配置文件展开）
// 红线: 不做进程级单例，由 AppState 持有并显式传递
// ==========================================

use crate::config::forecast_config::{
    default_config_path, ForecastConfig, DEFAULT_HISTORICAL_WEEKS, DEFAULT_IMPORT_TOPIC,
    DEFAULT_REGION,
};
use crate::config::forecast_config_trait::{ConfigResult, ForecastConfigReader};
use crate::engine::week_alignment::parse_weekday_name;
use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::RwLock;
use tracing::{info, warn};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Default)]
pub struct ConfigManager {
    values: RwLock<HashMap<String, String>>,
}

impl ConfigManager {
    /// 创建空配置管理器（全部取默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 由强类型配置创建
    pub fn from_config(config: &ForecastConfig) -> ConfigResult<Self> {
        let manager = Self::new();
        manager.apply_config(config)?;
        Ok(manager)
    }

    /// 从 JSON 配置文件加载
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("配置文件读取失败 ({}): {}", path.display(), e))?;
        let config = ForecastConfig::from_json(&raw)
            .map_err(|e| format!("配置文件格式错误 ({}): {}", path.display(), e))?;
        info!("已加载配置文件: {}", path.display());
        Self::from_config(&config)
    }

    /// 从默认路径加载
    pub fn load_default() -> ConfigResult<Self> {
        Self::load_from_file(&default_config_path())
    }

    /// 将强类型配置展开写入键值表
    pub fn apply_config(&self, config: &ForecastConfig) -> ConfigResult<()> {
        let bu = &config.business_unit;
        let params = &config.forecast_parameters;
        let options = &config.forecast_options;
        let notifications = &config.notifications;

        let entries = [
            (config_keys::BUSINESS_UNIT_ID, bu.id.clone()),
            (config_keys::BUSINESS_UNIT_NAME, bu.name.clone()),
            (config_keys::START_DAY_OF_WEEK, bu.start_day_of_week.clone()),
            (config_keys::WEEK_START, params.week_start.format("%Y-%m-%d").to_string()),
            (config_keys::DESCRIPTION, params.description.clone()),
            (config_keys::HISTORICAL_WEEKS, params.historical_weeks.to_string()),
            (config_keys::IGNORE_ZEROES, options.ignore_zeroes.to_string()),
            (config_keys::GENERATE_INBOUND, options.generate_inbound.to_string()),
            (config_keys::CHANNEL_ID, notifications.channel_id.clone()),
            (config_keys::IMPORT_TOPIC, notifications.import_topic.clone()),
            (config_keys::REGION, config.region.clone()),
        ];

        let mut values = self.values.write().map_err(|e| format!("锁获取失败: {}", e))?;
        for (key, value) in entries {
            values.insert(key.to_string(), value);
        }
        Ok(())
    }

    /// 读取配置值
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let values = self.values.read().map_err(|e| format!("锁获取失败: {}", e))?;
        Ok(values.get(key).cloned())
    }

    /// 读取配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 读取配置值，带默认值（空字符串视为未配置）
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取必填配置
    fn get_required(&self, key: &str) -> ConfigResult<String> {
        self.get_config_value(key)?
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| format!("缺少必填配置: {}", key).into())
    }

    /// 写入单个配置值
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let mut values = self.values.write().map_err(|e| format!("锁获取失败: {}", e))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// 获取所有配置的快照（JSON，按键排序）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let values = self.values.read().map_err(|e| format!("锁获取失败: {}", e))?;
        let ordered: BTreeMap<&String, &String> = values.iter().collect();
        Ok(serde_json::to_string(&ordered)?)
    }

    /// 从配置快照恢复
    ///
    /// # 返回
    /// 恢复的配置项数量（`__meta_` 前缀的元信息不回写）
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let snapshot: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut values = self.values.write().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut count = 0;
        for (key, value) in snapshot {
            if key.starts_with("__meta_") {
                continue;
            }
            values.insert(key, value);
            count += 1;
        }
        Ok(count)
    }

    fn parse_bool(&self, key: &str, default: bool) -> ConfigResult<bool> {
        let value = self.get_config_or_default(key, &default.to_string())?;
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => {
                warn!(config_key = key, raw_value = %value, "布尔配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }
}

// ==========================================
// ForecastConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ForecastConfigReader for ConfigManager {
    async fn get_business_unit_id(&self) -> ConfigResult<String> {
        self.get_required(config_keys::BUSINESS_UNIT_ID)
    }

    async fn get_start_day_of_week(&self) -> ConfigResult<Weekday> {
        let value = self.get_config_or_default(config_keys::START_DAY_OF_WEEK, "Monday")?;
        Ok(parse_weekday_name(&value)?)
    }

    async fn get_week_start(&self) -> ConfigResult<NaiveDate> {
        let value = self.get_required(config_keys::WEEK_START)?;
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map_err(|e| format!("预测周起始日期格式错误 ({}): {}", value, e).into())
    }

    async fn get_description(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::DESCRIPTION, "")
    }

    async fn get_historical_weeks(&self) -> ConfigResult<u32> {
        let default = DEFAULT_HISTORICAL_WEEKS.to_string();
        let value = self.get_config_or_default(config_keys::HISTORICAL_WEEKS, &default)?;
        Ok(value.trim().parse::<u32>().unwrap_or(DEFAULT_HISTORICAL_WEEKS))
    }

    async fn get_ignore_zeroes(&self) -> ConfigResult<bool> {
        self.parse_bool(config_keys::IGNORE_ZEROES, false)
    }

    async fn get_generate_inbound(&self) -> ConfigResult<bool> {
        self.parse_bool(config_keys::GENERATE_INBOUND, false)
    }

    async fn get_channel_id(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::CHANNEL_ID, "")
    }

    async fn get_import_topic(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::IMPORT_TOPIC, DEFAULT_IMPORT_TOPIC)
    }

    async fn get_region(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::REGION, DEFAULT_REGION)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 业务单元
    pub const BUSINESS_UNIT_ID: &str = "business_unit_id";
    pub const BUSINESS_UNIT_NAME: &str = "business_unit_name";
    pub const START_DAY_OF_WEEK: &str = "start_day_of_week";

    // 预测参数
    pub const WEEK_START: &str = "week_start";
    pub const DESCRIPTION: &str = "description";
    pub const HISTORICAL_WEEKS: &str = "historical_weeks";

    // 预测选项
    pub const IGNORE_ZEROES: &str = "ignore_zeroes";
    pub const GENERATE_INBOUND: &str = "generate_inbound";

    // 通知与导入
    pub const CHANNEL_ID: &str = "channel_id";
    pub const IMPORT_TOPIC: &str = "import_topic";
    pub const REGION: &str = "region";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_when_empty() {
        let manager = ConfigManager::new();
        assert_eq!(manager.get_start_day_of_week().await.unwrap(), Weekday::Mon);
        assert_eq!(manager.get_historical_weeks().await.unwrap(), DEFAULT_HISTORICAL_WEEKS);
        assert!(!manager.get_ignore_zeroes().await.unwrap());
        assert_eq!(manager.get_import_topic().await.unwrap(), DEFAULT_IMPORT_TOPIC);
        assert!(manager.get_business_unit_id().await.is_err());
        assert!(manager.get_week_start().await.is_err());
    }

    #[tokio::test]
    async fn test_set_and_read_back() {
        let manager = ConfigManager::new();
        manager.set_config_value(config_keys::IGNORE_ZEROES, "TRUE").unwrap();
        manager.set_config_value(config_keys::START_DAY_OF_WEEK, "Sunday").unwrap();
        manager.set_config_value(config_keys::HISTORICAL_WEEKS, "abc").unwrap();

        assert!(manager.get_ignore_zeroes().await.unwrap());
        assert_eq!(manager.get_start_day_of_week().await.unwrap(), Weekday::Sun);
        assert_eq!(manager.get_historical_weeks().await.unwrap(), DEFAULT_HISTORICAL_WEEKS);
    }

    #[tokio::test]
    async fn test_invalid_start_day_is_error() {
        let manager = ConfigManager::new();
        manager.set_config_value(config_keys::START_DAY_OF_WEEK, "Someday").unwrap();
        assert!(manager.get_start_day_of_week().await.is_err());
    }

    #[test]
    fn test_snapshot_and_restore() {
        let manager = ConfigManager::new();
        manager.set_config_value(config_keys::REGION, "mypurecloud.ie").unwrap();
        let snapshot = manager.get_config_snapshot().unwrap();

        let other = ConfigManager::new();
        let restored = other
            .restore_config_from_snapshot(r#"{"region": "mypurecloud.de", "__meta_name": "x"}"#)
            .unwrap();
        assert_eq!(restored, 1);
        assert_eq!(
            other.get_global_config_value(config_keys::REGION).unwrap().as_deref(),
            Some("mypurecloud.de")
        );

        assert_eq!(other.restore_config_from_snapshot(&snapshot).unwrap(), 1);
        assert_eq!(
            other.get_global_config_value(config_keys::REGION).unwrap().as_deref(),
            Some("mypurecloud.ie")
        );
        assert!(other.get_global_config_value("__meta_name").unwrap().is_none());
    }
}
