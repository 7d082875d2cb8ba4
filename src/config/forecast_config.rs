// ==========================================
// 外呼预测生成系统 - 预测配置文件
// ==========================================
// 职责: 配置文件的强类型结构（JSON）与默认路径
// 说明: 运行期读取统一经由 ConfigManager / ForecastConfigReader
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 配置目录名
pub const CONFIG_DIR_NAME: &str = "outbound-forecast";
/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "config.json";

/// 默认导入通知主题
pub const DEFAULT_IMPORT_TOPIC: &str = "shorttermforecasts.import";
/// 默认历史周数
pub const DEFAULT_HISTORICAL_WEEKS: u32 = 6;
/// 默认区域
pub const DEFAULT_REGION: &str = "mypurecloud.com";

// ==========================================
// 业务单元
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessUnitConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// 周起始日，如 "Monday"
    #[serde(default = "default_start_day")]
    pub start_day_of_week: String,
}

fn default_start_day() -> String {
    "Monday".to_string()
}

// ==========================================
// 预测参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastParameters {
    /// 预测周起始日期
    pub week_start: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_historical_weeks")]
    pub historical_weeks: u32,
}

fn default_historical_weeks() -> u32 {
    DEFAULT_HISTORICAL_WEEKS
}

// ==========================================
// 预测选项
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastOptions {
    #[serde(default)]
    pub ignore_zeroes: bool,
    #[serde(default)]
    pub generate_inbound: bool,
}

// ==========================================
// 通知设置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default)]
    pub channel_id: String,
    #[serde(default = "default_import_topic")]
    pub import_topic: String,
}

fn default_import_topic() -> String {
    DEFAULT_IMPORT_TOPIC.to_string()
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            channel_id: String::new(),
            import_topic: default_import_topic(),
        }
    }
}

// ==========================================
// ForecastConfig - 配置文件根
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastConfig {
    pub business_unit: BusinessUnitConfig,
    pub forecast_parameters: ForecastParameters,
    #[serde(default)]
    pub forecast_options: ForecastOptions,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl ForecastConfig {
    /// 解析 JSON 配置
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// 默认配置文件路径（用户配置目录下）
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}
