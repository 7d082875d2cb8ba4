// ==========================================
// 外呼预测生成系统 - 导入传输与通知接口
// ==========================================
// 职责: 定义外部协作方接口（上传地址、上传、导入、通知订阅）及其报文
// 红线: Engine 层只定义接口，实现由调用方注入
// ==========================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

/// 外部调用结果
pub type TransportResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// 通道心跳等元信息主题
pub const METADATA_TOPIC: &str = "channel.metadata";

// ==========================================
// 报文
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub upload_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportStatus {
    Complete,
    Processing,
    Error,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStatus::Complete => write!(f, "Complete"),
            ImportStatus::Processing => write!(f, "Processing"),
            ImportStatus::Error => write!(f, "Error"),
            ImportStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResultRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub status: ImportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ImportResultRef>,
}

// ==========================================
// 通知
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationBody {
    #[serde(default)]
    pub operation_id: Option<String>,
    pub status: ImportStatus,
    #[serde(default)]
    pub result: Option<ImportResultRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    #[serde(default)]
    pub user_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMetadata {
    #[serde(default)]
    pub error_info: Option<ErrorInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub topic_name: String,
    #[serde(default)]
    pub event_body: Option<NotificationBody>,
    #[serde(default)]
    pub metadata: Option<NotificationMetadata>,
}

impl Notification {
    pub fn is_heartbeat(&self) -> bool {
        self.topic_name == METADATA_TOPIC
    }

    /// 主题属于导入主题且 operationId 与当前任务一致
    pub fn matches(&self, import_topic: &str, operation_id: &str) -> bool {
        self.topic_name.ends_with(import_topic)
            && self
                .event_body
                .as_ref()
                .and_then(|body| body.operation_id.as_deref())
                == Some(operation_id)
    }

    pub fn user_message(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.error_info.as_ref())
            .and_then(|info| info.user_message.as_deref())
    }
}

/// 业务单元导入通知的订阅主题
pub fn import_topic_id(business_unit_id: &str, topic: &str) -> String {
    format!("v2.workforcemanagement.businessunits.{}.{}", business_unit_id, topic)
}

/// 导入完成后的预测页面链接
pub fn forecast_url(region: &str, business_unit_id: &str, week_id: &str, forecast_id: &str) -> String {
    format!(
        "https://apps.{}/directory/#/admin/wfm/forecasts/{}/update/{}/{}",
        region, business_unit_id, week_id, forecast_id
    )
}

// ==========================================
// 外部协作方 Trait
// ==========================================

/// 劳动力管理平台导入接口
#[async_trait]
pub trait WfmImportClient: Send + Sync {
    /// 申请与压缩文件大小匹配的签名上传地址
    async fn generate_upload_url(
        &self,
        business_unit_id: &str,
        week_id: &str,
        content_length: usize,
    ) -> TransportResult<UploadUrlResponse>;

    async fn upload_file(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        payload: &[u8],
    ) -> TransportResult<()>;

    async fn import_forecast(
        &self,
        business_unit_id: &str,
        week_id: &str,
        upload_key: &str,
    ) -> TransportResult<ImportResponse>;
}

/// 通知通道
///
/// 通知本身经由 mpsc 通道投递给导入任务
#[async_trait]
pub trait NotificationClient: Send + Sync {
    async fn subscribe(&self, channel_id: &str, topics: &[String]) -> TransportResult<()>;

    async fn disconnect(&self) -> TransportResult<()>;
}
