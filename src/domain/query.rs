// ==========================================
// 外呼预测生成系统 - 历史查询模型
// ==========================================
// 职责: 外部分析查询的请求体与结果结构
// 格式: 与外部平台 JSON 字段一致（camelCase）
// ==========================================

use serde::{Deserialize, Serialize};

/// 外呼尝试次数指标
pub const METRIC_OUTBOUND_ATTEMPTED: &str = "nOutboundAttempted";
/// 外呼接通次数指标
pub const METRIC_OUTBOUND_CONNECTED: &str = "nOutboundConnected";
/// 处理时长指标（sum 为毫秒，count 为处理量）
pub const METRIC_HANDLE: &str = "tHandle";

/// 查询粒度：15 分钟
pub const QUERY_GRANULARITY: &str = "PT15M";

// ==========================================
// 查询结果
// ==========================================

/// 统计值
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricStats {
    #[serde(default)]
    pub count: f64,
    #[serde(default)]
    pub sum: f64,
}

/// 单个指标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStat {
    pub metric: String,
    #[serde(default)]
    pub stats: MetricStats,
}

/// 单个区间行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRow {
    /// ISO 区间 "start/end"
    pub interval: String,
    #[serde(default)]
    pub metrics: Vec<MetricStat>,
}

/// 分组键
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_campaign_id: Option<String>,
}

/// 按活动分组的查询结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResultGroup {
    pub group: QueryGroup,
    #[serde(default)]
    pub data: Vec<IntervalRow>,
}

impl QueryResultGroup {
    pub fn for_campaign(campaign_id: impl Into<String>, data: Vec<IntervalRow>) -> Self {
        Self {
            group: QueryGroup {
                outbound_campaign_id: Some(campaign_id.into()),
            },
            data,
        }
    }
}

// ==========================================
// 查询请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub granularity: String,
    pub group_by: Vec<String>,
    pub metrics: Vec<String>,
    /// 过滤的外呼活动 ID
    pub campaign_ids: Vec<String>,
}

impl QueryRequest {
    /// 针对给定活动构造历史指标查询
    pub fn for_campaigns(campaign_ids: Vec<String>) -> Self {
        Self {
            granularity: QUERY_GRANULARITY.to_string(),
            group_by: vec!["outboundCampaignId".to_string()],
            metrics: vec![
                METRIC_OUTBOUND_ATTEMPTED.to_string(),
                METRIC_OUTBOUND_CONNECTED.to_string(),
                METRIC_HANDLE.to_string(),
            ],
            campaign_ids,
        }
    }
}
