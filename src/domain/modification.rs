// ==========================================
// 外呼预测生成系统 - 修改快照
// ==========================================
// 职责: 用户选中规划组 + 日期范围时的工作副本
// 区别于生成预测（基准）与已保存的修改预测
// ==========================================

use crate::domain::forecast::ForecastData;
use crate::domain::types::{DayScope, MetricSelection, ModificationKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationSnapshot {
    pub selected_planning_group_id: String,
    pub selected_day: DayScope,
    pub values: ForecastData,
}

/// 修改请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationRequest {
    pub planning_group_id: String,
    pub day: DayScope,
    pub metric: MetricSelection,
    pub kind: ModificationKind,
}

impl ModificationRequest {
    pub fn new(
        planning_group_id: impl Into<String>,
        day: DayScope,
        metric: MetricSelection,
        kind: ModificationKind,
    ) -> Self {
        Self {
            planning_group_id: planning_group_id.into(),
            day,
            metric,
            kind,
        }
    }
}
