// ==========================================
// 外呼预测生成系统 - 预测会话状态
// ==========================================
// 职责: 持有生成预测（基准，只读）与修改预测（可变副本）
// 红线: 生成预测只在生成时写入一次，修改操作不得覆盖
// ==========================================

use crate::domain::forecast::PlanningGroupForecast;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 预测来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ForecastSource {
    GeneratedForecast,
    ModifiedForecast,
}

// ==========================================
// ForecastSession - 会话状态（显式传递，不做全局单例）
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSession {
    generated: Vec<PlanningGroupForecast>,
    modified: Vec<PlanningGroupForecast>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generated_at: Option<DateTime<Utc>>,
}

impl ForecastSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入新一轮生成结果，并以其为起点重建修改预测
    pub fn install_generated(&mut self, groups: Vec<PlanningGroupForecast>) {
        self.modified = groups.clone();
        self.generated = groups;
        self.generated_at = Some(Utc::now());
    }

    pub fn has_forecast(&self) -> bool {
        self.generated_at.is_some()
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at
    }

    pub fn generated(&self) -> &[PlanningGroupForecast] {
        &self.generated
    }

    pub fn modified(&self) -> &[PlanningGroupForecast] {
        &self.modified
    }

    pub fn groups(&self, source: ForecastSource) -> &[PlanningGroupForecast] {
        match source {
            ForecastSource::GeneratedForecast => &self.generated,
            ForecastSource::ModifiedForecast => &self.modified,
        }
    }

    pub fn find(&self, source: ForecastSource, planning_group_id: &str) -> Option<&PlanningGroupForecast> {
        self.groups(source)
            .iter()
            .find(|pg| pg.id() == planning_group_id)
    }

    pub fn find_modified_mut(&mut self, planning_group_id: &str) -> Option<&mut PlanningGroupForecast> {
        self.modified
            .iter_mut()
            .find(|pg| pg.id() == planning_group_id)
    }
}
