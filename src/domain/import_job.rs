// ==========================================
// 外呼预测生成系统 - 导入作业领域模型
// ==========================================
// 职责: 单次导入尝试的步骤状态与外部标识
// 生命周期: 每次导入创建，完成或失败后丢弃
// ==========================================

use crate::domain::types::{ImportStepKind, StepStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 单个步骤
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStep {
    pub name: ImportStepKind,
    pub status: StepStatus,
}

/// 作业整体结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportOutcome {
    /// 执行中（含等待通知）
    InProgress,
    Completed,
    Failed,
}

// ==========================================
// ImportJob - 导入作业
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportJob {
    pub job_id: String,
    pub business_unit_id: String,
    pub week_id: String,
    pub steps: [ImportStep; 5],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub outcome: ImportOutcome,
    pub created_at: DateTime<Utc>,
}

impl ImportJob {
    pub fn new(business_unit_id: impl Into<String>, week_id: impl Into<String>) -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
            business_unit_id: business_unit_id.into(),
            week_id: week_id.into(),
            steps: ImportStepKind::ALL.map(|name| ImportStep {
                name,
                status: StepStatus::Pending,
            }),
            operation_id: None,
            upload_key: None,
            forecast_id: None,
            forecast_url: None,
            error_message: None,
            outcome: ImportOutcome::InProgress,
            created_at: Utc::now(),
        }
    }

    pub fn step_status(&self, kind: ImportStepKind) -> StepStatus {
        self.steps[kind.index()].status
    }

    pub fn set_step_status(&mut self, kind: ImportStepKind, status: StepStatus) {
        self.steps[kind.index()].status = status;
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome != ImportOutcome::InProgress
    }

    pub fn failed_steps(&self) -> Vec<ImportStepKind> {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Failed)
            .map(|s| s.name)
            .collect()
    }
}
