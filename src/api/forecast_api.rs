// ==========================================
// 外呼预测生成系统 - 预测 API
// ==========================================
// 职责: 预测生成、快照查询、修改与只读视图
// 输入: 调用方显式传入的会话状态
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ForecastConfigReader};
use crate::domain::forecast::{ForecastStatus, PlanningGroupForecast};
use crate::domain::modification::{ModificationRequest, ModificationSnapshot};
use crate::domain::session::{ForecastSession, ForecastSource};
use crate::domain::types::DayScope;
use crate::engine::events::OptionalEventSink;
use crate::engine::forecast_computer::{ForecastComputer, HistoricalSummary};
use crate::engine::generator::{ForecastGenerator, GenerationSummary, QueryExecutor};
use crate::engine::modification::ModificationEngine;
use crate::engine::week_alignment::{day_labels, interval_labels, rotate_to_start_of_week};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

// ==========================================
// 只读视图
// ==========================================

/// 规划组列表项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningGroupSummary {
    pub id: String,
    pub name: String,
    pub campaign_name: String,
    pub forecast_status: ForecastStatus,
    pub has_forecast_data: bool,
}

/// 单日的区间明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalView {
    pub labels: Vec<String>,
    pub offered: Vec<f64>,
    pub average_handle_time: Vec<f64>,
}

/// 规划组预测视图
///
/// 日维度数组按业务单元周起始日排列；`day` 仍使用周日为 0 的存储序号
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastView {
    pub planning_group_id: String,
    pub planning_group_name: String,
    pub source: ForecastSource,
    pub day: DayScope,
    pub forecast_status: ForecastStatus,
    pub weekly_offered: f64,
    pub weekly_average_handle_time: f64,
    pub day_labels: Vec<String>,
    pub daily_offered: Vec<f64>,
    pub daily_average_handle_time: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervals: Option<IntervalView>,
}

// ==========================================
// ForecastApi - 预测 API
// ==========================================
pub struct ForecastApi {
    config: Arc<ConfigManager>,
    generator: ForecastGenerator<ConfigManager, dyn QueryExecutor>,
    engine: ModificationEngine,
    computer: ForecastComputer,
}

impl ForecastApi {
    pub fn new(config: Arc<ConfigManager>, executor: Arc<dyn QueryExecutor>, sink: OptionalEventSink) -> Self {
        Self {
            generator: ForecastGenerator::new(config.clone(), executor, sink),
            config,
            engine: ModificationEngine::new(),
            computer: ForecastComputer::new(),
        }
    }

    /// 生成预测
    ///
    /// # 参数
    /// - session: 会话状态（成功后生成预测与修改预测被替换）
    /// - planning_groups: 参与本轮预测的规划组
    pub async fn generate(
        &self,
        session: &mut ForecastSession,
        planning_groups: Vec<PlanningGroupForecast>,
    ) -> ApiResult<GenerationSummary> {
        if planning_groups.is_empty() {
            return Err(ApiError::InvalidInput("规划组列表为空".to_string()));
        }
        let summary = self.generator.generate(session, planning_groups).await?;
        info!(forecast_groups = summary.forecast_groups, "预测已生成");
        Ok(summary)
    }

    /// 列出规划组
    pub fn list_planning_groups(
        &self,
        session: &ForecastSession,
        source: ForecastSource,
    ) -> Vec<PlanningGroupSummary> {
        session
            .groups(source)
            .iter()
            .map(|pg| PlanningGroupSummary {
                id: pg.id().to_string(),
                name: pg.name().to_string(),
                campaign_name: pg.campaign.name.clone(),
                forecast_status: pg.metadata.forecast_status.clone(),
                has_forecast_data: pg.forecast_data.is_some(),
            })
            .collect()
    }

    /// 读取修改快照
    pub fn get_snapshot(
        &self,
        session: &ForecastSession,
        source: ForecastSource,
        planning_group_id: &str,
        day: DayScope,
    ) -> ApiResult<ModificationSnapshot> {
        ensure_generated(session)?;
        Ok(self.engine.snapshot(session, source, planning_group_id, day)?)
    }

    /// 应用修改（平滑/趋势线/拉平/截断/削峰填谷/重置）
    pub fn modify(
        &self,
        session: &mut ForecastSession,
        request: &ModificationRequest,
    ) -> ApiResult<ModificationSnapshot> {
        ensure_generated(session)?;
        Ok(self.engine.apply(session, request)?)
    }

    /// 规划组历史汇总
    pub fn get_history(&self, session: &ForecastSession, planning_group_id: &str) -> ApiResult<HistoricalSummary> {
        ensure_generated(session)?;
        let group = session
            .find(ForecastSource::GeneratedForecast, planning_group_id)
            .ok_or_else(|| ApiError::NotFound(format!("规划组(id={})不存在", planning_group_id)))?;
        Ok(self.computer.summarize_history(group))
    }

    /// 构建预测视图
    pub async fn get_view(
        &self,
        session: &ForecastSession,
        source: ForecastSource,
        planning_group_id: &str,
        day: DayScope,
    ) -> ApiResult<ForecastView> {
        let snapshot = self.get_snapshot(session, source, planning_group_id, day)?;
        let group = session
            .find(source, planning_group_id)
            .ok_or_else(|| ApiError::NotFound(format!("规划组(id={})不存在", planning_group_id)))?;
        let start_day = self
            .config
            .get_start_day_of_week()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let totals = self.computer.forecast_totals(&snapshot.values);
        let intervals = day.day_index().map(|d| IntervalView {
            labels: interval_labels(),
            offered: snapshot.values.n_contacts.day(d).to_vec(),
            average_handle_time: totals.average_handle_time.interval_averages.day(d).to_vec(),
        });

        Ok(ForecastView {
            planning_group_id: group.id().to_string(),
            planning_group_name: group.name().to_string(),
            source,
            day,
            forecast_status: group.metadata.forecast_status.clone(),
            weekly_offered: totals.offered.weekly_total,
            weekly_average_handle_time: totals.average_handle_time.weekly_average,
            day_labels: day_labels(start_day),
            daily_offered: rotate_to_start_of_week(&totals.offered.daily_totals, start_day),
            daily_average_handle_time: rotate_to_start_of_week(
                &totals.average_handle_time.daily_averages,
                start_day,
            ),
            intervals,
        })
    }
}

fn ensure_generated(session: &ForecastSession) -> ApiResult<()> {
    if session.has_forecast() {
        Ok(())
    } else {
        Err(ApiError::ForecastNotGenerated)
    }
}
