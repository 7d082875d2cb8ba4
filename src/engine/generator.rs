// ==========================================
// 外呼预测生成系统 - 预测生成编排器
// ==========================================
// 职责: 串联 查询 → 聚合 → 校验 → 准备 → 写入会话
// 红线: 查询失败只上报错误，流程继续（规划组将被标记为无历史数据）
// 红线: 各规划组并发准备，全部完成后才写入生成预测
// ==========================================

use crate::config::ForecastConfigReader;
use crate::domain::forecast::{ForecastStatus, PlanningGroupForecast};
use crate::domain::query::{QueryRequest, QueryResultGroup};
use crate::domain::session::ForecastSession;
use crate::engine::error::{ForecastError, ForecastResult};
use crate::engine::events::OptionalEventSink;
use crate::engine::interval_aggregator::IntervalAggregator;
use crate::engine::preparation::{prepare_group, PreparationStep};
use crate::engine::week_alignment::build_query_intervals;
use crate::i18n::{t, t_with_args};
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;
use tracing::{error, info, instrument};

// ==========================================
// QueryExecutor - 历史查询执行（外部协作方）
// ==========================================
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// 按区间执行查询并合并结果
    async fn execute_queries(
        &self,
        request: &QueryRequest,
        intervals: &[String],
    ) -> Result<Vec<QueryResultGroup>, Box<dyn Error + Send + Sync>>;
}

/// 返回预置结果的查询执行器（离线文件/测试）
#[derive(Debug, Clone, Default)]
pub struct StaticQueryExecutor {
    results: Vec<QueryResultGroup>,
}

impl StaticQueryExecutor {
    pub fn new(results: Vec<QueryResultGroup>) -> Self {
        Self { results }
    }
}

#[async_trait]
impl QueryExecutor for StaticQueryExecutor {
    async fn execute_queries(
        &self,
        _request: &QueryRequest,
        _intervals: &[String],
    ) -> Result<Vec<QueryResultGroup>, Box<dyn Error + Send + Sync>> {
        Ok(self.results.clone())
    }
}

// ==========================================
// GenerationSummary - 生成结果摘要
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSummary {
    pub planning_groups: usize,
    /// 已生成预测数据的规划组数
    pub forecast_groups: usize,
    pub rows_folded: usize,
    pub groups_without_data: Vec<String>,
    pub unknown_campaigns: Vec<String>,
    /// 历史查询是否失败或无结果
    pub query_failed: bool,
}

// ==========================================
// ForecastGenerator - 预测生成编排器
// ==========================================
pub struct ForecastGenerator<C, Q>
where
    C: ForecastConfigReader + ?Sized,
    Q: QueryExecutor + ?Sized,
{
    config: Arc<C>,
    executor: Arc<Q>,
    aggregator: IntervalAggregator,
    sink: OptionalEventSink,
}

impl<C, Q> ForecastGenerator<C, Q>
where
    C: ForecastConfigReader + ?Sized,
    Q: QueryExecutor + ?Sized,
{
    pub fn new(config: Arc<C>, executor: Arc<Q>, sink: OptionalEventSink) -> Self {
        Self {
            config,
            executor,
            aggregator: IntervalAggregator::new(),
            sink,
        }
    }

    /// 执行一轮预测生成
    ///
    /// # 参数
    /// - `session`: 会话状态（生成完成后写入生成预测与修改预测）
    /// - `planning_groups`: 本轮参与预测的规划组（尚无历史数据）
    #[instrument(skip(self, session, planning_groups), fields(groups = planning_groups.len()))]
    pub async fn generate(
        &self,
        session: &mut ForecastSession,
        planning_groups: Vec<PlanningGroupForecast>,
    ) -> ForecastResult<GenerationSummary> {
        info!("预测生成开始");

        // ==========================================
        // 步骤1: 构建查询
        // ==========================================
        self.sink.progress(t("generate.progress.building_queries"));
        let week_start = self
            .config
            .get_week_start()
            .await
            .map_err(|e| config_error("week_start", e))?;
        let historical_weeks = self
            .config
            .get_historical_weeks()
            .await
            .map_err(|e| config_error("historical_weeks", e))?;
        let ignore_zeroes = self
            .config
            .get_ignore_zeroes()
            .await
            .map_err(|e| config_error("ignore_zeroes", e))?;
        let generate_inbound = self
            .config
            .get_generate_inbound()
            .await
            .map_err(|e| config_error("generate_inbound", e))?;

        let campaign_ids: Vec<String> = planning_groups
            .iter()
            .filter(|pg| !pg.is_inbound())
            .map(|pg| pg.campaign.id.clone())
            .collect();
        let request = QueryRequest::for_campaigns(campaign_ids);
        let intervals = build_query_intervals(week_start, historical_weeks);

        // ==========================================
        // 步骤2: 执行查询
        // ==========================================
        self.sink.progress(t("generate.progress.executing_queries"));
        let mut summary = GenerationSummary {
            planning_groups: planning_groups.len(),
            ..Default::default()
        };

        let results = match self.executor.execute_queries(&request, &intervals).await {
            Ok(results) if results.is_empty() => {
                let err = ForecastError::Query(t("generate.error.no_data"));
                error!("{}", err);
                self.sink.report_error(t("generate.error.query"), err.to_string());
                summary.query_failed = true;
                results
            }
            Ok(results) => results,
            Err(e) => {
                let err = ForecastError::Query(e.to_string());
                error!("{}", err);
                self.sink.report_error(t("generate.error.query"), err.to_string());
                summary.query_failed = true;
                Vec::new()
            }
        };

        // ==========================================
        // 步骤3: 聚合 + 校验历史数据
        // ==========================================
        self.sink.progress(t("generate.progress.processing_results"));
        let mut groups = planning_groups;
        let report = self.aggregator.aggregate(&mut groups, &results);
        summary.rows_folded = report.rows_folded;
        summary.groups_without_data = report.groups_without_data;
        summary.unknown_campaigns = report.unknown_campaigns;
        if !summary.groups_without_data.is_empty() {
            let count = summary.groups_without_data.len().to_string();
            self.sink.progress(t_with_args(
                "generate.progress.groups_without_data",
                &[("count", count.as_str())],
            ));
        }

        // ==========================================
        // 步骤4: 并发准备各规划组
        // ==========================================
        self.sink.progress(t("generate.progress.preparing_forecast"));
        let steps = PreparationStep::pipeline(ignore_zeroes);
        let pending = groups.into_iter().map(|group| {
            let steps = &steps;
            async move {
                if group.metadata.forecast_status.is_forecast && !group.is_inbound() {
                    prepare_group(group, steps).await
                } else {
                    group
                }
            }
        });
        let mut groups: Vec<PlanningGroupForecast> = join_all(pending).await;
        info!("全部规划组准备完成");

        // ==========================================
        // 步骤5: 呼入模式规划组
        // ==========================================
        if generate_inbound {
            self.sink.progress(t("generate.progress.inbound"));
            for group in groups.iter_mut().filter(|pg| pg.is_inbound()) {
                group.metadata.forecast_status = ForecastStatus::ready();
            }
        }

        summary.forecast_groups = groups.iter().filter(|pg| pg.forecast_data.is_some()).count();
        session.install_generated(groups);

        info!(
            forecast_groups = summary.forecast_groups,
            without_data = summary.groups_without_data.len(),
            "预测生成完成"
        );
        Ok(summary)
    }
}

fn config_error(key: &str, err: Box<dyn Error + Send + Sync>) -> ForecastError {
    ForecastError::Config {
        key: key.to_string(),
        message: err.to_string(),
    }
}
