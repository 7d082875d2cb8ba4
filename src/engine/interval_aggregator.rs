// ==========================================
// 外呼预测生成系统 - 区间聚合引擎
// ==========================================
// 职责: 将历史查询结果折叠为各规划组的 7×96 周矩阵
// 输入: 按外呼活动分组的区间指标行
// 输出: 规划组 historical_weeks（就地累加）+ 聚合报告
// 红线: 同一单元格只累加不覆盖；未知活动跳过并告警，不报错
// ==========================================

use crate::domain::forecast::{PlanningGroupForecast, REASON_NO_HISTORICAL_DATA};
use crate::domain::forecast::{ForecastStatus, IntradayValues};
use crate::domain::query::{
    MetricStat, QueryResultGroup, METRIC_HANDLE, METRIC_OUTBOUND_ATTEMPTED,
    METRIC_OUTBOUND_CONNECTED,
};
use crate::engine::week_alignment::{day_index, interval_index, iso_week_number, parse_interval_start};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// 处理时长单位换算（毫秒 → 秒）
const MILLIS_PER_SECOND: f64 = 1000.0;

// ==========================================
// AggregationReport - 聚合报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationReport {
    /// 已折叠的区间行数
    pub rows_folded: usize,
    /// 因时间无法解析而跳过的行数
    pub rows_skipped: usize,
    /// 找不到对应规划组的活动 ID
    pub unknown_campaigns: Vec<String>,
    /// 被标记为无历史数据的规划组名称
    pub groups_without_data: Vec<String>,
}

// ==========================================
// IntervalAggregator - 区间聚合引擎
// ==========================================
pub struct IntervalAggregator {
    // 无状态引擎
}

impl IntervalAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 折叠查询结果并校验历史数据
    ///
    /// # 参数
    /// - `groups`: 生成预测中的规划组（就地写入 historical_weeks）
    /// - `results`: 按 outboundCampaignId 分组的查询结果
    #[instrument(skip(self, groups, results), fields(result_groups = results.len()))]
    pub fn aggregate(
        &self,
        groups: &mut [PlanningGroupForecast],
        results: &[QueryResultGroup],
    ) -> AggregationReport {
        info!("开始处理查询结果: {} 个分组", results.len());
        let mut report = AggregationReport::default();

        for result in results {
            let campaign_id = match result.group.outbound_campaign_id.as_deref() {
                Some(id) => id,
                None => {
                    warn!("查询结果缺少 outboundCampaignId，跳过");
                    continue;
                }
            };

            let group = match groups.iter_mut().find(|pg| pg.campaign.id == campaign_id) {
                Some(group) => group,
                None => {
                    warn!(campaign_id = %campaign_id, "未找到活动对应的规划组，跳过");
                    report.unknown_campaigns.push(campaign_id.to_string());
                    continue;
                }
            };

            for row in &result.data {
                let start = match parse_interval_start(&row.interval) {
                    Ok(start) => start,
                    Err(e) => {
                        warn!(planning_group = %group.id(), "跳过无效区间行: {}", e);
                        report.rows_skipped += 1;
                        continue;
                    }
                };

                let week_number = iso_week_number(start.date());
                let day = day_index(&start);
                let interval = interval_index(&start);

                let week = group.week_mut_or_insert(&week_number);
                for metric in &row.metrics {
                    fold_metric(&mut week.intraday_values, metric, day, interval);
                }
                report.rows_folded += 1;
            }
        }

        report.groups_without_data = self.validate_historical_data(groups);

        info!(
            "查询结果处理完成: 折叠 {} 行, 跳过 {} 行, 无数据规划组 {} 个",
            report.rows_folded,
            report.rows_skipped,
            report.groups_without_data.len()
        );
        report
    }

    /// 标记缺少历史周记录的规划组（呼入模式豁免）
    ///
    /// # 返回
    /// 被标记的规划组名称
    pub fn validate_historical_data(&self, groups: &mut [PlanningGroupForecast]) -> Vec<String> {
        debug!("校验历史数据");
        let mut marked = Vec::new();

        for group in groups.iter_mut() {
            if group.is_inbound() {
                continue;
            }
            if group.historical_weeks.is_empty() {
                warn!(planning_group = %group.id(), "规划组无历史数据: {}", group.name());
                group.metadata.forecast_status = ForecastStatus::not_forecast(REASON_NO_HISTORICAL_DATA);
                marked.push(group.name().to_string());
            }
        }
        marked
    }
}

impl Default for IntervalAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// 将单个指标累加进对应单元格
fn fold_metric(values: &mut IntradayValues, metric: &MetricStat, day: usize, interval: usize) {
    match metric.metric.as_str() {
        METRIC_OUTBOUND_ATTEMPTED => values.n_attempted.add(day, interval, metric.stats.count),
        METRIC_OUTBOUND_CONNECTED => values.n_connected.add(day, interval, metric.stats.count),
        METRIC_HANDLE => {
            values
                .t_handle
                .add(day, interval, metric.stats.sum / MILLIS_PER_SECOND);
            values.n_handled.add(day, interval, metric.stats.count);
        }
        other => debug!("忽略未识别指标: {}", other),
    }
}
