// ==========================================
// 外呼预测生成系统 - 预测计算引擎
// ==========================================
// 职责: 由周矩阵派生日/周汇总与加权平均
// 红线: 处理时长加权平均 = Σ tHandle / Σ nHandled，绝不对平均值再取平均
// 红线: nHandled 为 0 的桶平均值为 0，不得出现 NaN
// ==========================================

use crate::domain::forecast::{ForecastData, IntradayValues, PlanningGroupForecast, WeekRecord};
use crate::domain::matrix::WeekMatrix;
use crate::domain::types::DAYS_PER_WEEK;
use serde::{Deserialize, Serialize};

/// 安全除法：分母为 0 时返回 0
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

// ==========================================
// 计算结果
// ==========================================

/// 日汇总 + 周汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub daily_totals: Vec<f64>,
    pub weekly_total: f64,
}

/// 区间/日/周三级加权平均
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedAverages {
    pub interval_averages: WeekMatrix,
    pub daily_averages: Vec<f64>,
    pub weekly_average: f64,
}

/// 预测数据汇总（offered + AHT）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastTotals {
    pub offered: Totals,
    pub handled: Totals,
    pub average_handle_time: WeightedAverages,
}

/// 历史数据汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSummary {
    pub week_count: usize,
    pub attempted: Totals,
    pub connected: Totals,
    pub handled: Totals,
    pub average_handle_time: WeightedAverages,
}

// ==========================================
// ForecastComputer - 预测计算引擎
// ==========================================
pub struct ForecastComputer {
    // 无状态引擎
}

impl ForecastComputer {
    pub fn new() -> Self {
        Self {}
    }

    /// 日汇总（每天 96 区间之和）与周汇总（全部单元格之和）
    pub fn totals(&self, matrix: &WeekMatrix) -> Totals {
        let daily_totals: Vec<f64> = (0..DAYS_PER_WEEK)
            .map(|d| matrix.day(d).iter().sum())
            .collect();
        let weekly_total = daily_totals.iter().sum();
        Totals {
            daily_totals,
            weekly_total,
        }
    }

    /// 加权平均
    ///
    /// # 参数
    /// - `weighted_sum`: 分子矩阵（如累计处理时长）
    /// - `weights`: 分母矩阵（如处理量）
    pub fn weighted_averages(&self, weighted_sum: &WeekMatrix, weights: &WeekMatrix) -> WeightedAverages {
        let interval_averages = weighted_sum.zip_with(weights, safe_divide);

        let numerators = self.totals(weighted_sum);
        let denominators = self.totals(weights);
        let daily_averages = numerators
            .daily_totals
            .iter()
            .zip(denominators.daily_totals.iter())
            .map(|(n, d)| safe_divide(*n, *d))
            .collect();
        let weekly_average = safe_divide(numerators.weekly_total, denominators.weekly_total);

        WeightedAverages {
            interval_averages,
            daily_averages,
            weekly_average,
        }
    }

    /// 跨历史周逐单元格累加四个并行矩阵
    pub fn pool_weeks(&self, weeks: &[WeekRecord]) -> IntradayValues {
        let mut pooled = IntradayValues::default();
        for week in weeks {
            let values = &week.intraday_values;
            pooled.n_attempted.accumulate(&values.n_attempted);
            pooled.n_connected.accumulate(&values.n_connected);
            pooled.t_handle.accumulate(&values.t_handle);
            pooled.n_handled.accumulate(&values.n_handled);
        }
        pooled
    }

    /// 规划组历史汇总
    pub fn summarize_history(&self, group: &PlanningGroupForecast) -> HistoricalSummary {
        let pooled = self.pool_weeks(&group.historical_weeks);
        HistoricalSummary {
            week_count: group.historical_weeks.len(),
            attempted: self.totals(&pooled.n_attempted),
            connected: self.totals(&pooled.n_connected),
            handled: self.totals(&pooled.n_handled),
            average_handle_time: self.weighted_averages(&pooled.t_handle, &pooled.n_handled),
        }
    }

    /// 预测数据汇总
    pub fn forecast_totals(&self, data: &ForecastData) -> ForecastTotals {
        ForecastTotals {
            offered: self.totals(&data.n_contacts),
            handled: self.totals(&data.n_handled),
            average_handle_time: self.weighted_averages(&data.t_handle, &data.n_handled),
        }
    }
}

impl Default for ForecastComputer {
    fn default() -> Self {
        Self::new()
    }
}
