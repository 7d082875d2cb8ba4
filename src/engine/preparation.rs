// ==========================================
// 外呼预测生成系统 - 规划组预测准备
// ==========================================
// 职责: 以固定顺序对每个规划组执行准备步骤
// 步骤: PrepareMetrics → GenerateAverages → ApplyContacts
// 契约: 每个步骤 (group, options) → group；失败时记录日志并保留原规划组
// ==========================================

use crate::domain::forecast::{
    ForecastAverages, ForecastData, PlanningGroupForecast, WeekMetrics,
};
use crate::domain::matrix::WeekMatrix;
use crate::domain::types::{DAYS_PER_WEEK, INTERVALS_PER_DAY};
use crate::engine::error::{ForecastError, ForecastResult};
use crate::engine::forecast_computer::{safe_divide, ForecastComputer};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error};

// ==========================================
// PreparationStep - 准备步骤（封闭枚举）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreparationStep {
    /// 逐周派生接通率与外呼分布
    PrepareMetrics,
    /// 跨周平均；ignore_zeroes 时为 0 的周不计入该单元格分母
    GenerateAverages { ignore_zeroes: bool },
    /// 按计划联系人数量生成预测矩阵
    ApplyContacts,
}

impl PreparationStep {
    /// 标准准备流程
    pub fn pipeline(ignore_zeroes: bool) -> Vec<PreparationStep> {
        vec![
            PreparationStep::PrepareMetrics,
            PreparationStep::GenerateAverages { ignore_zeroes },
            PreparationStep::ApplyContacts,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PreparationStep::PrepareMetrics => "PrepareMetrics",
            PreparationStep::GenerateAverages { .. } => "GenerateAverages",
            PreparationStep::ApplyContacts => "ApplyContacts",
        }
    }

    /// 执行步骤，返回新的规划组
    pub fn apply(&self, group: &PlanningGroupForecast) -> ForecastResult<PlanningGroupForecast> {
        let mut prepared = group.clone();
        match self {
            PreparationStep::PrepareMetrics => prepare_metrics(&mut prepared),
            PreparationStep::GenerateAverages { ignore_zeroes } => {
                generate_averages(&mut prepared, *ignore_zeroes)?
            }
            PreparationStep::ApplyContacts => apply_contacts(&mut prepared)?,
        }
        Ok(prepared)
    }
}

impl fmt::Display for PreparationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 依次执行准备步骤
///
/// 单个步骤失败只记录错误，规划组保持该步骤之前的状态并继续后续步骤
pub async fn prepare_group(
    group: PlanningGroupForecast,
    steps: &[PreparationStep],
) -> PlanningGroupForecast {
    let mut current = group;
    for step in steps {
        debug!(planning_group = %current.id(), step = %step, "执行准备步骤");
        match step.apply(&current) {
            Ok(next) => current = next,
            Err(e) => {
                error!(planning_group = %current.id(), step = %step, "准备步骤失败: {}", e);
            }
        }
    }
    debug!(planning_group = %current.id(), "规划组准备完成: {}", current.name());
    current
}

// ==========================================
// 步骤实现
// ==========================================

fn prepare_metrics(group: &mut PlanningGroupForecast) {
    for week in group.historical_weeks.iter_mut() {
        let values = &week.intraday_values;
        let weekly_attempted = values.n_attempted.sum();

        let contact_rate = values.n_connected.zip_with(&values.n_attempted, safe_divide);
        let attempt_distribution = values
            .n_attempted
            .map(|attempted| safe_divide(attempted, weekly_attempted));

        week.metrics = Some(WeekMetrics {
            contact_rate,
            attempt_distribution,
        });
    }
}

fn generate_averages(group: &mut PlanningGroupForecast, ignore_zeroes: bool) -> ForecastResult<()> {
    let mut metrics = Vec::with_capacity(group.historical_weeks.len());
    for week in &group.historical_weeks {
        match &week.metrics {
            Some(m) => metrics.push(m),
            None => {
                return Err(ForecastError::PreparationOrder {
                    step: "GenerateAverages".to_string(),
                    missing: format!("周 {} 的派生指标", week.week_number),
                })
            }
        }
    }

    let contact_rate = average_cells(metrics.iter().map(|m| &m.contact_rate), ignore_zeroes);
    let attempt_distribution =
        average_cells(metrics.iter().map(|m| &m.attempt_distribution), ignore_zeroes);

    let computer = ForecastComputer::new();
    let pooled = computer.pool_weeks(&group.historical_weeks);
    let average_handle_time = computer
        .weighted_averages(&pooled.t_handle, &pooled.n_handled)
        .interval_averages;

    group.averages = Some(ForecastAverages {
        contact_rate,
        attempt_distribution,
        average_handle_time,
    });
    Ok(())
}

fn apply_contacts(group: &mut PlanningGroupForecast) -> ForecastResult<()> {
    let averages = group
        .averages
        .as_ref()
        .ok_or_else(|| ForecastError::PreparationOrder {
            step: "ApplyContacts".to_string(),
            missing: "跨周平均值".to_string(),
        })?;

    let num_contacts = group.metadata.num_contacts;
    let n_contacts = averages
        .attempt_distribution
        .zip_with(&averages.contact_rate, |distribution, rate| {
            num_contacts * distribution * rate
        });
    let t_handle = n_contacts.zip_with(&averages.average_handle_time, |contacts, aht| contacts * aht);

    group.forecast_data = Some(ForecastData {
        n_handled: n_contacts.clone(),
        n_contacts,
        t_handle,
    });
    Ok(())
}

/// 逐单元格平均
fn average_cells<'a, I>(matrices: I, ignore_zeroes: bool) -> WeekMatrix
where
    I: Iterator<Item = &'a WeekMatrix>,
{
    let mut sums = WeekMatrix::zeros();
    let mut counts = WeekMatrix::zeros();
    for matrix in matrices {
        for day in 0..DAYS_PER_WEEK {
            for interval in 0..INTERVALS_PER_DAY {
                let value = matrix.get(day, interval);
                if ignore_zeroes && value == 0.0 {
                    continue;
                }
                sums.add(day, interval, value);
                counts.add(day, interval, 1.0);
            }
        }
    }
    sums.zip_with(&counts, safe_divide)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forecast::EntityRef;

    fn group_with_two_weeks() -> PlanningGroupForecast {
        let mut pg = PlanningGroupForecast::new(EntityRef::new("PG1", "一组"), EntityRef::new("C1", "活动"), 100.0);
        {
            let w1 = &mut pg.week_mut_or_insert("2024-01").intraday_values;
            w1.n_attempted.set(1, 0, 10.0);
            w1.n_connected.set(1, 0, 5.0);
            w1.t_handle.set(1, 0, 500.0);
            w1.n_handled.set(1, 0, 5.0);
        }
        {
            let w2 = &mut pg.week_mut_or_insert("2024-02").intraday_values;
            w2.n_attempted.set(1, 0, 10.0);
            w2.n_attempted.set(2, 0, 10.0);
            w2.n_connected.set(1, 0, 10.0);
            w2.n_connected.set(2, 0, 5.0);
            w2.t_handle.set(1, 0, 1500.0);
            w2.n_handled.set(1, 0, 5.0);
        }
        pg
    }

    #[test]
    fn test_prepare_metrics() {
        let pg = PreparationStep::PrepareMetrics.apply(&group_with_two_weeks()).unwrap();
        let m1 = pg.historical_weeks[0].metrics.as_ref().unwrap();
        assert_eq!(m1.contact_rate.get(1, 0), 0.5);
        assert_eq!(m1.attempt_distribution.get(1, 0), 1.0);
        assert_eq!(m1.contact_rate.get(0, 0), 0.0);

        let m2 = pg.historical_weeks[1].metrics.as_ref().unwrap();
        assert_eq!(m2.attempt_distribution.get(1, 0), 0.5);
        assert_eq!(m2.attempt_distribution.get(2, 0), 0.5);
    }

    #[test]
    fn test_generate_averages_ignore_zeroes() {
        let pg = PreparationStep::PrepareMetrics.apply(&group_with_two_weeks()).unwrap();

        let plain = PreparationStep::GenerateAverages { ignore_zeroes: false }.apply(&pg).unwrap();
        let avg = plain.averages.as_ref().unwrap();
        assert_eq!(avg.contact_rate.get(1, 0), 0.75);
        assert_eq!(avg.contact_rate.get(2, 0), 0.25);
        // 处理时长按总量加权: 2000 / 10
        assert_eq!(avg.average_handle_time.get(1, 0), 200.0);

        let skipping = PreparationStep::GenerateAverages { ignore_zeroes: true }.apply(&pg).unwrap();
        assert_eq!(skipping.averages.as_ref().unwrap().contact_rate.get(2, 0), 0.5);
    }

    #[test]
    fn test_apply_contacts_requires_averages() {
        let err = PreparationStep::ApplyContacts.apply(&group_with_two_weeks()).unwrap_err();
        assert!(matches!(err, ForecastError::PreparationOrder { .. }));
    }

    #[tokio::test]
    async fn test_prepare_group_full_pipeline() {
        let pg = prepare_group(group_with_two_weeks(), &PreparationStep::pipeline(false)).await;
        let data = pg.forecast_data.as_ref().unwrap();

        // 100 × 分布 0.75 × 接通率 0.75
        assert!((data.n_contacts.get(1, 0) - 56.25).abs() < 1e-9);
        assert_eq!(data.n_handled, data.n_contacts);
        assert!((data.t_handle.get(1, 0) - 56.25 * 200.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_failed_step_keeps_group_unchanged() {
        let steps = [PreparationStep::ApplyContacts];
        let before = group_with_two_weeks();
        let after = prepare_group(before.clone(), &steps).await;
        assert_eq!(before, after);
    }
}
