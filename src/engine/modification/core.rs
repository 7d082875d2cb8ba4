// ==========================================
// 外呼预测生成系统 - 预测修改引擎
// ==========================================
// 职责: 对选中规划组的单日或全周应用变换/重置，并写回修改预测
// 输入: 会话状态 + 修改请求（规划组、日期范围、指标、操作）
// 输出: 修改后的快照
// 红线: 生成预测（基准）只读；失败时会话状态保持不变
// 红线: 总量守恒只作用于 offered（nContacts），不作用于处理时长
// ==========================================

use crate::domain::forecast::ForecastData;
use crate::domain::matrix::WeekMatrix;
use crate::domain::modification::{ModificationRequest, ModificationSnapshot};
use crate::domain::session::{ForecastSession, ForecastSource};
use crate::domain::types::{DayScope, MetricSelection, DAYS_PER_WEEK};
use crate::engine::error::{ForecastError, ForecastResult};
use crate::engine::forecast_computer::ForecastComputer;
use tracing::{debug, info, instrument};

use super::transforms::{maintain_original_sum, scale_by_day, Transform};

// ==========================================
// ModificationEngine - 预测修改引擎
// ==========================================
pub struct ModificationEngine {
    computer: ForecastComputer,
}

impl ModificationEngine {
    pub fn new() -> Self {
        Self {
            computer: ForecastComputer::new(),
        }
    }

    // ==========================================
    // 会话入口
    // ==========================================

    /// 读取规划组快照
    pub fn snapshot(
        &self,
        session: &ForecastSession,
        source: ForecastSource,
        planning_group_id: &str,
        day: DayScope,
    ) -> ForecastResult<ModificationSnapshot> {
        if let DayScope::Day(d) = day {
            check_day(d)?;
        }
        let group = session
            .find(source, planning_group_id)
            .ok_or_else(|| ForecastError::PlanningGroupNotFound(planning_group_id.to_string()))?;
        let values = group
            .forecast_data
            .clone()
            .ok_or_else(|| ForecastError::ForecastMissing(planning_group_id.to_string()))?;

        Ok(ModificationSnapshot {
            selected_planning_group_id: planning_group_id.to_string(),
            selected_day: day,
            values,
        })
    }

    /// 应用修改并写回修改预测
    #[instrument(skip(self, session), fields(
        planning_group = %request.planning_group_id,
        day = %request.day,
        metric = %request.metric,
        kind = %request.kind,
    ))]
    pub fn apply(
        &self,
        session: &mut ForecastSession,
        request: &ModificationRequest,
    ) -> ForecastResult<ModificationSnapshot> {
        let current = self.snapshot(
            session,
            ForecastSource::ModifiedForecast,
            &request.planning_group_id,
            request.day,
        )?;

        let updated = match Transform::from_kind(request.kind) {
            Some(transform) => self.modify(&current.values, request.day, request.metric, transform)?,
            None => {
                let base = self.snapshot(
                    session,
                    ForecastSource::GeneratedForecast,
                    &request.planning_group_id,
                    request.day,
                )?;
                self.reset(&current.values, &base.values, request.day, request.metric)?
            }
        };

        // 全部计算成功后才写回
        let group = session
            .find_modified_mut(&request.planning_group_id)
            .ok_or_else(|| ForecastError::PlanningGroupNotFound(request.planning_group_id.clone()))?;
        group.forecast_data = Some(updated.clone());

        info!("修改已应用");
        Ok(ModificationSnapshot {
            selected_planning_group_id: request.planning_group_id.clone(),
            selected_day: request.day,
            values: updated,
        })
    }

    // ==========================================
    // 纯计算
    // ==========================================

    /// 对预测数据应用变换，返回新数据
    pub fn modify(
        &self,
        data: &ForecastData,
        day: DayScope,
        metric: MetricSelection,
        transform: Transform,
    ) -> ForecastResult<ForecastData> {
        let mut result = data.clone();

        match day {
            DayScope::All => {
                if metric.includes_offered() {
                    let totals = self.computer.totals(&data.n_contacts);
                    let modified = transform.apply(&totals.daily_totals)?;
                    let preserved = maintain_original_sum(&modified, totals.weekly_total);
                    result.n_contacts = scale_by_day(&data.n_contacts, &preserved)?;
                }
                if metric.includes_handle_time() {
                    result.n_handled = self.modify_weekly_unpreserved(&data.n_handled, transform)?;
                    result.t_handle = self.modify_weekly_unpreserved(&data.t_handle, transform)?;
                }
            }
            DayScope::Day(d) => {
                let d = check_day(d)?;
                if metric.includes_offered() {
                    let original = data.n_contacts.day(d);
                    let original_total: f64 = original.iter().sum();
                    let modified = transform.apply(original)?;
                    result
                        .n_contacts
                        .set_day(d, maintain_original_sum(&modified, original_total))?;
                }
                if metric.includes_handle_time() {
                    result.n_handled.set_day(d, transform.apply(data.n_handled.day(d))?)?;
                    result.t_handle.set_day(d, transform.apply(data.t_handle.day(d))?)?;
                }
            }
        }

        debug!(
            before = self.computer.totals(&data.n_contacts).weekly_total,
            after = self.computer.totals(&result.n_contacts).weekly_total,
            "offered 周总量"
        );
        Ok(result)
    }

    /// 从生成预测恢复选定范围与指标
    ///
    /// 单日重置只改动选中的那一天，其余天的修改保留
    pub fn reset(
        &self,
        current: &ForecastData,
        base: &ForecastData,
        day: DayScope,
        metric: MetricSelection,
    ) -> ForecastResult<ForecastData> {
        let mut result = current.clone();

        match day {
            DayScope::All => {
                if metric.includes_offered() {
                    result.n_contacts = base.n_contacts.clone();
                }
                if metric.includes_handle_time() {
                    result.n_handled = base.n_handled.clone();
                    result.t_handle = base.t_handle.clone();
                }
            }
            DayScope::Day(d) => {
                let d = check_day(d)?;
                if metric.includes_offered() {
                    result.n_contacts.set_day(d, base.n_contacts.day(d).to_vec())?;
                }
                if metric.includes_handle_time() {
                    result.n_handled.set_day(d, base.n_handled.day(d).to_vec())?;
                    result.t_handle.set_day(d, base.t_handle.day(d).to_vec())?;
                }
            }
        }
        Ok(result)
    }

    /// 全周模式下处理时长矩阵的变换（不做总量守恒）
    fn modify_weekly_unpreserved(&self, matrix: &WeekMatrix, transform: Transform) -> ForecastResult<WeekMatrix> {
        let totals = self.computer.totals(matrix);
        let modified = transform.apply(&totals.daily_totals)?;
        scale_by_day(matrix, &modified)
    }
}

impl Default for ModificationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 校验单日序号（0-6）
fn check_day(day: u8) -> ForecastResult<usize> {
    let index = day as usize;
    if index < DAYS_PER_WEEK {
        Ok(index)
    } else {
        Err(ForecastError::InvalidDay(index))
    }
}
