// ==========================================
// 外呼预测生成系统 - 规划组预测领域模型
// ==========================================
// 职责: 规划组身份、历史周记录、预测数据与元数据
// 红线: 同一规划组内每个 week_number 至多一条 WeekRecord
// ==========================================

use crate::domain::matrix::WeekMatrix;
use crate::domain::types::ForecastMode;
use serde::{Deserialize, Serialize};

/// 无历史数据时的状态原因
pub const REASON_NO_HISTORICAL_DATA: &str = "无历史数据";

// ==========================================
// EntityRef - 外部实体引用（规划组/活动/队列）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// ==========================================
// IntradayValues - 单周四个并行矩阵
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntradayValues {
    pub n_attempted: WeekMatrix,   // 尝试外呼次数
    pub n_connected: WeekMatrix,   // 接通次数
    pub t_handle: WeekMatrix,      // 累计处理时长（秒）
    pub n_handled: WeekMatrix,     // 处理量
}

// ==========================================
// WeekMetrics - 单周派生指标（PrepareMetrics 输出）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekMetrics {
    /// 接通率 = nConnected / nAttempted
    pub contact_rate: WeekMatrix,
    /// 外呼分布 = nAttempted / 周 nAttempted 总量
    pub attempt_distribution: WeekMatrix,
}

// ==========================================
// WeekRecord - 历史周记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRecord {
    /// ISO-8601 周，格式 "YYYY-WW"
    pub week_number: String,
    pub intraday_values: IntradayValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<WeekMetrics>,
}

impl WeekRecord {
    pub fn new(week_number: impl Into<String>) -> Self {
        Self {
            week_number: week_number.into(),
            intraday_values: IntradayValues::default(),
            metrics: None,
        }
    }
}

// ==========================================
// ForecastData - 预测矩阵
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastData {
    pub n_contacts: WeekMatrix,
    pub n_handled: WeekMatrix,
    pub t_handle: WeekMatrix,
}

// ==========================================
// ForecastAverages - 跨周平均（GenerateAverages 输出）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastAverages {
    pub contact_rate: WeekMatrix,
    pub attempt_distribution: WeekMatrix,
    /// 加权平均处理时长 Σ tHandle / Σ nHandled
    pub average_handle_time: WeekMatrix,
}

// ==========================================
// ForecastStatus - 预测状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastStatus {
    pub is_forecast: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ForecastStatus {
    pub fn ready() -> Self {
        Self {
            is_forecast: true,
            reason: None,
        }
    }

    pub fn not_forecast(reason: impl Into<String>) -> Self {
        Self {
            is_forecast: false,
            reason: Some(reason.into()),
        }
    }
}

impl Default for ForecastStatus {
    fn default() -> Self {
        Self::ready()
    }
}

// ==========================================
// ForecastMetadata - 元数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastMetadata {
    /// 预测周计划外呼联系人数量
    pub num_contacts: f64,
    #[serde(default)]
    pub forecast_mode: ForecastMode,
    #[serde(default)]
    pub forecast_status: ForecastStatus,
}

// ==========================================
// PlanningGroupForecast - 规划组预测
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningGroupForecast {
    pub planning_group: EntityRef,
    pub campaign: EntityRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<EntityRef>,
    #[serde(default)]
    pub historical_weeks: Vec<WeekRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub averages: Option<ForecastAverages>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_data: Option<ForecastData>,
    pub metadata: ForecastMetadata,
}

impl PlanningGroupForecast {
    /// 创建外呼规划组（尚无历史数据）
    pub fn new(planning_group: EntityRef, campaign: EntityRef, num_contacts: f64) -> Self {
        Self {
            planning_group,
            campaign,
            queue: None,
            historical_weeks: Vec::new(),
            averages: None,
            forecast_data: None,
            metadata: ForecastMetadata {
                num_contacts,
                forecast_mode: ForecastMode::Outbound,
                forecast_status: ForecastStatus::ready(),
            },
        }
    }

    pub fn with_queue(mut self, queue: EntityRef) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn with_mode(mut self, mode: ForecastMode) -> Self {
        self.metadata.forecast_mode = mode;
        self
    }

    pub fn id(&self) -> &str {
        &self.planning_group.id
    }

    pub fn name(&self) -> &str {
        &self.planning_group.name
    }

    pub fn is_inbound(&self) -> bool {
        self.metadata.forecast_mode == ForecastMode::Inbound
    }

    /// 查找或追加周记录（去重插入）
    pub fn week_mut_or_insert(&mut self, week_number: &str) -> &mut WeekRecord {
        let position = self
            .historical_weeks
            .iter()
            .position(|w| w.week_number == week_number);

        let index = match position {
            Some(index) => index,
            None => {
                self.historical_weeks.push(WeekRecord::new(week_number));
                self.historical_weeks.len() - 1
            }
        };
        &mut self.historical_weeks[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> PlanningGroupForecast {
        PlanningGroupForecast::new(EntityRef::new("PG1", "销售一组"), EntityRef::new("C1", "活动一"), 1000.0)
    }

    #[test]
    fn test_week_insert_is_deduplicated() {
        let mut pg = group();
        pg.week_mut_or_insert("2024-01").intraday_values.n_attempted.add(1, 0, 5.0);
        pg.week_mut_or_insert("2024-02");
        pg.week_mut_or_insert("2024-01").intraday_values.n_attempted.add(1, 0, 1.0);

        assert_eq!(pg.historical_weeks.len(), 2);
        assert_eq!(pg.historical_weeks[0].intraday_values.n_attempted.get(1, 0), 6.0);
    }

    #[test]
    fn test_serde_camel_case() {
        let pg = group();
        let json = serde_json::to_value(&pg).unwrap();
        assert!(json.get("planningGroup").is_some());
        assert!(json.get("historicalWeeks").is_some());
        assert_eq!(json["metadata"]["forecastStatus"]["isForecast"], true);
        assert_eq!(json["metadata"]["forecastMode"], "outbound");
    }
}
