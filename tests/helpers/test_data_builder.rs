// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use outbound_forecast::config::{config_keys, ConfigManager};
use outbound_forecast::domain::forecast::{EntityRef, ForecastData, PlanningGroupForecast};
use outbound_forecast::domain::matrix::WeekMatrix;
use outbound_forecast::domain::query::{IntervalRow, MetricStat, MetricStats};
use outbound_forecast::domain::session::ForecastSession;
use outbound_forecast::domain::types::ForecastMode;

/// 外呼规划组（尚无历史数据）
pub fn planning_group(id: &str, campaign_id: &str, num_contacts: f64) -> PlanningGroupForecast {
    PlanningGroupForecast::new(
        EntityRef::new(id, format!("{}-名称", id)),
        EntityRef::new(campaign_id, format!("{}-活动", campaign_id)),
        num_contacts,
    )
}

/// 呼入模式规划组
pub fn inbound_group(id: &str, campaign_id: &str) -> PlanningGroupForecast {
    planning_group(id, campaign_id, 0.0).with_mode(ForecastMode::Inbound)
}

// ==========================================
// IntervalRow 构建器
// ==========================================

pub struct RowBuilder {
    interval: String,
    metrics: Vec<MetricStat>,
}

impl RowBuilder {
    /// `start` 形如 "2024-01-01T09:00:00"
    pub fn at(start: &str) -> Self {
        Self {
            interval: format!("{}/{}", start, start),
            metrics: Vec::new(),
        }
    }

    pub fn metric(mut self, name: &str, count: f64, sum: f64) -> Self {
        self.metrics.push(MetricStat {
            metric: name.to_string(),
            stats: MetricStats { count, sum },
        });
        self
    }

    pub fn build(self) -> IntervalRow {
        IntervalRow {
            interval: self.interval,
            metrics: self.metrics,
        }
    }
}

// ==========================================
// 预测数据
// ==========================================

/// 带预测数据的规划组：每天 09:00-09:45 四个区间有量
pub fn forecast_group(id: &str) -> PlanningGroupForecast {
    let n_contacts = WeekMatrix::from_fn(|day, interval| match interval {
        36..=39 => (day + 1) as f64 * (interval - 35) as f64,
        _ => 0.0,
    });
    let t_handle = n_contacts.map(|v| v * 120.0);

    let mut group = planning_group(id, &format!("C-{}", id), 100.0);
    group.forecast_data = Some(ForecastData {
        n_handled: n_contacts.clone(),
        n_contacts,
        t_handle,
    });
    group
}

pub fn session_with(groups: Vec<PlanningGroupForecast>) -> ForecastSession {
    let mut session = ForecastSession::new();
    session.install_generated(groups);
    session
}

/// 已填写必填项的配置管理器
pub fn config_manager() -> ConfigManager {
    let manager = ConfigManager::new();
    let entries = [
        (config_keys::BUSINESS_UNIT_ID, "bu-1"),
        (config_keys::WEEK_START, "2024-01-15"),
        (config_keys::START_DAY_OF_WEEK, "Monday"),
        (config_keys::HISTORICAL_WEEKS, "2"),
        (config_keys::DESCRIPTION, "集成测试预测"),
        (config_keys::CHANNEL_ID, "channel-1"),
    ];
    for (key, value) in entries {
        manager.set_config_value(key, value).unwrap();
    }
    manager
}
