// ==========================================
// 外呼预测生成系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、会话状态
// 红线: 不含计算逻辑,不含外部调用
// ==========================================

pub mod forecast;
pub mod import_job;
pub mod matrix;
pub mod modification;
pub mod query;
pub mod session;
pub mod types;

// 重导出核心类型
pub use forecast::{
    EntityRef, ForecastAverages, ForecastData, ForecastMetadata, ForecastStatus, IntradayValues,
    PlanningGroupForecast, WeekMetrics, WeekRecord, REASON_NO_HISTORICAL_DATA,
};
pub use import_job::{ImportJob, ImportOutcome, ImportStep};
pub use matrix::{MatrixShapeError, WeekMatrix};
pub use modification::{ModificationRequest, ModificationSnapshot};
pub use query::{IntervalRow, MetricStat, MetricStats, QueryGroup, QueryRequest, QueryResultGroup};
pub use session::{ForecastSession, ForecastSource};
pub use types::{
    DayScope, ForecastMode, ImportStepKind, MetricSelection, ModificationKind, StepStatus,
    DAYS_PER_WEEK, INTERVALS_PER_DAY, INTERVAL_MINUTES,
};
