// ==========================================
// 外呼预测生成系统 - 引擎层
// ==========================================
// 职责: 周对齐、区间聚合、预测计算、修改与导入
// 红线: Engine 不直接访问外部服务，协作方经 Trait 注入
// ==========================================

pub mod error;
pub mod events;
pub mod forecast_computer;
pub mod generator;
pub mod import_job;
pub mod interval_aggregator;
pub mod modification;
pub mod preparation;
pub mod week_alignment;

// 重导出核心引擎
pub use error::{ForecastError, ForecastResult};
pub use events::{ErrorReport, NoOpEventSink, OptionalEventSink, StatusEvent, StatusEventSink};
pub use forecast_computer::{ForecastComputer, ForecastTotals, HistoricalSummary, Totals, WeightedAverages};
pub use generator::{ForecastGenerator, GenerationSummary, QueryExecutor, StaticQueryExecutor};
pub use import_job::{ImportJobError, ImportJobResult, ImportJobRunner, NotificationClient, WfmImportClient};
pub use interval_aggregator::{AggregationReport, IntervalAggregator};
pub use modification::{ModificationEngine, Transform};
pub use preparation::{prepare_group, PreparationStep};
