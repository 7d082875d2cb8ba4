// ==========================================
// 应用状态端到端测试：生成 → 查看 → 修改 → 重置 → 导入
// ==========================================

mod helpers;

use helpers::mock_transport::{MockNotificationClient, MockWfmClient};
use helpers::test_data_builder::{config_manager, planning_group, RowBuilder};
use outbound_forecast::app::AppState;
use outbound_forecast::domain::import_job::ImportOutcome;
use outbound_forecast::domain::modification::ModificationRequest;
use outbound_forecast::domain::query::{
    IntervalRow, QueryResultGroup, METRIC_HANDLE, METRIC_OUTBOUND_ATTEMPTED, METRIC_OUTBOUND_CONNECTED,
};
use outbound_forecast::domain::session::ForecastSource;
use outbound_forecast::domain::types::{DayScope, MetricSelection, ModificationKind};
use outbound_forecast::engine::{OptionalEventSink, StaticQueryExecutor};
use outbound_forecast::ApiError;
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn week_rows(monday: &str, tuesday: &str) -> Vec<IntervalRow> {
    vec![
        RowBuilder::at(&format!("{}T09:00:00", monday))
            .metric(METRIC_OUTBOUND_ATTEMPTED, 10.0, 0.0)
            .metric(METRIC_OUTBOUND_CONNECTED, 5.0, 0.0)
            .metric(METRIC_HANDLE, 5.0, 600_000.0)
            .build(),
        RowBuilder::at(&format!("{}T10:00:00", tuesday))
            .metric(METRIC_OUTBOUND_ATTEMPTED, 10.0, 0.0)
            .metric(METRIC_OUTBOUND_CONNECTED, 10.0, 0.0)
            .metric(METRIC_HANDLE, 10.0, 600_000.0)
            .build(),
    ]
}

/// 两个历史周；PG1 周一 09:00 预测 25 通（AHT 120 秒），周二 10:00 预测 50 通（AHT 60 秒）
fn app_state() -> AppState {
    let mut rows = week_rows("2024-01-01", "2024-01-02");
    rows.extend(week_rows("2024-01-08", "2024-01-09"));
    let executor = StaticQueryExecutor::new(vec![QueryResultGroup::for_campaign("C1", rows)]);
    AppState::new(Arc::new(config_manager()), Arc::new(executor), OptionalEventSink::none())
}

fn groups() -> Vec<outbound_forecast::PlanningGroupForecast> {
    vec![planning_group("PG1", "C1", 100.0), planning_group("PG2", "C2", 100.0)]
}

#[tokio::test]
async fn test_generate_view_modify_reset() {
    let mut state = app_state();
    let summary = state.generate(groups()).await.unwrap();
    assert_eq!(summary.forecast_groups, 1);
    assert_eq!(summary.groups_without_data, vec!["PG2-名称".to_string()]);

    let generated = state
        .view(ForecastSource::GeneratedForecast, "PG1", DayScope::All)
        .await
        .unwrap();
    assert!(approx(generated.weekly_offered, 75.0));
    assert!(approx(generated.weekly_average_handle_time, 80.0));
    assert_eq!(generated.day_labels[0], "Monday");
    assert!(approx(generated.daily_offered[0], 25.0));
    assert!(approx(generated.daily_offered[1], 50.0));
    assert!(generated.intervals.is_none());

    let day_view = state
        .view(ForecastSource::GeneratedForecast, "PG1", DayScope::Day(1))
        .await
        .unwrap();
    let intervals = day_view.intervals.unwrap();
    assert_eq!(intervals.labels[36], "09:00");
    assert!(approx(intervals.offered[36], 25.0));
    assert!(approx(intervals.average_handle_time[36], 120.0));

    // 全周拉平：两天各 37.5，周总量不变
    state
        .modify(&ModificationRequest::new(
            "PG1",
            DayScope::All,
            MetricSelection::Offered,
            ModificationKind::Flatten,
        ))
        .unwrap();
    let modified = state
        .view(ForecastSource::ModifiedForecast, "PG1", DayScope::All)
        .await
        .unwrap();
    assert!(approx(modified.weekly_offered, 75.0));
    assert!(approx(modified.daily_offered[0], 37.5));
    assert!(approx(modified.daily_offered[1], 37.5));

    let untouched = state
        .view(ForecastSource::GeneratedForecast, "PG1", DayScope::All)
        .await
        .unwrap();
    assert_eq!(untouched, generated);

    state
        .modify(&ModificationRequest::new(
            "PG1",
            DayScope::All,
            MetricSelection::Both,
            ModificationKind::Reset,
        ))
        .unwrap();
    assert_eq!(state.session().modified(), state.session().generated());
}

#[tokio::test]
async fn test_import_after_generation() {
    let mut state = app_state().with_import_clients(
        Arc::new(MockWfmClient::completing("fc-42")),
        Arc::new(MockNotificationClient::new()),
    );
    state.generate(groups()).await.unwrap();

    let (_tx, mut rx) = unbounded_channel();
    let job = state.import(&mut rx).await.unwrap();

    assert_eq!(job.outcome, ImportOutcome::Completed);
    assert_eq!(job.forecast_id.as_deref(), Some("fc-42"));
}

#[tokio::test]
async fn test_operations_before_generation_are_rejected() {
    let mut state = app_state().with_import_clients(
        Arc::new(MockWfmClient::completing("fc-1")),
        Arc::new(MockNotificationClient::new()),
    );

    let err = state
        .modify(&ModificationRequest::new(
            "PG1",
            DayScope::All,
            MetricSelection::Offered,
            ModificationKind::Smooth,
        ))
        .unwrap_err();
    assert!(matches!(err, ApiError::ForecastNotGenerated));

    let (_tx, mut rx) = unbounded_channel();
    assert!(matches!(state.import(&mut rx).await, Err(ApiError::ForecastNotGenerated)));
    assert!(matches!(state.generate(Vec::new()).await, Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn test_error_mapping_after_generation() {
    let mut state = app_state();
    state.generate(groups()).await.unwrap();

    let (_tx, mut rx) = unbounded_channel();
    assert!(matches!(state.import(&mut rx).await, Err(ApiError::NotConfigured(_))));

    let missing = state
        .view(ForecastSource::ModifiedForecast, "PG2", DayScope::All)
        .await;
    assert!(matches!(missing, Err(ApiError::NotFound(_))));

    let bad_day = state.modify(&ModificationRequest::new(
        "PG1",
        DayScope::Day(9),
        MetricSelection::Offered,
        ModificationKind::Smooth,
    ));
    assert!(matches!(bad_day, Err(ApiError::InvalidInput(_))));
    assert_eq!(state.session().modified(), state.session().generated());
}
