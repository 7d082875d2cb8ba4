//! 修改引擎的性质测试
//!
//! 随机生成含零值的日曲线与周矩阵，验证对任意输入都应成立的不变量。

mod helpers;

use helpers::test_data_builder::{planning_group, session_with};
use outbound_forecast::domain::forecast::ForecastData;
use outbound_forecast::domain::matrix::WeekMatrix;
use outbound_forecast::domain::modification::ModificationRequest;
use outbound_forecast::domain::session::{ForecastSession, ForecastSource};
use outbound_forecast::domain::types::{DayScope, MetricSelection, ModificationKind};
use outbound_forecast::engine::modification::{extract_subrange, maintain_original_sum, Transform};
use outbound_forecast::engine::{ForecastError, ModificationEngine};
use proptest::prelude::*;

/// 单日 96 区间，约一半为 0
fn day_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(prop_oneof![Just(0.0), 1.0..1000.0_f64], 96)
}

fn week_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(day_strategy(), 7)
}

fn transform_strategy() -> impl Strategy<Value = Transform> {
    prop_oneof![
        Just(Transform::Smooth),
        Just(Transform::Trendline),
        Just(Transform::Flatten),
        (0.0..0.5_f64).prop_map(|percent| Transform::Clip { percent }),
        Just(Transform::Normalize),
    ]
}

/// 全部变换操作（用于总量守恒）
fn kind_strategy() -> impl Strategy<Value = ModificationKind> {
    prop_oneof![
        Just(ModificationKind::Smooth),
        Just(ModificationKind::Trendline),
        Just(ModificationKind::Flatten),
        (0.0..0.5_f64).prop_map(|percent| ModificationKind::Clip { percent }),
        Just(ModificationKind::Normalize),
    ]
}

fn relative_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * b.abs().max(1.0)
}

fn session_from(rows: Vec<Vec<f64>>) -> ForecastSession {
    let n_contacts = WeekMatrix::from_rows(rows).unwrap();
    let mut group = planning_group("PG1", "C1", 100.0);
    group.forecast_data = Some(ForecastData {
        n_handled: n_contacts.clone(),
        t_handle: n_contacts.map(|v| v * 90.0),
        n_contacts,
    });
    session_with(vec![group])
}

fn modified_data(session: &ForecastSession) -> ForecastData {
    session
        .find(ForecastSource::ModifiedForecast, "PG1")
        .and_then(|pg| pg.forecast_data.clone())
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_transform_keeps_length_and_zero_positions(
        data in day_strategy(),
        transform in transform_strategy(),
    ) {
        match transform.apply(&data) {
            Ok(result) => {
                prop_assert_eq!(result.len(), data.len());
                for (before, after) in data.iter().zip(&result) {
                    if *before == 0.0 {
                        prop_assert_eq!(*after, 0.0);
                    }
                }
            }
            Err(e) => {
                prop_assert!(matches!(e, ForecastError::EmptyWindow));
                prop_assert!(extract_subrange(&data).is_none());
            }
        }
    }

    #[test]
    fn prop_smooth_and_clip_stay_within_window_range(data in day_strategy(), percent in 0.0..0.5_f64) {
        let non_zero: Vec<f64> = data.iter().copied().filter(|v| *v != 0.0).collect();
        prop_assume!(!non_zero.is_empty());
        let max = non_zero.iter().copied().fold(f64::MIN, f64::max);
        let min = non_zero.iter().copied().fold(f64::MAX, f64::min);

        let smoothed = Transform::Smooth.apply(&data).unwrap();
        prop_assert!(smoothed.iter().all(|v| *v >= 0.0 && *v <= max + 1e-9));

        let clipped = Transform::Clip { percent }.apply(&data).unwrap();
        for (before, after) in data.iter().zip(&clipped) {
            if *before != 0.0 {
                prop_assert!(*after >= min - 1e-9 && *after <= max + 1e-9);
            }
        }
    }

    #[test]
    fn prop_maintain_original_sum(values in prop::collection::vec(0.1..500.0_f64, 1..96), target in 1.0..10_000.0_f64) {
        let scaled = maintain_original_sum(&values, target);
        prop_assert!(relative_eq(scaled.iter().sum(), target));
    }

    #[test]
    fn prop_offered_day_modification_preserves_totals(
        rows in week_strategy(),
        day in 0u8..7,
        kind in kind_strategy(),
    ) {
        let mut session = session_from(rows);
        let before = modified_data(&session);
        let request = ModificationRequest::new("PG1", DayScope::Day(day), MetricSelection::Offered, kind);

        let result = ModificationEngine::new().apply(&mut session, &request);
        let after = modified_data(&session);

        let d = day as usize;
        let before_day: f64 = before.n_contacts.day(d).iter().sum();
        if before_day == 0.0 {
            prop_assert!(result.is_err());
            prop_assert_eq!(&after, &before);
        } else {
            prop_assert!(result.is_ok());
            prop_assert!(relative_eq(after.n_contacts.day(d).iter().sum(), before_day));
            prop_assert!(relative_eq(after.n_contacts.sum(), before.n_contacts.sum()));
            prop_assert_eq!(&after.t_handle, &before.t_handle);
        }
        prop_assert_eq!(
            session.find(ForecastSource::GeneratedForecast, "PG1").and_then(|pg| pg.forecast_data.as_ref()),
            Some(&before)
        );
    }

    #[test]
    fn prop_weekly_modification_then_reset_restores_generated(
        rows in week_strategy(),
        kind in kind_strategy(),
    ) {
        let mut session = session_from(rows);
        let engine = ModificationEngine::new();
        let week_total = modified_data(&session).n_contacts.sum();

        if engine
            .apply(&mut session, &ModificationRequest::new("PG1", DayScope::All, MetricSelection::Offered, kind))
            .is_ok()
        {
            prop_assert!(relative_eq(modified_data(&session).n_contacts.sum(), week_total));
        }

        engine
            .apply(
                &mut session,
                &ModificationRequest::new("PG1", DayScope::All, MetricSelection::Both, ModificationKind::Reset),
            )
            .unwrap();
        prop_assert_eq!(
            session.find(ForecastSource::ModifiedForecast, "PG1"),
            session.find(ForecastSource::GeneratedForecast, "PG1")
        );
    }
}
