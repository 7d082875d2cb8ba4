// ==========================================
// 外呼预测生成系统 - 导入文件
// ==========================================
// 职责: 将修改预测转换为平台导入格式并 gzip 压缩
// 格式: 按业务单元周起始日轮转 7 天，再追加新的第 0 天 → 8 × 96 = 768 个区间
// ==========================================

use super::error::ImportJobResult;
use crate::domain::forecast::PlanningGroupForecast;
use crate::domain::matrix::WeekMatrix;
use crate::engine::forecast_computer::ForecastComputer;
use crate::engine::week_alignment::rotate_to_start_of_week;
use chrono::Weekday;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{debug, info, warn};

/// 每次导入的周数
pub const IMPORT_WEEK_COUNT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningGroupPayload {
    pub planning_group_id: String,
    pub offered_per_interval: Vec<f64>,
    pub average_handle_time_seconds_per_interval: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBody {
    pub description: String,
    pub week_count: u32,
    pub planning_groups: Vec<PlanningGroupPayload>,
}

/// 已压缩的导入文件
#[derive(Debug, Clone)]
pub struct PreparedPayload {
    pub body: ImportBody,
    pub gzip: Vec<u8>,
    /// 压缩后的字节数
    pub content_length: usize,
}

// ==========================================
// PayloadBuilder - 导入文件构建器
// ==========================================
pub struct PayloadBuilder {
    computer: ForecastComputer,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self {
            computer: ForecastComputer::new(),
        }
    }

    /// 构建导入请求体；没有预测数据的规划组被跳过
    pub fn build_body(
        &self,
        groups: &[PlanningGroupForecast],
        start_day: Weekday,
        description: &str,
    ) -> ImportBody {
        let mut planning_groups = Vec::with_capacity(groups.len());
        for group in groups {
            let Some(data) = &group.forecast_data else {
                warn!(planning_group = %group.name(), "规划组没有预测数据，跳过");
                continue;
            };
            debug!(planning_group = %group.name(), "处理规划组预测数据");

            let aht = self
                .computer
                .weighted_averages(&data.t_handle, &data.n_handled)
                .interval_averages;
            planning_groups.push(PlanningGroupPayload {
                planning_group_id: group.id().to_string(),
                offered_per_interval: flatten_week(&data.n_contacts, start_day),
                average_handle_time_seconds_per_interval: flatten_week(&aht, start_day),
            });
        }

        ImportBody {
            description: description.to_string(),
            week_count: IMPORT_WEEK_COUNT,
            planning_groups,
        }
    }

    /// 构建并压缩导入文件
    pub fn prepare(
        &self,
        groups: &[PlanningGroupForecast],
        start_day: Weekday,
        description: &str,
    ) -> ImportJobResult<PreparedPayload> {
        let body = self.build_body(groups, start_day, description);
        let json = serde_json::to_vec(&body)?;
        let gzip = gzip_encode(&json)?;
        let content_length = gzip.len();
        info!(
            planning_groups = body.planning_groups.len(),
            content_length, "导入文件已压缩"
        );
        Ok(PreparedPayload {
            body,
            gzip,
            content_length,
        })
    }
}

impl Default for PayloadBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 轮转到周起始日，追加首日闭合一周，展平并保留两位小数
pub fn flatten_week(matrix: &WeekMatrix, start_day: Weekday) -> Vec<f64> {
    let mut days = rotate_to_start_of_week(matrix.rows(), start_day);
    if let Some(first) = days.first().cloned() {
        days.push(first);
    }
    days.into_iter().flatten().map(round_to_two).collect()
}

pub fn round_to_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn gzip_encode(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}
