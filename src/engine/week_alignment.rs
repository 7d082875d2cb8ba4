// ==========================================
// 外呼预测生成系统 - 周对齐工具
// ==========================================
// 职责: ISO 周编号、日/区间序号计算、业务单元周起始日旋转
// 约定: 日序号按周日=0 编排；区间序号 = floor(分钟数 / 15)
// 红线: 纯函数，不读取任何全局状态
// ==========================================

use crate::domain::types::{DAYS_PER_WEEK, INTERVALS_PER_DAY, INTERVAL_MINUTES};
use crate::engine::error::{ForecastError, ForecastResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};

/// 周日起始的星期名称
pub const DAY_NAMES: [&str; DAYS_PER_WEEK] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// ISO-8601 周编号，格式 "YYYY-WW"
///
/// 年份取 ISO 周所属年份（12 月底/1 月初可能与日历年不同）
pub fn iso_week_number(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-{:02}", iso.year(), iso.week())
}

/// 日序号（周日=0 … 周六=6）
pub fn day_index(timestamp: &NaiveDateTime) -> usize {
    timestamp.weekday().num_days_from_sunday() as usize
}

/// 区间序号（0-95）
pub fn interval_index(timestamp: &NaiveDateTime) -> usize {
    let minutes = timestamp.hour() * 60 + timestamp.minute();
    (minutes / INTERVAL_MINUTES) as usize
}

/// 解析 ISO 区间字符串 "start/end" 的起始时刻
///
/// 带时区偏移的时间戳按其自身的本地时刻（墙上时间）落桶
pub fn parse_interval_start(interval: &str) -> ForecastResult<NaiveDateTime> {
    let start = interval.split('/').next().unwrap_or_default().trim();
    if start.is_empty() {
        return Err(ForecastError::IntervalParse {
            value: interval.to_string(),
            message: "缺少起始时间".to_string(),
        });
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(start) {
        return Ok(parsed.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(start, format) {
            return Ok(parsed);
        }
    }

    Err(ForecastError::IntervalParse {
        value: interval.to_string(),
        message: "无法识别的时间格式".to_string(),
    })
}

/// 解析星期名称（"Monday"、"mon" 等，大小写不敏感）
pub fn parse_weekday_name(name: &str) -> ForecastResult<Weekday> {
    name.trim()
        .parse::<Weekday>()
        .map_err(|_| ForecastError::InvalidWeekday(name.to_string()))
}

/// 将按周日起始的日数组旋转为以业务单元周起始日开头
pub fn rotate_to_start_of_week<T: Clone>(days: &[T], start_day: Weekday) -> Vec<T> {
    if days.is_empty() {
        return Vec::new();
    }
    let rotate_by = start_day.num_days_from_sunday() as usize % days.len();
    let mut rotated = Vec::with_capacity(days.len());
    rotated.extend_from_slice(&days[rotate_by..]);
    rotated.extend_from_slice(&days[..rotate_by]);
    rotated
}

/// 按业务单元周起始日排列的星期名称
pub fn day_labels(start_day: Weekday) -> Vec<String> {
    rotate_to_start_of_week(&DAY_NAMES, start_day)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// 96 个区间的 "HH:MM" 标签
pub fn interval_labels() -> Vec<String> {
    (0..INTERVALS_PER_DAY)
        .map(|i| {
            let minutes = i as u32 * INTERVAL_MINUTES;
            format!("{:02}:{:02}", minutes / 60, minutes % 60)
        })
        .collect()
}

/// 构造历史查询区间
///
/// 每个历史周一个区间（7 天），最早的在前，最后一个区间止于 `week_start`
pub fn build_query_intervals(week_start: NaiveDate, historical_weeks: u32) -> Vec<String> {
    (1..=historical_weeks as i64)
        .rev()
        .map(|weeks_back| {
            let start = week_start - Duration::weeks(weeks_back);
            let end = start + Duration::weeks(1);
            format!(
                "{}T00:00:00/{}T00:00:00",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            )
        })
        .collect()
}
