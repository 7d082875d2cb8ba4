// ==========================================
// 外呼预测生成系统 - 领域类型定义
// ==========================================
// 职责: 定义预测矩阵维度、修改范围、指标选择、导入步骤等基础类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 矩阵维度常量
// ==========================================

/// 每周天数
pub const DAYS_PER_WEEK: usize = 7;

/// 每个区间的分钟数
pub const INTERVAL_MINUTES: u32 = 15;

/// 每天区间数（24h × 4）
pub const INTERVALS_PER_DAY: usize = 96;

/// 周视图选择器在外部平台中的哨兵值
pub const ALL_DAYS_SENTINEL: &str = "ALL";

// ==========================================
// 修改范围 (Day Scope)
// ==========================================
// ALL → 全周按天汇总；Day(d) → 单日 96 区间
// 日序号按周日=0 编排（与原始查询数据一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayScope {
    All,
    Day(u8),
}

impl DayScope {
    /// 创建单日范围（校验 0-6）
    pub fn day(index: u8) -> Option<Self> {
        if (index as usize) < DAYS_PER_WEEK {
            Some(DayScope::Day(index))
        } else {
            None
        }
    }

    /// 解析范围字符串
    ///
    /// 接受 "ALL"（大小写不敏感）、旧版下拉框的 "99"，以及 "0".."6"
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case(ALL_DAYS_SENTINEL) || trimmed == "99" {
            return Some(DayScope::All);
        }
        trimmed.parse::<u8>().ok().and_then(DayScope::day)
    }

    /// 单日范围的日序号
    pub fn day_index(&self) -> Option<usize> {
        match self {
            DayScope::All => None,
            DayScope::Day(d) => Some(*d as usize),
        }
    }
}

impl fmt::Display for DayScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayScope::All => write!(f, "{}", ALL_DAYS_SENTINEL),
            DayScope::Day(d) => write!(f, "{}", d),
        }
    }
}

impl TryFrom<String> for DayScope {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DayScope::parse(&value).ok_or_else(|| format!("无效的日期范围: {}", value))
    }
}

impl From<DayScope> for String {
    fn from(scope: DayScope) -> Self {
        scope.to_string()
    }
}

// ==========================================
// 指标选择 (Metric Selection)
// ==========================================
// 红线: 总量守恒只作用于 offered，不作用于处理时长
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricSelection {
    Offered,
    AverageHandleTime,
    Both,
}

impl MetricSelection {
    pub fn includes_offered(&self) -> bool {
        matches!(self, MetricSelection::Offered | MetricSelection::Both)
    }

    pub fn includes_handle_time(&self) -> bool {
        matches!(self, MetricSelection::AverageHandleTime | MetricSelection::Both)
    }
}

impl fmt::Display for MetricSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricSelection::Offered => write!(f, "offered"),
            MetricSelection::AverageHandleTime => write!(f, "average-handle-time"),
            MetricSelection::Both => write!(f, "both"),
        }
    }
}

// ==========================================
// 修改操作 (Modification Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModificationKind {
    Smooth,
    Trendline,
    Flatten,
    /// 动态截断（按窗口极差百分比）
    Clip { percent: f64 },
    /// IQR 削峰填谷
    Normalize,
    /// 恢复生成预测（基准）
    Reset,
}

impl fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModificationKind::Smooth => write!(f, "SMOOTH"),
            ModificationKind::Trendline => write!(f, "TRENDLINE"),
            ModificationKind::Flatten => write!(f, "FLATTEN"),
            ModificationKind::Clip { percent } => write!(f, "CLIP({})", percent),
            ModificationKind::Normalize => write!(f, "NORMALIZE"),
            ModificationKind::Reset => write!(f, "RESET"),
        }
    }
}

// ==========================================
// 预测模式 (Forecast Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMode {
    #[default]
    Outbound,
    /// 呼入模式：不参与历史数据校验
    Inbound,
}

impl fmt::Display for ForecastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastMode::Outbound => write!(f, "outbound"),
            ForecastMode::Inbound => write!(f, "inbound"),
        }
    }
}

// ==========================================
// 导入步骤 (Import Step)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStepKind {
    Subscribe,
    PrepareBody,
    GenerateUploadUrl,
    UploadFile,
    ImportForecast,
}

impl ImportStepKind {
    /// 按执行顺序排列的全部步骤
    pub const ALL: [ImportStepKind; 5] = [
        ImportStepKind::Subscribe,
        ImportStepKind::PrepareBody,
        ImportStepKind::GenerateUploadUrl,
        ImportStepKind::UploadFile,
        ImportStepKind::ImportForecast,
    ];

    /// 步骤序号（0 起）
    pub fn index(&self) -> usize {
        match self {
            ImportStepKind::Subscribe => 0,
            ImportStepKind::PrepareBody => 1,
            ImportStepKind::GenerateUploadUrl => 2,
            ImportStepKind::UploadFile => 3,
            ImportStepKind::ImportForecast => 4,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImportStepKind::Subscribe => "Subscribe",
            ImportStepKind::PrepareBody => "PrepareBody",
            ImportStepKind::GenerateUploadUrl => "GenerateUploadUrl",
            ImportStepKind::UploadFile => "UploadFile",
            ImportStepKind::ImportForecast => "ImportForecast",
        }
    }

    /// 对应的国际化键
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ImportStepKind::Subscribe => "import.step.subscribe",
            ImportStepKind::PrepareBody => "import.step.prepare_body",
            ImportStepKind::GenerateUploadUrl => "import.step.generate_upload_url",
            ImportStepKind::UploadFile => "import.step.upload_file",
            ImportStepKind::ImportForecast => "import.step.import_forecast",
        }
    }
}

impl fmt::Display for ImportStepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 步骤状态 (Step Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Pending => write!(f, "pending"),
            StepStatus::Success => write!(f, "success"),
            StepStatus::Failed => write!(f, "failed"),
        }
    }
}
