// ==========================================
// 外呼预测生成系统 - 预测配置读取 Trait
// ==========================================
// 职责: 定义引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use std::error::Error;

/// 配置读取结果
pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ForecastConfigReader Trait
// ==========================================
// 实现者: ConfigManager（内存键值存储）
#[async_trait]
pub trait ForecastConfigReader: Send + Sync {
    // ===== 业务单元 =====

    /// 业务单元 ID（必填）
    async fn get_business_unit_id(&self) -> ConfigResult<String>;

    /// 业务单元周起始日
    ///
    /// # 默认值
    /// - Monday
    async fn get_start_day_of_week(&self) -> ConfigResult<Weekday>;

    // ===== 预测参数 =====

    /// 预测周起始日期（必填，格式 YYYY-MM-DD）
    async fn get_week_start(&self) -> ConfigResult<NaiveDate>;

    /// 预测描述
    ///
    /// # 默认值
    /// - 空字符串
    async fn get_description(&self) -> ConfigResult<String>;

    /// 参与计算的历史周数
    ///
    /// # 默认值
    /// - 6
    async fn get_historical_weeks(&self) -> ConfigResult<u32>;

    // ===== 预测选项 =====

    /// 跨周平均时是否忽略 0 值
    ///
    /// # 默认值
    /// - false
    async fn get_ignore_zeroes(&self) -> ConfigResult<bool>;

    /// 是否为呼入模式规划组生成预测
    ///
    /// # 默认值
    /// - false
    async fn get_generate_inbound(&self) -> ConfigResult<bool>;

    // ===== 通知与导入 =====

    /// 通知通道 ID
    async fn get_channel_id(&self) -> ConfigResult<String>;

    /// 导入通知主题
    ///
    /// # 默认值
    /// - shorttermforecasts.import
    async fn get_import_topic(&self) -> ConfigResult<String>;

    /// 平台区域（用于拼接预测链接）
    ///
    /// # 默认值
    /// - mypurecloud.com
    async fn get_region(&self) -> ConfigResult<String>;
}
