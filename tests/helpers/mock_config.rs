// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use outbound_forecast::config::{ConfigResult, ForecastConfigReader};

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub business_unit_id: String,
    pub start_day_of_week: Weekday,
    pub week_start: NaiveDate,
    pub description: String,
    pub historical_weeks: u32,
    pub ignore_zeroes: bool,
    pub generate_inbound: bool,
    pub channel_id: String,
    pub import_topic: String,
    pub region: String,
}

impl MockConfig {
    /// 创建默认配置（周一起始，预测周 2024-01-15）
    pub fn new() -> Self {
        Self {
            business_unit_id: "bu-1".to_string(),
            start_day_of_week: Weekday::Mon,
            week_start: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description: "集成测试预测".to_string(),
            historical_weeks: 2,
            ignore_zeroes: false,
            generate_inbound: false,
            channel_id: "channel-1".to_string(),
            import_topic: "shorttermforecasts.import".to_string(),
            region: "mypurecloud.com".to_string(),
        }
    }

    pub fn with_start_day(mut self, day: Weekday) -> Self {
        self.start_day_of_week = day;
        self
    }

    pub fn with_generate_inbound(mut self) -> Self {
        self.generate_inbound = true;
        self
    }
}

#[async_trait]
impl ForecastConfigReader for MockConfig {
    async fn get_business_unit_id(&self) -> ConfigResult<String> {
        Ok(self.business_unit_id.clone())
    }

    async fn get_start_day_of_week(&self) -> ConfigResult<Weekday> {
        Ok(self.start_day_of_week)
    }

    async fn get_week_start(&self) -> ConfigResult<NaiveDate> {
        Ok(self.week_start)
    }

    async fn get_description(&self) -> ConfigResult<String> {
        Ok(self.description.clone())
    }

    async fn get_historical_weeks(&self) -> ConfigResult<u32> {
        Ok(self.historical_weeks)
    }

    async fn get_ignore_zeroes(&self) -> ConfigResult<bool> {
        Ok(self.ignore_zeroes)
    }

    async fn get_generate_inbound(&self) -> ConfigResult<bool> {
        Ok(self.generate_inbound)
    }

    async fn get_channel_id(&self) -> ConfigResult<String> {
        Ok(self.channel_id.clone())
    }

    async fn get_import_topic(&self) -> ConfigResult<String> {
        Ok(self.import_topic.clone())
    }

    async fn get_region(&self) -> ConfigResult<String> {
        Ok(self.region.clone())
    }
}
