// ==========================================
// 外呼预测生成系统 - 命令行入口
// ==========================================
// 用法: outbound-forecast <规划组.json> <查询结果.json> [配置.json] [输出.json]
// 离线模式: 查询结果来自文件，生成预测后输出 JSON
// ==========================================

use anyhow::{bail, Context, Result};
use outbound_forecast::app::{get_default_config_path, AppState, LoggingEventSink};
use outbound_forecast::config::ConfigManager;
use outbound_forecast::domain::{PlanningGroupForecast, QueryResultGroup};
use outbound_forecast::engine::{OptionalEventSink, StaticQueryExecutor};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // OUTBOUND_FORECAST_LOG_FORMAT=json 时输出 JSON 日志
    match std::env::var("OUTBOUND_FORECAST_LOG_FORMAT").as_deref() {
        Ok("json") => outbound_forecast::logging::init_json(),
        _ => outbound_forecast::logging::init(),
    }

    tracing::info!("==================================================");
    tracing::info!("{}", outbound_forecast::APP_NAME);
    tracing::info!("系统版本: {}", outbound_forecast::VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let (Some(groups_path), Some(results_path)) = (args.next(), args.next()) else {
        bail!("用法: outbound-forecast <规划组.json> <查询结果.json> [配置.json] [输出.json]");
    };
    let config_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(get_default_config_path);
    let output_path = args.next().map(PathBuf::from);

    let config = ConfigManager::load_from_file(&config_path)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("配置加载失败: {}", config_path.display()))?;

    let groups: Vec<PlanningGroupForecast> = read_json(&groups_path)?;
    let results: Vec<QueryResultGroup> = read_json(&results_path)?;
    tracing::info!(planning_groups = groups.len(), query_groups = results.len(), "输入已加载");

    let sink = OptionalEventSink::with_sink(Arc::new(LoggingEventSink));
    let mut state = AppState::new(
        Arc::new(config),
        Arc::new(StaticQueryExecutor::new(results)),
        sink,
    );

    let summary = state.generate(groups).await?;
    tracing::info!(
        forecast_groups = summary.forecast_groups,
        without_data = ?summary.groups_without_data,
        unknown_campaigns = ?summary.unknown_campaigns,
        "预测生成完成"
    );

    let output = serde_json::to_string_pretty(state.session().generated())?;
    match output_path {
        Some(path) => {
            std::fs::write(&path, output).with_context(|| format!("输出写入失败: {}", path.display()))?;
            tracing::info!("预测已写入: {}", path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("文件读取失败: {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("JSON 格式错误: {}", path))
}
