use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Local};
use tokio::fs;

use crate::ReportConfig;

/// 幂等地准备 data/ 和 data/charts/，已存在不算错误
pub async fn prepare_dirs(cfg: &ReportConfig) -> Result<()> {
    fs::create_dir_all(cfg.chart_dir()).await?;
    Ok(())
}

/// 原样落盘抓取到的字节流，每次运行覆盖上一次的文件
pub async fn persist_raw(cfg: &ReportConfig, data: &[u8]) -> Result<()> {
    fs::write(cfg.raw_csv_path(), data).await?;
    Ok(())
}

/// 图表文件名带秒级时间戳，跨秒运行不会互相覆盖
/// 同一秒内的两次调用会得到同名路径，这是已知的边界
pub fn chart_path(cfg: &ReportConfig, stamp: &DateTime<Local>) -> PathBuf {
    cfg.chart_dir().join(format!(
        "{}_{}.jpg",
        cfg.chart_prefix,
        stamp.format("%Y%m%d_%H%M%S")
    ))
}
