use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

use anyhow::Result;
use polars::frame::DataFrame;
use polars::io::SerWriter;
use polars::prelude::CsvWriter;
use tracing::info;

mod chart;
mod clock;
mod fetcher;
mod load;
mod report;
mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use report::{DailyPoint, Summary};

/// WHO 每日全球数据的固定下载地址
pub const SOURCE_URL: &str = "https://covid19.who.int/WHO-COVID-19-global-data.csv";

#[derive(Debug)]
pub struct DataSet(pub(crate) DataFrame);

impl Deref for DataSet {
    type Target = DataFrame;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DataSet {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// DataSet 内部方法
impl DataSet {
    /// DataSet 转换为 CSV
    pub fn to_csv(&self) -> Result<String> {
        let mut buf = Vec::new();
        let writer = CsvWriter::new(&mut buf);
        writer.finish(self)?;
        Ok(String::from_utf8(buf)?)
    }
}

/// 一次运行的全部固定参数，二进制入口用默认值，测试可以改源和输出目录
pub struct ReportConfig {
    pub source_url: String,
    pub data_dir: PathBuf,
    pub country_code: String,
    pub chart_prefix: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            source_url: SOURCE_URL.to_string(),
            data_dir: PathBuf::from("data"),
            country_code: "US".to_string(),
            chart_prefix: "us_covid19_cd".to_string(),
        }
    }
}

impl ReportConfig {
    pub fn raw_csv_path(&self) -> PathBuf {
        self.data_dir.join("WHO-COVID-19-global-data.csv")
    }

    pub fn chart_dir(&self) -> PathBuf {
        self.data_dir.join("charts")
    }
}

/// 一次运行产出的结果：报告集、汇总和图表路径
#[derive(Debug)]
pub struct ReportArtifacts {
    pub reporting: DataSet,
    pub summary: Summary,
    pub chart_path: PathBuf,
}

/// 线性流水线：建目录 → 抓取 → 落盘 → 解析 → 投影 → 过滤 → 汇总 → 绘图
pub async fn run_report(cfg: &ReportConfig, clock: &dyn Clock) -> Result<ReportArtifacts> {
    storage::prepare_dirs(cfg).await?;

    info!("retrieving data from source: {}", cfg.source_url);
    let raw = fetcher::retrieve_data(&cfg.source_url).await?;
    storage::persist_raw(cfg, &raw).await?;

    let ds = load::load_csv(&raw)?;
    let ds = load::drop_label_columns(ds)?;

    let reporting = report::reporting_set(&ds, &cfg.country_code)?;
    info!(
        "reporting set for {} has {} rows",
        cfg.country_code,
        reporting.height()
    );

    let summary = Summary::compute(&reporting, &cfg.country_code, clock)?;

    let plotting = report::plotting_set(&reporting)?;
    let points = report::daily_points(&plotting)?;

    let chart_path = storage::chart_path(cfg, &summary.generated_at);
    chart::render(&points, &summary, &cfg.source_url, &chart_path)?;
    info!("chart written to {}", chart_path.display());

    Ok(ReportArtifacts {
        reporting,
        summary,
        chart_path,
    })
}
