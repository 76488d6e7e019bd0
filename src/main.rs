use anyhow::Result;
use covid_report::{run_report, ReportConfig, SystemClock};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = ReportConfig::default();
    let artifacts = run_report(&cfg, &SystemClock).await?;

    println!("\n\tDataframe head & tail\n");
    println!("{:?}", *artifacts.reporting);
    print!("{}", artifacts.summary);
    println!("\nChart saved to {}", artifacts.chart_path.display());

    Ok(())
}
