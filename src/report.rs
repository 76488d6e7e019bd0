use std::fmt;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use polars::prelude::*;

use crate::clock::Clock;
use crate::DataSet;

/// 报告集：目标国家且当日新增病例不为零的行
pub fn reporting_set(ds: &DataSet, country_code: &str) -> Result<DataSet> {
    let mask = ds.column("Country_code")?.eq(country_code) & ds.column("New_cases")?.neq(0);
    Ok(DataSet(ds.filter(&mask)?))
}

/// 绘图集：在报告集上再去掉新增死亡 <= 0 的行
/// 原始数据里有一行负值修正记录，直接丢弃而不是改写
pub fn plotting_set(ds: &DataSet) -> Result<DataSet> {
    let mask = ds.column("New_deaths")?.gt(0);
    Ok(DataSet(ds.filter(&mask)?))
}

/// 图表用的单日观测点，按行序提取（数据源内已按日期排列）
pub struct DailyPoint {
    pub date: String,
    pub new_cases: i64,
    pub new_deaths: i64,
}

pub fn daily_points(ds: &DataSet) -> Result<Vec<DailyPoint>> {
    let dates = ds.column("Date_reported")?.utf8()?;
    let cases = ds.column("New_cases")?.cast::<Int64Type>()?;
    let deaths = ds.column("New_deaths")?.cast::<Int64Type>()?;
    let cases = cases.i64()?;
    let deaths = deaths.i64()?;

    let mut points = Vec::with_capacity(ds.height());
    for ((date, case), death) in dates.into_iter().zip(cases).zip(deaths) {
        if let (Some(date), Some(case), Some(death)) = (date, case, death) {
            points.push(DailyPoint {
                date: date.to_string(),
                new_cases: case,
                new_deaths: death,
            });
        }
    }
    Ok(points)
}

/// 报告集上的汇总统计，空集直接报错而不是产出 NaN
#[derive(Debug)]
pub struct Summary {
    pub country_code: String,
    pub min_new_cases: i64,
    pub max_new_cases: i64,
    pub min_new_deaths: i64,
    pub max_new_deaths: i64,
    pub total_cases: i64,
    pub total_deaths: i64,
    pub generated_at: DateTime<Local>,
}

impl Summary {
    pub fn compute(set: &DataSet, country_code: &str, clock: &dyn Clock) -> Result<Self> {
        if set.height() == 0 {
            return Err(anyhow!(
                "reporting set for {} is empty, nothing to summarize",
                country_code
            ));
        }

        let cases = set.column("New_cases")?.cast::<Int64Type>()?;
        let deaths = set.column("New_deaths")?.cast::<Int64Type>()?;

        // 集合非空，聚合必然有值
        let agg = |v: Option<i64>, what: &str| {
            v.ok_or_else(|| anyhow!("aggregate {} produced no value", what))
        };

        Ok(Summary {
            country_code: country_code.to_string(),
            min_new_cases: agg(cases.min::<i64>(), "min New_cases")?,
            max_new_cases: agg(cases.max::<i64>(), "max New_cases")?,
            min_new_deaths: agg(deaths.min::<i64>(), "min New_deaths")?,
            max_new_deaths: agg(deaths.max::<i64>(), "max New_deaths")?,
            total_cases: agg(cases.sum::<i64>(), "sum New_cases")?,
            total_deaths: agg(deaths.sum::<i64>(), "sum New_deaths")?,
            generated_at: clock.now(),
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n\t\tSUMMARY\n")?;
        writeln!(
            f,
            "Date and Time: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(
            f,
            "The minimum cases in a single day = {:10}",
            self.min_new_cases
        )?;
        writeln!(
            f,
            "The maximum cases in a single day = {:10}",
            self.max_new_cases
        )?;
        writeln!(
            f,
            "The minimum deaths in a single day = {:9}",
            self.min_new_deaths
        )?;
        writeln!(
            f,
            "The maximum deaths in a single day = {:9}",
            self.max_new_deaths
        )?;
        writeln!(
            f,
            "\nTotal {} cases = {:32}",
            self.country_code, self.total_cases
        )?;
        writeln!(
            f,
            "Total {} deaths = {:31}",
            self.country_code, self.total_deaths
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::load::load_csv;
    use chrono::TimeZone;

    const SAMPLE: &str = "\
Date_reported,Country,Country_code,WHO_region,New_cases,Cumulative_cases,New_deaths,Cumulative_deaths
2021-01-01,United States,US,AMRO,100,100,5,5
2021-01-02,United States,US,AMRO,0,100,-1,4
2021-01-01,Canada,CA,AMRO,50,50,2,2
2021-01-03,United States,US,AMRO,200,300,10,15
";

    fn fixed_clock() -> FixedClock {
        FixedClock(Local.with_ymd_and_hms(2021, 2, 3, 4, 5, 6).unwrap())
    }

    #[test]
    fn reporting_set_keeps_target_country_nonzero_case_rows() {
        let ds = load_csv(SAMPLE.as_bytes()).unwrap();
        let set = reporting_set(&ds, "US").unwrap();
        // 第二行 New_cases == 0，第三行是别的国家
        assert_eq!(set.height(), 2);
    }

    #[test]
    fn reporting_filter_is_idempotent() {
        let ds = load_csv(SAMPLE.as_bytes()).unwrap();
        let once = reporting_set(&ds, "US").unwrap();
        let twice = reporting_set(&once, "US").unwrap();
        assert_eq!(once.height(), twice.height());
        assert_eq!(once.to_csv().unwrap(), twice.to_csv().unwrap());
    }

    #[test]
    fn summary_matches_the_fixture() {
        let ds = load_csv(SAMPLE.as_bytes()).unwrap();
        let set = reporting_set(&ds, "US").unwrap();
        let summary = Summary::compute(&set, "US", &fixed_clock()).unwrap();
        assert_eq!(summary.min_new_cases, 100);
        assert_eq!(summary.max_new_cases, 200);
        assert_eq!(summary.min_new_deaths, 5);
        assert_eq!(summary.max_new_deaths, 10);
        assert_eq!(summary.total_cases, 300);
        assert_eq!(summary.total_deaths, 15);
    }

    #[test]
    fn summary_bounds_hold_for_every_retained_value() {
        let ds = load_csv(SAMPLE.as_bytes()).unwrap();
        let set = reporting_set(&ds, "US").unwrap();
        let summary = Summary::compute(&set, "US", &fixed_clock()).unwrap();
        let points = daily_points(&set).unwrap();
        let mut total = 0;
        for p in &points {
            assert!(summary.min_new_cases <= p.new_cases);
            assert!(p.new_cases <= summary.max_new_cases);
            total += p.new_cases;
        }
        assert_eq!(total, summary.total_cases);
    }

    #[test]
    fn empty_reporting_set_is_an_explicit_error() {
        let ds = load_csv(SAMPLE.as_bytes()).unwrap();
        let set = reporting_set(&ds, "FR").unwrap();
        assert_eq!(set.height(), 0);
        let err = Summary::compute(&set, "FR", &fixed_clock()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn plotting_set_requires_positive_deaths() {
        let csv = "\
Date_reported,Country,Country_code,WHO_region,New_cases,Cumulative_cases,New_deaths,Cumulative_deaths
2021-01-01,United States,US,AMRO,100,100,5,5
2021-01-02,United States,US,AMRO,40,140,-1,4
2021-01-03,United States,US,AMRO,60,200,0,4
";
        let ds = load_csv(csv.as_bytes()).unwrap();
        let set = reporting_set(&ds, "US").unwrap();
        assert_eq!(set.height(), 3);
        let plot = plotting_set(&set).unwrap();
        assert_eq!(plot.height(), 1);
        let points = daily_points(&plot).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, "2021-01-01");
        assert_eq!(points[0].new_deaths, 5);
    }

    #[test]
    fn two_row_scenario_from_the_who_feed() {
        let csv = "\
Date_reported,Country,Country_code,WHO_region,New_cases,Cumulative_cases,New_deaths,Cumulative_deaths
2021-01-01,United States,US,AMRO,100,100,5,5
2021-01-02,United States,US,AMRO,0,100,-1,4
";
        let ds = load_csv(csv.as_bytes()).unwrap();
        let set = reporting_set(&ds, "US").unwrap();
        assert_eq!(set.height(), 1);
        let summary = Summary::compute(&set, "US", &fixed_clock()).unwrap();
        assert_eq!(summary.min_new_cases, 100);
        assert_eq!(summary.max_new_cases, 100);
        assert_eq!(summary.total_cases, 100);
        assert_eq!(summary.total_deaths, 5);
        let plot = plotting_set(&set).unwrap();
        assert_eq!(plot.height(), 1);
    }

    #[test]
    fn summary_display_uses_the_fixed_widths() {
        let ds = load_csv(SAMPLE.as_bytes()).unwrap();
        let set = reporting_set(&ds, "US").unwrap();
        let summary = Summary::compute(&set, "US", &fixed_clock()).unwrap();
        let text = summary.to_string();
        assert!(text.contains("Date and Time: 2021-02-03 04:05:06"));
        assert!(text.contains(&format!("The minimum cases in a single day = {:10}", 100)));
        assert!(text.contains(&format!("Total US cases = {:32}", 300)));
    }
}
