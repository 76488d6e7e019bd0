use std::path::Path;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::report::{DailyPoint, Summary};

const WIDTH: u32 = 1400;
const HEIGHT: u32 = 1000;

/// 两个面板共用的刻度数量，等距取日期标签，不依赖绘图库内部的日期编码
const DATE_TICKS: usize = 8;

/// 渲染上下两个折线面板并写出 JPEG：上面新增病例（蓝），下面新增死亡（红）
pub fn render(
    points: &[DailyPoint],
    summary: &Summary,
    source_url: &str,
    out: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(out, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let dates: Vec<String> = points.iter().map(|p| p.date.clone()).collect();
    let cases: Vec<i64> = points.iter().map(|p| p.new_cases).collect();
    let deaths: Vec<i64> = points.iter().map(|p| p.new_deaths).collect();

    let (upper, lower) = root.split_vertically(500);
    draw_panel(
        &upper,
        &format!("{} COVID-19 Cases By Day", summary.country_code),
        "Million Cases",
        "New Cases",
        &dates,
        &cases,
        &BLUE,
    )?;
    draw_panel(
        &lower,
        &format!("{} COVID-19 Deaths By Day", summary.country_code),
        "Deaths",
        "New Deaths",
        &dates,
        &deaths,
        &RED,
    )?;

    // 覆盖文字：左下角来源引用，右上角生成时间，左上角总量框
    let start = dates.iter().min().cloned().unwrap_or_default();
    let end = dates.iter().max().cloned().unwrap_or_default();
    root.draw(&Text::new(
        format!(
            "source: WHO COVID-19 Global Data ({} - {}) -- {}",
            start, end, source_url
        ),
        (20, HEIGHT as i32 - 18),
        ("sans-serif", 14).into_font(),
    ))?;
    root.draw(&Text::new(
        summary.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        (WIDTH as i32 - 170, 10),
        ("sans-serif", 14).into_font(),
    ))?;

    root.draw(&Rectangle::new([(120, 60), (420, 122)], WHITE.filled()))?;
    root.draw(&Rectangle::new([(120, 60), (420, 122)], BLACK.stroke_width(1)))?;
    root.draw(&Text::new(
        format!("Total Cases = {:10}", summary.total_cases),
        (130, 70),
        ("sans-serif", 18).into_font(),
    ))?;
    root.draw(&Text::new(
        format!("Total Deaths = {:10}", summary.total_deaths),
        (130, 94),
        ("sans-serif", 18).into_font(),
    ))?;

    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    title: &str,
    y_desc: &str,
    series_label: &str,
    dates: &[String],
    values: &[i64],
    color: &'static RGBColor,
) -> Result<()> {
    // 空集也要画出一个合法的退化图
    let x_max = dates.len().saturating_sub(1).max(1) as i32;
    let y_max = values.iter().copied().max().unwrap_or(1).max(1);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0i32..x_max, 0i64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Date Reported")
        .y_desc(y_desc)
        .x_labels(DATE_TICKS)
        .x_label_formatter(&|idx| {
            dates
                .get(*idx as usize)
                .cloned()
                .unwrap_or_default()
        })
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (i as i32, *v)),
            color,
        ))?
        .label(series_label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}
