use std::io::Cursor;

use anyhow::{anyhow, Result};
use polars::prelude::*;

use crate::DataSet;

/// WHO 数据源的列约定，下游的投影和过滤都依赖这些列名
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Date_reported",
    "Country",
    "Country_code",
    "WHO_region",
    "New_cases",
    "Cumulative_cases",
    "New_deaths",
    "Cumulative_deaths",
];

/// 把原始 CSV 字节流解析成 DataSet，列类型由前若干行推断
pub fn load_csv(data: &[u8]) -> Result<DataSet> {
    let df = CsvReader::new(Cursor::new(data))
        .infer_schema(Some(16))
        .finish()?;
    ensure_schema(&df)?;
    Ok(DataSet(df))
}

/// 缺列直接报错，好过下游过滤时的一个笼统的运行期错误
fn ensure_schema(df: &DataFrame) -> Result<()> {
    let names = df.get_column_names();
    for col in REQUIRED_COLUMNS {
        if !names.contains(&col) {
            return Err(anyhow!(
                "schema mismatch: column {} missing from source data",
                col
            ));
        }
    }
    Ok(())
}

/// 去掉两个展示用的标识列，不影响过滤
pub fn drop_label_columns(ds: DataSet) -> Result<DataSet> {
    let df = ds.0.drop("Country")?.drop("WHO_region")?;
    Ok(DataSet(df))
}
