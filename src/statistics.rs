//! Descriptive statistics, per-column null/type info, and the pairwise
//! Pearson correlation matrix. All artifacts are read-only; the dataset is
//! never mutated.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use polars::prelude::*;

/// Row labels of the describe table, in output order.
const DESCRIBE_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Pairwise Pearson correlations over the numeric columns of a frame.
/// `values[i][j]` is the correlation between `columns[i]` and `columns[j]`;
/// `pair_counts[i][j]` is the number of complete observations for that pair
/// after excluding nulls pairwise.
#[derive(Clone, Debug)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
    pub pair_counts: Vec<Vec<usize>>,
}

fn is_numeric_type(dtype: &DataType) -> bool {
    dtype.is_numeric()
}

/// Non-null values of a series as f64, via a single cast. Types that cannot
/// cast to Float64 yield an empty vector.
fn numeric_values(series: &Series) -> Vec<f64> {
    match series.cast(&DataType::Float64) {
        Ok(cast) => match cast.f64() {
            Ok(ca) => ca.iter().flatten().collect(),
            Err(_) => Vec::new(),
        },
        Err(_) => Vec::new(),
    }
}

/// Quantile of an ascending-sorted sample by nearest-rank index.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let idx = (q * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Builds the describe table: one row per statistic in `DESCRIBE_ROWS`, one
/// column per numeric input column. Count is the non-null count; std is the
/// sample standard deviation (ddof = 1).
///
/// A frame with no numeric columns yields an empty frame, silently.
pub fn describe_frame(df: &DataFrame) -> Result<DataFrame> {
    let numeric: Vec<&Column> = df
        .get_columns()
        .iter()
        .filter(|c| is_numeric_type(c.dtype()))
        .collect();
    if numeric.is_empty() {
        return Ok(DataFrame::empty());
    }

    let mut out: Vec<Column> = Vec::with_capacity(numeric.len() + 1);
    out.push(Series::new("statistic".into(), DESCRIBE_ROWS.as_slice()).into());

    for column in numeric {
        let series = column.as_materialized_series();
        let mut sorted = numeric_values(series);
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let count = (series.len() - series.null_count()) as f64;
        let mean = series.mean().unwrap_or(f64::NAN);
        let std = series.std(1).unwrap_or(f64::NAN);
        let min = sorted.first().copied().unwrap_or(f64::NAN);
        let max = sorted.last().copied().unwrap_or(f64::NAN);
        let stats = vec![
            count,
            mean,
            std,
            min,
            quantile_sorted(&sorted, 0.25),
            quantile_sorted(&sorted, 0.50),
            quantile_sorted(&sorted, 0.75),
            max,
        ];
        out.push(Series::new(column.name().clone(), stats).into());
    }

    Ok(DataFrame::new(out)?)
}

/// Per-column table of name, non-null count, null count, and declared dtype,
/// covering every column of the input frame.
pub fn column_info_frame(df: &DataFrame) -> Result<DataFrame> {
    let mut names: Vec<String> = Vec::with_capacity(df.width());
    let mut non_null: Vec<u32> = Vec::with_capacity(df.width());
    let mut null: Vec<u32> = Vec::with_capacity(df.width());
    let mut dtypes: Vec<String> = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let nulls = column.null_count();
        names.push(column.name().to_string());
        non_null.push((column.len() - nulls) as u32);
        null.push(nulls as u32);
        dtypes.push(column.dtype().to_string());
    }

    Ok(DataFrame::new(vec![
        Series::new("column".into(), names).into(),
        Series::new("non_null_count".into(), non_null).into(),
        Series::new("null_count".into(), null).into(),
        Series::new("dtype".into(), dtypes).into(),
    ])?)
}

/// Computes pairwise Pearson correlations over the numeric columns. Nulls are
/// excluded pairwise: each pair keeps only rows where both values are
/// present. Pairs with fewer than two complete observations are NaN. The
/// matrix is symmetric with a unit diagonal.
///
/// Requires at least two numeric columns.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let numeric_cols: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| is_numeric_type(c.dtype()))
        .map(|c| c.name().to_string())
        .collect();

    if numeric_cols.len() < 2 {
        return Err(eyre!(
            "Need at least 2 numeric columns for a correlation matrix"
        ));
    }

    let n = numeric_cols.len();
    let mut values = vec![vec![1.0; n]; n];
    let mut pair_counts = vec![vec![0; n]; n];
    for (i, name) in numeric_cols.iter().enumerate() {
        pair_counts[i][i] = df.column(name)?.len() - df.column(name)?.null_count();
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let col1 = df.column(&numeric_cols[i])?;
            let col2 = df.column(&numeric_cols[j])?;

            let mask = col1.is_not_null() & col2.is_not_null();
            let col1_clean = col1.filter(&mask)?;
            let col2_clean = col2.filter(&mask)?;

            let count = col1_clean.len();
            pair_counts[i][j] = count;
            pair_counts[j][i] = count;

            let r = if count < 2 {
                f64::NAN
            } else {
                pearson(
                    &numeric_values(col1_clean.as_materialized_series()),
                    &numeric_values(col2_clean.as_materialized_series()),
                )
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: numeric_cols,
        values,
        pair_counts,
    })
}

/// The correlation matrix rendered as a frame: a leading `column` column of
/// names, then one Float64 column per numeric input column.
pub fn correlation_frame(df: &DataFrame) -> Result<DataFrame> {
    let matrix = correlation_matrix(df)?;
    let mut out: Vec<Column> = Vec::with_capacity(matrix.columns.len() + 1);
    out.push(Series::new("column".into(), matrix.columns.clone()).into());
    for (j, name) in matrix.columns.iter().enumerate() {
        let col: Vec<f64> = matrix.values.iter().map(|row| row[j]).collect();
        out.push(Series::new(name.as_str().into(), col).into());
    }
    Ok(DataFrame::new(out)?)
}

/// Pearson correlation of two equal-length samples. Degenerate variance on
/// either side yields 0.0.
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return f64::NAN;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let numerator: f64 = xs
        .iter()
        .zip(ys.iter())
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let var_x: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
    let var_y: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    numerator / (var_x.sqrt() * var_y.sqrt())
}
