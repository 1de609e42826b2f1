//! CSV ingestion: column selection and contiguous grouping.
//!
//! The core only ever sees finished linestrings. This module turns a CSV of
//! point rows into one `PointGroup` per contiguous run of equal group-column
//! values (file order defines vertex order), and slices kept rows back out
//! of the source frame for export.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use visvalingam::prelude::{Linestring, Point};

/// Column selection for point rows. Only x and y are required.
#[derive(Clone, Debug)]
pub struct ColumnSpec {
    pub x: String,
    pub y: String,
    pub z: Option<String>,
    pub id: Option<String>,
    pub group: Option<String>,
    pub keep: Option<String>,
}

/// One contiguous run of rows forming a single polyline.
pub struct PointGroup {
    /// Group-column value, empty when ungrouped.
    pub label: String,
    /// Source row index per vertex, for slicing rows back out of the frame.
    pub rows: Vec<u32>,
    pub line: Linestring,
    /// Per-vertex forced-keep flags from the keep column.
    pub keep: Vec<bool>,
}

impl PointGroup {
    fn new(label: String) -> Self {
        Self {
            label,
            rows: Vec::new(),
            line: Linestring::new(),
            keep: Vec::new(),
        }
    }
}

pub fn read_csv(path: &str) -> Result<DataFrame> {
    let lf = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening csv {path}"))?;
    lf.collect().with_context(|| format!("reading csv {path}"))
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let s = df
        .column(name)
        .with_context(|| format!("missing column {name}"))?
        .cast(&DataType::Float64)
        .with_context(|| format!("column {name} is not numeric"))?;
    let ca = s.f64()?;
    let mut out = Vec::with_capacity(ca.len());
    for (row, v) in ca.into_iter().enumerate() {
        match v {
            Some(v) => out.push(v),
            None => bail!("column {name} has a null at row {row}"),
        }
    }
    Ok(out)
}

fn i64_column(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    let s = df
        .column(name)
        .with_context(|| format!("missing column {name}"))?
        .cast(&DataType::Int64)
        .with_context(|| format!("column {name} is not integral"))?;
    let ca = s.i64()?;
    Ok(ca.into_iter().map(|v| v.unwrap_or(0)).collect())
}

fn str_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let s = df
        .column(name)
        .with_context(|| format!("missing column {name}"))?
        .cast(&DataType::String)?;
    let ca = s.str()?;
    Ok(ca
        .into_iter()
        .map(|v| v.unwrap_or("").to_string())
        .collect())
}

fn truthy(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "t" | "yes" | "y"
    )
}

/// Split the frame into contiguous groups of points. Without a group column
/// the whole file is one group.
pub fn point_groups(df: &DataFrame, spec: &ColumnSpec) -> Result<Vec<PointGroup>> {
    let n = df.height();
    let xs = f64_column(df, &spec.x)?;
    let ys = f64_column(df, &spec.y)?;
    let zs = match &spec.z {
        Some(c) => Some(f64_column(df, c)?),
        None => None,
    };
    let ids = match &spec.id {
        Some(c) => Some(i64_column(df, c)?),
        None => None,
    };
    let labels = match &spec.group {
        Some(c) => Some(str_column(df, c)?),
        None => None,
    };
    let keeps = match &spec.keep {
        Some(c) => Some(str_column(df, c)?),
        None => None,
    };

    let mut groups: Vec<PointGroup> = Vec::new();
    for row in 0..n {
        let label = labels.as_ref().map(|l| l[row].clone()).unwrap_or_default();
        if groups.last().map_or(true, |g| g.label != label) {
            groups.push(PointGroup::new(label));
        }
        if let Some(g) = groups.last_mut() {
            g.rows.push(row as u32);
            let z = zs.as_ref().map_or(0.0, |z| z[row]);
            let id = ids.as_ref().map_or(0, |v| v[row]);
            g.line.push(Point::with_id(id, xs[row], ys[row], z));
            g.keep.push(keeps.as_ref().map_or(false, |k| truthy(&k[row])));
        }
    }
    Ok(groups)
}

/// Write the selected source rows, in the given order, as CSV.
pub fn write_rows_csv(df: &DataFrame, rows: &[u32], path: &str) -> Result<()> {
    let idx = UInt32Chunked::from_vec("rows".into(), rows.to_vec());
    let mut out = df
        .take(&idx)
        .context("slicing kept rows out of the source frame")?;
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut out)
        .with_context(|| format!("writing {path}"))?;
    Ok(())
}

/// Write the per-vertex effective-area table as CSV. `vertex` is the source
/// row index, so areas line up with the input file.
pub fn write_areas_csv(
    vertices: Vec<u32>,
    groups: Vec<String>,
    areas: Vec<f64>,
    path: &str,
) -> Result<()> {
    let mut df = DataFrame::new(vec![
        Series::new("vertex".into(), vertices),
        Series::new("group".into(), groups),
        Series::new("effective_area".into(), areas),
    ])?;
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("writing {path}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn spec() -> ColumnSpec {
        ColumnSpec {
            x: "x".to_string(),
            y: "y".to_string(),
            z: None,
            id: None,
            group: Some("g".to_string()),
            keep: Some("keep".to_string()),
        }
    }

    #[test]
    fn contiguous_runs_form_groups() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pts.csv");
        fs::write(
            &path,
            "x,y,g,keep\n\
             0.0,0.0,a,0\n\
             1.0,2.0,a,1\n\
             2.0,0.0,b,0\n\
             3.0,1.0,b,0\n\
             4.0,0.0,a,0\n",
        )
        .unwrap();
        let df = read_csv(path.to_str().unwrap()).unwrap();
        let groups = point_groups(&df, &spec()).unwrap();

        // the second run of "a" is its own group: grouping is contiguous
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].label, "a");
        assert_eq!(groups[0].rows, vec![0, 1]);
        assert_eq!(groups[0].keep, vec![false, true]);
        assert_eq!(groups[1].label, "b");
        assert_eq!(groups[2].label, "a");
        assert_eq!(groups[2].rows, vec![4]);
        assert!((groups[1].line[0].x() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn ungrouped_file_is_one_group() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pts.csv");
        fs::write(&path, "x,y\n0.0,0.0\n1.0,2.0\n2.0,0.0\n").unwrap();
        let df = read_csv(path.to_str().unwrap()).unwrap();
        let mut spec = spec();
        spec.group = None;
        spec.keep = None;
        let groups = point_groups(&df, &spec).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].line.len(), 3);
        assert_eq!(groups[0].keep, vec![false; 3]);
    }

    #[test]
    fn null_coordinate_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pts.csv");
        fs::write(&path, "x,y\n0.0,0.0\n,2.0\n").unwrap();
        let df = read_csv(path.to_str().unwrap()).unwrap();
        let mut spec = spec();
        spec.group = None;
        spec.keep = None;
        assert!(point_groups(&df, &spec).is_err());
    }

    #[test]
    fn kept_rows_round_trip() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("pts.csv");
        fs::write(&src, "x,y,g,keep\n0.0,0.0,a,0\n1.0,2.0,a,0\n2.0,0.0,a,0\n").unwrap();
        let df = read_csv(src.to_str().unwrap()).unwrap();

        let out = dir.path().join("kept.csv");
        write_rows_csv(&df, &[0, 2], out.to_str().unwrap()).unwrap();
        let back = read_csv(out.to_str().unwrap()).unwrap();
        assert_eq!(back.height(), 2);
        let xs = f64_column(&back, "x").unwrap();
        assert_eq!(xs, vec![0.0, 2.0]);
    }
}
