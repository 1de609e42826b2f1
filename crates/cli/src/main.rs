//! Command-line front end: CSV point rows in, simplified rows / WKT /
//! effective-area dumps out. The core engine only ever sees finished
//! linestrings; all parsing, column selection, and grouping happen here.

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::fmt::SubscriberBuilder;
use visvalingam::prelude::*;

mod ingest;
mod provenance;
mod wkt;

use ingest::{ColumnSpec, PointGroup};

#[derive(Parser)]
#[command(name = "vwsimplify")]
#[command(about = "Visvalingam-Whyatt simplification over CSV point rows")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Args, Clone)]
struct ColumnArgs {
    /// Input CSV of point rows
    #[arg(long)]
    input: String,
    /// Column holding x coordinates
    #[arg(long, default_value = "x")]
    x_col: String,
    /// Column holding y coordinates
    #[arg(long, default_value = "y")]
    y_col: String,
    /// Optional z column; points stay planar without it
    #[arg(long)]
    z_col: Option<String>,
    /// Optional stable point-id column
    #[arg(long)]
    id_col: Option<String>,
    /// Optional group column; contiguous runs of equal values form one polyline
    #[arg(long)]
    group_col: Option<String>,
    /// Optional column marking rows that must survive simplification
    #[arg(long)]
    keep_col: Option<String>,
}

impl ColumnArgs {
    fn to_spec(&self) -> ColumnSpec {
        ColumnSpec {
            x: self.x_col.clone(),
            y: self.y_col.clone(),
            z: self.z_col.clone(),
            id: self.id_col.clone(),
            group: self.group_col.clone(),
            keep: self.keep_col.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Simplify each group and write the kept source rows as CSV
    Simplify {
        #[command(flatten)]
        cols: ColumnArgs,
        /// Effective-area threshold; kept vertices lie strictly above it
        #[arg(long, default_value_t = 0.002)]
        threshold: f64,
        /// Target removal percentage in (0, 100); overrides --threshold
        #[arg(long)]
        ratio: Option<usize>,
        /// Output CSV of kept source rows
        #[arg(long)]
        out: String,
        /// Print the simplified geometry as WKT to stdout
        #[arg(long)]
        wkt: bool,
        /// Also dump per-vertex effective areas as CSV
        #[arg(long)]
        dump_areas: Option<String>,
    },
    /// Dump per-vertex effective areas as CSV
    Areas {
        #[command(flatten)]
        cols: ColumnArgs,
        /// Output CSV with vertex, group, effective_area columns
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Simplify {
            cols,
            threshold,
            ratio,
            out,
            wkt,
            dump_areas,
        } => simplify_cmd(&cols, threshold, ratio, &out, wkt, dump_areas.as_deref()),
        Action::Areas { cols, out } => areas_cmd(&cols, &out),
    }
}

fn engine_for<'a>(group: &'a PointGroup) -> Visvalingam<'a> {
    Visvalingam::with_keep(&group.line, |i| group.keep[i])
}

fn simplify_cmd(
    cols: &ColumnArgs,
    threshold: f64,
    ratio: Option<usize>,
    out: &str,
    wkt: bool,
    dump_areas: Option<&str>,
) -> Result<()> {
    if threshold < 0.0 {
        bail!("--threshold must be >= 0");
    }
    if let Some(r) = ratio {
        if !(1..100).contains(&r) {
            bail!("--ratio must be in (0, 100)");
        }
    }

    let df = ingest::read_csv(&cols.input)?;
    let groups = ingest::point_groups(&df, &cols.to_spec())?;
    tracing::info!(rows = df.height(), groups = groups.len(), "input");

    let mut kept_rows: Vec<u32> = Vec::new();
    let mut wkt_lines: Vec<Linestring> = Vec::new();
    let mut area_vertices: Vec<u32> = Vec::new();
    let mut area_groups: Vec<String> = Vec::new();
    let mut area_values: Vec<f64> = Vec::new();

    for group in &groups {
        let engine = engine_for(group);
        let group_threshold = match ratio {
            Some(r) => engine.area_threshold_for_ratio(r),
            None => threshold,
        };
        let (line, kept) = engine.simplify_indexed(group_threshold);
        if kept.is_empty() {
            // degenerate collapse: hand the group back unsimplified
            tracing::warn!(
                group = %group.label,
                vertices = group.line.len(),
                "group collapsed, keeping unsimplified rows"
            );
            kept_rows.extend_from_slice(&group.rows);
            wkt_lines.push(group.line.clone());
        } else {
            tracing::info!(
                group = %group.label,
                threshold = group_threshold,
                before = group.line.len(),
                after = line.len(),
                "simplified"
            );
            kept_rows.extend(kept.iter().map(|&i| group.rows[i]));
            wkt_lines.push(line);
        }
        if dump_areas.is_some() {
            for (i, &area) in engine.effective_areas().iter().enumerate() {
                area_vertices.push(group.rows[i]);
                area_groups.push(group.label.clone());
                area_values.push(area);
            }
        }
    }

    ingest::write_rows_csv(&df, &kept_rows, out)?;
    if let Some(path) = dump_areas {
        ingest::write_areas_csv(area_vertices, area_groups, area_values, path)?;
    }
    if wkt {
        for line in &wkt_lines {
            println!("{}", wkt::linestring_wkt(line));
        }
    }

    let params = json!({
        "input": cols.input,
        "threshold": threshold,
        "ratio": ratio,
        "group_col": cols.group_col,
        "keep_col": cols.keep_col,
    });
    provenance::write_sidecar(
        out,
        provenance::RunRecord::new(params, df.height(), kept_rows.len()),
    )?;
    Ok(())
}

fn areas_cmd(cols: &ColumnArgs, out: &str) -> Result<()> {
    let df = ingest::read_csv(&cols.input)?;
    let groups = ingest::point_groups(&df, &cols.to_spec())?;
    tracing::info!(rows = df.height(), groups = groups.len(), "input");

    let mut vertices: Vec<u32> = Vec::new();
    let mut labels: Vec<String> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    for group in &groups {
        let engine = engine_for(group);
        for (i, &area) in engine.effective_areas().iter().enumerate() {
            vertices.push(group.rows[i]);
            labels.push(group.label.clone());
            values.push(area);
        }
    }
    let count = vertices.len();
    ingest::write_areas_csv(vertices, labels, values, out)?;

    let params = json!({
        "input": cols.input,
        "group_col": cols.group_col,
    });
    provenance::write_sidecar(out, provenance::RunRecord::new(params, df.height(), count))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn fixture_csv(path: &std::path::Path) {
        // effective areas: [0, 125, 14, 3.5, 30, 0]
        fs::write(
            path,
            "x,y,g\n\
             0.0,0.0,a\n\
             5.0,-10.0,a\n\
             12.0,-6.0,a\n\
             15.0,-7.0,a\n\
             19.0,-6.0,a\n\
             25.0,0.0,a\n",
        )
        .unwrap();
    }

    fn cols(input: &std::path::Path) -> ColumnArgs {
        ColumnArgs {
            input: input.to_string_lossy().into_owned(),
            x_col: "x".to_string(),
            y_col: "y".to_string(),
            z_col: None,
            id_col: None,
            group_col: Some("g".to_string()),
            keep_col: None,
        }
    }

    #[test]
    fn simplify_writes_kept_rows_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pts.csv");
        fixture_csv(&input);
        let out = dir.path().join("kept.csv");
        let areas = dir.path().join("areas.csv");

        simplify_cmd(
            &cols(&input),
            20.0,
            None,
            out.to_str().unwrap(),
            false,
            Some(areas.to_str().unwrap()),
        )
        .unwrap();

        // threshold 20 keeps vertices 0, 1, 4, 5
        let kept = ingest::read_csv(out.to_str().unwrap()).unwrap();
        assert_eq!(kept.height(), 4);

        let dumped = ingest::read_csv(areas.to_str().unwrap()).unwrap();
        assert_eq!(dumped.height(), 6);

        let sidecar = dir.path().join("kept.run.json");
        let parsed: serde_json::Value =
            serde_json::from_slice(&fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(parsed["rows_in"], 6);
        assert_eq!(parsed["rows_out"], 4);
    }

    #[test]
    fn collapsed_group_falls_back_to_source_rows() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pts.csv");
        fixture_csv(&input);
        let out = dir.path().join("kept.csv");

        // above every effective area: the group collapses and passes through
        simplify_cmd(&cols(&input), 200.0, None, out.to_str().unwrap(), false, None).unwrap();
        let kept = ingest::read_csv(out.to_str().unwrap()).unwrap();
        assert_eq!(kept.height(), 6);
    }

    #[test]
    fn ratio_overrides_threshold() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pts.csv");
        fixture_csv(&input);
        let out = dir.path().join("kept.csv");

        // ratio 50 -> threshold 14 (order statistic) -> vertices 0, 1, 4, 5
        simplify_cmd(&cols(&input), 0.0, Some(50), out.to_str().unwrap(), false, None).unwrap();
        let kept = ingest::read_csv(out.to_str().unwrap()).unwrap();
        assert_eq!(kept.height(), 4);
    }

    #[test]
    fn bad_tunables_are_rejected() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pts.csv");
        fixture_csv(&input);
        let out = dir.path().join("kept.csv");
        assert!(
            simplify_cmd(&cols(&input), -1.0, None, out.to_str().unwrap(), false, None).is_err()
        );
        assert!(
            simplify_cmd(&cols(&input), 0.0, Some(100), out.to_str().unwrap(), false, None)
                .is_err()
        );
    }

    #[test]
    fn areas_command_dumps_every_vertex() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pts.csv");
        fixture_csv(&input);
        let out = dir.path().join("areas.csv");

        areas_cmd(&cols(&input), out.to_str().unwrap()).unwrap();
        let dumped = ingest::read_csv(out.to_str().unwrap()).unwrap();
        assert_eq!(dumped.height(), 6);
        assert!(dumped.column("effective_area").is_ok());
    }
}
