//! Run sidecars: `<artifact-stem>.run.json` written next to each artifact,
//! recording the code revision, run parameters, and row counts.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Contents of one run sidecar.
#[derive(Serialize)]
pub struct RunRecord {
    pub code_rev: String,
    pub params: Value,
    pub rows_in: usize,
    pub rows_out: usize,
    pub outputs: Vec<String>,
}

impl RunRecord {
    pub fn new(params: Value, rows_in: usize, rows_out: usize) -> Self {
        Self {
            code_rev: current_git_rev(),
            params,
            rows_in,
            rows_out,
            outputs: Vec::new(),
        }
    }
}

/// Write `<artifact-stem>.run.json` beside the artifact.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, mut record: RunRecord) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let sidecar = sidecar_path(artifact);
    if let Some(parent) = sidecar.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating sidecar dir {}", parent.display()))?;
        }
    }
    record.outputs.push(artifact.to_string_lossy().into_owned());
    fs::write(&sidecar, serde_json::to_vec_pretty(&record)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(sidecar)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    let mut name = stem;
    name.push(".run.json");
    artifact.with_file_name(name)
}

pub fn current_git_rev() -> String {
    if let Some(from_env) = option_env!("GIT_COMMIT") {
        if !from_env.is_empty() {
            return from_env.to_string();
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
            } else {
                None
            }
        })
        .unwrap_or_else(|| "unknown".to_string())
}
