//! On-disk state under ~/.cardwise: config and rebate usage toggles.
//!
//! The engine never persists toggles; this module is the only writer.

use anyhow::{Context, Result};
use cardwise_core::RebateUsage;
use std::fs;
use std::path::{Path, PathBuf};

pub fn cardwise_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CARDWISE_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".cardwise"))
}

pub fn ensure_cardwise_home() -> Result<PathBuf> {
    let dir = cardwise_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn rebate_usage_path() -> Result<PathBuf> {
    Ok(ensure_cardwise_home()?.join("rebate_usage.json"))
}

/// Missing file means no toggles: every flat rebate is used.
pub fn read_rebate_usage(path: &Path) -> Result<RebateUsage> {
    if !path.exists() {
        return Ok(RebateUsage::new());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_rebate_usage(path: &Path, usage: &RebateUsage) -> Result<()> {
    let json = serde_json::to_string_pretty(usage)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
