use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sweep_core::write_text_atomic;

/// Handoff between the scan phase and the processing phase: the channels
/// selected for closing plus the sessions that were open at scan time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSnapshot {
    #[serde(rename = "activeChats")]
    pub active_chats: Vec<String>,
    #[serde(rename = "proxySessions")]
    pub proxy_sessions: Vec<String>,
}

impl SweepSnapshot {
    /// Reads a snapshot previously persisted by a scan.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("snapshot {} is not valid JSON", path.display()))
    }

    /// Overwrites `path` with this snapshot as pretty-printed JSON.
    pub fn write_pretty(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("failed to encode snapshot")?;
        write_text_atomic(path, &text)
    }
}
