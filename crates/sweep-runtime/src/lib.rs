//! Sweep orchestration: stale-channel scanning, per-channel closing, and the
//! open-session sweep, all run strictly sequentially against the platform.

use std::path::PathBuf;

use anyhow::Result;
use sweep_platform::PlatformClient;
use tracing::{error, info};

mod channel_filter;
mod chat_process;
mod chat_scan;
mod session_sweep;
mod snapshot;

pub use channel_filter::ChannelFilter;
pub use chat_process::{process_channels, ChannelOutcome, ChannelProcessReport};
pub use chat_scan::{scan_channels, ScanOutcome};
pub use session_sweep::{
    close_all_open_sessions, close_proxy_session, fetch_open_sessions, SessionCloseOutcome,
    SessionSweepReport,
};
pub use snapshot::SweepSnapshot;

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_PAGE_DELAY_MS: u64 = 2_000;
pub const DEFAULT_SNAPSHOT_PATH: &str = "Output.txt";

/// Tunables for one sweep pass.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub page_size: usize,
    pub page_delay_ms: u64,
    pub snapshot_path: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_delay_ms: DEFAULT_PAGE_DELAY_MS,
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
        }
    }
}

/// Counters for a full pass. The session sweep runs and reports even when
/// the scan phase failed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepRunReport {
    pub scan_failed: bool,
    pub pages_fetched: usize,
    pub channels_scanned: usize,
    pub channels_matched: usize,
    pub channels_closed: usize,
    pub channels_failed: usize,
    pub sessions_swept: usize,
    pub sessions_sweep_failed: usize,
}

/// Explicitly constructed context for a sweep: the client handle, the
/// tunables, and the channel-selection predicate.
pub struct SweepRuntime {
    client: PlatformClient,
    config: SweepConfig,
    filter: ChannelFilter,
}

impl SweepRuntime {
    pub fn new(client: PlatformClient, config: SweepConfig, filter: ChannelFilter) -> Self {
        Self {
            client,
            config,
            filter,
        }
    }

    /// Full pass: scan and persist the snapshot, process the scanned
    /// channels from memory, then close every session still open. A scan
    /// failure skips processing but never the final sweep; nothing here
    /// propagates an error to the caller.
    pub async fn run(&self) -> SweepRunReport {
        let mut report = SweepRunReport::default();

        match self.run_scan().await {
            Ok(outcome) => {
                report.pages_fetched = outcome.pages_fetched;
                report.channels_scanned = outcome.channels_scanned;
                report.channels_matched = outcome.snapshot.active_chats.len();

                let processed =
                    process_channels(&self.client, &outcome.snapshot.active_chats).await;
                for channel in &processed {
                    match &channel.outcome {
                        Ok(_) => report.channels_closed += 1,
                        Err(_) => report.channels_failed += 1,
                    }
                }
            }
            Err(err) => {
                report.scan_failed = true;
                error!("channel scan failed, skipping channel processing: {err:#}");
            }
        }

        let sweep = self.run_sweep().await;
        report.sessions_swept = sweep.closed;
        report.sessions_sweep_failed = sweep.failed;
        report
    }

    /// Walks every channel page and persists the resulting snapshot.
    pub async fn run_scan(&self) -> Result<ScanOutcome> {
        let outcome = scan_channels(
            &self.client,
            &self.filter,
            self.config.page_size,
            self.config.page_delay_ms,
        )
        .await?;
        outcome.snapshot.write_pretty(&self.config.snapshot_path)?;
        info!(
            path = %self.config.snapshot_path.display(),
            active_chats = outcome.snapshot.active_chats.len(),
            open_sessions = outcome.snapshot.proxy_sessions.len(),
            "scan snapshot written"
        );
        Ok(outcome)
    }

    /// Processes the channels recorded in the snapshot file on disk. Fails
    /// before touching any channel when the file is missing or corrupt.
    pub async fn run_process(&self) -> Result<Vec<ChannelProcessReport>> {
        let snapshot = SweepSnapshot::load(&self.config.snapshot_path)?;
        Ok(process_channels(&self.client, &snapshot.active_chats).await)
    }

    /// Closes every proxy session still open on the service.
    pub async fn run_sweep(&self) -> SessionSweepReport {
        close_all_open_sessions(&self.client).await
    }
}
