//! Operator CLI for the proxy-session / chat-channel sweep job.

mod bootstrap_helpers;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use sweep_platform::{PlatformClient, PlatformConfig};
use sweep_runtime::{
    ChannelFilter, SweepConfig, SweepRuntime, DEFAULT_PAGE_DELAY_MS, DEFAULT_PAGE_SIZE,
    DEFAULT_SNAPSHOT_PATH,
};
use tracing::{error, info};

use crate::bootstrap_helpers::init_tracing;

#[derive(Debug, Parser)]
#[command(
    name = "sweep-cli",
    about = "Closes stale chat channels and their proxy sessions"
)]
struct Cli {
    #[command(flatten)]
    platform: PlatformArgs,
    #[command(flatten)]
    sweep: SweepArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Args)]
struct PlatformArgs {
    /// Base URL of the platform REST API.
    #[arg(long, env = "SWEEP_API_BASE")]
    api_base: String,
    /// Account identifier used for basic auth.
    #[arg(long, env = "SWEEP_ACCOUNT_SID")]
    account_sid: String,
    /// Account credential used for basic auth.
    #[arg(long, env = "SWEEP_AUTH_TOKEN", hide_env_values = true)]
    auth_token: String,
    /// Proxy service whose sessions are swept.
    #[arg(long, env = "SWEEP_PROXY_SERVICE_SID")]
    proxy_service_sid: String,
    /// Chat service whose channels are scanned.
    #[arg(long, env = "SWEEP_CHAT_SERVICE_SID")]
    chat_service_sid: String,
    /// Per-request timeout in milliseconds.
    #[arg(long, env = "SWEEP_REQUEST_TIMEOUT_MS", default_value_t = 30_000)]
    request_timeout_ms: u64,
}

#[derive(Debug, Args)]
struct SweepArgs {
    /// Channels fetched per page (platform maximum is 100).
    #[arg(long, env = "SWEEP_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
    /// Pause between page fetches, to stay under the platform rate limits.
    #[arg(long, env = "SWEEP_PAGE_DELAY_MS", default_value_t = DEFAULT_PAGE_DELAY_MS)]
    page_delay_ms: u64,
    /// Where the scan snapshot is written and read back.
    #[arg(long, env = "SWEEP_SNAPSHOT_PATH", default_value = DEFAULT_SNAPSHOT_PATH)]
    snapshot_path: PathBuf,
    /// Close channels whose parsed `status` attribute equals this value,
    /// instead of applying the marker-substring rule.
    #[arg(long, env = "SWEEP_STATUS_FILTER")]
    status_filter: Option<String>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Scan channels, process the matches, then sweep open sessions (default).
    Run,
    /// Scan channels and write the snapshot only.
    Scan,
    /// Process the channels recorded in the snapshot file.
    Process,
    /// Close every proxy session still open.
    Sweep,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let Cli {
        platform,
        sweep,
        command,
    } = Cli::parse();

    let client = PlatformClient::new(PlatformConfig {
        api_base: platform.api_base,
        account_sid: platform.account_sid,
        auth_token: platform.auth_token,
        proxy_service_sid: platform.proxy_service_sid,
        chat_service_sid: platform.chat_service_sid,
        request_timeout_ms: platform.request_timeout_ms,
    })?;
    let filter = match sweep.status_filter {
        Some(value) => ChannelFilter::StatusEquals(value),
        None => ChannelFilter::StaleMarkers,
    };
    let runtime = SweepRuntime::new(
        client,
        SweepConfig {
            page_size: sweep.page_size,
            page_delay_ms: sweep.page_delay_ms,
            snapshot_path: sweep.snapshot_path,
        },
        filter,
    );

    match command.unwrap_or(Command::Run) {
        Command::Run => {
            let report = runtime.run().await;
            info!(
                channels_matched = report.channels_matched,
                channels_closed = report.channels_closed,
                channels_failed = report.channels_failed,
                sessions_swept = report.sessions_swept,
                sessions_sweep_failed = report.sessions_sweep_failed,
                "sweep run finished"
            );
        }
        Command::Scan => {
            if let Err(err) = runtime.run_scan().await {
                error!("channel scan failed: {err:#}");
            }
        }
        Command::Process => match runtime.run_process().await {
            Ok(reports) => {
                let failed = reports.iter().filter(|r| r.outcome.is_err()).count();
                info!(
                    processed = reports.len() - failed,
                    failed, "chat processing finished"
                );
            }
            Err(err) => error!("chat processing failed: {err:#}"),
        },
        Command::Sweep => {
            runtime.run_sweep().await;
        }
    }

    Ok(())
}
