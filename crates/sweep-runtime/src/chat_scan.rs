//! Paged channel scan: selects channels for closing and captures the
//! open-session list alongside them.

use std::time::Duration;

use anyhow::{Context, Result};
use sweep_platform::PlatformClient;
use tokio::time::sleep;
use tracing::debug;

use crate::channel_filter::ChannelFilter;
use crate::session_sweep::fetch_open_sessions;
use crate::snapshot::SweepSnapshot;

/// Counters and the snapshot produced by one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub snapshot: SweepSnapshot,
    pub pages_fetched: usize,
    pub channels_scanned: usize,
}

/// Walks every channel page at `page_size`, pausing `page_delay_ms` between
/// pages to stay under the platform's rate limits. Matching channel sids
/// accumulate in page order; open sessions are captured once, up front. Any
/// page failure aborts the whole scan.
pub async fn scan_channels(
    client: &PlatformClient,
    filter: &ChannelFilter,
    page_size: usize,
    page_delay_ms: u64,
) -> Result<ScanOutcome> {
    let open_sessions = fetch_open_sessions(client).await;

    let mut active_chats = Vec::new();
    let mut pages_fetched = 0_usize;
    let mut channels_scanned = 0_usize;

    let mut page = client
        .channel_page(page_size)
        .await
        .context("failed to fetch first channel page")?;
    loop {
        pages_fetched += 1;
        channels_scanned += page.channels.len();
        active_chats.extend(
            page.channels
                .iter()
                .filter(|channel| filter.matches(&channel.attributes))
                .map(|channel| channel.sid.clone()),
        );

        let Some(next_page_url) = page.next_page_url else {
            break;
        };
        debug!("waiting {page_delay_ms}ms before channel page {}", pages_fetched + 1);
        sleep(Duration::from_millis(page_delay_ms)).await;
        page = client
            .channel_page_at(&next_page_url)
            .await
            .with_context(|| format!("failed to fetch channel page {}", pages_fetched + 1))?;
    }

    Ok(ScanOutcome {
        snapshot: SweepSnapshot {
            active_chats,
            proxy_sessions: open_sessions
                .into_iter()
                .map(|session| session.sid)
                .collect(),
        },
        pages_fetched,
        channels_scanned,
    })
}
