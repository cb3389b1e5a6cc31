//! Per-channel closing: read the attribute blob, close the referenced proxy
//! session, rewrite the status, push the update.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use sweep_platform::PlatformClient;
use tracing::{info, warn};

use crate::session_sweep::{close_proxy_session, SessionCloseOutcome};

/// Result of processing one channel from the scan list.
#[derive(Debug)]
pub struct ChannelProcessReport {
    pub channel_sid: String,
    pub outcome: Result<ChannelOutcome>,
}

/// What a successful per-channel pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOutcome {
    /// Close outcome for the session referenced by `sessionSid`, if any.
    pub session: Option<SessionCloseOutcome>,
}

/// Rewrites `status` to `"closed"` in an attribute blob, leaving every other
/// field untouched, and surfaces the `sessionSid` reference when present.
pub(crate) fn close_attributes(attributes: &str) -> Result<(String, Option<String>)> {
    let mut parsed: Map<String, Value> =
        serde_json::from_str(attributes).context("attributes are not a JSON object")?;
    let session_sid = parsed
        .get("sessionSid")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned);
    parsed.insert("status".to_string(), Value::String("closed".to_string()));
    let rewritten = serde_json::to_string(&parsed).context("failed to encode attributes")?;
    Ok((rewritten, session_sid))
}

async fn process_channel(client: &PlatformClient, channel_sid: &str) -> Result<ChannelOutcome> {
    let channel = client
        .fetch_channel(channel_sid)
        .await
        .context("failed to fetch channel")?;
    let (attributes, session_sid) = close_attributes(&channel.attributes)?;

    let session = match session_sid {
        Some(session_sid) => Some(close_proxy_session(client, &session_sid).await),
        None => None,
    };

    client
        .update_channel_attributes(channel_sid, &attributes)
        .await
        .context("failed to update channel attributes")?;
    info!("chat {channel_sid} marked closed");
    Ok(ChannelOutcome { session })
}

/// Processes each scanned channel in order. One channel's failure is logged
/// and recorded without touching the rest of the batch.
pub async fn process_channels(
    client: &PlatformClient,
    channel_sids: &[String],
) -> Vec<ChannelProcessReport> {
    let mut reports = Vec::with_capacity(channel_sids.len());
    for channel_sid in channel_sids {
        let outcome = process_channel(client, channel_sid).await;
        if let Err(err) = &outcome {
            warn!("failed to mark chat {channel_sid} closed: {err:#}");
        }
        reports.push(ChannelProcessReport {
            channel_sid: channel_sid.clone(),
            outcome,
        });
    }
    reports
}
