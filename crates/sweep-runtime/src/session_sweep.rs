//! Session listing and closing, with the error-absorbing boundaries the
//! cleanup job relies on to keep moving past transient failures.

use sweep_platform::{PlatformClient, ProxySession};
use tracing::{info, warn};

/// What one close attempt did. `NotFound` means the point lookup saw no such
/// session but the close update was accepted anyway; `AlreadyClosed` means
/// the lookup found a session that was closed before this run touched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCloseOutcome {
    Closed,
    AlreadyClosed,
    NotFound,
    UpdateFailed,
}

/// Tally of one bulk sweep over the open-session list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSweepReport {
    pub attempted: usize,
    pub closed: usize,
    pub already_closed: usize,
    pub failed: usize,
}

enum Lookup {
    Open,
    Closed,
    Missing,
}

/// Lists sessions and keeps the ones not yet closed. A listing failure is
/// absorbed: the caller sees an empty list and the run keeps moving.
pub async fn fetch_open_sessions(client: &PlatformClient) -> Vec<ProxySession> {
    match client.list_sessions().await {
        Ok(sessions) => sessions
            .into_iter()
            .filter(|session| !session.status.is_closed())
            .collect(),
        Err(err) => {
            warn!("failed to list proxy sessions, treating as none open: {err}");
            Vec::new()
        }
    }
}

/// Closes one session. The point lookup only shapes the log line and the
/// outcome; the close update is issued regardless of what the lookup saw,
/// and its failure is absorbed here rather than propagated.
pub async fn close_proxy_session(
    client: &PlatformClient,
    session_sid: &str,
) -> SessionCloseOutcome {
    let lookup = match client.fetch_session(session_sid).await {
        Ok(Some(session)) if session.status.is_closed() => {
            info!("session {session_sid} is already closed");
            Lookup::Closed
        }
        Ok(Some(session)) => {
            info!(
                "fetched session {session_sid} with status {}",
                session.status.as_str()
            );
            Lookup::Open
        }
        Ok(None) => {
            info!("session {session_sid} not found or already closed");
            Lookup::Missing
        }
        Err(err) => {
            warn!("failed to look up session {session_sid}: {err}");
            Lookup::Missing
        }
    };

    match client.close_session(session_sid).await {
        Ok(_) => {
            info!("proxy session {session_sid} closed");
            match lookup {
                Lookup::Open => SessionCloseOutcome::Closed,
                Lookup::Closed => SessionCloseOutcome::AlreadyClosed,
                Lookup::Missing => SessionCloseOutcome::NotFound,
            }
        }
        Err(err) => {
            warn!("failed to close session {session_sid}: {err}");
            SessionCloseOutcome::UpdateFailed
        }
    }
}

/// Closes every open session one at a time, awaiting each close before the
/// next. A single failed close never aborts the rest of the sweep.
pub async fn close_all_open_sessions(client: &PlatformClient) -> SessionSweepReport {
    let sessions = fetch_open_sessions(client).await;
    let mut report = SessionSweepReport {
        attempted: sessions.len(),
        ..Default::default()
    };
    for session in sessions {
        match close_proxy_session(client, &session.sid).await {
            SessionCloseOutcome::Closed => report.closed += 1,
            SessionCloseOutcome::AlreadyClosed | SessionCloseOutcome::NotFound => {
                report.already_closed += 1
            }
            SessionCloseOutcome::UpdateFailed => report.failed += 1,
        }
    }
    info!(
        attempted = report.attempted,
        closed = report.closed,
        failed = report.failed,
        "open proxy session sweep finished"
    );
    report
}
