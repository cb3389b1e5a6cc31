use serde::Deserialize;

/// Lifecycle state reported by the session API. Wire values the client does
/// not recognize decode as `Unknown` instead of failing the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SessionStatus {
    Open,
    InProgress,
    Closed,
    Failed,
    Unknown,
}

impl From<String> for SessionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "open" => Self::Open,
            "in-progress" => Self::InProgress,
            "closed" => Self::Closed,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Closed => "closed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// A proxy-masking session as the session API reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxySession {
    pub sid: String,
    pub status: SessionStatus,
}

/// One chat channel row from a page or a point fetch. The attributes blob
/// stays an opaque JSON string at this layer.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelSummary {
    pub sid: String,
    #[serde(default)]
    pub attributes: String,
}

/// A page of channels plus the absolute link to the next page, when any.
#[derive(Debug, Clone)]
pub struct ChannelPage {
    pub channels: Vec<ChannelSummary>,
    pub next_page_url: Option<String>,
}
