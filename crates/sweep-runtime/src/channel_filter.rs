use serde_json::Value;

/// Decides which channels a scan selects for closing.
///
/// `StaleMarkers` reproduces the production rule: the raw attribute text
/// must contain both `ACTIVE` and `INACTIVE`. Whether that textual test is
/// the real staleness contract is unconfirmed (note that any text holding
/// `INACTIVE` also holds `ACTIVE`), so the structured comparison over the
/// parsed `status` field can be swapped in through configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChannelFilter {
    #[default]
    StaleMarkers,
    StatusEquals(String),
}

impl ChannelFilter {
    /// True when a channel with this raw attribute blob should be closed.
    pub fn matches(&self, attributes: &str) -> bool {
        match self {
            Self::StaleMarkers => attributes.contains("ACTIVE") && attributes.contains("INACTIVE"),
            Self::StatusEquals(expected) => serde_json::from_str::<Value>(attributes)
                .ok()
                .and_then(|value| {
                    value
                        .get("status")
                        .and_then(Value::as_str)
                        .map(|status| status == expected)
                })
                .unwrap_or(false),
        }
    }
}
