use crate::catalog::FeedDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WsConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
}

/// Command sent from the UI to the feed subscriber task.
#[derive(Debug, Clone)]
pub enum FeedCommand {
    Select(FeedDescriptor),
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A decoded account update for the currently subscribed feed.
    /// `raw_price` is None when the account is missing or the payload
    /// could not be decoded.
    PriceUpdate {
        feed_id: u32,
        raw_price: Option<u64>,
        timestamp_ms: u64,
    },
    WsStatus(WsConnectionStatus),
    /// Derived on-chain address of the subscribed feed, base58.
    FeedAddress(String),
    LogMessage(String),
    Error(String),
}
