use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use solana_sdk::pubkey::Pubkey;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite, MaybeTlsStream, WebSocketStream};

use crate::catalog::FeedDescriptor;
use crate::event::{AppEvent, FeedCommand, WsConnectionStatus};
use crate::feed::address::derive_feed_address;
use crate::feed::decode::decode_raw_price;

use super::http::RpcHttpClient;
use super::types::{classify_message, RpcRequest, WsIncoming};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Message we still need to put on the wire during a feed switch. The
/// unsubscribe for the previous feed always precedes the new subscribe, so
/// the node never has both feeds active at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireAction {
    Unsubscribe { request_id: u64, subscription: u64 },
    Subscribe { request_id: u64 },
}

/// Pure bookkeeping for the single active account subscription.
#[derive(Debug, Default)]
pub struct SubscriptionTracker {
    next_request_id: u64,
    active: Option<u64>,
    pending_subscribe: Option<u64>,
}

impl SubscriptionTracker {
    pub fn new() -> Self {
        Self {
            next_request_id: 1,
            active: None,
            pending_subscribe: None,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Plan the wire traffic for switching to a new feed: tear down the old
    /// subscription first, then subscribe.
    pub fn begin_switch(&mut self) -> Vec<WireAction> {
        let mut actions = Vec::new();
        if let Some(subscription) = self.active.take() {
            actions.push(WireAction::Unsubscribe {
                request_id: self.next_id(),
                subscription,
            });
        }
        let request_id = self.next_id();
        self.pending_subscribe = Some(request_id);
        actions.push(WireAction::Subscribe { request_id });
        actions
    }

    /// Returns true if the ack matches the pending subscribe.
    pub fn on_subscribe_ack(&mut self, request_id: u64, subscription: u64) -> bool {
        if self.pending_subscribe == Some(request_id) {
            self.pending_subscribe = None;
            self.active = Some(subscription);
            true
        } else {
            false
        }
    }

    pub fn is_current(&self, subscription: u64) -> bool {
        self.active == Some(subscription)
    }

    pub fn active(&self) -> Option<u64> {
        self.active
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.pending_subscribe = None;
    }
}

/// Background task owning the account-change subscription.
///
/// Consumes `FeedCommand`s from the UI and emits `AppEvent`s. There is no
/// reconnect logic: a connection or subscribe failure is reported and the
/// task goes back to waiting for the next selection, which re-runs the
/// connect path.
pub struct FeedSubscriber {
    ws_url: String,
    program_id: Pubkey,
    commitment: String,
    price_offset: usize,
    http: RpcHttpClient,
}

impl FeedSubscriber {
    pub fn new(
        ws_url: &str,
        program_id: Pubkey,
        commitment: &str,
        price_offset: usize,
        http: RpcHttpClient,
    ) -> Self {
        Self {
            ws_url: ws_url.to_string(),
            program_id,
            commitment: commitment.to_string(),
            price_offset,
            http,
        }
    }

    pub async fn run(
        self,
        mut command_rx: mpsc::Receiver<FeedCommand>,
        event_tx: mpsc::Sender<AppEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        let mut conn: Option<WsStream> = None;
        let mut tracker = SubscriptionTracker::new();
        // (request id, feed, derived address) of the subscribe in flight
        let mut pending: Option<(u64, FeedDescriptor, Pubkey)> = None;
        let mut current: Option<(FeedDescriptor, Pubkey)> = None;

        loop {
            tokio::select! {
                cmd = command_rx.recv() => match cmd {
                    Some(FeedCommand::Select(feed)) => {
                        self.select_feed(
                            feed,
                            &mut conn,
                            &mut tracker,
                            &mut pending,
                            &mut current,
                            &event_tx,
                        )
                        .await;
                    }
                    None => break,
                },
                frame = next_frame(&mut conn) => match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        self.handle_text(
                            &text,
                            &mut tracker,
                            &mut pending,
                            &mut current,
                            &event_tx,
                        )
                        .await;
                    }
                    Some(Ok(tungstenite::Message::Ping(_))) => {
                        // tokio-tungstenite answers pings automatically
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "WebSocket read error");
                        let _ = event_tx
                            .send(AppEvent::Error(format!("WebSocket error: {}", e)))
                            .await;
                        drop_connection(&mut conn, &mut tracker, &mut pending, &mut current);
                        let _ = event_tx
                            .send(AppEvent::WsStatus(WsConnectionStatus::Disconnected))
                            .await;
                    }
                    None => {
                        tracing::warn!("WebSocket stream ended");
                        let _ = event_tx
                            .send(AppEvent::Error("WebSocket stream ended".to_string()))
                            .await;
                        drop_connection(&mut conn, &mut tracker, &mut pending, &mut current);
                        let _ = event_tx
                            .send(AppEvent::WsStatus(WsConnectionStatus::Disconnected))
                            .await;
                    }
                },
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        if let Some(mut ws) = conn {
            let _ = ws.close(None).await;
        }
        Ok(())
    }

    async fn select_feed(
        &self,
        feed: FeedDescriptor,
        conn: &mut Option<WsStream>,
        tracker: &mut SubscriptionTracker,
        pending: &mut Option<(u64, FeedDescriptor, Pubkey)>,
        current: &mut Option<(FeedDescriptor, Pubkey)>,
        event_tx: &mpsc::Sender<AppEvent>,
    ) {
        let _ = event_tx
            .send(AppEvent::WsStatus(WsConnectionStatus::Connecting))
            .await;

        if conn.is_none() {
            tracing::info!(url = %self.ws_url, "Connecting to RPC WebSocket");
            match connect_async(&self.ws_url).await {
                Ok((ws, _resp)) => {
                    *conn = Some(ws);
                    tracker.clear();
                    let _ = event_tx
                        .send(AppEvent::LogMessage("WebSocket connected".to_string()))
                        .await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "WebSocket connect failed");
                    let _ = event_tx
                        .send(AppEvent::Error(format!("connect failed: {}", e)))
                        .await;
                    let _ = event_tx
                        .send(AppEvent::WsStatus(WsConnectionStatus::Disconnected))
                        .await;
                    return;
                }
            }
        }

        let address = derive_feed_address(&self.program_id, feed.pyth_lazer_id);
        tracing::info!(feed = %feed.name, address = %address, "Switching feed subscription");
        let _ = event_tx
            .send(AppEvent::FeedAddress(address.to_string()))
            .await;

        let Some(ws) = conn.as_mut() else {
            return;
        };
        for action in tracker.begin_switch() {
            let request = match action {
                WireAction::Unsubscribe {
                    request_id,
                    subscription,
                } => RpcRequest::account_unsubscribe(request_id, subscription),
                WireAction::Subscribe { request_id } => {
                    *pending = Some((request_id, feed.clone(), address));
                    RpcRequest::account_subscribe(
                        request_id,
                        &address.to_string(),
                        &self.commitment,
                    )
                }
            };
            let text = match request.to_text() {
                Ok(text) => text,
                Err(e) => {
                    let _ = event_tx
                        .send(AppEvent::Error(format!("request encode failed: {}", e)))
                        .await;
                    return;
                }
            };
            if let Err(e) = ws.send(tungstenite::Message::Text(text)).await {
                tracing::warn!(error = %e, "WebSocket send failed");
                let _ = event_tx
                    .send(AppEvent::Error(format!("subscribe failed: {}", e)))
                    .await;
                drop_connection(conn, tracker, pending, current);
                let _ = event_tx
                    .send(AppEvent::WsStatus(WsConnectionStatus::Disconnected))
                    .await;
                return;
            }
        }
    }

    async fn handle_text(
        &self,
        text: &str,
        tracker: &mut SubscriptionTracker,
        pending: &mut Option<(u64, FeedDescriptor, Pubkey)>,
        current: &mut Option<(FeedDescriptor, Pubkey)>,
        event_tx: &mpsc::Sender<AppEvent>,
    ) {
        let incoming = match classify_message(text) {
            Ok(incoming) => incoming,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to parse WS message");
                return;
            }
        };

        match incoming {
            WsIncoming::SubscribeAck { id, subscription } => {
                let matches_pending = pending
                    .as_ref()
                    .is_some_and(|(request_id, _, _)| *request_id == id);
                if !matches_pending || !tracker.on_subscribe_ack(id, subscription) {
                    tracing::debug!(id, subscription, "Ignoring unexpected subscribe ack");
                    return;
                }
                let Some((_, feed, address)) = pending.take() else {
                    return;
                };
                tracing::info!(feed = %feed.name, subscription, "Feed subscription active");
                let _ = event_tx
                    .send(AppEvent::WsStatus(WsConnectionStatus::Connected))
                    .await;
                let feed_id = feed.pyth_lazer_id;
                *current = Some((feed, address));

                // Initial snapshot so the UI has a price before the first
                // account change lands.
                match self.http.account_data(&address).await {
                    Ok(data) => {
                        let raw_price =
                            data.and_then(|bytes| decode_raw_price(&bytes, self.price_offset));
                        let _ = event_tx
                            .send(AppEvent::PriceUpdate {
                                feed_id,
                                raw_price,
                                timestamp_ms: now_ms(),
                            })
                            .await;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Initial account fetch failed");
                        let _ = event_tx
                            .send(AppEvent::Error(format!("initial fetch failed: {:#}", e)))
                            .await;
                        let _ = event_tx
                            .send(AppEvent::WsStatus(WsConnectionStatus::Disconnected))
                            .await;
                    }
                }
            }
            WsIncoming::UnsubscribeAck { id, ok } => {
                tracing::debug!(id, ok, "Unsubscribe acknowledged");
            }
            WsIncoming::AccountNotification {
                subscription,
                slot,
                account,
            } => {
                // Notifications from a torn-down subscription are stale.
                if !tracker.is_current(subscription) {
                    tracing::debug!(subscription, "Dropping notification for old subscription");
                    return;
                }
                let Some((feed, _)) = current.as_ref() else {
                    return;
                };
                let raw_price = account
                    .and_then(|a| a.decode_data().ok())
                    .and_then(|bytes| decode_raw_price(&bytes, self.price_offset));
                tracing::trace!(feed = %feed.name, slot, ?raw_price, "Account notification");
                let _ = event_tx
                    .send(AppEvent::PriceUpdate {
                        feed_id: feed.pyth_lazer_id,
                        raw_price,
                        timestamp_ms: now_ms(),
                    })
                    .await;
            }
            WsIncoming::ErrorReply { id, code, message } => {
                let was_pending_subscribe = pending
                    .as_ref()
                    .is_some_and(|(request_id, _, _)| Some(*request_id) == id);
                let _ = event_tx
                    .send(AppEvent::Error(format!(
                        "RPC error (code {}): {}",
                        code, message
                    )))
                    .await;
                if was_pending_subscribe {
                    *pending = None;
                    let _ = event_tx
                        .send(AppEvent::WsStatus(WsConnectionStatus::Disconnected))
                        .await;
                }
            }
            WsIncoming::Other => {}
        }
    }
}

fn drop_connection(
    conn: &mut Option<WsStream>,
    tracker: &mut SubscriptionTracker,
    pending: &mut Option<(u64, FeedDescriptor, Pubkey)>,
    current: &mut Option<(FeedDescriptor, Pubkey)>,
) {
    *conn = None;
    *pending = None;
    *current = None;
    tracker.clear();
}

async fn next_frame(
    conn: &mut Option<WsStream>,
) -> Option<Result<tungstenite::Message, tungstenite::Error>> {
    match conn.as_mut() {
        Some(ws) => ws.next().await,
        None => std::future::pending().await,
    }
}

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
