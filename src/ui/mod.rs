pub mod dashboard;
pub mod game_chart;
pub mod price_panel;
pub mod selector;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::catalog::{FeedCatalog, FeedDescriptor};
use crate::event::{AppEvent, WsConnectionStatus};
use crate::feed::decode::scale_price;
use crate::game::engine::{FrameInput, GameEngine};
use crate::model::price::format_price;

use dashboard::{KeybindBar, LogPanel, StatusBar};
use game_chart::GameChart;
use price_panel::PricePanel;
use selector::{centered_rect, FeedSelector};

const MAX_LOG_MESSAGES: usize = 200;

pub struct AppState {
    pub catalog: FeedCatalog,
    pub selected_feed: Option<FeedDescriptor>,
    pub feed_address: Option<String>,
    pub raw_price: Option<u64>,
    pub ws_status: WsConnectionStatus,
    pub update_count: u64,
    pub metrics_since_ms: Option<u64>,
    pub engine: GameEngine,
    pub log_messages: Vec<String>,
    pub selector_open: bool,
    pub search_term: String,
    pub selector_index: usize,
    pending_flap: bool,
}

impl AppState {
    pub fn new(catalog: FeedCatalog, window_ms: u64, max_points: usize) -> Self {
        Self {
            catalog,
            selected_feed: None,
            feed_address: None,
            raw_price: None,
            ws_status: WsConnectionStatus::Disconnected,
            update_count: 0,
            metrics_since_ms: None,
            engine: GameEngine::new(window_ms, max_points),
            log_messages: Vec::new(),
            selector_open: false,
            search_term: String::new(),
            selector_index: 0,
            pending_flap: false,
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    /// Record a new selection: reset the stream-derived state. The caller is
    /// responsible for sending the matching `FeedCommand::Select`.
    pub fn on_feed_selected(&mut self, feed: FeedDescriptor, now_ms: u64) {
        self.push_log(format!("Selected feed {}", feed.name));
        self.selected_feed = Some(feed);
        self.feed_address = None;
        self.raw_price = None;
        self.update_count = 0;
        self.metrics_since_ms = Some(now_ms);
        self.engine.reset();
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::PriceUpdate {
                feed_id,
                raw_price,
                timestamp_ms,
            } => {
                let Some(feed) = self.selected_feed.as_ref() else {
                    return;
                };
                if feed.pyth_lazer_id != feed_id {
                    return;
                }
                self.update_count += 1;
                self.raw_price = raw_price;
                if let Some(raw) = raw_price {
                    self.engine
                        .push_sample(timestamp_ms, scale_price(raw, feed.exponent));
                }
            }
            AppEvent::WsStatus(status) => {
                self.ws_status = status;
            }
            AppEvent::FeedAddress(address) => {
                self.push_log(format!("Watching account {}", address));
                self.feed_address = Some(address);
            }
            AppEvent::LogMessage(msg) => self.push_log(msg),
            AppEvent::Error(msg) => {
                self.push_log(format!("ERROR: {}", msg));
            }
        }
    }

    /// Queue the discrete game input for the next frame.
    pub fn flap(&mut self) {
        self.pending_flap = true;
    }

    /// Advance the engine one frame.
    pub fn tick(&mut self, now_ms: u64) {
        let flap = std::mem::take(&mut self.pending_flap);
        self.engine.step(FrameInput { now_ms, flap });
    }

    pub fn formatted_price(&self) -> Option<String> {
        let feed = self.selected_feed.as_ref()?;
        let raw = self.raw_price?;
        Some(format_price(raw, feed.exponent))
    }

    pub fn updates_per_second(&self, now_ms: u64) -> f64 {
        match self.metrics_since_ms {
            Some(since) if self.update_count > 0 => {
                let elapsed_s = now_ms.saturating_sub(since) as f64 / 1_000.0;
                if elapsed_s > 0.0 {
                    self.update_count as f64 / elapsed_s
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }

    pub fn ms_per_update(&self, now_ms: u64) -> f64 {
        match self.metrics_since_ms {
            Some(since) if self.update_count > 0 => {
                now_ms.saturating_sub(since) as f64 / self.update_count as f64
            }
            _ => 0.0,
        }
    }

    pub fn filtered_feeds(&self) -> Vec<&FeedDescriptor> {
        self.catalog.filter(&self.search_term)
    }

    pub fn open_selector(&mut self) {
        self.selector_open = true;
        self.search_term.clear();
        self.selector_index = 0;
    }

    pub fn close_selector(&mut self) {
        self.selector_open = false;
        self.search_term.clear();
        self.selector_index = 0;
    }

    pub fn selector_input(&mut self, c: char) {
        self.search_term.push(c);
        self.selector_index = 0;
    }

    pub fn selector_backspace(&mut self) {
        self.search_term.pop();
        self.selector_index = 0;
    }

    pub fn selector_up(&mut self) {
        self.selector_index = self.selector_index.saturating_sub(1);
    }

    pub fn selector_down(&mut self) {
        let count = self.filtered_feeds().len();
        if count > 0 && self.selector_index < count - 1 {
            self.selector_index += 1;
        }
    }

    /// Feed currently highlighted in the selector.
    pub fn selector_current(&self) -> Option<FeedDescriptor> {
        self.filtered_feeds()
            .get(self.selector_index)
            .map(|f| (*f).clone())
    }
}

pub fn render(frame: &mut Frame, app: &AppState, now_ms: u64) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Min(10),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            feed_name: app.selected_feed.as_ref().map(|f| f.name.as_str()),
            status: app.ws_status,
            update_count: app.update_count,
        },
        chunks[0],
    );

    frame.render_widget(
        PricePanel {
            feed: app.selected_feed.as_ref(),
            formatted_price: app.formatted_price(),
            feed_address: app.feed_address.as_deref(),
            update_count: app.update_count,
            updates_per_second: app.updates_per_second(now_ms),
            ms_per_update: app.ms_per_update(now_ms),
        },
        chunks[1],
    );

    let scene = app.engine.scene(now_ms);
    frame.render_widget(GameChart::new(&scene), chunks[2]);

    frame.render_widget(LogPanel::new(&app.log_messages), chunks[3]);
    frame.render_widget(KeybindBar, chunks[4]);

    if app.selector_open {
        let feeds = app.filtered_feeds();
        let popup = centered_rect(frame.area(), 64, 18);
        frame.render_widget(
            FeedSelector {
                search_term: &app.search_term,
                feeds: &feeds,
                selected_index: app.selector_index,
            },
            popup,
        );
    }
}
