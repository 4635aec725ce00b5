use lazer_watch::catalog::FeedCatalog;
use lazer_watch::event::{AppEvent, WsConnectionStatus};
use lazer_watch::ui::AppState;

fn state_with_btc() -> AppState {
    let catalog = FeedCatalog::bundled().unwrap();
    let btc = catalog.by_name("BTCUSD").unwrap().clone();
    let mut state = AppState::new(catalog, 5_000, 600);
    state.on_feed_selected(btc, 1_000);
    state
}

#[test]
/// Price updates for the selected feed drive the counter, the formatted
/// price and the game engine's series.
fn price_update_flows_into_state_and_engine() {
    let mut state = state_with_btc();
    state.apply(AppEvent::PriceUpdate {
        feed_id: 1,
        raw_price: Some(6_412_345_678_900),
        timestamp_ms: 1_100,
    });

    assert_eq!(state.update_count, 1);
    assert_eq!(state.formatted_price().as_deref(), Some("64,123.457"));
    assert_eq!(state.engine.series().len(), 1);
}

#[test]
/// Updates for a feed other than the selected one are dropped: stale
/// notifications from a previous subscription never pollute the series.
fn updates_for_other_feeds_are_ignored() {
    let mut state = state_with_btc();
    state.apply(AppEvent::PriceUpdate {
        feed_id: 99,
        raw_price: Some(1),
        timestamp_ms: 1_100,
    });
    assert_eq!(state.update_count, 0);
    assert!(state.engine.series().is_empty());
}

#[test]
fn null_price_counts_the_update_but_adds_no_sample() {
    let mut state = state_with_btc();
    state.apply(AppEvent::PriceUpdate {
        feed_id: 1,
        raw_price: None,
        timestamp_ms: 1_100,
    });
    assert_eq!(state.update_count, 1);
    assert!(state.formatted_price().is_none());
    assert!(state.engine.series().is_empty());
}

#[test]
fn update_metrics_follow_the_subscription_clock() {
    let mut state = state_with_btc();
    for i in 0..4 {
        state.apply(AppEvent::PriceUpdate {
            feed_id: 1,
            raw_price: Some(100 + i),
            timestamp_ms: 1_000 + i * 500,
        });
    }
    // selected at t=1000, observed at t=3000: 4 updates over 2 seconds
    assert!((state.updates_per_second(3_000) - 2.0).abs() < 1e-9);
    assert!((state.ms_per_update(3_000) - 500.0).abs() < 1e-9);
}

#[test]
fn reselecting_resets_stream_state() {
    let mut state = state_with_btc();
    state.apply(AppEvent::PriceUpdate {
        feed_id: 1,
        raw_price: Some(500),
        timestamp_ms: 1_100,
    });
    let eth = state.catalog.by_name("ETHUSD").unwrap().clone();
    state.on_feed_selected(eth, 2_000);

    assert_eq!(state.update_count, 0);
    assert!(state.raw_price.is_none());
    assert!(state.feed_address.is_none());
    assert!(state.engine.series().is_empty());
}

#[test]
fn selector_search_narrows_and_selects() {
    let mut state = state_with_btc();
    state.open_selector();
    for c in "solana".chars() {
        state.selector_input(c);
    }
    let filtered = state.filtered_feeds();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "SOLUSD");
    assert_eq!(state.selector_current().unwrap().name, "SOLUSD");
}

#[test]
fn status_and_errors_land_in_the_log() {
    let mut state = state_with_btc();
    state.apply(AppEvent::WsStatus(WsConnectionStatus::Connected));
    assert_eq!(state.ws_status, WsConnectionStatus::Connected);

    state.apply(AppEvent::Error("subscribe failed".to_string()));
    assert!(state
        .log_messages
        .iter()
        .any(|m| m.contains("subscribe failed")));

    state.apply(AppEvent::FeedAddress("SomeAddr".to_string()));
    assert_eq!(state.feed_address.as_deref(), Some("SomeAddr"));
}
