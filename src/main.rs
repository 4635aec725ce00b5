use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode};
use tokio::sync::{mpsc, watch};

use lazer_watch::catalog::FeedCatalog;
use lazer_watch::config::Config;
use lazer_watch::event::{AppEvent, FeedCommand};
use lazer_watch::input::{parse_main_command, parse_selector_command, SelectorCommand, UiCommand};
use lazer_watch::rpc::http::RpcHttpClient;
use lazer_watch::rpc::ws::FeedSubscriber;
use lazer_watch::ui::{self, AppState};

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    // Log to file so output doesn't interfere with the TUI
    let log_file = std::fs::File::create("lazer-watch.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(
        http_url = %config.rpc.http_url,
        ws_url = %config.rpc.ws_url,
        program_id = %config.rpc.program_id,
        price_offset = config.rpc.price_offset,
        "Starting lazer-watch (price offset follows the on-chain account layout)"
    );

    let catalog = FeedCatalog::bundled().context("failed to load feed catalog")?;
    let program_id = config.rpc.program_pubkey()?;

    // Channels
    let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(256);
    let (command_tx, command_rx) = mpsc::channel::<FeedCommand>(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Subscription task
    let subscriber = FeedSubscriber::new(
        &config.rpc.ws_url,
        program_id,
        &config.rpc.commitment,
        config.rpc.price_offset,
        RpcHttpClient::new(&config.rpc.http_url, &config.rpc.commitment),
    );
    let subscriber_shutdown = shutdown_rx.clone();
    let subscriber_events = event_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = subscriber
            .run(command_rx, subscriber_events, subscriber_shutdown)
            .await
        {
            tracing::error!(error = %e, "Feed subscriber task failed");
        }
    });

    // Ctrl+C handler
    let ctrl_c_shutdown = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = ctrl_c_shutdown.send(true);
    });

    // TUI main loop
    let mut terminal = ratatui::init();
    let mut app_state = AppState::new(catalog, config.chart.window_ms, config.chart.max_points);
    app_state.push_log("lazer-watch started".to_string());

    // Subscribe to the default feed right away, like the original template
    // opens on BTCUSD.
    if let Some(feed) = app_state.catalog.by_name(&config.ui.default_feed).cloned() {
        app_state.on_feed_selected(feed.clone(), now_ms());
        let _ = command_tx.try_send(FeedCommand::Select(feed));
    } else {
        app_state.push_log(format!(
            "Default feed '{}' not in catalog",
            config.ui.default_feed
        ));
    }

    loop {
        let now = now_ms();
        app_state.tick(now);

        terminal.draw(|frame| ui::render(frame, &app_state, now))?;

        // Handle input (non-blocking with timeout)
        if crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
                    && !app_state.selector_open
                {
                    tracing::info!("User quit");
                    let _ = shutdown_tx.send(true);
                    break;
                }
                if app_state.selector_open {
                    if let Some(cmd) = parse_selector_command(&key.code) {
                        match cmd {
                            SelectorCommand::Input(c) => app_state.selector_input(c),
                            SelectorCommand::Backspace => app_state.selector_backspace(),
                            SelectorCommand::Up => app_state.selector_up(),
                            SelectorCommand::Down => app_state.selector_down(),
                            SelectorCommand::Close => app_state.close_selector(),
                            SelectorCommand::Select => {
                                if let Some(feed) = app_state.selector_current() {
                                    app_state.close_selector();
                                    app_state.on_feed_selected(feed.clone(), now_ms());
                                    if command_tx.try_send(FeedCommand::Select(feed)).is_err() {
                                        tracing::warn!("Feed command channel full");
                                    }
                                }
                            }
                        }
                    }
                } else if let Some(cmd) = parse_main_command(&key.code) {
                    match cmd {
                        UiCommand::Flap => app_state.flap(),
                        UiCommand::OpenFeedSelector => app_state.open_selector(),
                    }
                }
            }
        }

        // Drain events from the subscription task
        while let Ok(event) = event_rx.try_recv() {
            app_state.apply(event);
        }

        // Check shutdown
        if *shutdown_rx.borrow() {
            break;
        }
    }

    ratatui::restore();
    tracing::info!("Shutdown complete");
    println!("Goodbye! Check lazer-watch.log for details.");
    Ok(())
}
