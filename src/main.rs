//! Sit/Stand - a sit/stand interval timer with desktop notifications
//!
//! This is the main entry point for the sit-stand application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use sit_stand::{
    api::create_router,
    config::Config,
    services::{DesktopNotifier, JsonPreferenceStore, MemoryPreferenceStore, Notifier, PreferenceStore},
    state::AppState,
    tasks::{notification_dispatcher_task, preference_writer_task, ticker_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("sit_stand={},tower_http=info", config.log_level()))
        .init();

    info!("Starting sit-stand v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn PreferenceStore> = if config.ephemeral {
        Arc::new(MemoryPreferenceStore::new())
    } else {
        Arc::new(JsonPreferenceStore::new(&config.preferences))
    };
    let notifier: Arc<dyn Notifier> = Arc::new(DesktopNotifier::new(config.notifier()));

    let timer_config = store.load_or_default();
    info!(
        "Configuration: host={}, port={}, sit={}min, stand={}min",
        config.host, config.port, timer_config.sit_minutes, timer_config.stand_minutes
    );

    // Create application state
    let (state, queues) = AppState::new(config.port, config.host.clone(), timer_config);
    let state = Arc::new(state);

    // Start the background tasks
    let tasks = [
        tokio::spawn(ticker_task(Arc::clone(&state))),
        tokio::spawn(preference_writer_task(queues.persist_rx, store)),
        tokio::spawn(notification_dispatcher_task(queues.notify_rx, notifier)),
    ];

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start       - Start sitting");
    info!("  POST /pause       - Pause the countdown");
    info!("  POST /resume      - Resume the countdown");
    info!("  POST /stop        - Stop and return to idle");
    info!("  POST /restart     - Start over from sitting");
    info!("  GET  /preferences - Current interval lengths");
    info!("  PUT  /preferences - Change interval lengths");
    info!("  GET  /status      - Current phase and remaining time");
    info!("  GET  /events      - Timer event stream (SSE)");
    info!("  GET  /health      - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Cancel the ticker and drop pending side effects
    for task in tasks {
        task.abort();
    }

    info!("Server shutdown complete");
    Ok(())
}
