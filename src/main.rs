//! Pomodoro Timer - a Pomodoro countdown engine behind a small HTTP host
//!
//! This is the main entry point for the pomodoro-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::render_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, durations={}/{}/{}min, bounds={}-{}min",
          config.host, config.port, config.pomodoro, config.short_break, config.long_break,
          config.min_minutes, config.max_minutes);
    match &config.alarm_command {
        Some(program) => info!("Alarm command: {} {:?}", program, config.alarm_args),
        None => info!("No alarm command configured, completions are only logged"),
    }

    // Create application state
    let state = Arc::new(AppState::new(&config, config.alarm()));

    // Start the render task feeding GET /display
    tokio::spawn(render_task(
        state.engine.subscribe(),
        state.presenter,
        state.frames.clone(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /mode/:mode       - Select pomodoro, short-break or long-break");
    info!("  POST /toggle           - Start or pause the timer");
    info!("  GET  /settings         - Current settings");
    info!("  POST /settings         - Apply settings");
    info!("  POST /settings/open    - Open settings panel (pauses a running timer)");
    info!("  POST /settings/close   - Close settings panel");
    info!("  GET  /display          - Latest rendered view");
    info!("  GET  /status           - Timer and panel status");
    info!("  GET  /health           - Health check");

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

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
