use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use clap::Parser;
use pomodoro_timer::{
    create_router,
    services::SilentAlarm,
    tasks::render_task,
    AppState, Config,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> (Router, Arc<AppState>) {
    let config = Config::parse_from(["pomodoro-timer"]);
    let state = Arc::new(AppState::new(&config, Arc::new(SilentAlarm)));
    (create_router(Arc::clone(&state)), state)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_version() {
    let (app, _) = app();
    let (status, body) = call(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test(start_paused = true)]
async fn toggle_starts_and_pauses() {
    let (app, _) = app();

    let (status, body) = call(&app, "POST", "/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["phase"], "running");
    assert_eq!(body["display"]["buttonLabel"], "PAUSE");

    tokio::time::sleep(Duration::from_millis(3500)).await;

    let (_, body) = call(&app, "POST", "/toggle", None).await;
    assert_eq!(body["message"], "Timer paused");
    assert_eq!(body["timer"]["remainingSeconds"], 1497);
    assert_eq!(body["display"]["timeText"], "24:57");
    assert_eq!(body["display"]["title"], "24:57 - Pomodoro");
    assert_eq!(body["display"]["buttonLabel"], "START");
}

#[tokio::test(start_paused = true)]
async fn mode_selection_validates_the_key() {
    let (app, _) = app();

    let (status, body) = call(&app, "POST", "/mode/short-break", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["activeMode"], "short-break");
    assert_eq!(body["timer"]["totalSeconds"], 300);
    assert_eq!(body["display"]["timeText"], "5:00");

    let (status, body) = call(&app, "POST", "/mode/coffee-break", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "unknown timer mode: coffee-break");

    let (_, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(body["timer"]["activeMode"], "short-break");
}

#[tokio::test(start_paused = true)]
async fn submitted_settings_are_clamped_and_applied() {
    let (app, _) = app();

    let (status, body) = call(
        &app,
        "POST",
        "/settings",
        Some(json!({
            "pomodoro": "10",
            "shortBreak": "soon",
            "longBreak": 120,
            "font": "roboto"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["totalSeconds"], 600);
    assert_eq!(body["display"]["themeClass"], "font-roboto theme-red");

    let (_, settings) = call(&app, "GET", "/settings", None).await;
    assert_eq!(settings["pomodoro"], 10);
    assert_eq!(settings["shortBreak"], 1);
    assert_eq!(settings["longBreak"], 60);
    assert_eq!(settings["font"], "roboto");
    assert_eq!(settings["color"], "red");
}

#[tokio::test(start_paused = true)]
async fn settings_panel_pauses_and_resumes_a_running_timer() {
    let (app, _) = app();
    call(&app, "POST", "/toggle", None).await;

    let (status, form) = call(&app, "POST", "/settings/open", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["pomodoro"], 25);

    let (_, status_body) = call(&app, "GET", "/status", None).await;
    assert_eq!(status_body["timer"]["isRunning"], false);
    assert_eq!(status_body["settingsPanel"]["open"], true);
    assert_eq!(status_body["settingsPanel"]["pausedBySettings"], true);
    assert_eq!(status_body["lastAction"], "settings-open");
    assert!(status_body.get("settings_panel").is_none());
    assert!(status_body["lastActionTime"].is_string());

    let (_, body) = call(&app, "POST", "/settings/close", None).await;
    assert_eq!(body["timer"]["isRunning"], true);

    let (_, status_body) = call(&app, "GET", "/status", None).await;
    assert_eq!(status_body["settingsPanel"]["pausedBySettings"], false);
}

#[tokio::test(start_paused = true)]
async fn display_reflects_the_render_task() {
    let (app, state) = app();
    tokio::spawn(render_task(
        state.engine.subscribe(),
        state.presenter,
        state.frames.clone(),
    ));

    call(&app, "POST", "/mode/long-break", None).await;
    call(&app, "POST", "/toggle", None).await;
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let (status, view) = call(&app, "GET", "/display", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["time"], "14:59");
    assert_eq!(view["windowTitle"], "14:59 - Pomodoro");
    assert_eq!(view["buttonLabel"], "PAUSE");
    assert_eq!(view["activeMode"], "long-break");
}

#[tokio::test(start_paused = true)]
async fn oversized_durations_are_clamped_before_reaching_the_timer() {
    let config = Config::parse_from(["pomodoro-timer", "--max-minutes", "4294967295"]);
    let state = Arc::new(AppState::new(&config, Arc::new(SilentAlarm)));
    let app = create_router(Arc::clone(&state));

    let (status, body) = call(
        &app,
        "POST",
        "/settings",
        Some(json!({ "pomodoro": 100000000, "shortBreak": 5, "longBreak": 15 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let max_minutes = u32::MAX / 60;
    assert_eq!(body["timer"]["settings"]["pomodoro"], max_minutes);
    assert_eq!(body["timer"]["totalSeconds"], max_minutes * 60);
    assert_eq!(body["timer"]["remainingSeconds"], max_minutes * 60);
}
