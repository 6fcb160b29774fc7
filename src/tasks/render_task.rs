//! Render background task

use tokio::sync::watch;
use tracing::{debug, info};

use crate::{
    display::{DisplayPresenter, RenderSink},
    state::TimerSnapshot,
};

/// Background task that re-renders the display after every timer update.
///
/// `updates_rx` is the engine's update channel; the current state is rendered
/// immediately so the sink never starts out blank. Returns when the engine is dropped.
pub async fn render_task<S>(
    mut updates_rx: watch::Receiver<TimerSnapshot>,
    presenter: DisplayPresenter,
    mut sink: S,
) where
    S: RenderSink + Send,
{
    info!("Starting render task");

    let mut last_title = String::new();

    loop {
        let snapshot = updates_rx.borrow_and_update().clone();
        let frame = presenter.present(&snapshot);

        if frame.title != last_title {
            debug!("Window title: {}", frame.title);
            last_title.clone_from(&frame.title);
        }
        frame.render_to(&mut sink);

        if updates_rx.changed().await.is_err() {
            info!("Timer update channel closed, render task exiting");
            break;
        }
    }
}
