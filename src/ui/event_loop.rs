//! Input polling, action dispatch and drawing.
//!
//! The loop owns the [`App`]. Terminal input is translated into actions by
//! [`keys`](crate::ui::keys); background tasks report back through the same
//! action channel, so every state change happens here, in order.

use std::{error::Error, sync::Arc, time::Duration};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::core::app::{apply_actions, App, AppAction, AppActionDispatcher};
use crate::core::router::Route;
use crate::core::session::SessionController;
use crate::ui::executor::execute;
use crate::ui::keys::{actions_for_key, actions_for_paste};
use crate::ui::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use crate::ui::renderer::ui;
use crate::ui::theme::Theme;

const MAX_FPS: u64 = 60;
const STATUS_TIMEOUT: Duration = Duration::from_secs(4);

/// Expires the footer status after [`STATUS_TIMEOUT`]. A different message
/// restarts the clock.
#[derive(Debug, Default)]
struct StatusTimer {
    shown: Option<(String, Instant)>,
}

impl StatusTimer {
    /// True once `status` has been on screen long enough to clear.
    fn expired(&mut self, status: Option<&str>, now: Instant) -> bool {
        match (status, &self.shown) {
            (None, _) => {
                self.shown = None;
                false
            }
            (Some(text), Some((shown, since))) if shown == text => {
                if now.duration_since(*since) < STATUS_TIMEOUT {
                    return false;
                }
                self.shown = None;
                true
            }
            (Some(text), _) => {
                self.shown = Some((text.to_string(), now));
                false
            }
        }
    }
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<Event>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Forward every session transition into the action queue.
fn spawn_session_watcher(
    session: &SessionController,
    dispatcher: AppActionDispatcher,
) -> tokio::task::JoinHandle<()> {
    let mut handle = session.handle();
    tokio::spawn(async move {
        while handle.changed().await {
            dispatcher.dispatch(AppAction::SessionChanged);
        }
    })
}

fn actions_for_event(app: &App, event: Event) -> (Vec<AppAction>, bool) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => (actions_for_key(app, &key), true),
        Event::Paste(text) => (actions_for_paste(app, &text), true),
        Event::Resize(..) => (Vec::new(), true),
        _ => (Vec::new(), false),
    }
}

/// Apply queued actions and spawn the work they ask for. Returns whether
/// anything was applied.
fn drain_action_queue(
    app: &mut App,
    session: &Arc<SessionController>,
    dispatcher: &AppActionDispatcher,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(action) = action_rx.try_recv() {
        pending.push(action);
    }
    if pending.is_empty() {
        return false;
    }
    let commands = apply_actions(app, pending);
    for command in commands {
        execute(command, session, dispatcher);
    }
    true
}

fn try_draw_frame(
    app: &App,
    theme: &Theme,
    terminal: &mut ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> std::io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }
    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }
    terminal.draw(|f| ui(f, app, theme))?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

async fn run_loop(
    app: &mut App,
    session: &Arc<SessionController>,
    terminal: &SharedTerminal,
) -> Result<(), Box<dyn Error>> {
    let theme = Theme::default();
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let dispatcher = AppActionDispatcher::new(action_tx);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let event_reader = spawn_event_reader(event_tx);
    let session_watcher = spawn_session_watcher(session, dispatcher.clone());

    {
        let session = Arc::clone(session);
        tokio::spawn(async move {
            let state = session.bootstrap().await;
            debug!(settled = state.is_settled(), "session bootstrapped");
        });
    }
    // The session may already be settled, e.g. when the CLI resolved it.
    dispatcher.dispatch(AppAction::SessionChanged);

    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;
    let mut status_timer = StatusTimer::default();

    let result = loop {
        if app.exit_requested {
            break Ok(());
        }

        {
            let mut guard = terminal.lock().await;
            if let Err(err) = try_draw_frame(
                app,
                &theme,
                &mut guard,
                &mut request_redraw,
                &mut last_draw,
                frame_duration,
            ) {
                break Err(err.into());
            }
        }

        let mut events_processed = false;
        while let Ok(event) = event_rx.try_recv() {
            events_processed = true;
            let (actions, redraw) = actions_for_event(app, event);
            request_redraw |= redraw;
            dispatcher.dispatch_many(actions);
        }

        if drain_action_queue(app, session, &dispatcher, &mut action_rx) {
            request_redraw = true;
        }

        if status_timer.expired(app.status.as_deref(), Instant::now()) {
            dispatcher.dispatch(AppAction::ClearStatus);
        }

        if !events_processed && !request_redraw {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    event_reader.abort();
    session_watcher.abort();
    result
}

/// Run the full-screen client until the user quits.
pub async fn run_ui(
    session: Arc<SessionController>,
    requested: Option<Route>,
) -> Result<(), Box<dyn Error>> {
    info!(route = ?requested, "starting terminal UI");
    let mut app = App::new(session.handle(), requested);
    let terminal = setup_terminal()?;
    let result = run_loop(&mut app, &session, &terminal).await;
    restore_terminal(&terminal).await?;
    info!("terminal UI closed");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_clears_after_timeout() {
        let start = Instant::now();
        let mut timer = StatusTimer::default();

        assert!(!timer.expired(Some("Task added"), start));
        assert!(!timer.expired(Some("Task added"), start + Duration::from_secs(3)));
        assert!(timer.expired(Some("Task added"), start + STATUS_TIMEOUT));
    }

    #[test]
    fn replacement_message_restarts_the_timeout() {
        let start = Instant::now();
        let mut timer = StatusTimer::default();

        assert!(!timer.expired(Some("Task added"), start));
        let replaced = start + Duration::from_millis(3900);
        assert!(!timer.expired(Some("Review saved"), replaced));
        assert!(!timer.expired(Some("Review saved"), start + STATUS_TIMEOUT));
        assert!(timer.expired(Some("Review saved"), replaced + STATUS_TIMEOUT));
    }

    #[test]
    fn cleared_status_resets_the_timer() {
        let start = Instant::now();
        let mut timer = StatusTimer::default();

        assert!(!timer.expired(Some("Saved"), start));
        assert!(!timer.expired(None, start + Duration::from_secs(1)));
        let again = start + Duration::from_secs(2);
        assert!(!timer.expired(Some("Saved"), again));
        assert!(!timer.expired(Some("Saved"), start + STATUS_TIMEOUT));
        assert!(timer.expired(Some("Saved"), again + STATUS_TIMEOUT));
    }
}
