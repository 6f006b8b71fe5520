use crate::core::app::App;
use crate::core::router::{self, Route, RouteDecision, ScreenSet};
use crate::ui::screens::{self, centered};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Main screens in function-key order.
const TABS: [Route; 5] = [
    Route::Dashboard,
    Route::Chat,
    Route::Lessons,
    Route::Timeline,
    Route::Profile,
];

pub fn ui(f: &mut Frame, app: &App, theme: &Theme) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(f.area());

    let shown = visible_route(app);
    render_header(f, header, app, shown, theme);

    match shown {
        None => {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "Loading your journey…",
                theme.muted,
            )))
            .alignment(Alignment::Center);
            f.render_widget(paragraph, centered(body, body.width, 1));
        }
        Some(Route::Auth) => screens::auth::render(f, body, app, theme),
        Some(Route::Onboarding) => screens::onboarding::render(f, body, app, theme),
        Some(Route::Dashboard) => screens::dashboard::render(f, body, app, theme),
        Some(Route::Chat) => screens::chat::render(f, body, app, theme),
        Some(Route::Lessons) => screens::lessons::render(f, body, app, theme),
        Some(Route::Timeline) => screens::timeline::render(f, body, app, theme),
        Some(Route::Profile) => screens::profile::render(f, body, app, theme),
    }

    render_footer(f, footer, app, shown, theme);
}

/// The route to draw this frame. The router is consulted against the live
/// session, so a screen the session no longer allows is never drawn while
/// its `SessionChanged` action is still queued.
fn visible_route(app: &App) -> Option<Route> {
    match router::resolve(&app.session.current(), app.route) {
        RouteDecision::Render(route) if app.route == Some(route) => Some(route),
        _ => None,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App, shown: Option<Route>, theme: &Theme) {
    let mut spans = vec![Span::styled(
        format!("Evolance v{} ", env!("CARGO_PKG_VERSION")),
        theme.title,
    )];
    let on_main = ScreenSet::for_session(&app.session.current()) == Some(ScreenSet::Main);
    if on_main {
        for (index, route) in TABS.iter().enumerate() {
            if index > 0 {
                spans.push(Span::styled(" │ ", theme.muted));
            }
            let style = if shown == Some(*route) {
                theme.selection
            } else {
                theme.accent
            };
            spans.push(Span::styled(
                format!("F{} {}", index + 1, route.title()),
                style,
            ));
        }
    } else if let Some(route) = shown {
        spans.push(Span::styled(format!("• {}", route.title()), theme.accent));
    }
    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::BOTTOM).border_style(theme.muted));
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App, shown: Option<Route>, theme: &Theme) {
    let line = match &app.status {
        Some(status) => Line::from(Span::styled(status.clone(), theme.accent)),
        None => Line::from(Span::styled(key_hints(app, shown), theme.muted)),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn key_hints(app: &App, shown: Option<Route>) -> &'static str {
    if shown.is_some() && app.has_composer() {
        return match shown {
            Some(Route::Lessons) => "Enter submit • Tab change rating • Esc cancel",
            _ => "Enter save • Esc cancel",
        };
    }
    match shown {
        None => "Ctrl+C quit",
        Some(Route::Auth) => "Enter submit • Tab next field • Ctrl+T login/register • Ctrl+C quit",
        Some(Route::Onboarding) => "↑↓ or 1-9 choose • Enter next • ← previous • Ctrl+C quit",
        Some(Route::Dashboard) => {
            "↑↓ move • Tab stories/tasks • Enter start/complete • c chat • n new task"
        }
        Some(Route::Chat) => "Enter send • PgUp/PgDn scroll • Ctrl+C quit",
        Some(Route::Lessons) => "↑↓ choose lesson • w write review • Ctrl+C quit",
        Some(Route::Timeline) => "↑↓ move • n new decision • s advance status • Ctrl+C quit",
        Some(Route::Profile) => "l log out • Ctrl+C quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CurrentUser, FulfillmentEntry};
    use crate::core::app::screens::{DashboardData, TimelineData};
    use crate::core::resource::Resource;
    use crate::core::session::{test_channel, SessionState};
    use ratatui::{backend::TestBackend, Terminal};

    fn member() -> CurrentUser {
        CurrentUser {
            id: "user-1".to_string(),
            email: "ada@example.com".to_string(),
            full_name: "Ada Byron".to_string(),
            personality_test_completed: true,
            is_active: Some(true),
            created_at: None,
            spiritual_level: None,
            profile_picture: None,
        }
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).expect("test terminal");
        terminal
            .draw(|f| ui(f, app, &Theme::default()))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn dashboard_app() -> (tokio::sync::watch::Sender<SessionState>, App) {
        let (tx, handle) = test_channel(SessionState::Authenticated(member()));
        let mut app = App::new(handle, None);
        app.sync_route();
        app.dashboard.data = Resource::Ready(DashboardData::default());
        (tx, app)
    }

    #[test]
    fn dashboard_draws_for_a_member() {
        let (_tx, app) = dashboard_app();
        let screen = draw(&app);
        assert!(screen.contains("Welcome back, Ada"));
        assert!(screen.contains("F1 Dashboard"));
        assert!(screen.contains("Emotional state is unavailable"));
    }

    #[test]
    fn timeline_lists_recent_check_ins() {
        let (_tx, handle) = test_channel(SessionState::Authenticated(member()));
        let mut app = App::new(handle, Some(Route::Timeline));
        app.sync_route();
        app.timeline.data = Resource::Ready(TimelineData {
            history: vec![FulfillmentEntry {
                id: "f1".to_string(),
                decision_id: None,
                fulfillment_level: 72,
                happiness_level: 60,
                clarity_level: 55,
                confidence_level: 50,
                notes: "Slept well".to_string(),
                timestamp: Some("2024-03-02T09:00:00".to_string()),
            }],
            ..TimelineData::default()
        });

        let screen = draw(&app);
        assert!(screen.contains("Recent check-ins"));
        assert!(screen.contains("Mar 2"));
        assert!(screen.contains("72% Slept well"));
    }

    #[test]
    fn logged_out_session_hides_the_stale_screen() {
        let (tx, app) = dashboard_app();
        tx.send_replace(SessionState::Anonymous);

        assert_eq!(app.route, Some(Route::Dashboard));
        let screen = draw(&app);
        assert!(!screen.contains("Welcome back"));
        assert!(screen.contains("Loading your journey"));
    }

    #[test]
    fn resolving_session_shows_only_the_loading_view() {
        let (tx, app) = dashboard_app();
        tx.send_replace(SessionState::Resolving);

        let screen = draw(&app);
        assert!(!screen.contains("Stories"));
        assert!(screen.contains("Loading your journey"));
    }
}
