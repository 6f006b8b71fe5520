//! Key bindings for each screen.
//!
//! Keys are translated into [`AppAction`]s; nothing here touches the state.
//! Global bindings (quit and screen switching) win over screen bindings, and
//! an open composer captures every other key.

use crate::core::app::{App, AppAction};
use crate::core::router::Route;
use crate::utils::text_field::{edit_action_for_key, EditAction};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn actions_for_key(app: &App, key: &KeyEvent) -> Vec<AppAction> {
    if let Some(action) = global_action(key) {
        return vec![action];
    }
    let Some(route) = app.route else {
        return Vec::new();
    };
    if app.has_composer() {
        return composer_actions(route, key);
    }
    if key.code == KeyCode::Char('r') && key.modifiers.is_empty() && app.current_failed() {
        return vec![AppAction::Retry];
    }
    match route {
        Route::Auth => auth_actions(key),
        Route::Onboarding => onboarding_actions(key),
        Route::Dashboard => dashboard_actions(key),
        Route::Chat => chat_actions(app, key),
        Route::Lessons => lessons_actions(key),
        Route::Timeline => timeline_actions(key),
        Route::Profile => profile_actions(key),
    }
    .into_iter()
    .collect()
}

/// Route pasted text into whichever input has focus.
pub fn actions_for_paste(app: &App, text: &str) -> Vec<AppAction> {
    let paste = EditAction::Paste(text.to_string());
    let action = match app.route {
        _ if app.has_composer() => Some(AppAction::ComposerEdit(paste)),
        Some(Route::Auth) => Some(AppAction::AuthEdit(paste)),
        Some(Route::Chat) if app.chat.history.ready().is_some() => Some(AppAction::ChatEdit(paste)),
        _ => None,
    };
    action.into_iter().collect()
}

fn global_action(key: &KeyEvent) -> Option<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(AppAction::Quit),
        KeyCode::F(1) => Some(AppAction::Navigate(Route::Dashboard)),
        KeyCode::F(2) => Some(AppAction::Navigate(Route::Chat)),
        KeyCode::F(3) => Some(AppAction::Navigate(Route::Lessons)),
        KeyCode::F(4) => Some(AppAction::Navigate(Route::Timeline)),
        KeyCode::F(5) => Some(AppAction::Navigate(Route::Profile)),
        _ => None,
    }
}

fn composer_actions(route: Route, key: &KeyEvent) -> Vec<AppAction> {
    let action = match key.code {
        KeyCode::Esc => Some(AppAction::ComposerCancel),
        KeyCode::Enter => Some(AppAction::ComposerSubmit),
        KeyCode::Tab if route == Route::Lessons => Some(AppAction::ComposerCycleRating),
        _ => edit_action_for_key(key).map(AppAction::ComposerEdit),
    };
    action.into_iter().collect()
}

fn auth_actions(key: &KeyEvent) -> Option<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Some(AppAction::AuthSubmit),
        KeyCode::Tab | KeyCode::Down => Some(AppAction::AuthMoveFocus { forward: true }),
        KeyCode::BackTab | KeyCode::Up => Some(AppAction::AuthMoveFocus { forward: false }),
        KeyCode::Char('t') if ctrl => Some(AppAction::AuthToggleMode),
        _ => edit_action_for_key(key).map(AppAction::AuthEdit),
    }
}

fn onboarding_actions(key: &KeyEvent) -> Option<AppAction> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(AppAction::OnboardingCycle { forward: false }),
        KeyCode::Down | KeyCode::Char('j') => Some(AppAction::OnboardingCycle { forward: true }),
        KeyCode::Enter | KeyCode::Right => Some(AppAction::OnboardingNext),
        KeyCode::Left | KeyCode::Backspace => Some(AppAction::OnboardingPrevious),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .map(|digit| AppAction::OnboardingSelect(digit as usize - 1)),
        _ => None,
    }
}

fn dashboard_actions(key: &KeyEvent) -> Option<AppAction> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(AppAction::DashboardMove { forward: false }),
        KeyCode::Down | KeyCode::Char('j') => Some(AppAction::DashboardMove { forward: true }),
        KeyCode::Tab => Some(AppAction::DashboardToggleFocus),
        KeyCode::Enter => Some(AppAction::DashboardActivate),
        KeyCode::Char('c') => Some(AppAction::DashboardChatAboutStory),
        KeyCode::Char('n') => Some(AppAction::ComposerOpen),
        _ => None,
    }
}

fn chat_actions(app: &App, key: &KeyEvent) -> Option<AppAction> {
    if app.chat.history.ready().is_none() {
        return None;
    }
    match key.code {
        KeyCode::Enter => Some(AppAction::ChatSend),
        KeyCode::PageUp => Some(AppAction::ChatScroll { up: true }),
        KeyCode::PageDown => Some(AppAction::ChatScroll { up: false }),
        _ => edit_action_for_key(key).map(AppAction::ChatEdit),
    }
}

fn lessons_actions(key: &KeyEvent) -> Option<AppAction> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(AppAction::LessonsMove { forward: false }),
        KeyCode::Down | KeyCode::Char('j') => Some(AppAction::LessonsMove { forward: true }),
        KeyCode::Char('w') => Some(AppAction::ComposerOpen),
        _ => None,
    }
}

fn timeline_actions(key: &KeyEvent) -> Option<AppAction> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(AppAction::TimelineMove { forward: false }),
        KeyCode::Down | KeyCode::Char('j') => Some(AppAction::TimelineMove { forward: true }),
        KeyCode::Char('n') => Some(AppAction::ComposerOpen),
        KeyCode::Char('s') => Some(AppAction::TimelineAdvanceStatus),
        _ => None,
    }
}

fn profile_actions(key: &KeyEvent) -> Option<AppAction> {
    match key.code {
        KeyCode::Char('l') => Some(AppAction::Logout),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CurrentUser;
    use crate::core::app::AppAction;
    use crate::core::resource::Resource;
    use crate::core::session::{test_channel, SessionState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn main_app(route: Route) -> App {
        let (_tx, handle) = test_channel(SessionState::Authenticated(CurrentUser {
            id: "u".into(),
            email: "a@b.com".into(),
            full_name: "Ada".into(),
            personality_test_completed: true,
            is_active: None,
            created_at: None,
            spiritual_level: None,
            profile_picture: None,
        }));
        let mut app = App::new(handle, Some(route));
        app.sync_route();
        app
    }

    #[test]
    fn ctrl_c_quits_from_any_screen() {
        let app = main_app(Route::Chat);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(actions_for_key(&app, &ctrl_c), vec![AppAction::Quit]);
    }

    #[test]
    fn function_keys_navigate() {
        let app = main_app(Route::Dashboard);
        assert_eq!(
            actions_for_key(&app, &key(KeyCode::F(4))),
            vec![AppAction::Navigate(Route::Timeline)]
        );
    }

    #[test]
    fn retry_only_when_the_screen_failed() {
        let mut app = main_app(Route::Dashboard);
        assert!(actions_for_key(&app, &key(KeyCode::Char('r'))).is_empty());
        app.dashboard.data = Resource::Failed("HTTP 500".into());
        assert_eq!(
            actions_for_key(&app, &key(KeyCode::Char('r'))),
            vec![AppAction::Retry]
        );
    }

    #[test]
    fn chat_typing_goes_to_the_input_once_loaded() {
        let mut app = main_app(Route::Chat);
        assert!(actions_for_key(&app, &key(KeyCode::Char('h'))).is_empty());
        app.chat.history = Resource::Ready(Vec::new());
        assert_eq!(
            actions_for_key(&app, &key(KeyCode::Char('r'))),
            vec![AppAction::ChatEdit(EditAction::Insert('r'))]
        );
    }

    #[test]
    fn open_composer_captures_letters() {
        let mut app = main_app(Route::Timeline);
        app.timeline.composer = Some(Default::default());
        assert_eq!(
            actions_for_key(&app, &key(KeyCode::Char('s'))),
            vec![AppAction::ComposerEdit(EditAction::Insert('s'))]
        );
        assert_eq!(
            actions_for_key(&app, &key(KeyCode::Esc)),
            vec![AppAction::ComposerCancel]
        );
    }

    #[test]
    fn paste_goes_to_the_open_composer() {
        let mut app = main_app(Route::Dashboard);
        assert!(actions_for_paste(&app, "hello").is_empty());
        app.dashboard.composer = Some(Default::default());
        assert_eq!(
            actions_for_paste(&app, "hello"),
            vec![AppAction::ComposerEdit(EditAction::Paste("hello".into()))]
        );
    }

    #[test]
    fn onboarding_digits_pick_options() {
        let (_tx, handle) = test_channel(SessionState::Authenticated(CurrentUser {
            id: "u".into(),
            email: "a@b.com".into(),
            full_name: "Ada".into(),
            personality_test_completed: false,
            is_active: None,
            created_at: None,
            spiritual_level: None,
            profile_picture: None,
        }));
        let mut app = App::new(handle, None);
        app.sync_route();
        assert_eq!(
            actions_for_key(&app, &key(KeyCode::Char('2'))),
            vec![AppAction::OnboardingSelect(1)]
        );
    }
}
