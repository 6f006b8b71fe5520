//! Maps the session to the screens it may reach.
//!
//! Routing is a pure function of [`SessionState`]: exactly one [`ScreenSet`]
//! is active at a time and any request outside it is replaced by that set's
//! default route before anything is drawn.

use crate::core::session::SessionState;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Auth,
    Onboarding,
    Dashboard,
    Profile,
    Chat,
    Lessons,
    Timeline,
}

impl Route {
    pub const MAIN: [Route; 5] = [
        Route::Dashboard,
        Route::Profile,
        Route::Chat,
        Route::Lessons,
        Route::Timeline,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Auth => "/auth",
            Route::Onboarding => "/onboarding",
            Route::Dashboard => "/dashboard",
            Route::Profile => "/profile",
            Route::Chat => "/chat",
            Route::Lessons => "/lessons",
            Route::Timeline => "/timeline",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Auth => "Sign in",
            Route::Onboarding => "Personality",
            Route::Dashboard => "Dashboard",
            Route::Profile => "Profile",
            Route::Chat => "Chat",
            Route::Lessons => "Lessons",
            Route::Timeline => "Timeline",
        }
    }

    /// Parse a path. Trailing slashes, case and a missing leading slash are
    /// tolerated; unknown paths yield `None`.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_matches('/').to_ascii_lowercase();
        let route = match trimmed.as_str() {
            "auth" | "login" => Route::Auth,
            "onboarding" => Route::Onboarding,
            "dashboard" => Route::Dashboard,
            "profile" => Route::Profile,
            "chat" => Route::Chat,
            "lessons" | "podcasts" => Route::Lessons,
            "timeline" | "consciousness" => Route::Timeline,
            _ => return None,
        };
        Some(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSet {
    Anonymous,
    Onboarding,
    Main,
}

impl ScreenSet {
    /// `None` while the session is still being resolved.
    pub fn for_session(state: &SessionState) -> Option<ScreenSet> {
        match state {
            SessionState::Unresolved | SessionState::Resolving => None,
            SessionState::Anonymous => Some(ScreenSet::Anonymous),
            SessionState::Authenticated(user) if user.personality_test_completed => {
                Some(ScreenSet::Main)
            }
            SessionState::Authenticated(_) => Some(ScreenSet::Onboarding),
        }
    }

    pub fn routes(self) -> &'static [Route] {
        match self {
            ScreenSet::Anonymous => &[Route::Auth],
            ScreenSet::Onboarding => &[Route::Onboarding],
            ScreenSet::Main => &Route::MAIN,
        }
    }

    pub fn default_route(self) -> Route {
        match self {
            ScreenSet::Anonymous => Route::Auth,
            ScreenSet::Onboarding => Route::Onboarding,
            ScreenSet::Main => Route::Dashboard,
        }
    }

    pub fn contains(self, route: Route) -> bool {
        self.routes().contains(&route)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session not settled; show a loading view.
    Loading,
    Render(Route),
    Redirect(Route),
}

impl RouteDecision {
    /// The route that ends up on screen, if any.
    pub fn route(self) -> Option<Route> {
        match self {
            RouteDecision::Loading => None,
            RouteDecision::Render(route) | RouteDecision::Redirect(route) => Some(route),
        }
    }
}

pub fn resolve(state: &SessionState, requested: Option<Route>) -> RouteDecision {
    let Some(set) = ScreenSet::for_session(state) else {
        return RouteDecision::Loading;
    };
    match requested {
        Some(route) if set.contains(route) => RouteDecision::Render(route),
        _ => RouteDecision::Redirect(set.default_route()),
    }
}

pub fn resolve_path(state: &SessionState, path: &str) -> RouteDecision {
    resolve(state, Route::from_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CurrentUser;

    fn authenticated(onboarded: bool) -> SessionState {
        SessionState::Authenticated(CurrentUser {
            id: "user-1".to_string(),
            email: "a@b.com".to_string(),
            full_name: "Ada Byron".to_string(),
            personality_test_completed: onboarded,
            is_active: None,
            created_at: None,
            spiritual_level: None,
            profile_picture: None,
        })
    }

    #[test]
    fn not_onboarded_dashboard_redirects_to_onboarding() {
        assert_eq!(
            resolve(&authenticated(false), Some(Route::Dashboard)),
            RouteDecision::Redirect(Route::Onboarding)
        );
    }

    #[test]
    fn onboarded_onboarding_redirects_to_dashboard() {
        assert_eq!(
            resolve(&authenticated(true), Some(Route::Onboarding)),
            RouteDecision::Redirect(Route::Dashboard)
        );
    }

    #[test]
    fn anonymous_sessions_only_reach_auth() {
        for route in Route::MAIN {
            assert_eq!(
                resolve(&SessionState::Anonymous, Some(route)),
                RouteDecision::Redirect(Route::Auth)
            );
        }
        assert_eq!(
            resolve(&SessionState::Anonymous, Some(Route::Auth)),
            RouteDecision::Render(Route::Auth)
        );
    }

    #[test]
    fn main_set_renders_each_of_its_routes() {
        let state = authenticated(true);
        for route in Route::MAIN {
            assert_eq!(resolve(&state, Some(route)), RouteDecision::Render(route));
        }
        assert_eq!(
            resolve(&state, Some(Route::Auth)),
            RouteDecision::Redirect(Route::Dashboard)
        );
    }

    #[test]
    fn unresolved_session_is_loading() {
        assert_eq!(
            resolve(&SessionState::Unresolved, Some(Route::Auth)),
            RouteDecision::Loading
        );
        assert_eq!(
            resolve(&SessionState::Resolving, None),
            RouteDecision::Loading
        );
    }

    #[test]
    fn unknown_paths_fall_back_to_the_default() {
        assert_eq!(
            resolve_path(&authenticated(true), "/settings"),
            RouteDecision::Redirect(Route::Dashboard)
        );
        assert_eq!(
            resolve_path(&authenticated(true), "consciousness/"),
            RouteDecision::Render(Route::Timeline)
        );
        assert_eq!(Route::from_path("/Podcasts"), Some(Route::Lessons));
    }

    #[test]
    fn screen_sets_are_disjoint() {
        let sets = [ScreenSet::Anonymous, ScreenSet::Onboarding, ScreenSet::Main];
        for (i, a) in sets.iter().enumerate() {
            for b in sets.iter().skip(i + 1) {
                assert!(a.routes().iter().all(|route| !b.contains(*route)));
            }
        }
    }
}
