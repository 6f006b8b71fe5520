//! Terminal application state.
//!
//! [`App`] owns the view state of every screen and the currently displayed
//! route. It never performs I/O: user input and task results arrive as
//! [`AppAction`]s, and any work they require is returned as [`AppCommand`]s
//! for the event loop to spawn.

pub mod actions;
pub mod screens;

pub use actions::{apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand};

use crate::core::resource::Resource;
use crate::core::router::{self, Route, RouteDecision};
use crate::core::session::SessionHandle;
use crate::utils::text_field::TextField;
use screens::{
    AuthForm, ChatScreen, DashboardScreen, LessonsScreen, OnboardingScreen, TimelineScreen,
};

pub struct App {
    pub session: SessionHandle,
    /// Route the user last asked for; replaced by redirects.
    pub requested: Option<Route>,
    /// Route on screen; `None` while the session is resolving.
    pub route: Option<Route>,
    pub auth: AuthForm,
    pub onboarding: OnboardingScreen,
    pub dashboard: DashboardScreen,
    pub chat: ChatScreen,
    pub lessons: LessonsScreen,
    pub timeline: TimelineScreen,
    pub status: Option<String>,
    pub exit_requested: bool,
}

impl App {
    pub fn new(session: SessionHandle, requested: Option<Route>) -> Self {
        Self {
            session,
            requested,
            route: None,
            auth: AuthForm::default(),
            onboarding: OnboardingScreen::default(),
            dashboard: DashboardScreen::default(),
            chat: ChatScreen::default(),
            lessons: LessonsScreen::default(),
            timeline: TimelineScreen::default(),
            status: None,
            exit_requested: false,
        }
    }

    pub fn navigate(&mut self, route: Route) -> Vec<AppCommand> {
        self.requested = Some(route);
        self.status = None;
        self.sync_route()
    }

    /// Route the current session state. A disallowed request is replaced by
    /// its redirect before anything is drawn; entering a screen starts its
    /// load and leaving one cancels it.
    pub fn sync_route(&mut self) -> Vec<AppCommand> {
        let decision = router::resolve(&self.session.current(), self.requested);
        if let RouteDecision::Redirect(route) = decision {
            self.requested = Some(route);
        }
        let next = decision.route();
        if next == self.route {
            return Vec::new();
        }
        if let Some(previous) = self.route {
            self.leave(previous);
        }
        self.route = next;
        match next {
            Some(route) => self.enter(route),
            None => Vec::new(),
        }
    }

    fn leave(&mut self, route: Route) {
        match route {
            Route::Auth | Route::Profile => {}
            Route::Onboarding => self.onboarding.loader.cancel(),
            Route::Dashboard => {
                self.dashboard.loader.cancel();
                self.dashboard.composer = None;
            }
            Route::Chat => self.chat.loader.cancel(),
            Route::Lessons => {
                self.lessons.loader.cancel();
                self.lessons.reviews_loader.cancel();
                self.lessons.draft = None;
            }
            Route::Timeline => {
                self.timeline.loader.cancel();
                self.timeline.composer = None;
            }
        }
    }

    fn enter(&mut self, route: Route) -> Vec<AppCommand> {
        match route {
            Route::Auth => {
                self.auth.reset();
                self.chat = ChatScreen::default();
                Vec::new()
            }
            Route::Profile => Vec::new(),
            Route::Onboarding => {
                self.onboarding.flow = Resource::Loading;
                self.onboarding.submit_error = None;
                vec![AppCommand::LoadQuestions(self.onboarding.loader.begin())]
            }
            Route::Dashboard => {
                self.dashboard.data = Resource::Loading;
                vec![AppCommand::LoadDashboard(self.dashboard.loader.begin())]
            }
            Route::Chat => {
                self.chat.history = Resource::Loading;
                self.chat.sending = false;
                vec![AppCommand::LoadChat {
                    ticket: self.chat.loader.begin(),
                    story_context: self.chat.story_context.clone(),
                }]
            }
            Route::Lessons => {
                self.lessons.podcasts = Resource::Loading;
                self.lessons.reviews = Resource::Loading;
                vec![AppCommand::LoadPodcasts(self.lessons.loader.begin())]
            }
            Route::Timeline => {
                self.timeline.data = Resource::Loading;
                vec![AppCommand::LoadTimeline(self.timeline.loader.begin())]
            }
        }
    }

    /// Fetch the current screen's data again.
    pub fn reload_current(&mut self) -> Vec<AppCommand> {
        match self.route {
            Some(route) => {
                self.leave(route);
                self.enter(route)
            }
            None => Vec::new(),
        }
    }

    pub fn retry(&mut self) -> Vec<AppCommand> {
        if self.route == Some(Route::Lessons)
            && self.lessons.podcasts.ready().is_some()
            && self.lessons.reviews.error().is_some()
        {
            return self.load_reviews().into_iter().collect();
        }
        if self.current_failed() {
            self.reload_current()
        } else {
            Vec::new()
        }
    }

    /// Whether the screen on display shows a load error.
    pub fn current_failed(&self) -> bool {
        match self.route {
            Some(Route::Onboarding) => self.onboarding.flow.error().is_some(),
            Some(Route::Dashboard) => self.dashboard.data.error().is_some(),
            Some(Route::Chat) => self.chat.history.error().is_some(),
            Some(Route::Lessons) => {
                self.lessons.podcasts.error().is_some() || self.lessons.reviews.error().is_some()
            }
            Some(Route::Timeline) => self.timeline.data.error().is_some(),
            _ => false,
        }
    }

    pub(crate) fn load_reviews(&mut self) -> Option<AppCommand> {
        let Some(podcast_id) = self.lessons.selected().map(|podcast| podcast.id.clone()) else {
            self.lessons.reviews_loader.cancel();
            self.lessons.reviews = Resource::Ready(Vec::new());
            return None;
        };
        self.lessons.reviews = Resource::Loading;
        Some(AppCommand::LoadReviews {
            ticket: self.lessons.reviews_loader.begin(),
            podcast_id,
        })
    }

    pub fn has_composer(&self) -> bool {
        match self.route {
            Some(Route::Dashboard) => self.dashboard.composer.is_some(),
            Some(Route::Timeline) => self.timeline.composer.is_some(),
            Some(Route::Lessons) => self.lessons.draft.is_some(),
            _ => false,
        }
    }

    pub fn active_composer_mut(&mut self) -> Option<&mut TextField> {
        match self.route {
            Some(Route::Dashboard) => self.dashboard.composer.as_mut(),
            Some(Route::Timeline) => self.timeline.composer.as_mut(),
            Some(Route::Lessons) => self.lessons.draft.as_mut().map(|draft| &mut draft.text),
            _ => None,
        }
    }

    pub fn close_composer(&mut self) {
        match self.route {
            Some(Route::Dashboard) => self.dashboard.composer = None,
            Some(Route::Timeline) => self.timeline.composer = None,
            Some(Route::Lessons) => self.lessons.draft = None,
            _ => {}
        }
    }
}
