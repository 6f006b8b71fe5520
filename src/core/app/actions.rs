use tokio::sync::mpsc;
use tracing::debug;

use super::screens::{next_decision_status, DashboardFocus, ReviewDraft, CHAT_FAILURE_REPLY};
use super::App;
use crate::api::{ChatMessage, PersonalityAnswer, PersonalityQuestion, Podcast, PodcastReview};
use crate::core::app::screens::{DashboardData, TimelineData};
use crate::core::onboarding::{NextOutcome, OnboardingFlow};
use crate::core::resource::{LoadTicket, Resource};
use crate::core::router::Route;
use crate::utils::text_field::{EditAction, TextField};

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Quit,
    Navigate(Route),
    /// The shared session changed; re-run routing.
    SessionChanged,
    Retry,
    ClearStatus,

    AuthEdit(EditAction),
    AuthMoveFocus { forward: bool },
    AuthToggleMode,
    AuthSubmit,
    AuthFinished { success: bool },

    OnboardingSelect(usize),
    OnboardingCycle { forward: bool },
    OnboardingNext,
    OnboardingPrevious,
    QuestionsLoaded {
        generation: u64,
        result: Result<Vec<PersonalityQuestion>, String>,
    },
    OnboardingSubmitted { result: Result<(), String> },

    DashboardMove { forward: bool },
    DashboardToggleFocus,
    DashboardActivate,
    DashboardChatAboutStory,
    DashboardLoaded {
        generation: u64,
        result: Result<DashboardData, String>,
    },
    DashboardUpdated { result: Result<String, String> },

    ComposerOpen,
    ComposerEdit(EditAction),
    ComposerCancel,
    ComposerSubmit,
    ComposerCycleRating,

    ChatEdit(EditAction),
    ChatSend,
    ChatScroll { up: bool },
    ChatHistoryLoaded {
        generation: u64,
        result: Result<Vec<ChatMessage>, String>,
    },
    ChatReplied { result: Result<ChatMessage, String> },

    LessonsMove { forward: bool },
    PodcastsLoaded {
        generation: u64,
        result: Result<Vec<Podcast>, String>,
    },
    ReviewsLoaded {
        generation: u64,
        result: Result<Vec<PodcastReview>, String>,
    },
    ReviewSubmitted { result: Result<(), String> },

    TimelineMove { forward: bool },
    TimelineAdvanceStatus,
    TimelineLoaded {
        generation: u64,
        result: Result<TimelineData, String>,
    },
    TimelineUpdated { result: Result<String, String> },

    Logout,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }

    pub fn dispatch_many<I>(&self, actions: I)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions {
            self.dispatch(action);
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<AppAction> {
        self.tx.clone()
    }
}

/// Work the event loop must start outside the state update. Every variant is
/// spawned; none is awaited by the loop.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        full_name: String,
    },
    Logout,
    LoadQuestions(LoadTicket),
    SubmitOnboarding(Vec<PersonalityAnswer>),
    LoadDashboard(LoadTicket),
    StartStory {
        story_id: String,
        title: String,
    },
    CompleteTodo {
        todo_id: String,
        title: String,
    },
    CreateTodo {
        story_id: String,
        title: String,
    },
    LoadChat {
        ticket: LoadTicket,
        story_context: Option<String>,
    },
    SendChat {
        message: String,
        story_context: Option<String>,
    },
    LoadPodcasts(LoadTicket),
    LoadReviews {
        ticket: LoadTicket,
        podcast_id: String,
    },
    SubmitReview {
        podcast_id: String,
        rating: u8,
        review_text: String,
    },
    LoadTimeline(LoadTicket),
    CreateDecision {
        title: String,
    },
    UpdateDecisionStatus {
        decision_id: String,
        status: &'static str,
    },
}

pub fn apply_actions(
    app: &mut App,
    actions: impl IntoIterator<Item = AppAction>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        commands.extend(apply_action(app, action));
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Vec<AppCommand> {
    match action {
        AppAction::Quit => {
            app.exit_requested = true;
            Vec::new()
        }
        AppAction::Navigate(route) => app.navigate(route),
        AppAction::SessionChanged => app.sync_route(),
        AppAction::Retry => app.retry(),
        AppAction::ClearStatus => {
            app.status = None;
            Vec::new()
        }

        AppAction::AuthEdit(edit) => {
            if !app.auth.submitting {
                app.auth.focused_mut().apply(edit);
            }
            Vec::new()
        }
        AppAction::AuthMoveFocus { forward } => {
            app.auth.move_focus(forward);
            Vec::new()
        }
        AppAction::AuthToggleMode => {
            if !app.auth.submitting {
                app.auth.toggle_mode();
            }
            Vec::new()
        }
        AppAction::AuthSubmit => {
            if app.auth.submitting {
                return Vec::new();
            }
            match app.auth.validate() {
                Ok(submission) => {
                    app.auth.submitting = true;
                    app.auth.error = None;
                    let command = match submission.full_name {
                        Some(full_name) => AppCommand::Register {
                            email: submission.email,
                            password: submission.password,
                            full_name,
                        },
                        None => AppCommand::Login {
                            email: submission.email,
                            password: submission.password,
                        },
                    };
                    vec![command]
                }
                Err(message) => {
                    app.auth.error = Some(message);
                    Vec::new()
                }
            }
        }
        AppAction::AuthFinished { success } => {
            if success {
                app.auth.reset();
            } else {
                app.auth.submitting = false;
                app.auth.error = Some(app.auth.failure_message().to_string());
            }
            Vec::new()
        }

        AppAction::OnboardingSelect(option) => {
            if let Some(flow) = app.onboarding.flow.ready_mut() {
                flow.select(option);
            }
            Vec::new()
        }
        AppAction::OnboardingCycle { forward } => {
            if let Some(flow) = app.onboarding.flow.ready_mut() {
                flow.cycle_selection(forward);
            }
            Vec::new()
        }
        AppAction::OnboardingNext => {
            let Some(flow) = app.onboarding.flow.ready_mut() else {
                return Vec::new();
            };
            match flow.next() {
                NextOutcome::Submit(answers) => {
                    app.onboarding.submit_error = None;
                    vec![AppCommand::SubmitOnboarding(answers)]
                }
                NextOutcome::Advanced => {
                    app.onboarding.submit_error = None;
                    Vec::new()
                }
                NextOutcome::NothingSelected => {
                    app.status = Some("Choose an answer first".to_string());
                    Vec::new()
                }
            }
        }
        AppAction::OnboardingPrevious => {
            if let Some(flow) = app.onboarding.flow.ready_mut() {
                flow.previous();
            }
            Vec::new()
        }
        AppAction::QuestionsLoaded { generation, result } => {
            if app.onboarding.loader.finish(generation) {
                app.onboarding.flow = Resource::from_result(result.map(OnboardingFlow::new));
            }
            Vec::new()
        }
        AppAction::OnboardingSubmitted { result } => {
            if let Some(flow) = app.onboarding.flow.ready_mut() {
                match result {
                    Ok(()) => flow.submission_succeeded(),
                    Err(message) => {
                        flow.submission_failed();
                        app.onboarding.submit_error = Some(message);
                    }
                }
            }
            Vec::new()
        }

        AppAction::DashboardMove { forward } => {
            app.dashboard.move_cursor(forward);
            Vec::new()
        }
        AppAction::DashboardToggleFocus => {
            app.dashboard.focus = match app.dashboard.focus {
                DashboardFocus::Stories => DashboardFocus::Todos,
                DashboardFocus::Todos => DashboardFocus::Stories,
            };
            Vec::new()
        }
        AppAction::DashboardActivate => match app.dashboard.focus {
            DashboardFocus::Stories => app
                .dashboard
                .selected_story()
                .map(|story| AppCommand::StartStory {
                    story_id: story.id.clone(),
                    title: story.title.clone(),
                })
                .into_iter()
                .collect(),
            DashboardFocus::Todos => app
                .dashboard
                .selected_todo()
                .filter(|todo| !todo.completed)
                .map(|todo| AppCommand::CompleteTodo {
                    todo_id: todo.id.clone(),
                    title: todo.title.clone(),
                })
                .into_iter()
                .collect(),
        },
        AppAction::DashboardChatAboutStory => {
            let Some(story_id) = app.dashboard.selected_story().map(|story| story.id.clone())
            else {
                return Vec::new();
            };
            app.chat.story_context = Some(story_id);
            app.navigate(Route::Chat)
        }
        AppAction::DashboardLoaded { generation, result } => {
            if app.dashboard.loader.finish(generation) {
                app.dashboard.data = Resource::from_result(result);
                clamp_dashboard_cursors(app);
            }
            Vec::new()
        }
        AppAction::DashboardUpdated { result } | AppAction::TimelineUpdated { result } => {
            match result {
                Ok(message) => {
                    app.status = Some(message);
                    app.reload_current()
                }
                Err(message) => {
                    app.status = Some(message);
                    Vec::new()
                }
            }
        }

        AppAction::ComposerOpen => {
            match app.route {
                Some(Route::Dashboard) if app.dashboard.selected_story().is_some() => {
                    app.dashboard.composer = Some(TextField::new());
                }
                Some(Route::Timeline) if app.timeline.data.ready().is_some() => {
                    app.timeline.composer = Some(TextField::new());
                }
                Some(Route::Lessons) if app.lessons.selected().is_some() => {
                    app.lessons.draft = Some(ReviewDraft::default());
                }
                _ => {}
            }
            Vec::new()
        }
        AppAction::ComposerEdit(edit) => {
            if let Some(field) = app.active_composer_mut() {
                field.apply(edit);
            }
            Vec::new()
        }
        AppAction::ComposerCancel => {
            app.close_composer();
            Vec::new()
        }
        AppAction::ComposerCycleRating => {
            if let Some(draft) = app.lessons.draft.as_mut() {
                draft.cycle_rating();
            }
            Vec::new()
        }
        AppAction::ComposerSubmit => submit_composer(app),

        AppAction::ChatEdit(edit) => {
            app.chat.input.apply(edit);
            Vec::new()
        }
        AppAction::ChatSend => {
            if app.chat.sending || app.chat.history.ready().is_none() {
                return Vec::new();
            }
            let message = app.chat.input.text().trim().to_string();
            if message.is_empty() {
                return Vec::new();
            }
            app.chat.input.clear();
            app.chat.sending = true;
            let user_id = app
                .session
                .current_user()
                .map(|user| user.id)
                .unwrap_or_default();
            app.chat.push(ChatMessage {
                id: String::new(),
                user_id,
                message: message.clone(),
                is_user: true,
                timestamp: chrono::Utc::now().to_rfc3339(),
                story_context: app.chat.story_context.clone(),
            });
            vec![AppCommand::SendChat {
                message,
                story_context: app.chat.story_context.clone(),
            }]
        }
        AppAction::ChatScroll { up } => {
            app.chat.scroll = if up {
                app.chat.scroll.saturating_add(3)
            } else {
                app.chat.scroll.saturating_sub(3)
            };
            Vec::new()
        }
        AppAction::ChatHistoryLoaded { generation, result } => {
            if app.chat.loader.finish(generation) {
                app.chat.history = Resource::from_result(result);
                app.chat.scroll = 0;
            }
            Vec::new()
        }
        AppAction::ChatReplied { result } => {
            app.chat.sending = false;
            let reply = match result {
                Ok(reply) => reply,
                Err(err) => {
                    debug!(error = %err, "chat message failed");
                    ChatMessage {
                        id: String::new(),
                        user_id: String::new(),
                        message: CHAT_FAILURE_REPLY.to_string(),
                        is_user: false,
                        timestamp: chrono::Utc::now().to_rfc3339(),
                        story_context: app.chat.story_context.clone(),
                    }
                }
            };
            app.chat.push(reply);
            Vec::new()
        }

        AppAction::LessonsMove { forward } => {
            let len = app.lessons.podcasts.ready().map_or(0, Vec::len);
            let next = super::screens::step(app.lessons.cursor, len, forward);
            if next == app.lessons.cursor {
                return Vec::new();
            }
            app.lessons.cursor = next;
            app.lessons.draft = None;
            app.load_reviews().into_iter().collect()
        }
        AppAction::PodcastsLoaded { generation, result } => {
            if !app.lessons.loader.finish(generation) {
                return Vec::new();
            }
            app.lessons.podcasts = Resource::from_result(result);
            app.lessons.cursor = 0;
            app.load_reviews().into_iter().collect()
        }
        AppAction::ReviewsLoaded { generation, result } => {
            if app.lessons.reviews_loader.finish(generation) {
                app.lessons.reviews = Resource::from_result(result);
            }
            Vec::new()
        }
        AppAction::ReviewSubmitted { result } => match result {
            Ok(()) => {
                app.status = Some("Thank you for your review".to_string());
                app.load_reviews().into_iter().collect()
            }
            Err(message) => {
                app.status = Some(message);
                Vec::new()
            }
        },

        AppAction::TimelineMove { forward } => {
            let len = app.timeline.data.ready().map_or(0, |data| data.decisions.len());
            app.timeline.cursor = super::screens::step(app.timeline.cursor, len, forward);
            Vec::new()
        }
        AppAction::TimelineAdvanceStatus => {
            let Some(decision) = app.timeline.selected() else {
                return Vec::new();
            };
            match next_decision_status(decision.decision_status.as_deref()) {
                Some(status) => vec![AppCommand::UpdateDecisionStatus {
                    decision_id: decision.id.clone(),
                    status,
                }],
                None => {
                    app.status = Some("Decision already implemented".to_string());
                    Vec::new()
                }
            }
        }
        AppAction::TimelineLoaded { generation, result } => {
            if app.timeline.loader.finish(generation) {
                app.timeline.data = Resource::from_result(result);
                let len = app.timeline.data.ready().map_or(0, |data| data.decisions.len());
                app.timeline.cursor = app.timeline.cursor.min(len.saturating_sub(1));
            }
            Vec::new()
        }

        AppAction::Logout => vec![AppCommand::Logout],
    }
}

fn submit_composer(app: &mut App) -> Vec<AppCommand> {
    match app.route {
        Some(Route::Dashboard) => {
            let Some(story_id) = app.dashboard.selected_story().map(|story| story.id.clone())
            else {
                return Vec::new();
            };
            let Some(field) = app.dashboard.composer.take() else {
                return Vec::new();
            };
            let title = field.text().trim().to_string();
            if title.is_empty() {
                return Vec::new();
            }
            vec![AppCommand::CreateTodo { story_id, title }]
        }
        Some(Route::Timeline) => {
            let Some(field) = app.timeline.composer.take() else {
                return Vec::new();
            };
            let title = field.text().trim().to_string();
            if title.is_empty() {
                return Vec::new();
            }
            vec![AppCommand::CreateDecision { title }]
        }
        Some(Route::Lessons) => {
            let Some(podcast_id) = app.lessons.selected().map(|podcast| podcast.id.clone()) else {
                return Vec::new();
            };
            let Some(draft) = app.lessons.draft.take() else {
                return Vec::new();
            };
            vec![AppCommand::SubmitReview {
                podcast_id,
                rating: draft.rating,
                review_text: draft.text.text().trim().to_string(),
            }]
        }
        _ => Vec::new(),
    }
}

fn clamp_dashboard_cursors(app: &mut App) {
    let Some(data) = app.dashboard.data.ready() else {
        return;
    };
    let stories = data.stories.len();
    let todos = data.todos.len();
    app.dashboard.story_cursor = app.dashboard.story_cursor.min(stories.saturating_sub(1));
    app.dashboard.todo_cursor = app.dashboard.todo_cursor.min(todos.saturating_sub(1));
}
